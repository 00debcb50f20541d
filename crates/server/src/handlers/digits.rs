//! Digit and chunk lookup endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use piwell_core::Chunk;
use serde::Serialize;

/// Single digit response.
#[derive(Debug, Serialize)]
pub struct DigitResponse {
    /// Global index of the digit.
    pub index: i64,
    /// Digit value, 0 through 9.
    pub digit: u8,
}

/// Digit run response.
#[derive(Debug, Serialize)]
pub struct ChunkResponse {
    /// Global index of the first returned digit.
    pub first_index: i64,
    /// Digit values, 0 through 9 each.
    pub digits: Vec<u8>,
}

/// Fetch a chunk from the configured source without blocking the runtime.
async fn fetch_chunk(state: &AppState, first_index: i64, size: usize) -> ApiResult<Chunk> {
    let source = state.source.clone();
    let chunk = tokio::task::spawn_blocking(move || source.get_chunk(first_index, size))
        .await
        .map_err(|e| ApiError::Internal(format!("spawn_blocking failed: {e}")))??;
    Ok(chunk)
}

/// GET /api/v1/digit/{index}
///
/// The codec only hands out pair-aligned chunks, so an odd index is served
/// by fetching the two-digit chunk that covers it.
pub async fn get_digit(
    State(state): State<AppState>,
    Path(index): Path<i64>,
) -> ApiResult<Json<DigitResponse>> {
    if index < 0 {
        return Err(ApiError::BadRequest(format!(
            "digit index must be non-negative, got {index}"
        )));
    }

    let first_index = index - index % 2;
    let chunk = fetch_chunk(&state, first_index, 2).await?;
    let digit = chunk.digit(index)?;

    Ok(Json(DigitResponse { index, digit }))
}

/// GET /api/v1/chunk/{start_index}/{size}
///
/// The window is widened to the pair-aligned request the codec accepts
/// (odd start down, odd size up), then the decoded digits are trimmed
/// back to exactly what the caller asked for. A window reaching past
/// end-of-data comes back truncated, possibly empty.
pub async fn get_chunk(
    State(state): State<AppState>,
    Path((start_index, size)): Path<(i64, usize)>,
) -> ApiResult<Json<ChunkResponse>> {
    if start_index < 0 {
        return Err(ApiError::BadRequest(format!(
            "start index must be non-negative, got {start_index}"
        )));
    }
    if size == 0 {
        return Err(ApiError::BadRequest("size must be positive".to_string()));
    }

    // The cap is checked before the widening arithmetic below, which
    // would overflow for sizes near usize::MAX.
    let max = state.source.max_chunk_size();
    if size > max {
        return Err(piwell_core::Error::ChunkTooLarge { size, max }.into());
    }

    let mut first_index = start_index;
    let mut fetch_size = size;
    if fetch_size % 2 != 0 {
        fetch_size += 1;
    }
    if first_index % 2 != 0 {
        first_index -= 1;
        fetch_size += 2;
    }

    let chunk = fetch_chunk(&state, first_index, fetch_size).await?;

    // The chunk may start before the requested window and may end early
    // if the file ran out.
    let skip = (start_index - chunk.first_index()) as usize;
    let digits: Vec<u8> = chunk
        .digit_values()
        .into_iter()
        .skip(skip)
        .take(size)
        .collect();

    Ok(Json(ChunkResponse {
        first_index: start_index,
        digits,
    }))
}
