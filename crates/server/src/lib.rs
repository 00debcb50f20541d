//! HTTP API for the pi digit store.
//!
//! This crate provides the read-only HTTP plane:
//! - Single digit lookup
//! - Digit run (chunk) retrieval
//! - Source settings introspection
//! - Health probe

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
