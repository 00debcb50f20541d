//! HTTP request handlers.

pub mod digits;
pub mod meta;

pub use digits::*;
pub use meta::*;
