//! HTTP client module with status classification.

mod client;
mod status;

pub use client::{CHUNK_SIZE, HttpClient};
pub use status::{StatusError, classify_status};
