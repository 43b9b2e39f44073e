//! Error types for the question/answer exchange.
//!
//! Each variant maps to one branch of the REPL's inline error reporting:
//! the Display strings are exactly what the user sees, so they carry the
//! status code and raw body rather than a summary.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("URL must start with http:// or https://")]
    InvalidUrl,
    #[error("Request timed out (>{secs}s). The system may be processing a complex query.")]
    Timeout { secs: u64 },
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Error (Status {status}): {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}
