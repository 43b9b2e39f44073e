//! Client SDK for the Shoplite question-answering service
//!
//! This crate abstracts the transport between a frontend and the remote
//! RAG service behind a single trait, so user interfaces can run against
//! the real HTTP service or a scripted in-process client in tests without
//! code changes. The service publishes no fixed response schema, so the
//! answer type is a loose JSON record with defaulting accessors rather
//! than a strict structure.

use async_trait::async_trait;

pub mod error;
pub mod http_client;
pub mod types;

pub use error::ClientError;
pub use http_client::HttpQaClient;
pub use types::{AnswerResult, AskRequest, Endpoint};

/// QaClient trait for communicating with a Shoplite QA service
#[async_trait]
pub trait QaClient: Send + Sync {
    /// Send one question and wait for the complete answer.
    async fn ask(&self, question: &str) -> Result<AnswerResult, ClientError>;
}
