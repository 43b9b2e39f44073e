//! Wire types for the `/chat` exchange and the validated service endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// Validated base URL of the question-answering service.
///
/// Construction is the only validation point: the scheme must be HTTP(S)
/// and a trailing slash is stripped so path joins stay consistent. The
/// value never changes once the session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    /// Parse a user-entered URL. No reachability check happens here; the
    /// first real verification is the first question's HTTP call.
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        let trimmed = raw.trim();
        let base = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ClientError::InvalidUrl);
        }
        Ok(Endpoint(base.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join a path starting with `/` onto the base URL.
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client → service request body for `/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

/// Service response, kept as loose JSON.
///
/// Every field is optional on the wire. Accessors default instead of
/// failing so a sparse or oddly-typed response still renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerResult(Value);

impl AnswerResult {
    /// Placeholder shown when the service sends no answer text.
    pub const NO_ANSWER: &'static str = "No answer provided";

    pub fn answer(&self) -> &str {
        self.0
            .get("answer")
            .and_then(Value::as_str)
            .unwrap_or(Self::NO_ANSWER)
    }

    /// String elements of `sources`, in service order. Non-string
    /// elements are skipped.
    pub fn sources(&self) -> Vec<&str> {
        self.0
            .get("sources")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn confidence_level(&self) -> &str {
        self.0
            .get("confidence_level")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
    }

    pub fn top_similarity(&self) -> f64 {
        self.0
            .get("top_similarity")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }
}

impl From<Value> for AnswerResult {
    fn from(value: Value) -> Self {
        AnswerResult(value)
    }
}
