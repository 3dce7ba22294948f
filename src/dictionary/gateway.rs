//! Dictionary lookup contract and result types.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

/// A word offered by the dictionary as a possible reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct Candidate {
    /// Headword with syllable markers removed.
    pub word: String,
    /// First sense's definition, when the dictionary provides one.
    pub definition: Option<String>,
}

/// External dictionary queried by the match engine.
///
/// Each call performs at most one remote request. Failures are returned,
/// never raised as panics.
#[async_trait::async_trait]
pub trait DictionaryGateway: Send + Sync {
    /// Reports whether `word` exists.
    async fn check_exists(&self, word: &str) -> Result<bool, LookupError>;

    /// Lists words starting with `start`.
    async fn list_candidates(&self, start: char) -> Result<Vec<Candidate>, LookupError>;
}

/// Category of lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LookupErrorKind {
    /// Request could not be sent or the body could not be read.
    #[display("transport")]
    Transport,
    /// The service answered with a non-success status.
    #[display("status")]
    Status,
    /// The payload did not have the expected shape.
    #[display("malformed response")]
    Malformed,
}

/// Dictionary lookup error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Lookup error ({}): {} at {}:{}", kind, message, file, line)]
pub struct LookupError {
    /// Failure category.
    pub kind: LookupErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LookupError {
    /// Creates a new lookup error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: LookupErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(%kind, error_message = %message, "Lookup error created");
        Self {
            kind,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for LookupError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::new(LookupErrorKind::Malformed, format!("Decode error: {}", err))
        } else if err.is_status() {
            Self::new(LookupErrorKind::Status, format!("HTTP error: {}", err))
        } else {
            Self::new(LookupErrorKind::Transport, format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for LookupError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(LookupErrorKind::Malformed, format!("Invalid JSON: {}", err))
    }
}
