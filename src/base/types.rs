//! Result aliases, the relay error taxonomy, and submission outcomes.

use thiserror::Error;

/// Crate-wide error type.
pub type Err = anyhow::Error;
/// Crate-wide result type.
pub type Res<T> = Result<T, Err>;
/// Result with no value.
pub type Void = Res<()>;

/// Failure taxonomy for a relayed question.
///
/// `ConfigurationMissing` and `DatasetUnavailable` are startup-class and halt the
/// process.  `RemoteCallFailed` is per-request and is recovered into a fallback
/// message by the submission layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The named credential is absent at startup.
    #[error("required credential `{0}` is not configured")]
    ConfigurationMissing(String),
    /// The configured dataset could not be read.
    #[error("dataset `{path}` is unavailable: {reason}")]
    DatasetUnavailable {
        /// The configured path.
        path: String,
        /// Why it could not be used.
        reason: String,
    },
    /// The endpoint call failed for any reason.
    #[error("remote call failed: {0}")]
    RemoteCallFailed(String),
}

impl RelayError {
    /// Whether this error must stop the process.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RelayError::RemoteCallFailed(_))
    }
}

/// The outcome of one press of the submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The question box was empty; the relay was not invoked.
    MissingQuestion,
    /// The endpoint's text, unmodified.
    Advisory(String),
    /// The remote call failed; show `message` in place of the advisory and `notice` as a banner.
    Fallback {
        /// Text shown in place of the advisory.
        message: String,
        /// Non-fatal banner text.
        notice: String,
    },
}
