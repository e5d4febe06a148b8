// ABOUTME: Error taxonomy for deployment and certificate verification.
// ABOUTME: Errors are attached to results rather than aborting the run.

use crate::cluster::ClusterError;

/// Why a deployment or the certificate phase did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// The object does not exist.
    #[error("{kind} {name} not found")]
    NotFound { kind: String, name: String },

    /// A retryable API failure that was still failing when it surfaced.
    #[error("transient API error: {0}")]
    Transient(String),

    /// The deadline elapsed while waiting or retrying.
    #[error("timed out waiting for {waiting_for}{}", last_status.as_ref().map(|s| format!(" (last status: {s})")).unwrap_or_default())]
    Timeout {
        waiting_for: String,
        last_status: Option<String>,
    },

    /// A status object did not have the expected shape.
    #[error("malformed status: {0}")]
    MalformedStatus(String),

    /// The API refused the request and retrying will not help.
    #[error("request rejected ({code}): {message}")]
    Rejected { code: u16, message: String },

    /// A manifest could not be encoded for the API.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyErrorKind {
    NotFound,
    Transient,
    Timeout,
    MalformedStatus,
    Rejected,
    InvalidManifest,
}

impl VerifyError {
    pub fn timeout(waiting_for: impl Into<String>, last_status: Option<String>) -> Self {
        VerifyError::Timeout {
            waiting_for: waiting_for.into(),
            last_status,
        }
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> VerifyErrorKind {
        match self {
            VerifyError::NotFound { .. } => VerifyErrorKind::NotFound,
            VerifyError::Transient(_) => VerifyErrorKind::Transient,
            VerifyError::Timeout { .. } => VerifyErrorKind::Timeout,
            VerifyError::MalformedStatus(_) => VerifyErrorKind::MalformedStatus,
            VerifyError::Rejected { .. } => VerifyErrorKind::Rejected,
            VerifyError::InvalidManifest(_) => VerifyErrorKind::InvalidManifest,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == VerifyErrorKind::Timeout
    }

    /// Convert a cluster error raised while handling `kind`/`name`.
    pub fn from_cluster(err: ClusterError, kind: &str, name: &str) -> Self {
        match err {
            ClusterError::NotFound(_) => VerifyError::NotFound {
                kind: kind.to_string(),
                name: name.to_string(),
            },
            ClusterError::Transient(message) => VerifyError::Transient(message),
            ClusterError::Rejected { code, message } => VerifyError::Rejected { code, message },
            ClusterError::AlreadyExists(message) => VerifyError::Rejected {
                code: 409,
                message,
            },
            ClusterError::Unsupported(message) => VerifyError::Rejected { code: 400, message },
            ClusterError::Decode(message) => VerifyError::MalformedStatus(message),
        }
    }
}
