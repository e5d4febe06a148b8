// ABOUTME: Cluster API error classification and client connection errors.
// ABOUTME: ClusterError drives retry decisions; ConnectError uses the SNAFU pattern.

use snafu::Snafu;

/// A classified failure from the cluster API.
///
/// The variant decides what callers do: `Transient` is retried until the
/// deadline, `NotFound` and `AlreadyExists` are often benign, everything else
/// is permanent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClusterError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("transient API error: {0}")]
    Transient(String),

    #[error("request rejected ({code}): {message}")]
    Rejected { code: u16, message: String },

    #[error("unsupported request: {0}")]
    Unsupported(String),

    #[error("failed to decode API object: {0}")]
    Decode(String),
}

impl ClusterError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClusterError::Transient(_))
    }

    /// Classify an HTTP status code returned by the API server.
    pub fn from_status(code: u16, reason: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            404 => ClusterError::NotFound(message),
            409 if reason == "AlreadyExists" => ClusterError::AlreadyExists(message),
            // A namespace left over from an earlier run is still being deleted.
            403 if is_namespace_terminating(reason, &message) => ClusterError::Transient(message),
            408 | 409 | 425 | 429 | 500..=599 => ClusterError::Transient(message),
            _ => ClusterError::Rejected { code, message },
        }
    }
}

const NAMESPACE_TERMINATING_REASON: &str = "NamespaceTerminating";
const NAMESPACE_TERMINATING_MESSAGE: &str = "because it is being terminated";

fn is_namespace_terminating(reason: &str, message: &str) -> bool {
    reason == NAMESPACE_TERMINATING_REASON || message.contains(NAMESPACE_TERMINATING_MESSAGE)
}

/// Failure to build a client for the target cluster.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConnectError {
    #[snafu(display("failed to load kubeconfig: {source}"))]
    Kubeconfig {
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("failed to infer cluster configuration: {source}"))]
    Infer {
        source: kube::config::InferConfigError,
    },

    #[snafu(display("failed to build cluster client: {source}"))]
    Client { source: kube::Error },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectErrorKind {
    /// The kubeconfig file or selected context could not be used.
    Kubeconfig,
    /// Neither in-cluster nor kubeconfig configuration was found.
    NoConfiguration,
    /// Configuration was found but the HTTP client could not be built.
    Client,
}

impl ConnectError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ConnectErrorKind {
        match self {
            ConnectError::Kubeconfig { .. } => ConnectErrorKind::Kubeconfig,
            ConnectError::Infer { .. } => ConnectErrorKind::NoConfiguration,
            ConnectError::Client { .. } => ConnectErrorKind::Client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_codes() {
        assert_eq!(
            ClusterError::from_status(404, "NotFound", "gone"),
            ClusterError::NotFound("gone".to_string())
        );
        assert_eq!(
            ClusterError::from_status(409, "AlreadyExists", "dup"),
            ClusterError::AlreadyExists("dup".to_string())
        );
        assert!(ClusterError::from_status(409, "Conflict", "stale").is_transient());
        assert!(ClusterError::from_status(429, "TooManyRequests", "slow down").is_transient());
        assert!(ClusterError::from_status(500, "InternalError", "webhook").is_transient());
        assert_eq!(
            ClusterError::from_status(422, "Invalid", "bad spec"),
            ClusterError::Rejected {
                code: 422,
                message: "bad spec".to_string()
            }
        );
    }

    #[test]
    fn terminating_namespace_is_transient() {
        let terminating = ClusterError::from_status(
            403,
            "Forbidden",
            "issuers.cert-manager.io \"test-selfsigned\" is forbidden: unable to create new content in namespace cert-manager-test because it is being terminated",
        );
        assert!(terminating.is_transient());
        assert!(ClusterError::from_status(403, "NamespaceTerminating", "denied").is_transient());
        assert_eq!(
            ClusterError::from_status(403, "Forbidden", "RBAC: access denied"),
            ClusterError::Rejected {
                code: 403,
                message: "RBAC: access denied".to_string()
            }
        );
    }

    #[test]
    fn only_transient_is_retryable() {
        assert!(!ClusterError::NotFound(String::new()).is_transient());
        assert!(
            !ClusterError::Rejected {
                code: 403,
                message: String::new()
            }
            .is_transient()
        );
    }
}
