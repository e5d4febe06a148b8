// ABOUTME: Outcome types for deployments, the certificate phase, and the whole run.
// ABOUTME: Success flags are derived from tagged statuses, never stored.

use super::error::VerifyError;
use super::options::DeploymentDescriptor;
use crate::diagnostics::Warning;

/// Final state of one deployment after polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentStatus {
    /// Rollout complete.
    Ready,
    /// No deployment with this name exists.
    NotFound,
    /// Polled until the deadline without completing its rollout.
    NotReady { message: String },
    /// The deadline elapsed before any rollout status was observed.
    TimedOut,
    /// A non-retryable API error.
    Failed(VerifyError),
}

/// Result for a single deployment descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResult {
    pub deployment: DeploymentDescriptor,
    pub status: DeploymentStatus,
    /// Version tag of the first container image, only read for required
    /// deployments once they are ready.
    pub detected_version: Option<String>,
}

impl DeploymentResult {
    pub fn new(deployment: DeploymentDescriptor, status: DeploymentStatus) -> Self {
        Self {
            deployment,
            status,
            detected_version: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.deployment.name
    }

    /// Ready, or absent while optional.
    pub fn is_satisfied(&self) -> bool {
        match self.status {
            DeploymentStatus::Ready => true,
            DeploymentStatus::NotFound => !self.deployment.required,
            _ => false,
        }
    }

    /// The error explaining a non-ready status, if any.
    pub fn error(&self) -> Option<VerifyError> {
        let waiting_for = || format!("deployment {}", self.deployment.name);
        match &self.status {
            DeploymentStatus::Ready | DeploymentStatus::NotFound => None,
            DeploymentStatus::NotReady { message } => {
                Some(VerifyError::timeout(waiting_for(), Some(message.clone())))
            }
            DeploymentStatus::TimedOut => Some(VerifyError::timeout(waiting_for(), None)),
            DeploymentStatus::Failed(e) => Some(e.clone()),
        }
    }
}

/// Final state of the certificate phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateStatus {
    /// Not attempted because deployments were not ready.
    Skipped,
    /// The test certificate reached Ready=True.
    Ready,
    /// The deadline elapsed while creating resources or waiting for issuance.
    TimedOut(VerifyError),
    /// A non-retryable failure.
    Failed(VerifyError),
}

impl CertificateStatus {
    pub fn error(&self) -> Option<&VerifyError> {
        match self {
            CertificateStatus::Skipped | CertificateStatus::Ready => None,
            CertificateStatus::TimedOut(e) | CertificateStatus::Failed(e) => Some(e),
        }
    }

    /// Classify an error into the matching terminal status.
    pub fn from_error(error: VerifyError) -> Self {
        if error.is_timeout() {
            CertificateStatus::TimedOut(error)
        } else {
            CertificateStatus::Failed(error)
        }
    }
}

/// Aggregated outcome of one verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    pub deployments: Vec<DeploymentResult>,
    pub certificate: CertificateStatus,
    pub warnings: Vec<Warning>,
}

impl VerifyResult {
    /// Deployments succeeded and the certificate became ready.
    pub fn success(&self) -> bool {
        self.deployments_success() && self.certificate_success()
    }

    /// Every required deployment is ready and every optional one is ready
    /// or absent.
    pub fn deployments_success(&self) -> bool {
        self.deployments.iter().all(DeploymentResult::is_satisfied)
    }

    pub fn certificate_success(&self) -> bool {
        self.certificate == CertificateStatus::Ready
    }

    pub fn deployment_results(&self) -> &[DeploymentResult] {
        &self.deployments
    }

    /// `None` when the certificate became ready or the phase was skipped.
    pub fn certificate_error(&self) -> Option<&VerifyError> {
        self.certificate.error()
    }

    /// Version read from the first required deployment that reported one.
    pub fn detected_version(&self) -> Option<&str> {
        detected_version(&self.deployments)
    }
}

pub(crate) fn detected_version(results: &[DeploymentResult]) -> Option<&str> {
    results
        .iter()
        .filter(|r| r.deployment.required)
        .find_map(|r| r.detected_version.as_deref())
}
