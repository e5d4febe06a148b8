// ABOUTME: Verification of a cert-manager installation.
// ABOUTME: Deployment readiness, certificate issuance, and the orchestrator joining them.

pub mod certificate;
mod deployment;
mod error;
mod options;
mod orchestrator;
mod result;

pub use certificate::{CertManagerApi, verify_certificate};
pub use deployment::deployments_ready;
pub use error::{VerifyError, VerifyErrorKind};
pub use options::{
    DEFAULT_CLEANUP_TIMEOUT, DEFAULT_NAMESPACE, DeploymentDescriptor, VerifyOptions,
    default_deployments,
};
pub use orchestrator::verify;
pub use result::{CertificateStatus, DeploymentResult, DeploymentStatus, VerifyResult};
