// ABOUTME: Certificate issuance check using a throwaway self-signed trust chain.
// ABOUTME: Create, wait for Ready, and always clean up, whatever the outcome.

mod api;
mod chain;
mod manifests;
mod readiness;
mod state;

use std::time::Duration;

use tracing::{info, warn};

pub use api::CertManagerApi;
pub use chain::{TransitionResult, TrustChain};
pub use manifests::{
    CERTIFICATE_DNS_NAME, CERTIFICATE_NAME, CERTIFICATE_SECRET, ISSUER_NAME, TEST_NAMESPACE,
    TrustChainManifests,
};
pub use readiness::{Readiness, certificate_readiness};
pub use state::{Phase, Ready, Unknown, WaitingReady};

use super::result::CertificateStatus;
use crate::cluster::ClusterOps;
use crate::diagnostics::Diagnostics;
use crate::poll::Deadline;

/// Provision the test trust chain and wait for the certificate to be issued.
///
/// The API version is chosen from `detected_version`. Cleanup runs in every
/// outcome and its failures are returned as warnings, never as the status.
pub async fn verify_certificate<C: ClusterOps + ?Sized>(
    client: &C,
    detected_version: Option<&str>,
    deadline: &Deadline,
    interval: Duration,
    cleanup_timeout: Duration,
) -> (CertificateStatus, Diagnostics) {
    let chain = TrustChain::new(CertManagerApi::for_version(detected_version));
    info!(api = %chain.api(), version = ?detected_version, "checking certificate issuance");

    let (status, diagnostics) = match chain.create(client, deadline, interval).await {
        Err((chain, e)) => (
            CertificateStatus::from_error(e),
            chain.cleanup(client, cleanup_timeout).await,
        ),
        Ok(chain) => match chain.wait_ready(client, deadline, interval).await {
            Ok(chain) => (
                CertificateStatus::Ready,
                chain.cleanup(client, cleanup_timeout).await,
            ),
            Err((chain, e)) => (
                CertificateStatus::from_error(e),
                chain.cleanup(client, cleanup_timeout).await,
            ),
        },
    };

    if let Some(e) = status.error() {
        warn!(error = %e, "certificate check failed");
    }
    (status, diagnostics)
}
