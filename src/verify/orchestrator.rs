// ABOUTME: Runs the deployment check then the certificate check under one deadline.
// ABOUTME: Never fails; every outcome is represented in VerifyResult.

use tracing::{Instrument, debug, info, info_span};

use super::certificate::verify_certificate;
use super::deployment::deployments_ready;
use super::options::VerifyOptions;
use super::result::{CertificateStatus, VerifyResult, detected_version};
use crate::cluster::ClusterOps;
use crate::diagnostics::Diagnostics;
use crate::poll::Deadline;

/// Verify a cert-manager installation.
///
/// The certificate phase is skipped when the deployment phase did not
/// succeed, since issuance cannot work without a running controller.
pub async fn verify<C: ClusterOps + ?Sized>(
    client: &C,
    deadline: Deadline,
    options: &VerifyOptions,
) -> VerifyResult {
    let span = info_span!("verify", namespace = %options.namespace);
    run(client, &deadline, options).instrument(span).await
}

async fn run<C: ClusterOps + ?Sized>(
    client: &C,
    deadline: &Deadline,
    options: &VerifyOptions,
) -> VerifyResult {
    let mut diagnostics = Diagnostics::default();
    let deployments = options.resolved_deployments();

    let results = deployments_ready(
        client,
        &options.namespace,
        &deployments,
        deadline,
        options.poll_interval,
        &mut diagnostics,
    )
    .await;

    let mut verify = VerifyResult {
        deployments: results,
        certificate: CertificateStatus::Skipped,
        warnings: Vec::new(),
    };

    if verify.deployments_success() {
        let version = detected_version(&verify.deployments).map(str::to_owned);
        debug!(remaining = ?deadline.remaining(), "deployments ready, checking certificate issuance");
        let (status, cleanup) = verify_certificate(
            client,
            version.as_deref(),
            deadline,
            options.poll_interval,
            options.cleanup_timeout,
        )
        .await;
        verify.certificate = status;
        diagnostics.extend(cleanup);
    } else {
        info!("deployments not ready, skipping certificate check");
    }

    verify.warnings = diagnostics.warnings().to_vec();
    info!(success = verify.success(), "verification finished");
    verify
}
