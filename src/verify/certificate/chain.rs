// ABOUTME: The ephemeral trust chain and its lifecycle transitions.
// ABOUTME: create() and wait_ready() consume self; failures hand it back for cleanup.

use std::marker::PhantomData;
use std::time::Duration;

use tracing::{debug, info};

use super::api::CertManagerApi;
use super::manifests::TrustChainManifests;
use super::readiness::{Readiness, certificate_readiness};
use super::state::{Phase, Ready, Unknown, WaitingReady};
use crate::cluster::{ClusterError, ClusterOps, CreateOutcome, DeleteOutcome, Manifest};
use crate::diagnostics::{Diagnostics, Warning};
use crate::poll::{Deadline, PollOutcome, poll_until};
use crate::verify::VerifyError;

/// Result type for transitions that leave cleanup to the caller on failure.
pub type TransitionResult<T, S> = Result<TrustChain<T>, (TrustChain<S>, VerifyError)>;

/// Namespace, Issuer and Certificate created to prove issuance works.
#[derive(Debug)]
pub struct TrustChain<S> {
    api: CertManagerApi,
    manifests: TrustChainManifests,
    _state: PhantomData<S>,
}

impl TrustChain<Unknown> {
    pub fn new(api: CertManagerApi) -> Self {
        Self {
            api,
            manifests: TrustChainManifests::new(api),
            _state: PhantomData,
        }
    }

    /// Create the namespace, the issuer and the certificate, in that order.
    ///
    /// Each object is retried on transient errors until the deadline. An
    /// object that already exists counts as created.
    pub async fn create<C: ClusterOps + ?Sized>(
        self,
        client: &C,
        deadline: &Deadline,
        interval: Duration,
    ) -> TransitionResult<WaitingReady, Unknown> {
        let created = self.create_all(client, deadline, interval).await;
        match created {
            Ok(()) => Ok(self.transition()),
            Err(e) => Err((self, e)),
        }
    }

    async fn create_all<C: ClusterOps + ?Sized>(
        &self,
        client: &C,
        deadline: &Deadline,
        interval: Duration,
    ) -> Result<(), VerifyError> {
        for manifest in self.manifests.in_creation_order() {
            let kind = &manifest.gvk.kind;
            let name = manifest.display_name();
            match create_resource(client, manifest, deadline, interval).await? {
                CreateOutcome::Created => info!(%kind, %name, "created"),
                CreateOutcome::AlreadyExists => info!(%kind, %name, "already exists, reusing"),
            }
        }
        Ok(())
    }
}

impl TrustChain<WaitingReady> {
    /// Poll the certificate until its Ready condition is True.
    pub async fn wait_ready<C: ClusterOps + ?Sized>(
        self,
        client: &C,
        deadline: &Deadline,
        interval: Duration,
    ) -> TransitionResult<Ready, WaitingReady> {
        let certificate = &self.manifests.certificate;
        let gvk = &certificate.gvk;
        let namespace = certificate.namespace.as_deref();
        let name = certificate.name.as_str();

        let outcome = poll_until(deadline, interval, move || async move {
            match client.get_resource(gvk, namespace, name, Some("status")).await {
                Ok(Some(object)) => match certificate_readiness(&object) {
                    Ok(Readiness::Ready) => PollOutcome::Ready(()),
                    Ok(Readiness::NotReady(reason)) => PollOutcome::NotReady(reason),
                    Err(e) => PollOutcome::Error(e),
                },
                Ok(None) => PollOutcome::NotReady(format!("certificate {name} not found yet")),
                Err(e) if e.is_transient() => PollOutcome::NotReady(e.to_string()),
                Err(e) => PollOutcome::Error(VerifyError::from_cluster(e, &gvk.kind, name)),
            }
        })
        .await;

        let waiting_for = || format!("certificate {}", certificate.display_name());
        let error = match outcome {
            PollOutcome::Ready(()) => {
                info!(certificate = %certificate.display_name(), "certificate ready");
                return Ok(self.transition());
            }
            PollOutcome::NotReady(last) => VerifyError::timeout(waiting_for(), Some(last)),
            PollOutcome::TimedOut => VerifyError::timeout(waiting_for(), None),
            PollOutcome::Error(e) => e,
        };
        Err((self, error))
    }
}

impl<S: Phase> TrustChain<S> {
    pub fn api(&self) -> CertManagerApi {
        self.api
    }

    /// Delete every object of the chain, dependents first.
    ///
    /// Runs from any state, since a failed create may have left some of the
    /// objects behind. Each delete gets its own `timeout`, independent of
    /// the verification deadline. Objects that are already gone are fine;
    /// any other failure becomes a warning.
    pub async fn cleanup<C: ClusterOps + ?Sized>(
        self,
        client: &C,
        timeout: Duration,
    ) -> Diagnostics {
        let mut diagnostics = Diagnostics::default();
        debug!(phase = S::NAME, "cleaning up test resources");

        for manifest in self.manifests.in_deletion_order() {
            let target = format!("{} {}", manifest.gvk.kind, manifest.display_name());
            let delete = client.delete_resource(
                &manifest.gvk,
                manifest.namespace.as_deref(),
                &manifest.name,
            );

            match tokio::time::timeout(timeout, delete).await {
                Ok(Ok(DeleteOutcome::Deleted)) => debug!(resource = %target, "deleted"),
                Ok(Ok(DeleteOutcome::NotFound)) | Ok(Err(ClusterError::NotFound(_))) => {
                    debug!(resource = %target, "already gone")
                }
                Ok(Err(e)) => {
                    diagnostics.warn(Warning::cleanup(format!("failed to delete {target}: {e}")))
                }
                Err(_) => diagnostics.warn(Warning::cleanup(format!(
                    "timed out deleting {target} after {timeout:?}"
                ))),
            }
        }

        diagnostics
    }

    fn transition<T>(self) -> TrustChain<T> {
        TrustChain {
            api: self.api,
            manifests: self.manifests,
            _state: PhantomData,
        }
    }
}

async fn create_resource<C: ClusterOps + ?Sized>(
    client: &C,
    manifest: &Manifest,
    deadline: &Deadline,
    interval: Duration,
) -> Result<CreateOutcome, VerifyError> {
    let outcome = poll_until(deadline, interval, move || async move {
        match client.create_resource(manifest).await {
            Ok(outcome) => PollOutcome::Ready(outcome),
            Err(ClusterError::AlreadyExists(_)) => PollOutcome::Ready(CreateOutcome::AlreadyExists),
            Err(e) if e.is_transient() => {
                debug!(kind = %manifest.gvk.kind, error = %e, "create failed, retrying");
                PollOutcome::NotReady(e.to_string())
            }
            Err(e) => PollOutcome::Error(e),
        }
    })
    .await;

    let waiting_for = || format!("creation of {} {}", manifest.gvk.kind, manifest.display_name());
    match outcome {
        PollOutcome::Ready(created) => Ok(created),
        PollOutcome::NotReady(last) => Err(VerifyError::timeout(waiting_for(), Some(last))),
        PollOutcome::TimedOut => Err(VerifyError::timeout(waiting_for(), None)),
        PollOutcome::Error(ClusterError::Decode(message)) => {
            Err(VerifyError::InvalidManifest(message))
        }
        PollOutcome::Error(e) => Err(VerifyError::from_cluster(
            e,
            &manifest.gvk.kind,
            &manifest.display_name(),
        )),
    }
}
