// ABOUTME: Deployment readiness poller.
// ABOUTME: Visits every descriptor once, in order, under the shared deadline.

use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::VerifyError;
use super::options::DeploymentDescriptor;
use super::result::{DeploymentResult, DeploymentStatus};
use crate::cluster::{ClusterOps, DeploymentSnapshot};
use crate::diagnostics::{Diagnostics, Warning};
use crate::poll::{Deadline, PollOutcome, poll_until};
use crate::types::ImageRef;

/// Wait for each deployment in `deployments` to finish rolling out.
///
/// Always returns exactly one result per descriptor, in input order. A
/// failure on one deployment never stops the others from being checked,
/// though once the deadline has elapsed the remaining ones are recorded as
/// timed out without any API call.
pub async fn deployments_ready<C: ClusterOps + ?Sized>(
    client: &C,
    namespace: &str,
    deployments: &[DeploymentDescriptor],
    deadline: &Deadline,
    interval: Duration,
    diagnostics: &mut Diagnostics,
) -> Vec<DeploymentResult> {
    let mut results = Vec::with_capacity(deployments.len());

    for descriptor in deployments {
        let result =
            check_deployment(client, namespace, descriptor, deadline, interval, diagnostics).await;

        match &result.status {
            DeploymentStatus::Ready => info!(deployment = %descriptor.name, "deployment ready"),
            DeploymentStatus::NotFound => info!(
                deployment = %descriptor.name,
                required = descriptor.required,
                "deployment not found"
            ),
            _ => warn!(
                deployment = %descriptor.name,
                error = %result.error().map(|e| e.to_string()).unwrap_or_default(),
                "deployment not ready"
            ),
        }

        results.push(result);
    }

    results
}

async fn check_deployment<C: ClusterOps + ?Sized>(
    client: &C,
    namespace: &str,
    descriptor: &DeploymentDescriptor,
    deadline: &Deadline,
    interval: Duration,
    diagnostics: &mut Diagnostics,
) -> DeploymentResult {
    let name = descriptor.name.as_str();
    let finish = |status: DeploymentStatus| DeploymentResult::new(descriptor.clone(), status);

    if deadline.is_elapsed() {
        return finish(DeploymentStatus::TimedOut);
    }

    debug!(deployment = %name, %namespace, "fetching deployment");
    // The existence check doubles as the first rollout observation.
    let mut seeded = match deadline.run(client.get_deployment(namespace, name)).await {
        None => return finish(DeploymentStatus::TimedOut),
        Some(Ok(None)) => return finish(DeploymentStatus::NotFound),
        Some(Ok(Some(snapshot))) => Some(snapshot),
        Some(Err(e)) if e.is_transient() => None,
        Some(Err(e)) => {
            return finish(DeploymentStatus::Failed(VerifyError::from_cluster(
                e,
                "deployment",
                name,
            )));
        }
    };

    let outcome = poll_until(deadline, interval, move || {
        let seeded = seeded.take();
        async move {
            let fetched = match seeded {
                Some(snapshot) => Ok(Some(snapshot)),
                None => client.get_deployment(namespace, name).await,
            };
            match fetched {
                Ok(Some(snapshot)) => {
                    let rollout = client.rollout_status(&snapshot);
                    if rollout.ready {
                        PollOutcome::Ready(snapshot)
                    } else {
                        PollOutcome::NotReady(rollout.message)
                    }
                }
                Ok(None) => PollOutcome::NotReady(format!("deployment {name:?} disappeared")),
                Err(e) if e.is_transient() => PollOutcome::NotReady(e.to_string()),
                Err(e) => PollOutcome::Error(e),
            }
        }
    })
    .await;

    match outcome {
        PollOutcome::Ready(snapshot) => {
            let mut result = finish(DeploymentStatus::Ready);
            if descriptor.required {
                result.detected_version = detect_version(&snapshot, diagnostics);
            }
            result
        }
        PollOutcome::NotReady(message) => finish(DeploymentStatus::NotReady { message }),
        PollOutcome::TimedOut => finish(DeploymentStatus::TimedOut),
        PollOutcome::Error(e) => finish(DeploymentStatus::Failed(VerifyError::from_cluster(
            e,
            "deployment",
            name,
        ))),
    }
}

/// Read the version tag from the first container image. Failure only costs
/// the API version hint, so it is recorded as a warning.
fn detect_version(snapshot: &DeploymentSnapshot, diagnostics: &mut Diagnostics) -> Option<String> {
    let Some(image) = snapshot.images.first() else {
        diagnostics.warn(Warning::version_undetected(format!(
            "deployment {} has no container images",
            snapshot.name
        )));
        return None;
    };

    match ImageRef::parse(image) {
        Ok(image_ref) => match image_ref.tag() {
            Some(tag) => {
                debug!(deployment = %snapshot.name, version = %tag, "detected version");
                Some(tag.to_string())
            }
            None => {
                diagnostics.warn(Warning::version_undetected(format!(
                    "image {image} of deployment {} has no tag",
                    snapshot.name
                )));
                None
            }
        },
        Err(e) => {
            diagnostics.warn(Warning::version_undetected(format!(
                "cannot parse image {image:?} of deployment {}: {e}",
                snapshot.name
            )));
            None
        }
    }
}
