// ABOUTME: Deployment rollout evaluation, equivalent to `kubectl rollout status`.
// ABOUTME: Compares desired, updated and available replica counts.

use super::types::{DeploymentSnapshot, RolloutStatus};

const PROGRESS_DEADLINE_EXCEEDED: &str = "ProgressDeadlineExceeded";

/// Decide whether a deployment has finished rolling out.
pub fn rollout_status(deployment: &DeploymentSnapshot) -> RolloutStatus {
    let name = &deployment.name;
    let generation = deployment.generation.unwrap_or(0);
    let observed = deployment.observed_generation.unwrap_or(0);

    if generation > observed {
        return waiting("Waiting for deployment spec update to be observed...".to_string());
    }

    let deadline_exceeded = deployment.conditions.iter().any(|c| {
        c.type_ == "Progressing" && c.reason.as_deref() == Some(PROGRESS_DEADLINE_EXCEEDED)
    });
    if deadline_exceeded {
        return waiting(format!("deployment {name:?} exceeded its progress deadline"));
    }

    if let Some(desired) = deployment.desired_replicas
        && deployment.updated_replicas < desired
    {
        return waiting(format!(
            "Waiting for deployment {name:?} rollout to finish: {} out of {} new replicas have been updated...",
            deployment.updated_replicas, desired
        ));
    }

    if deployment.replicas > deployment.updated_replicas {
        return waiting(format!(
            "Waiting for deployment {name:?} rollout to finish: {} old replicas are pending termination...",
            deployment.replicas - deployment.updated_replicas
        ));
    }

    if deployment.available_replicas < deployment.updated_replicas {
        return waiting(format!(
            "Waiting for deployment {name:?} rollout to finish: {} of {} updated replicas are available...",
            deployment.available_replicas, deployment.updated_replicas
        ));
    }

    RolloutStatus {
        ready: true,
        message: format!("deployment {name:?} successfully rolled out"),
    }
}

fn waiting(message: String) -> RolloutStatus {
    RolloutStatus {
        ready: false,
        message,
    }
}
