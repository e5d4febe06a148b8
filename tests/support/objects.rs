// ABOUTME: Builders for deployment snapshots and certificate objects.
// ABOUTME: Shapes match what the Kubernetes API returns.

use serde_json::{Value, json};

use cert_manager_verifier::cluster::DeploymentSnapshot;

/// A deployment whose rollout has completed.
pub fn ready_deployment(name: &str, image: &str) -> DeploymentSnapshot {
    DeploymentSnapshot {
        name: name.to_string(),
        generation: Some(1),
        observed_generation: Some(1),
        desired_replicas: Some(1),
        replicas: 1,
        updated_replicas: 1,
        available_replicas: 1,
        images: vec![image.to_string()],
        ..Default::default()
    }
}

/// A deployment whose single updated replica is not yet available.
pub fn unavailable_deployment(name: &str, image: &str) -> DeploymentSnapshot {
    DeploymentSnapshot {
        available_replicas: 0,
        ..ready_deployment(name, image)
    }
}

pub fn certificate_with_conditions(conditions: Value) -> Value {
    json!({
        "apiVersion": "cert-manager.io/v1",
        "kind": "Certificate",
        "metadata": {"name": "selfsigned-cert", "namespace": "cert-manager-test"},
        "status": {"conditions": conditions},
    })
}

pub fn ready_certificate() -> Value {
    certificate_with_conditions(json!([
        {"type": "Ready", "status": "True", "reason": "Ready"}
    ]))
}

pub fn pending_certificate() -> Value {
    certificate_with_conditions(json!([
        {"type": "Ready", "status": "False", "reason": "Issuing"}
    ]))
}

pub const CONTROLLER_IMAGE: &str = "quay.io/jetstack/cert-manager-controller:v1.14.4";
pub const CAINJECTOR_IMAGE: &str = "quay.io/jetstack/cert-manager-cainjector:v1.14.4";
pub const WEBHOOK_IMAGE: &str = "quay.io/jetstack/cert-manager-webhook:v1.14.4";
