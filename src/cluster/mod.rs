// ABOUTME: Cluster access capability consumed by the verification engine.
// ABOUTME: Defines the ClusterOps trait, its value types, and the kube-rs implementation.

mod error;
mod kube_client;
mod rollout;
mod types;

pub use error::{ClusterError, ConnectError, ConnectErrorKind};
pub use kube_client::KubeCluster;
pub use rollout::rollout_status;
pub use types::{
    CreateOutcome, DeleteOutcome, DeploymentCondition, DeploymentSnapshot, GroupVersionKind,
    Manifest, RolloutStatus,
};

use async_trait::async_trait;
use serde_json::Value;

/// Operations the verifier needs from a cluster.
///
/// Absence is reported as `Ok(None)` / `NotFound` outcomes rather than
/// errors so callers can tell "gone" apart from "failed".
#[async_trait]
pub trait ClusterOps: Send + Sync {
    /// Fetch a deployment, `None` if it does not exist.
    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DeploymentSnapshot>, ClusterError>;

    /// Evaluate whether a deployment has finished rolling out.
    fn rollout_status(&self, deployment: &DeploymentSnapshot) -> RolloutStatus {
        rollout_status(deployment)
    }

    /// Create an object. An existing object with the same name is reported
    /// as `AlreadyExists`, not as an error.
    async fn create_resource(&self, manifest: &Manifest) -> Result<CreateOutcome, ClusterError>;

    /// Fetch an object, or one of its subresources, as JSON.
    async fn get_resource(
        &self,
        gvk: &GroupVersionKind,
        namespace: Option<&str>,
        name: &str,
        subresource: Option<&str>,
    ) -> Result<Option<Value>, ClusterError>;

    /// Delete an object. A missing object is reported as `NotFound`.
    async fn delete_resource(
        &self,
        gvk: &GroupVersionKind,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DeleteOutcome, ClusterError>;
}
