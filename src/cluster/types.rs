// ABOUTME: Value types exchanged with the cluster access capability.
// ABOUTME: Deployment snapshots, manifests, group/version/kind, create/delete outcomes.

use serde_json::Value;
use std::fmt;

/// Group, version and kind of an API object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    /// API group, empty for the core group.
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// The `apiVersion` field value (`group/version`, or `version` for core).
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// Lowercase plural resource name.
    ///
    /// Only valid for kinds with regular plurals, which covers every kind
    /// this crate creates (Namespace, Issuer, Certificate).
    pub fn plural(&self) -> String {
        format!("{}s", self.kind.to_lowercase())
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// A fully rendered object ready to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub gvk: GroupVersionKind,
    /// Namespace for namespaced kinds, `None` for cluster-scoped ones.
    pub namespace: Option<String>,
    pub name: String,
    /// Complete object body including `apiVersion`, `kind` and `metadata`.
    pub body: Value,
}

impl Manifest {
    /// `namespace/name` or just `name` for cluster-scoped objects.
    pub fn display_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}/{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

/// Result of a successful create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Result of a successful delete call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// A condition reported in a deployment's status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeploymentCondition {
    pub type_: String,
    pub status: String,
    pub reason: Option<String>,
}

/// The parts of a deployment object rollout evaluation and version
/// detection need.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeploymentSnapshot {
    pub name: String,
    pub generation: Option<i64>,
    pub observed_generation: Option<i64>,
    /// `spec.replicas`
    pub desired_replicas: Option<i32>,
    /// `status.replicas`
    pub replicas: i32,
    pub updated_replicas: i32,
    pub available_replicas: i32,
    pub conditions: Vec<DeploymentCondition>,
    /// Images of the pod template's containers, in declaration order.
    pub images: Vec<String>,
}

/// Rollout evaluation of a deployment snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutStatus {
    pub ready: bool,
    pub message: String,
}
