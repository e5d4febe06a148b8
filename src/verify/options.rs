// ABOUTME: Inputs to a verification run: namespace, deployments, intervals.
// ABOUTME: Provides the default cert-manager deployment set.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::poll::DEFAULT_POLL_INTERVAL;

/// Namespace cert-manager is installed into by default.
pub const DEFAULT_NAMESPACE: &str = "cert-manager";

/// Upper bound for each cleanup delete call.
pub const DEFAULT_CLEANUP_TIMEOUT: Duration = Duration::from_secs(30);

/// A deployment the verifier waits for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentDescriptor {
    pub name: String,
    /// Optional deployments may be absent without failing verification.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl DeploymentDescriptor {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }

    fn with_prefix(&self, prefix: &str) -> Self {
        Self {
            name: format!("{prefix}{}", self.name),
            required: self.required,
        }
    }
}

/// The controller is required; cainjector and webhook are optional because
/// some installations run without them.
pub fn default_deployments() -> Vec<DeploymentDescriptor> {
    vec![
        DeploymentDescriptor::required("cert-manager"),
        DeploymentDescriptor::optional("cert-manager-cainjector"),
        DeploymentDescriptor::optional("cert-manager-webhook"),
    ]
}

/// Everything a verification run needs besides the cluster and deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Namespace cert-manager's deployments live in.
    pub namespace: String,
    /// Prepended to every deployment name, for installs under a release
    /// name (`my-release-cert-manager`).
    pub deployment_prefix: String,
    pub deployments: Vec<DeploymentDescriptor>,
    pub poll_interval: Duration,
    pub cleanup_timeout: Duration,
}

impl VerifyOptions {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            deployment_prefix: String::new(),
            deployments: default_deployments(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            cleanup_timeout: DEFAULT_CLEANUP_TIMEOUT,
        }
    }

    pub fn deployment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.deployment_prefix = prefix.into();
        self
    }

    pub fn deployments(mut self, deployments: Vec<DeploymentDescriptor>) -> Self {
        self.deployments = deployments;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn cleanup_timeout(mut self, timeout: Duration) -> Self {
        self.cleanup_timeout = timeout;
        self
    }

    /// Deployment descriptors with the prefix applied, in configured order.
    pub fn resolved_deployments(&self) -> Vec<DeploymentDescriptor> {
        self.deployments
            .iter()
            .map(|d| d.with_prefix(&self.deployment_prefix))
            .collect()
    }
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}
