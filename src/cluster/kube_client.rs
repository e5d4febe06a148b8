// ABOUTME: ClusterOps implementation backed by a kube-rs client.
// ABOUTME: Typed access for Deployments, DynamicObject access for everything else.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{Api, DeleteParams, DynamicObject, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::discovery::ApiResource;
use kube::{Client, Config};
use serde_json::Value;
use snafu::ResultExt;
use std::path::Path;
use tracing::debug;

use super::error::{ClientSnafu, ClusterError, ConnectError, InferSnafu, KubeconfigSnafu};
use super::types::{
    CreateOutcome, DeleteOutcome, DeploymentCondition, DeploymentSnapshot, GroupVersionKind,
    Manifest,
};
use super::ClusterOps;

/// Cluster access over the Kubernetes API.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from an explicit kubeconfig and/or context, falling
    /// back to the standard inference chain (KUBECONFIG, ~/.kube/config,
    /// in-cluster service account) when neither is given.
    pub async fn connect(
        kubeconfig: Option<&Path>,
        context: Option<&str>,
    ) -> Result<Self, ConnectError> {
        let options = KubeConfigOptions {
            context: context.map(str::to_string),
            ..Default::default()
        };

        let config = match (kubeconfig, context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path).context(KubeconfigSnafu)?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .context(KubeconfigSnafu)?
            }
            (None, Some(_)) => Config::from_kubeconfig(&options)
                .await
                .context(KubeconfigSnafu)?,
            (None, None) => Config::infer().await.context(InferSnafu)?,
        };

        debug!(cluster_url = %config.cluster_url, "connecting to cluster");
        let client = Client::try_from(config).context(ClientSnafu)?;
        Ok(Self::new(client))
    }

    fn dynamic_api(&self, gvk: &GroupVersionKind, namespace: Option<&str>) -> Api<DynamicObject> {
        let ar = api_resource(gvk);
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &ar),
            None => Api::all_with(self.client.clone(), &ar),
        }
    }
}

#[async_trait]
impl ClusterOps for KubeCluster {
    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DeploymentSnapshot>, ClusterError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let deployment = api.get_opt(name).await.map_err(classify)?;
        Ok(deployment.as_ref().map(snapshot))
    }

    async fn create_resource(&self, manifest: &Manifest) -> Result<CreateOutcome, ClusterError> {
        let obj: DynamicObject = serde_json::from_value(manifest.body.clone())
            .map_err(|e| ClusterError::Decode(format!("{}: {}", manifest.display_name(), e)))?;

        let api = self.dynamic_api(&manifest.gvk, manifest.namespace.as_deref());
        match api.create(&PostParams::default(), &obj).await.map_err(classify) {
            Ok(_) => Ok(CreateOutcome::Created),
            Err(ClusterError::AlreadyExists(_)) => Ok(CreateOutcome::AlreadyExists),
            Err(e) => Err(e),
        }
    }

    async fn get_resource(
        &self,
        gvk: &GroupVersionKind,
        namespace: Option<&str>,
        name: &str,
        subresource: Option<&str>,
    ) -> Result<Option<Value>, ClusterError> {
        let api = self.dynamic_api(gvk, namespace);
        let obj = match subresource {
            None => api.get_opt(name).await.map_err(classify)?,
            Some("status") => match api.get_status(name).await.map_err(classify) {
                Ok(obj) => Some(obj),
                Err(ClusterError::NotFound(_)) => None,
                Err(e) => return Err(e),
            },
            Some(other) => {
                return Err(ClusterError::Unsupported(format!(
                    "subresource {other:?} of {gvk}"
                )));
            }
        };

        obj.map(|o| serde_json::to_value(o).map_err(|e| ClusterError::Decode(e.to_string())))
            .transpose()
    }

    async fn delete_resource(
        &self,
        gvk: &GroupVersionKind,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DeleteOutcome, ClusterError> {
        let api = self.dynamic_api(gvk, namespace);
        match api
            .delete(name, &DeleteParams::background())
            .await
            .map_err(classify)
        {
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(ClusterError::NotFound(_)) => Ok(DeleteOutcome::NotFound),
            Err(e) => Err(e),
        }
    }
}

fn api_resource(gvk: &GroupVersionKind) -> ApiResource {
    let kube_gvk = kube::core::GroupVersionKind::gvk(&gvk.group, &gvk.version, &gvk.kind);
    ApiResource::from_gvk_with_plural(&kube_gvk, &gvk.plural())
}

fn classify(err: kube::Error) -> ClusterError {
    match err {
        kube::Error::Api(response) => {
            ClusterError::from_status(response.code, &response.reason, response.message)
        }
        kube::Error::SerdeError(e) => ClusterError::Decode(e.to_string()),
        other => ClusterError::Transient(other.to_string()),
    }
}

fn snapshot(deployment: &Deployment) -> DeploymentSnapshot {
    let spec = deployment.spec.as_ref();
    let status = deployment.status.as_ref();

    let images = spec
        .and_then(|s| s.template.spec.as_ref())
        .map(|pod| {
            pod.containers
                .iter()
                .filter_map(|c| c.image.clone())
                .collect()
        })
        .unwrap_or_default();

    let conditions = status
        .and_then(|s| s.conditions.as_ref())
        .map(|conditions| {
            conditions
                .iter()
                .map(|c| DeploymentCondition {
                    type_: c.type_.clone(),
                    status: c.status.clone(),
                    reason: c.reason.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    DeploymentSnapshot {
        name: deployment.metadata.name.clone().unwrap_or_default(),
        generation: deployment.metadata.generation,
        observed_generation: status.and_then(|s| s.observed_generation),
        desired_replicas: spec.and_then(|s| s.replicas),
        replicas: status.and_then(|s| s.replicas).unwrap_or(0),
        updated_replicas: status.and_then(|s| s.updated_replicas).unwrap_or(0),
        available_replicas: status.and_then(|s| s.available_replicas).unwrap_or(0),
        conditions,
        images,
    }
}
