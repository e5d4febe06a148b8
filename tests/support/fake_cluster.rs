// ABOUTME: Scriptable in-memory ClusterOps implementation.
// ABOUTME: Replies are queued per object; the last reply repeats once the queue drains.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

use cert_manager_verifier::cluster::{
    ClusterError, ClusterOps, CreateOutcome, DeleteOutcome, DeploymentSnapshot, GroupVersionKind,
    Manifest,
};

use super::objects;

/// One recorded API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetDeployment {
        namespace: String,
        name: String,
    },
    Create {
        api_version: String,
        kind: String,
        name: String,
    },
    GetResource {
        kind: String,
        name: String,
    },
    Delete {
        kind: String,
        name: String,
    },
}

impl Call {
    pub fn kind(&self) -> Option<&str> {
        match self {
            Call::GetDeployment { .. } => None,
            Call::Create { kind, .. } | Call::GetResource { kind, .. } | Call::Delete { kind, .. } => {
                Some(kind)
            }
        }
    }
}

type Reply<T> = Result<T, ClusterError>;

/// Queue of replies; the final entry is sticky.
struct Script<T>(VecDeque<T>);

impl<T: Clone> Script<T> {
    fn new(replies: Vec<T>) -> Self {
        Self(replies.into())
    }

    fn next(&mut self) -> Option<T> {
        if self.0.len() > 1 {
            self.0.pop_front()
        } else {
            self.0.front().cloned()
        }
    }
}

#[derive(Default)]
struct State {
    deployments: HashMap<String, Script<Reply<Option<DeploymentSnapshot>>>>,
    creates: HashMap<String, Script<Reply<CreateOutcome>>>,
    certificate: Option<Script<Reply<Option<Value>>>>,
    deletes: HashMap<String, Reply<DeleteOutcome>>,
    hang_deletes: bool,
    calls: Vec<Call>,
}

/// In-memory cluster. Unscripted deployments are absent, creates and
/// deletes succeed, and the certificate is immediately ready.
#[derive(Default)]
pub struct FakeCluster {
    state: Mutex<State>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// A deployment that always returns `snapshot`.
    pub fn with_deployment(self, snapshot: DeploymentSnapshot) -> Self {
        let name = snapshot.name.clone();
        self.script_deployment(&name, vec![Ok(Some(snapshot))])
    }

    pub fn script_deployment(
        self,
        name: &str,
        replies: Vec<Reply<Option<DeploymentSnapshot>>>,
    ) -> Self {
        self.state
            .lock()
            .deployments
            .insert(name.to_string(), Script::new(replies));
        self
    }

    /// Replies to create calls for objects of `kind`.
    pub fn script_create(self, kind: &str, replies: Vec<Reply<CreateOutcome>>) -> Self {
        self.state
            .lock()
            .creates
            .insert(kind.to_string(), Script::new(replies));
        self
    }

    /// Replies to reads of the test certificate's status.
    pub fn script_certificate(self, replies: Vec<Reply<Option<Value>>>) -> Self {
        self.state.lock().certificate = Some(Script::new(replies));
        self
    }

    pub fn script_delete(self, kind: &str, reply: Reply<DeleteOutcome>) -> Self {
        self.state.lock().deletes.insert(kind.to_string(), reply);
        self
    }

    /// Delete calls never complete.
    pub fn hang_deletes(self) -> Self {
        self.state.lock().hang_deletes = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// `(api_version, kind)` of each create, in call order.
    pub fn creates(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create {
                    api_version, kind, ..
                } => Some((api_version, kind)),
                _ => None,
            })
            .collect()
    }

    /// `(kind, name)` of each delete, in call order.
    pub fn deletes(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete { kind, name } => Some((kind, name)),
                _ => None,
            })
            .collect()
    }

    pub fn calls_for_kind(&self, kind: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.kind() == Some(kind))
            .count()
    }

    /// Names passed to `get_deployment`, in call order.
    pub fn deployment_lookups(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::GetDeployment { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ClusterOps for FakeCluster {
    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DeploymentSnapshot>, ClusterError> {
        let mut state = self.state.lock();
        state.calls.push(Call::GetDeployment {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        state
            .deployments
            .get_mut(name)
            .and_then(Script::next)
            .unwrap_or(Ok(None))
    }

    async fn create_resource(&self, manifest: &Manifest) -> Result<CreateOutcome, ClusterError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Create {
            api_version: manifest.gvk.api_version(),
            kind: manifest.gvk.kind.clone(),
            name: manifest.name.clone(),
        });
        state
            .creates
            .get_mut(&manifest.gvk.kind)
            .and_then(Script::next)
            .unwrap_or(Ok(CreateOutcome::Created))
    }

    async fn get_resource(
        &self,
        gvk: &GroupVersionKind,
        _namespace: Option<&str>,
        name: &str,
        _subresource: Option<&str>,
    ) -> Result<Option<Value>, ClusterError> {
        let mut state = self.state.lock();
        state.calls.push(Call::GetResource {
            kind: gvk.kind.clone(),
            name: name.to_string(),
        });
        state
            .certificate
            .as_mut()
            .and_then(Script::next)
            .unwrap_or_else(|| Ok(Some(objects::ready_certificate())))
    }

    async fn delete_resource(
        &self,
        gvk: &GroupVersionKind,
        _namespace: Option<&str>,
        name: &str,
    ) -> Result<DeleteOutcome, ClusterError> {
        let (hang, reply) = {
            let mut state = self.state.lock();
            state.calls.push(Call::Delete {
                kind: gvk.kind.clone(),
                name: name.to_string(),
            });
            let reply = state
                .deletes
                .get(&gvk.kind)
                .cloned()
                .unwrap_or(Ok(DeleteOutcome::Deleted));
            (state.hang_deletes, reply)
        };

        if hang {
            std::future::pending::<()>().await;
        }
        reply
    }
}
