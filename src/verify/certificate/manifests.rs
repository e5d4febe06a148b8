// ABOUTME: Fixed-shape manifests for the ephemeral self-signed trust chain.
// ABOUTME: Namespace, Issuer and Certificate with deterministic names.

use serde_json::json;

use super::api::CertManagerApi;
use crate::cluster::{GroupVersionKind, Manifest};

pub const TEST_NAMESPACE: &str = "cert-manager-test";
pub const ISSUER_NAME: &str = "test-selfsigned";
pub const CERTIFICATE_NAME: &str = "selfsigned-cert";
pub const CERTIFICATE_SECRET: &str = "selfsigned-cert-tls";
pub const CERTIFICATE_DNS_NAME: &str = "example.com";

const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
const MANAGED_BY_VALUE: &str = "cert-manager-verifier";

/// The three objects of the test trust chain, in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrustChainManifests {
    pub namespace: Manifest,
    pub issuer: Manifest,
    pub certificate: Manifest,
}

impl TrustChainManifests {
    pub fn new(api: CertManagerApi) -> Self {
        Self {
            namespace: namespace(),
            issuer: issuer(api),
            certificate: certificate(api),
        }
    }

    /// Creation order: the namespace must exist before anything in it.
    pub fn in_creation_order(&self) -> [&Manifest; 3] {
        [&self.namespace, &self.issuer, &self.certificate]
    }

    /// Deletion order: dependents first.
    pub fn in_deletion_order(&self) -> [&Manifest; 3] {
        [&self.certificate, &self.issuer, &self.namespace]
    }
}

fn namespace() -> Manifest {
    let gvk = GroupVersionKind::new("", "v1", "Namespace");
    Manifest {
        body: json!({
            "apiVersion": gvk.api_version(),
            "kind": gvk.kind,
            "metadata": {
                "name": TEST_NAMESPACE,
                "labels": { (MANAGED_BY_LABEL): MANAGED_BY_VALUE },
            },
        }),
        gvk,
        namespace: None,
        name: TEST_NAMESPACE.to_string(),
    }
}

fn issuer(api: CertManagerApi) -> Manifest {
    let gvk = GroupVersionKind::new(api.group(), api.version(), "Issuer");
    Manifest {
        body: json!({
            "apiVersion": gvk.api_version(),
            "kind": gvk.kind,
            "metadata": {
                "name": ISSUER_NAME,
                "namespace": TEST_NAMESPACE,
                "labels": { (MANAGED_BY_LABEL): MANAGED_BY_VALUE },
            },
            "spec": {
                "selfSigned": {},
            },
        }),
        gvk,
        namespace: Some(TEST_NAMESPACE.to_string()),
        name: ISSUER_NAME.to_string(),
    }
}

fn certificate(api: CertManagerApi) -> Manifest {
    let gvk = GroupVersionKind::new(api.group(), api.version(), "Certificate");
    Manifest {
        body: json!({
            "apiVersion": gvk.api_version(),
            "kind": gvk.kind,
            "metadata": {
                "name": CERTIFICATE_NAME,
                "namespace": TEST_NAMESPACE,
                "labels": { (MANAGED_BY_LABEL): MANAGED_BY_VALUE },
            },
            "spec": {
                "dnsNames": [CERTIFICATE_DNS_NAME],
                "secretName": CERTIFICATE_SECRET,
                "issuerRef": {
                    "kind": "Issuer",
                    "name": ISSUER_NAME,
                },
            },
        }),
        gvk,
        namespace: Some(TEST_NAMESPACE.to_string()),
        name: CERTIFICATE_NAME.to_string(),
    }
}
