// ABOUTME: Property tests for the deployment poller.
// ABOUTME: One result per descriptor, in input order, whatever the cluster reports.

mod support;

use proptest::prelude::*;
use std::time::Duration;

use cert_manager_verifier::cluster::ClusterError;
use cert_manager_verifier::diagnostics::Diagnostics;
use cert_manager_verifier::poll::Deadline;
use cert_manager_verifier::verify::{DeploymentDescriptor, deployments_ready};
use support::fake_cluster::FakeCluster;
use support::objects::{CONTROLLER_IMAGE, ready_deployment, unavailable_deployment};

#[derive(Debug, Clone, Copy)]
enum Observed {
    Ready,
    Absent,
    Unavailable,
    Rejected,
}

fn observed() -> impl Strategy<Value = Observed> {
    prop_oneof![
        Just(Observed::Ready),
        Just(Observed::Absent),
        Just(Observed::Unavailable),
        Just(Observed::Rejected),
    ]
}

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn one_result_per_descriptor_in_order(
        specs in prop::collection::vec((any::<bool>(), observed()), 0..8),
    ) {
        let mut cluster = FakeCluster::new();
        let mut descriptors = Vec::new();
        for (i, (required, observed)) in specs.iter().enumerate() {
            let name = format!("deployment-{i}");
            cluster = match observed {
                Observed::Ready => cluster.with_deployment(ready_deployment(&name, CONTROLLER_IMAGE)),
                Observed::Absent => cluster,
                Observed::Unavailable => {
                    cluster.with_deployment(unavailable_deployment(&name, CONTROLLER_IMAGE))
                }
                Observed::Rejected => cluster.script_deployment(
                    &name,
                    vec![Err(ClusterError::Rejected { code: 403, message: "forbidden".to_string() })],
                ),
            };
            descriptors.push(if *required {
                DeploymentDescriptor::required(name)
            } else {
                DeploymentDescriptor::optional(name)
            });
        }

        let results = paused_runtime().block_on(async {
            let deadline = Deadline::after(Duration::from_secs(1));
            let mut diagnostics = Diagnostics::default();
            deployments_ready(
                &cluster,
                "cert-manager",
                &descriptors,
                &deadline,
                Duration::from_millis(100),
                &mut diagnostics,
            )
            .await
        });

        prop_assert_eq!(results.len(), descriptors.len());
        for (result, descriptor) in results.iter().zip(&descriptors) {
            prop_assert_eq!(&result.deployment, descriptor);
        }
    }
}
