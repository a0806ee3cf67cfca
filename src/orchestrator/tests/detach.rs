//! Tests for volume detachment.

use crate::api::VolumeStatus;
use crate::orchestrator::StorageError;
use crate::test_support::{CloudCall, ScriptedCloud, node, volume};

use super::{GENEROUS_TIMEOUT, orchestrator};

#[tokio::test]
async fn detaches_with_force_and_waits_for_available() {
    let cloud = ScriptedCloud::new();
    cloud.set_nodes(vec![node("srv-1", "10.0.0.5", &[Some("vol-1")])]);
    // First describe feeds the attachment listing, second feeds the wait.
    cloud.push_describe(Ok(vec![volume(
        "vol-1",
        10,
        "fr-par-1",
        VolumeStatus::InUse,
    )]));
    cloud.push_describe(Ok(vec![volume(
        "vol-1",
        10,
        "fr-par-1",
        VolumeStatus::Available,
    )]));
    let subject = orchestrator(&cloud);

    subject
        .detach_volume("vol-1", "10.0.0.5", GENEROUS_TIMEOUT)
        .await
        .unwrap_or_else(|err| panic!("detachment should succeed: {err}"));

    let detached = cloud.calls().iter().any(|call| {
        matches!(
            call,
            CloudCall::Detach {
                volume_id,
                force: true,
                instance_id,
            } if volume_id == "vol-1" && instance_id == "srv-1"
        )
    });
    assert!(detached, "detach must use force semantics");
}

#[tokio::test]
async fn absent_volume_fails_with_volume_not_attached() {
    let cloud = ScriptedCloud::new();
    cloud.set_nodes(vec![node("srv-1", "10.0.0.5", &[Some("vol-other")])]);
    cloud.push_describe(Ok(vec![volume(
        "vol-other",
        10,
        "fr-par-1",
        VolumeStatus::InUse,
    )]));
    let subject = orchestrator(&cloud);

    let err = subject
        .detach_volume("vol-1", "10.0.0.5", GENEROUS_TIMEOUT)
        .await
        .expect_err("a volume missing from the machine must fail");

    assert_eq!(
        err,
        StorageError::VolumeNotAttached {
            volume_id: String::from("vol-1"),
            address: String::from("10.0.0.5"),
        }
    );
    assert!(
        !cloud
            .calls()
            .iter()
            .any(|call| matches!(call, CloudCall::Detach { .. })),
        "no detach call may reach the provider"
    );
}

#[tokio::test]
async fn unknown_address_fails_with_node_not_found() {
    let cloud = ScriptedCloud::new();
    let subject = orchestrator(&cloud);

    let err = subject
        .detach_volume("vol-1", "10.0.0.5", GENEROUS_TIMEOUT)
        .await
        .expect_err("an empty fleet must fail resolution");

    assert!(matches!(err, StorageError::NodeNotFound { .. }));
}
