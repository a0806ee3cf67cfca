//! Tests for volume attachment.

use crate::api::VolumeStatus;
use crate::orchestrator::StorageError;
use crate::test_support::{CloudCall, ScriptedCloud, ScriptedCloudError, node, volume};

use super::{GENEROUS_TIMEOUT, orchestrator};

#[tokio::test]
async fn attaches_and_waits_for_in_use() {
    let cloud = ScriptedCloud::new();
    cloud.set_nodes(vec![node("srv-1", "10.0.0.5", &[])]);
    cloud.push_describe(Ok(vec![volume(
        "vol-1",
        10,
        "fr-par-1",
        VolumeStatus::InUse,
    )]));
    let subject = orchestrator(&cloud);

    subject
        .attach_volume("vol-1", "1", "10.0.0.5", GENEROUS_TIMEOUT)
        .await
        .unwrap_or_else(|err| panic!("attachment should succeed: {err}"));

    let attached = cloud.calls().iter().any(|call| {
        matches!(
            call,
            CloudCall::Attach {
                volume_id,
                instance_id,
                device,
            } if volume_id == "vol-1" && instance_id == "srv-1" && device == "1"
        )
    });
    assert!(attached, "the resolved provider id must drive the attach");
}

#[tokio::test]
async fn already_attached_volume_is_rejected_without_an_attach_call() {
    let cloud = ScriptedCloud::new();
    cloud.set_nodes(vec![node("srv-1", "10.0.0.5", &[Some("vol-1")])]);
    let subject = orchestrator(&cloud);

    let err = subject
        .attach_volume("vol-1", "1", "10.0.0.5", GENEROUS_TIMEOUT)
        .await
        .expect_err("a double attach must be rejected");

    assert!(
        matches!(err, StorageError::Validation { .. }),
        "unexpected error: {err}"
    );
    assert!(
        !cloud
            .calls()
            .iter()
            .any(|call| matches!(call, CloudCall::Attach { .. })),
        "no attach call may reach the provider"
    );
}

#[tokio::test]
async fn unknown_address_fails_with_node_not_found() {
    let cloud = ScriptedCloud::new();
    cloud.set_nodes(vec![node("srv-1", "10.0.0.5", &[])]);
    let subject = orchestrator(&cloud);

    let err = subject
        .attach_volume("vol-1", "1", "192.168.1.1", GENEROUS_TIMEOUT)
        .await
        .expect_err("an unknown address must fail");

    assert_eq!(
        err,
        StorageError::NodeNotFound {
            address: String::from("192.168.1.1"),
        }
    );
}

#[tokio::test]
async fn attach_call_failure_propagates_without_polling() {
    let cloud = ScriptedCloud::new();
    cloud.set_nodes(vec![node("srv-1", "10.0.0.5", &[])]);
    cloud.push_attach(Err(ScriptedCloudError::Scripted(String::from(
        "slot occupied",
    ))));
    let subject = orchestrator(&cloud);

    let err = subject
        .attach_volume("vol-1", "1", "10.0.0.5", GENEROUS_TIMEOUT)
        .await
        .expect_err("attach failure must propagate");

    assert!(matches!(err, StorageError::Provisioning { .. }));
    assert!(
        !cloud
            .calls()
            .iter()
            .any(|call| matches!(call, CloudCall::Describe { .. })),
        "a failed attach is never retried or polled"
    );
}
