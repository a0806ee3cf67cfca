//! Tests for volume deletion and its wait semantics.

use std::time::Duration;

use crate::orchestrator::StorageError;
use crate::test_support::{CloudCall, ScriptedCloud, ScriptedCloudError};

use super::{GENEROUS_TIMEOUT, orchestrator};

#[tokio::test]
async fn unqueryable_volume_after_delete_counts_as_deleted() {
    let cloud = ScriptedCloud::new();
    // No describe response queued: the post-delete query fails, which the
    // delete wait treats as the volume being gone already.
    let subject = orchestrator(&cloud);

    subject
        .delete_volume("fr-par-1", "vol-1", GENEROUS_TIMEOUT)
        .await
        .unwrap_or_else(|err| panic!("deletion should succeed: {err}"));

    assert_eq!(cloud.delete_count("vol-1"), 1);
}

#[tokio::test]
async fn delete_wait_timeout_still_propagates() {
    let cloud = ScriptedCloud::new();
    let subject = orchestrator(&cloud);

    let err = subject
        .delete_volume("fr-par-1", "vol-1", Duration::ZERO)
        .await
        .expect_err("an expired deadline must still time out");

    assert!(
        matches!(err, StorageError::Timeout { ref volume_id, .. } if volume_id == "vol-1"),
        "only query failures are swallowed, got: {err}"
    );
}

#[tokio::test]
async fn delete_call_failure_propagates() {
    let cloud = ScriptedCloud::new();
    cloud.push_delete(Err(ScriptedCloudError::Scripted(String::from(
        "volume busy",
    ))));
    let subject = orchestrator(&cloud);

    let err = subject
        .delete_volume("fr-par-1", "vol-1", GENEROUS_TIMEOUT)
        .await
        .expect_err("a refused delete must propagate");

    assert!(matches!(err, StorageError::Provisioning { .. }));
    assert!(
        !cloud
            .calls()
            .iter()
            .any(|call| matches!(call, CloudCall::Describe { .. })),
        "a failed delete is never waited on"
    );
}
