//! Tests for node resolution and attachment-set extraction.

use std::collections::HashSet;

use crate::api::{ComputeNode, HardwareDevice};
use crate::orchestrator::{StorageError, attached_volume_ids};
use crate::test_support::{ScriptedCloud, node};

use super::orchestrator;

#[tokio::test]
async fn resolves_a_node_by_private_address() {
    let cloud = ScriptedCloud::new();
    cloud.set_nodes(vec![
        node("srv-1", "10.0.0.4", &[]),
        node("srv-2", "10.0.0.5", &[Some("vol-1")]),
    ]);
    let subject = orchestrator(&cloud);

    let resolved = subject
        .find_node_by_address("10.0.0.5")
        .await
        .unwrap_or_else(|err| panic!("resolution should succeed: {err}"));

    assert_eq!(resolved.provider_id, "srv-2");
}

#[tokio::test]
async fn resolves_a_node_by_public_address() {
    let cloud = ScriptedCloud::new();
    cloud.set_nodes(vec![ComputeNode {
        provider_id: String::from("srv-1"),
        private_addresses: vec![String::from("10.0.0.5")],
        public_addresses: vec![String::from("51.15.0.9")],
        devices: Vec::new(),
    }]);
    let subject = orchestrator(&cloud);

    let resolved = subject
        .find_node_by_address("51.15.0.9")
        .await
        .unwrap_or_else(|err| panic!("resolution should succeed: {err}"));

    assert_eq!(resolved.provider_id, "srv-1");
}

#[tokio::test]
async fn unmatched_address_fails_with_node_not_found() {
    let cloud = ScriptedCloud::new();
    cloud.set_nodes(vec![node("srv-1", "10.0.0.5", &[])]);
    let subject = orchestrator(&cloud);

    let err = subject
        .find_node_by_address("10.0.0.99")
        .await
        .expect_err("an unmatched address must fail");

    assert_eq!(
        err,
        StorageError::NodeNotFound {
            address: String::from("10.0.0.99"),
        }
    );
}

#[test]
fn attachment_set_excludes_devices_without_an_id() {
    let subject = ComputeNode {
        provider_id: String::from("srv-1"),
        private_addresses: vec![String::from("10.0.0.5")],
        public_addresses: Vec::new(),
        devices: vec![
            HardwareDevice {
                volume_id: Some(String::from("vol-1")),
            },
            HardwareDevice { volume_id: None },
            HardwareDevice {
                volume_id: Some(String::new()),
            },
            HardwareDevice {
                volume_id: Some(String::from("vol-2")),
            },
        ],
    };

    let ids = attached_volume_ids(&subject);

    assert_eq!(
        ids,
        HashSet::from([String::from("vol-1"), String::from("vol-2")])
    );
}

#[tokio::test]
async fn machine_volume_ids_reflect_the_resolved_node() {
    let cloud = ScriptedCloud::new();
    cloud.set_nodes(vec![node("srv-1", "10.0.0.5", &[Some("vol-1"), None])]);
    let subject = orchestrator(&cloud);

    let ids = subject
        .machine_volume_ids("10.0.0.5")
        .await
        .unwrap_or_else(|err| panic!("resolution should succeed: {err}"));

    assert_eq!(ids, HashSet::from([String::from("vol-1")]));
}
