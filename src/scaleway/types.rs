//! Request and response payloads for the Scaleway instance API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::{ComputeNode, HardwareDevice, Tag, Volume, VolumeStatus};

const GIB_SHIFT: u32 = 30;

/// Converts a whole-gigabyte capacity into the byte count the API expects.
pub(crate) fn gib_to_bytes(size_gb: u32) -> u64 {
    u64::from(size_gb) << GIB_SHIFT
}

/// Converts an API byte count back into whole gigabytes.
pub(crate) fn bytes_to_gib(size: u64) -> u32 {
    u32::try_from(size >> GIB_SHIFT).unwrap_or(u32::MAX)
}

/// Encodes a key/value tag as a flat `key=value` Scaleway tag string.
pub(crate) fn encode_tag(tag: &Tag) -> String {
    format!("{}={}", tag.key, tag.value)
}

/// Decodes a `key=value` tag string; strings without a separator carry no
/// key/value structure and yield `None`.
pub(crate) fn decode_tag(raw: &str) -> Option<Tag> {
    raw.split_once('=').map(|(key, value)| Tag {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

#[derive(Serialize)]
pub(crate) struct CreateVolumeRequest {
    pub name: String,
    pub size: u64,
    pub volume_type: String,
    pub project: String,
}

#[derive(Serialize)]
pub(crate) struct UpdateVolumeTagsRequest {
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub(crate) struct VolumeEnvelope {
    pub volume: ScalewayVolume,
}

#[derive(Deserialize)]
pub(crate) struct VolumeListEnvelope {
    pub volumes: Vec<ScalewayVolume>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ScalewayVolume {
    pub id: String,
    pub size: u64,
    pub state: String,
    pub zone: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ScalewayVolume {
    pub(crate) fn into_volume(self) -> Volume {
        Volume {
            id: self.id,
            size_gb: bytes_to_gib(self.size),
            zone: self.zone,
            status: VolumeStatus::from_provider(&self.state),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ServerEnvelope {
    pub server: ScalewayServer,
}

#[derive(Deserialize)]
pub(crate) struct ServerListEnvelope {
    pub servers: Vec<ScalewayServer>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ScalewayServer {
    pub id: String,
    #[serde(default)]
    pub public_ip: Option<ServerIp>,
    #[serde(default)]
    pub private_ip: Option<String>,
    #[serde(default)]
    pub volumes: HashMap<String, ServerVolume>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ServerIp {
    pub address: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ServerVolume {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub boot: bool,
}

impl ScalewayServer {
    pub(crate) fn into_node(self) -> ComputeNode {
        // Slot order keeps the device list deterministic across calls.
        let mut slots: Vec<(String, ServerVolume)> = self.volumes.into_iter().collect();
        slots.sort_by(|(a, _), (b, _)| a.cmp(b));
        ComputeNode {
            provider_id: self.id,
            private_addresses: self.private_ip.into_iter().collect(),
            public_addresses: self
                .public_ip
                .into_iter()
                .map(|ip| ip.address)
                .collect(),
            devices: slots
                .into_iter()
                .map(|(_, volume)| HardwareDevice {
                    volume_id: volume.id,
                })
                .collect(),
        }
    }
}

/// Volume reference inside a server's volume map.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct VolumeAttachment {
    pub id: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub boot: bool,
}

/// Request body for `PATCH /servers/{id}` rewriting the volume map.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct UpdateServerVolumesRequest {
    pub volumes: HashMap<String, VolumeAttachment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gib_conversion_round_trips() {
        assert_eq!(gib_to_bytes(10), 10_737_418_240);
        assert_eq!(bytes_to_gib(gib_to_bytes(10)), 10);
    }

    #[test]
    fn encode_tag_produces_flat_pair() {
        let tag = Tag {
            key: String::from("Name"),
            value: String::from("db_17000"),
        };
        assert_eq!(encode_tag(&tag), "Name=db_17000");
    }

    #[test]
    fn decode_tag_splits_on_first_separator() {
        let tag = decode_tag("Name=db=primary").expect("separator present");
        assert_eq!(tag.key, "Name");
        assert_eq!(tag.value, "db=primary");
    }

    #[test]
    fn decode_tag_ignores_flat_strings() {
        assert!(decode_tag("ephemeral").is_none());
    }

    #[test]
    fn volume_attachment_serialises_without_boot_when_false() {
        let attachment = VolumeAttachment {
            id: String::from("vol-123"),
            boot: false,
        };
        let json = serde_json::to_string(&attachment).expect("serialise");
        assert!(!json.contains("boot"));
    }

    #[test]
    fn server_deserialises_into_node() {
        let json = r#"{
            "id": "srv-1",
            "public_ip": {"address": "51.15.0.1"},
            "private_ip": "10.0.0.1",
            "volumes": {
                "0": {"id": "vol-root", "boot": true},
                "1": {"id": "vol-data"},
                "2": {}
            }
        }"#;
        let server: ScalewayServer = serde_json::from_str(json).expect("deserialise");
        let node = server.into_node();
        assert_eq!(node.provider_id, "srv-1");
        assert_eq!(node.private_addresses, vec![String::from("10.0.0.1")]);
        assert_eq!(node.public_addresses, vec![String::from("51.15.0.1")]);
        let ids: Vec<Option<String>> = node
            .devices
            .iter()
            .map(|device| device.volume_id.clone())
            .collect();
        assert_eq!(
            ids,
            vec![
                Some(String::from("vol-root")),
                Some(String::from("vol-data")),
                None
            ]
        );
    }

    #[test]
    fn volume_state_maps_onto_status() {
        let json = r#"{"id": "vol-1", "size": 10737418240, "state": "available", "zone": "fr-par-1"}"#;
        let volume: ScalewayVolume = serde_json::from_str(json).expect("deserialise");
        let mapped = volume.into_volume();
        assert_eq!(mapped.size_gb, 10);
        assert_eq!(mapped.status, VolumeStatus::Available);
    }
}
