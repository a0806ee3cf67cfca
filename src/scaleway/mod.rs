//! Scaleway implementation of the cloud volume API seam.
//!
//! Every call goes through the instance HTTP API directly with serde
//! payload structs and a shared `reqwest` client.

mod error;
mod types;

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::api::{ApiFuture, CloudVolumeApi, ComputeNode, NodeRef, Tag, Volume};
use crate::config::ScalewayConfig;

use types::{
    CreateVolumeRequest, ScalewayVolume, ServerEnvelope, ServerListEnvelope,
    UpdateServerVolumesRequest, UpdateVolumeTagsRequest, VolumeAttachment, VolumeEnvelope,
    VolumeListEnvelope, decode_tag, encode_tag, gib_to_bytes,
};

pub use error::ScalewayApiError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const SCALEWAY_INSTANCE_API_BASE: &str = "https://api.scaleway.com/instance/v1";
const VOLUME_TYPE_BLOCK: &str = "b_ssd";

static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// Cloud volume client scoped to one Scaleway zone and project.
///
/// The client is immutable after construction and safe to share across
/// concurrent operations; the underlying HTTP handle is a lazily initialised
/// process-wide client.
#[derive(Clone)]
pub struct ScalewayVolumeApi {
    config: ScalewayConfig,
}

impl ScalewayVolumeApi {
    /// Constructs a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScalewayApiError::Config`] when the provided configuration
    /// fails validation.
    pub fn new(config: ScalewayConfig) -> Result<Self, ScalewayApiError> {
        config
            .validate()
            .map_err(|err| ScalewayApiError::Config(err.to_string()))?;
        Ok(Self { config })
    }

    fn zone_url(&self, zone: &str, path: &str) -> String {
        format!("{SCALEWAY_INSTANCE_API_BASE}/zones/{zone}/{path}")
    }

    fn url(&self, path: &str) -> String {
        self.zone_url(&self.config.default_zone, path)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<T, ScalewayApiError> {
        let body = self.request_raw(builder, operation).await?;
        serde_json::from_slice(&body).map_err(|err| ScalewayApiError::Decode {
            operation: operation.to_owned(),
            message: err.to_string(),
        })
    }

    async fn request_unit(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<(), ScalewayApiError> {
        self.request_raw(builder, operation).await.map(|_| ())
    }

    async fn request_raw(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<Vec<u8>, ScalewayApiError> {
        let response = builder
            .header("X-Auth-Token", &self.config.secret_key)
            .send()
            .await
            .map_err(|err| ScalewayApiError::Transport {
                operation: operation.to_owned(),
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ScalewayApiError::Transport {
                operation: operation.to_owned(),
                message: err.to_string(),
            })?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        Err(ScalewayApiError::Api {
            operation: operation.to_owned(),
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    async fn fetch_volume(&self, volume_id: &str) -> Result<ScalewayVolume, ScalewayApiError> {
        let envelope: VolumeEnvelope = self
            .request_json(
                HTTP_CLIENT.get(self.url(&format!("volumes/{volume_id}"))),
                "describe volume",
            )
            .await?;
        Ok(envelope.volume)
    }

    async fn fetch_server(&self, server_id: &str) -> Result<ServerEnvelope, ScalewayApiError> {
        self.request_json(
            HTTP_CLIENT.get(self.url(&format!("servers/{server_id}"))),
            "describe server",
        )
        .await
    }

    async fn patch_server_volumes(
        &self,
        server_id: &str,
        volumes: HashMap<String, VolumeAttachment>,
        operation: &str,
    ) -> Result<(), ScalewayApiError> {
        let request = UpdateServerVolumesRequest { volumes };
        self.request_unit(
            HTTP_CLIENT
                .patch(self.url(&format!("servers/{server_id}")))
                .json(&request),
            operation,
        )
        .await
    }

    fn attachment_map(server: &types::ScalewayServer) -> HashMap<String, VolumeAttachment> {
        server
            .volumes
            .iter()
            .filter_map(|(slot, volume)| {
                volume.id.as_ref().map(|id| {
                    (
                        slot.clone(),
                        VolumeAttachment {
                            id: id.clone(),
                            boot: volume.boot,
                        },
                    )
                })
            })
            .collect()
    }
}

impl CloudVolumeApi for ScalewayVolumeApi {
    type Error = ScalewayApiError;

    fn create_volume_in_zone<'a>(
        &'a self,
        zone: &'a str,
        size_gb: u32,
    ) -> ApiFuture<'a, Volume, Self::Error> {
        Box::pin(async move {
            // The canonical human-readable name is applied later as a tag;
            // the API-level name only has to be present.
            let payload = CreateVolumeRequest {
                name: format!("volya-{size_gb}g"),
                size: gib_to_bytes(size_gb),
                volume_type: String::from(VOLUME_TYPE_BLOCK),
                project: self.config.default_project_id.clone(),
            };
            let envelope: VolumeEnvelope = self
                .request_json(
                    HTTP_CLIENT
                        .post(self.zone_url(zone, "volumes"))
                        .json(&payload),
                    "create volume",
                )
                .await?;
            Ok(envelope.volume.into_volume())
        })
    }

    fn describe_volumes<'a>(
        &'a self,
        ids: Option<&'a [String]>,
    ) -> ApiFuture<'a, Vec<Volume>, Self::Error> {
        Box::pin(async move {
            match ids {
                Some(requested) => {
                    let mut volumes = Vec::with_capacity(requested.len());
                    for id in requested {
                        volumes.push(self.fetch_volume(id).await?.into_volume());
                    }
                    Ok(volumes)
                }
                None => {
                    let envelope: VolumeListEnvelope = self
                        .request_json(HTTP_CLIENT.get(self.url("volumes")), "list volumes")
                        .await?;
                    Ok(envelope
                        .volumes
                        .into_iter()
                        .map(ScalewayVolume::into_volume)
                        .collect())
                }
            }
        })
    }

    fn attach_volume<'a>(
        &'a self,
        volume_id: &'a str,
        instance_id: &'a str,
        device: &'a str,
    ) -> ApiFuture<'a, (), Self::Error> {
        Box::pin(async move {
            let envelope = self.fetch_server(instance_id).await?;
            let mut volumes = Self::attachment_map(&envelope.server);
            if volumes.contains_key(device) {
                return Err(ScalewayApiError::DeviceSlotOccupied {
                    device: device.to_owned(),
                    server_id: instance_id.to_owned(),
                });
            }
            volumes.insert(
                device.to_owned(),
                VolumeAttachment {
                    id: volume_id.to_owned(),
                    boot: false,
                },
            );
            self.patch_server_volumes(instance_id, volumes, "attach volume")
                .await
        })
    }

    fn detach_volume<'a>(
        &'a self,
        volume_id: &'a str,
        _force: bool,
        instance_id: &'a str,
    ) -> ApiFuture<'a, (), Self::Error> {
        // The instance API has no non-forced detach; the flag is accepted
        // for interface parity and the rewrite below always applies.
        Box::pin(async move {
            let envelope = self.fetch_server(instance_id).await?;
            let volumes: HashMap<String, VolumeAttachment> =
                Self::attachment_map(&envelope.server)
                    .into_iter()
                    .filter(|(_, attachment)| attachment.id != volume_id)
                    .collect();
            self.patch_server_volumes(instance_id, volumes, "detach volume")
                .await
        })
    }

    fn delete_volume<'a>(&'a self, volume_id: &'a str) -> ApiFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.request_unit(
                HTTP_CLIENT.delete(self.url(&format!("volumes/{volume_id}"))),
                "delete volume",
            )
            .await
        })
    }

    fn list_nodes(&self) -> ApiFuture<'_, Vec<NodeRef>, Self::Error> {
        Box::pin(async move {
            let envelope: ServerListEnvelope = self
                .request_json(HTTP_CLIENT.get(self.url("servers")), "list servers")
                .await?;
            Ok(envelope
                .servers
                .into_iter()
                .map(|server| NodeRef { id: server.id })
                .collect())
        })
    }

    fn node_metadata<'a>(&'a self, node: &'a NodeRef) -> ApiFuture<'a, ComputeNode, Self::Error> {
        Box::pin(async move {
            let envelope = self.fetch_server(&node.id).await?;
            Ok(envelope.server.into_node())
        })
    }

    fn apply_tags<'a>(
        &'a self,
        resource_ids: &'a [String],
        tags: &'a [Tag],
    ) -> ApiFuture<'a, (), Self::Error> {
        Box::pin(async move {
            for resource_id in resource_ids {
                let volume = self.fetch_volume(resource_id).await?;
                let mut merged: Vec<String> = volume
                    .tags
                    .into_iter()
                    .filter(|raw| {
                        decode_tag(raw)
                            .is_none_or(|existing| tags.iter().all(|tag| tag.key != existing.key))
                    })
                    .collect();
                merged.extend(tags.iter().map(encode_tag));
                let request = UpdateVolumeTagsRequest { tags: merged };
                self.request_unit(
                    HTTP_CLIENT
                        .patch(self.url(&format!("volumes/{resource_id}")))
                        .json(&request),
                    "tag volume",
                )
                .await?;
            }
            Ok(())
        })
    }

    fn query_tags<'a>(&'a self, resource_id: &'a str) -> ApiFuture<'a, Vec<Tag>, Self::Error> {
        Box::pin(async move {
            let volume = self.fetch_volume(resource_id).await?;
            Ok(volume
                .tags
                .iter()
                .filter_map(|raw| decode_tag(raw))
                .collect())
        })
    }
}
