//! Volume listing and name-tag resolution.

use std::time::Duration;

use tracing::debug;

use crate::api::{CloudVolumeApi, Volume};

use super::{NAME_TAG_KEY, StorageError, VolumeDetails, VolumeOrchestrator};

impl<C: CloudVolumeApi> VolumeOrchestrator<C> {
    /// Lists the volumes currently attached to the machine at `address`.
    ///
    /// Intersects every volume in the active zone with the node's attachment
    /// set; O(total volumes) per call, no index maintained. The timeout
    /// parameter is retained for interface parity with the mutating
    /// operations; the listing itself does not poll.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NodeNotFound`] when no node carries the
    /// address and [`StorageError::Provisioning`] on describe failures.
    pub async fn list_volumes(
        &self,
        address: &str,
        _timeout: Duration,
    ) -> Result<Vec<VolumeDetails>, StorageError> {
        let machine_ids = self.machine_volume_ids(address).await?;
        let all = self.list_all_volumes().await?;
        Ok(all
            .into_iter()
            .filter(|details| machine_ids.contains(&details.id))
            .collect())
    }

    /// Describes every volume in the active zone, each enriched with its
    /// resolved name tag.
    ///
    /// Name resolution is best-effort per volume: a failure leaves that
    /// volume's name empty and never aborts the listing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Provisioning`] when the describe call fails.
    pub async fn list_all_volumes(&self) -> Result<Vec<VolumeDetails>, StorageError> {
        let volumes = self
            .cloud()
            .describe_volumes(None)
            .await
            .map_err(|err| StorageError::provisioning("list volumes", "all volumes", &err))?;

        let mut details = Vec::with_capacity(volumes.len());
        for volume in volumes {
            details.push(self.volume_details(volume).await);
        }
        Ok(details)
    }

    /// Returns the value of the volume's `Name` tag, or an empty string when
    /// no such tag is present. An untagged volume is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Provisioning`] when the tag query itself
    /// fails.
    pub async fn get_volume_name(&self, volume_id: &str) -> Result<String, StorageError> {
        let tags = self
            .cloud()
            .query_tags(volume_id)
            .await
            .map_err(|err| StorageError::provisioning("query volume tags", volume_id, &err))?;
        Ok(tags
            .into_iter()
            .find(|tag| tag.key == NAME_TAG_KEY)
            .map(|tag| tag.value)
            .unwrap_or_default())
    }

    async fn volume_details(&self, volume: Volume) -> VolumeDetails {
        let name = match self.get_volume_name(&volume.id).await {
            Ok(name) => name,
            Err(err) => {
                // Native volumes may have no resolvable name, only an id.
                debug!(volume_id = %volume.id, error = %err, "could not resolve volume name");
                String::new()
            }
        };
        VolumeDetails {
            id: volume.id,
            size_gb: volume.size_gb,
            location: volume.zone,
            name,
        }
    }
}
