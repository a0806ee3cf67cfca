//! Volume attachment.

use std::time::{Duration, Instant};

use tracing::info;

use crate::api::{CloudVolumeApi, VolumeStatus};

use super::node::attached_volume_ids;
use super::{StorageError, VolumeOrchestrator};

impl<C: CloudVolumeApi> VolumeOrchestrator<C> {
    /// Attaches `volume_id` to the machine at `address` under `device` and
    /// waits for the volume to report `in_use`.
    ///
    /// An id already present in the node's attachment set is rejected before
    /// any attach call is made; a volume may be attached to at most one node
    /// at a time.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NodeNotFound`] when no node carries the
    /// address, [`StorageError::Validation`] when the volume is already
    /// attached there, [`StorageError::Timeout`] when `in_use` is never
    /// observed within the deadline, and [`StorageError::Provisioning`] when
    /// the attach call itself fails (never retried).
    pub async fn attach_volume(
        &self,
        volume_id: &str,
        device: &str,
        address: &str,
        timeout: Duration,
    ) -> Result<(), StorageError> {
        let deadline = Instant::now() + timeout;
        let node = self.find_node_by_address(address).await?;
        if attached_volume_ids(&node).contains(volume_id) {
            return Err(StorageError::Validation {
                reason: format!("volume {volume_id} is already attached to the machine at {address}"),
            });
        }

        info!(
            volume_id,
            instance_id = %node.provider_id,
            device,
            "attaching volume"
        );
        self.cloud()
            .attach_volume(volume_id, &node.provider_id, device)
            .await
            .map_err(|err| StorageError::provisioning("attach volume", volume_id, &err))?;

        self.wait_for_status(volume_id, &VolumeStatus::InUse, deadline)
            .await
    }
}
