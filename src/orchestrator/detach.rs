//! Volume detachment.

use std::time::{Duration, Instant};

use tracing::info;

use crate::api::{CloudVolumeApi, VolumeStatus};

use super::{StorageError, VolumeOrchestrator};

impl<C: CloudVolumeApi> VolumeOrchestrator<C> {
    /// Detaches `volume_id` from the machine at `address` and waits for the
    /// volume to become available again.
    ///
    /// The volume must appear in the machine's current volume list; detach
    /// uses force semantics against the node's provider identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NodeNotFound`] when no node carries the
    /// address, [`StorageError::VolumeNotAttached`] when the id is absent
    /// from the machine's volume list (a non-recoverable state, distinct
    /// from timeout and provisioning failures), [`StorageError::Timeout`]
    /// when `available` is never observed within the deadline, and
    /// [`StorageError::Provisioning`] when the detach call fails.
    pub async fn detach_volume(
        &self,
        volume_id: &str,
        address: &str,
        timeout: Duration,
    ) -> Result<(), StorageError> {
        let deadline = Instant::now() + timeout;
        let node = self.find_node_by_address(address).await?;
        let volumes = self.list_volumes(address, timeout).await?;
        if !volumes.iter().any(|details| details.id == volume_id) {
            return Err(StorageError::VolumeNotAttached {
                volume_id: volume_id.to_owned(),
                address: address.to_owned(),
            });
        }

        info!(volume_id, instance_id = %node.provider_id, "detaching volume");
        self.cloud()
            .detach_volume(volume_id, true, &node.provider_id)
            .await
            .map_err(|err| StorageError::provisioning("detach volume", volume_id, &err))?;

        self.wait_for_status(volume_id, &VolumeStatus::Available, deadline)
            .await
    }
}
