//! Volume deletion.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::api::{CloudVolumeApi, VolumeStatus};

use super::{StorageError, VolumeOrchestrator};

impl<C: CloudVolumeApi> VolumeOrchestrator<C> {
    /// Deletes `volume_id` unconditionally, then waits for the volume to
    /// report `deleting`.
    ///
    /// Deletion can race with the describe API reporting the resource
    /// already gone, so a provisioning failure from the post-delete wait
    /// (the volume no longer describable) is treated as convergence and
    /// swallowed. A timeout from that same wait still propagates; the
    /// asymmetry is deliberate.
    ///
    /// `location` identifies the zone for diagnostics; the provider client
    /// is already scoped to one zone context.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Provisioning`] when the delete call itself
    /// fails and [`StorageError::Timeout`] when the volume is still
    /// describable but never reaches `deleting` within the deadline.
    pub async fn delete_volume(
        &self,
        location: &str,
        volume_id: &str,
        timeout: Duration,
    ) -> Result<(), StorageError> {
        let deadline = Instant::now() + timeout;
        info!(volume_id, location, "deleting volume");
        self.cloud()
            .delete_volume(volume_id)
            .await
            .map_err(|err| StorageError::provisioning("delete volume", volume_id, &err))?;

        match self
            .wait_for_status(volume_id, &VolumeStatus::Deleting, deadline)
            .await
        {
            Err(StorageError::Provisioning { .. }) => {
                debug!(volume_id, "volume no longer describable after delete");
                Ok(())
            }
            other => other,
        }
    }
}
