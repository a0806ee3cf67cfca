//! Deadline-bounded status polling.

use std::time::Instant;

use tokio::time::sleep;

use crate::api::{CloudVolumeApi, VolumeStatus};

use super::{StorageError, VolumeOrchestrator};

impl<C: CloudVolumeApi> VolumeOrchestrator<C> {
    /// Polls the volume's status until it matches `target` or `deadline`
    /// elapses.
    ///
    /// Each iteration issues exactly one describe call. A failed describe
    /// aborts the wait immediately with [`StorageError::Provisioning`]; a
    /// malfunctioning query channel is never retried inside the loop. The
    /// deadline is checked before each iteration, so the wait may overshoot
    /// it by up to one query latency plus one interval.
    pub(crate) async fn wait_for_status(
        &self,
        volume_id: &str,
        target: &VolumeStatus,
        deadline: Instant,
    ) -> Result<(), StorageError> {
        while Instant::now() < deadline {
            let ids = [volume_id.to_owned()];
            let volumes = self
                .cloud()
                .describe_volumes(Some(&ids))
                .await
                .map_err(|err| {
                    StorageError::provisioning("describe volume", volume_id, &err)
                })?;
            let Some(volume) = volumes.first() else {
                return Err(StorageError::Provisioning {
                    operation: String::from("describe volume"),
                    resource: volume_id.to_owned(),
                    message: String::from("volume not present in describe response"),
                });
            };
            if volume.status == *target {
                return Ok(());
            }
            sleep(self.poll_interval).await;
        }

        Err(StorageError::Timeout {
            volume_id: volume_id.to_owned(),
            target: target.clone(),
        })
    }
}
