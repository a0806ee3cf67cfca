//! Volume creation with compensating cleanup.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::api::{CloudVolumeApi, Tag, Volume, VolumeStatus};
use crate::config::VolumeTemplate;

use super::{
    MAX_VOLUME_SIZE, MIN_VOLUME_SIZE, NAME_TAG_KEY, StorageError, VolumeDetails,
    VolumeOrchestrator,
};

impl<C: CloudVolumeApi> VolumeOrchestrator<C> {
    /// Creates a volume from the named template in `availability_zone`,
    /// waits for it to become available, and names it via a `Name` tag of
    /// the form `{prefix}_{unix_millis}`.
    ///
    /// If anything fails after the provider has handed out a volume
    /// identifier, that orphaned volume is deleted best-effort before the
    /// original failure is surfaced; a failure of the compensating delete is
    /// logged and suppressed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Validation`] for an unknown template or a
    /// size outside `[MIN_VOLUME_SIZE, MAX_VOLUME_SIZE]` (checked before any
    /// remote call), [`StorageError::Timeout`] when the volume never reaches
    /// `available` within the deadline, and [`StorageError::Provisioning`]
    /// for any other provider failure, carrying the requested size and zone.
    pub async fn create_volume(
        &self,
        template_name: &str,
        availability_zone: &str,
        timeout: Duration,
    ) -> Result<VolumeDetails, StorageError> {
        let template = self.template(template_name)?.clone();
        let deadline = Instant::now() + timeout;
        let size_gb = template.size_gb;
        if !(MIN_VOLUME_SIZE..=MAX_VOLUME_SIZE).contains(&size_gb) {
            return Err(StorageError::Validation {
                reason: format!(
                    "volume size must lie between {MIN_VOLUME_SIZE} and {MAX_VOLUME_SIZE} GB, \
                     got {size_gb}"
                ),
            });
        }

        info!(zone = availability_zone, size_gb, "creating volume");
        let volume = self
            .cloud()
            .create_volume_in_zone(availability_zone, size_gb)
            .await
            .map_err(|err| {
                StorageError::provisioning(
                    "create volume",
                    creation_context(size_gb, availability_zone),
                    &err,
                )
            })?;

        match self.finish_create(&volume, &template, deadline).await {
            Ok(name) => {
                info!(volume_id = %volume.id, name, "volume created");
                Ok(VolumeDetails {
                    id: volume.id,
                    size_gb: volume.size_gb,
                    location: volume.zone,
                    name,
                })
            }
            Err(err) => {
                self.compensate_failed_create(&volume.id).await;
                match err {
                    timeout_err @ StorageError::Timeout { .. } => Err(timeout_err),
                    other => Err(StorageError::provisioning(
                        "create volume",
                        creation_context(size_gb, availability_zone),
                        &other,
                    )),
                }
            }
        }
    }

    async fn finish_create(
        &self,
        volume: &Volume,
        template: &VolumeTemplate,
        deadline: Instant,
    ) -> Result<String, StorageError> {
        self.wait_for_status(&volume.id, &VolumeStatus::Available, deadline)
            .await?;

        let name = format!("{}_{}", template.name_prefix, unix_millis());
        let ids = [volume.id.clone()];
        let tags = [Tag {
            key: String::from(NAME_TAG_KEY),
            value: name.clone(),
        }];
        self.cloud()
            .apply_tags(&ids, &tags)
            .await
            .map_err(|err| StorageError::provisioning("tag volume", &volume.id, &err))?;
        Ok(name)
    }

    /// Best-effort deletion of a volume left behind by a failed creation.
    /// The delete's own failure never masks the original error.
    async fn compensate_failed_create(&self, volume_id: &str) {
        if let Err(err) = self.cloud().delete_volume(volume_id).await {
            warn!(
                volume_id,
                error = %err,
                "failed to delete volume after unsuccessful creation"
            );
        }
    }
}

fn creation_context(size_gb: u32, zone: &str) -> String {
    format!("size {size_gb} GB in zone {zone}")
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}
