//! Tests for the orchestrator lifecycle operations, driven by a scripted
//! cloud double.

mod attach;
mod delete;
mod detach;
mod node;

use std::collections::HashMap;
use std::time::Duration;

use crate::config::VolumeTemplate;
use crate::test_support::ScriptedCloud;

use super::VolumeOrchestrator;

pub(super) const FAST_POLL: Duration = Duration::from_millis(1);
pub(super) const GENEROUS_TIMEOUT: Duration = Duration::from_secs(5);

fn template(size_gb: u32, name_prefix: &str) -> VolumeTemplate {
    VolumeTemplate {
        size_gb,
        name_prefix: name_prefix.to_owned(),
    }
}

pub(super) fn templates() -> HashMap<String, VolumeTemplate> {
    HashMap::from([
        (String::from("small"), template(10, "small_vol")),
        (String::from("tiny"), template(5, "tiny_vol")),
        (String::from("max"), template(1024, "max_vol")),
        (String::from("oversized"), template(1025, "big_vol")),
        (String::from("empty"), template(0, "no_vol")),
    ])
}

pub(super) fn orchestrator(cloud: &ScriptedCloud) -> VolumeOrchestrator<ScriptedCloud> {
    VolumeOrchestrator::new(cloud.clone(), templates()).with_poll_interval(FAST_POLL)
}
