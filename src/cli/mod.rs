//! Command-line interface definitions for the `volya` binary.
//!
//! This module centralises the clap parser structures so both the main
//! binary and the build script can reuse them when generating the manual
//! page.

use clap::Parser;

const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Top-level CLI for the `volya` binary.
#[derive(Debug, Parser)]
#[command(
    name = "volya",
    about = "Provision, attach, and retire block-storage volumes with bounded waits",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Create a volume from a template and wait until it is available.
    #[command(name = "create")]
    Create(CreateCommand),
    /// Attach a volume to the machine at an address.
    #[command(name = "attach")]
    Attach(AttachCommand),
    /// Detach a volume from the machine at an address.
    #[command(name = "detach")]
    Detach(DetachCommand),
    /// Delete a volume.
    #[command(name = "delete")]
    Delete(DeleteCommand),
    /// List volumes attached to the machine at an address, or every volume.
    #[command(name = "list")]
    List(ListCommand),
    /// Print the name tag of a volume.
    #[command(name = "name")]
    Name(NameCommand),
}

/// Arguments for the `volya create` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct CreateCommand {
    /// Volume template name from configuration.
    #[arg(value_name = "TEMPLATE")]
    pub(crate) template: String,
    /// Availability zone to create the volume in; defaults to the
    /// configured zone.
    #[arg(long, value_name = "ZONE")]
    pub(crate) zone: Option<String>,
    /// Upper bound on the whole operation, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub(crate) timeout_secs: u64,
}

/// Arguments for the `volya attach` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct AttachCommand {
    /// Identifier of the volume to attach.
    #[arg(value_name = "VOLUME_ID")]
    pub(crate) volume_id: String,
    /// Address of the target machine.
    #[arg(value_name = "ADDRESS")]
    pub(crate) address: String,
    /// Device or slot to attach under.
    #[arg(long, value_name = "DEVICE", default_value = "1")]
    pub(crate) device: String,
    /// Upper bound on the whole operation, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub(crate) timeout_secs: u64,
}

/// Arguments for the `volya detach` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct DetachCommand {
    /// Identifier of the volume to detach.
    #[arg(value_name = "VOLUME_ID")]
    pub(crate) volume_id: String,
    /// Address of the machine the volume is attached to.
    #[arg(value_name = "ADDRESS")]
    pub(crate) address: String,
    /// Upper bound on the whole operation, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub(crate) timeout_secs: u64,
}

/// Arguments for the `volya delete` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct DeleteCommand {
    /// Identifier of the volume to delete.
    #[arg(value_name = "VOLUME_ID")]
    pub(crate) volume_id: String,
    /// Zone the volume lives in; defaults to the configured zone.
    #[arg(long, value_name = "ZONE")]
    pub(crate) zone: Option<String>,
    /// Upper bound on the whole operation, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub(crate) timeout_secs: u64,
}

/// Arguments for the `volya list` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct ListCommand {
    /// Address of a machine to scope the listing to; omit to list every
    /// volume in the zone.
    #[arg(value_name = "ADDRESS")]
    pub(crate) address: Option<String>,
    /// Upper bound on the whole operation, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub(crate) timeout_secs: u64,
}

/// Arguments for the `volya name` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct NameCommand {
    /// Identifier of the volume to resolve.
    #[arg(value_name = "VOLUME_ID")]
    pub(crate) volume_id: String,
}
