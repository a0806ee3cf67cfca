//! Binary entry point for the volya CLI.

use std::io::{self, Write};
use std::process;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use volya::{
    ScalewayConfig, ScalewayVolumeApi, StorageConfig, StorageError, VolumeDetails,
    VolumeOrchestrator,
};

mod cli;

use cli::{
    AttachCommand, Cli, CreateCommand, DeleteCommand, DetachCommand, ListCommand, NameCommand,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("client error: {0}")]
    Client(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let scaleway_config =
        ScalewayConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    let storage_config =
        StorageConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    storage_config
        .validate()
        .map_err(|err| CliError::Config(err.to_string()))?;

    let default_zone = scaleway_config.default_zone.clone();
    let cloud =
        ScalewayVolumeApi::new(scaleway_config).map_err(|err| CliError::Client(err.to_string()))?;
    let orchestrator = VolumeOrchestrator::new(cloud, storage_config.templates);

    match cli {
        Cli::Create(command) => create(&orchestrator, &default_zone, command).await,
        Cli::Attach(command) => attach(&orchestrator, command).await,
        Cli::Detach(command) => detach(&orchestrator, command).await,
        Cli::Delete(command) => delete(&orchestrator, &default_zone, command).await,
        Cli::List(command) => list(&orchestrator, command).await,
        Cli::Name(command) => name(&orchestrator, command).await,
    }
}

async fn create(
    orchestrator: &VolumeOrchestrator<ScalewayVolumeApi>,
    default_zone: &str,
    command: CreateCommand,
) -> Result<(), CliError> {
    let zone = command.zone.as_deref().unwrap_or(default_zone);
    let details = orchestrator
        .create_volume(
            &command.template,
            zone,
            Duration::from_secs(command.timeout_secs),
        )
        .await?;
    print_details(&details);
    Ok(())
}

async fn attach(
    orchestrator: &VolumeOrchestrator<ScalewayVolumeApi>,
    command: AttachCommand,
) -> Result<(), CliError> {
    orchestrator
        .attach_volume(
            &command.volume_id,
            &command.device,
            &command.address,
            Duration::from_secs(command.timeout_secs),
        )
        .await?;
    Ok(())
}

async fn detach(
    orchestrator: &VolumeOrchestrator<ScalewayVolumeApi>,
    command: DetachCommand,
) -> Result<(), CliError> {
    orchestrator
        .detach_volume(
            &command.volume_id,
            &command.address,
            Duration::from_secs(command.timeout_secs),
        )
        .await?;
    Ok(())
}

async fn delete(
    orchestrator: &VolumeOrchestrator<ScalewayVolumeApi>,
    default_zone: &str,
    command: DeleteCommand,
) -> Result<(), CliError> {
    let zone = command.zone.as_deref().unwrap_or(default_zone);
    orchestrator
        .delete_volume(
            zone,
            &command.volume_id,
            Duration::from_secs(command.timeout_secs),
        )
        .await?;
    Ok(())
}

async fn list(
    orchestrator: &VolumeOrchestrator<ScalewayVolumeApi>,
    command: ListCommand,
) -> Result<(), CliError> {
    let volumes = match command.address {
        Some(address) => {
            orchestrator
                .list_volumes(&address, Duration::from_secs(command.timeout_secs))
                .await?
        }
        None => orchestrator.list_all_volumes().await?,
    };
    for details in &volumes {
        print_details(details);
    }
    Ok(())
}

async fn name(
    orchestrator: &VolumeOrchestrator<ScalewayVolumeApi>,
    command: NameCommand,
) -> Result<(), CliError> {
    let volume_name = orchestrator.get_volume_name(&command.volume_id).await?;
    writeln!(io::stdout(), "{volume_name}").ok();
    Ok(())
}

fn print_details(details: &VolumeDetails) {
    writeln!(
        io::stdout(),
        "{}\t{} GB\t{}\t{}",
        details.id,
        details.size_gb,
        details.location,
        details.name
    )
    .ok();
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use volya::VolumeStatus;

    #[test]
    fn write_error_writes_storage_error() {
        let mut buf = Vec::new();
        let err = CliError::Storage(StorageError::Timeout {
            volume_id: String::from("vol-1"),
            target: VolumeStatus::Available,
        });
        write_error(&mut buf, &err);
        let rendered = String::from_utf8(buf).expect("utf8");
        assert!(
            rendered.contains("timed out waiting for volume vol-1"),
            "rendered: {rendered}"
        );
    }
}
