use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use ironic_api::{InspectorClient, IronicClient};
use tracing::{error, info, warn};
use wait_for_ironic::{Cli, Orchestrator, ReadinessResult, telemetry};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    telemetry::init();

    let config = Cli::parse().into_config()?;
    info!(
        ironic = %config.ironic,
        inspector = %config.inspector,
        microversion = config.ironic.microversion(),
        "loaded configuration"
    );

    let ironic = IronicClient::new(config.ironic)?;
    let inspector = InspectorClient::new(config.inspector)?;
    let orchestrator =
        Orchestrator::new(ironic, inspector, config.poll).with_driver_policy(config.driver_policy);

    if config.once {
        return Ok(if orchestrator.check_once().await {
            println!("Ready");
            ExitCode::SUCCESS
        } else {
            println!("Not ready");
            ExitCode::FAILURE
        });
    }

    let cancel = orchestrator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling waits");
            cancel.cancel();
        }
    });

    println!("Waiting for Ironic...");
    println!("Waiting for Ironic Inspector...");
    let report = orchestrator.wait().await;

    match report.result() {
        ReadinessResult::Ready => {
            println!("Done!");
            Ok(ExitCode::SUCCESS)
        }
        other => {
            error!(result = %other, "services did not become ready");
            println!("{other}");
            Ok(ExitCode::FAILURE)
        }
    }
}
