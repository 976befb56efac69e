mod activity;
mod config;
mod error;
mod logging;
mod ramp;
mod startup;

use std::process::ExitCode;

use chromecast::MdnsDiscovery;
use clap::Parser;
use log::{error, info};

use config::Args;
use error::RampError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.log_level_filter(), &args.log_file) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    let config = args.ramp_config();
    config.log_summary();

    let mut discovery = MdnsDiscovery::new(args.discovery_timeout());
    match startup::run(&mut discovery, &config, interrupted()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(RampError::Interrupted) => {
            info!("Interrupted");
            ExitCode::from(RampError::Interrupted.exit_code())
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Resolves on Ctrl-C
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
