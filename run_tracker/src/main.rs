// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

mod cli;
mod config;
mod frontend;

use crate::{cli::Cli, config::Config, frontend::Frontend};
use clap::Parser;
use module_core::{EventBus, Module};
use run_log::RunLog;
use std::process::ExitCode;
use storage::FlatFileStorage;
use tokio::io::BufReader;
use track_view::TrackView;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load(cli.config.as_deref())
        .map(|config| config.with_overrides(cli.data_file.clone(), cli.goal))
        .and_then(Config::validate)
    {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration. Error: {}", e);
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let data_file = match config.data_file() {
        Ok(data_file) => data_file,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let eb = EventBus::default();
    let mut storage = FlatFileStorage::new(&data_file, eb.context());
    let mut run_log = RunLog::new(config.goal_km, eb.context());
    let mut track_view = TrackView::new(config.theme, eb.context());
    let mut frontend = Frontend::new(
        eb.context(),
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
    );

    info!("Starting modules...");
    let (storage_result, run_log_result, track_view_result, result) = tokio::join!(
        storage.run(),
        run_log.run(),
        track_view.run(),
        frontend.run(&cli.command)
    );
    if storage_result.is_err() || run_log_result.is_err() || track_view_result.is_err() {
        error!("A module stopped with an error");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests;
