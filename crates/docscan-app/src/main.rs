// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan: headless entry point for the capture → re-crop → commit cycle.

mod cli;
mod services;

use std::process::ExitCode;

use clap::Parser;
use docscan_core::ScanConfig;
use docscan_core::error::Result;
use docscan_core::human_errors::humanize_error;
use tracing::info;

use crate::cli::{Cli, Command};
use crate::services::review::{ReviewServices, commit_summary, displayable_bytes};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            eprintln!("{}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(services::data_dir::config_path);
    let config = ScanConfig::load(&config_path)?;
    info!(path = %config_path.display(), "configuration loaded");

    match cli.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Recrop {
            image,
            corners,
            quality,
            out,
        } => {
            let services = ReviewServices::init(&config);
            let committed = services.recrop_file(&image, corners, quality).await?;
            std::fs::write(&out, displayable_bytes(&committed.corrected_image)?)?;
            info!(out = %out.display(), "re-cropped image written");
            println!("{}", serde_json::to_string_pretty(&commit_summary(&committed)?)?);
        }
    }
    Ok(())
}
