// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::ffi::OsString;

use super::subcommands::{Cli, Subcommand};
use crate::cli_shared::logger::{self, LogOpts};
use crate::cli_shared::read_config;
use clap::Parser as _;
use tracing::info;

pub fn main<ArgT>(args: impl IntoIterator<Item = ArgT>) -> anyhow::Result<()>
where
    ArgT: Into<OsString> + Clone,
{
    // Capture Cli inputs
    let Cli {
        config,
        log_json,
        cmd,
    } = Cli::parse_from(args);
    logger::setup_logger(LogOpts { json: log_json });

    let (config_path, config) = read_config(config.as_ref())?;
    if let Some(path) = &config_path {
        info!("using configuration at {}", path.display());
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            // Run command
            match cmd {
                Subcommand::Handle(cmd) => cmd.run(config.reconcile).await,
                Subcommand::Inspect(cmd) => cmd.run(config.reconcile).await,
                Subcommand::Join(cmd) => cmd.run().await,
                Subcommand::Config(cmd) => cmd.run(&config, &mut std::io::stdout()),
            }
        })
}
