// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod config_cmd;
mod handle_cmd;
mod inspect_cmd;
mod join_cmd;

pub(super) use self::{
    config_cmd::ConfigCommands, handle_cmd::HandleCommand, inspect_cmd::InspectCommand,
    join_cmd::JoinCommand,
};
use clap::Parser;
use std::path::PathBuf;

/// CLI structure generated when interacting with the reconciler binary
#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"), bin_name = "car-reconciler", author = env!("CARGO_PKG_AUTHORS"), version = env!("CARGO_PKG_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// A TOML file to read the configuration from, overriding `CAR_RECONCILER_CONFIG`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log JSON objects instead of text lines
    #[arg(long, global = true)]
    pub log_json: bool,
    #[command(subcommand)]
    pub cmd: Subcommand,
}

/// Reconciler sub-commands available.
#[derive(clap::Subcommand, Debug)]
pub enum Subcommand {
    /// Reconcile the archive a fragment-arrival event points at
    Handle(HandleCommand),

    /// Classify a single archive as complete or partial
    Inspect(InspectCommand),

    /// Merge fragments into a single archive
    Join(JoinCommand),

    /// Manage the configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory as _;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_the_subcommand() {
        let cli = Cli::parse_from([
            "car-reconciler",
            "inspect",
            "a.car",
            "--config",
            "c.toml",
            "--log-json",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(cli.log_json);
        assert!(matches!(cli.cmd, Subcommand::Inspect(_)));
    }
}
