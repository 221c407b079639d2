// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::cli_shared::cli::Config;
use anyhow::Context as _;
use clap::Subcommand;
use std::io::Write;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Dump the effective configuration as TOML
    Dump,
}

impl ConfigCommands {
    pub fn run<W: Write + Unpin>(self, config: &Config, sink: &mut W) -> anyhow::Result<()> {
        match self {
            Self::Dump => writeln!(
                sink,
                "{}",
                toml::to_string(config).context("cannot serialize the configuration")?
            )
            .context("cannot write the configuration"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_round_trips() {
        let mut config = Config::default();
        config.reconcile.fetch_concurrency = 3;
        let mut sink = vec![];
        ConfigCommands::Dump.run(&config, &mut sink).unwrap();
        let dumped: Config = toml::from_str(std::str::from_utf8(&sink).unwrap()).unwrap();
        assert_eq!(dumped, config);
    }
}
