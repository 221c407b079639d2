// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod cli;
pub mod logger;

use crate::cli_shared::cli::{Config, ConfigPath, find_config_path};
use crate::utils::io::read_toml;
use anyhow::Context as _;
use std::path::PathBuf;

/// Reads the configuration from the first of `config_path_opt` and the
/// environment that names a file, or falls back to the defaults.
pub fn read_config(config_path_opt: Option<&PathBuf>) -> anyhow::Result<(Option<ConfigPath>, Config)> {
    match find_config_path(config_path_opt) {
        Some(path) => {
            let toml = std::fs::read_to_string(path.to_path_buf())
                .with_context(|| format!("cannot read configuration {}", path.display()))?;
            let config = read_toml(&toml)
                .with_context(|| format!("invalid configuration {}", path.display()))?;
            Ok((Some(path), config))
        }
        None => Ok((None, Config::default())),
    }
}
