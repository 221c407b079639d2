// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod config;

pub use config::Config;

use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CAR_RECONCILER_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigPath {
    Cli(PathBuf),
    Env(PathBuf),
}

impl ConfigPath {
    pub fn to_path_buf(&self) -> &PathBuf {
        match self {
            ConfigPath::Cli(path) | ConfigPath::Env(path) => path,
        }
    }

    pub fn display(&self) -> std::path::Display<'_> {
        self.to_path_buf().display()
    }
}

/// A path given on the command line always wins. A path from the environment
/// is only used when it exists.
pub fn find_config_path(config: Option<&PathBuf>) -> Option<ConfigPath> {
    if let Some(path) = config {
        return Some(ConfigPath::Cli(path.clone()));
    }
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from) {
        if Path::new(&path).exists() {
            return Some(ConfigPath::Env(path));
        }
        warn!(
            "{CONFIG_PATH_ENV} is set to {}, which does not exist. Using defaults.",
            path.display()
        );
    }
    None
}
