// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::reconcile;
use serde::{Deserialize, Serialize};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reconcile: reconcile::Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_is_readable() {
        let dumped = toml::to_string(&Config::default()).unwrap();
        assert!(dumped.contains("[reconcile]"));
        let read: Config = toml::from_str(&dumped).unwrap();
        assert_eq!(read, Config::default());
    }

    #[test]
    fn empty_file_is_the_default() {
        assert_eq!(toml::from_str::<Config>("").unwrap(), Config::default());
    }
}
