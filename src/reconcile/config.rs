// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Knobs of the reconciliation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Config {
    /// First key segment of uploaded fragments.
    #[default("raw".to_owned())]
    pub incoming_namespace: String,
    /// First key segment of reassembled archives.
    #[default("complete".to_owned())]
    pub completed_namespace: String,
    /// Extension of reassembled archives.
    #[default("car".to_owned())]
    pub archive_extension: String,
    /// Archives declaring a larger DAG than this (in bytes) are never joined.
    #[default(100 * 1024 * 1024)]
    pub max_size_to_attempt: u64,
    /// Upper bound on concurrent fragment downloads while joining.
    #[default(8)]
    pub fetch_concurrency: usize,
    /// Re-hash every block against its CID while inspecting.
    pub verify_blocks: bool,
}

impl Config {
    /// Whether `key` names an object inside the incoming namespace.
    pub fn is_incoming(&self, key: &str) -> bool {
        key.strip_prefix(self.incoming_namespace.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Destination key of the reassembled archive of `root`.
    pub fn completed_key(&self, root: &cid::Cid) -> String {
        format!(
            "{}/{root}.{}",
            self.completed_namespace, self.archive_extension
        )
    }
}
