// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Blob storage consumed by the reconciler: buckets of byte objects addressed
//! by `/`-separated keys, each with optional user metadata.

mod fs;
mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form user metadata attached to an object, as the store returns it.
pub type UserMetadata = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub metadata: UserMetadata,
}

/// One entry of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub key: String,
    /// Stored byte length of the object.
    pub size: u64,
}

/// Interface used to read, write and enumerate archive objects.
///
/// Implementations surface failures as-is; retries belong to whoever invokes
/// the reconciler.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetches the bytes and user metadata of an object.
    async fn get(&self, bucket: &str, key: &str) -> anyhow::Result<StoredObject>;

    /// Writes (or overwrites) an object without user metadata.
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> anyhow::Result<()>;

    /// Lists every object whose key starts with `prefix`, sorted by key.
    async fn list(&self, bucket: &str, prefix: &str) -> anyhow::Result<Vec<ObjectSummary>>;
}
