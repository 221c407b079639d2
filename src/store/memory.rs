// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{ObjectStore, ObjectSummary, StoredObject, UserMetadata};
use anyhow::Context as _;
use itertools::Itertools;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An [`ObjectStore`] kept in memory. Keys are ordered per bucket, so listings
/// come back sorted like those of a remote object store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: RwLock<BTreeMap<String, BTreeMap<String, StoredObject>>>,
    gets: AtomicUsize,
    lists: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, bytes: Vec<u8>) {
        self.insert_with_metadata(bucket, key, bytes, UserMetadata::new())
    }

    pub fn insert_with_metadata(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        metadata: UserMetadata,
    ) {
        self.buckets
            .write()
            .entry(bucket.to_owned())
            .or_default()
            .insert(key.to_owned(), StoredObject { bytes, metadata });
    }

    /// Returns a copy of the object bytes, if present.
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.buckets
            .read()
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|object| object.bytes.clone())
    }

    /// Every key of a bucket, in order.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.buckets
            .read()
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect_vec())
            .unwrap_or_default()
    }

    /// Number of `get` calls served so far.
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::Relaxed)
    }

    /// Number of `list` calls served so far.
    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, bucket: &str, key: &str) -> anyhow::Result<StoredObject> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.buckets
            .read()
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
            .with_context(|| format!("object {key} not found in bucket {bucket}"))
    }

    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> anyhow::Result<()> {
        self.insert(bucket, key, bytes);
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> anyhow::Result<Vec<ObjectSummary>> {
        self.lists.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .buckets
            .read()
            .get(bucket)
            .map(|objects| {
                objects
                    .range(prefix.to_owned()..)
                    .take_while(|(key, _)| key.starts_with(prefix))
                    .map(|(key, object)| ObjectSummary {
                        key: key.clone(),
                        size: object.bytes.len() as u64,
                    })
                    .collect_vec()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn list_returns_sorted_prefix_matches() {
        let store = MemoryStore::new();
        store.insert("b", "raw/x/2.car", vec![0; 3]);
        store.insert("b", "raw/x/1.car", vec![0; 5]);
        store.insert("b", "raw/y/1.car", vec![0; 7]);
        store.insert("other", "raw/x/3.car", vec![0; 9]);

        let listed = store.list("b", "raw/x/").await.unwrap();
        assert_eq!(
            listed,
            vec![
                ObjectSummary {
                    key: "raw/x/1.car".into(),
                    size: 5
                },
                ObjectSummary {
                    key: "raw/x/2.car".into(),
                    size: 3
                },
            ]
        );
        assert_eq!(store.list_count(), 1);
        assert!(store.list("missing", "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_returns_metadata_and_counts() {
        let store = MemoryStore::new();
        let metadata = UserMetadata::from([("structure".to_owned(), "Complete".to_owned())]);
        store.insert_with_metadata("b", "k", vec![1, 2], metadata.clone());

        let object = store.get("b", "k").await.unwrap();
        assert_eq!(object.bytes, vec![1, 2]);
        assert_eq!(object.metadata, metadata);
        assert!(store.get("b", "nope").await.is_err());
        assert_eq!(store.get_count(), 2);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let store = MemoryStore::new();
        store.put("b", "k", vec![1]).await.unwrap();
        store.put("b", "k", vec![2]).await.unwrap();
        assert_eq!(store.object("b", "k"), Some(vec![2]));
        assert_eq!(store.keys("b"), vec!["k".to_owned()]);
    }
}
