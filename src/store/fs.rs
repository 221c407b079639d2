// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{ObjectStore, ObjectSummary, StoredObject, UserMetadata};
use anyhow::Context as _;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Suffix of the JSON file holding an object's user metadata, next to the object.
pub const METADATA_SUFFIX: &str = ".metadata.json";

/// An [`ObjectStore`] backed by a local directory: the object `key` of
/// `bucket` lives at `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, bucket: &str) -> anyhow::Result<PathBuf> {
        Ok(self.root.join(relative_path(bucket)?))
    }

    fn object_path(&self, bucket: &str, key: &str) -> anyhow::Result<PathBuf> {
        Ok(self.bucket_dir(bucket)?.join(relative_path(key)?))
    }
}

/// Rejects anything that could escape the store root.
fn relative_path(key: &str) -> anyhow::Result<&Path> {
    let path = Path::new(key);
    anyhow::ensure!(
        !key.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_))),
        "invalid object key {key:?}"
    );
    Ok(path)
}

fn metadata_path(object_path: &Path) -> PathBuf {
    let mut path = object_path.as_os_str().to_owned();
    path.push(METADATA_SUFFIX);
    PathBuf::from(path)
}

#[async_trait::async_trait]
impl ObjectStore for FsStore {
    async fn get(&self, bucket: &str, key: &str) -> anyhow::Result<StoredObject> {
        let path = self.object_path(bucket, key)?;
        debug!("reading {}", path.display());
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        let metadata_path = metadata_path(&path);
        let metadata = match tokio::fs::read(&metadata_path).await {
            Ok(json) => serde_json::from_slice::<UserMetadata>(&json)
                .with_context(|| format!("invalid metadata in {}", metadata_path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => UserMetadata::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(StoredObject { bytes, metadata })
    }

    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> anyhow::Result<()> {
        let path = self.object_path(bucket, key)?;
        debug!("writing {}", path.display());
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("cannot write {}", path.display()))
    }

    async fn list(&self, bucket: &str, prefix: &str) -> anyhow::Result<Vec<ObjectSummary>> {
        let dir = self.bucket_dir(bucket)?;
        let prefix = prefix.to_owned();
        tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<ObjectSummary>> {
            if !dir.is_dir() {
                return Ok(vec![]);
            }
            let mut listed = vec![];
            for entry in walkdir::WalkDir::new(&dir) {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let key = entry
                    .path()
                    .strip_prefix(&dir)?
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if key.ends_with(METADATA_SUFFIX) || !key.starts_with(&prefix) {
                    continue;
                }
                listed.push(ObjectSummary {
                    key,
                    size: entry.metadata()?.len(),
                });
            }
            listed.sort_by(|a, b| a.key.cmp(&b.key));
            Ok(listed)
        })
        .await?
    }
}
