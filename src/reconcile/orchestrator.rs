// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{
    Config, Error, ErrorContext, InspectOptions, JoinError, ObjectMetadata, Structure,
    directory_stat, inspect_car, join_car_fragments,
};
use crate::store::ObjectStore;
use cid::Cid;
use futures::{StreamExt as _, TryStreamExt as _};
use human_repr::HumanCount as _;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use tracing::{error, info};

/// A fragment has been written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentEvent {
    pub bucket: String,
    pub key: String,
}

impl FragmentEvent {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// Why nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum DeferReason {
    /// The root does not declare the size of the DAG.
    UnknownSize,
    /// The declared size is above `max_size_to_attempt`.
    Oversized,
    /// The fragments uploaded so far are smaller than the declared size.
    IncompleteUpload,
    /// All fragments were joined and blocks are still missing.
    StillPartial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Decision {
    /// A complete archive was written under `key`.
    Persisted { key: String },
    Deferred { reason: DeferReason },
}

/// Result of handling one [`FragmentEvent`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    #[serde_as(as = "DisplayFromStr")]
    pub root_cid: Cid,
    /// Structure of the triggering fragment on its own.
    pub structure: Structure,
    /// Structure of the union of all fragments, when it was looked at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_structure: Option<Structure>,
    pub decision: Decision,
}

/// Decides, for every arriving fragment, whether a complete archive can be
/// written, and writes it.
pub struct Orchestrator<S> {
    store: S,
    config: Config,
}

impl<S: ObjectStore> Orchestrator<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[tracing::instrument(skip_all, fields(bucket = %event.bucket, key = %event.key))]
    pub async fn handle(&self, event: &FragmentEvent) -> Result<Outcome, Error> {
        self.reconcile(event).await.inspect_err(|e| {
            error!(kind = %e.kind(), "{e}");
        })
    }

    async fn reconcile(&self, event: &FragmentEvent) -> Result<Outcome, Error> {
        let FragmentEvent { bucket, key } = event;
        let context = || ErrorContext::new(bucket, key);

        if !self.config.is_incoming(key) {
            return Err(Error::InvalidNamespace {
                context: context(),
                expected: self.config.incoming_namespace.clone(),
            });
        }

        let object = self
            .store
            .get(bucket, key)
            .await
            .map_err(|source| Error::StorageRead {
                context: context(),
                source,
            })?;
        let metadata = ObjectMetadata::from_user_metadata(&object.metadata);
        let inspection = inspect_car(&object.bytes, &metadata, self.inspect_options())
            .await
            .map_err(|source| Error::MalformedArchive {
                context: context(),
                source,
            })?;
        let root = inspection.root_cid;
        let partial = |directory_structure: Option<Structure>,
                       reason: DeferReason|
         -> Result<Outcome, Error> {
            info!("{root} deferred: {reason}");
            Ok(Outcome {
                root_cid: root,
                structure: Structure::Partial,
                directory_structure,
                decision: Decision::Deferred { reason },
            })
        };

        if inspection.structure == Structure::Complete {
            let destination = self.persist(bucket, key, root, object.bytes).await?;
            return Ok(Outcome {
                root_cid: root,
                structure: Structure::Complete,
                directory_structure: None,
                decision: Decision::Persisted { key: destination },
            });
        }

        let Some(declared_size) = inspection.declared_size else {
            return partial(None, DeferReason::UnknownSize);
        };
        if declared_size > self.config.max_size_to_attempt {
            info!(
                "{root} declares {}, above the limit of {}",
                declared_size.human_count_bytes(),
                self.config.max_size_to_attempt.human_count_bytes()
            );
            return partial(None, DeferReason::Oversized);
        }

        let stat = directory_stat(&self.store, bucket, key)
            .await
            .map_err(|e| e.with_root_cid(root))?;
        if stat.accum_size < declared_size {
            info!(
                "{root}: {} of {} uploaded",
                stat.accum_size.human_count_bytes(),
                declared_size.human_count_bytes()
            );
            return partial(Some(Structure::Partial), DeferReason::IncompleteUpload);
        }

        let mut keys = stat.sibling_keys;
        if let Err(position) = keys.binary_search(key) {
            keys.insert(position, key.clone());
        }
        info!("{root}: joining {} fragments", keys.len());
        let fragments = self.fetch_fragments(bucket, key, root, keys, object.bytes).await?;
        let joined = join_car_fragments(root, &fragments)
            .await
            .map_err(|e| match e {
                JoinError::Malformed(source) => Error::MalformedArchive {
                    context: context(),
                    source,
                },
                JoinError::RootNotFound(root) => Error::RootNotFound {
                    context: context(),
                    root,
                },
            })
            .map_err(|e| e.with_root_cid(root))?;

        let rejoined = inspect_car(&joined, &ObjectMetadata::default(), self.inspect_options())
            .await
            .map_err(|source| {
                Error::MalformedArchive {
                    context: context(),
                    source,
                }
                .with_root_cid(root)
            })?;
        if rejoined.structure != Structure::Complete {
            return partial(Some(Structure::Partial), DeferReason::StillPartial);
        }

        let destination = self.persist(bucket, key, root, joined).await?;
        Ok(Outcome {
            root_cid: root,
            structure: Structure::Partial,
            directory_structure: Some(Structure::Complete),
            decision: Decision::Persisted { key: destination },
        })
    }

    fn inspect_options(&self) -> InspectOptions {
        InspectOptions {
            verify_blocks: self.config.verify_blocks,
        }
    }

    /// Fetches every fragment in `keys` order, `fetch_concurrency` at a time.
    /// The bytes of the triggering fragment are reused.
    async fn fetch_fragments(
        &self,
        bucket: &str,
        key: &str,
        root: Cid,
        keys: Vec<String>,
        own_bytes: Vec<u8>,
    ) -> Result<Vec<Vec<u8>>, Error> {
        let mut own_bytes = Some(own_bytes);
        futures::stream::iter(keys)
            .map(|sibling| {
                let reused = if sibling == key { own_bytes.take() } else { None };
                async move {
                    match reused {
                        Some(bytes) => Ok(bytes),
                        None => self
                            .store
                            .get(bucket, &sibling)
                            .await
                            .map(|object| object.bytes)
                            .map_err(|source| {
                                Error::StorageRead {
                                    context: ErrorContext::new(bucket, sibling.as_str()),
                                    source,
                                }
                                .with_root_cid(root)
                            }),
                    }
                }
            })
            .buffered(self.config.fetch_concurrency.max(1))
            .try_collect()
            .await
    }

    async fn persist(
        &self,
        bucket: &str,
        key: &str,
        root: Cid,
        bytes: Vec<u8>,
    ) -> Result<String, Error> {
        let destination = self.config.completed_key(&root);
        let size = bytes.len() as u64;
        self.store
            .put(bucket, &destination, bytes)
            .await
            .map_err(|source| {
                Error::StorageWrite {
                    context: ErrorContext::new(bucket, key),
                    source,
                }
                .with_root_cid(root)
            })?;
        info!(
            "{root} complete, wrote {} to {bucket}/{destination}",
            size.human_count_bytes()
        );
        Ok(destination)
    }
}
