// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Error, ErrorContext};
use crate::store::ObjectStore;
use human_repr::HumanCount as _;
use itertools::Itertools as _;
use tracing::debug;

/// The fragments uploaded so far next to a given one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryStat {
    pub prefix: String,
    /// Sum of the stored byte lengths of all listed objects.
    pub accum_size: u64,
    /// Listed keys, sorted and unique.
    pub sibling_keys: Vec<String>,
}

/// Everything before the last `/` of `key`, or the empty string.
pub fn logical_prefix(key: &str) -> &str {
    key.rsplit_once('/').map(|(prefix, _)| prefix).unwrap_or_default()
}

/// Lists the objects sharing the logical prefix of `key` and adds up their sizes.
pub async fn directory_stat(
    store: &(impl ObjectStore + ?Sized),
    bucket: &str,
    key: &str,
) -> Result<DirectoryStat, Error> {
    let prefix = logical_prefix(key);
    let query = if prefix.is_empty() {
        String::new()
    } else {
        format!("{prefix}/")
    };
    let listed = store
        .list(bucket, &query)
        .await
        .map_err(|source| Error::StorageList {
            context: ErrorContext::new(bucket, key),
            source,
        })?;

    let accum_size = listed.iter().map(|object| object.size).sum::<u64>();
    let sibling_keys = listed
        .into_iter()
        .map(|object| object.key)
        .sorted()
        .dedup()
        .collect_vec();
    debug!(
        "{} objects under {bucket}/{query} hold {}",
        sibling_keys.len(),
        accum_size.human_count_bytes()
    );
    Ok(DirectoryStat {
        prefix: prefix.to_owned(),
        accum_size,
        sibling_keys,
    })
}
