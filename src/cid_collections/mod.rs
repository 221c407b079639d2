// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod hash_set;

pub use hash_set::CidHashSet;

/// A hash map keyed by [`cid::Cid`].
pub type CidHashMap<V> = ahash::HashMap<cid::Cid, V>;
