// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::*;
use cid::Cid;

#[cfg(doc)]
use std::collections::HashSet;

/// A hash set implemented as a `HashMap` where the value is `()`.
///
/// See also [`HashSet`].
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct CidHashSet {
    inner: CidHashMap<()>,
}

impl CidHashSet {
    /// Creates an empty `HashSet`.
    ///
    /// See also [`HashSet::new`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted.
    ///
    /// See also [`HashSet::insert`].
    pub fn insert(&mut self, cid: Cid) -> bool {
        self.inner.insert(cid, ()).is_none()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set contains a `Cid`.
    pub fn contains(&self, cid: &Cid) -> bool {
        self.inner.contains_key(cid)
    }
}

////////////////////
// Collection Ops //
////////////////////

impl Extend<Cid> for CidHashSet {
    fn extend<T: IntoIterator<Item = Cid>>(&mut self, iter: T) {
        self.inner.extend(iter.into_iter().map(|it| (it, ())))
    }
}

impl FromIterator<Cid> for CidHashSet {
    fn from_iter<T: IntoIterator<Item = Cid>>(iter: T) -> Self {
        let mut this = Self::new();
        this.extend(iter);
        this
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::multihash::prelude::*;

    fn cid(data: &[u8]) -> Cid {
        Cid::new_v1(0x55, MultihashCode::Sha2_256.digest(data))
    }

    #[test]
    fn insert_reports_novelty() {
        let mut set = CidHashSet::new();
        assert!(set.insert(cid(b"a")));
        assert!(!set.insert(cid(b"a")));
        assert!(set.insert(cid(b"b")));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&cid(b"b")));
        assert!(!set.contains(&cid(b"c")));
    }

    #[test]
    fn collect_deduplicates() {
        let set: CidHashSet = [cid(b"a"), cid(b"b"), cid(b"a")].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
