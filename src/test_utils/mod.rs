// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! DAG and archive fixtures shared by the unit tests.

use crate::cid_collections::CidHashMap;
use crate::ipld::dag_pb::{PbLink, PbNode};
use crate::ipld::{DAG_CBOR, DAG_PB, DagNode, RAW};
use crate::utils::db::car_stream::{CarBlock, CarWriter};
use crate::utils::multihash::prelude::*;
use cid::Cid;
use futures::SinkExt as _;
use ipld_core::ipld::Ipld;

// `UnixFS` `Data` payloads for a file and a directory node
const UNIXFS_FILE: [u8; 2] = [0x08, 0x02];
const UNIXFS_DIRECTORY: [u8; 2] = [0x08, 0x01];

pub fn raw_block(data: &[u8]) -> CarBlock {
    CarBlock {
        cid: Cid::new_v1(RAW, MultihashCode::Sha2_256.digest(data)),
        data: data.to_vec(),
    }
}

pub fn pb_block(node: &PbNode) -> CarBlock {
    let data = node.encode();
    CarBlock {
        cid: Cid::new_v1(DAG_PB, MultihashCode::Sha2_256.digest(&data)),
        data,
    }
}

pub fn cbor_block(ipld: &Ipld) -> CarBlock {
    let data = serde_ipld_dagcbor::to_vec(ipld).unwrap();
    CarBlock {
        cid: Cid::new_v1(DAG_CBOR, MultihashCode::Blake2b256.digest(&data)),
        data,
    }
}

/// Deterministic, mostly non-repeating content.
pub fn content(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| (i.wrapping_mul(7919) % 251) as u8 ^ (i / 251) as u8)
        .collect()
}

/// Serializes `blocks` as a plain `CARv1` archive rooted at `root`.
pub async fn car_bytes(root: Cid, blocks: &[CarBlock]) -> Vec<u8> {
    let mut buffer = vec![];
    let mut writer = CarWriter::new_carv1(nunny::vec![root], &mut buffer).unwrap();
    for block in blocks {
        writer.feed(block.clone()).await.unwrap();
    }
    writer.close().await.unwrap();
    buffer
}

/// A DAG with its blocks in depth-first pre-order, root first.
#[derive(Debug, Clone)]
pub struct DagFixture {
    pub root: Cid,
    pub blocks: Vec<CarBlock>,
}

impl DagFixture {
    /// A file chunked into raw leaves of `chunk_size` bytes. Content that fits
    /// in one chunk becomes a single raw block.
    pub fn file(content: &[u8], chunk_size: usize) -> Self {
        if content.len() <= chunk_size {
            let leaf = raw_block(content);
            return Self {
                root: leaf.cid,
                blocks: vec![leaf],
            };
        }
        let leaves: Vec<CarBlock> = content.chunks(chunk_size).map(raw_block).collect();
        let node = PbNode {
            links: leaves
                .iter()
                .map(|leaf| PbLink::new(leaf.cid, "", leaf.data.len() as u64))
                .collect(),
            data: Some(UNIXFS_FILE.to_vec()),
        };
        let root = pb_block(&node);
        Self {
            root: root.cid,
            blocks: std::iter::once(root).chain(leaves).collect(),
        }
    }

    /// Wraps the DAG in a single-entry directory node.
    pub fn wrap_in_directory(self, name: &str) -> Self {
        let node = PbNode {
            links: vec![PbLink::new(self.root, name, self.cumulative_size())],
            data: Some(UNIXFS_DIRECTORY.to_vec()),
        };
        let root = pb_block(&node);
        Self {
            root: root.cid,
            blocks: std::iter::once(root).chain(self.blocks).collect(),
        }
    }

    pub fn root_block(&self) -> &CarBlock {
        &self.blocks[0]
    }

    /// Size of the DAG as a parent link would declare it in its `Tsize`.
    pub fn cumulative_size(&self) -> u64 {
        let root = self.root_block();
        DagNode::decode(&root.cid, &root.data)
            .unwrap()
            .declared_size()
            .unwrap_or(root.data.len() as u64)
    }

    pub async fn car(&self) -> Vec<u8> {
        car_bytes(self.root, &self.blocks).await
    }

    /// Splits the DAG the way a tree-walking splitter does: blocks are
    /// visited depth first, and every fragment after the first starts with
    /// the chain of ancestors of its first block, so each fragment carries the
    /// root block. A fragment is closed once adding the next block would take
    /// it past `target_size` bytes of block data.
    pub fn split(&self, target_size: usize) -> Vec<Vec<CarBlock>> {
        let mut splitter = Splitter {
            blocks: self.blocks.iter().map(|b| (b.cid, b)).collect(),
            target_size,
            fragments: vec![],
            current: vec![],
        };
        splitter.walk(self.root, &mut vec![]);
        if !splitter.current.is_empty() {
            splitter.fragments.push(splitter.current);
        }
        splitter.fragments
    }

    /// [`DagFixture::split`], serialized as archives that all declare the DAG root.
    pub async fn split_cars(&self, target_size: usize) -> Vec<Vec<u8>> {
        let mut cars = vec![];
        for fragment in self.split(target_size) {
            cars.push(car_bytes(self.root, &fragment).await);
        }
        cars
    }
}

struct Splitter<'a> {
    blocks: CidHashMap<&'a CarBlock>,
    target_size: usize,
    fragments: Vec<Vec<CarBlock>>,
    current: Vec<CarBlock>,
}

impl Splitter<'_> {
    fn size(blocks: &[CarBlock]) -> usize {
        blocks.iter().map(|b| b.data.len()).sum()
    }

    fn walk(&mut self, cid: Cid, ancestors: &mut Vec<CarBlock>) {
        let block = (*self.blocks.get(&cid).unwrap()).clone();
        let has_own_blocks = self.current.len() > ancestors.len();
        if has_own_blocks
            && Self::size(&self.current) + block.data.len() > self.target_size
        {
            let full = std::mem::replace(&mut self.current, ancestors.clone());
            self.fragments.push(full);
        }
        self.current.push(block.clone());

        let links = DagNode::decode(&block.cid, &block.data)
            .unwrap()
            .links()
            .to_vec();
        if !links.is_empty() {
            ancestors.push(block);
            for link in links {
                self.walk(link, ancestors);
            }
            ancestors.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_file_is_one_raw_block() {
        let dag = DagFixture::file(&content(2), 100);
        assert_eq!(dag.blocks.len(), 1);
        assert_eq!(dag.root.codec(), RAW);
    }

    #[test]
    fn every_fragment_starts_with_the_root() {
        let dag = DagFixture::file(&content(150), 50).wrap_in_directory("file.txt");
        let fragments = dag.split(130);
        assert!(fragments.len() > 1);
        for fragment in &fragments {
            assert_eq!(fragment[0].cid, dag.root);
        }
        let union: crate::cid_collections::CidHashSet = fragments
            .iter()
            .flatten()
            .map(|block| block.cid)
            .collect();
        assert_eq!(union.len(), dag.blocks.len());
    }
}
