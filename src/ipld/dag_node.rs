// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{DAG_CBOR, DAG_PB, DecodeError, dag_pb::PbNode};
use cid::Cid;
use ipld_core::ipld::Ipld;

/// How a block takes part in a DAG, as far as reachability is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DagNode {
    /// No outgoing references.
    Leaf,
    Linked {
        links: Vec<Cid>,
        /// Aggregate byte length of the node and all of its descendants, when
        /// the encoding declares one.
        declared_size: Option<u64>,
    },
}

impl DagNode {
    /// Interprets `data` according to the codec of `cid`. Codecs other than
    /// `dag-pb` and `dag-cbor` are opaque and treated as leaves.
    pub fn decode(cid: &Cid, data: &[u8]) -> Result<Self, DecodeError> {
        match cid.codec() {
            DAG_PB => {
                let node = PbNode::decode(data)?;
                if node.links.is_empty() {
                    return Ok(Self::Leaf);
                }
                Ok(Self::Linked {
                    declared_size: node.cumulative_size(data.len()),
                    links: node.links.into_iter().map(|link| link.hash).collect(),
                })
            }
            DAG_CBOR => {
                let ipld: Ipld = serde_ipld_dagcbor::from_slice(data)
                    .map_err(|e| DecodeError::DagCbor(e.to_string()))?;
                let links = extract_links(&ipld);
                if links.is_empty() {
                    return Ok(Self::Leaf);
                }
                Ok(Self::Linked {
                    links,
                    declared_size: None,
                })
            }
            _ => Ok(Self::Leaf),
        }
    }

    pub fn links(&self) -> &[Cid] {
        match self {
            Self::Leaf => &[],
            Self::Linked { links, .. } => links,
        }
    }

    pub fn declared_size(&self) -> Option<u64> {
        match self {
            Self::Leaf => None,
            Self::Linked { declared_size, .. } => *declared_size,
        }
    }
}

/// Collects every link of an IPLD value, in document order.
fn extract_links(ipld: &Ipld) -> Vec<Cid> {
    let mut links = vec![];
    let mut stack = vec![ipld];
    while let Some(next) = stack.pop() {
        match next {
            Ipld::Map(map) => stack.extend(map.values().rev()),
            Ipld::List(list) => stack.extend(list.iter().rev()),
            Ipld::Link(cid) => links.push(*cid),
            _ => (),
        }
    }
    links
}
