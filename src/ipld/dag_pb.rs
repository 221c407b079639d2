// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! `dag-pb` nodes: the link list and the `Tsize` of every link.
//!
//! See <https://ipld.io/specs/codecs/dag-pb/spec/>

use super::DecodeError;
use cid::Cid;
use prost::Message as _;

// `PBNode` field numbers
const NODE_DATA: u32 = 1;
const NODE_LINKS: u32 = 2;

/// Wire form of `PBLink`.
#[derive(Clone, PartialEq, prost::Message)]
struct RawPbLink {
    #[prost(bytes = "vec", optional, tag = "1")]
    hash: Option<Vec<u8>>,
    #[prost(string, optional, tag = "2")]
    name: Option<String>,
    #[prost(uint64, optional, tag = "3")]
    tsize: Option<u64>,
}

/// Wire form of `PBNode`.
#[derive(Clone, PartialEq, prost::Message)]
struct RawPbNode {
    #[prost(bytes = "vec", optional, tag = "1")]
    data: Option<Vec<u8>>,
    #[prost(message, repeated, tag = "2")]
    links: Vec<RawPbLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbLink {
    pub hash: Cid,
    pub name: Option<String>,
    /// Cumulative serialized size of the linked sub-DAG.
    pub tsize: Option<u64>,
}

impl PbLink {
    pub fn new(hash: Cid, name: impl Into<String>, tsize: u64) -> Self {
        Self {
            hash,
            name: Some(name.into()),
            tsize: Some(tsize),
        }
    }
}

impl TryFrom<RawPbLink> for PbLink {
    type Error = DecodeError;

    fn try_from(raw: RawPbLink) -> Result<Self, Self::Error> {
        let hash = raw
            .hash
            .ok_or_else(|| DecodeError::DagPb("link without a hash".into()))?;
        Ok(Self {
            hash: Cid::try_from(hash.as_slice()).map_err(|e| DecodeError::DagPb(e.to_string()))?,
            name: raw.name,
            tsize: raw.tsize,
        })
    }
}

impl From<&PbLink> for RawPbLink {
    fn from(link: &PbLink) -> Self {
        Self {
            hash: Some(link.hash.to_bytes()),
            name: link.name.clone(),
            tsize: link.tsize,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PbNode {
    pub links: Vec<PbLink>,
    pub data: Option<Vec<u8>>,
}

impl PbNode {
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let raw = RawPbNode::decode(buf).map_err(|e| DecodeError::DagPb(e.to_string()))?;
        Ok(Self {
            links: raw
                .links
                .into_iter()
                .map(PbLink::try_from)
                .collect::<Result<_, _>>()?,
            data: raw.data,
        })
    }

    /// Canonical encoding: links first, then data.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![];
        for link in &self.links {
            prost::encoding::message::encode(NODE_LINKS, &RawPbLink::from(link), &mut out);
        }
        if let Some(data) = &self.data {
            prost::encoding::bytes::encode(NODE_DATA, data, &mut out);
        }
        out
    }

    /// The byte length of this node plus the `Tsize` of all its links, i.e. the
    /// size of the whole DAG below it. `None` unless every link declares `Tsize`.
    pub fn cumulative_size(&self, encoded_len: usize) -> Option<u64> {
        self.links
            .iter()
            .try_fold(encoded_len as u64, |acc, link| {
                link.tsize.map(|tsize| acc.saturating_add(tsize))
            })
    }
}
