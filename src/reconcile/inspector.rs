// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{ObjectMetadata, Structure};
use crate::cid_collections::{CidHashMap, CidHashSet};
use crate::ipld::DagNode;
use crate::utils::db::car_stream::{CarBlock, CarStream};
use crate::utils::multihash::{IDENTITY, MultihashCode};
use anyhow::Context as _;
use cid::Cid;
use futures::TryStreamExt as _;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct InspectOptions {
    /// Re-hash every block and reject the archive on a digest mismatch.
    pub verify_blocks: bool,
}

/// What a single archive tells about the DAG under its root.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInspection {
    #[serde_as(as = "DisplayFromStr")]
    pub root_cid: Cid,
    pub structure: Structure,
    /// Size of the whole DAG as declared by the root node.
    pub declared_size: Option<u64>,
    /// Distinct blocks in the archive.
    pub block_count: usize,
}

/// Classifies the archive `car` as complete or partial with respect to its
/// first root, and extracts the DAG size declared by the root node.
///
/// A `structure=Complete` hint in `metadata` is trusted and no traversal
/// happens. Otherwise every node reachable from the root is decoded from the
/// blocks of this archive only.
pub async fn inspect_car(
    car: &[u8],
    metadata: &ObjectMetadata,
    options: InspectOptions,
) -> anyhow::Result<CarInspection> {
    let stream = CarStream::new(car)
        .await
        .context("cannot read archive header")?;
    let root_cid = stream.header.root();

    let mut blocks: CidHashMap<Vec<u8>> = CidHashMap::default();
    stream
        .map_err(anyhow::Error::from)
        .try_for_each(|block| {
            let code = block.cid.hash().code();
            let result = if !options.verify_blocks {
                Ok(())
            } else if MultihashCode::is_supported(code) {
                block.validate()
            } else {
                debug!("cannot verify {} hashed with code {code:#x}", block.cid);
                Ok(())
            };
            let CarBlock { cid, data } = block;
            blocks.entry(cid).or_insert(data);
            futures::future::ready(result)
        })
        .await
        .context("cannot read archive blocks")?;
    let block_count = blocks.len();

    let Some(root_data) = blocks.get(&root_cid) else {
        debug!("root {root_cid} is not part of this archive");
        let structure = if metadata.asserts_complete() {
            Structure::Complete
        } else {
            Structure::Partial
        };
        return Ok(CarInspection {
            root_cid,
            structure,
            declared_size: None,
            block_count,
        });
    };

    if metadata.asserts_complete() {
        let declared_size = DagNode::decode(&root_cid, root_data)
            .ok()
            .and_then(|node| node.declared_size());
        debug!("trusting complete structure hint for {root_cid}");
        return Ok(CarInspection {
            root_cid,
            structure: Structure::Complete,
            declared_size,
            block_count,
        });
    }

    let root = DagNode::decode(&root_cid, root_data)
        .with_context(|| format!("cannot decode root node {root_cid}"))?;
    let structure = match find_missing_block(&root, &blocks)? {
        None => Structure::Complete,
        Some(missing) => {
            debug!("block {missing} reachable from {root_cid} is missing");
            Structure::Partial
        }
    };
    Ok(CarInspection {
        root_cid,
        structure,
        declared_size: root.declared_size(),
        block_count,
    })
}

/// Breadth-first walk from `root`. Returns the first reachable CID without a block.
fn find_missing_block(
    root: &DagNode,
    blocks: &CidHashMap<Vec<u8>>,
) -> anyhow::Result<Option<Cid>> {
    let mut seen = CidHashSet::new();
    let mut queue: VecDeque<Cid> = root.links().iter().copied().collect();
    while let Some(cid) = queue.pop_front() {
        if !seen.insert(cid) {
            continue;
        }
        // Identity CIDs inline their content.
        let data = if cid.hash().code() == IDENTITY {
            cid.hash().digest()
        } else {
            match blocks.get(&cid) {
                Some(data) => data.as_slice(),
                None => return Ok(Some(cid)),
            }
        };
        let node =
            DagNode::decode(&cid, data).with_context(|| format!("cannot decode node {cid}"))?;
        queue.extend(node.links().iter().filter(|link| !seen.contains(link)));
    }
    debug!("all {} reachable blocks are present", seen.len());
    Ok(None)
}
