// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::utils::db::car_stream::{CarBlock, CarStream, CarWriter};
use crate::utils::db::car_util::{dedup_block_stream, merge_car_streams};
use anyhow::Context as _;
use cid::Cid;
use futures::{SinkExt as _, TryStreamExt as _};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JoinError {
    #[error(transparent)]
    Malformed(#[from] anyhow::Error),
    #[error("no fragment holds root block {0}")]
    RootNotFound(Cid),
}

/// Merges `fragments` into a single `CARv1` archive rooted at `root`.
///
/// Blocks keep the order in which they appear across the fragments, taken in
/// the given order. A block present in several fragments is written once, at
/// its first occurrence.
pub async fn join_car_fragments(root: Cid, fragments: &[Vec<u8>]) -> Result<Vec<u8>, JoinError> {
    let mut streams = Vec::with_capacity(fragments.len());
    for (index, fragment) in fragments.iter().enumerate() {
        streams.push(
            CarStream::new(fragment.as_slice())
                .await
                .with_context(|| format!("cannot read fragment #{index}"))?,
        );
    }
    let blocks: Vec<CarBlock> = dedup_block_stream(merge_car_streams(streams))
        .try_collect()
        .await
        .context("cannot read fragment blocks")?;
    if !blocks.iter().any(|block| block.cid == root) {
        return Err(JoinError::RootNotFound(root));
    }

    let mut joined = Vec::with_capacity(blocks.iter().map(|block| block.data.len()).sum());
    let mut writer = CarWriter::new_carv1(nunny::vec![root], &mut joined)
        .context("cannot write archive header")?;
    for block in blocks {
        writer.feed(block).await.context("cannot write block")?;
    }
    writer.close().await.context("cannot write archive")?;
    Ok(joined)
}
