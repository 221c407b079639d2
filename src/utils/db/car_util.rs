// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use futures::{Stream, StreamExt, TryStreamExt};
use tokio::io::AsyncBufRead;

use crate::cid_collections::CidHashSet;
use crate::utils::db::car_stream::{CarBlock, CarStream};

/// Chains the blocks of every stream, in the order the streams are given.
pub fn merge_car_streams<R>(
    car_streams: Vec<CarStream<R>>,
) -> impl Stream<Item = std::io::Result<CarBlock>>
where
    R: AsyncBufRead + Unpin,
{
    futures::stream::iter(car_streams).flatten()
}

/// Drops every block whose CID has already been yielded. The first occurrence wins.
pub fn dedup_block_stream(
    stream: impl Stream<Item = std::io::Result<CarBlock>>,
) -> impl Stream<Item = std::io::Result<CarBlock>> {
    let mut seen = CidHashSet::default();
    stream.try_filter(move |CarBlock { cid, data: _ }| futures::future::ready(seen.insert(*cid)))
}
