// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod dag_node;
pub mod dag_pb;

pub use dag_node::DagNode;

/// Multicodec of opaque binary blocks.
pub const RAW: u64 = 0x55;
/// Multicodec of protobuf nodes (`UnixFS` files and directories).
pub const DAG_PB: u64 = 0x70;
/// Multicodec of CBOR nodes.
pub const DAG_CBOR: u64 = 0x71;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid dag-pb node: {0}")]
    DagPb(String),
    #[error("invalid dag-cbor node: {0}")]
    DagCbor(String),
}
