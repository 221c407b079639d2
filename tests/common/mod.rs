// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::Path;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use car_reconciler::ipld::dag_pb::{PbLink, PbNode};
use car_reconciler::ipld::{DAG_PB, RAW};
use car_reconciler::{CarBlock, CarWriter};
use cid::Cid;
use futures::SinkExt as _;
use futures::executor::block_on;
use multihash_codetable::{Code, MultihashDigest as _};

pub fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("car-reconciler");
    cmd.env_remove("CAR_RECONCILER_CONFIG");
    cmd
}

pub fn raw_block(data: &[u8]) -> CarBlock {
    CarBlock {
        cid: Cid::new_v1(RAW, Code::Sha2_256.digest(data)),
        data: data.to_vec(),
    }
}

/// A file of `leaf_count` raw leaves of `leaf_size` bytes under one `dag-pb`
/// node. The root comes first.
pub fn file_dag(leaf_count: usize, leaf_size: usize) -> Vec<CarBlock> {
    let leaves: Vec<CarBlock> = (0..leaf_count)
        .map(|i| raw_block(&vec![u8::try_from(i % 256).unwrap(); leaf_size]))
        .collect();
    let node = PbNode {
        links: leaves
            .iter()
            .map(|leaf| PbLink::new(leaf.cid, "", leaf.data.len() as u64))
            .collect(),
        data: Some(vec![0x08, 0x02]),
    };
    let data = node.encode();
    let root = CarBlock {
        cid: Cid::new_v1(DAG_PB, Code::Sha2_256.digest(&data)),
        data,
    };
    std::iter::once(root).chain(leaves).collect()
}

pub fn car_bytes(root: Cid, blocks: &[CarBlock]) -> Vec<u8> {
    let mut buffer = vec![];
    block_on(async {
        let mut writer = CarWriter::new_carv1(nunny::vec![root], &mut buffer).unwrap();
        for block in blocks {
            writer.feed(block.clone()).await.unwrap();
        }
        writer.close().await.unwrap();
    });
    buffer
}

/// Every fragment carries the root block and up to `leaves_per_fragment` leaves.
pub fn fragments(dag: &[CarBlock], leaves_per_fragment: usize) -> Vec<Vec<u8>> {
    let (root, leaves) = dag.split_first().unwrap();
    leaves
        .chunks(leaves_per_fragment)
        .map(|chunk| {
            let blocks: Vec<CarBlock> = std::iter::once(root.clone())
                .chain(chunk.iter().cloned())
                .collect();
            car_bytes(root.cid, &blocks)
        })
        .collect()
}

pub fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
