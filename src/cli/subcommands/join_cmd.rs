// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use anyhow::Context as _;
use cid::Cid;
use human_repr::HumanCount as _;
use tracing::info;

use crate::reconcile::join_car_fragments;
use crate::utils::db::car_stream::CarStream;

#[derive(Debug, clap::Args)]
pub struct JoinCommand {
    /// Fragments in join order. Each can be a plain or a zstd compressed CAR file
    #[arg(required = true)]
    car_files: Vec<PathBuf>,
    /// The output CAR file path
    #[arg(short, long)]
    output: PathBuf,
    /// Root of the joined archive. Defaults to the root of the first fragment
    #[arg(long)]
    root: Option<Cid>,
}

impl JoinCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut fragments = Vec::with_capacity(self.car_files.len());
        for path in &self.car_files {
            fragments.push(
                tokio::fs::read(path)
                    .await
                    .with_context(|| format!("cannot read {}", path.display()))?,
            );
        }
        let root = match self.root {
            Some(root) => root,
            None => {
                let first = fragments.first().context("no fragments given")?;
                CarStream::new(first.as_slice()).await?.header.root()
            }
        };
        let joined = join_car_fragments(root, &fragments).await?;
        tokio::fs::write(&self.output, &joined)
            .await
            .with_context(|| format!("cannot write {}", self.output.display()))?;
        info!(
            "joined {} fragments into {} ({})",
            fragments.len(),
            self.output.display(),
            joined.len().human_count_bytes()
        );
        Ok(())
    }
}
