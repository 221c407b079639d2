// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use anyhow::Context as _;

use crate::reconcile::{self, InspectOptions, ObjectMetadata, inspect_car};

#[derive(Debug, clap::Args)]
pub struct InspectCommand {
    /// A plain or zstd compressed CAR file
    car: PathBuf,
    /// Behave as if the archive carried a `structure=Complete` hint
    #[arg(long)]
    assume_complete: bool,
    /// Check every block against its CID
    #[arg(long)]
    verify_blocks: bool,
}

impl InspectCommand {
    pub async fn run(self, config: reconcile::Config) -> anyhow::Result<()> {
        let car = tokio::fs::read(&self.car)
            .await
            .with_context(|| format!("cannot read {}", self.car.display()))?;
        let metadata = if self.assume_complete {
            ObjectMetadata::complete()
        } else {
            ObjectMetadata::default()
        };
        let options = InspectOptions {
            verify_blocks: self.verify_blocks || config.verify_blocks,
        };
        let inspection = inspect_car(&car, &metadata, options)
            .await
            .with_context(|| format!("cannot inspect {}", self.car.display()))?;
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        Ok(())
    }
}
