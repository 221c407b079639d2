// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use anyhow::Context as _;

use crate::reconcile::{self, FragmentEvent, Orchestrator, S3Event};
use crate::store::FsStore;

#[derive(Debug, clap::Args)]
pub struct HandleCommand {
    /// Directory holding one sub-directory per bucket
    #[arg(long)]
    store: PathBuf,
    /// A JSON object-created notification naming the fragment
    #[arg(long, conflicts_with_all = ["bucket", "key"])]
    event: Option<PathBuf>,
    /// Bucket of the fragment
    #[arg(long, requires = "key")]
    bucket: Option<String>,
    /// Key of the fragment, e.g. `raw/<root>/<fragment>`
    #[arg(long, requires = "bucket")]
    key: Option<String>,
}

impl HandleCommand {
    pub async fn run(self, config: reconcile::Config) -> anyhow::Result<()> {
        let event = match (self.event, self.bucket, self.key) {
            (Some(path), _, _) => {
                let json = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("cannot read {}", path.display()))?;
                serde_json::from_slice::<S3Event>(&json)
                    .with_context(|| format!("invalid event in {}", path.display()))?
                    .fragment_event()?
            }
            (None, Some(bucket), Some(key)) => FragmentEvent { bucket, key },
            _ => anyhow::bail!("either --event or both --bucket and --key are required"),
        };
        let orchestrator = Orchestrator::new(FsStore::new(self.store), config);
        let outcome = orchestrator.handle(&event).await?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        Ok(())
    }
}
