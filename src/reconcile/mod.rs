// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Reconciliation of archives uploaded in fragments.
//!
//! Every fragment lands under `<incoming>/<root>/<fragment>`. When one
//! arrives, the [`Orchestrator`] decides whether the DAG under the archive
//! root is complete, either in that fragment alone or in the union of all
//! fragments uploaded so far, and if so writes a single archive to
//! `<completed>/<root>.<ext>`.

mod accountant;
mod config;
mod error;
mod event;
mod inspector;
mod joiner;
mod orchestrator;

pub use accountant::{DirectoryStat, directory_stat, logical_prefix};
pub use config::Config;
pub use error::{Error, ErrorContext, ErrorKind};
pub use event::S3Event;
pub use inspector::{CarInspection, InspectOptions, inspect_car};
pub use joiner::{JoinError, join_car_fragments};
pub use orchestrator::{Decision, DeferReason, FragmentEvent, Orchestrator, Outcome};

use crate::store::UserMetadata;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Whether an archive contains every block reachable from its root.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Structure {
    Complete,
    Partial,
}

/// User metadata key under which a producer may assert the structure of an upload.
pub const STRUCTURE_METADATA_KEY: &str = "structure";

/// The object metadata the reconciler understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Structure asserted by the producer. Only `Complete` changes behavior.
    pub structure: Option<Structure>,
}

impl ObjectMetadata {
    pub fn complete() -> Self {
        Self {
            structure: Some(Structure::Complete),
        }
    }

    pub fn from_user_metadata(metadata: &UserMetadata) -> Self {
        let structure = metadata
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(STRUCTURE_METADATA_KEY))
            .and_then(|(_, value)| match value.parse::<Structure>() {
                Ok(structure) => Some(structure),
                Err(_) => {
                    warn!("ignoring unknown structure metadata {value:?}");
                    None
                }
            });
        Self { structure }
    }

    pub fn asserts_complete(&self) -> bool {
        self.structure == Some(Structure::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[("structure", "Complete")], Some(Structure::Complete))]
    #[case(&[("Structure", "complete")], Some(Structure::Complete))]
    #[case(&[("structure", "Partial")], Some(Structure::Partial))]
    #[case(&[("structure", "done")], None)]
    #[case(&[("other", "Complete")], None)]
    #[case(&[], None)]
    fn metadata_structure(#[case] pairs: &[(&str, &str)], #[case] expected: Option<Structure>) {
        let metadata: UserMetadata = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(
            ObjectMetadata::from_user_metadata(&metadata).structure,
            expected
        );
    }

    #[test]
    fn only_complete_is_a_fast_path() {
        assert!(ObjectMetadata::complete().asserts_complete());
        assert!(!ObjectMetadata::default().asserts_complete());
        assert!(
            !ObjectMetadata {
                structure: Some(Structure::Partial)
            }
            .asserts_complete()
        );
    }
}
