// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Reassembles content-addressed archives (CARs) that are uploaded to an
//! object store in fragments.
//!
//! See [`reconcile::Orchestrator`] for the entry point.

mod cid_collections;
mod cli;
mod cli_shared;
pub mod ipld;
pub mod reconcile;
pub mod store;
#[cfg(test)]
mod test_utils;
mod utils;

pub use cli::main::main as car_reconciler_main;
pub use cli_shared::cli::Config;
pub use utils::db::car_stream::{CarBlock, CarStream, CarV1Header, CarWriter};
pub use utils::io::read_toml;
