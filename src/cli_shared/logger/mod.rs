// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, Registry, prelude::*};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogOpts {
    /// One JSON object per event instead of human readable lines.
    pub json: bool,
}

/// Installs the global subscriber. Logs go to stderr so that command output
/// on stdout stays machine readable. Returns `false` when a subscriber was
/// already installed.
pub fn setup_logger(opts: LogOpts) -> bool {
    let layer: Box<dyn tracing_subscriber::layer::Layer<Registry> + Send + Sync> = if opts.json {
        Box::new(
            tracing_subscriber::fmt::Layer::new()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(get_env_filter(default_env_filter())),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt::Layer::new()
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr)
                .with_filter(get_env_filter(default_env_filter())),
        )
    };
    // A subscriber may already be installed when running in-process.
    match tracing_subscriber::registry().with(layer).try_init() {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("keeping the installed subscriber: {e}");
            false
        }
    }
}

/// Returns an [`EnvFilter`] according to the `RUST_LOG` environment variable, or a default
/// - see [`default_env_filter`]
///
/// Note that [`tracing_subscriber::filter::Builder`] only allows a single default directive,
/// whereas we want to provide multiple.
/// See also <https://github.com/tokio-rs/tracing/blob/27f688efb72316a26f3ec1f952c82626692c08ff/tracing-subscriber/src/filter/env/builder.rs#L189-L194>
fn get_env_filter(def: EnvFilter) -> EnvFilter {
    use std::env::{
        self,
        VarError::{NotPresent, NotUnicode},
    };
    match env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV) {
        Ok(s) => EnvFilter::new(s),
        Err(NotPresent) => def,
        Err(NotUnicode(_)) => EnvFilter::default(),
    }
}

fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info")
}
