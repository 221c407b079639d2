// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::Cid;
use std::fmt;
use thiserror::Error;

/// Which object an error is about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub bucket: String,
    pub key: String,
    pub root_cid: Option<Cid>,
}

impl ErrorContext {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            root_cid: None,
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)?;
        if let Some(root) = &self.root_cid {
            write!(f, " (root {root})")?;
        }
        Ok(())
    }
}

/// Fatal failures of a reconciliation. None of them leaves a completed archive behind.
///
/// [`ErrorKind`] is the stable tag of each variant, suitable for log fields.
#[derive(Debug, Error, strum::EnumDiscriminants)]
#[strum_discriminants(name(ErrorKind), derive(Hash, strum::Display))]
pub enum Error {
    #[error("{context}: key is outside of the {expected:?} namespace")]
    InvalidNamespace {
        context: ErrorContext,
        expected: String,
    },
    #[error("{context}: malformed archive: {source:#}")]
    MalformedArchive {
        context: ErrorContext,
        source: anyhow::Error,
    },
    #[error("{context}: cannot read object: {source:#}")]
    StorageRead {
        context: ErrorContext,
        source: anyhow::Error,
    },
    #[error("{context}: cannot write object: {source:#}")]
    StorageWrite {
        context: ErrorContext,
        source: anyhow::Error,
    },
    #[error("{context}: cannot list objects: {source:#}")]
    StorageList {
        context: ErrorContext,
        source: anyhow::Error,
    },
    #[error("{context}: joined archive lacks root block {root}")]
    RootNotFound { context: ErrorContext, root: Cid },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from(self)
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::InvalidNamespace { context, .. }
            | Self::MalformedArchive { context, .. }
            | Self::StorageRead { context, .. }
            | Self::StorageWrite { context, .. }
            | Self::StorageList { context, .. }
            | Self::RootNotFound { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::InvalidNamespace { context, .. }
            | Self::MalformedArchive { context, .. }
            | Self::StorageRead { context, .. }
            | Self::StorageWrite { context, .. }
            | Self::StorageList { context, .. }
            | Self::RootNotFound { context, .. } => context,
        }
    }

    /// Records the archive root once it is known.
    pub fn with_root_cid(mut self, root: Cid) -> Self {
        self.context_mut().root_cid = Some(root);
        self
    }
}
