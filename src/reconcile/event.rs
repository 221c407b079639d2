// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Notification envelope of object-created events, as delivered by S3
//! compatible stores.

use super::FragmentEvent;
use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    /// URL-encoded object key.
    pub key: String,
}

impl S3Event {
    /// The fragment named by the first record.
    pub fn fragment_event(&self) -> anyhow::Result<FragmentEvent> {
        let record = self.records.first().context("event has no records")?;
        Ok(FragmentEvent {
            bucket: record.s3.bucket.name.clone(),
            key: decode_object_key(&record.s3.object.key)?,
        })
    }
}

/// Object keys in notifications are form-encoded: `+` stands for a space.
fn decode_object_key(key: &str) -> anyhow::Result<String> {
    let key = key.replace('+', " ");
    Ok(urlencoding::decode(&key)
        .with_context(|| format!("invalid object key {key:?}"))?
        .into_owned())
}
