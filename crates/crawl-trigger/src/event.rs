//! Object-created notification payloads.
//!
//! Only the fields the handler reads are modelled; anything else in the
//! payload is ignored.

use crate::error::{Result, ResultExt, TriggerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A batch of storage notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord>,
}

/// One notification in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Object {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl S3EventRecord {
    pub fn bucket(&self) -> &str {
        &self.s3.bucket.name
    }

    pub fn key(&self) -> &str {
        &self.s3.object.key
    }
}

impl S3Event {
    /// Parse an event from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse an event from a file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TriggerError::EventNotFound(path.to_path_buf()));
        }
        let json = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
        Self::from_json(&json).context(format!("Failed to parse {}", path.display()))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Key of the last record in the batch.
    pub fn last_key(&self) -> Option<&str> {
        self.records.last().map(S3EventRecord::key)
    }
}
