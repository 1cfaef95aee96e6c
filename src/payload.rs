//! Submission payload construction
//!
//! A configured notification target is submitted as an ordered list of
//! `{key, value}` pairs: the connection string under its dialect-specific
//! key, followed by the auxiliary settings. Building the list keeps empty
//! values; the submitting side strips them with [`strip_empty`] just before
//! the request, matching the "remove empty fields" step of the consumer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::ConnectionCodec;
use crate::error::{PayloadError, PayloadResult};
use crate::sync::FieldSync;

/// One `{key, value}` pair of the submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Event record format for a notification target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFormat {
    /// One row per object, replaced in place.
    Namespace,

    /// One row per event, append-only.
    Access,
}

impl EventFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            EventFormat::Namespace => "namespace",
            EventFormat::Access => "access",
        }
    }
}

impl fmt::Display for EventFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventFormat {
    type Err = PayloadError;

    fn from_str(s: &str) -> PayloadResult<Self> {
        match s {
            "namespace" => Ok(EventFormat::Namespace),
            "access" => Ok(EventFormat::Access),
            other => Err(PayloadError::InvalidFormat(other.to_string())),
        }
    }
}

/// Auxiliary target settings submitted alongside the connection string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSettings {
    #[serde(default)]
    pub table: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<EventFormat>,

    #[serde(default)]
    pub queue_dir: String,

    #[serde(default)]
    pub queue_limit: String,

    #[serde(default)]
    pub comment: String,
}

/// A notification target being configured: the synced connection string
/// plus its auxiliary settings.
#[derive(Debug, Clone)]
pub struct TargetConfig<C: ConnectionCodec> {
    pub sync: FieldSync<C>,
    pub settings: TargetSettings,
}

impl<C: ConnectionCodec> Default for TargetConfig<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ConnectionCodec> TargetConfig<C> {
    pub fn new() -> Self {
        Self {
            sync: FieldSync::new(),
            settings: TargetSettings::default(),
        }
    }

    /// The full ordered change set for submission.
    ///
    /// Order is fixed: connection string, table, format, queue_dir,
    /// queue_limit, comment. Empty values are kept; stripping them is the
    /// submitting side's step ([`strip_empty`]).
    pub fn key_values(&self) -> Vec<KeyValue> {
        let format = self
            .settings
            .format
            .map(|f| f.as_str().to_string())
            .unwrap_or_default();
        vec![
            KeyValue::new(C::STRING_KEY, self.sync.connection_string()),
            KeyValue::new("table", self.settings.table.clone()),
            KeyValue::new("format", format),
            KeyValue::new("queue_dir", self.settings.queue_dir.clone()),
            KeyValue::new("queue_limit", self.settings.queue_limit.clone()),
            KeyValue::new("comment", self.settings.comment.clone()),
        ]
    }
}

/// Drop pairs with empty values, preserving order.
///
/// This is the submission-side "remove empty fields" step; payload builders
/// never filter on their own.
pub fn strip_empty(pairs: Vec<KeyValue>) -> Vec<KeyValue> {
    pairs.into_iter().filter(|kv| !kv.value.is_empty()).collect()
}
