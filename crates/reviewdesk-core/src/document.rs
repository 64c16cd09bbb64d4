//! Typed model for compliance-review documents.
//!
//! Review documents arrive as semi-structured JSON (often Mongo extended JSON).
//! Only the document id is mandatory. Every nested field is read through a
//! lenient accessor that declares its own default, so a malformed artifact or
//! section degrades to empty values instead of failing the whole document.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("review document is not a JSON object")]
    NotAnObject,
    #[error("review document has no usable `_id`")]
    MissingId,
}

/// When a review was created.
///
/// The store holds this field inconsistently: sometimes a native timestamp,
/// sometimes a plain string. Both are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatedAt {
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl CreatedAt {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(CreatedAt::Text(s.clone())),
            Value::Object(map) => map
                .get("$date")
                .and_then(parse_ejson_date)
                .map(CreatedAt::Timestamp),
            _ => None,
        }
    }
}

impl std::fmt::Display for CreatedAt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreatedAt::Timestamp(ts) if ts.timestamp_subsec_nanos() == 0 => {
                write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S"))
            }
            CreatedAt::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.6f")),
            CreatedAt::Text(s) => f.write_str(s),
        }
    }
}

/// `$date` payloads: RFC 3339 string, `{"$numberLong": "<millis>"}`, or bare millis.
fn parse_ejson_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::Object(map) => map
            .get("$numberLong")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Render a timestamp the way the store expects inside `{"$date": ...}`.
pub fn ejson_date(ts: DateTime<Utc>) -> Value {
    serde_json::json!({ "$date": ts.to_rfc3339_opts(SecondsFormat::Millis, true) })
}

/// One compliance observation inside an artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub uuid: String,
    pub section_title: String,
    pub sentence: String,
    pub page_number: Option<String>,
    pub observations: String,
    pub rule_citation: String,
    pub recommendations: String,
    pub category: String,
    pub accept: bool,
    pub accept_with_changes: bool,
    pub reject: bool,
    pub reject_reason: String,
}

impl Section {
    /// Build a section from any JSON value. Non-objects yield an all-default section.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        Self {
            uuid: text(map, "uuid"),
            section_title: text(map, "section_title"),
            sentence: text(map, "sentence"),
            page_number: page(map, "page_number"),
            observations: text(map, "observations"),
            rule_citation: text(map, "rule_citation"),
            recommendations: text(map, "recommendations"),
            category: text(map, "category"),
            accept: flag(map, "accept"),
            accept_with_changes: flag(map, "accept_with_changes"),
            reject: flag(map, "reject"),
            reject_reason: text(map, "reject_reason"),
        }
    }
}

/// Output of one analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifact {
    pub agent_id: Option<String>,
    pub sections: Vec<Section>,
}

impl Artifact {
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        let agent_id = match map.get("agent_id") {
            None | Some(Value::Null) => None,
            Some(_) => Some(text(map, "agent_id")),
        };
        let sections = map
            .get("sections")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Section::from_value).collect())
            .unwrap_or_default();
        Self { agent_id, sections }
    }
}

/// A compliance-review record as fetched from the document store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct ReviewDocument {
    pub id: String,
    pub created_at: Option<CreatedAt>,
    /// Artifacts keyed by name, in stored order.
    pub recommendations: Vec<(String, Artifact)>,
    pub gcs_uri: Option<String>,
}

impl ReviewDocument {
    pub fn from_value(value: &Value) -> Result<Self, DocumentError> {
        let map = value.as_object().ok_or(DocumentError::NotAnObject)?;
        let id = map
            .get("_id")
            .and_then(display_id)
            .ok_or(DocumentError::MissingId)?;
        let created_at = map.get("created_at").and_then(CreatedAt::from_value);
        let recommendations = map
            .get("recommendations")
            .and_then(Value::as_object)
            .map(|artifacts| {
                artifacts
                    .iter()
                    .map(|(name, artifact)| (name.clone(), Artifact::from_value(artifact)))
                    .collect()
            })
            .unwrap_or_default();
        let gcs_uri = map
            .get("metadata")
            .and_then(|m| m.get("gcs_uri"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Ok(Self {
            id,
            created_at,
            recommendations,
            gcs_uri,
        })
    }

    /// Total number of sections across all artifacts.
    pub fn section_count(&self) -> usize {
        self.recommendations.iter().map(|(_, a)| a.sections.len()).sum()
    }
}

impl TryFrom<Value> for ReviewDocument {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

// ── Lenient accessors ──

/// Display-stable id: `{"$oid": ..}` unwraps to its hex string.
fn display_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Text field; absent or null → `""`.
fn text(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Boolean flag; anything but a JSON boolean → `false`.
fn flag(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn page(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
