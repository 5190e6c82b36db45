//! Dublin-Core-flavoured metadata for groups and records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status given to records that arrive without one.
pub const DEFAULT_RECORD_STATUS: &str = "created";

/// Metadata attached to an [`AlignmentGroup`](crate::AlignmentGroup) or an
/// [`AlignmentRecord`](crate::AlignmentRecord).
///
/// All fields are optional. Unrecognized keys are kept in `extra` and
/// written back verbatim. Serialization omits empty fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Version of the alignment standard the data conforms to.
    #[serde(rename = "conformsTo", skip_serializing_if = "String::is_empty")]
    pub conforms_to: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub contributor: String,
    #[serde(skip_serializing_if = "Option::is_none", with = "timestamp")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub creator: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub coverage: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Unique identifier, required in practice for records.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// How the alignment was first produced: `manual`, `automated`, ...
    #[serde(skip_serializing_if = "String::is_empty")]
    pub origin: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Metadata {
    /// Metadata with only an identifier, the usual shape for a record.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Reads metadata from a JSON object, renaming the legacy `process` key
    /// to `origin`.
    pub fn from_map(mut map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        if let Some(process) = map.remove("process") {
            map.insert("origin".into(), process);
        }
        serde_json::from_value(Value::Object(map))
    }

    /// Non-empty fields as a JSON object with sorted keys.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    pub fn is_empty(&self) -> bool {
        self.to_value().as_object().is_none_or(Map::is_empty)
    }
}

mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_none(),
        }
    }

    /// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC) or a
    /// bare date.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        let Some(raw) = raw.filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(ts.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Some(naive.and_utc()));
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Some(naive.and_utc()))
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}
