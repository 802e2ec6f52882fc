//! Field kinds and dynamically typed field values.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Rendering used for date-only values in summaries and dropdowns.
pub const DATE_DISPLAY_FORMAT: &str = "%d-%b-%y";

/// The declared type of an entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Bool,
    Int,
    Text,
    Uuid,
    Date,
    DateTime,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::Text => "text",
            FieldKind::Uuid => "uuid",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// Error raised when a value does not fit the kind a field expects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("expected a {expected} value, found {found}")]
    KindMismatch { expected: FieldKind, found: String },

    #[error("cannot parse '{input}' as {expected}")]
    Unparseable { expected: FieldKind, input: String },
}

/// A field value read from or written to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Uuid(Uuid),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    /// Parse operator input into a value of the given kind.
    ///
    /// Dates accept ISO `YYYY-MM-DD` as well as the display form
    /// (`01-apr-24`); date-times accept `YYYY-MM-DDTHH:MM:SS`.
    pub fn parse(kind: FieldKind, input: &str) -> Result<Self, ValueError> {
        let trimmed = input.trim();
        let unparseable = || ValueError::Unparseable {
            expected: kind,
            input: input.to_string(),
        };
        match kind {
            FieldKind::Text => Ok(FieldValue::Text(input.to_string())),
            FieldKind::Bool => trimmed
                .parse::<bool>()
                .map(FieldValue::Bool)
                .map_err(|_| unparseable()),
            FieldKind::Int => trimmed
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| unparseable()),
            FieldKind::Uuid => Uuid::parse_str(trimmed)
                .map(FieldValue::Uuid)
                .map_err(|_| unparseable()),
            FieldKind::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(trimmed, DATE_DISPLAY_FORMAT))
                .map(FieldValue::Date)
                .map_err(|_| unparseable()),
            FieldKind::DateTime => NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
                .map(FieldValue::DateTime)
                .map_err(|_| unparseable()),
        }
    }

    /// The kind of this value, `None` for `Null`.
    #[must_use]
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Bool(_) => Some(FieldKind::Bool),
            FieldValue::Int(_) => Some(FieldKind::Int),
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::Uuid(_) => Some(FieldKind::Uuid),
            FieldValue::Date(_) => Some(FieldKind::Date),
            FieldValue::DateTime(_) => Some(FieldKind::DateTime),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render a value for display, applying the fixed date format.
    #[must_use]
    pub fn to_display_text(&self) -> String {
        match self {
            FieldValue::Date(date) => format_date(*date),
            other => other.to_string(),
        }
    }

    pub fn into_bool(self) -> Result<bool, ValueError> {
        match self {
            FieldValue::Bool(value) => Ok(value),
            other => Err(other.mismatch(FieldKind::Bool)),
        }
    }

    pub fn into_int(self) -> Result<i64, ValueError> {
        match self {
            FieldValue::Int(value) => Ok(value),
            other => Err(other.mismatch(FieldKind::Int)),
        }
    }

    /// Text accessor; `Null` becomes the empty string.
    pub fn into_text(self) -> Result<String, ValueError> {
        match self {
            FieldValue::Text(value) => Ok(value),
            FieldValue::Null => Ok(String::new()),
            other => Err(other.mismatch(FieldKind::Text)),
        }
    }

    /// UUID accessor; `Null` becomes the nil UUID.
    pub fn into_uuid(self) -> Result<Uuid, ValueError> {
        match self {
            FieldValue::Uuid(value) => Ok(value),
            FieldValue::Null => Ok(Uuid::nil()),
            other => Err(other.mismatch(FieldKind::Uuid)),
        }
    }

    pub fn into_date(self) -> Result<NaiveDate, ValueError> {
        match self {
            FieldValue::Date(value) => Ok(value),
            other => Err(other.mismatch(FieldKind::Date)),
        }
    }

    pub fn into_date_time(self) -> Result<NaiveDateTime, ValueError> {
        match self {
            FieldValue::DateTime(value) => Ok(value),
            other => Err(other.mismatch(FieldKind::DateTime)),
        }
    }

    fn mismatch(&self, expected: FieldKind) -> ValueError {
        ValueError::KindMismatch {
            expected,
            found: self.kind().map_or_else(|| "null".to_string(), |k| k.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Uuid(value) => write!(f, "{value}"),
            FieldValue::Date(value) => write!(f, "{value}"),
            FieldValue::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

/// Format a date as `dd-mon-yy` with a lower-case month, e.g. `01-apr-24`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_DISPLAY_FORMAT).to_string().to_lowercase()
}
