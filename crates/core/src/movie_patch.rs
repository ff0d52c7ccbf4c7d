//! Partial-update (PATCH) parsing for movies.
//!
//! A PATCH body is a JSON object carrying any subset of the patchable
//! fields. [`parse_patch`] turns it into a list of typed [`MovieField`]
//! updates, failing on the first key whose value has the wrong shape.
//! Unknown keys are ignored. Applying the updates to a stored movie is the
//! caller's job; nothing here has side effects.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Keys a PATCH body may update. Every other key is ignored.
pub const PATCHABLE_FIELDS: [&str; 5] =
    ["title", "release_date", "genre", "director", "description"];

/// A single typed field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieField {
    Title(String),
    ReleaseDate(Timestamp),
    Genre(String),
    Director(String),
    Description(String),
}

impl MovieField {
    /// The JSON key this update came from.
    pub fn name(&self) -> &'static str {
        match self {
            MovieField::Title(_) => "title",
            MovieField::ReleaseDate(_) => "release_date",
            MovieField::Genre(_) => "genre",
            MovieField::Director(_) => "director",
            MovieField::Description(_) => "description",
        }
    }
}

/// Why a PATCH body was rejected. Each variant names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error("field '{field}' must be a string")]
    NotAString { field: &'static str },

    #[error("field 'release_date' must be an RFC3339 timestamp: {reason}")]
    InvalidTimestamp { reason: String },
}

impl PatchError {
    /// The field the error is about.
    pub fn field(&self) -> &'static str {
        match self {
            PatchError::NotAString { field } => field,
            PatchError::InvalidTimestamp { .. } => "release_date",
        }
    }
}

impl From<PatchError> for CoreError {
    fn from(err: PatchError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Parse a PATCH body into typed field updates.
///
/// Keys are visited in map order and the first invalid value aborts the
/// whole parse, so either every recognised key yields an update or the
/// caller gets an error and applies nothing.
pub fn parse_patch(body: &Map<String, Value>) -> Result<Vec<MovieField>, PatchError> {
    let mut fields = Vec::with_capacity(PATCHABLE_FIELDS.len());

    for (key, value) in body {
        let field = match key.as_str() {
            "title" => MovieField::Title(expect_string("title", value)?),
            "release_date" => MovieField::ReleaseDate(parse_timestamp(value)?),
            "genre" => MovieField::Genre(expect_string("genre", value)?),
            "director" => MovieField::Director(expect_string("director", value)?),
            "description" => MovieField::Description(expect_string("description", value)?),
            _ => continue,
        };
        fields.push(field);
    }

    Ok(fields)
}

fn expect_string(field: &'static str, value: &Value) -> Result<String, PatchError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(PatchError::NotAString { field })
}

fn parse_timestamp(value: &Value) -> Result<Timestamp, PatchError> {
    let raw = expect_string("release_date", value)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PatchError::InvalidTimestamp {
            reason: e.to_string(),
        })
}
