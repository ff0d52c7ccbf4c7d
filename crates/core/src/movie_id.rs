//! Identifier handling for item paths (`/movies/{id}`).

use crate::error::CoreError;
use crate::types::DbId;

/// Length of the canonical hyphenated UUID form (`8-4-4-4-12`).
const HYPHENATED_LEN: usize = 36;

/// Parse the identifier segment of an item path.
///
/// Only the canonical hyphenated form is accepted. The simple, braced and
/// URN encodings that [`uuid::Uuid::parse_str`] also understands are
/// rejected so that every movie has exactly one addressable path.
pub fn parse_movie_id(raw: &str) -> Result<DbId, CoreError> {
    if raw.len() != HYPHENATED_LEN {
        return Err(CoreError::Validation(format!(
            "movie id must be a UUID, got '{raw}'"
        )));
    }
    DbId::parse_str(raw)
        .map_err(|e| CoreError::Validation(format!("movie id must be a UUID, got '{raw}': {e}")))
}
