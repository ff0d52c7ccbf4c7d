//! Domain model structs.
//!
//! Row structs derive `FromRow` for sqlx and `Validate` so handlers can
//! check request payloads before they reach a repository.

pub mod movie;

use moviepin_core::error::CoreError;
use validator::Validate;

/// Run `validator` rules and fold any violations into a [`CoreError::Validation`].
pub fn ensure_valid<T: Validate>(record: &T) -> Result<(), CoreError> {
    record
        .validate()
        .map_err(|errors| CoreError::Validation(errors.to_string()))
}
