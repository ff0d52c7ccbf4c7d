//! Movie entity model and the rated projection.

use chrono::{TimeZone, Utc};
use moviepin_core::movie_patch::MovieField;
use moviepin_core::rating::movie_rating;
use moviepin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A movie row from the `movies` table.
///
/// Also the request payload for inserts and full updates, so every field
/// is required and string fields must be non-empty.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, Validate)]
pub struct Movie {
    #[validate(custom(function = "validate_movie_id"))]
    pub id: DbId,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(custom(function = "validate_release_date"))]
    pub release_date: Timestamp,
    #[validate(length(min = 1, message = "genre is required"))]
    pub genre: String,
    #[validate(length(min = 1, message = "director is required"))]
    pub director: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
}

impl Movie {
    /// Overwrite the fields named by `updates`, leaving the rest untouched.
    pub fn apply(&mut self, updates: Vec<MovieField>) {
        for update in updates {
            match update {
                MovieField::Title(title) => self.title = title,
                MovieField::ReleaseDate(release_date) => self.release_date = release_date,
                MovieField::Genre(genre) => self.genre = genre,
                MovieField::Director(director) => self.director = director,
                MovieField::Description(description) => self.description = description,
            }
        }
    }

    /// Consume the movie and return it with `updates` applied.
    pub fn merged(mut self, updates: Vec<MovieField>) -> Self {
        self.apply(updates);
        self
    }
}

/// The nil UUID is never a valid movie id.
fn validate_movie_id(id: &DbId) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(
            ValidationError::new("nil_uuid").with_message("id must not be the nil UUID".into()),
        );
    }
    Ok(())
}

/// `0001-01-01T00:00:00Z` is the zero timestamp clients send for "unset".
fn validate_release_date(date: &Timestamp) -> Result<(), ValidationError> {
    if Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).single() == Some(*date) {
        return Err(ValidationError::new("zero_release_date")
            .with_message("release_date is required".into()));
    }
    Ok(())
}

/// A movie together with its aggregate review rating.
///
/// `rating` is `None` when the movie has no reviews yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MovieReview {
    #[serde(flatten)]
    #[validate(nested)]
    pub movie: Movie,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f32>,
}

impl MovieReview {
    /// Build the projection from a movie and the raw 0-10 average of its reviews.
    pub fn from_average(movie: Movie, average: Option<f64>) -> Self {
        Self {
            movie,
            rating: movie_rating(average),
        }
    }
}
