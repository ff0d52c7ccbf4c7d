//! Aggregate rating shown on the movie review projection.
//!
//! Reviews are stored on a 0-10 scale. The exposed rating is on a 0-5
//! scale: the raw average is rounded to the nearest whole point first,
//! then halved, then truncated to one decimal place. Rounding before
//! halving is lossy (an average of 7.4 becomes 3.5, not 3.7) and is kept
//! as-is for compatibility with existing clients.

/// Highest rating a single review may carry.
pub const MAX_REVIEW_RATING: i16 = 10;

/// Highest rating exposed on a movie.
pub const MAX_MOVIE_RATING: f32 = 5.0;

/// Convert an average review score (0-10) into the exposed movie rating (0-5).
///
/// Ties round away from zero, matching PostgreSQL `ROUND` on `numeric`.
pub fn half_scale_rating(average: f64) -> f32 {
    let halved = average.round() / 2.0;
    ((halved * 10.0).trunc() / 10.0) as f32
}

/// Rating for a movie given the average of its reviews, if it has any.
///
/// A movie without reviews has no rating rather than a rating of zero.
pub fn movie_rating(average: Option<f64>) -> Option<f32> {
    average.map(half_scale_rating)
}
