//! Pure domain logic for the movie catalogue.
//!
//! Nothing in this crate touches the database or HTTP; the `db` and `api`
//! crates build on these types and functions.

pub mod error;
pub mod movie_id;
pub mod movie_patch;
pub mod rating;
pub mod types;
