//! Repository layer.
//!
//! [`MovieRepository`] is the seam between HTTP handlers and storage. The
//! application builds one implementation at startup and hands it to the
//! router; handlers never reach for a global connection.
//!
//! "Not found" is reported in-band (`Option::None` or `false`). Every
//! `Err` is an opaque store failure.

pub mod memory;
pub mod movie_repo;

use async_trait::async_trait;
use moviepin_core::types::DbId;

use crate::models::movie::{Movie, MovieReview};

pub use memory::InMemoryMovieRepo;
pub use movie_repo::MovieRepo;

#[async_trait]
pub trait MovieRepository: Send + Sync + 'static {
    /// Every stored movie, in whatever order the store returns them.
    async fn list_movies(&self) -> Result<Vec<Movie>, sqlx::Error>;

    /// A single movie, or `None` if no movie has this id.
    async fn get_movie(&self, id: DbId) -> Result<Option<Movie>, sqlx::Error>;

    /// Insert one movie.
    async fn add_movie(&self, movie: &Movie) -> Result<(), sqlx::Error>;

    /// Overwrite every column of the movie stored under `id` (including its id).
    ///
    /// Returns `false` if no movie has this id.
    async fn update_movie(&self, id: DbId, movie: &Movie) -> Result<bool, sqlx::Error>;

    /// Returns `false` if no movie has this id.
    async fn delete_movie(&self, id: DbId) -> Result<bool, sqlx::Error>;

    /// Atomically replace the whole collection with `movies`.
    ///
    /// On error the previous collection is left intact.
    async fn replace_movies(&self, movies: &[Movie]) -> Result<(), sqlx::Error>;

    /// The movie with its aggregate rating, or `None` if no movie has this id.
    async fn get_movie_rating(&self, id: DbId) -> Result<Option<MovieReview>, sqlx::Error>;

    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> Result<(), sqlx::Error>;
}
