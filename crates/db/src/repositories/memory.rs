//! In-memory [`MovieRepository`] used by tests and local tooling.
//!
//! Mirrors the PostgreSQL semantics closely enough for handler tests:
//! duplicate ids are rejected, reviews are dropped with their movie, and
//! `replace_movies` leaves the collection untouched when it fails.

use std::collections::HashMap;

use async_trait::async_trait;
use moviepin_core::rating::MAX_REVIEW_RATING;
use moviepin_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::movie::{Movie, MovieReview};
use crate::repositories::MovieRepository;

#[derive(Default)]
struct Store {
    /// Insertion order is the listing order.
    movies: Vec<Movie>,
    /// Review ratings (0-10) keyed by movie id.
    reviews: HashMap<DbId, Vec<i16>>,
}

impl Store {
    fn position(&self, id: DbId) -> Option<usize> {
        self.movies.iter().position(|m| m.id == id)
    }
}

#[derive(Default)]
pub struct InMemoryMovieRepo {
    store: RwLock<Store>,
}

impl InMemoryMovieRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository already holding `movies`.
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        Self {
            store: RwLock::new(Store {
                movies,
                reviews: HashMap::new(),
            }),
        }
    }

    /// Record a review rating (0-10) against a movie.
    ///
    /// Fails like a foreign-key or check violation would if the movie does
    /// not exist or the rating is out of range.
    pub async fn add_review(&self, movie_id: DbId, rating: i16) -> Result<(), sqlx::Error> {
        if !(0..=MAX_REVIEW_RATING).contains(&rating) {
            return Err(sqlx::Error::Protocol(format!(
                "review rating must be between 0 and {MAX_REVIEW_RATING}, got {rating}"
            )));
        }

        let mut store = self.store.write().await;
        if store.position(movie_id).is_none() {
            return Err(sqlx::Error::Protocol(format!(
                "review references unknown movie {movie_id}"
            )));
        }
        store.reviews.entry(movie_id).or_default().push(rating);
        Ok(())
    }
}

fn duplicate(id: DbId) -> sqlx::Error {
    sqlx::Error::Protocol(format!("duplicate movie id {id}"))
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepo {
    async fn list_movies(&self) -> Result<Vec<Movie>, sqlx::Error> {
        Ok(self.store.read().await.movies.clone())
    }

    async fn get_movie(&self, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let store = self.store.read().await;
        Ok(store.position(id).map(|i| store.movies[i].clone()))
    }

    async fn add_movie(&self, movie: &Movie) -> Result<(), sqlx::Error> {
        let mut store = self.store.write().await;
        if store.position(movie.id).is_some() {
            return Err(duplicate(movie.id));
        }
        store.movies.push(movie.clone());
        Ok(())
    }

    async fn update_movie(&self, id: DbId, movie: &Movie) -> Result<bool, sqlx::Error> {
        let mut store = self.store.write().await;
        let Some(index) = store.position(id) else {
            return Ok(false);
        };

        if movie.id != id {
            if store.position(movie.id).is_some() {
                return Err(duplicate(movie.id));
            }
            if let Some(ratings) = store.reviews.remove(&id) {
                store.reviews.insert(movie.id, ratings);
            }
        }

        store.movies[index] = movie.clone();
        Ok(true)
    }

    async fn delete_movie(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut store = self.store.write().await;
        let Some(index) = store.position(id) else {
            return Ok(false);
        };
        store.movies.remove(index);
        store.reviews.remove(&id);
        Ok(true)
    }

    async fn replace_movies(&self, movies: &[Movie]) -> Result<(), sqlx::Error> {
        let mut replacement: Vec<Movie> = Vec::with_capacity(movies.len());
        for movie in movies {
            if replacement.iter().any(|m| m.id == movie.id) {
                return Err(duplicate(movie.id));
            }
            replacement.push(movie.clone());
        }

        let mut store = self.store.write().await;
        store.movies = replacement;
        store.reviews.clear();
        Ok(())
    }

    async fn get_movie_rating(&self, id: DbId) -> Result<Option<MovieReview>, sqlx::Error> {
        let store = self.store.read().await;
        let Some(index) = store.position(id) else {
            return Ok(None);
        };

        let average = store
            .reviews
            .get(&id)
            .filter(|ratings| !ratings.is_empty())
            .map(|ratings| {
                let total: f64 = ratings.iter().map(|&r| f64::from(r)).sum();
                total / ratings.len() as f64
            });

        Ok(Some(MovieReview::from_average(
            store.movies[index].clone(),
            average,
        )))
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
