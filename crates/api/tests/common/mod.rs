#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use moviepin_api::config::ServerConfig;
use moviepin_api::router::build_app_router;
use moviepin_api::state::AppState;
use moviepin_db::models::movie::{Movie, MovieReview};
use moviepin_db::repositories::{InMemoryMovieRepo, MovieRepository};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        request_timeout_secs: 30,
    }
}

/// Build the full application router (same middleware stack as production)
/// over the given repository.
pub fn build_test_app(repo: Arc<dyn MovieRepository>) -> Router {
    let config = test_config();
    let state = AppState {
        movies: repo,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const SHAWSHANK_ID: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

pub fn shawshank() -> Movie {
    Movie {
        id: Uuid::parse_str(SHAWSHANK_ID).unwrap(),
        title: "The Shawshank Redemption".to_string(),
        release_date: Utc.with_ymd_and_hms(1994, 9, 23, 0, 0, 0).unwrap(),
        genre: "Drama".to_string(),
        director: "Frank Darabont".to_string(),
        description: "Prisoners".to_string(),
    }
}

pub fn new_movie(title: &str) -> Movie {
    Movie {
        id: Uuid::new_v4(),
        title: title.to_string(),
        release_date: Utc.with_ymd_and_hms(2010, 7, 16, 0, 0, 0).unwrap(),
        genre: "Sci-Fi".to_string(),
        director: "Christopher Nolan".to_string(),
        description: "Dreams within dreams".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Option<String>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, method, uri, Some(body.to_string())).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Failure injection
// ---------------------------------------------------------------------------

/// Wraps [`InMemoryMovieRepo`], failing selected operations and counting
/// every call that reaches the store.
#[derive(Default)]
pub struct FlakyRepo {
    pub inner: InMemoryMovieRepo,
    pub fail_add_for: HashSet<Uuid>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Overrides the computed rating on `get_movie_rating`.
    pub force_rating: Option<f32>,
    pub calls: AtomicUsize,
}

impl FlakyRepo {
    pub fn wrapping(inner: InMemoryMovieRepo) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), sqlx::Error> {
        self.record();
        if self.fail_reads {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), sqlx::Error> {
        self.record();
        if self.fail_writes {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

#[async_trait]
impl MovieRepository for FlakyRepo {
    async fn list_movies(&self) -> Result<Vec<Movie>, sqlx::Error> {
        self.check_read()?;
        self.inner.list_movies().await
    }

    async fn get_movie(&self, id: Uuid) -> Result<Option<Movie>, sqlx::Error> {
        self.check_read()?;
        self.inner.get_movie(id).await
    }

    async fn add_movie(&self, movie: &Movie) -> Result<(), sqlx::Error> {
        self.check_write()?;
        if self.fail_add_for.contains(&movie.id) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        self.inner.add_movie(movie).await
    }

    async fn update_movie(&self, id: Uuid, movie: &Movie) -> Result<bool, sqlx::Error> {
        self.check_write()?;
        self.inner.update_movie(id, movie).await
    }

    async fn delete_movie(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.check_write()?;
        self.inner.delete_movie(id).await
    }

    async fn replace_movies(&self, movies: &[Movie]) -> Result<(), sqlx::Error> {
        self.check_write()?;
        self.inner.replace_movies(movies).await
    }

    async fn get_movie_rating(&self, id: Uuid) -> Result<Option<MovieReview>, sqlx::Error> {
        self.check_read()?;
        let review = self.inner.get_movie_rating(id).await?;
        Ok(match self.force_rating {
            Some(rating) => review.map(|r| MovieReview {
                rating: Some(rating),
                ..r
            }),
            None => review,
        })
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        self.check_read()
    }
}
