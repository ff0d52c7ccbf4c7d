//! Handlers for the movie collection and individual movies.
//!
//! Item routes take the raw path segment and validate it as a UUID before
//! the repository is touched, so a malformed id is always a 400.

use axum::extract::{Path, Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use futures::future::join_all;
use moviepin_core::error::CoreError;
use moviepin_core::movie_id::parse_movie_id;
use moviepin_core::movie_patch::parse_patch;
use moviepin_core::types::DbId;
use moviepin_db::models::ensure_valid;
use moviepin_db::models::movie::Movie;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::state::AppState;

/// Methods advertised by `OPTIONS` on every movie path.
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";

/// Raw query pairs of `GET /movies/{id}`, in request order.
///
/// Kept as pairs so a repeated key never fails extraction.
type QueryPairs = Vec<(String, String)>;

/// `rating=true` switches the response to the rated projection. Only the
/// first `rating` pair counts.
fn wants_rating(params: &[(String, String)]) -> bool {
    params
        .iter()
        .find(|(key, _)| key == "rating")
        .is_some_and(|(_, value)| value == "true")
}

/// Outcome of `POST /movies`, partitioned per input record.
#[derive(Debug, Default, Serialize)]
pub struct AddMoviesResponse {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added_movies: Vec<Movie>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_movies: Vec<Movie>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Movie", id })
}

fn validate_all(movies: &[Movie]) -> AppResult<()> {
    for movie in movies {
        ensure_valid(movie)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Collection routes
// ---------------------------------------------------------------------------

/// GET /movies
pub async fn list_movies(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let movies = state.movies.list_movies().await?;

    Ok(Json(movies))
}

/// POST /movies
///
/// Add every movie in the body. All records are validated up front; after
/// that each insert is attempted concurrently and independently, and the
/// response reports which ones landed. One failed insert does not affect
/// the others.
pub async fn add_movies(
    State(state): State<AppState>,
    JsonBody(movies): JsonBody<Vec<Movie>>,
) -> AppResult<impl IntoResponse> {
    validate_all(&movies)?;

    let repo = &state.movies;
    let outcomes = join_all(movies.into_iter().map(|movie| async move {
        let result = repo.add_movie(&movie).await;
        (movie, result)
    }))
    .await;

    let mut response = AddMoviesResponse::default();
    for (movie, result) in outcomes {
        match result {
            Ok(()) => response.added_movies.push(movie),
            Err(err) => {
                tracing::warn!(movie_id = %movie.id, error = %err, "Failed to add movie");
                response.failed_movies.push(movie);
            }
        }
    }

    tracing::info!(
        added = response.added_movies.len(),
        failed = response.failed_movies.len(),
        "Movies added",
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /movies
///
/// Replace the entire collection with the body. All-or-nothing.
pub async fn replace_movies(
    State(state): State<AppState>,
    JsonBody(movies): JsonBody<Vec<Movie>>,
) -> AppResult<impl IntoResponse> {
    validate_all(&movies)?;

    state.movies.replace_movies(&movies).await?;

    tracing::info!(count = movies.len(), "Movie collection replaced");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Item routes
// ---------------------------------------------------------------------------

/// GET /movies/{id}
///
/// With `?rating=true` responds with the movie plus its aggregate rating.
pub async fn get_movie(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<QueryPairs>,
) -> AppResult<impl IntoResponse> {
    let id = parse_movie_id(&raw_id)?;

    if wants_rating(&params) {
        let review = state
            .movies
            .get_movie_rating(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        // A projection that breaks its own invariants is a server-side defect.
        ensure_valid(&review).map_err(|e| {
            AppError::InternalError(format!("Invalid rating projection for movie {id}: {e}"))
        })?;

        return Ok(Json(review).into_response());
    }

    let movie = state
        .movies
        .get_movie(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(movie).into_response())
}

/// PUT /movies/{id}
///
/// Overwrite a movie with the complete record in the body.
pub async fn update_movie(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    JsonBody(movie): JsonBody<Movie>,
) -> AppResult<impl IntoResponse> {
    let id = parse_movie_id(&raw_id)?;
    ensure_valid(&movie)?;

    if !state.movies.update_movie(id, &movie).await? {
        return Err(not_found(id));
    }

    tracing::info!(movie_id = %id, "Movie updated");

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /movies/{id}
///
/// Merge the recognised fields of the body into the stored movie. Nothing
/// is written unless every field parses and the merged record validates.
pub async fn patch_movie(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    JsonBody(body): JsonBody<Map<String, Value>>,
) -> AppResult<impl IntoResponse> {
    let id = parse_movie_id(&raw_id)?;

    let existing = state
        .movies
        .get_movie(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let updates = parse_patch(&body).map_err(CoreError::from)?;
    let fields: Vec<&'static str> = updates.iter().map(|u| u.name()).collect();

    let merged = existing.merged(updates);
    ensure_valid(&merged)?;

    if !state.movies.update_movie(id, &merged).await? {
        return Err(not_found(id));
    }

    tracing::info!(movie_id = %id, ?fields, "Movie patched");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /movies/{id}
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_movie_id(&raw_id)?;

    if !state.movies.delete_movie(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(movie_id = %id, "Movie deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// OPTIONS /movies and /movies/{id}
///
/// Advertises the allowed methods with fixed CORS headers.
pub async fn options() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    )
}
