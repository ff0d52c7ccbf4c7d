//! Route definitions for the movie resource.

use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Movie routes, mounted at the root.
///
/// A trailing slash is accepted on both the collection and item paths.
/// Methods not listed answer `405 Method Not Allowed`, HEAD included; paths
/// with extra segments after the id fall through to `404`.
///
/// ```text
/// GET     /movies          -> list_movies
/// POST    /movies          -> add_movies
/// PUT     /movies          -> replace_movies
/// OPTIONS /movies          -> options
///
/// GET     /movies/{id}     -> get_movie (?rating=true for the rated view)
/// PUT     /movies/{id}     -> update_movie
/// PATCH   /movies/{id}     -> patch_movie
/// DELETE  /movies/{id}     -> delete_movie
/// OPTIONS /movies/{id}     -> options
/// ```
pub fn router() -> Router<AppState> {
    let collection = collection_routes();
    let item = item_routes();

    Router::new()
        .route("/movies", collection.clone())
        .route("/movies/", collection)
        .route("/movies/{id}", item.clone())
        .route("/movies/{id}/", item)
        .route_layer(middleware::from_fn(reject_head))
}

/// Axum serves HEAD from every GET handler; movie paths do not offer HEAD.
async fn reject_head(request: Request, next: Next) -> Response {
    if request.method() == Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }
    next.run(request).await
}

fn collection_routes() -> MethodRouter<AppState> {
    get(movies::list_movies)
        .post(movies::add_movies)
        .put(movies::replace_movies)
        .options(movies::options)
}

fn item_routes() -> MethodRouter<AppState> {
    get(movies::get_movie)
        .put(movies::update_movie)
        .patch(movies::patch_movie)
        .delete(movies::delete_movie)
        .options(movies::options)
}
