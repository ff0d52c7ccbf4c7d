use std::sync::Arc;

use moviepin_db::repositories::MovieRepository;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Movie storage, chosen at startup.
    pub movies: Arc<dyn MovieRepository>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
