pub mod health;
pub mod validation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /validator-test              list shapes (GET), validate `measurement` (POST)
/// /validator-test/{shape}      validate a named shape (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/validator-test", validation::router())
}
