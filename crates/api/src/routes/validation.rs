//! Route definitions for the `/validator-test` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::validation;
use crate::state::AppState;

/// Routes mounted at `/validator-test`.
///
/// ```text
/// GET    /           -> list_shapes
/// POST   /           -> validate_default   (measurement)
/// POST   /{shape}    -> validate_shape
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(validation::list_shapes).post(validation::validate_default),
        )
        .route("/{shape}", post(validation::validate_shape))
}
