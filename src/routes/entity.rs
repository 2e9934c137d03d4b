//! Entity CRUD routes built from the resolved model.
//! Uses parameterized paths so Path extractors receive the segment and id; handlers resolve the entity by path.
//! Collection routes answer with and without a trailing slash (`/items/` and `/tasks` both work).

use crate::handlers::entity::{create, delete as delete_handler, list, read, replace, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/:path_segment", get(list).post(create))
        .route("/:path_segment/", get(list).post(create))
        .route(
            "/:path_segment/:id",
            get(read).patch(update).put(replace).delete(delete_handler),
        )
        .with_state(state)
}
