//! Route definitions for the `/lists` resource.
//!
//! Also nests item routes under `/lists/{list_id}/items/...`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{build_list, item};
use crate::state::AppState;

/// Routes mounted at `/lists`.
///
/// ```text
/// GET    /                                           -> list
/// POST   /                                           -> create
/// POST   /import                                     -> import
/// GET    /{list_id}                                  -> get_by_id
/// PUT    /{list_id}                                  -> update
/// DELETE /{list_id}                                  -> delete
/// PUT    /{list_id}/budget                           -> update_budget
/// GET    /{list_id}/metrics                          -> metrics
///
/// GET    /{list_id}/items                            -> list
/// POST   /{list_id}/items                            -> create
/// GET    /{list_id}/items/{item_id}                  -> get_by_id
/// PUT    /{list_id}/items/{item_id}                  -> update
/// DELETE /{list_id}/items/{item_id}                  -> delete
/// PUT    /{list_id}/items/{item_id}/include          -> set_include
/// POST   /{list_id}/items/{item_id}/payments         -> log_payment
/// GET    /{list_id}/items/{item_id}/payments/suggestion -> payment_suggestion
/// ```
pub fn router() -> Router<AppState> {
    let item_routes = Router::new()
        .route("/", get(item::list).post(item::create))
        .route(
            "/{item_id}",
            get(item::get_by_id).put(item::update).delete(item::delete),
        )
        .route("/{item_id}/include", put(item::set_include))
        .route("/{item_id}/payments", post(item::log_payment))
        .route(
            "/{item_id}/payments/suggestion",
            get(item::payment_suggestion),
        );

    Router::new()
        .route("/", get(build_list::list).post(build_list::create))
        .route("/import", post(build_list::import))
        .route(
            "/{list_id}",
            get(build_list::get_by_id)
                .put(build_list::update)
                .delete(build_list::delete),
        )
        .route("/{list_id}/budget", put(build_list::update_budget))
        .route("/{list_id}/metrics", get(build_list::metrics))
        .nest("/{list_id}/items", item_routes)
}
