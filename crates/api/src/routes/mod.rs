pub mod auth;
pub mod build_list;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                          signup (public)
/// /auth/login                                           login (public)
/// /auth/refresh                                         refresh (public)
/// /auth/logout                                          logout (requires auth)
/// /auth/me                                              current user
///
/// /lists                                                list, create
/// /lists/import                                         import a local-storage export
/// /lists/{list_id}                                      get, update, delete
/// /lists/{list_id}/budget                               update budget
/// /lists/{list_id}/metrics                              budget metrics
/// /lists/{list_id}/items                                list (filter/search/sort), create
/// /lists/{list_id}/items/{item_id}                      get, update, delete
/// /lists/{list_id}/items/{item_id}/include              toggle spend inclusion
/// /lists/{list_id}/items/{item_id}/payments             log payment
/// /lists/{list_id}/items/{item_id}/payments/suggestion  suggested next payment
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/lists", build_list::router())
}
