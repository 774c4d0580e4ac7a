//! Handlers for the `/lists` resource.
//!
//! Every handler is scoped to the authenticated user; a list owned by
//! someone else answers 404 exactly like a missing one.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildmaster_core::aggregate::{aggregate, ListMetrics};
use buildmaster_core::build_list::{BuildList, CreateBuildList, UpdateBuildList, UpdateBudget};
use buildmaster_core::error::CoreError;
use buildmaster_core::item::{derive, DerivedItem};
use buildmaster_core::migration::{migrate_export, LegacyExport};
use buildmaster_core::types::DbId;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A list with its metrics, as shown on the overview page.
#[derive(Debug, Serialize)]
pub struct ListOverview {
    #[serde(flatten)]
    pub list: BuildList,
    pub metrics: ListMetrics,
}

/// A list with its derived items and metrics, as shown on the detail page.
#[derive(Debug, Serialize)]
pub struct ListDetail {
    pub list: BuildList,
    pub items: Vec<DerivedItem>,
    pub metrics: ListMetrics,
}

/// One list created by an import.
#[derive(Debug, Serialize)]
pub struct ImportedList {
    pub list: BuildList,
    pub item_count: usize,
}

/// GET /api/v1/lists
///
/// The user's lists, newest first, each with its aggregate metrics.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ListOverview>>>> {
    let lists = state.store.lists_for_owner(auth_user.user_id).await?;

    let mut overview = Vec::with_capacity(lists.len());
    for list in lists {
        let items = state
            .store
            .items_for_list(auth_user.user_id, list.id)
            .await?;
        let metrics = aggregate(&list.budget, &items);
        overview.push(ListOverview { list, metrics });
    }
    Ok(Json(DataResponse { data: overview }))
}

/// POST /api/v1/lists
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateBuildList>,
) -> AppResult<(StatusCode, Json<DataResponse<BuildList>>)> {
    let input = input.validated()?;
    let list = state.store.create_list(auth_user.user_id, &input).await?;
    tracing::info!(user_id = auth_user.user_id, list_id = list.id, "Build list created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: list })))
}

/// POST /api/v1/lists/import
///
/// Import lists exported from browser storage. Every list and item is
/// migrated and validated before anything is written.
pub async fn import(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(export): Json<LegacyExport>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<ImportedList>>>)> {
    let migrated = migrate_export(export);
    if migrated.is_empty() {
        return Err(AppError::BadRequest("Export contains no lists".into()));
    }

    let mut validated = Vec::with_capacity(migrated.len());
    for (index, entry) in migrated.into_iter().enumerate() {
        let list = entry
            .list
            .validated()
            .map_err(|e| import_error(index, None, e))?;
        let items = entry
            .items
            .into_iter()
            .enumerate()
            .map(|(item_index, item)| {
                item.validated()
                    .map_err(|e| import_error(index, Some(item_index), e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        validated.push((list, items));
    }

    let mut imported = Vec::with_capacity(validated.len());
    for (list, items) in &validated {
        let (created, stored) = state
            .store
            .import_list(auth_user.user_id, list, items)
            .await?;
        imported.push(ImportedList {
            list: created,
            item_count: stored.len(),
        });
    }
    tracing::info!(
        user_id = auth_user.user_id,
        lists = imported.len(),
        "Legacy export imported"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: imported })))
}

/// GET /api/v1/lists/{list_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(list_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ListDetail>>> {
    let list = require_list(&state, auth_user.user_id, list_id).await?;
    let items = state
        .store
        .items_for_list(auth_user.user_id, list_id)
        .await?;

    let metrics = aggregate(&list.budget, &items);
    let items = items.iter().map(derive).collect();
    Ok(Json(DataResponse {
        data: ListDetail {
            list,
            items,
            metrics,
        },
    }))
}

/// PUT /api/v1/lists/{list_id}
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(list_id): Path<DbId>,
    Json(input): Json<UpdateBuildList>,
) -> AppResult<Json<DataResponse<BuildList>>> {
    let input = input.validated()?;
    let list = state
        .store
        .update_list(auth_user.user_id, list_id, &input)
        .await?
        .ok_or(list_not_found(list_id))?;
    Ok(Json(DataResponse { data: list }))
}

/// PUT /api/v1/lists/{list_id}/budget
pub async fn update_budget(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(list_id): Path<DbId>,
    Json(input): Json<UpdateBudget>,
) -> AppResult<Json<DataResponse<BuildList>>> {
    let input = UpdateBuildList::from(input).validated()?;
    let list = state
        .store
        .update_list(auth_user.user_id, list_id, &input)
        .await?
        .ok_or(list_not_found(list_id))?;
    tracing::info!(list_id, total_budget = %list.budget.total_budget, "Budget updated");
    Ok(Json(DataResponse { data: list }))
}

/// DELETE /api/v1/lists/{list_id}
///
/// Removes the list and every item in it.
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(list_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if state.store.delete_list(auth_user.user_id, list_id).await? {
        tracing::info!(user_id = auth_user.user_id, list_id, "Build list deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(list_not_found(list_id))
    }
}

/// GET /api/v1/lists/{list_id}/metrics
pub async fn metrics(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(list_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ListMetrics>>> {
    let list = require_list(&state, auth_user.user_id, list_id).await?;
    let items = state
        .store
        .items_for_list(auth_user.user_id, list_id)
        .await?;
    Ok(Json(DataResponse {
        data: aggregate(&list.budget, &items),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn list_not_found(list_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Build list",
        id: list_id,
    })
}

/// Load a list owned by `user_id`, or 404.
pub(crate) async fn require_list(
    state: &AppState,
    user_id: DbId,
    list_id: DbId,
) -> AppResult<BuildList> {
    state
        .store
        .find_list(user_id, list_id)
        .await?
        .ok_or(list_not_found(list_id))
}

fn import_error(list_index: usize, item_index: Option<usize>, err: CoreError) -> AppError {
    let location = match item_index {
        Some(item_index) => format!("lists[{list_index}].items[{item_index}]"),
        None => format!("lists[{list_index}]"),
    };
    match err {
        CoreError::Validation(msg) => {
            AppError::Core(CoreError::Validation(format!("{location}: {msg}")))
        }
        other => AppError::Core(other),
    }
}
