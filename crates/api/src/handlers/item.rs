//! Handlers for items nested under `/lists/{list_id}/items`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildmaster_core::error::CoreError;
use buildmaster_core::item::{derive, CreateItem, DerivedItem, LogPayment, UpdateItem};
use buildmaster_core::ledger::ItemStatus;
use buildmaster_core::types::{DbId, Money};
use buildmaster_core::view::{view, ViewQuery};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::build_list::{list_not_found, require_list};
use crate::middleware::auth::AuthUser;
use crate::query::ItemViewParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT .../include`.
#[derive(Debug, Deserialize)]
pub struct SetInclude {
    pub include_in_spend_calculation: bool,
}

/// Pre-filled amount for the log-payment dialog.
#[derive(Debug, Serialize)]
pub struct PaymentSuggestion {
    pub item_id: DbId,
    pub suggested_amount: Money,
    /// `suggested_amount` rendered with the list's currency symbol.
    pub formatted: String,
    pub remaining_balance: Money,
    /// Whether an unfilled installment slot is left to log into.
    pub has_open_slot: bool,
    pub status: ItemStatus,
}

/// GET /api/v1/lists/{list_id}/items
///
/// Derived items, filtered, searched and sorted per [`ItemViewParams`].
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(list_id): Path<DbId>,
    Query(params): Query<ItemViewParams>,
) -> AppResult<Json<DataResponse<Vec<DerivedItem>>>> {
    require_list(&state, auth_user.user_id, list_id).await?;
    let items = state
        .store
        .items_for_list(auth_user.user_id, list_id)
        .await?;

    let derived = items.iter().map(derive).collect();
    let query = ViewQuery::from(params);
    Ok(Json(DataResponse {
        data: view(derived, &query),
    }))
}

/// POST /api/v1/lists/{list_id}/items
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(list_id): Path<DbId>,
    Json(input): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<DataResponse<DerivedItem>>)> {
    let input = input.validated()?;
    let item = state
        .store
        .create_item(auth_user.user_id, list_id, &input)
        .await?
        .ok_or(list_not_found(list_id))?;
    tracing::info!(list_id, item_id = item.id, "Item created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: derive(&item),
        }),
    ))
}

/// GET /api/v1/lists/{list_id}/items/{item_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((list_id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<DerivedItem>>> {
    let item = state
        .store
        .find_item(auth_user.user_id, list_id, item_id)
        .await?
        .ok_or(item_not_found(item_id))?;
    Ok(Json(DataResponse {
        data: derive(&item),
    }))
}

/// PUT /api/v1/lists/{list_id}/items/{item_id}
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((list_id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateItem>,
) -> AppResult<Json<DataResponse<DerivedItem>>> {
    let item = state
        .store
        .update_item(auth_user.user_id, list_id, item_id, &input)
        .await?
        .ok_or(item_not_found(item_id))?;
    Ok(Json(DataResponse {
        data: derive(&item),
    }))
}

/// PUT /api/v1/lists/{list_id}/items/{item_id}/include
pub async fn set_include(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((list_id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<SetInclude>,
) -> AppResult<Json<DataResponse<DerivedItem>>> {
    let update = UpdateItem {
        include_in_spend_calculation: Some(input.include_in_spend_calculation),
        ..Default::default()
    };
    let item = state
        .store
        .update_item(auth_user.user_id, list_id, item_id, &update)
        .await?
        .ok_or(item_not_found(item_id))?;
    Ok(Json(DataResponse {
        data: derive(&item),
    }))
}

/// DELETE /api/v1/lists/{list_id}/items/{item_id}
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((list_id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if state
        .store
        .delete_item(auth_user.user_id, list_id, item_id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(item_not_found(item_id))
    }
}

/// POST /api/v1/lists/{list_id}/items/{item_id}/payments
///
/// Log a payment into the next unfilled installment slot. 409
/// `NO_AVAILABLE_SLOT` when every planned installment is already logged.
pub async fn log_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((list_id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<LogPayment>,
) -> AppResult<Json<DataResponse<DerivedItem>>> {
    let item = state
        .store
        .log_payment(auth_user.user_id, list_id, item_id, input.amount)
        .await?
        .ok_or(item_not_found(item_id))?;

    let derived = derive(&item);
    tracing::info!(
        list_id,
        item_id,
        amount = %input.amount,
        status = derived.status.label(),
        "Payment logged"
    );
    Ok(Json(DataResponse { data: derived }))
}

/// GET /api/v1/lists/{list_id}/items/{item_id}/payments/suggestion
pub async fn payment_suggestion(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((list_id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<PaymentSuggestion>>> {
    let list = require_list(&state, auth_user.user_id, list_id).await?;
    let item = state
        .store
        .find_item(auth_user.user_id, list_id, item_id)
        .await?
        .ok_or(item_not_found(item_id))?;

    let suggested_amount = item.suggested_payment();
    let derived = derive(&item);
    Ok(Json(DataResponse {
        data: PaymentSuggestion {
            item_id,
            suggested_amount,
            formatted: list.budget.format(suggested_amount),
            remaining_balance: derived.remaining_balance,
            has_open_slot: derived.payments_made < derived.item.logged_payments.len(),
            status: derived.status,
        },
    }))
}

fn item_not_found(item_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Item",
        id: item_id,
    })
}
