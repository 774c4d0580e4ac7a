//! HTTP-level integration tests for items: CRUD, list views, payment
//! logging and suggestions.

mod common;

use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;
use common::{
    body_json, create_item, create_list, d, dec, delete_auth, get_auth, post_json_auth,
    put_json_auth, signup_token,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sign up, create a list, and return `(app, token, list_id)`.
async fn setup() -> (Router, String, i64) {
    let app = common::build_test_app();
    let token = signup_token(app.clone(), "builder@example.com").await;
    let list = create_list(app.clone(), &token, json!({ "name": "Rig" })).await;
    (app, token, list["id"].as_i64().unwrap())
}

async fn log_payment(
    app: Router,
    token: &str,
    list_id: i64,
    item_id: i64,
    amount: Value,
) -> Response {
    post_json_auth(
        app,
        &format!("/api/v1/lists/{list_id}/items/{item_id}/payments"),
        json!({ "amount": amount }),
        token,
    )
    .await
}

fn names(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Create / read / update / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_item_applies_defaults() {
    let (app, token, list_id) = setup().await;
    let item = create_item(app, &token, list_id, json!({ "name": " SSD ", "total_price": 120 })).await;

    assert_eq!(item["name"], "SSD");
    assert_eq!(item["planned_payment_count"], 1);
    assert_eq!(item["include_in_spend_calculation"], true);
    assert_eq!(item["status"], "pending");
    assert_eq!(dec(&item["paid_amount"]), d(0));
    assert_eq!(dec(&item["remaining_balance"]), d(120));
    assert_eq!(item["list_id"], list_id);
}

#[tokio::test]
async fn create_item_rejects_overpaid_payments() {
    let (app, token, list_id) = setup().await;
    let response = post_json_auth(
        app,
        &format!("/api/v1/lists/{list_id}/items"),
        json!({ "name": "PSU", "total_price": 100, "planned_payment_count": 2, "logged_payments": [80, 40] }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn create_item_rejects_zero_payment_count() {
    let (app, token, list_id) = setup().await;
    let response = post_json_auth(
        app,
        &format!("/api/v1/lists/{list_id}/items"),
        json!({ "name": "PSU", "total_price": 100, "planned_payment_count": 0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_item_rejects_payment_count_above_limit() {
    let (app, token, list_id) = setup().await;
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/lists/{list_id}/items"),
        json!({ "name": "PSU", "total_price": 100, "planned_payment_count": i32::MAX }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let item = create_item(
        app,
        &token,
        list_id,
        json!({ "name": "PSU", "total_price": 120, "planned_payment_count": 120 }),
    )
    .await;
    assert_eq!(item["logged_payments"].as_array().unwrap().len(), 120);
}

#[tokio::test]
async fn create_item_rejects_amounts_above_cap() {
    let (app, token, list_id) = setup().await;
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/lists/{list_id}/items"),
        json!({
            "name": "GPU",
            "total_price": Decimal::MAX.to_string(),
            "planned_payment_count": 2,
            "logged_payments": [Decimal::MAX.to_string(), Decimal::MAX.to_string()]
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app, &format!("/api/v1/lists/{list_id}/metrics"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_item_in_foreign_list_is_not_found() {
    let (app, _token, list_id) = setup().await;
    let intruder = signup_token(app.clone(), "intruder@example.com").await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/lists/{list_id}/items"),
        json!({ "name": "GPU", "total_price": 500 }),
        &intruder,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn item_under_wrong_list_is_not_found() {
    let (app, token, list_id) = setup().await;
    let other = create_list(app.clone(), &token, json!({ "name": "Other" })).await;
    let other_id = other["id"].as_i64().unwrap();
    let item = create_item(app.clone(), &token, list_id, json!({ "name": "RAM", "total_price": 90 })).await;
    let item_id = item["id"].as_i64().unwrap();

    let response = get_auth(app, &format!("/api/v1/lists/{other_id}/items/{item_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_resizes_payment_slots() {
    let (app, token, list_id) = setup().await;
    let item = create_item(
        app.clone(),
        &token,
        list_id,
        json!({ "name": "GPU", "total_price": 600, "planned_payment_count": 3, "logged_payments": [200, 200] }),
    )
    .await;
    let item_id = item["id"].as_i64().unwrap();

    let response = put_json_auth(
        app,
        &format!("/api/v1/lists/{list_id}/items/{item_id}"),
        json!({ "planned_payment_count": 1, "notes": "Used, from a friend" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();

    assert_eq!(updated["planned_payment_count"], 1);
    assert_eq!(updated["logged_payments"].as_array().unwrap().len(), 1);
    assert_eq!(dec(&updated["paid_amount"]), d(200));
    assert_eq!(updated["notes"], "Used, from a friend");
    assert_eq!(updated["name"], "GPU");
}

#[tokio::test]
async fn update_rejects_payment_count_above_limit() {
    let (app, token, list_id) = setup().await;
    let item = create_item(app.clone(), &token, list_id, json!({ "name": "Fans", "total_price": 40 })).await;
    let item_id = item["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/lists/{list_id}/items/{item_id}"),
        json!({ "planned_payment_count": 121 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app, &format!("/api/v1/lists/{list_id}/items/{item_id}"), &token).await;
    assert_eq!(body_json(response).await["data"]["planned_payment_count"], 1);
}

#[tokio::test]
async fn update_rejects_price_below_paid() {
    let (app, token, list_id) = setup().await;
    let item = create_item(
        app.clone(),
        &token,
        list_id,
        json!({ "name": "CPU", "total_price": 300, "logged_payments": [250] }),
    )
    .await;
    let item_id = item["id"].as_i64().unwrap();

    let response = put_json_auth(
        app,
        &format!("/api/v1/lists/{list_id}/items/{item_id}"),
        json!({ "total_price": 200 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggling_inclusion_changes_projected_cost() {
    let (app, token, list_id) = setup().await;
    let item = create_item(app.clone(), &token, list_id, json!({ "name": "Monitor", "total_price": 250 })).await;
    let item_id = item["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/lists/{list_id}/items/{item_id}/include"),
        json!({ "include_in_spend_calculation": false }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["include_in_spend_calculation"], false);

    let response = get_auth(app, &format!("/api/v1/lists/{list_id}/metrics"), &token).await;
    let metrics = body_json(response).await["data"].clone();
    assert_eq!(dec(&metrics["total_projected_cost"]), d(0));
    assert_eq!(dec(&metrics["total_cost_all"]), d(250));
}

#[tokio::test]
async fn delete_item() {
    let (app, token, list_id) = setup().await;
    let item = create_item(app.clone(), &token, list_id, json!({ "name": "Fans", "total_price": 40 })).await;
    let uri = format!("/api/v1/lists/{list_id}/items/{}", item["id"]);

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// List views
// ---------------------------------------------------------------------------

async fn seed_view_items(app: &Router, token: &str, list_id: i64) {
    for body in [
        json!({ "name": "SSD", "total_price": 120, "logged_payments": [120] }),
        json!({ "name": "case", "total_price": 90 }),
        json!({ "name": "GPU", "total_price": 800, "logged_payments": [300] }),
        json!({ "name": "CPU", "total_price": 350, "logged_payments": [350] }),
    ] {
        create_item(app.clone(), token, list_id, body).await;
    }
}

#[tokio::test]
async fn items_default_to_case_insensitive_name_order() {
    let (app, token, list_id) = setup().await;
    seed_view_items(&app, &token, list_id).await;

    let response = get_auth(app, &format!("/api/v1/lists/{list_id}/items"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(names(&body_json(response).await), ["case", "CPU", "GPU", "SSD"]);
}

#[tokio::test]
async fn items_filtered_by_status() {
    let (app, token, list_id) = setup().await;
    seed_view_items(&app, &token, list_id).await;

    let response = get_auth(app, &format!("/api/v1/lists/{list_id}/items?status=paid"), &token).await;
    assert_eq!(names(&body_json(response).await), ["CPU", "SSD"]);
}

#[tokio::test]
async fn items_searched_and_sorted() {
    let (app, token, list_id) = setup().await;
    seed_view_items(&app, &token, list_id).await;

    let response = get_auth(
        app,
        &format!("/api/v1/lists/{list_id}/items?search=pU&sort=total_price&direction=desc"),
        &token,
    )
    .await;
    assert_eq!(names(&body_json(response).await), ["GPU", "CPU"]);
}

#[tokio::test]
async fn header_toggle_flips_active_sort() {
    let (app, token, list_id) = setup().await;
    seed_view_items(&app, &token, list_id).await;

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/lists/{list_id}/items?sort=total_price&direction=asc&toggle=total_price"),
        &token,
    )
    .await;
    assert_eq!(names(&body_json(response).await), ["GPU", "CPU", "SSD", "case"]);

    let response = get_auth(
        app,
        &format!("/api/v1/lists/{list_id}/items?sort=total_price&direction=desc&toggle=status"),
        &token,
    )
    .await;
    assert_eq!(names(&body_json(response).await), ["case", "GPU", "CPU", "SSD"]);
}

#[tokio::test]
async fn unknown_status_filter_is_bad_request() {
    let (app, token, list_id) = setup().await;
    let response = get_auth(app, &format!("/api/v1/lists/{list_id}/items?status=overdue"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn payments_fill_slots_in_order_and_clamp() {
    let (app, token, list_id) = setup().await;
    let item = create_item(
        app.clone(),
        &token,
        list_id,
        json!({ "name": "GPU", "total_price": 100, "planned_payment_count": 2 }),
    )
    .await;
    let item_id = item["id"].as_i64().unwrap();

    let response = log_payment(app.clone(), &token, list_id, item_id, json!(80)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let after_first = body_json(response).await["data"].clone();
    assert_eq!(after_first["status"], "partially_paid");
    assert_eq!(dec(&after_first["logged_payments"][0]), d(80));

    let response = log_payment(app.clone(), &token, list_id, item_id, json!("50.00")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let after_second = body_json(response).await["data"].clone();
    assert_eq!(dec(&after_second["logged_payments"][1]), d(20));
    assert_eq!(dec(&after_second["paid_amount"]), d(100));
    assert_eq!(after_second["status"], "paid");

    let response = log_payment(app, &token, list_id, item_id, json!(10)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NO_AVAILABLE_SLOT");
}

#[tokio::test]
async fn non_positive_payment_is_rejected() {
    let (app, token, list_id) = setup().await;
    let item = create_item(app.clone(), &token, list_id, json!({ "name": "RAM", "total_price": 90 })).await;
    let item_id = item["id"].as_i64().unwrap();

    let response = log_payment(app.clone(), &token, list_id, item_id, json!(0)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = log_payment(app, &token, list_id, item_id, json!(-5)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_on_foreign_item_is_not_found() {
    let (app, token, list_id) = setup().await;
    let item = create_item(app.clone(), &token, list_id, json!({ "name": "RAM", "total_price": 90 })).await;
    let intruder = signup_token(app.clone(), "intruder@example.com").await;

    let response = log_payment(app, &intruder, list_id, item["id"].as_i64().unwrap(), json!(10)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_payments_each_take_a_slot() {
    let (app, token, list_id) = setup().await;
    let item = create_item(
        app.clone(),
        &token,
        list_id,
        json!({ "name": "Workstation", "total_price": 400, "planned_payment_count": 4 }),
    )
    .await;
    let item_id = item["id"].as_i64().unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..4 {
        let app = app.clone();
        let token = token.clone();
        tasks.spawn(async move {
            log_payment(app, &token, list_id, item_id, json!(100))
                .await
                .status()
        });
    }
    while let Some(status) = tasks.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    let response = get_auth(app, &format!("/api/v1/lists/{list_id}/items/{item_id}"), &token).await;
    let item = body_json(response).await["data"].clone();
    assert_eq!(dec(&item["paid_amount"]), d(400));
    assert_eq!(item["payments_made"], 4);
}

#[tokio::test]
async fn suggestion_is_even_share_capped_at_balance() {
    let (app, token, list_id) = setup().await;
    let item = create_item(
        app.clone(),
        &token,
        list_id,
        json!({ "name": "CPU", "total_price": 300, "planned_payment_count": 3, "logged_payments": [150] }),
    )
    .await;
    let item_id = item["id"].as_i64().unwrap();

    let response = get_auth(
        app,
        &format!("/api/v1/lists/{list_id}/items/{item_id}/payments/suggestion"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let suggestion = body_json(response).await["data"].clone();

    assert_eq!(dec(&suggestion["suggested_amount"]), d(100));
    assert_eq!(suggestion["formatted"], "$100.00");
    assert_eq!(dec(&suggestion["remaining_balance"]), d(150));
    assert_eq!(suggestion["has_open_slot"], true);
}

#[tokio::test]
async fn suggestion_for_fully_logged_item() {
    let (app, token, list_id) = setup().await;
    let item = create_item(
        app.clone(),
        &token,
        list_id,
        json!({ "name": "Case", "total_price": "99.99", "logged_payments": ["99.99"] }),
    )
    .await;
    let item_id = item["id"].as_i64().unwrap();

    let response = get_auth(
        app,
        &format!("/api/v1/lists/{list_id}/items/{item_id}/payments/suggestion"),
        &token,
    )
    .await;
    let suggestion = body_json(response).await["data"].clone();
    assert_eq!(dec(&suggestion["suggested_amount"]), Decimal::ZERO);
    assert_eq!(suggestion["has_open_slot"], false);
    assert_eq!(suggestion["status"], "paid");
}
