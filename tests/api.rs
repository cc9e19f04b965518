//! End-to-end tests driving the JSON API through the full router.

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};

use ledgerly::{AppState, build_router, initialize_db};

fn new_test_server() -> TestServer {
    let connection = Connection::open_in_memory().unwrap();
    initialize_db(&connection).unwrap();
    let state = AppState::new(Arc::new(Mutex::new(connection)));

    TestServer::new(build_router(state))
}

#[tokio::test]
async fn create_then_read_budget_reflects_amount() {
    let server = new_test_server();

    let response = server
        .post("/api/transactions")
        .json(&json!({
            "amount": 50,
            "description": "lunch",
            "date": "2025-03-05",
            "category": "Meal",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["month"], "2025-03");
    assert_eq!(body["updatedBudget"]["spent"], 50.0);

    // Double-read is idempotent: the reconciling read settles on the same
    // spend both times.
    for _ in 0..2 {
        let budget: Value = server.get("/api/budgets/2025-03").await.json();
        assert_eq!(budget["data"]["budgets"]["Meal"]["spent"], 50.0);
        assert_eq!(budget["data"]["budgets"]["Meal"]["limit"], 0.0);
    }
}

#[tokio::test]
async fn update_moves_spend_and_delete_clears_it() {
    // The full lifecycle: 50 Meal, updated to 80 Shopping, then deleted.
    let server = new_test_server();

    let created: Value = server
        .post("/api/transactions")
        .json(&json!({
            "amount": 50,
            "description": "lunch",
            "date": "2025-03-05",
            "category": "Meal",
        }))
        .await
        .json();
    let id = created["data"]["id"].as_i64().unwrap();

    let response = server
        .put(&format!("/api/transactions/{id}"))
        .json(&json!({ "amount": 80, "category": "Shopping" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let budget: Value = server.get("/api/budgets/2025-03").await.json();
    assert_eq!(budget["data"]["budgets"]["Meal"]["spent"], 0.0);
    assert_eq!(budget["data"]["budgets"]["Shopping"]["spent"], 80.0);

    let response = server.delete(&format!("/api/transactions/{id}")).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let budget: Value = server.get("/api/budgets/2025-03").await.json();
    assert_eq!(budget["data"]["budgets"]["Shopping"]["spent"], 0.0);

    // Deleting again fails now that the transaction is gone.
    let response = server.delete(&format!("/api/transactions/{id}")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn listing_returns_transactions_newest_first() {
    let server = new_test_server();

    for (amount, date) in [(10, "2025-03-01"), (20, "2025-04-15"), (30, "2025-03-08")] {
        server
            .post("/api/transactions")
            .json(&json!({
                "amount": amount,
                "description": "test",
                "date": date,
                "category": "Other",
            }))
            .await;
    }

    let response = server.get("/api/transactions").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let dates: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|transaction| transaction["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-04-15", "2025-03-08", "2025-03-01"]);
}

#[tokio::test]
async fn setting_limits_on_empty_month_leaves_spend_at_zero() {
    let server = new_test_server();

    let response = server
        .post("/api/budgets")
        .json(&json!({ "month": "2025-03", "budgets": { "Meal": 200 } }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["budgets"]["Meal"]["limit"], 200.0);
    assert_eq!(body["data"]["budgets"]["Meal"]["spent"], 0.0);
    // Categories stay absent until touched.
    assert!(body["data"]["budgets"].get("Shopping").is_none());
}

#[tokio::test]
async fn limits_survive_spend_and_never_alter_it() {
    let server = new_test_server();

    server
        .post("/api/transactions")
        .json(&json!({
            "amount": 75,
            "description": "groceries",
            "date": "2025-03-10",
            "category": "Meal",
        }))
        .await;

    // Setting limits twice with identical input is a no-op on state.
    for _ in 0..2 {
        let response = server
            .post("/api/budgets")
            .json(&json!({ "month": "2025-03", "budgets": { "Meal": 300 } }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    let budget: Value = server.get("/api/budgets/2025-03").await.json();
    assert_eq!(budget["data"]["budgets"]["Meal"]["limit"], 300.0);
    assert_eq!(budget["data"]["budgets"]["Meal"]["spent"], 75.0);
}

#[tokio::test]
async fn validation_failures_return_tagged_envelopes() {
    let server = new_test_server();

    let response = server
        .post("/api/transactions")
        .json(&json!({
            "amount": "not-a-number",
            "description": "lunch",
            "date": "2025-03-05",
            "category": "Meal",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid amount value");

    let response = server
        .post("/api/budgets")
        .json(&json!({ "month": "2025-03", "budgets": { "Meal": -10 } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Budget limits cannot be negative");

    let response = server.post("/api/budgets").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn amounts_sent_as_strings_are_coerced() {
    let server = new_test_server();

    let response = server
        .post("/api/transactions")
        .json(&json!({
            "amount": "19.99",
            "description": "cinema",
            "date": "2025-03-20",
            "category": "Movie",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let budget: Value = server.get("/api/budgets/2025-03").await.json();
    assert_eq!(budget["data"]["budgets"]["Movie"]["spent"], 19.99);
}

#[tokio::test]
async fn responses_allow_cross_origin_clients() {
    let server = new_test_server();

    let response = server.get("/api/transactions").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("expected response to carry the access-control-allow-origin header");
    assert_eq!(allow_origin, "*");
}

#[tokio::test]
async fn unseen_month_returns_empty_budget() {
    let server = new_test_server();

    let response = server.get("/api/budgets/2030-12").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["month"], "2030-12");
    assert_eq!(body["data"]["budgets"], json!({}));
}
