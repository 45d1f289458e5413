mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn opening_a_year_twice_conflicts() {
    let app = TestApp::spawn().await;

    assert_eq!(
        app.post("/years", &json!({ "year": 2024 })).await.status(),
        reqwest::StatusCode::CREATED
    );
    assert_eq!(
        app.post("/years", &json!({ "year": 2024 })).await.status(),
        reqwest::StatusCode::CONFLICT
    );

    app.cleanup().await;
}

#[tokio::test]
async fn opening_a_year_seeds_a_record_per_client() {
    let app = TestApp::spawn().await;
    app.post("/types", &json!({ "name": "GST" })).await;
    app.post("/years", &json!({ "year": 2024 })).await;
    for name in ["Acme", "Globex"] {
        app.post(
            "/clients",
            &json!({ "name": name, "type": "GST", "monthly_expected": "1000" }),
        )
        .await;
    }

    let resp = app.post("/years", &json!({ "year": 2025 })).await;
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["records_seeded"], 2);

    let body: serde_json::Value = app.get("/records?year=2025").await.json().await.unwrap();
    assert_eq!(body["total"], 2);

    app.cleanup().await;
}

#[tokio::test]
async fn an_unpaid_balance_carries_into_the_next_year() {
    let app = TestApp::spawn().await;
    let client_id = app.seed_client("Acme", "GST", 2024, "500").await;

    // Leave 750 outstanding in 2024: 2 active months at 500, 250 paid
    app.put(
        &format!("/records/2024/{}/months/January", client_id),
        &json!({ "amount": "250" }),
    )
    .await;
    app.put(
        &format!("/records/2024/{}/months/February", client_id),
        &json!({ "amount": "0" }),
    )
    .await;

    app.post("/years", &json!({ "year": 2025 })).await;

    // All months of 2025 empty: the due is exactly the carry-in
    let body: serde_json::Value = app.get("/records?year=2025").await.json().await.unwrap();
    assert_eq!(body["records"][0]["due_payment"], "750.00");

    app.cleanup().await;
}

#[tokio::test]
async fn carry_in_adds_on_top_of_the_new_years_own_due() {
    let app = TestApp::spawn().await;
    let client_id = app.seed_client("Acme", "GST", 2024, "500").await;

    // 500 outstanding in 2024
    app.put(
        &format!("/records/2024/{}/months/January", client_id),
        &json!({ "amount": "0" }),
    )
    .await;

    app.post("/years", &json!({ "year": 2025 })).await;

    // 2025: one active month, 100 paid -> own due 400, plus 500 carried
    let resp = app
        .put(
            &format!("/records/2025/{}/months/January", client_id),
            &json!({ "amount": "100" }),
        )
        .await;
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["due_payment"], "900.00");

    app.cleanup().await;
}

#[tokio::test]
async fn editing_an_earlier_year_ripples_into_later_years() {
    let app = TestApp::spawn().await;
    let client_id = app.seed_client("Acme", "GST", 2024, "500").await;

    // 500 outstanding in 2024, carried into 2025 and 2026
    app.put(
        &format!("/records/2024/{}/months/January", client_id),
        &json!({ "amount": "0" }),
    )
    .await;
    app.post("/years", &json!({ "year": 2025 })).await;
    app.post("/years", &json!({ "year": 2026 })).await;

    let body: serde_json::Value = app.get("/records?year=2026").await.json().await.unwrap();
    assert_eq!(body["records"][0]["due_payment"], "500.00");

    // Settle January 2024: every later year's carry collapses to zero
    app.put(
        &format!("/records/2024/{}/months/January", client_id),
        &json!({ "amount": "500" }),
    )
    .await;

    for year in [2025, 2026] {
        let body: serde_json::Value = app
            .get(&format!("/records?year={}", year))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(body["records"][0]["due_payment"], "0.00", "year {}", year);
    }

    app.cleanup().await;
}

#[tokio::test]
async fn multi_year_arrears_accumulate() {
    let app = TestApp::spawn().await;
    let client_id = app.seed_client("Acme", "GST", 2024, "500").await;

    // 500 unpaid in 2024
    app.put(
        &format!("/records/2024/{}/months/January", client_id),
        &json!({ "amount": "0" }),
    )
    .await;
    app.post("/years", &json!({ "year": 2025 })).await;

    // Another 500 unpaid in 2025 on top of the carry
    app.put(
        &format!("/records/2025/{}/months/January", client_id),
        &json!({ "amount": "0" }),
    )
    .await;

    app.post("/years", &json!({ "year": 2026 })).await;
    let body: serde_json::Value = app.get("/records?year=2026").await.json().await.unwrap();
    assert_eq!(body["records"][0]["due_payment"], "1000.00");

    app.cleanup().await;
}
