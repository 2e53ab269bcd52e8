// tests/api_documents.rs

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use pitchgenie::{models::document::DocumentKind, services::subscription::current_month};

#[tokio::test]
async fn documents_are_listed_newest_first_and_scoped_to_the_owner() {
    let app = TestApp::new();
    let (token, user_id) = app.signed_in_user("jane@agency.com").await;
    let (_, other) = app.signed_in_user("other@agency.com").await;

    app.insert_document(DocumentKind::Proposal, user_id, "prop_1_aaaaaaaaa", "First", "a");
    app.insert_document(DocumentKind::PitchDeck, user_id, "deck_2_bbbbbbbbb", "Second", "b");
    app.insert_document(DocumentKind::Proposal, other, "prop_3_ccccccccc", "Not mine", "c");

    let res = app.get("/api/documents", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    let list = res.json();
    let ids: Vec<&str> = list.as_array().unwrap().iter().map(|d| d["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["deck_2_bbbbbbbbb", "prop_1_aaaaaaaaa"]);
    assert!(list[0].get("content").is_none());

    let res = app.get("/api/documents?type=proposal", Some(&token)).await;
    assert_eq!(res.json().as_array().unwrap().len(), 1);
    assert_eq!(res.json()[0]["type"], "proposal");

    let res = app.get("/api/documents?limit=1", Some(&token)).await;
    assert_eq!(res.json().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn single_document_includes_content_but_hides_foreign_ones() {
    let app = TestApp::new();
    let (token, user_id) = app.signed_in_user("jane@agency.com").await;
    let (_, other) = app.signed_in_user("other@agency.com").await;
    app.insert_document(DocumentKind::Proposal, user_id, "prop_1_aaaaaaaaa", "Mine", "# Body");
    app.insert_document(DocumentKind::Proposal, other, "prop_2_bbbbbbbbb", "Theirs", "# Secret");

    let res = app.get("/api/documents/prop_1_aaaaaaaaa", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["content"], "# Body");
    assert_eq!(res.json()["projectTitle"], "Mine");
    assert_eq!(res.json()["type"], "proposal");
    assert!(res.json().get("kind").is_none());

    let res = app.get("/api/documents/prop_2_bbbbbbbbb", Some(&token)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["error"], "Document not found");
}

#[tokio::test]
async fn dashboard_summarises_the_account() {
    let app = TestApp::new();
    let (token, user_id) = app.signed_in_user("jane@agency.com").await;
    for i in 0..4 {
        app.insert_document(DocumentKind::Proposal, user_id, &format!("prop_{i}_xxxxxxxxx"), "Doc", "x");
    }
    app.billing.set_usage(user_id, &current_month(), 4, 1);

    let res = app.get("/api/dashboard", Some(&token)).await;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["recentDocuments"].as_array().unwrap().len(), 3);
    assert_eq!(body["recentDocuments"][0]["id"], "prop_3_xxxxxxxxx");
    assert_eq!(body["stats"]["totalDocuments"], 4);
    assert_eq!(body["stats"]["thisMonth"], 4);
    assert_eq!(body["subscription"]["plan"], "FREE");
    assert_eq!(body["subscription"]["status"], "active");
    assert_eq!(body["usage"]["proposals"], 4);
    assert_eq!(body["usage"]["pitchDecks"], 1);
}

#[tokio::test]
async fn billing_endpoints() {
    let app = TestApp::new();

    let res = app.get("/api/billing/plans", None).await;
    assert_eq!(res.status, StatusCode::OK);
    let plans = res.json();
    assert_eq!(plans.as_array().unwrap().len(), 3);
    assert_eq!(plans[0]["plan"], "FREE");
    assert_eq!(plans[0]["limits"], json!({ "proposals": 5, "pitchDecks": 3 }));
    assert_eq!(plans[1]["limits"]["proposals"], -1);

    let (token, user_id) = app.signed_in_user("jane@agency.com").await;
    let res = app.get("/api/billing/subscription", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    let overview = res.json();
    assert_eq!(overview["subscription"]["plan"], "FREE");
    assert_eq!(overview["usage"]["month"], current_month());
    assert_eq!(overview["limits"]["pitchDecks"], 3);

    // A consulta cria a assinatura FREE de forma preguiçosa
    assert!(app.billing.subscription_of(user_id).is_some());
}

#[tokio::test]
async fn field_catalogue_is_public() {
    let app = TestApp::new();

    let res = app.get("/api/fields", None).await;
    assert_eq!(res.status, StatusCode::OK);
    let ids: Vec<String> = res
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["technology", "healthcare"]);

    let res = app.get("/api/fields/healthcare", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.json()["formFields"].as_array().is_some_and(|f| !f.is_empty()));

    let res = app.get("/api/fields/astrology", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new();

    let res = app.get("/api-docs/openapi.json", None).await;
    assert_eq!(res.status, StatusCode::OK);
    let doc = res.json();
    assert!(doc["paths"]["/api/generate/proposal"]["post"].is_object());
    assert!(doc["components"]["securitySchemes"]["api_jwt"].is_object());
}
