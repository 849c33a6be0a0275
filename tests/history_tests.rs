// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Practice history route tests.

use axum::http::StatusCode;
use common::TestAppBuilder;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_unknown_kind_is_not_found() {
    let app = common::create_test_app();
    let token = common::id_token("learner-1");

    let (status, body) = common::send(
        app.router,
        common::json_request("GET", "/api/history/karaoke", Some(&token), None, json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_storyteller_needs_three_images() {
    let app = common::create_test_app();
    let token = common::id_token("learner-1");

    let (status, body) = common::send(
        app.router,
        common::json_request(
            "POST",
            "/api/history/storyteller",
            Some(&token),
            None,
            json!({"images": ["data:image/png;base64,AAAA"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_tone_needs_emotion() {
    let app = common::create_test_app();
    let token = common::id_token("learner-1");

    let (status, body) = common::send(
        app.router,
        common::json_request(
            "POST",
            "/api/history/tone",
            Some(&token),
            None,
            json!({"phrase": "We did it!"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].as_str().unwrap().contains("emotion"));
}

#[tokio::test]
async fn test_analysis_score_out_of_range() {
    let app = common::create_test_app();
    let token = common::id_token("learner-1");

    let (status, body) = common::send(
        app.router,
        common::json_request(
            "POST",
            "/api/history/analysis",
            Some(&token),
            None,
            json!({
                "userResponse": "I taught myself to juggle.",
                "analysis": "Clear and on topic.",
                "correctedText": "I taught myself to juggle.",
                "grammarAccuracy": 120,
                "pronunciation": {
                    "overallAccuracy": 80,
                    "detailedFeedback": [],
                    "suggestions": "Slow down."
                },
                "topicalityAdherence": 90,
                "topicalityExplanation": "Stayed on topic."
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Emulator ────────────────────────────────────────────────

#[tokio::test]
async fn test_create_list_and_update_scoped_to_owner() {
    require_emulator!();

    let db = common::test_db().await;
    let owner = common::unique_uid("owner");
    let other = common::unique_uid("other");
    let app = TestAppBuilder::new().db(db).build();
    let owner_token = common::id_token(&owner);
    let other_token = common::id_token(&other);

    let (status, created) = common::send(
        app.router.clone(),
        common::json_request(
            "POST",
            "/api/history/accent",
            Some(&owner_token),
            None,
            json!({"phrase": "Hola, ¿cómo estás?", "language": "Spanish", "difficulty": "Easy"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = common::send(
        app.router.clone(),
        common::json_request("GET", "/api/history/accent", Some(&owner_token), None, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = listed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id.as_str());
    assert_eq!(items[0]["phrase"], "Hola, ¿cómo estás?");

    let (_, listed) = common::send(
        app.router.clone(),
        common::json_request("GET", "/api/history/accent", Some(&other_token), None, json!({})),
    )
    .await;
    assert!(listed.as_array().unwrap().is_empty());

    let uri = format!("/api/history/accent/{}", id);
    let (status, _) = common::send(
        app.router.clone(),
        common::json_request(
            "PATCH",
            &uri,
            Some(&other_token),
            None,
            json!({"recordedAudioUrl": "https://example.com/other.webm"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, updated) = common::send(
        app.router.clone(),
        common::json_request(
            "PATCH",
            &uri,
            Some(&owner_token),
            None,
            json!({"recordedAudioUrl": "https://example.com/take1.webm", "analysis": {"overallAccuracy": 91}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["recordedAudioUrl"], "https://example.com/take1.webm");
    assert_eq!(updated["phrase"], "Hola, ¿cómo estás?");
    assert!(updated["updatedAt"].as_i64().is_some());

    let (_, listed) = common::send(
        app.router,
        common::json_request("GET", "/api/history/accent", Some(&owner_token), None, json!({})),
    )
    .await;
    assert_eq!(listed[0]["analysis"]["overallAccuracy"], 91);
}

#[tokio::test]
async fn test_storyteller_accepts_generated_images() {
    let app = common::create_test_app();
    let token = common::id_token("learner-1");
    let image = format!("data:image/png;base64,{}", "A".repeat(1_000_000));

    // Passes the body limit and validation; the offline database then fails the write
    let (status, body) = common::send(
        app.router,
        common::json_request(
            "POST",
            "/api/history/storyteller",
            Some(&token),
            None,
            json!({"images": [image.clone(), image.clone(), image]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
}
