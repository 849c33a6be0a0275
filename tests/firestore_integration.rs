// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running:
//! ```bash
//! FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test --test firestore_integration
//! ```

use project_code::models::{
    AnalysisDraft, AnalysisRecord, Difficulty, InterviewQuestion, Role, Subscription,
    SubscriptionStatus, UserProfile,
};
use project_code::services::account;
use project_code::time_utils::{now_millis, DAY_MILLIS};

mod common;
use common::{test_db, unique_uid};

fn analysis_draft(summary: &str) -> AnalysisDraft {
    serde_json::from_value(serde_json::json!({
        "userResponse": "I learned to bake bread during a long winter.",
        "analysis": summary,
        "correctedText": "I learned to bake bread during a long winter.",
        "grammarAccuracy": 92,
        "pronunciation": {"overallAccuracy": 85},
        "topicalityAdherence": 88,
        "topicalityExplanation": "Stayed on the topic."
    }))
    .unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// PROFILE & SUBSCRIPTION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_first_sign_in_creates_profile_and_trial() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("learner");
    let now = now_millis();

    assert!(db.get_user_profile(&uid).await.unwrap().is_none());

    let profile = account::ensure_profile(&db, &uid, Some("learner@example.com".into()), now)
        .await
        .unwrap();
    assert_eq!(profile.roles, vec![Role::User]);

    let stored = db.get_user_profile(&uid).await.unwrap().unwrap();
    assert_eq!(stored.email.as_deref(), Some("learner@example.com"));

    let subscription = db.get_subscription(&uid).await.unwrap().unwrap();
    assert_eq!(subscription.status, SubscriptionStatus::Trial);
    assert_eq!(subscription.trial_end, Some(now + 30 * DAY_MILLIS));

    // A second sign-in returns the stored profile unchanged
    let again = account::ensure_profile(&db, &uid, None, now + 1_000)
        .await
        .unwrap();
    assert_eq!(again.created_at, Some(now));
    assert_eq!(again.email.as_deref(), Some("learner@example.com"));

    println!("✓ Profile and trial created: uid={}", uid);
}

#[tokio::test]
async fn test_expired_trial_is_persisted_as_free() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("lapsed");
    let now = now_millis();

    db.set_subscription(&Subscription::trial(&uid, now - 31 * DAY_MILLIS))
        .await
        .unwrap();

    let current = account::current_subscription(&db, &uid, now).await.unwrap();
    assert_eq!(current.status, SubscriptionStatus::Free);
    assert_eq!(current.plan, "free_tier");

    let stored = db.get_subscription(&uid).await.unwrap().unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Free);
    assert!(stored.trial_start.is_some());
}

#[tokio::test]
async fn test_seeded_admin_keeps_created_at() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("admin");

    let member = UserProfile::new_member(&uid, None, 1_000);
    db.upsert_user_profile(&member).await.unwrap();

    let existing = db.get_user_profile(&uid).await.unwrap();
    let admin = UserProfile::seeded_admin(&uid, "admin@example.com", existing.as_ref(), 9_000);
    db.upsert_user_profile(&admin).await.unwrap();

    let stored = db.get_user_profile(&uid).await.unwrap().unwrap();
    assert!(stored.is_admin());
    assert_eq!(stored.created_at, Some(1_000));
    assert_eq!(stored.updated_at, Some(9_000));
}

// ═══════════════════════════════════════════════════════════════════════════
// PRICING TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_pricing_is_seeded_and_readable() {
    require_emulator!();

    let db = test_db().await;
    let plans = account::active_pricing(&db, now_millis()).await.unwrap();

    assert!(plans.iter().all(|p| p.is_active));
    assert!(plans.iter().any(|p| p.id == "pro"));

    let pro = db.get_pricing("pro").await.unwrap().unwrap();
    assert_eq!(pro.id, "pro");
    assert!(db.get_pricing("no-such-plan").await.unwrap().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// QUESTION & ANALYSIS TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_insert_questions_in_batches() {
    require_emulator!();

    let db = test_db().await;
    let questions: Vec<InterviewQuestion> = (0..7)
        .map(|i| {
            serde_json::from_value(serde_json::json!({
                "question": format!("Describe project number {}.", i),
                "category": "Behavioral",
                "type": "General",
                "difficulty": "Medium"
            }))
            .unwrap()
        })
        .collect();
    assert_eq!(questions[0].difficulty, Difficulty::Medium);

    let written = db.insert_questions(&questions).await.unwrap();
    assert_eq!(written, 7);

    // Loading the same file twice adds new documents
    let written = db.insert_questions(&questions).await.unwrap();
    assert_eq!(written, 7);
}

#[tokio::test]
async fn test_analyses_listed_newest_first() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("speaker");
    let other = unique_uid("speaker");

    let older = AnalysisRecord::new(&uid, analysis_draft("first"), 1_000);
    let newer = AnalysisRecord::new(&uid, analysis_draft("second"), 2_000);
    let foreign = AnalysisRecord::new(&other, analysis_draft("not mine"), 3_000);

    db.add_analysis(&older).await.unwrap();
    let newer_id = db.add_analysis(&newer).await.unwrap();
    db.add_analysis(&foreign).await.unwrap();

    let records = db.list_analyses(&uid).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id.as_deref(), Some(newer_id.as_str()));
    assert_eq!(records[0].draft.analysis, "second");
    assert_eq!(records[1].draft.sentiment, "neutral");
}
