// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles and roles)
//! - Subscriptions and pricing plans
//! - Practice history (one collection per practice mode)
//! - Speech analyses
//! - Interview questions (bulk load)

use crate::db::collections;
use crate::error::AppError;
use crate::models::history::sort_newest_first;
use crate::models::{
    AnalysisRecord, HistoryItem, HistoryKind, HistoryUpdate, InterviewQuestion, PricingConfig,
    Subscription, UserProfile,
};
use crate::models::analysis::ANALYSIS_LIST_LIMIT;
use sha2::{Digest, Sha256};

/// Questions per bulk-load commit. Firestore caps a transaction at 500 writes.
pub const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // The emulator accepts any bearer token
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by Firebase uid.
    pub async fn get_user_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a user profile.
    pub async fn upsert_user_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&profile.uid)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Subscription Operations ─────────────────────────────────

    pub async fn get_subscription(&self, uid: &str) -> Result<Option<Subscription>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SUBSCRIPTIONS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Write the whole subscription document.
    pub async fn set_subscription(&self, subscription: &Subscription) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SUBSCRIPTIONS)
            .document_id(&subscription.user_id)
            .object(subscription)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Merge a paid plan into the subscription, keeping any trial fields.
    pub async fn activate_subscription(&self, subscription: &Subscription) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(Subscription::ACTIVATION_FIELDS)
            .in_col(collections::SUBSCRIPTIONS)
            .document_id(&subscription.user_id)
            .object(subscription)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Pricing Operations ──────────────────────────────────────

    /// All pricing plans, active or not.
    pub async fn list_pricing(&self) -> Result<Vec<PricingConfig>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PRICING)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_pricing(&self, plan_id: &str) -> Result<Option<PricingConfig>, AppError> {
        let plan: Option<PricingConfig> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PRICING)
            .obj()
            .one(plan_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Plans created from the admin console carry no id field
        Ok(plan.map(|mut p| {
            if p.id.is_empty() {
                p.id = plan_id.to_string();
            }
            p
        }))
    }

    /// Write the given plans in a single transaction.
    pub async fn seed_pricing(&self, plans: &[PricingConfig]) -> Result<(), AppError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        for plan in plans {
            client
                .fluent()
                .update()
                .in_col(collections::PRICING)
                .document_id(&plan.id)
                .object(plan)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add plan to transaction: {}", e))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit pricing seed: {}", e)))?;

        tracing::info!(count = plans.len(), "Seeded default pricing plans");
        Ok(())
    }

    // ─── Practice History Operations ─────────────────────────────

    /// Store a new history item and return its generated document ID.
    pub async fn add_history_item(
        &self,
        kind: HistoryKind,
        item: &HistoryItem,
    ) -> Result<String, AppError> {
        let created: HistoryItem = self
            .get_client()?
            .fluent()
            .insert()
            .into(kind.collection())
            .generate_document_id()
            .object(item)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        created
            .id
            .ok_or_else(|| AppError::Database("Firestore returned no document id".to_string()))
    }

    pub async fn get_history_item(
        &self,
        kind: HistoryKind,
        id: &str,
    ) -> Result<Option<HistoryItem>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(kind.collection())
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Merge the present fields of `update` into an existing item.
    pub async fn update_history_item(
        &self,
        kind: HistoryKind,
        id: &str,
        update: &HistoryUpdate,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(update.field_paths())
            .in_col(kind.collection())
            .document_id(id)
            .object(update)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// The caller's items, newest first.
    ///
    /// The owner filter is always applied; the limit is applied by Firestore
    /// before the in-memory sort.
    pub async fn list_history(
        &self,
        kind: HistoryKind,
        user_id: &str,
    ) -> Result<Vec<HistoryItem>, AppError> {
        let mut items: Vec<HistoryItem> = self
            .get_client()?
            .fluent()
            .select()
            .from(kind.collection())
            .filter(|q| q.for_all([q.field("userId").eq(user_id)]))
            .limit(kind.list_limit())
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sort_newest_first(&mut items);
        Ok(items)
    }

    // ─── Analysis History Operations ─────────────────────────────

    pub async fn add_analysis(&self, record: &AnalysisRecord) -> Result<String, AppError> {
        let created: AnalysisRecord = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::ANALYSIS_HISTORY)
            .generate_document_id()
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        created
            .id
            .ok_or_else(|| AppError::Database("Firestore returned no document id".to_string()))
    }

    pub async fn list_analyses(&self, user_id: &str) -> Result<Vec<AnalysisRecord>, AppError> {
        let mut records: Vec<AnalysisRecord> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ANALYSIS_HISTORY)
            .filter(|q| q.for_all([q.field("userId").eq(user_id)]))
            .limit(ANALYSIS_LIST_LIMIT)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    // ─── Interview Question Operations ───────────────────────────

    /// Insert questions as new documents, committing every [`BATCH_SIZE`].
    ///
    /// Returns the number of questions written.
    pub async fn insert_questions(&self, questions: &[InterviewQuestion]) -> Result<usize, AppError> {
        let client = self.get_client()?;
        let run_seed = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let mut written = 0;

        for (batch_index, chunk) in questions.chunks(BATCH_SIZE).enumerate() {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for (offset, question) in chunk.iter().enumerate() {
                let index = batch_index * BATCH_SIZE + offset;
                let doc_id = question_doc_id(run_seed, index, &question.question);
                client
                    .fluent()
                    .update()
                    .in_col(collections::INTERVIEW_QUESTIONS)
                    .document_id(&doc_id)
                    .object(question)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add question {} to transaction: {}",
                            index, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit question batch: {}", e))
            })?;

            written += chunk.len();
            tracing::info!(batch = batch_index, written, "Committed question batch");
        }

        Ok(written)
    }
}

/// Document ID for a bulk-loaded question: 20 hex chars, unique per load run.
fn question_doc_id(run_seed: i64, index: usize, question: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(run_seed.to_be_bytes());
    hasher.update((index as u64).to_be_bytes());
    hasher.update(question.as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(20);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_doc_ids_unique_within_run() {
        let a = question_doc_id(1, 0, "Same question?");
        let b = question_doc_id(1, 1, "Same question?");
        let c = question_doc_id(2, 0, "Same question?");

        assert_eq!(a.len(), 20);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, question_doc_id(1, 0, "Same question?"));
    }

    #[tokio::test]
    async fn test_offline_mode_reports_database_error() {
        let db = FirestoreDb::new_mock();
        let err = db.get_user_profile("u1").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
