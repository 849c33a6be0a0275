// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod analysis;
pub mod history;
pub mod practice;
pub mod pricing;
pub mod question;
pub mod subscription;
pub mod user;

pub use analysis::{AnalysisDraft, AnalysisRecord};
pub use history::{HistoryDraft, HistoryItem, HistoryKind, HistoryUpdate};
pub use practice::{Difficulty, Emotion, PracticeOptions};
pub use pricing::{BillingInterval, PricingConfig};
pub use question::InterviewQuestion;
pub use subscription::{Subscription, SubscriptionStatus, SubscriptionView};
pub use user::{Role, UserProfile, UserStatus};
