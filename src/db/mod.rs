// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const SUBSCRIPTIONS: &str = "subscriptions";
    pub const PRICING: &str = "pricing";
    pub const INTERVIEW_QUESTIONS: &str = "interviewQuestions";
    /// Impromptu speech analyses
    pub const ANALYSIS_HISTORY: &str = "analysisHistory";

    // Practice history, one collection per mode
    pub const PRONUNCIATION_HISTORY: &str = "pronunciationPracticeHistory";
    pub const PITCH_PERFECT_HISTORY: &str = "pitchPerfectHistory";
    pub const STORYTELLER_HISTORY: &str = "storytellerHistory";
    pub const SENTENCE_SCRAMBLE_HISTORY: &str = "sentenceScrambleHistory";
    pub const IMPROMPTU_HISTORY: &str = "impromptuHistory";
}
