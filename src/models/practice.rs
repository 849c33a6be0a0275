// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Practice catalog: languages, accents, difficulties and emotions.

use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Supported practice languages and the accents offered for each.
pub const LANGUAGES: &[(&str, &[&str])] = &[
    ("English", &["American", "British", "Indian", "Australian"]),
    ("Spanish", &["Spain", "Mexican"]),
    ("French", &["France", "Canadian"]),
    ("German", &["Germany"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target emotion for tone practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Excited,
    Formal,
    Calm,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Excited,
        Emotion::Formal,
        Emotion::Calm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Excited => "Excited",
            Emotion::Formal => "Formal",
            Emotion::Calm => "Calm",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One language and its accents, for API responses.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LanguageOption {
    pub language: String,
    pub accents: Vec<String>,
}

/// Everything the practice screens offer, for API responses.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PracticeOptions {
    pub languages: Vec<LanguageOption>,
    pub difficulties: Vec<Difficulty>,
    pub emotions: Vec<Emotion>,
}

impl PracticeOptions {
    pub fn catalog() -> Self {
        Self {
            languages: LANGUAGES
                .iter()
                .map(|(language, accents)| LanguageOption {
                    language: language.to_string(),
                    accents: accents.iter().map(|a| a.to_string()).collect(),
                })
                .collect(),
            difficulties: Difficulty::ALL.to_vec(),
            emotions: Emotion::ALL.to_vec(),
        }
    }
}
