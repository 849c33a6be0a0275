// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Load interview questions from a JSON file into Firestore.
//!
//! Usage: `bulk_load_questions [FILE]` (default `sample-questions.json`)

use anyhow::Context;
use project_code::config::firebase_project_id_from_env;
use project_code::db::FirestoreDb;
use project_code::models::InterviewQuestion;
use std::path::PathBuf;

const DEFAULT_FILE: &str = "sample-questions.json";

fn questions_file(args: &[String]) -> PathBuf {
    PathBuf::from(args.first().map(String::as_str).unwrap_or(DEFAULT_FILE))
}

fn parse_questions(content: &str) -> anyhow::Result<Vec<InterviewQuestion>> {
    serde_json::from_str(content).context("expected a JSON array of interview questions")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = questions_file(&args);

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let questions = parse_questions(&content)?;

    let project_id = firebase_project_id_from_env()?;
    let db = FirestoreDb::new(&project_id)
        .await
        .context("failed to connect to Firestore")?;

    let written = db.insert_questions(&questions).await?;
    println!(
        "Uploaded {} questions to Firestore from {}",
        written,
        path.display()
    );
    Ok(())
}
