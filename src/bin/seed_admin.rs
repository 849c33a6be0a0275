// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Create or promote an admin profile.
//!
//! Usage: `seed_admin --uid UID --email EMAIL`
//! (falls back to `ADMIN_UID` / `ADMIN_EMAIL`)

use anyhow::Context;
use project_code::config::firebase_project_id_from_env;
use project_code::db::FirestoreDb;
use project_code::models::UserProfile;
use project_code::time_utils::now_millis;

#[derive(Debug, PartialEq)]
struct SeedArgs {
    uid: String,
    email: String,
}

/// Value following `flag`, if any.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .filter(|v| !v.starts_with("--"))
        .cloned()
}

fn parse_args(
    args: &[String],
    env_uid: Option<String>,
    env_email: Option<String>,
) -> anyhow::Result<SeedArgs> {
    let uid = flag_value(args, "--uid")
        .or(env_uid)
        .context("--uid (or ADMIN_UID) is required")?;
    let email = flag_value(args, "--email")
        .or(env_email)
        .context("--email (or ADMIN_EMAIL) is required")?;
    Ok(SeedArgs { uid, email })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let SeedArgs { uid, email } = parse_args(
        &args,
        std::env::var("ADMIN_UID").ok(),
        std::env::var("ADMIN_EMAIL").ok(),
    )?;

    let project_id = firebase_project_id_from_env()?;
    let db = FirestoreDb::new(&project_id)
        .await
        .context("failed to connect to Firestore")?;

    let existing = db.get_user_profile(&uid).await?;
    let profile = UserProfile::seeded_admin(&uid, &email, existing.as_ref(), now_millis());
    db.upsert_user_profile(&profile).await?;

    println!(
        "Seeded admin {} ({}), {} profile",
        email,
        uid,
        if existing.is_some() { "updated" } else { "new" }
    );
    Ok(())
}
