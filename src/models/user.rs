// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Role granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Blocked,
}

/// User profile stored in Firestore (`users/{uid}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Firebase Auth uid (also used as document ID)
    pub uid: String,
    /// Email address (may be None for phone or anonymous sign-in)
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub updated_at: Option<i64>,
}

impl UserProfile {
    /// Profile for a user signing in for the first time.
    pub fn new_member(uid: &str, email: Option<String>, now: i64) -> Self {
        Self {
            uid: uid.to_string(),
            email,
            roles: vec![Role::User],
            status: Some(UserStatus::Active),
            created_at: Some(now),
            updated_at: None,
        }
    }

    /// Admin profile, keeping the creation time of an existing profile.
    pub fn seeded_admin(uid: &str, email: &str, existing: Option<&UserProfile>, now: i64) -> Self {
        let created_at = existing.and_then(|p| p.created_at).unwrap_or(now);
        Self {
            uid: uid.to_string(),
            email: Some(email.to_string()),
            roles: vec![Role::User, Role::Admin],
            status: Some(UserStatus::Active),
            created_at: Some(created_at),
            updated_at: existing.map(|_| now),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_admin_preserves_created_at() {
        let existing = UserProfile::new_member("u1", None, 1_000);
        let admin = UserProfile::seeded_admin("u1", "a@example.com", Some(&existing), 5_000);

        assert_eq!(admin.created_at, Some(1_000));
        assert_eq!(admin.updated_at, Some(5_000));
        assert!(admin.is_admin());
        assert_eq!(admin.email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn test_seeded_admin_new_profile() {
        let admin = UserProfile::seeded_admin("u2", "b@example.com", None, 7_000);
        assert_eq!(admin.created_at, Some(7_000));
        assert_eq!(admin.updated_at, None);
        assert_eq!(admin.roles, vec![Role::User, Role::Admin]);
    }

    #[test]
    fn test_profile_json_is_camel_case() {
        let profile = UserProfile::new_member("u3", Some("c@example.com".into()), 42);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["createdAt"], 42);
        assert_eq!(json["roles"][0], "user");
        assert_eq!(json["status"], "active");
        assert!(json.get("updatedAt").is_none());
    }
}
