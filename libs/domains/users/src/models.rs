use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use repository::serde_helpers::{self, now_millis};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered account. Unlike catalog records, accounts are never
/// soft-deleted; they are managed independently of the trash flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    /// Stored lowercase; lookups normalize before matching.
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(with = "serde_helpers::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_helpers::datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl User {
    pub fn new(input: CreateUser) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            role: input.role.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_defaults_to_user_role() {
        let user = User::new(CreateUser {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "argon2id$stub".to_string(),
            role: None,
        });

        assert_eq!(user.role, Role::User);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn role_round_trips_through_lowercase_strings() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(Role::Admin.to_string(), "admin");

        let encoded = serde_json::to_string(&Role::User).unwrap();
        assert_eq!(encoded, "\"user\"");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert_eq!(err, "unknown role: superuser");
    }
}
