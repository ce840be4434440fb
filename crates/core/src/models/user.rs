//! User account models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UserRecord")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Wire shape of [`User`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    first_name: String,
    last_name: String,
    age: u32,
    email: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRecord> for User {
    type Error = String;

    fn try_from(raw: UserRecord) -> std::result::Result<Self, String> {
        Ok(Self {
            id: super::record_id(raw.mongo_id, raw.id)?,
            first_name: raw.first_name,
            last_name: raw.last_name,
            age: raw.age,
            email: raw.email,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

impl User {
    /// Name shown next to comments and in the navigation bar
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Login form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Partial profile update. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body returned by login and register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_accepts_mongo_id() {
        let json = r#"{
            "_id": "68fe440f0f375de5da710444",
            "firstName": "Ana",
            "lastName": "Gómez",
            "age": 30,
            "email": "ana@example.com",
            "createdAt": "2025-10-25T17:52:17Z"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "68fe440f0f375de5da710444");
        assert_eq!(user.display_name(), "Ana Gómez");
        assert!(user.created_at.is_some());
        assert!(user.updated_at.is_none());
    }

    #[test]
    fn test_user_id_sources() {
        let both = r#"{"_id":"m1","id":"m1","firstName":"Ana","lastName":"G","age":30,"email":"a@b.co"}"#;
        let plain = r#"{"id":"7","firstName":"Ana","lastName":"G","age":30,"email":"a@b.co"}"#;
        let neither = r#"{"firstName":"Ana","lastName":"G","age":30,"email":"a@b.co"}"#;

        assert_eq!(serde_json::from_str::<User>(both).unwrap().id, "m1");
        assert_eq!(serde_json::from_str::<User>(plain).unwrap().id, "7");
        assert!(serde_json::from_str::<User>(neither).is_err());
    }

    #[test]
    fn test_profile_update_omits_unset_fields() {
        let update = ProfileUpdate {
            first_name: Some("Luis".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, serde_json::json!({ "firstName": "Luis" }));
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }
}
