//! Authentication payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::JsonObject;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of a successful login or registration
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// The authenticated user as returned by `/auth/profile`
///
/// The backend may send `_id`, `id` or both; `_id` wins when they differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUserProfile")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Deserialize)]
struct RawUserProfile {
    #[serde(rename = "_id", default)]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    email: String,
    #[serde(rename = "createdAt", default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: JsonObject,
}

impl TryFrom<RawUserProfile> for UserProfile {
    type Error = String;

    fn try_from(raw: RawUserProfile) -> Result<Self, Self::Error> {
        let id = raw
            .object_id
            .or(raw.id)
            .ok_or_else(|| "missing field `_id` or `id`".to_string())?;
        Ok(Self {
            id,
            name: raw.name,
            email: raw.email,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            extra: raw.extra,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Third-party identity provider offered on the login screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthProvider {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_accepts_either_id_key() {
        let mongo: UserProfile =
            serde_json::from_value(json!({"_id": "u1", "email": "a@b.c"})).unwrap();
        let plain: UserProfile =
            serde_json::from_value(json!({"id": "u2", "email": "a@b.c"})).unwrap();
        assert_eq!(mongo.id, "u1");
        assert_eq!(plain.id, "u2");
    }

    #[test]
    fn test_profile_with_both_id_keys() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"_id":"u1","id":"u1","email":"a@b.c","name":"Ada","plan":"pro"}"#,
        )
        .unwrap();

        assert_eq!(profile.id, "u1");
        assert_eq!(profile.name.as_deref(), Some("Ada"));
        assert_eq!(profile.extra.get("plan"), Some(&json!("pro")));
        assert!(!profile.extra.contains_key("id"));
    }

    #[test]
    fn test_profile_without_any_id_is_rejected() {
        let result = serde_json::from_value::<UserProfile>(json!({"email": "a@b.c"}));
        assert!(result.is_err());
    }
}
