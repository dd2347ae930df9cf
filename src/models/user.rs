use std::fmt;
use std::str::FromStr;

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Fixed set of account roles. Stored as a plain string on the user document
/// and checked against explicit allow-lists at the access-control boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "customer" => Ok(Role::Customer),
            _ => Err(format!("Unknown role '{s}'")),
        }
    }
}

/// User account document.
///
/// `password` holds the argon2 hash and is `None` on reads that project it
/// out. Writes that replace the whole document must fetch it included, or the
/// stored hash would be dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub is_active: bool,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// Builds a new user document with generated id and timestamps.
    /// `password` must already be hashed.
    pub fn new(
        full_name: String,
        email: String,
        password: String,
        role: Role,
        phone_number: Option<String>,
        profile_image: Option<String>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            full_name,
            email,
            password: Some(password),
            is_active: true,
            role,
            phone_number,
            profile_image,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Drops the password hash, e.g. before handing the record to callers
    /// outside the credential path.
    pub fn sanitized(mut self) -> Self {
        self.password = None;
        self
    }
}

/// Projected view of a user used when expanding creator references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl UserSummary {
    /// Projection matching the summary's fields.
    pub fn fields() -> mongodb::bson::Document {
        mongodb::bson::doc! { "fullName": 1, "email": 1, "profileImage": 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Customer".parse::<Role>().unwrap(), Role::Customer);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "$argon2id$hash".to_string(),
            Role::Customer,
            None,
            None,
        );
        assert!(user.is_active);
        assert!(user.last_login.is_none());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_sanitized_strips_password() {
        let user = User::new(
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "$argon2id$hash".to_string(),
            Role::Customer,
            None,
            None,
        );
        assert!(user.sanitized().password.is_none());
    }

    #[test]
    fn test_password_not_serialized_when_absent() {
        let user = User::new(
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "$argon2id$hash".to_string(),
            Role::Customer,
            None,
            None,
        )
        .sanitized();

        let doc = mongodb::bson::to_document(&user).unwrap();
        assert!(!doc.contains_key("password"));
    }
}
