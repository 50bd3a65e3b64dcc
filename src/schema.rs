use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::User;

// Struct representing the request body for creating or replacing a Todo
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TodoSchema {
    #[validate(length(min = 3))]
    pub title: String,
    #[validate(length(min = 3, max = 100))]
    pub description: String,
    #[validate(range(min = 1, max = 5))]
    pub priority: i32,
    pub complete: bool,
    pub phone_number: String,
}

// Struct representing the request body for registering a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserSchema {
    #[validate(length(min = 1))]
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

// Form-encoded credentials exchanged for an access token
#[derive(Deserialize)]
pub struct LoginSchema {
    pub username: String,
    pub password: String,
}

/// Public view of a user; never carries the password or its digest.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub phone_number: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            phone_number: user.phone_number,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(title: &str, description: &str, priority: i32) -> TodoSchema {
        TodoSchema {
            title: title.to_string(),
            description: description.to_string(),
            priority,
            complete: false,
            phone_number: "555-1111".to_string(),
        }
    }

    #[test]
    fn accepts_todo_within_bounds() {
        assert!(todo("Buy milk", "2% milk", 3).validate().is_ok());
        assert!(todo("abc", "xyz", 1).validate().is_ok());
        assert!(todo("abc", &"d".repeat(100), 5).validate().is_ok());
    }

    #[test]
    fn rejects_short_title() {
        let errors = todo("ab", "2% milk", 3).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn rejects_description_out_of_range() {
        assert!(todo("Buy milk", "ab", 3).validate().is_err());
        let errors = todo("Buy milk", &"d".repeat(101), 3).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn rejects_priority_out_of_range() {
        assert!(todo("Buy milk", "2% milk", 0).validate().is_err());
        let errors = todo("Buy milk", "2% milk", 6).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("priority"));
    }

    #[test]
    fn user_response_has_no_password_fields() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            hashed_password: "$2b$04$digest".to_string(),
            role: "admin".to_string(),
            phone_number: Some("555-0000".to_string()),
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["role"], "admin");
        assert!(json.get("hashed_password").is_none());
        assert!(json.get("password").is_none());
    }
}
