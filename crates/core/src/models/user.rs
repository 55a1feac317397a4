use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FieldErrors;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@\w{3,}$").expect("username pattern is valid"));

pub const USERNAME_MAX_LEN: usize = 30;

/// Role a user was created with. Gates every downstream operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Tutor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Tutor => "Tutor",
            Role::Admin => "Admin",
        }
    }

    /// Maps a stored role value onto a variant.
    ///
    /// Unknown or legacy values fall back to [`Role::Student`], the role every
    /// account gets by default.
    pub fn from_stored(value: &str) -> Role {
        match value {
            "Student" => Role::Student,
            "Tutor" => Role::Tutor,
            "Admin" => Role::Admin,
            other => {
                tracing::warn!("Unrecognised stored role {:?}, treating as Student", other);
                Role::Student
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !is_valid_username(&self.username) {
            errors.add(
                "username",
                "Username must consist of @ followed by at least three alphanumericals",
            );
        }
        if self.first_name.trim().is_empty() {
            errors.add("first_name", "This field is required.");
        }
        if self.last_name.trim().is_empty() {
            errors.add("last_name", "This field is required.");
        }
        if !self.email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }
        errors.into_result(())
    }
}

pub fn is_valid_username(username: &str) -> bool {
    username.chars().count() <= USERNAME_MAX_LEN && USERNAME_PATTERN.is_match(username)
}
