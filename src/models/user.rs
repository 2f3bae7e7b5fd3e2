// src/models/user.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+@\S+$").unwrap());

/// A registered account record, stored under the 'users' key.
///
/// The password is kept verbatim; this is demo data in a demo store, not a
/// credential system. Handlers must never serialize an `Identity` into a
/// response; use `PublicUser` for that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,

    /// Unique key across the credential store.
    pub email: String,

    pub password: String,
}

/// DTO for sending account data to clients (excludes the password).
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&Identity> for PublicUser {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
        }
    }
}

/// DTO for registration. The captcha pair is echoed back by the client: the
/// challenge it was shown plus what the user typed.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(regex(path = *EMAIL_RE, message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub captcha_challenge: String,
    pub captcha_answer: String,
}

/// DTO for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}
