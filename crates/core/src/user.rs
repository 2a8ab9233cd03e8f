//! User account snapshot and DTOs.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// A stored user account.
///
/// Carries the password hash, so it is deliberately not `Serialize`.
/// Use [`PublicUser`] for anything that leaves the process.
#[derive(Debug, Clone)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

impl User {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Safe user representation for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: DbId,
    pub username: String,
    pub email: String,
}

/// Request body for registration.
///
/// Missing fields deserialize as empty strings so they surface as a
/// validation error rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Insert DTO handed to the identity store. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
