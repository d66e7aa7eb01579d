/// User model
///
/// This module provides the User record and the input types used to create,
/// replace and partially update it. Persistence lives behind the
/// [`UserRepository`](crate::repository::UserRepository) trait.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255),
///     email VARCHAR(255),
///     phone VARCHAR(64),
///     is_active BOOLEAN
/// );
/// ```
///
/// # JSON
///
/// Fields are serialized in camelCase, so `is_active` travels as `isActive`:
///
/// ```json
/// { "id": 7, "name": "Ann", "email": "ann@x.com", "phone": "555", "isActive": false }
/// ```

use serde::{Deserialize, Serialize};

/// User record as stored in the `users` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned ID, never changes after creation
    pub id: i64,

    /// Optional display name
    pub name: Option<String>,

    /// Email address
    ///
    /// Logically unique, but not enforced by a constraint
    pub email: Option<String>,

    /// Optional phone number
    pub phone: Option<String>,

    /// Active flag
    ///
    /// `None` until set explicitly. A `None` row matches neither the active
    /// nor the inactive filters.
    pub is_active: Option<bool>,
}

/// Input for creating a user, or fully replacing an existing one
///
/// Every field is optional and missing JSON keys become `None`. An `id` key
/// in the body is ignored; the store or the request path decides the ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,

    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Active flag
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl NewUser {
    /// Attaches an ID, producing the full record to persist
    pub fn with_id(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            is_active: self.is_active,
        }
    }
}

/// Partial update for an existing user
///
/// Only `Some` fields are written; everything else keeps its stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// New display name
    pub name: Option<String>,

    /// New email address
    pub email: Option<String>,

    /// New phone number
    pub phone: Option<String>,

    /// New active flag
    pub is_active: Option<bool>,
}

impl UserPatch {
    /// Patch that only sets the active flag
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }

    /// Patch that only sets the name
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Patch that only sets the email
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    /// Patch that only sets the phone number
    pub fn phone(phone: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            ..Default::default()
        }
    }

    /// Writes the patched fields into `user`
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = Some(name);
        }
        if let Some(email) = self.email {
            user.email = Some(email);
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
        if let Some(is_active) = self.is_active {
            user.is_active = Some(is_active);
        }
    }
}
