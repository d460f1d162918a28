//! Explicit session context.
//!
//! The logged-in user is carried in a [`Session`] value handed to whatever
//! needs it. Nothing reads ambient global state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::listings::ListingId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: ListingId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("login required")]
    NotLoggedIn,
    #[error("user '{0}' is not an administrator")]
    NotAdmin(String),
}

/// Who is using the current page visit, if anyone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn logged_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }

    /// Gate for listing management actions.
    ///
    /// # Errors
    ///
    /// [`AccessError::NotLoggedIn`] without a user, [`AccessError::NotAdmin`]
    /// when the user lacks the admin role.
    pub fn require_admin(&self) -> Result<&User, AccessError> {
        let user = self.user.as_ref().ok_or(AccessError::NotLoggedIn)?;
        if user.role == Role::Admin {
            Ok(user)
        } else {
            Err(AccessError::NotAdmin(user.name.clone()))
        }
    }
}
