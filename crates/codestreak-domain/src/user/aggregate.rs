use chrono::{DateTime, Utc};

use super::value_objects::ExternalHandle;
use crate::shared::{DomainError, UserId};

/// Directory entry for a person who receives reminders.
///
/// Identity (registration, login) lives elsewhere; this aggregate only carries
/// what the reminder engine reads plus the linked platform handle.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    email: String,
    username: String,
    external_handle: Option<ExternalHandle>,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, username: String) -> Result<Self, DomainError> {
        let email = email.trim().to_string();
        let username = username.trim().to_string();

        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation(format!(
                "Invalid email address: '{}'",
                email
            )));
        }

        if username.is_empty() {
            return Err(DomainError::Validation(
                "Username cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id: UserId::new(),
            email,
            username,
            external_handle: None,
            created_at: Utc::now(),
        })
    }

    pub fn restore(
        id: UserId,
        email: String,
        username: String,
        external_handle: Option<ExternalHandle>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            username,
            external_handle,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn external_handle(&self) -> Option<&ExternalHandle> {
        self.external_handle.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn has_linked_handle(&self) -> bool {
        self.external_handle.is_some()
    }

    pub fn link_handle(&mut self, handle: ExternalHandle) {
        self.external_handle = Some(handle);
    }

    /// Returns the handle that was linked, if any
    pub fn unlink_handle(&mut self) -> Option<ExternalHandle> {
        self.external_handle.take()
    }
}
