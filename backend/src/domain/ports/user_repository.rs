//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AssistantProfileUpdate, EmailAddress, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already owns the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Account profile together with its stored password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `DuplicateEmail` when taken.
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError>;

    /// Fetch a profile (including history) by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the profile and password hash for an exact email match.
    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Whether any account's email equals `lookup_key` ignoring case.
    async fn email_exists(&self, lookup_key: &str) -> Result<bool, UserPersistenceError>;

    /// Apply a partial profile update and return the updated profile.
    ///
    /// Returns `None` when the account does not exist.
    async fn update_profile(
        &self,
        id: &UserId,
        update: &AssistantProfileUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;
}
