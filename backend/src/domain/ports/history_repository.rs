//! Port for the per-user command log.
use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by history adapters.
    pub enum HistoryPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "history repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "history repository query failed: {message}",
    }
}

/// Append-only command log keyed by user.
///
/// Adapters store entries in arrival order; callers reverse for display.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append `command`, then drop the oldest entries beyond `limit`.
    ///
    /// Returns `false` when the user does not exist.
    async fn append(
        &self,
        user_id: &UserId,
        command: &str,
        limit: usize,
    ) -> Result<bool, HistoryPersistenceError>;

    /// Entries oldest first, or `None` for an unknown user.
    async fn list(&self, user_id: &UserId) -> Result<Option<Vec<String>>, HistoryPersistenceError>;

    /// Remove every entry. Returns `false` when the user does not exist.
    async fn clear(&self, user_id: &UserId) -> Result<bool, HistoryPersistenceError>;
}
