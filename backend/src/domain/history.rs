//! Per-user command history.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{HistoryPersistenceError, HistoryRepository};
use crate::domain::{Error, UserId};

/// Default number of entries kept per user.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

pub(crate) fn map_history_error(error: HistoryPersistenceError) -> Error {
    match error {
        HistoryPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("history store unavailable: {message}"))
        }
        HistoryPersistenceError::Query { message } => {
            Error::internal(format!("history store error: {message}"))
        }
    }
}

fn user_not_found() -> Error {
    Error::not_found("User not found")
}

/// Records and reads command history.
///
/// ## Invariants
/// - At most `limit` entries are retained; the oldest go first.
/// - Reads are latest-first; writes keep arrival order.
#[derive(Clone)]
pub struct HistoryService {
    repo: Arc<dyn HistoryRepository>,
    limit: usize,
}

impl HistoryService {
    /// Create a service retaining at most `limit` entries (minimum one).
    pub fn new(repo: Arc<dyn HistoryRepository>, limit: usize) -> Self {
        Self {
            repo,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Append `command` to the user's log exactly as given.
    ///
    /// # Errors
    /// `invalid_request` for a blank command, `not_found` for an unknown user,
    /// and storage failures otherwise.
    pub async fn record(&self, user_id: &UserId, command: &str) -> Result<(), Error> {
        if command.trim().is_empty() {
            return Err(Error::invalid_request("command is required"));
        }
        let found = self
            .repo
            .append(user_id, command, self.limit)
            .await
            .map_err(map_history_error)?;
        if !found {
            return Err(user_not_found());
        }
        debug!(user_id = %user_id, "recorded command");
        Ok(())
    }

    /// History, most recent first.
    ///
    /// # Errors
    /// `not_found` for an unknown user, and storage failures otherwise.
    pub async fn latest_first(&self, user_id: &UserId) -> Result<Vec<String>, Error> {
        let mut entries = self
            .repo
            .list(user_id)
            .await
            .map_err(map_history_error)?
            .ok_or_else(user_not_found)?;
        entries.reverse();
        Ok(entries)
    }

    /// Remove every entry for the user.
    ///
    /// # Errors
    /// `not_found` for an unknown user, and storage failures otherwise.
    pub async fn clear(&self, user_id: &UserId) -> Result<(), Error> {
        let found = self
            .repo
            .clear(user_id)
            .await
            .map_err(map_history_error)?;
        if found { Ok(()) } else { Err(user_not_found()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockHistoryRepository;
    use mockall::predicate::{always, eq};
    use rstest::rstest;

    fn service(repo: MockHistoryRepository, limit: usize) -> HistoryService {
        HistoryService::new(Arc::new(repo), limit)
    }

    #[rstest]
    #[tokio::test]
    async fn record_stores_verbatim_and_passes_limit() {
        let user_id = UserId::random();
        let mut repo = MockHistoryRepository::new();
        repo.expect_append()
            .with(eq(user_id), eq("  Turn on lights "), eq(5_usize))
            .times(1)
            .return_once(|_, _, _| Ok(true));

        service(repo, 5)
            .record(&user_id, "  Turn on lights ")
            .await
            .expect("record succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn record_rejects_blank_commands() {
        let mut repo = MockHistoryRepository::new();
        repo.expect_append().never();
        let err = service(repo, 5)
            .record(&UserId::random(), "   ")
            .await
            .expect_err("blank command");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut repo = MockHistoryRepository::new();
        repo.expect_append()
            .with(always(), always(), always())
            .return_once(|_, _, _| Ok(false));
        let err = service(repo, 5)
            .record(&UserId::random(), "hello")
            .await
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "User not found");
    }

    #[rstest]
    #[tokio::test]
    async fn latest_first_reverses_storage_order() {
        let mut repo = MockHistoryRepository::new();
        repo.expect_list()
            .return_once(|_| Ok(Some(vec!["first".into(), "second".into()])));
        let history = service(repo, 5)
            .latest_first(&UserId::random())
            .await
            .expect("history");
        assert_eq!(history, vec!["second".to_owned(), "first".to_owned()]);
    }

    #[rstest]
    #[case(HistoryPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(HistoryPersistenceError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn storage_errors_map_to_domain_codes(
        #[case] failure: HistoryPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockHistoryRepository::new();
        repo.expect_clear().return_once(move |_| Err(failure));
        let err = service(repo, 5)
            .clear(&UserId::random())
            .await
            .expect_err("storage failure");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    fn limit_never_drops_below_one() {
        assert_eq!(service(MockHistoryRepository::new(), 0).limit(), 1);
    }
}
