//! Process-local account and history store.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. Data is lost on restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    HistoryPersistenceError, HistoryRepository, StoredCredentials, UserPersistenceError,
    UserRepository,
};
use crate::domain::{AssistantProfileUpdate, EmailAddress, User, UserId};

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password_hash: String,
    history: Vec<String>,
}

impl Account {
    fn snapshot(&self) -> User {
        self.user.clone().with_history(self.history.clone())
    }
}

/// Mutex-guarded map implementing both [`UserRepository`] and
/// [`HistoryRepository`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    accounts: Mutex<HashMap<UserId, Account>>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> Result<MutexGuard<'_, HashMap<UserId, Account>>, UserPersistenceError> {
        self.accounts
            .lock()
            .map_err(|_| UserPersistenceError::query(POISONED))
    }

    fn histories(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<UserId, Account>>, HistoryPersistenceError> {
        self.accounts
            .lock()
            .map_err(|_| HistoryPersistenceError::query(POISONED))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut accounts = self.users()?;
        if accounts
            .values()
            .any(|account| account.user.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        accounts.insert(
            *user.id(),
            Account {
                user: user.clone().with_history(Vec::new()),
                password_hash: password_hash.to_owned(),
                history: user.history().to_vec(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users()?.get(id).map(Account::snapshot))
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .users()?
            .values()
            .find(|account| account.user.email() == email)
            .map(|account| StoredCredentials {
                user: account.snapshot(),
                password_hash: account.password_hash.clone(),
            }))
    }

    async fn email_exists(&self, lookup_key: &str) -> Result<bool, UserPersistenceError> {
        Ok(self
            .users()?
            .values()
            .any(|account| account.user.email().as_ref().to_lowercase() == lookup_key))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &AssistantProfileUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut accounts = self.users()?;
        Ok(accounts.get_mut(id).map(|account| {
            account.user.apply(update.clone(), updated_at);
            account.snapshot()
        }))
    }
}

#[async_trait]
impl HistoryRepository for InMemoryStore {
    async fn append(
        &self,
        user_id: &UserId,
        command: &str,
        limit: usize,
    ) -> Result<bool, HistoryPersistenceError> {
        let mut accounts = self.histories()?;
        let Some(account) = accounts.get_mut(user_id) else {
            return Ok(false);
        };
        account.history.push(command.to_owned());
        let overflow = account.history.len().saturating_sub(limit.max(1));
        account.history.drain(..overflow);
        Ok(true)
    }

    async fn list(&self, user_id: &UserId) -> Result<Option<Vec<String>>, HistoryPersistenceError> {
        Ok(self
            .histories()?
            .get(user_id)
            .map(|account| account.history.clone()))
    }

    async fn clear(&self, user_id: &UserId) -> Result<bool, HistoryPersistenceError> {
        let mut accounts = self.histories()?;
        let Some(account) = accounts.get_mut(user_id) else {
            return Ok(false);
        };
        account.history.clear();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssistantName, DisplayName};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0)
            .single()
            .expect("valid time")
    }

    #[fixture]
    fn user() -> User {
        User::register(
            DisplayName::new("Ada").expect("name"),
            EmailAddress::new("Ada@Example.com").expect("email"),
            now(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected(user: User) {
        let store = InMemoryStore::new();
        store.create(&user, "hash").await.expect("first insert");
        let twin = User::register(
            DisplayName::new("Other").expect("name"),
            user.email().clone(),
            now(),
        );

        let err = store.create(&twin, "hash").await.expect_err("duplicate");
        assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn email_lookup_ignores_case(user: User) {
        let store = InMemoryStore::new();
        store.create(&user, "hash").await.expect("insert");

        assert!(store.email_exists("ada@example.com").await.expect("lookup"));
        assert!(!store.email_exists("bob@example.com").await.expect("lookup"));
    }

    #[rstest]
    #[tokio::test]
    async fn history_is_capped_oldest_first(user: User) {
        let store = InMemoryStore::new();
        store.create(&user, "hash").await.expect("insert");

        for command in ["one", "two", "three"] {
            assert!(store.append(user.id(), command, 2).await.expect("append"));
        }

        let history = store.list(user.id()).await.expect("list");
        assert_eq!(history, Some(vec!["two".to_owned(), "three".to_owned()]));
        let profile = store.find_by_id(user.id()).await.expect("find").expect("user");
        assert_eq!(profile.history(), ["two".to_owned(), "three".to_owned()]);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_users_report_absence() {
        let store = InMemoryStore::new();
        let id = UserId::random();

        assert!(!store.append(&id, "hello", 10).await.expect("append"));
        assert!(!store.clear(&id).await.expect("clear"));
        assert_eq!(store.list(&id).await.expect("list"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn update_profile_keeps_unspecified_fields(user: User) {
        let store = InMemoryStore::new();
        store.create(&user, "hash").await.expect("insert");
        let update = AssistantProfileUpdate {
            assistant_name: Some(AssistantName::new("Jarvis").expect("name")),
            assistant_image: None,
        };

        let updated = store
            .update_profile(user.id(), &update, now())
            .await
            .expect("update")
            .expect("user exists");

        assert_eq!(
            updated.assistant_name().map(ToString::to_string).as_deref(),
            Some("Jarvis")
        );
        assert!(updated.assistant_image().is_none());
        let credentials = store
            .find_credentials(user.email())
            .await
            .expect("lookup")
            .expect("credentials");
        assert_eq!(credentials.password_hash, "hash");
    }
}
