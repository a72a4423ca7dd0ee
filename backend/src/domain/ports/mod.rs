//! Driven ports for the hexagonal boundary.
//!
//! Domain services depend only on these traits; adapters under
//! `crate::outbound` provide the implementations.

mod macros;
pub(crate) use macros::define_port_error;

mod history_repository;
mod intent_classifier;
mod media_store;
mod password_hasher;
mod user_repository;

#[cfg(test)]
pub use history_repository::MockHistoryRepository;
pub use history_repository::{HistoryPersistenceError, HistoryRepository};
#[cfg(test)]
pub use intent_classifier::MockIntentClassifier;
pub use intent_classifier::{IntentClassifier, IntentClassifierError};
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{MediaAsset, MediaStore, MediaStoreError, MediaUpload};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
