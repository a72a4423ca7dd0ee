//! Account lifecycle: signup, signin, profile reads and assistant updates.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    MediaStore, MediaStoreError, MediaUpload, PasswordHashError, PasswordHasher,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AssistantImage, AssistantName, AssistantProfileUpdate, EmailAddress, Error, LoginCredentials,
    SignupDetails, User, UserId,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => email_taken(),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn email_taken() -> Error {
    Error::invalid_request("Email already exists")
}

/// Where a new assistant image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantImageSource {
    /// A URL the client already hosts.
    Url(AssistantImage),
    /// A file spooled locally that must be uploaded first.
    Upload(MediaUpload),
}

/// Requested assistant changes before any upload happens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssistantUpdateRequest {
    pub assistant_name: Option<AssistantName>,
    pub image: Option<AssistantImageSource>,
}

/// Account service orchestrating repositories, hashing and media uploads.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    media: Arc<dyn MediaStore>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        media: Arc<dyn MediaStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            media,
            clock,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    /// `invalid_request` "Email already exists" when the address is taken.
    pub async fn signup(&self, details: SignupDetails) -> Result<User, Error> {
        let existing = self
            .users
            .find_credentials(details.email())
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            return Err(email_taken());
        }

        let hash = self
            .hasher
            .hash(details.password())
            .await
            .map_err(map_hash_error)?;
        let user = User::register(
            details.name().clone(),
            details.email().clone(),
            self.clock.utc(),
        );
        self.users
            .create(&user, &hash)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), "account created");
        Ok(user)
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    /// `invalid_request` "Email does not exist" or "Incorrect password".
    pub async fn signin(&self, credentials: LoginCredentials) -> Result<User, Error> {
        let stored = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::invalid_request("Email does not exist"))?;

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::invalid_request("Incorrect password"));
        }
        Ok(stored.user)
    }

    /// Whether an account uses the given address, ignoring case.
    ///
    /// # Errors
    /// `invalid_request` "Email is required" when the input is blank.
    pub async fn email_exists(&self, raw: &str) -> Result<bool, Error> {
        let key = EmailAddress::lookup_key(raw)
            .ok_or_else(|| Error::invalid_request("Email is required"))?;
        self.users.email_exists(&key).await.map_err(map_user_error)
    }

    /// Profile of the signed-in user.
    ///
    /// # Errors
    /// `not_found` "User not found" when the account no longer exists.
    pub async fn current(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Change the assistant name and/or image.
    ///
    /// The caller owns any spooled upload file and removes it afterwards.
    ///
    /// # Errors
    /// `invalid_request` when nothing was supplied, `internal_error` when the
    /// upload fails, `not_found` when the account no longer exists.
    pub async fn update_assistant(
        &self,
        id: &UserId,
        request: AssistantUpdateRequest,
    ) -> Result<User, Error> {
        let assistant_image = match request.image {
            Some(AssistantImageSource::Url(image)) => Some(image),
            Some(AssistantImageSource::Upload(upload)) => Some(self.upload(&upload).await?),
            None => None,
        };
        let update = AssistantProfileUpdate {
            assistant_name: request.assistant_name,
            assistant_image,
        };
        if update.is_empty() {
            return Err(Error::invalid_request(
                "No assistantName or assistantImage provided",
            ));
        }

        self.users
            .update_profile(id, &update, self.clock.utc())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    async fn upload(&self, upload: &MediaUpload) -> Result<AssistantImage, Error> {
        let asset = self.media.upload(upload).await.map_err(|error| {
            warn!(%error, "assistant image upload failed");
            match error {
                MediaStoreError::MissingUrl => {
                    Error::internal("Media host did not return a usable image URL")
                }
                other => Error::internal(format!("Failed to upload image: {other}")),
            }
        })?;
        AssistantImage::new(&asset.secure_url)
            .map_err(|_| Error::internal("Media host did not return a usable image URL"))
    }
}
