//! User account model.
//!
//! A [`User`] is the public profile of an account: identity, display name,
//! assistant customisation and the chronological command history. The
//! password hash never leaves the persistence layer inside this type.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    InvalidEmail,
    EmptyDisplayName,
    EmptyAssistantName,
    EmptyAssistantImage,
    BlobAssistantImage,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must contain a single @ and no spaces"),
            Self::EmptyDisplayName => write!(f, "name must not be empty"),
            Self::EmptyAssistantName => write!(f, "assistant name must not be empty"),
            Self::EmptyAssistantImage => write!(f, "assistant image must not be empty"),
            Self::BlobAssistantImage => write!(
                f,
                "Invalid image URL: received a client-side blob URL. Upload the actual file \
                 (multipart/form-data) using the field name \"assistantImage\".",
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its hyphenated string form.
    ///
    /// # Examples
    /// ```
    /// use assistant_backend::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim().is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, typically read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account email address.
///
/// Stored exactly as supplied once surrounding whitespace is removed; lookups
/// are exact matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let well_formed = trimmed.matches('@').count() == 1
            && !trimmed.starts_with('@')
            && !trimmed.ends_with('@')
            && !trimmed.chars().any(char::is_whitespace);
        if !well_formed {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Lookup key used by the email availability probe.
    pub fn lookup_key(raw: &str) -> Option<String> {
        let key = raw.trim().to_lowercase();
        (!key.is_empty()).then_some(key)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! trimmed_text {
    ($(#[$meta:meta])* $name:ident, $empty:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the value, trimming surrounding whitespace.
            pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(UserValidationError::$empty);
                }
                Ok(Self(trimmed.to_owned()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

trimmed_text!(
    /// Name the account holder signed up with.
    DisplayName,
    EmptyDisplayName
);

trimmed_text!(
    /// Name the user gave their assistant; doubles as the wake word.
    AssistantName,
    EmptyAssistantName
);

/// Public URL of the assistant avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantImage(String);

impl AssistantImage {
    /// Validate an avatar URL, rejecting browser-local `blob:` previews.
    ///
    /// # Examples
    /// ```
    /// use assistant_backend::domain::AssistantImage;
    ///
    /// assert!(AssistantImage::new("blob:http://localhost/abc").is_err());
    /// assert!(AssistantImage::new("https://cdn.example/a.png").is_ok());
    /// ```
    pub fn new(url: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = url.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyAssistantImage);
        }
        if trimmed.starts_with("blob:") {
            return Err(UserValidationError::BlobAssistantImage);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for AssistantImage {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Fields changed by a profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssistantProfileUpdate {
    pub assistant_name: Option<AssistantName>,
    pub assistant_image: Option<AssistantImage>,
}

impl AssistantProfileUpdate {
    /// True when the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.assistant_name.is_none() && self.assistant_image.is_none()
    }
}

/// Public user profile.
///
/// ## Invariants
/// - `history` is kept in chronological order (oldest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: DisplayName,
    email: EmailAddress,
    assistant_name: Option<AssistantName>,
    assistant_image: Option<AssistantImage>,
    history: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Raw parts used to rebuild a [`User`] from storage.
#[derive(Debug, Clone)]
pub struct UserParts {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub assistant_name: Option<AssistantName>,
    pub assistant_image: Option<AssistantImage>,
    pub history: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserParts> for User {
    fn from(parts: UserParts) -> Self {
        Self {
            id: parts.id,
            name: parts.name,
            email: parts.email,
            assistant_name: parts.assistant_name,
            assistant_image: parts.assistant_image,
            history: parts.history,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        }
    }
}

impl User {
    /// Create a fresh account with no assistant customisation or history.
    pub fn register(name: DisplayName, email: EmailAddress, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::random(),
            name,
            email,
            assistant_name: None,
            assistant_image: None,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn assistant_name(&self) -> Option<&AssistantName> {
        self.assistant_name.as_ref()
    }

    pub fn assistant_image(&self) -> Option<&AssistantImage> {
        self.assistant_image.as_ref()
    }

    /// Command history in the order it was recorded.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply the supplied profile fields, bumping `updated_at`.
    pub fn apply(&mut self, update: AssistantProfileUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.assistant_name {
            self.assistant_name = Some(name);
        }
        if let Some(image) = update.assistant_image {
            self.assistant_image = Some(image);
        }
        self.updated_at = now;
    }

    /// Replace the history wholesale. Used by adapters that load it lazily.
    #[must_use]
    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    fn user_id_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    #[case("  alice@example.com ", Ok("alice@example.com"))]
    #[case("Alice@Example.com", Ok("Alice@Example.com"))]
    #[case("   ", Err(UserValidationError::EmptyEmail))]
    #[case("alice", Err(UserValidationError::InvalidEmail))]
    #[case("al ice@example.com", Err(UserValidationError::InvalidEmail))]
    #[case("@example.com", Err(UserValidationError::InvalidEmail))]
    fn email_validation(
        #[case] raw: &str,
        #[case] expected: Result<&str, UserValidationError>,
    ) {
        let actual = EmailAddress::new(raw).map(|email| email.to_string());
        assert_eq!(actual, expected.map(str::to_owned));
    }

    #[rstest]
    #[case("  Bob@Example.COM ", Some("bob@example.com"))]
    #[case("   ", None)]
    fn lookup_key_normalises(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(EmailAddress::lookup_key(raw).as_deref(), expected);
    }

    #[rstest]
    fn assistant_image_rejects_blob_urls() {
        assert_eq!(
            AssistantImage::new("blob:http://localhost:5173/1234"),
            Err(UserValidationError::BlobAssistantImage)
        );
    }

    #[rstest]
    fn apply_changes_only_supplied_fields() {
        let created = DateTime::<Utc>::UNIX_EPOCH;
        let later = created + chrono::Duration::seconds(60);
        let mut user = User::register(
            DisplayName::new("Ada").expect("name"),
            EmailAddress::new("ada@example.com").expect("email"),
            created,
        );
        user.apply(
            AssistantProfileUpdate {
                assistant_name: Some(AssistantName::new(" Jarvis ").expect("assistant")),
                assistant_image: None,
            },
            later,
        );
        assert_eq!(
            user.assistant_name().map(ToString::to_string).as_deref(),
            Some("Jarvis")
        );
        assert!(user.assistant_image().is_none());
        assert_eq!(user.created_at(), created);
        assert_eq!(user.updated_at(), later);
    }
}
