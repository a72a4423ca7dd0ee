//! Authentication primitives: signup details and login credentials.
//!
//! Inbound adapters hand raw strings to these constructors before talking to
//! [`crate::domain::AccountService`], so services only ever see validated
//! values. Passwords are held in [`Zeroizing`] buffers.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, UserValidationError};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 6;

/// Reasons an authentication payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// A required field was missing or blank.
    MissingField { field: &'static str },
    /// The password is shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// The email could not be parsed.
    InvalidEmail,
}

impl AuthValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } => field,
            Self::PasswordTooShort { .. } => "password",
            Self::InvalidEmail => "email",
        }
    }

    /// Stable machine-readable code for error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "{field} is required"),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::InvalidEmail => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, AuthValidationError> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .ok_or(AuthValidationError::MissingField { field })
}

fn parse_email(raw: &str) -> Result<EmailAddress, AuthValidationError> {
    EmailAddress::new(raw).map_err(|err| match err {
        UserValidationError::EmptyEmail => AuthValidationError::MissingField { field: "email" },
        _ => AuthValidationError::InvalidEmail,
    })
}

/// Validated signup request.
///
/// # Examples
/// ```
/// use assistant_backend::domain::SignupDetails;
///
/// let details = SignupDetails::try_from_parts(Some("Ada"), Some("ada@example.com"), Some("secret1"))
///     .expect("valid signup");
/// assert_eq!(details.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone)]
pub struct SignupDetails {
    name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl SignupDetails {
    /// Validate raw signup fields.
    ///
    /// Fields are checked in order `name`, `email`, `password`.
    pub fn try_from_parts(
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, AuthValidationError> {
        let name = required(name, "name")?;
        let email = required(email, "email")?;
        let password = required(password, "password")?;

        if password.chars().count() < PASSWORD_MIN {
            return Err(AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        Ok(Self {
            name: DisplayName::new(name)
                .map_err(|_| AuthValidationError::MissingField { field: "name" })?,
            email: parse_email(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated signin request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw signin fields. The password keeps caller whitespace.
    pub fn try_from_parts(
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, AuthValidationError> {
        let email = required(email, "email")?;
        let password = password
            .filter(|raw| !raw.is_empty())
            .ok_or(AuthValidationError::MissingField { field: "password" })?;
        Ok(Self {
            email: parse_email(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
