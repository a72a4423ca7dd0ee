//! Request validation helpers producing `invalid_request` errors with
//! `{field, code}` details.

use serde_json::json;

use crate::domain::{AuthValidationError, Error, UserId, UserValidationError};

/// Validation error codes placed in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(name, ErrorCode::MissingField.as_str(), format!("{name} is required"))
}

pub(crate) fn invalid_value_error(field: FieldName, message: impl Into<String>) -> Error {
    field_error(field.as_str(), ErrorCode::InvalidValue.as_str(), message)
}

/// Trimmed, non-blank text or a missing-field error.
pub(crate) fn required_text(value: Option<&str>, field: FieldName) -> Result<String, Error> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| missing_field_error(field))
}

/// Parse a user id supplied by the client.
pub(crate) fn parse_user_id(value: Option<&str>, field: FieldName) -> Result<UserId, Error> {
    let raw = required_text(value, field)?;
    UserId::new(&raw).map_err(|_| {
        let name = field.as_str();
        Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
            "field": name,
            "value": raw,
            "code": ErrorCode::InvalidUuid.as_str(),
        }))
    })
}

/// Map signup/signin validation failures.
pub(crate) fn auth_validation_error(err: &AuthValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

/// Map profile field validation failures, keeping the domain message.
pub(crate) fn user_validation_error(field: FieldName, err: &UserValidationError) -> Error {
    invalid_value_error(field, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PASSWORD_MIN;
    use rstest::rstest;
    use serde_json::Value;

    const COMMAND: FieldName = FieldName::new("command");
    const USER_ID: FieldName = FieldName::new("userId");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn blank_text_is_missing(#[case] value: Option<&str>) {
        let err = required_text(value, COMMAND).expect_err("blank");
        assert_eq!(err.message(), "command is required");
        assert_eq!(detail(&err, "code"), Some("missing_field"));
    }

    #[rstest]
    fn text_is_trimmed() {
        assert_eq!(
            required_text(Some("  turn on lights "), COMMAND).expect("text"),
            "turn on lights"
        );
    }

    #[rstest]
    fn malformed_user_id_is_reported() {
        let err = parse_user_id(Some("abc"), USER_ID).expect_err("invalid");
        assert_eq!(detail(&err, "code"), Some("invalid_uuid"));
        assert_eq!(detail(&err, "value"), Some("abc"));
    }

    #[rstest]
    fn short_password_keeps_user_facing_message() {
        let err = auth_validation_error(&AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
        assert_eq!(err.message(), "Password must be at least 6 characters");
        assert_eq!(detail(&err, "field"), Some("password"));
    }
}
