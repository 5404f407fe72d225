use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ValidationError;

/// Minimum password length accepted by the login and registration forms.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Minimum trimmed display name length for registration.
pub const MIN_DISPLAY_NAME_LEN: usize = 2;
/// Registration emails must be longer than this many characters.
const MIN_REGISTER_EMAIL_LEN: usize = 3;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Builds a login request from raw form input.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the email is blank or the password is too short.
    pub fn new(email: &str, password: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.trim();
        let password = password.into();
        if email.is_empty() {
            return Err(ValidationError::Email);
        }
        check_password(&password)?;
        Ok(Self {
            email: email.to_string(),
            password,
        })
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

impl RegisterRequest {
    /// Builds a registration request from raw form input.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for a short email, password, or display name.
    pub fn new(
        email: &str,
        password: impl Into<String>,
        display_name: &str,
    ) -> Result<Self, ValidationError> {
        let email = email.trim();
        let display_name = display_name.trim();
        let password = password.into();

        if email.chars().count() <= MIN_REGISTER_EMAIL_LEN {
            return Err(ValidationError::Email);
        }
        check_password(&password)?;
        if display_name.chars().count() < MIN_DISPLAY_NAME_LEN {
            return Err(ValidationError::DisplayName {
                min: MIN_DISPLAY_NAME_LEN,
            });
        }

        Ok(Self {
            email: email.to_string(),
            password,
            display_name: display_name.to_string(),
        })
    }
}

fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::Password {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Response of the login and registration endpoints.
///
/// Deployments disagree on the field name, so both are read.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl AuthResponse {
    /// Reads the token fields from an arbitrary payload.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            token: field("token"),
            access_token: field("access_token"),
        }
    }

    /// The issued token, `token` before `access_token`, ignoring empty values.
    #[must_use]
    pub fn into_token(self) -> Option<String> {
        self.token
            .filter(|token| !token.is_empty())
            .or_else(|| self.access_token.filter(|token| !token.is_empty()))
    }
}
