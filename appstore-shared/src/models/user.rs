use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Label used when a profile carries neither a display name nor an email.
pub const SIGNED_IN_LABEL: &str = "Signed in";

/// The authenticated user's profile as returned by `GET /me`.
///
/// Only the identifying fields are typed; everything else the backend sends is
/// kept in [`UserProfile::extra`] untouched.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend identifier, stringified when numeric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The user's email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Human-friendly name chosen at registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Remaining profile fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Reads a profile from a `/me` payload.
    ///
    /// Returns `None` when the payload is not a JSON object.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let mut extra = map.clone();
        let mut take = |key: &str| {
            extra.remove(key).and_then(|value| match value {
                Value::String(text) => Some(text),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            })
        };

        let id = take("id");
        let email = take("email");
        let display_name = take("display_name");

        Some(Self {
            id,
            email,
            display_name,
            extra,
        })
    }

    /// Name to show in navigation: display name, then email.
    #[must_use]
    pub fn label(&self) -> &str {
        [self.display_name.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .unwrap_or(SIGNED_IN_LABEL)
    }
}
