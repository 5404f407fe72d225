use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::ValidationError;

/// Fallback shown when a record has no name.
pub const UNTITLED_APP: &str = "Untitled App";
/// Fallback shown when a record has neither summary nor description.
pub const NO_DESCRIPTION: &str = "No description provided.";
/// Fallback shown when a record names no author.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Minimum trimmed length of a catalog search query.
pub const MIN_SEARCH_LEN: usize = 2;

/// Canonical field of an [`AppRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppField {
    /// Stable identifier used in admin paths.
    Id,
    /// Display name.
    Name,
    /// One-line tagline.
    Summary,
    /// Long description.
    Description,
    /// Catalog category.
    Category,
    /// Version string.
    Version,
    /// Publisher or developer.
    Author,
    /// Where the app can be downloaded.
    DownloadUrl,
}

/// Backend keys accepted for each canonical field, highest priority first.
///
/// The backend contract is loosely typed and older deployments used different
/// names. Normalization happens once, here, so nothing downstream needs to know
/// about the alternatives.
pub const LEGACY_FIELD_NAMES: &[(AppField, &[&str])] = &[
    (AppField::Id, &["id", "app_id", "slug"]),
    (AppField::Name, &["name", "title"]),
    (AppField::Summary, &["summary"]),
    (AppField::Description, &["description"]),
    (AppField::Category, &["category", "genre"]),
    (AppField::Version, &["version"]),
    (AppField::Author, &["author", "publisher", "developer"]),
    (AppField::DownloadUrl, &["download_url", "downloadUrl", "url"]),
];

/// A catalog entry in its single internal shape.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl AppRecord {
    /// Normalizes a backend record through [`LEGACY_FIELD_NAMES`].
    ///
    /// Non-object values produce an empty record.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let mut record = Self::default();
        for (field, keys) in LEGACY_FIELD_NAMES {
            let resolved = first_present(map, keys);
            match field {
                AppField::Id => record.id = resolved,
                AppField::Name => record.name = resolved,
                AppField::Summary => record.summary = resolved,
                AppField::Description => record.description = resolved,
                AppField::Category => record.category = resolved,
                AppField::Version => record.version = resolved,
                AppField::Author => record.author = resolved,
                AppField::DownloadUrl => record.download_url = resolved,
            }
        }
        record
    }

    /// Title for lists and detail headers.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNTITLED_APP)
    }

    /// Short blurb for list rows: summary, then description.
    #[must_use]
    pub fn display_summary(&self) -> &str {
        self.summary
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or(NO_DESCRIPTION)
    }

    /// Long text for the detail view: description, then summary.
    #[must_use]
    pub fn display_description(&self) -> &str {
        self.description
            .as_deref()
            .or(self.summary.as_deref())
            .unwrap_or(NO_DESCRIPTION)
    }

    #[must_use]
    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or(UNKNOWN_AUTHOR)
    }
}

fn first_present(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
        .and_then(|value| match value {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        })
}

/// Extracts the record list from any of the list response shapes.
///
/// Accepts a bare array, `{ "items": [...] }`, or `{ "apps": [...] }`.
/// Anything else is treated as an empty catalog.
#[must_use]
pub fn app_list_from_value(value: &Value) -> Vec<AppRecord> {
    let items = match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => ["items", "apps"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    };

    items
        .map(|items| items.iter().map(AppRecord::from_value).collect())
        .unwrap_or_default()
}

/// Query parameters for `GET /apps`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AppListQuery {
    pub query: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl AppListQuery {
    /// Builds a search query, enforcing the minimum query length.
    ///
    /// # Errors
    /// Returns [`ValidationError::SearchQuery`] when the trimmed text is too short.
    pub fn search(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_SEARCH_LEN {
            return Err(ValidationError::SearchQuery {
                min: MIN_SEARCH_LEN,
            });
        }
        Ok(Self {
            query: Some(trimmed.to_string()),
            ..Self::default()
        })
    }

    /// Query pairs in wire order. Values may be empty; the request layer
    /// drops those.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("query", self.query.clone()),
            ("page", self.page.map(|page| page.to_string())),
            ("page_size", self.page_size.map(|size| size.to_string())),
        ]
    }
}

/// Raw admin form input for creating or editing a catalog entry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AppDraft {
    pub name: String,
    pub summary: String,
    pub description: String,
    pub category: String,
    pub version: String,
    pub download_url: String,
}

impl AppDraft {
    /// Pre-fills the form from an existing record.
    #[must_use]
    pub fn from_record(record: &AppRecord) -> Self {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name: field(&record.name),
            summary: field(&record.summary),
            description: field(&record.description),
            category: field(&record.category),
            version: field(&record.version),
            download_url: field(&record.download_url),
        }
    }

    /// Validates and trims the form into a request payload.
    ///
    /// # Errors
    /// [`ValidationError::AppName`] for a blank name and
    /// [`ValidationError::AppSummary`] when both summary and description are blank.
    pub fn validate(&self) -> Result<AppPayload, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::AppName);
        }
        if self.summary.trim().is_empty() && self.description.trim().is_empty() {
            return Err(ValidationError::AppSummary);
        }

        Ok(AppPayload {
            name: name.to_string(),
            summary: non_blank(&self.summary),
            description: non_blank(&self.description),
            category: non_blank(&self.category),
            version: non_blank(&self.version),
            download_url: non_blank(&self.download_url),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Body of `POST /admin/apps` and `PUT /admin/apps/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}
