use std::sync::Arc;

use http::{
    HeaderMap, HeaderName, HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use shared::config::Config;
use shared::models::{
    AppListQuery, AppPayload, AppRecord, AuthResponse, LoginRequest, RegisterRequest, UserProfile,
    app_list_from_value, error_message,
};

use crate::error::ClientError;
use crate::token_store::TokenStore;

/// Per-call options for [`AppStoreClient::request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP verb; `GET` by default.
    pub method: Method,
    /// JSON body. `None` and `Some(Value::Null)` both send no body.
    pub body: Option<Value>,
    /// Query pairs; absent or empty values are left out of the URL.
    pub query: Vec<(String, Option<String>)>,
    /// Attach the stored token as a bearer credential.
    pub requires_auth: bool,
    /// Extra headers. A bearer credential added by `requires_auth` wins over these.
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            query: Vec::new(),
            requires_auth: true,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    /// Returns [`ClientError::Encode`] if `body` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    #[must_use]
    pub fn query<K: Into<String>>(
        mut self,
        pairs: impl IntoIterator<Item = (K, Option<String>)>,
    ) -> Self {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value)));
        self
    }

    /// Sends the request without credentials regardless of stored state.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// HTTP client for the App Store backend.
#[derive(Clone, Debug)]
pub struct AppStoreClient {
    base_url: String,
    client: Client,
    tokens: Arc<dyn TokenStore>,
}

impl AppStoreClient {
    /// Create a new API client with the provided base URL.
    ///
    /// An empty base URL issues same-origin requests.
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            tokens,
        }
    }

    /// Create a client from validated configuration.
    pub fn from_config(config: &Config, tokens: Arc<dyn TokenStore>) -> Self {
        Self::new(&resolve_base(config), tokens)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token store this client reads credentials from.
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Perform a request and return the parsed response body.
    ///
    /// Empty bodies parse to `Value::Null`; bodies that are not JSON come back
    /// as `{"raw": "<text>"}`.
    ///
    /// # Errors
    /// [`ClientError::Transport`] when no response arrives and
    /// [`ClientError::Status`] for any non-2xx status.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ClientError> {
        let RequestOptions {
            method,
            body,
            query,
            requires_auth,
            headers: extra_headers,
        } = options;

        let url = build_url(&self.base_url, path, &query);
        let body = match body {
            None | Some(Value::Null) => None,
            Some(body) => Some(serde_json::to_vec(&body)?),
        };

        let mut headers = HeaderMap::new();
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.extend(extra_headers);
        if requires_auth {
            if let Some(token) = self.tokens.get() {
                match HeaderValue::from_str(&format!("Bearer {token}")) {
                    Ok(mut value) => {
                        value.set_sensitive(true);
                        headers.insert(AUTHORIZATION, value);
                    }
                    Err(_) => tracing::warn!("stored token is not a valid header value; sending without it"),
                }
            }
        }

        let mut builder = self.client.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.inspect_err(|err| {
            tracing::debug!(%method, path, error = %err, "api request failed to send");
        })?;
        let status = response.status();
        let text = response.text().await?;
        let payload = parse_payload(&text);

        tracing::debug!(%method, path, status = status.as_u16(), "api request completed");

        if !status.is_success() {
            let status = status.as_u16();
            return Err(ClientError::Status {
                status,
                message: failure_message(status, &text, &payload),
                payload,
            });
        }

        Ok(payload)
    }

    /// Health probe. Any 2xx is healthy.
    pub async fn health(&self) -> Result<Value, ClientError> {
        self.request("/", RequestOptions::get().anonymous()).await
    }

    /// List catalog entries.
    pub async fn list_apps(&self, query: &AppListQuery) -> Result<Vec<AppRecord>, ClientError> {
        let payload = self
            .request(
                "/apps",
                RequestOptions::get().query(query.pairs()).anonymous(),
            )
            .await?;
        Ok(app_list_from_value(&payload))
    }

    /// Fetch a single catalog entry.
    pub async fn get_app(&self, id: &str) -> Result<AppRecord, ClientError> {
        let payload = self
            .request(&app_path("/apps", id), RequestOptions::get().anonymous())
            .await?;
        Ok(AppRecord::from_value(&payload))
    }

    /// Authenticate with email/password credentials.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let options = RequestOptions::new(Method::POST)
            .json(credentials)?
            .anonymous();
        let payload = self.request("/auth/login", options).await?;
        Ok(AuthResponse::from_value(&payload))
    }

    /// Create an account.
    pub async fn register(
        &self,
        registration: &RegisterRequest,
    ) -> Result<AuthResponse, ClientError> {
        let options = RequestOptions::new(Method::POST)
            .json(registration)?
            .anonymous();
        let payload = self.request("/auth/register", options).await?;
        Ok(AuthResponse::from_value(&payload))
    }

    /// Retrieve the profile of the user the stored token belongs to.
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let payload = self.request("/me", RequestOptions::get()).await?;
        UserProfile::from_value(&payload).ok_or_else(|| {
            ClientError::Contract("The API returned an unexpected profile payload.".to_string())
        })
    }

    /// Every catalog entry, including unpublished ones.
    pub async fn admin_list_apps(&self) -> Result<Vec<AppRecord>, ClientError> {
        let payload = self.request("/admin/apps", RequestOptions::get()).await?;
        Ok(app_list_from_value(&payload))
    }

    /// Create a catalog entry. Returns the stored record when the backend echoes one.
    pub async fn admin_create_app(
        &self,
        app: &AppPayload,
    ) -> Result<Option<AppRecord>, ClientError> {
        let options = RequestOptions::new(Method::POST).json(app)?;
        let payload = self.request("/admin/apps", options).await?;
        Ok(echoed_record(&payload))
    }

    /// Replace a catalog entry. Returns the stored record when the backend echoes one.
    pub async fn admin_update_app(
        &self,
        id: &str,
        app: &AppPayload,
    ) -> Result<Option<AppRecord>, ClientError> {
        let options = RequestOptions::new(Method::PUT).json(app)?;
        let payload = self.request(&app_path("/admin/apps", id), options).await?;
        Ok(echoed_record(&payload))
    }

    /// Remove a catalog entry. The response body is ignored.
    pub async fn admin_delete_app(&self, id: &str) -> Result<(), ClientError> {
        self.request(
            &app_path("/admin/apps", id),
            RequestOptions::new(Method::DELETE),
        )
        .await?;
        Ok(())
    }
}

fn resolve_base(config: &Config) -> String {
    let base = config.api_base();
    #[cfg(target_arch = "wasm32")]
    if base.is_empty() {
        if let Some(origin) = web_sys::window().and_then(|window| window.location().origin().ok()) {
            return origin;
        }
    }
    base
}

fn app_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}", urlencoding::encode(id))
}

fn echoed_record(payload: &Value) -> Option<AppRecord> {
    payload.is_object().then(|| AppRecord::from_value(payload))
}

/// Joins base, path, and the non-empty query pairs into a request URL.
pub(crate) fn build_url(base: &str, path: &str, query: &[(String, Option<String>)]) -> String {
    let base = base.trim_end_matches('/');
    let mut url = if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    };

    let encoded = query
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|value| !value.is_empty())
                .map(|value| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        })
        .collect::<Vec<_>>();

    if !encoded.is_empty() {
        url.push('?');
        url.push_str(&encoded.join("&"));
    }
    url
}

/// Parses a response body, never failing.
pub(crate) fn parse_payload(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

/// Message for a non-success response. A body that is not JSON counts as a
/// string payload; a JSON object is only read for `detail` and `message`.
pub(crate) fn failure_message(status: u16, text: &str, payload: &Value) -> String {
    if !text.is_empty() && serde_json::from_str::<Value>(text).is_err() {
        return error_message(status, &Value::String(text.to_string()));
    }
    error_message(status, payload)
}
