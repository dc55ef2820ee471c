//! HTTP implementation of [`RemoteCollectionClient`] for the tenant HR API.
//!
//! The credential is an explicit value handed to [`HttpCollectionClient::new`];
//! nothing here reads ambient login state.

pub mod tenant;

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::{ApiConfig, ConfigError};
use crate::pipeline::{EntityId, EntityKind, RemoteCollectionClient, RemoteError};

pub use tenant::{host_of, resolve_tenant, TenantResolution};

/// Authorization header prefix expected by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Token <key>`
    Token,
    /// `Authorization: Bearer <key>`
    Bearer,
}

impl AuthScheme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "token" => Some(Self::Token),
            "bearer" => Some(Self::Bearer),
            _ => None,
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Token => "Token",
            Self::Bearer => "Bearer",
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    scheme: AuthScheme,
    token: String,
}

impl Credential {
    pub fn new(scheme: AuthScheme, token: impl Into<String>) -> Self {
        Self {
            scheme,
            token: token.into(),
        }
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn header_value(&self) -> Result<HeaderValue, RemoteError> {
        let mut value = HeaderValue::from_str(&format!("{} {}", self.scheme.prefix(), self.token))
            .map_err(|err| RemoteError::Transport(format!("invalid credential header: {err}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("scheme", &self.scheme)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Organization served by the API host the client points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantInfo {
    pub name: String,
    pub schema_name: String,
}

#[derive(Debug, Clone)]
pub struct HttpCollectionClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCollectionClient {
    pub fn new(
        base_url: impl Into<String>,
        credential: &Credential,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, credential.header_value()?);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| RemoteError::Transport(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, crate::error::AppError> {
        let token = config.token.as_deref().ok_or(ConfigError::MissingToken)?;
        let credential = Credential::new(config.auth_scheme, token);
        Ok(Self::new(&config.base_url, &credential, config.timeout)?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/{}/", self.base_url, kind.collection_path())
    }

    fn record_url(&self, kind: EntityKind, id: EntityId) -> String {
        format!("{}/{}/{}/", self.base_url, kind.collection_path(), id)
    }

    /// `GET <base>/tenant/`
    pub async fn tenant_info(&self) -> Result<TenantInfo, RemoteError> {
        let url = format!("{}/tenant/", self.base_url);
        let body = send(self.http.get(url)).await?;
        serde_json::from_value(body).map_err(|err| RemoteError::Decode(err.to_string()))
    }
}

/// One list response: a bare array, or a paginated envelope with `results` and `next`.
struct ListPage {
    results: Vec<Value>,
    next: Option<String>,
}

impl ListPage {
    fn from_body(kind: EntityKind, body: Value) -> Result<Self, RemoteError> {
        let not_a_list = || RemoteError::Decode(format!("{kind} list response is not an array"));
        match body {
            Value::Array(results) => Ok(Self {
                results,
                next: None,
            }),
            Value::Object(mut envelope) => {
                let results = match envelope.remove("results") {
                    Some(Value::Array(results)) => results,
                    _ => return Err(not_a_list()),
                };
                let next = match envelope.remove("next") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(next)) if !next.is_empty() => Some(next),
                    Some(_) => {
                        return Err(RemoteError::Decode(format!(
                            "{kind} list response has an invalid `next` link"
                        )))
                    }
                };
                Ok(Self { results, next })
            }
            _ => Err(not_a_list()),
        }
    }
}

#[async_trait]
impl RemoteCollectionClient for HttpCollectionClient {
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Value>, RemoteError> {
        let mut records = Vec::new();
        let mut visited = HashSet::new();
        let mut url = self.collection_url(kind);

        loop {
            let body = send(self.http.get(url.as_str())).await?;
            let page = ListPage::from_body(kind, body)?;
            records.extend(page.results);
            let Some(next) = page.next else {
                return Ok(records);
            };
            visited.insert(url);
            if visited.contains(&next) {
                return Err(RemoteError::Decode(format!(
                    "{kind} list pagination loops back to {next}"
                )));
            }
            debug!(%kind, next = %next, fetched = records.len(), "following list page");
            url = next;
        }
    }

    async fn create(&self, kind: EntityKind, body: Value) -> Result<Value, RemoteError> {
        send(self.http.post(self.collection_url(kind)).json(&body)).await
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: EntityId,
        body: Value,
    ) -> Result<Value, RemoteError> {
        send(self.http.patch(self.record_url(kind, id)).json(&body)).await
    }
}

async fn send(request: RequestBuilder) -> Result<Value, RemoteError> {
    let response = request
        .send()
        .await
        .map_err(|err| RemoteError::Transport(err.to_string()))?;

    let status = response.status();
    debug!(status = %status, url = %response.url(), "api response received");

    if !status.is_success() {
        return Err(status_error(status.as_u16(), response.text().await));
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|err| RemoteError::Transport(err.to_string()))?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|err| RemoteError::Decode(err.to_string()))
}

/// A failed body read still yields a `Status` error, carrying the read failure as its body.
fn status_error<E: fmt::Display>(status: u16, body: Result<String, E>) -> RemoteError {
    let body = match body {
        Ok(body) => body,
        Err(err) => format!("<failed to read error body: {err}>"),
    };
    RemoteError::Status { status, body }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Exchange account credentials for an API token at `<base>/auth/login/`.
pub async fn login(
    base_url: &str,
    email: &str,
    password: &str,
    scheme: AuthScheme,
    timeout: Duration,
) -> Result<Credential, RemoteError> {
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| RemoteError::Transport(format!("failed to build HTTP client: {err}")))?;
    let url = format!("{}/auth/login/", base_url.trim_end_matches('/'));
    let body = send(http.post(url).json(&LoginRequest {
        username: email,
        password,
    }))
    .await?;
    let LoginResponse { token } =
        serde_json::from_value(body).map_err(|err| RemoteError::Decode(err.to_string()))?;
    Ok(Credential::new(scheme, token))
}
