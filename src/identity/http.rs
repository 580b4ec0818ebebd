//! HTTP implementation of the identity provider client
//!
//! Every call is a JSON `POST`. A body is decoded only when the status is the
//! one the flow treats as success for that call (`201` for the authorization and
//! token endpoints, `200` for login); for any other status the body is ignored.

use super::{IdentityProviderClient, ProviderError, ProviderResponse};
use crate::models::{AccessToken, AuthorizationCode, EncodedLoginRequest, User};
use crate::settings::{ProviderSettings, SettingsError};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Header carrying the bearer token on the login call
pub const ACCESS_TOKEN_HEADER: &str = "access_token";

/// Header carrying the client identifier on the login call
pub const CLIENT_ID_HEADER: &str = "client_id";

/// Fully resolved endpoint URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub authorization_code: Url,
    pub access_token: Url,
    pub login: Url,
}

impl ProviderEndpoints {
    /// Resolve the three endpoint paths against a base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or any joined path does not parse.
    pub fn resolve(
        base_url: &str,
        authorization_code_path: &str,
        access_token_path: &str,
        login_path: &str,
    ) -> Result<Self, SettingsError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| SettingsError::Invalid(format!("base_url '{base_url}': {e}")))?;
        // Without a trailing slash `join` would replace the last path segment
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |path: &str| {
            base.join(path.trim_start_matches('/'))
                .map_err(|e| SettingsError::Invalid(format!("endpoint path '{path}': {e}")))
        };

        Ok(Self {
            authorization_code: join(authorization_code_path)?,
            access_token: join(access_token_path)?,
            login: join(login_path)?,
        })
    }
}

/// `reqwest`-backed identity provider client
#[derive(Clone)]
pub struct HttpIdentityProvider {
    http_client: reqwest::Client,
    endpoints: ProviderEndpoints,
}

impl HttpIdentityProvider {
    /// Create a client with a caller-provided `reqwest` client
    #[must_use]
    pub fn with_client(http_client: reqwest::Client, endpoints: ProviderEndpoints) -> Self {
        Self {
            http_client,
            endpoints,
        }
    }

    /// Create a client from provider settings, building the transport with the
    /// configured timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints cannot be resolved or the HTTP client
    /// cannot be built.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, SettingsError> {
        let endpoints = ProviderEndpoints::resolve(
            &settings.base_url,
            &settings.authorization_code_path,
            &settings.access_token_path,
            &settings.login_path,
        )?;

        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| SettingsError::Invalid(format!("failed to build HTTP client: {e}")))?;

        log::debug!(
            "Identity provider endpoints: code={}, token={}, login={}",
            endpoints.authorization_code,
            endpoints.access_token,
            endpoints.login
        );

        Ok(Self::with_client(http_client, endpoints))
    }
}

/// Value for the `Authorization` header of the token call
fn basic_authorization(credentials: &str) -> String {
    if credentials.starts_with("Basic ") {
        credentials.to_string()
    } else {
        format!("Basic {credentials}")
    }
}

fn map_transport_error(error: &reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::timeout()
    } else if error.is_decode() {
        ProviderError::Decode(error.to_string())
    } else {
        ProviderError::transport(error.to_string())
    }
}

/// Turn an HTTP response into a provider response, decoding the body only on
/// the expected success status
async fn read_response<T: DeserializeOwned>(
    response: reqwest::Response,
    success: StatusCode,
    endpoint: &str,
) -> Result<ProviderResponse<T>, ProviderError> {
    let status = response.status();
    if status != success {
        log::debug!("{endpoint} endpoint answered {status}");
        return Ok(ProviderResponse::status_only(status));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| map_transport_error(&e))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ProviderResponse::status_only(status));
    }

    let body = serde_json::from_slice(&bytes).map_err(|e| {
        ProviderError::Decode(format!("invalid {endpoint} response body: {e}"))
    })?;
    Ok(ProviderResponse::new(status, Some(body)))
}

#[async_trait]
impl IdentityProviderClient for HttpIdentityProvider {
    async fn authorization_code(
        &self,
        client_id: &str,
        redirect_uri: &str,
    ) -> Result<ProviderResponse<AuthorizationCode>, ProviderError> {
        let response = self
            .http_client
            .post(self.endpoints.authorization_code.clone())
            .json(&json!({
                "client_id": client_id,
                "redirect_uri": redirect_uri,
            }))
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        read_response(response, StatusCode::CREATED, "authorization code").await
    }

    async fn access_token(
        &self,
        credentials: &str,
        grant_type: &str,
        code: &str,
    ) -> Result<ProviderResponse<AccessToken>, ProviderError> {
        let response = self
            .http_client
            .post(self.endpoints.access_token.clone())
            .header(AUTHORIZATION, basic_authorization(credentials))
            .json(&json!({
                "grant_type": grant_type,
                "code": code,
            }))
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        read_response(response, StatusCode::CREATED, "access token").await
    }

    async fn login(
        &self,
        request: &EncodedLoginRequest,
        access_token: &str,
        client_id: &str,
    ) -> Result<ProviderResponse<User>, ProviderError> {
        let response = self
            .http_client
            .post(self.endpoints.login.clone())
            .header(ACCESS_TOKEN_HEADER, access_token)
            .header(CLIENT_ID_HEADER, client_id)
            .json(request)
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        read_response(response, StatusCode::OK, "login").await
    }
}
