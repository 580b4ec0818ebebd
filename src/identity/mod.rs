//! Identity provider client
//!
//! This module defines the capability the login flow needs from the identity
//! provider: three remote calls, each answering with a status and an optional
//! typed body. The production implementation talks HTTP (see [`http`]); tests
//! script the responses through `testing::MockIdentityProvider`.

pub mod http;

use crate::models::{AccessToken, AuthorizationCode, EncodedLoginRequest, FlowStage, User};
use async_trait::async_trait;
use reqwest::StatusCode;

pub use http::HttpIdentityProvider;

/// Redirect target sent with every authorization code request
pub const REDIRECT_URI: &str = "http://localhost";

/// Grant type sent with every access token request
pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";

/// Status plus optional body returned by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse<T> {
    pub status: StatusCode,
    pub body: Option<T>,
}

impl<T> ProviderResponse<T> {
    #[must_use]
    pub const fn new(status: StatusCode, body: Option<T>) -> Self {
        Self { status, body }
    }

    /// Response without a body
    #[must_use]
    pub const fn status_only(status: StatusCode) -> Self {
        Self { status, body: None }
    }
}

/// Failures below the HTTP status level
///
/// A failure either carries a descriptive message or it does not; the flow
/// reports the two cases differently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The request could not be completed
    #[error("{}", .message.as_deref().unwrap_or("request timed out"))]
    Transport { message: Option<String> },
    /// The response body could not be decoded
    #[error("{0}")]
    Decode(String),
    /// The provider signalled success but sent no body
    #[error("empty response body from the {0} endpoint")]
    MissingBody(FlowStage),
}

impl ProviderError {
    /// Transport failure with a descriptive message
    pub fn transport(message: impl Into<String>) -> Self {
        ProviderError::Transport {
            message: Some(message.into()),
        }
    }

    /// Transport failure without a message (typically a timeout)
    #[must_use]
    pub const fn timeout() -> Self {
        ProviderError::Transport { message: None }
    }

    /// Descriptive message, if this failure has one
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            ProviderError::Transport { message } => message.clone(),
            ProviderError::Decode(_) | ProviderError::MissingBody(_) => Some(self.to_string()),
        }
    }
}

/// Remote operations exposed by the identity provider
#[async_trait]
pub trait IdentityProviderClient: Send + Sync {
    /// Request an authorization code for the client
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be completed or its body cannot be
    /// decoded. A non-success status is not an error.
    async fn authorization_code(
        &self,
        client_id: &str,
        redirect_uri: &str,
    ) -> Result<ProviderResponse<AuthorizationCode>, ProviderError>;

    /// Exchange an authorization code for an access/refresh token pair
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be completed or its body cannot be
    /// decoded. A non-success status is not an error.
    async fn access_token(
        &self,
        credentials: &str,
        grant_type: &str,
        code: &str,
    ) -> Result<ProviderResponse<AccessToken>, ProviderError>;

    /// Submit the user's credentials using the access token as bearer
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be completed or its body cannot be
    /// decoded. A non-success status is not an error.
    async fn login(
        &self,
        request: &EncodedLoginRequest,
        access_token: &str,
        client_id: &str,
    ) -> Result<ProviderResponse<User>, ProviderError>;
}
