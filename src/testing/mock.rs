//! Mock identity provider for isolated flow tests
//!
//! Each of the three calls answers with a scripted result that is cloned on every
//! call, so the same mock can serve repeated attempts. Every call is recorded with
//! its arguments.

use crate::identity::{IdentityProviderClient, ProviderError, ProviderResponse};
use crate::models::{AccessToken, AuthorizationCode, EncodedLoginRequest, FlowStage, User};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Mutex;

use super::fixtures::TestFixtures;

/// Scripted answer for one provider call
pub type Scripted<T> = Result<ProviderResponse<T>, ProviderError>;

/// A call received by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    AuthorizationCode {
        client_id: String,
        redirect_uri: String,
    },
    AccessToken {
        credentials: String,
        grant_type: String,
        code: String,
    },
    Login {
        request: EncodedLoginRequest,
        access_token: String,
        client_id: String,
    },
}

impl ProviderCall {
    #[must_use]
    pub const fn stage(&self) -> FlowStage {
        match self {
            ProviderCall::AuthorizationCode { .. } => FlowStage::AuthorizationCode,
            ProviderCall::AccessToken { .. } => FlowStage::AccessToken,
            ProviderCall::Login { .. } => FlowStage::Login,
        }
    }
}

/// Identity provider with scripted responses
pub struct MockIdentityProvider {
    authorization_code: Scripted<AuthorizationCode>,
    access_token: Scripted<AccessToken>,
    login: Scripted<User>,
    calls: Mutex<Vec<ProviderCall>>,
}

impl MockIdentityProvider {
    /// A provider whose three calls all succeed with the fixture values
    #[must_use]
    pub fn successful() -> Self {
        Self {
            authorization_code: Ok(ProviderResponse::new(
                StatusCode::CREATED,
                Some(TestFixtures::authorization_code()),
            )),
            access_token: Ok(ProviderResponse::new(
                StatusCode::CREATED,
                Some(TestFixtures::access_token()),
            )),
            login: Ok(ProviderResponse::new(StatusCode::OK, Some(TestFixtures::user()))),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A successful provider where the given stage answers `status` without a body
    #[must_use]
    pub fn failing_at(stage: FlowStage, status: StatusCode) -> Self {
        let mock = Self::successful();
        match stage {
            FlowStage::AuthorizationCode => {
                mock.with_authorization_code(Ok(ProviderResponse::status_only(status)))
            }
            FlowStage::AccessToken => {
                mock.with_access_token(Ok(ProviderResponse::status_only(status)))
            }
            FlowStage::Login => mock.with_login(Ok(ProviderResponse::status_only(status))),
        }
    }

    /// A successful provider where the given stage fails below the HTTP level
    #[must_use]
    pub fn erroring_at(stage: FlowStage, error: ProviderError) -> Self {
        let mock = Self::successful();
        match stage {
            FlowStage::AuthorizationCode => mock.with_authorization_code(Err(error)),
            FlowStage::AccessToken => mock.with_access_token(Err(error)),
            FlowStage::Login => mock.with_login(Err(error)),
        }
    }

    #[must_use]
    pub fn with_authorization_code(mut self, response: Scripted<AuthorizationCode>) -> Self {
        self.authorization_code = response;
        self
    }

    #[must_use]
    pub fn with_access_token(mut self, response: Scripted<AccessToken>) -> Self {
        self.access_token = response;
        self
    }

    #[must_use]
    pub fn with_login(mut self, response: Scripted<User>) -> Self {
        self.login = response;
        self
    }

    /// Every call received so far, in order
    ///
    /// # Panics
    ///
    /// Panics if the call log mutex was poisoned by a panicking test.
    #[must_use]
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    /// Stages reached so far, in order
    #[must_use]
    pub fn stages_called(&self) -> Vec<FlowStage> {
        self.calls().iter().map(ProviderCall::stage).collect()
    }

    /// The login requests received so far
    #[must_use]
    pub fn login_requests(&self) -> Vec<EncodedLoginRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::Login { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().expect("mock call log poisoned").push(call);
    }
}

#[async_trait]
impl IdentityProviderClient for MockIdentityProvider {
    async fn authorization_code(
        &self,
        client_id: &str,
        redirect_uri: &str,
    ) -> Result<ProviderResponse<AuthorizationCode>, ProviderError> {
        self.record(ProviderCall::AuthorizationCode {
            client_id: client_id.to_string(),
            redirect_uri: redirect_uri.to_string(),
        });
        self.authorization_code.clone()
    }

    async fn access_token(
        &self,
        credentials: &str,
        grant_type: &str,
        code: &str,
    ) -> Result<ProviderResponse<AccessToken>, ProviderError> {
        self.record(ProviderCall::AccessToken {
            credentials: credentials.to_string(),
            grant_type: grant_type.to_string(),
            code: code.to_string(),
        });
        self.access_token.clone()
    }

    async fn login(
        &self,
        request: &EncodedLoginRequest,
        access_token: &str,
        client_id: &str,
    ) -> Result<ProviderResponse<User>, ProviderError> {
        self.record(ProviderCall::Login {
            request: request.clone(),
            access_token: access_token.to_string(),
            client_id: client_id.to_string(),
        });
        self.login.clone()
    }
}
