//! Three-stage login flow
//!
//! A login attempt runs the stages strictly in order:
//!
//! 1. request an authorization code (`201 Created`),
//! 2. exchange it for an access/refresh token pair (`201 Created`),
//! 3. submit the user's credentials with the access token (`200 OK`).
//!
//! The first stage that does not succeed ends the attempt. Its status is mapped
//! through [`outcome_for_status`]; transport failures become `Error` or
//! `TimedOut` depending on whether they carry a message. Either way exactly one
//! place decides the outcome and posts it, so an attempt delivers at most once.

use super::channel::{channel, OutcomeReceiver};
use super::status::{outcome_for_status, success_status};
use crate::identity::{
    IdentityProviderClient, ProviderError, ProviderResponse, GRANT_TYPE_AUTHORIZATION_CODE,
    REDIRECT_URI,
};
use crate::models::{
    AccessToken, AuthorizationCode, Credential, FlowStage, LoginRequest, Outcome, User,
    UserWithTokens,
};
use reqwest::StatusCode;
use std::fmt;
use std::sync::Arc;

/// Values held for the lifetime of an [`AuthFlow`]
#[derive(Clone)]
pub struct FlowConfig {
    client_id: String,
    credentials: String,
    brand: String,
    report_unmapped_status: bool,
}

impl FlowConfig {
    #[must_use]
    pub fn new(client_id: &str, credentials: &str, brand: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            credentials: credentials.to_string(),
            brand: brand.to_string(),
            report_unmapped_status: false,
        }
    }

    /// Post `Outcome::Rejected` for statuses that have no mapping
    #[must_use]
    pub fn with_report_unmapped_status(mut self, enabled: bool) -> Self {
        self.report_unmapped_status = enabled;
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    #[must_use]
    pub const fn reports_unmapped_status(&self) -> bool {
        self.report_unmapped_status
    }
}

impl fmt::Debug for FlowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowConfig")
            .field("client_id", &self.client_id)
            .field("credentials", &"<redacted>")
            .field("brand", &self.brand)
            .field("report_unmapped_status", &self.report_unmapped_status)
            .finish()
    }
}

/// Why a stage stopped the attempt
#[derive(Debug)]
enum StageFailure {
    Status { stage: FlowStage, status: StatusCode },
    Provider(ProviderError),
}

impl From<ProviderError> for StageFailure {
    fn from(error: ProviderError) -> Self {
        StageFailure::Provider(error)
    }
}

/// Login flow orchestrator
///
/// Cheap to clone; clones share the identity client and configuration. Each
/// invocation owns its intermediate values, so any number of attempts can run
/// concurrently.
#[derive(Clone)]
pub struct AuthFlow {
    client: Arc<dyn IdentityProviderClient>,
    config: Arc<FlowConfig>,
}

impl AuthFlow {
    #[must_use]
    pub fn new(client: Arc<dyn IdentityProviderClient>, config: FlowConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Log in with a national identity number and password
    pub async fn login_by_national_id(&self, national_id: &str, password: &str) -> OutcomeReceiver {
        self.login(Credential::NationalId, national_id, password).await
    }

    /// Log in with a username and password
    pub async fn login_by_username(&self, username: &str, password: &str) -> OutcomeReceiver {
        self.login(Credential::Username, username, password).await
    }

    /// Run a login attempt to completion and return its channel.
    ///
    /// The returned receiver is already resolved: it either holds the outcome or
    /// is closed because the attempt ended on an unmapped status.
    pub async fn login(
        &self,
        credential: Credential,
        identifier: &str,
        password: &str,
    ) -> OutcomeReceiver {
        let (sender, receiver) = channel();
        if let Some(outcome) = self.resolve(credential, identifier, password).await {
            sender.post(outcome);
        }
        receiver
    }

    /// Start a login attempt on the runtime and return its channel immediately
    #[must_use]
    pub fn spawn_login(
        &self,
        credential: Credential,
        identifier: &str,
        password: &str,
    ) -> OutcomeReceiver {
        let (sender, receiver) = channel();
        let flow = self.clone();
        let identifier = identifier.to_string();
        let password = password.to_string();

        tokio::spawn(async move {
            if let Some(outcome) = flow.resolve(credential, &identifier, &password).await {
                sender.post(outcome);
            }
        });

        receiver
    }

    /// Run a login attempt and return its outcome, if it produces one
    pub async fn resolve(
        &self,
        credential: Credential,
        identifier: &str,
        password: &str,
    ) -> Option<Outcome> {
        let outcome = match self.execute(credential, identifier, password).await {
            Ok(user) => Some(Outcome::Success { user }),
            Err(failure) => self.outcome_for_failure(failure),
        };

        match &outcome {
            Some(outcome) if outcome.is_success() => {
                log::info!("Login by {credential:?} succeeded");
            }
            Some(outcome) => log::warn!("Login by {credential:?} failed: {}", outcome.label()),
            None => log::warn!("Login by {credential:?} ended without an outcome"),
        }
        outcome
    }

    async fn execute(
        &self,
        credential: Credential,
        identifier: &str,
        password: &str,
    ) -> Result<UserWithTokens, StageFailure> {
        let authorization = self.request_authorization_code().await?;
        let token = self.request_access_token(&authorization.code).await?;
        let user = self
            .submit_login(credential, identifier, password, &token.access_token)
            .await?;
        Ok(UserWithTokens::merge(user, token))
    }

    async fn request_authorization_code(&self) -> Result<AuthorizationCode, StageFailure> {
        log::debug!("Requesting authorization code");
        let response = self
            .client
            .authorization_code(&self.config.client_id, REDIRECT_URI)
            .await?;
        accept(FlowStage::AuthorizationCode, response)
    }

    async fn request_access_token(&self, code: &str) -> Result<AccessToken, StageFailure> {
        log::debug!("Exchanging authorization code for access token");
        let response = self
            .client
            .access_token(&self.config.credentials, GRANT_TYPE_AUTHORIZATION_CODE, code)
            .await?;
        accept(FlowStage::AccessToken, response)
    }

    async fn submit_login(
        &self,
        credential: Credential,
        identifier: &str,
        password: &str,
        access_token: &str,
    ) -> Result<User, StageFailure> {
        log::debug!("Submitting login by {credential:?}");
        let request =
            LoginRequest::new(credential, identifier, password, &self.config.brand).encode();
        let response = self
            .client
            .login(&request, access_token, &self.config.client_id)
            .await?;
        accept(FlowStage::Login, response)
    }

    fn outcome_for_failure(&self, failure: StageFailure) -> Option<Outcome> {
        match failure {
            StageFailure::Status { stage, status } => {
                log::debug!("{stage} stage answered {status}");
                outcome_for_status(status).or_else(|| {
                    self.config
                        .report_unmapped_status
                        .then_some(Outcome::Rejected {
                            stage,
                            status: status.as_u16(),
                        })
                })
            }
            StageFailure::Provider(error) => {
                log::debug!("Identity provider call failed: {error}");
                Some(match error.message() {
                    Some(message) => Outcome::Error { message },
                    None => Outcome::TimedOut,
                })
            }
        }
    }
}

/// Accept a stage response only on its success status and with a body
fn accept<T>(stage: FlowStage, response: ProviderResponse<T>) -> Result<T, StageFailure> {
    if response.status != success_status(stage) {
        return Err(StageFailure::Status {
            stage,
            status: response.status,
        });
    }
    response
        .body
        .ok_or(StageFailure::Provider(ProviderError::MissingBody(stage)))
}
