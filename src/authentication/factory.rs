//! Factory for creating a configured login flow
//!
//! This module wires settings into the HTTP identity client and the flow
//! orchestrator. Callers that bring their own identity client use
//! [`AuthFlowFactory::create_with_client`].

use super::flow::{AuthFlow, FlowConfig};
use crate::identity::{HttpIdentityProvider, IdentityProviderClient};
use crate::settings::{AuthFlowSettings, SettingsError};
use std::sync::Arc;

/// Factory for creating login flows from settings
pub struct AuthFlowFactory;

impl AuthFlowFactory {
    /// Build the flow configuration from validated settings
    ///
    /// # Errors
    ///
    /// Returns an error if the settings fail validation.
    pub fn flow_config(settings: &AuthFlowSettings) -> Result<FlowConfig, SettingsError> {
        settings.validate()?;

        let client_id = settings
            .provider
            .get_client_id()
            .ok_or(SettingsError::Missing("provider.client_id"))?;
        let credentials = settings
            .provider
            .get_credentials()
            .ok_or(SettingsError::Missing("provider.credentials"))?;

        Ok(
            FlowConfig::new(&client_id, &credentials, &settings.provider.brand)
                .with_report_unmapped_status(settings.flow.report_unmapped_status),
        )
    }

    /// Create a flow backed by the HTTP identity client
    ///
    /// # Errors
    ///
    /// Returns an error if the settings fail validation or the HTTP client cannot
    /// be built.
    pub fn create(settings: &AuthFlowSettings) -> Result<AuthFlow, SettingsError> {
        let config = Self::flow_config(settings)?;
        let client = HttpIdentityProvider::from_settings(&settings.provider)?;

        log::info!(
            "Login flow configured for client {} (brand {})",
            config.client_id(),
            config.brand()
        );
        Ok(AuthFlow::new(Arc::new(client), config))
    }

    /// Create a flow around a caller-provided identity client
    ///
    /// # Errors
    ///
    /// Returns an error if the settings fail validation.
    pub fn create_with_client(
        settings: &AuthFlowSettings,
        client: Arc<dyn IdentityProviderClient>,
    ) -> Result<AuthFlow, SettingsError> {
        let config = Self::flow_config(settings)?;
        Ok(AuthFlow::new(client, config))
    }
}
