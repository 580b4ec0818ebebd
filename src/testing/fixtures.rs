//! Test fixtures providing pre-built test objects

use crate::authentication::FlowConfig;
use crate::models::{AccessToken, AuthorizationCode, User};
use crate::settings::AuthFlowSettings;
use serde_json::json;

use super::constants::{
    TEST_ACCESS_TOKEN, TEST_BRAND, TEST_CLIENT_ID, TEST_CODE, TEST_CREDENTIALS,
    TEST_REFRESH_TOKEN, TEST_USER_ID,
};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Flow configuration with the test client, credentials and brand
    #[must_use]
    pub fn flow_config() -> FlowConfig {
        FlowConfig::new(TEST_CLIENT_ID, TEST_CREDENTIALS, TEST_BRAND)
    }

    /// Settings pointing at the given provider base URL
    #[must_use]
    pub fn settings(base_url: &str) -> AuthFlowSettings {
        let mut settings = AuthFlowSettings::default();
        settings.provider.base_url = base_url.to_string();
        settings.provider.client_id = Some(TEST_CLIENT_ID.to_string());
        settings.provider.credentials = Some(TEST_CREDENTIALS.to_string());
        settings.provider.brand = TEST_BRAND.to_string();
        settings.provider.connect_timeout_ms = 2_000;
        settings.provider.timeout_ms = 2_000;
        settings
    }

    #[must_use]
    pub fn authorization_code() -> AuthorizationCode {
        AuthorizationCode {
            code: TEST_CODE.to_string(),
        }
    }

    #[must_use]
    pub fn access_token() -> AccessToken {
        AccessToken {
            access_token: TEST_ACCESS_TOKEN.to_string(),
            refresh_token: TEST_REFRESH_TOKEN.to_string(),
        }
    }

    /// Profile returned by a successful login
    ///
    /// # Panics
    ///
    /// Panics if the literal profile does not deserialize, which would be a bug
    /// in this fixture.
    #[must_use]
    pub fn user() -> User {
        serde_json::from_value(Self::user_json()).expect("fixture user must deserialize")
    }

    /// Wire form of [`TestFixtures::user`]
    #[must_use]
    pub fn user_json() -> serde_json::Value {
        json!({
            "id": TEST_USER_ID,
            "name": "Alice Example",
            "email": "alice@example.com"
        })
    }
}
