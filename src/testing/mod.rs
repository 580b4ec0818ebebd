//! Testing utilities for the login flow
//!
//! - [`fixtures`] - Pre-built test data (provider responses, users, settings)
//! - [`mock`] - Scripted identity provider that records every call
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use authflow::authentication::AuthFlow;
//! use authflow::testing::{mock::MockIdentityProvider, TestFixtures};
//!
//! async fn example() {
//!     let mock = Arc::new(MockIdentityProvider::successful());
//!     let flow = AuthFlow::new(mock.clone(), TestFixtures::flow_config());
//!
//!     let outcome = flow.login_by_username("alice", "Secret1").await.recv().await;
//!     assert!(outcome.is_some_and(|o| o.is_success()));
//!     assert_eq!(mock.calls().len(), 3);
//! }
//! ```

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::{MockIdentityProvider, ProviderCall};

/// Common test constants
pub mod constants {
    /// Client identifier used by test flows
    pub const TEST_CLIENT_ID: &str = "test-client";

    /// Basic auth credentials (`test:secret`)
    pub const TEST_CREDENTIALS: &str = "dGVzdDpzZWNyZXQ=";

    /// Brand sent with test login requests
    pub const TEST_BRAND: &str = "test-brand";

    /// Authorization code returned by the scripted provider
    pub const TEST_CODE: &str = "abc";

    pub const TEST_ACCESS_TOKEN: &str = "AT1";

    pub const TEST_REFRESH_TOKEN: &str = "RT1";

    pub const TEST_USER_ID: &str = "u1";
}
