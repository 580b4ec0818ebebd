#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the authflow library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod authentication;
pub mod identity;
pub mod models;
pub mod settings;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use authentication::{AuthFlow, AuthFlowFactory, FlowConfig, OutcomeReceiver};
pub use identity::{HttpIdentityProvider, IdentityProviderClient, ProviderError, ProviderResponse};
pub use models::{Outcome, UserWithTokens};
pub use settings::AuthFlowSettings;
