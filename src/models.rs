//! Data carried through the login flow
//!
//! Every value here is created fresh for a single login attempt and dropped when
//! the attempt ends. Nothing is cached or persisted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod login;
pub mod outcome;

pub use login::{Credential, EncodedLoginRequest, LoginRequest};
pub use outcome::{FlowStage, Outcome};

/// Authorization code returned by the authorization stage
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationCode {
    pub code: String,
}

/// Access/refresh token pair returned by the token stage
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
    pub refresh_token: String,
}

// Tokens stay out of debug output
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Identity profile returned by the login stage
///
/// The profile is opaque: every attribute the provider sends, `id` included, is
/// kept verbatim in `attributes` and written back out unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct User {
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl User {
    /// Look up a provider attribute by its wire name
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Provider's identifier for this user, in whatever JSON type it was sent
    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.attribute("id")
    }
}

/// A user profile merged with the tokens issued during the same login attempt
///
/// This is the only shape in which a user leaves the flow, so a profile is never
/// handed to a caller without both tokens attached.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserWithTokens {
    #[serde(flatten)]
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

impl UserWithTokens {
    /// Merge a profile with the token pair from the token stage
    ///
    /// Token attributes the provider already put on the profile are replaced by
    /// the pair issued in this attempt.
    #[must_use]
    pub fn merge(mut user: User, token: AccessToken) -> Self {
        user.attributes.remove("accessToken");
        user.attributes.remove("refreshToken");
        Self {
            user,
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.user.id()
    }
}
