//! Terminal result of one login attempt

use super::UserWithTokens;
use serde::Serialize;
use std::fmt;

/// The three remote calls of the login flow, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStage {
    AuthorizationCode,
    AccessToken,
    Login,
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStage::AuthorizationCode => write!(f, "authorization code"),
            FlowStage::AccessToken => write!(f, "access token"),
            FlowStage::Login => write!(f, "login"),
        }
    }
}

/// The single value delivered per login attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// All three stages succeeded
    Success { user: UserWithTokens },
    /// A stage answered 401
    Unauthorized,
    /// A stage answered 403
    Forbidden,
    /// The transport failed without a descriptive message
    TimedOut,
    /// The transport failed with a descriptive message
    Error { message: String },
    /// A stage answered with a status that has no mapping.
    ///
    /// Only produced when unmapped-status reporting is enabled; otherwise such a
    /// status ends the attempt without any outcome.
    Rejected { stage: FlowStage, status: u16 },
}

impl Outcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Borrow the merged user of a successful attempt
    #[must_use]
    pub const fn user(&self) -> Option<&UserWithTokens> {
        match self {
            Outcome::Success { user } => Some(user),
            _ => None,
        }
    }

    /// Short label used in log lines
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "success",
            Outcome::Unauthorized => "unauthorized",
            Outcome::Forbidden => "forbidden",
            Outcome::TimedOut => "timed_out",
            Outcome::Error { .. } => "error",
            Outcome::Rejected { .. } => "rejected",
        }
    }
}
