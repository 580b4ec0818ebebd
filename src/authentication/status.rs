//! HTTP status handling shared by every stage

use crate::models::{FlowStage, Outcome};
use reqwest::StatusCode;

/// The only status a stage accepts as success
#[must_use]
pub const fn success_status(stage: FlowStage) -> StatusCode {
    match stage {
        FlowStage::AuthorizationCode | FlowStage::AccessToken => StatusCode::CREATED,
        FlowStage::Login => StatusCode::OK,
    }
}

/// Map a non-success status to its outcome.
///
/// Only 401 and 403 have a mapping; every other status yields `None`.
#[must_use]
pub fn outcome_for_status(status: StatusCode) -> Option<Outcome> {
    match status {
        StatusCode::UNAUTHORIZED => Some(Outcome::Unauthorized),
        StatusCode::FORBIDDEN => Some(Outcome::Forbidden),
        _ => None,
    }
}
