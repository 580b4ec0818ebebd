//! Login flow orchestration
//!
//! This module provides the three-stage login flow, the single-delivery channel
//! its outcome is posted to, the status mapping shared by all stages, and the
//! factory that builds a flow from settings.

pub mod channel;
pub mod factory;
pub mod flow;
pub mod status;

pub use channel::{channel, Delivery, OutcomeReceiver, OutcomeSender};
pub use factory::AuthFlowFactory;
pub use flow::{AuthFlow, FlowConfig};
