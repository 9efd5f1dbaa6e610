//! Interaction handling for the helpdesk request modal.
//!
//! Inbound platform payloads are routed into [`InteractionEvent`]s, applied to
//! a [`FormInstance`], and the resulting views, acknowledgments and
//! notifications go out through the [`HostPlatform`] and [`Acknowledge`]
//! collaborators.

mod error;
pub use error::FlowError;

pub mod dispatch;
pub mod event;
pub mod form;
pub mod platform;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use dispatch::{DeliveryReport, Destination, Dispatcher};
pub use event::InteractionEvent;
pub use form::{FormInstance, Step, SubmitOutcome};
pub use platform::{AckResponse, Acknowledge, HostPlatform, PlatformError};
pub use workflow::{Outcome, Workflow, WorkflowConfig};
