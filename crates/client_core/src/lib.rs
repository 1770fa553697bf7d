use std::sync::Arc;

use tokio::runtime::Handle;

pub mod config;
pub mod controller;
pub mod endpoint;
pub mod error;
pub mod follower;
pub mod placement;
pub mod service;

pub use config::{load_settings, Settings};
pub use controller::{
    FollowTrigger, InteractionController, NoopTrigger, SettleOutcome, SubmissionState,
    SubmissionStatus, SubmitPolicy,
};
pub use endpoint::ServiceEndpoint;
pub use error::{AskError, EndpointError, FailureKind, FollowError};
pub use follower::{CursorFollowState, FollowSurface, FollowerConfig, PointerFollower, PointerOffset};
pub use placement::{DelayedPlacement, Placeable};
pub use service::{AnsweringService, Document, HttpAnsweringService, Submission};

/// Wires an [`InteractionController`] to the HTTP answering service described
/// by `settings`.
pub fn controller_from_settings(
    settings: &Settings,
    trigger: Arc<dyn FollowTrigger>,
    runtime: Handle,
) -> Result<InteractionController, EndpointError> {
    let endpoint = ServiceEndpoint::from_settings(settings)?;
    let service = Arc::new(HttpAnsweringService::new(endpoint.clone()));
    Ok(
        InteractionController::new(service, endpoint, trigger, runtime).with_policy(SubmitPolicy {
            clear_answer_on_submit: settings.clear_answer_on_submit,
        }),
    )
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
