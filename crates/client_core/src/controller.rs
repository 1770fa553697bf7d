//! Question/answer interaction state machine.
//!
//! `Idle --submit--> Submitting --settle--> Settled --submit--> Submitting ...`
//!
//! There is no terminal state. At most one request is outstanding: `submit`
//! refuses to start while a previous submission is still in flight, and never
//! cancels it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{domain::ViewerTarget, protocol::FALLBACK_ANSWER};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, error, info};

use crate::{
    endpoint::ServiceEndpoint,
    error::{AskError, FailureKind},
    service::{AnsweringService, Document, Submission},
};

/// One-way capability the controller uses to kick off the follow animation.
pub trait FollowTrigger: Send + Sync {
    fn trigger(&self);
}

/// Trigger that does nothing, for hosts without a decorative element.
pub struct NoopTrigger;

impl FollowTrigger for NoopTrigger {
    fn trigger(&self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmitPolicy {
    /// When false the previous answer and viewer stay visible while the next
    /// question is in flight.
    pub clear_answer_on_submit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Answered { with_viewer: bool },
    Failed(FailureKind),
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionState {
    question: String,
    document: Option<Arc<Document>>,
    status: SubmissionStatus,
    answer: Option<String>,
    viewer: Option<ViewerTarget>,
}

impl SubmissionState {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_deref()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn viewer(&self) -> Option<&ViewerTarget> {
        self.viewer.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    pub fn can_submit(&self) -> bool {
        self.document.is_some() && self.status != SubmissionStatus::Submitting
    }

    fn begin(&mut self, policy: SubmitPolicy) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }
        let document = self.document.clone()?;
        self.status = SubmissionStatus::Submitting;
        if policy.clear_answer_on_submit {
            self.answer = None;
            self.viewer = None;
        }
        Some(Submission {
            question: self.question.clone(),
            document,
        })
    }

    fn settle(&mut self, outcome: Result<Answer, AskError>) -> SettleOutcome {
        self.status = SubmissionStatus::Settled;
        match outcome {
            Ok(answer) => {
                let with_viewer = answer.viewer.is_some();
                self.answer = Some(answer.text);
                self.viewer = answer.viewer;
                SettleOutcome::Answered { with_viewer }
            }
            Err(err) => {
                error!(kind = ?err.kind(), "question failed: {err}");
                self.answer = Some(FALLBACK_ANSWER.to_string());
                self.viewer = None;
                SettleOutcome::Failed(err.kind())
            }
        }
    }
}

struct Answer {
    text: String,
    viewer: Option<ViewerTarget>,
}

async fn ask_for_answer(
    service: Arc<dyn AnsweringService>,
    endpoint: &ServiceEndpoint,
    submission: Submission,
) -> Result<Answer, AskError> {
    // Runs on its own task so a panicking service still settles the submission.
    let response = tokio::spawn(async move { service.ask(&submission).await }).await??;
    let viewer = endpoint.viewer_target(&response)?;
    Ok(Answer {
        text: response.answer,
        viewer,
    })
}

fn lock_state(state: &Mutex<SubmissionState>) -> MutexGuard<'_, SubmissionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct InteractionController {
    state: Arc<Mutex<SubmissionState>>,
    service: Arc<dyn AnsweringService>,
    endpoint: ServiceEndpoint,
    trigger: Arc<dyn FollowTrigger>,
    runtime: Handle,
    policy: SubmitPolicy,
}

impl InteractionController {
    pub fn new(
        service: Arc<dyn AnsweringService>,
        endpoint: ServiceEndpoint,
        trigger: Arc<dyn FollowTrigger>,
        runtime: Handle,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SubmissionState::default())),
            service,
            endpoint,
            trigger,
            runtime,
            policy: SubmitPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SubmitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    pub fn snapshot(&self) -> SubmissionState {
        lock_state(&self.state).clone()
    }

    pub fn set_question(&self, text: impl Into<String>) {
        lock_state(&self.state).question = text.into();
    }

    pub fn set_file(&self, document: Document) {
        debug!(file = %document.file_name, bytes = document.len(), "document selected");
        lock_state(&self.state).document = Some(Arc::new(document));
    }

    pub fn clear_file(&self) {
        lock_state(&self.state).document = None;
    }

    /// Starts a submission if a document is selected and nothing is in flight.
    ///
    /// The status flips to `Submitting` before this returns. Returns `None`
    /// without side effects when the precondition does not hold. The returned
    /// task settles the state and then fires the follow trigger, whatever the
    /// outcome.
    pub fn submit(&self) -> Option<JoinHandle<SettleOutcome>> {
        let submission = {
            let mut state = lock_state(&self.state);
            match state.begin(self.policy) {
                Some(submission) => submission,
                None => {
                    debug!(
                        status = ?state.status,
                        has_document = state.document.is_some(),
                        "submit ignored"
                    );
                    return None;
                }
            }
        };
        info!(
            file = %submission.document.file_name,
            question_len = submission.question.len(),
            "submitting question"
        );

        let state = Arc::clone(&self.state);
        let service = Arc::clone(&self.service);
        let trigger = Arc::clone(&self.trigger);
        let endpoint = self.endpoint.clone();
        Some(self.runtime.spawn(async move {
            let outcome = ask_for_answer(service, &endpoint, submission).await;
            let settled = lock_state(&state).settle(outcome);
            info!(outcome = ?settled, "question settled");

            // Failures animate too.
            trigger.trigger();
            settled
        }))
    }

    pub fn dismiss_viewer(&self) {
        if lock_state(&self.state).viewer.take().is_some() {
            debug!("viewer dismissed");
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
