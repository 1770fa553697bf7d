use reqwest::StatusCode;
use shared::error::ProtocolError;
use thiserror::Error;

/// Why a submission did not produce an answer.
///
/// Every variant collapses into the same user-facing fallback answer; the
/// distinction only exists for logs.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("answering service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("answering service returned {status}")]
    Status { status: StatusCode },
    #[error(transparent)]
    Malformed(#[from] ProtocolError),
    #[error("could not build viewer URL from `{path}`: {source}")]
    ViewerUrl {
        path: String,
        source: url::ParseError,
    },
    #[error("viewer path `{path}` points outside the answering service")]
    ForeignViewerUrl { path: String },
    #[error("answering task aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Service,
    Malformed,
    Internal,
}

impl AskError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AskError::Transport(_) => FailureKind::Transport,
            AskError::Status { .. } => FailureKind::Service,
            AskError::Malformed(_)
            | AskError::ViewerUrl { .. }
            | AskError::ForeignViewerUrl { .. } => FailureKind::Malformed,
            AskError::Aborted(_) => FailureKind::Internal,
        }
    }
}

#[derive(Debug, Error)]
pub enum FollowError {
    #[error("follow surface has no on-screen bounds yet")]
    TargetMissing,
}

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid answering service address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        source: url::ParseError,
    },
}
