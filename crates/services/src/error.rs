//! Shared error types for the services crate.

use thiserror::Error;

use edu_core::model::{SessionError, SessionKind};
use storage::StorageError;

/// Errors emitted by `SessionRunner`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RunnerError {
    #[error("no session has been started")]
    NotStarted,
    #[error("this action needs a {expected} session, but the current one is {actual}")]
    WrongKind {
        expected: SessionKind,
        actual: SessionKind,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted by `StudyLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudyError {
    #[error(transparent)]
    Runner(#[from] RunnerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by answering services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("answering service returned an empty answer")]
    EmptyResponse,
    #[error("answering service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
