#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod tutor;

pub use edu_core::Clock;

pub use error::{AnswerError, RunnerError, StudyError};
pub use sessions::{ReviewLine, RunnerPhase, ScoreBand, SessionRunner, StudyLoopService};
pub use tutor::{
    AnsweringService, ChatMessage, ChatRole, HttpAnsweringService, MockAnsweringService,
    TutorChat, TutorTool,
};
