mod runner;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use runner::{RunnerPhase, SessionRunner};
pub use view::{ReviewLine, ScoreBand, review_lines};
pub use workflow::StudyLoopService;
