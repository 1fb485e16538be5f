use std::fmt;

use edu_core::Clock;
use edu_core::model::{
    Item, Outcome, RecordedOutcome, Session, SessionKind, SessionProgress, SessionSummary,
};

use crate::error::RunnerError;

/// Lifecycle of a runner: `NotStarted -> InProgress -> Complete`, and back to
/// `InProgress` only through a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerPhase {
    NotStarted,
    InProgress,
    Complete,
}

//
// ─── RUNNER ────────────────────────────────────────────────────────────────────
//

/// Owns one `Session` and applies the quiz or flashcard policy to it.
///
/// - Quiz: `answer(choice)` grades the selection; there is no reveal step.
/// - Flashcards: `reveal()` first, then `assess(known)` records the self-report.
pub struct SessionRunner {
    clock: Clock,
    session: Option<Session>,
}

impl SessionRunner {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            session: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> RunnerPhase {
        match &self.session {
            None => RunnerPhase::NotStarted,
            Some(session) if session.is_complete() => RunnerPhase::Complete,
            Some(_) => RunnerPhase::InProgress,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn kind(&self) -> Option<SessionKind> {
        self.session.as_ref().map(Session::kind)
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        self.session.as_ref().and_then(Session::current_item)
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.session.as_ref().map(Session::progress)
    }

    /// Start a session over `items`, replacing any session already held.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Session` with `InvalidInput` for empty or mixed item lists;
    /// the previous session is kept in that case.
    pub fn start(&mut self, items: Vec<Item>) -> Result<&Session, RunnerError> {
        let session = Session::start(items, self.clock.now())?;
        tracing::debug!(kind = %session.kind(), items = session.total(), "session started");
        Ok(self.session.insert(session))
    }

    /// Grade `choice` against the current question.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NotStarted`, `RunnerError::WrongKind` for flashcard sessions,
    /// or the session's own errors (`TerminalSession`, out-of-range choice).
    pub fn answer(&mut self, choice: usize) -> Result<RecordedOutcome, RunnerError> {
        let clock = self.clock;
        let session = self.session_of_kind(SessionKind::Quiz)?;
        let recorded = *session.record_choice(choice, clock.now())?;
        Self::log_if_complete(session);
        Ok(recorded)
    }

    /// Show the back of the current card. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NotStarted`, `RunnerError::WrongKind` for quizzes, or
    /// `TerminalSession` once every card is assessed.
    pub fn reveal(&mut self) -> Result<(), RunnerError> {
        Ok(self.session_of_kind(SessionKind::Flashcard)?.reveal()?)
    }

    /// Flip the current card back to its front.
    ///
    /// # Errors
    ///
    /// Same as [`SessionRunner::reveal`].
    pub fn hide(&mut self) -> Result<(), RunnerError> {
        Ok(self.session_of_kind(SessionKind::Flashcard)?.unreveal()?)
    }

    /// Record whether the learner knew the revealed card.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NotStarted`, `RunnerError::WrongKind` for quizzes,
    /// `NotRevealed` if the card is still face down, or `TerminalSession`.
    pub fn assess(&mut self, known: bool) -> Result<RecordedOutcome, RunnerError> {
        let clock = self.clock;
        let session = self.session_of_kind(SessionKind::Flashcard)?;
        let recorded = *session.record_outcome(Outcome::from_recall(known), clock.now())?;
        Self::log_if_complete(session);
        Ok(recorded)
    }

    /// Run the same snapshot again from the first item.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NotStarted` if there is nothing to restart.
    pub fn restart(&mut self) -> Result<&Session, RunnerError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(RunnerError::NotStarted)?;
        session.restart(now);
        tracing::debug!(kind = %session.kind(), "session restarted");
        Ok(session)
    }

    /// Drop the current session without summarizing it.
    pub fn abandon(&mut self) -> Option<Session> {
        self.session.take()
    }

    /// Summarize the finished session.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NotStarted`, or `NotComplete` before the last item is recorded.
    pub fn summarize(&self) -> Result<SessionSummary, RunnerError> {
        let session = self.session.as_ref().ok_or(RunnerError::NotStarted)?;
        Ok(session.summarize()?)
    }

    fn session_of_kind(&mut self, expected: SessionKind) -> Result<&mut Session, RunnerError> {
        let session = self.session.as_mut().ok_or(RunnerError::NotStarted)?;
        if session.kind() != expected {
            return Err(RunnerError::WrongKind {
                expected,
                actual: session.kind(),
            });
        }
        Ok(session)
    }

    fn log_if_complete(session: &Session) {
        if session.is_complete() {
            tracing::info!(
                kind = %session.kind(),
                items = session.total(),
                "session complete"
            );
        }
    }
}

impl fmt::Debug for SessionRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRunner")
            .field("phase", &self.phase())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
