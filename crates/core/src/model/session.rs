use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::ids::ItemId;
use crate::model::item::{Item, ItemError, Question};
use crate::model::outcome::{Outcome, SessionKind};
use crate::model::summary::{SessionSummary, SessionSummaryError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Contract violations of the session state machine.
///
/// All of these are caller bugs; none are retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid session input: {0}")]
    InvalidInput(&'static str),

    #[error("session is already complete")]
    TerminalSession,

    #[error("session is not complete yet")]
    NotComplete,

    #[error("the current card must be revealed before recording an outcome")]
    NotRevealed,

    #[error("a {outcome} outcome cannot be recorded in a {session} session")]
    OutcomeKindMismatch {
        session: SessionKind,
        outcome: SessionKind,
    },

    #[error(transparent)]
    Item(#[from] ItemError),

    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

//
// ─── RECORDED OUTCOME ──────────────────────────────────────────────────────────
//

/// Outcome recorded for the item at the same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedOutcome {
    pub item_id: ItemId,
    pub outcome: Outcome,
    /// Selected option index, for graded quiz answers.
    pub choice: Option<usize>,
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of answered items, 0-100.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 * 100.0 / self.total as f64
    }
}

/// One line of the answer review: the item and what was recorded for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemReview<'a> {
    pub index: usize,
    pub item: &'a Item,
    pub recorded: Option<&'a RecordedOutcome>,
}

impl ItemReview<'_> {
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.recorded.map(|r| r.outcome)
    }

    /// Text of the option the learner picked, for quiz items answered by choice.
    #[must_use]
    pub fn chosen_option(&self) -> Option<&str> {
        let question = self.item.as_question()?;
        let choice = self.recorded?.choice?;
        question.options().get(choice).map(String::as_str)
    }

    #[must_use]
    pub fn correct_option(&self) -> Option<&str> {
        self.item.as_question().map(Question::correct_option)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run through a fixed snapshot of items.
///
/// The cursor is the number of recorded outcomes, so `position == outcomes.len()`
/// holds by construction and outcomes can only be appended in item order.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    kind: SessionKind,
    items: Vec<Item>,
    outcomes: Vec<RecordedOutcome>,
    revealed: bool,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Start a session over `items`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` if `items` is empty or mixes questions and cards.
    pub fn start(items: Vec<Item>, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        let kind = Self::kind_of(&items)?;
        Ok(Self {
            kind,
            items,
            outcomes: Vec::new(),
            revealed: false,
            started_at,
            completed_at: None,
        })
    }

    /// Session kind shared by every item in `items`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` if `items` is empty or mixes kinds.
    pub fn kind_of(items: &[Item]) -> Result<SessionKind, SessionError> {
        let first = items
            .first()
            .ok_or(SessionError::InvalidInput("no items to study"))?;
        let kind = first.kind();
        if items.iter().any(|item| item.kind() != kind) {
            return Err(SessionError::InvalidInput(
                "questions and cards cannot share a session",
            ));
        }
        Ok(kind)
    }

    #[must_use]
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn outcomes(&self) -> &[RecordedOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.position() >= self.items.len()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        self.items.get(self.position())
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            answered: self.position(),
            remaining: self.total().saturating_sub(self.position()),
            is_complete: self.is_complete(),
        }
    }

    /// Show the answer side of the current item. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::TerminalSession` once every item has an outcome.
    pub fn reveal(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.revealed = true;
        Ok(())
    }

    /// Flip the current item back to its front side. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::TerminalSession` once every item has an outcome.
    pub fn unreveal(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.revealed = false;
        Ok(())
    }

    /// Record `outcome` for the current item and advance.
    ///
    /// The session is left untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::TerminalSession` if the session is complete,
    /// `SessionError::OutcomeKindMismatch` if the outcome belongs to the other kind, and
    /// `SessionError::NotRevealed` for a flashcard that has not been revealed.
    pub fn record_outcome(
        &mut self,
        outcome: Outcome,
        recorded_at: DateTime<Utc>,
    ) -> Result<&RecordedOutcome, SessionError> {
        self.record(outcome, None, recorded_at)
    }

    /// Grade `choice` against the current question and record the result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::TerminalSession` if the session is complete,
    /// `SessionError::OutcomeKindMismatch` for flashcard sessions, and
    /// `SessionError::Item` if `choice` is not an option of the current question.
    pub fn record_choice(
        &mut self,
        choice: usize,
        recorded_at: DateTime<Utc>,
    ) -> Result<&RecordedOutcome, SessionError> {
        let item = self.current_item().ok_or(SessionError::TerminalSession)?;
        let question = item.as_question().ok_or(SessionError::OutcomeKindMismatch {
            session: self.kind,
            outcome: SessionKind::Quiz,
        })?;
        let outcome = question.grade(choice)?;
        self.record(outcome, Some(choice), recorded_at)
    }

    fn record(
        &mut self,
        outcome: Outcome,
        choice: Option<usize>,
        recorded_at: DateTime<Utc>,
    ) -> Result<&RecordedOutcome, SessionError> {
        self.ensure_open()?;
        if outcome.kind() != self.kind {
            return Err(SessionError::OutcomeKindMismatch {
                session: self.kind,
                outcome: outcome.kind(),
            });
        }
        if self.kind.requires_reveal() && !self.revealed {
            return Err(SessionError::NotRevealed);
        }

        let item_id = self.items[self.position()].id();
        self.outcomes.push(RecordedOutcome {
            item_id,
            outcome,
            choice,
        });
        self.revealed = false;
        if self.is_complete() {
            // Wall clocks can step backwards; never end before the start.
            self.completed_at = Some(recorded_at.max(self.started_at));
        }

        self.outcomes.last().ok_or(SessionError::TerminalSession)
    }

    /// Start over on the same snapshot, in the same order.
    pub fn restart(&mut self, started_at: DateTime<Utc>) {
        self.outcomes.clear();
        self.revealed = false;
        self.started_at = started_at;
        self.completed_at = None;
    }

    /// Summarize a finished session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` until every item has an outcome.
    pub fn summarize(&self) -> Result<SessionSummary, SessionError> {
        let completed_at = self
            .completed_at
            .filter(|_| self.is_complete())
            .ok_or(SessionError::NotComplete)?;
        Ok(SessionSummary::from_outcomes(
            self.kind,
            self.items.len(),
            self.outcomes.iter().map(|r| r.outcome),
            self.started_at,
            completed_at,
        )?)
    }

    /// Pair every item with what was recorded for it so far.
    #[must_use]
    pub fn review(&self) -> Vec<ItemReview<'_>> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemReview {
                index,
                item,
                recorded: self.outcomes.get(index),
            })
            .collect()
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::TerminalSession);
        }
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("kind", &self.kind)
            .field("items_len", &self.items.len())
            .field("position", &self.position())
            .field("revealed", &self.revealed)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
