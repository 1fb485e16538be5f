use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::outcome::{Outcome, SessionKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("cannot summarize a session without items")]
    EmptySession,

    #[error("recorded outcomes ({recorded}) do not match item count ({total})")]
    CountMismatch { total: usize, recorded: usize },

    #[error("a {outcome:?} outcome cannot appear in a {kind} session")]
    ForeignOutcome { kind: SessionKind, outcome: Outcome },
}

/// Aggregate view of a completed session.
///
/// Derived on demand from the recorded outcomes; nothing here is stored back
/// into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    kind: SessionKind,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total: usize,
    correct: usize,
    incorrect: usize,
    known: usize,
    unknown: usize,
}

impl SessionSummary {
    /// Build a summary from the outcomes of a finished run.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::EmptySession` for zero items,
    /// `SessionSummaryError::CountMismatch` if not every item has an outcome,
    /// `SessionSummaryError::ForeignOutcome` for outcomes of the other kind, and
    /// `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    pub fn from_outcomes(
        kind: SessionKind,
        total: usize,
        outcomes: impl IntoIterator<Item = Outcome>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if total == 0 {
            return Err(SessionSummaryError::EmptySession);
        }

        let mut summary = Self {
            kind,
            started_at,
            completed_at,
            total,
            correct: 0,
            incorrect: 0,
            known: 0,
            unknown: 0,
        };

        let mut recorded = 0_usize;
        for outcome in outcomes {
            if outcome.kind() != kind {
                return Err(SessionSummaryError::ForeignOutcome { kind, outcome });
            }
            recorded += 1;
            match outcome {
                Outcome::Correct => summary.correct += 1,
                Outcome::Incorrect => summary.incorrect += 1,
                Outcome::Known => summary.known += 1,
                Outcome::Unknown => summary.unknown += 1,
            }
        }

        if recorded != total {
            return Err(SessionSummaryError::CountMismatch { total, recorded });
        }

        Ok(summary)
    }

    #[must_use]
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> usize {
        self.incorrect
    }

    #[must_use]
    pub fn known(&self) -> usize {
        self.known
    }

    #[must_use]
    pub fn unknown(&self) -> usize {
        self.unknown
    }

    #[must_use]
    pub fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Correct => self.correct,
            Outcome::Incorrect => self.incorrect,
            Outcome::Known => self.known,
            Outcome::Unknown => self.unknown,
        }
    }

    /// Count of the outcome that scores for this session kind.
    #[must_use]
    pub fn positive(&self) -> usize {
        self.count(self.kind.positive_outcome())
    }

    /// Score as a percentage of all items, unrounded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score_percent(&self) -> f64 {
        self.positive() as f64 * 100.0 / self.total as f64
    }

    /// Score rounded for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rounded_percent(&self) -> u32 {
        self.score_percent().round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn four_of_five_scores_eighty() {
        let outcomes = [
            Outcome::Correct,
            Outcome::Correct,
            Outcome::Incorrect,
            Outcome::Correct,
            Outcome::Correct,
        ];
        let summary =
            SessionSummary::from_outcomes(SessionKind::Quiz, 5, outcomes, fixed_now(), fixed_now())
                .unwrap();

        assert_eq!(summary.correct(), 4);
        assert_eq!(summary.incorrect(), 1);
        assert!((summary.score_percent() - 80.0).abs() < f64::EPSILON);
        assert_eq!(summary.rounded_percent(), 80);
    }

    #[test]
    fn thirds_round_for_display_only() {
        let outcomes = [Outcome::Known, Outcome::Unknown, Outcome::Unknown];
        let summary = SessionSummary::from_outcomes(
            SessionKind::Flashcard,
            3,
            outcomes,
            fixed_now(),
            fixed_now(),
        )
        .unwrap();

        assert!(summary.score_percent() > 33.3 && summary.score_percent() < 33.4);
        assert_eq!(summary.rounded_percent(), 33);
    }

    #[test]
    fn rejects_missing_outcomes() {
        let err = SessionSummary::from_outcomes(
            SessionKind::Quiz,
            2,
            [Outcome::Correct],
            fixed_now(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, SessionSummaryError::CountMismatch { total: 2, recorded: 1 });
    }

    #[test]
    fn rejects_outcomes_of_the_other_kind() {
        let err = SessionSummary::from_outcomes(
            SessionKind::Quiz,
            1,
            [Outcome::Known],
            fixed_now(),
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, SessionSummaryError::ForeignOutcome { .. }));
    }

    #[test]
    fn rejects_inverted_time_range() {
        let later = fixed_now() + chrono::Duration::minutes(5);
        let err = SessionSummary::from_outcomes(
            SessionKind::Quiz,
            1,
            [Outcome::Correct],
            later,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, SessionSummaryError::InvalidTimeRange);
    }
}
