use serde::{Deserialize, Serialize};
use std::fmt;

/// The flow a session runs: graded multiple choice, or self-assessed flashcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    Quiz,
    Flashcard,
}

impl SessionKind {
    /// Whether the answer side must be shown before an outcome can be recorded.
    #[must_use]
    pub fn requires_reveal(self) -> bool {
        matches!(self, SessionKind::Flashcard)
    }

    /// The outcome that counts towards the score for this kind.
    #[must_use]
    pub fn positive_outcome(self) -> Outcome {
        match self {
            SessionKind::Quiz => Outcome::Correct,
            SessionKind::Flashcard => Outcome::Known,
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Quiz => f.write_str("quiz"),
            SessionKind::Flashcard => f.write_str("flashcards"),
        }
    }
}

/// Recorded judgment for one item.
///
/// - `Correct` / `Incorrect`: computed by grading a quiz choice
/// - `Known` / `Unknown`: self-reported after revealing a flashcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Correct,
    Incorrect,
    Known,
    Unknown,
}

impl Outcome {
    /// Session kind this outcome belongs to.
    #[must_use]
    pub fn kind(self) -> SessionKind {
        match self {
            Outcome::Correct | Outcome::Incorrect => SessionKind::Quiz,
            Outcome::Known | Outcome::Unknown => SessionKind::Flashcard,
        }
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self == self.kind().positive_outcome()
    }

    /// Map a self-assessment to the flashcard outcome.
    #[must_use]
    pub fn from_recall(known: bool) -> Self {
        if known { Outcome::Known } else { Outcome::Unknown }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_outcomes_per_kind() {
        assert!(Outcome::Correct.is_positive());
        assert!(Outcome::Known.is_positive());
        assert!(!Outcome::Incorrect.is_positive());
        assert!(!Outcome::Unknown.is_positive());
    }

    #[test]
    fn only_flashcards_require_reveal() {
        assert!(SessionKind::Flashcard.requires_reveal());
        assert!(!SessionKind::Quiz.requires_reveal());
    }

    #[test]
    fn recall_maps_to_flashcard_outcomes() {
        assert_eq!(Outcome::from_recall(true), Outcome::Known);
        assert_eq!(Outcome::from_recall(false).kind(), SessionKind::Flashcard);
    }
}
