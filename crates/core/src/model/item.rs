use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ItemId;
use crate::model::outcome::{Outcome, SessionKind};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemError {
    #[error("{field} cannot be empty")]
    EmptyText { field: &'static str },

    #[error("a question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    #[error("choice {choice} is out of range for {len} options")]
    ChoiceOutOfRange { choice: usize, len: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Multiple-choice question with exactly one correct option.
///
/// Deserialization goes through [`Question::new`], so a decoded question holds
/// the same invariants as a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: Option<String>,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::EmptyText` for a blank prompt or option,
    /// `ItemError::TooFewOptions` for fewer than two options, and
    /// `ItemError::CorrectIndexOutOfRange` if `correct_index` does not point at an option.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, ItemError> {
        let prompt = non_blank(prompt.into(), "question prompt")?;
        if options.len() < 2 {
            return Err(ItemError::TooFewOptions { len: options.len() });
        }
        let options = options
            .into_iter()
            .map(|option| non_blank(option, "question option"))
            .collect::<Result<Vec<_>, _>>()?;
        if correct_index >= options.len() {
            return Err(ItemError::CorrectIndexOutOfRange {
                index: correct_index,
                len: options.len(),
            });
        }

        Ok(Self {
            prompt,
            options,
            correct_index,
            explanation: None,
        })
    }

    /// Attach the worked explanation shown when reviewing answers.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        let explanation = explanation.into();
        let trimmed = explanation.trim();
        self.explanation = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Grade a selected option index.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::ChoiceOutOfRange` if `choice` is not an option index.
    pub fn grade(&self, choice: usize) -> Result<Outcome, ItemError> {
        if choice >= self.options.len() {
            return Err(ItemError::ChoiceOutOfRange {
                choice,
                len: self.options.len(),
            });
        }
        Ok(if choice == self.correct_index {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        })
    }
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// Two-sided flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CardRecord")]
pub struct CardFaces {
    front: String,
    back: String,
}

impl CardFaces {
    /// Create a validated card.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::EmptyText` if either face is blank.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Result<Self, ItemError> {
        Ok(Self {
            front: non_blank(front.into(), "card front")?,
            back: non_blank(back.into(), "card back")?,
        })
    }

    #[must_use]
    pub fn front(&self) -> &str {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &str {
        &self.back
    }
}

// Unvalidated wire shapes, only used as deserialization sources.

#[derive(Deserialize)]
struct QuestionRecord {
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    #[serde(default)]
    explanation: Option<String>,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = ItemError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let question = Question::new(record.prompt, record.options, record.correct_index)?;
        Ok(match record.explanation {
            Some(explanation) => question.with_explanation(explanation),
            None => question,
        })
    }
}

#[derive(Deserialize)]
struct CardRecord {
    front: String,
    back: String,
}

impl TryFrom<CardRecord> for CardFaces {
    type Error = ItemError;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        CardFaces::new(record.front, record.back)
    }
}

//
// ─── ITEM ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemPayload {
    Question(Question),
    Card(CardFaces),
}

/// One assessable unit of an item source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    payload: ItemPayload,
}

impl Item {
    #[must_use]
    pub fn new(id: ItemId, payload: ItemPayload) -> Self {
        Self { id, payload }
    }

    #[must_use]
    pub fn question(id: ItemId, question: Question) -> Self {
        Self::new(id, ItemPayload::Question(question))
    }

    #[must_use]
    pub fn card(id: ItemId, card: CardFaces) -> Self {
        Self::new(id, ItemPayload::Card(card))
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn payload(&self) -> &ItemPayload {
        &self.payload
    }

    #[must_use]
    pub fn kind(&self) -> SessionKind {
        match self.payload {
            ItemPayload::Question(_) => SessionKind::Quiz,
            ItemPayload::Card(_) => SessionKind::Flashcard,
        }
    }

    #[must_use]
    pub fn as_question(&self) -> Option<&Question> {
        match &self.payload {
            ItemPayload::Question(question) => Some(question),
            ItemPayload::Card(_) => None,
        }
    }

    #[must_use]
    pub fn as_card(&self) -> Option<&CardFaces> {
        match &self.payload {
            ItemPayload::Card(card) => Some(card),
            ItemPayload::Question(_) => None,
        }
    }
}

fn non_blank(value: String, field: &'static str) -> Result<String, ItemError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ItemError::EmptyText { field });
    }
    Ok(trimmed.to_string())
}
