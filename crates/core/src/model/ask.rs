use serde::{Deserialize, Serialize};

/// Question sent to the answering service.
///
/// `subject` and `level` are free-form tags; no values are enumerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub level: String,
}

impl AskRequest {
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        subject: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            subject: subject.into(),
            level: level.into(),
        }
    }
}

/// Free-text answer with suggested follow-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub answer: String,
    pub subject: String,
    pub level: String,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}
