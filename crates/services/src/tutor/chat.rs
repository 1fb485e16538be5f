use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use edu_core::Clock;
use edu_core::model::{AskRequest, TutorSettings};

use super::answering::AnsweringService;

pub const WELCOME_MESSAGE: &str = "Hi! I'm your AI tutor, ready to help you learn anything. You can:\n\n\
    • Ask about any concept\n\
    • Request step-by-step explanations\n\
    • Ask for practice problems with solutions\n\
    • Have me summarize a topic\n\n\
    What would you like to learn today?";

/// Shown in place of an answer whenever the answering service fails.
pub const FALLBACK_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

pub const QUICK_PROMPTS: [&str; 6] = [
    "Explain the Pythagorean theorem with an example",
    "How does photosynthesis work?",
    "What is the difference between let, const, and var in JavaScript?",
    "Explain the periodic table of elements",
    "Tips for studying effectively for exams",
    "Quick ways to do multiplication in your head",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

//
// ─── TOOLS ─────────────────────────────────────────────────────────────────────
//

/// Shortcut buttons next to the chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorTool {
    Upload,
    Voice,
    Graph,
    Calculator,
    Quiz,
    Summarize,
}

/// What a tool does when picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAction {
    /// Put this text into the input box.
    Prefill(&'static str),
    /// Feature not available yet; show this notice.
    ComingSoon(&'static str),
}

impl TutorTool {
    pub const ALL: [TutorTool; 6] = [
        TutorTool::Upload,
        TutorTool::Voice,
        TutorTool::Graph,
        TutorTool::Calculator,
        TutorTool::Quiz,
        TutorTool::Summarize,
    ];

    #[must_use]
    pub fn action(self) -> ToolAction {
        match self {
            TutorTool::Upload => ToolAction::ComingSoon("Upload image feature coming soon!"),
            TutorTool::Voice => ToolAction::ComingSoon("Voice input feature coming soon!"),
            TutorTool::Graph => ToolAction::Prefill("Draw a graph of the function y = x² - 2x + 1"),
            TutorTool::Calculator => ToolAction::Prefill("Calculate: "),
            TutorTool::Quiz => ToolAction::Prefill("Create 5 quiz questions about "),
            TutorTool::Summarize => ToolAction::Prefill("Summarize the material on "),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TutorTool::Upload => "upload",
            TutorTool::Voice => "voice",
            TutorTool::Graph => "graph",
            TutorTool::Calculator => "calculator",
            TutorTool::Quiz => "quiz",
            TutorTool::Summarize => "summarize",
        }
    }
}

impl fmt::Display for TutorTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTool(pub String);

impl fmt::Display for UnknownTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tutor tool: {}", self.0)
    }
}

impl std::error::Error for UnknownTool {}

impl FromStr for TutorTool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TutorTool::ALL
            .into_iter()
            .find(|tool| tool.name() == wanted)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

//
// ─── CHAT ──────────────────────────────────────────────────────────────────────
//

/// Tutor conversation transcript.
///
/// Answering failures never surface to the caller: they are logged and replaced
/// with [`FALLBACK_MESSAGE`].
pub struct TutorChat {
    service: Arc<dyn AnsweringService>,
    clock: Clock,
    subject: String,
    level: String,
    messages: Vec<ChatMessage>,
    follow_ups: Vec<String>,
}

impl TutorChat {
    #[must_use]
    pub fn new(service: Arc<dyn AnsweringService>, clock: Clock, settings: &TutorSettings) -> Self {
        let welcome = ChatMessage {
            role: ChatRole::Assistant,
            content: WELCOME_MESSAGE.to_string(),
            sent_at: clock.now(),
        };
        Self {
            service,
            clock,
            subject: settings.subject().to_owned(),
            level: settings.level().to_owned(),
            messages: vec![welcome],
            follow_ups: Vec::new(),
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Follow-up suggestions from the most recent successful answer.
    #[must_use]
    pub fn follow_ups(&self) -> &[String] {
        &self.follow_ups
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    /// Send `input` to the tutor and append the reply.
    ///
    /// Returns `None` (and records nothing) for blank input.
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }

        self.push(ChatRole::User, input.to_string());
        let request = AskRequest::new(input, self.subject.clone(), self.level.clone());

        let reply = match self.service.ask(&request).await {
            Ok(response) => {
                self.follow_ups = response.follow_up_questions;
                response.answer
            }
            Err(err) => {
                tracing::warn!(error = %err, subject = %self.subject, "tutor answer failed");
                self.follow_ups.clear();
                FALLBACK_MESSAGE.to_string()
            }
        };

        self.push(ChatRole::Assistant, reply);
        self.messages.last()
    }

    fn push(&mut self, role: ChatRole, content: String) {
        self.messages.push(ChatMessage {
            role,
            content,
            sent_at: self.clock.now(),
        });
    }
}

impl fmt::Debug for TutorChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TutorChat")
            .field("subject", &self.subject)
            .field("level", &self.level)
            .field("messages_len", &self.messages.len())
            .finish_non_exhaustive()
    }
}
