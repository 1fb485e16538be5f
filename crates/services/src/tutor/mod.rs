mod answering;
mod chat;
mod config;

pub use answering::{
    AnsweringService, FOLLOW_UP_QUESTIONS, HttpAnsweringService, MockAnsweringService,
    answering_service_for, mock_answer,
};
pub use chat::{
    ChatMessage, ChatRole, FALLBACK_MESSAGE, QUICK_PROMPTS, ToolAction, TutorChat, TutorTool,
    UnknownTool, WELCOME_MESSAGE,
};
pub use config::{
    ENV_ASK_BASE_URL, ENV_TUTOR_LEVEL, ENV_TUTOR_SUBJECT, settings_from_env, settings_from_lookup,
};
