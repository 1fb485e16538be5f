use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use edu_core::model::{AskRequest, AskResponse, TutorSettings};

use crate::error::AnswerError;

/// Fixed follow-ups offered with every mock answer.
pub const FOLLOW_UP_QUESTIONS: [&str; 3] = [
    "Would you like a more detailed explanation?",
    "Can I help with a worked example problem?",
    "Is there a related topic you'd like to study?",
];

/// Free-text question answering, consumed by the tutor chat.
#[async_trait]
pub trait AnsweringService: Send + Sync {
    /// Answer `request`.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` when the answer cannot be obtained.
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, AnswerError>;
}

/// Build the templated mock answer; no inference happens here.
#[must_use]
pub fn mock_answer(request: &AskRequest) -> AskResponse {
    let answer = format!(
        "This is the answer to your question about {}: \"{}\". The platform will soon \
         integrate with Gemini, GPT-4 and other AI providers to give better answers.",
        request.subject, request.question
    );
    AskResponse {
        answer,
        subject: request.subject.clone(),
        level: request.level.clone(),
        follow_up_questions: FOLLOW_UP_QUESTIONS.iter().map(|q| (*q).to_string()).collect(),
    }
}

/// In-process stand-in for the answering endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAnsweringService;

#[async_trait]
impl AnsweringService for MockAnsweringService {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, AnswerError> {
        Ok(mock_answer(request))
    }
}

/// Client for a remote `POST /api/ask` endpoint.
#[derive(Clone, Debug)]
pub struct HttpAnsweringService {
    client: Client,
    base_url: String,
}

impl HttpAnsweringService {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/api/ask", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl AnsweringService for HttpAnsweringService {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, AnswerError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnswerError::HttpStatus(response.status()));
        }

        let mut body: AskResponse = response.json().await?;
        let answer = body.answer.trim().to_string();
        if answer.is_empty() {
            return Err(AnswerError::EmptyResponse);
        }
        body.answer = answer;
        Ok(body)
    }
}

/// Pick the remote client when a base URL is configured, the mock otherwise.
#[must_use]
pub fn answering_service_for(settings: &TutorSettings) -> Arc<dyn AnsweringService> {
    match settings.ask_base_url() {
        Some(base_url) => Arc::new(HttpAnsweringService::new(base_url)),
        None => Arc::new(MockAnsweringService),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_answer_echoes_request_tags() {
        let request = AskRequest::new("What is a mole?", "chemistry", "adaptive");
        let response = MockAnsweringService.ask(&request).await.unwrap();

        assert!(response.answer.contains("about chemistry: \"What is a mole?\""));
        assert_eq!(response.subject, "chemistry");
        assert_eq!(response.level, "adaptive");
        assert_eq!(response.follow_up_questions.len(), 3);
    }

    #[test]
    fn endpoint_joins_base_url() {
        let service = HttpAnsweringService::new("http://localhost:3000/");
        assert_eq!(service.endpoint(), "http://localhost:3000/api/ask");
    }

    #[tokio::test]
    async fn default_settings_use_the_mock() {
        let service = answering_service_for(&TutorSettings::default());
        let response = service
            .ask(&AskRequest::new("q", "math", "easy"))
            .await
            .unwrap();
        assert_eq!(response, mock_answer(&AskRequest::new("q", "math", "easy")));
    }
}
