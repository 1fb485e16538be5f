//! Integration tests for the `/api/ask` endpoint

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use edu_core::model::{AskRequest, AskResponse};
use http_body_util::BodyExt;
use serde_json::Value;
use services::{AnsweringService, HttpAnsweringService, MockAnsweringService};
use tokio::net::TcpListener;
use tower::ServiceExt;

fn router() -> axum::Router {
    api::create_router(Arc::new(MockAnsweringService))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn post_returns_templated_answer() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"question":"What is Ohm's law?","subject":"physics","level":"adaptive"}"#,
        ))
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["subject"], "physics");
    assert_eq!(json["level"], "adaptive");
    assert!(
        json["answer"]
            .as_str()
            .unwrap()
            .contains("\"What is Ohm's law?\"")
    );
    assert_eq!(json["followUpQuestions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn other_methods_are_rejected() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/ask")
        .body(Body::empty())
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Method not allowed");
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn health_reports_ok() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn http_client_talks_to_live_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(api::serve(listener, Arc::new(MockAnsweringService)));

    let client = HttpAnsweringService::new(format!("http://{addr}"));
    let request = AskRequest::new("Tips for exams", "general", "adaptive");
    let response: AskResponse = client.ask(&request).await.unwrap();

    assert_eq!(response.subject, "general");
    assert!(response.answer.contains("\"Tips for exams\""));

    server.abort();
}
