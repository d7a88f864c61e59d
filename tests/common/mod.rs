#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use askai::services::ask_ai::AskAi;
use askai::services::chat_api_http::HttpChatApi;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TAPNEX_ANSWER: &str = "Tapnex is an innovative event technology platform founded by Prabhav Jain.\n\n• Volunteer Management\n• Cashless Access Control";

pub fn api_for(server: &MockServer) -> HttpChatApi {
    HttpChatApi::builder().base_url(server.uri()).build()
}

pub fn ask_ai_for(server: &MockServer, timeout: Duration) -> AskAi {
    AskAi::builder()
        .chat_api(Arc::new(api_for(server)))
        .timeout(timeout)
        .build()
}

pub async fn mount_answer(server: &MockServer, question: &str, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "question": question })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": answer })))
        .mount(server)
        .await;
}

pub async fn mount_chat(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn mount_health(server: &MockServer, rag_enabled: bool) {
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy", "rag_enabled": rag_enabled })))
        .mount(server)
        .await;
}

pub async fn mount_warmup(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/warmup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "RAG system warmed up successfully" })))
        .mount(server)
        .await;
}

pub async fn chat_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path().ends_with("/chat"))
        .count()
}
