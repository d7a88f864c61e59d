use std::sync::Arc;
use std::time::Duration;

use askai::services::ask_ai::{AskAi, FALLBACK_MESSAGE, TIMEOUT_MESSAGE};
use askai::services::chat_api_http::HttpChatApi;
use askai::services::settings::AppConfig;
use askai::build_ask_ai;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use crate::common::{TAPNEX_ANSWER, ask_ai_for, chat_requests, mount_answer, mount_chat};

#[tokio::test]
async fn returns_answer_verbatim() {
    let server = MockServer::start().await;
    mount_answer(&server, "What is Tapnex?", TAPNEX_ANSWER).await;

    let out = ask_ai_for(&server, Duration::from_secs(30)).ask("What is Tapnex?").await;

    assert_eq!(out, TAPNEX_ANSWER);
}

#[tokio::test]
async fn answer_whitespace_is_not_trimmed() {
    let server = MockServer::start().await;
    mount_answer(&server, "q", "\n  indented answer  \n").await;

    let out = ask_ai_for(&server, Duration::from_secs(30)).ask("q").await;

    assert_eq!(out, "\n  indented answer  \n");
}

#[tokio::test]
async fn sends_single_json_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "question": "Tell me about RAG" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "FAISS + Groq." })))
        .expect(1)
        .named("chat POST /chat")
        .mount(&server)
        .await;

    let out = ask_ai_for(&server, Duration::from_secs(30)).ask("Tell me about RAG").await;

    assert_eq!(out, "FAISS + Groq.");
}

#[rstest]
#[case(500, r#"{"detail": "Internal Server Error"}"#)]
#[case(502, "Bad Gateway")]
#[case(404, r#"{"detail": "Not Found"}"#)]
#[case(429, "")]
#[tokio::test]
async fn non_success_status_falls_back(#[case] status: u16, #[case] body: &str) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let out = ask_ai_for(&server, Duration::from_secs(30)).ask("What is Tapnex?").await;

    assert_eq!(out, FALLBACK_MESSAGE);
}

#[rstest]
#[case::empty_answer(r#"{"answer": ""}"#)]
#[case::blank_answer(r#"{"answer": "  \n\t"}"#)]
#[case::missing_answer(r#"{"response": "wrong field"}"#)]
#[case::null_answer(r#"{"answer": null}"#)]
#[case::numeric_answer(r#"{"answer": 42}"#)]
#[case::not_json("<html>oops</html>")]
#[case::empty_body("")]
#[tokio::test]
async fn unusable_success_body_falls_back(#[case] body: &str) {
    let server = MockServer::start().await;
    mount_chat(
        &server,
        ResponseTemplate::new(200).insert_header("content-type", "application/json").set_body_string(body),
    )
    .await;

    let out = ask_ai_for(&server, Duration::from_secs(30)).ask("What is Tapnex?").await;

    assert_eq!(out, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    mount_chat(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({ "answer": "too late" }))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let ai = ask_ai_for(&server, Duration::from_millis(300));
    let started = std::time::Instant::now();
    let out = ai.ask("Explain everything in detail").await;

    assert_eq!(out, TIMEOUT_MESSAGE);
    assert!(started.elapsed() < Duration::from_secs(5), "request must be aborted at the deadline");
}

#[tokio::test]
async fn missing_base_url_makes_no_request() {
    let server = MockServer::start().await;
    mount_answer(&server, "What is Tapnex?", TAPNEX_ANSWER).await;

    let ai = build_ask_ai(&AppConfig::default()).unwrap();
    let out = ai.ask("What is Tapnex?").await;

    assert_eq!(out, FALLBACK_MESSAGE);
    assert_eq!(chat_requests(&server).await, 0);
}

#[tokio::test]
async fn unreachable_backend_falls_back() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let api = HttpChatApi::builder().base_url(uri).build();
    let ai = AskAi::builder().chat_api(Arc::new(api)).build();

    assert_eq!(ai.ask("anyone there?").await, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn relative_base_resolves_against_origin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "proxied" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cfg = AppConfig::default();
    cfg.chat.base_url = Some("/api".to_string());
    cfg.chat.origin = Some(server.uri());
    let ai = build_ask_ai(&cfg).unwrap();

    assert_eq!(ai.ask("via proxy").await, "proxied");
}

#[tokio::test]
async fn base_with_path_prefix_and_trailing_slash() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "prefixed" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cfg = AppConfig::default();
    cfg.chat.base_url = Some(format!("{}/v1/", server.uri()));

    assert_eq!(build_ask_ai(&cfg).unwrap().ask("q").await, "prefixed");
}

#[tokio::test]
async fn concurrent_calls_do_not_interfere() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "question": "slow one" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "answer": "slow answer" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_answer(&server, "fast one", "fast answer").await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "question": "broken one" })))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let ai = ask_ai_for(&server, Duration::from_secs(30));
    let (slow, fast, broken) = tokio::join!(ai.ask("slow one"), ai.ask("fast one"), ai.ask("broken one"));

    assert_eq!(slow, "slow answer");
    assert_eq!(fast, "fast answer");
    assert_eq!(broken, FALLBACK_MESSAGE);
    assert_eq!(chat_requests(&server).await, 3);
}

#[tokio::test]
async fn ask_all_keeps_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "question": "first" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "answer": "1" }))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    mount_answer(&server, "second", "2").await;

    let ai = ask_ai_for(&server, Duration::from_secs(30));
    let out = ai.ask_all(&["first".to_string(), "second".to_string()]).await;

    assert_eq!(out, vec!["1".to_string(), "2".to_string()]);
}

#[tokio::test]
async fn one_timeout_does_not_affect_other_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "question": "hang" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "x" })).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    mount_answer(&server, "quick", "quick answer").await;

    let ai = ask_ai_for(&server, Duration::from_millis(500));
    let (hung, quick) = tokio::join!(ai.ask("hang"), ai.ask("quick"));

    assert_eq!(hung, TIMEOUT_MESSAGE);
    assert_eq!(quick, "quick answer");
}
