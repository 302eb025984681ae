//! Adapter tests against mock vendor endpoints.
//!
//! The adapters use the blocking client, so each call runs on
//! `spawn_blocking` while wiremock serves from the async runtime.

use std::path::PathBuf;

use reviewbench_harvester::config::{ProviderKind, ProviderSettings, USER_PROMPT};
use reviewbench_harvester::http::create_client;
use reviewbench_harvester::providers::{build_provider, ReviewRequest};
use reviewbench_harvester::ProviderError;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PDF_BYTES: &[u8] = b"%PDF-1.4";
const PDF_BASE64: &str = "JVBERi0xLjQ=";

fn write_pdf(dir: &tempfile::TempDir) -> PathBuf {
    let pdf = dir.path().join("a0kq0tJwwn.pdf");
    std::fs::write(&pdf, PDF_BYTES).unwrap();
    pdf
}

/// Run one review on a blocking thread.
async fn review(
    kind: ProviderKind,
    base_url: String,
    api_key: Option<&'static str>,
    pdf: PathBuf,
    model: &'static str,
) -> Result<String, ProviderError> {
    tokio::task::spawn_blocking(move || {
        let mut builder = ProviderSettings::builder(kind).base_url(base_url);
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        let provider = build_provider(builder.build(), create_client().unwrap());
        provider.review(&ReviewRequest {
            document: &pdf,
            guidance: "You are a careful reviewer.",
            prompt: USER_PROMPT,
            model,
        })
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_anthropic_sends_document_block() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir);

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({
            "model": "claude-haiku-4-5",
            "max_tokens": 10240,
            "system": "You are a careful reviewer.",
            "messages": [{
                "role": "user",
                "content": [
                    {
                        "type": "document",
                        "source": {
                            "type": "base64",
                            "media_type": "application/pdf",
                            "data": PDF_BASE64
                        }
                    },
                    { "type": "text", "text": USER_PROMPT }
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg_test",
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "text", "text": "## Soundness: 3\nRating: **6**" }],
            "usage": { "input_tokens": 1000, "output_tokens": 200 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = review(
        ProviderKind::Claude,
        server.uri(),
        Some("test-key"),
        pdf,
        "claude-haiku-4-5",
    )
    .await
    .unwrap();

    assert_eq!(text, "## Soundness: 3\nRating: **6**");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_openai_sends_input_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir);

    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-5-mini",
            "input": [
                {
                    "role": "system",
                    "content": [{ "type": "input_text", "text": "You are a careful reviewer." }]
                },
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "input_file",
                            "filename": "a0kq0tJwwn.pdf",
                            "file_data": format!("data:application/pdf;base64,{PDF_BASE64}")
                        },
                        { "type": "input_text", "text": USER_PROMPT }
                    ]
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "resp_test",
            "object": "response",
            "output": [
                { "type": "reasoning", "id": "rs_1", "summary": [] },
                {
                    "type": "message",
                    "id": "msg_1",
                    "role": "assistant",
                    "content": [{ "type": "output_text", "text": "Presentation: 2", "annotations": [] }]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = review(
        ProviderKind::OpenAi,
        server.uri(),
        Some("sk-test"),
        pdf,
        "gpt-5-mini",
    )
    .await
    .unwrap();

    assert_eq!(text, "Presentation: 2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gemini_sends_inline_data() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "g-key"))
        .and(body_partial_json(serde_json::json!({
            "system_instruction": { "parts": [{ "text": "You are a careful reviewer." }] },
            "contents": [{
                "role": "user",
                "parts": [
                    { "inline_data": { "mime_type": "application/pdf", "data": PDF_BASE64 } },
                    { "text": USER_PROMPT }
                ]
            }],
            "generationConfig": { "temperature": 1.0 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Contribution: 3" }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = review(
        ProviderKind::Gemini,
        server.uri(),
        Some("g-key"),
        pdf,
        "gemini-2.5-flash",
    )
    .await
    .unwrap();

    assert_eq!(text, "Contribution: 3");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_error_is_returned_untouched() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir);

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(serde_json::json!({
            "type": "error",
            "error": { "type": "overloaded_error", "message": "Overloaded" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = review(
        ProviderKind::Claude,
        server.uri(),
        Some("test-key"),
        pdf,
        "claude-sonnet-4-5",
    )
    .await
    .unwrap_err();

    match err {
        ProviderError::Api {
            provider,
            status,
            message,
        } => {
            assert_eq!(provider, ProviderKind::Claude);
            assert_eq!(status, 529);
            assert_eq!(message, "Overloaded");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_candidates_is_an_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash-lite:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": []
        })))
        .mount(&server)
        .await;

    let err = review(
        ProviderKind::Gemini,
        server.uri(),
        Some("g-key"),
        pdf,
        "gemini-2.5-flash-lite",
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ProviderError::EmptyResponse { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_key_sends_no_request() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = review(ProviderKind::OpenAi, server.uri(), None, pdf, "gpt-5")
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::MissingApiKey { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_review_text_is_returned_verbatim() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir);

    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "output": [{
                "type": "message",
                "content": [{ "type": "output_text", "text": "" }]
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{ "type": "text", "text": "" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "" }] } }]
        })))
        .mount(&server)
        .await;

    let openai = review(ProviderKind::OpenAi, server.uri(), Some("k"), pdf.clone(), "gpt-5").await;
    assert_eq!(openai.unwrap(), "");

    let claude = review(
        ProviderKind::Claude,
        server.uri(),
        Some("k"),
        pdf.clone(),
        "claude-sonnet-4-5",
    )
    .await;
    assert_eq!(claude.unwrap(), "");

    let gemini = review(ProviderKind::Gemini, server.uri(), Some("k"), pdf, "gemini-2.5-flash").await;
    assert_eq!(gemini.unwrap(), "");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_candidate_without_text_parts_is_an_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(&dir);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [] }, "finishReason": "SAFETY" }]
        })))
        .mount(&server)
        .await;

    let err = review(ProviderKind::Gemini, server.uri(), Some("k"), pdf, "gemini-2.5-flash")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse { .. }));
}
