use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{ReviewProvider, ReviewRequest};
use crate::config::{
    ProviderKind, ProviderSettings, ANTHROPIC_MAX_TOKENS, ANTHROPIC_VERSION, PDF_MEDIA_TYPE,
};
use crate::document::encode_document;
use crate::error::ProviderError;
use crate::http::send_json;

/// Anthropic Messages API adapter.
pub struct AnthropicAdapter {
    client: Client,
    settings: ProviderSettings,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Document { source: DocumentSource<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct DocumentSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'static str,
    data: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    text: Option<String>,
}

impl AnthropicAdapter {
    pub fn new(client: Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }
}

impl ReviewProvider for AnthropicAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    fn review(&self, request: &ReviewRequest<'_>) -> Result<String, ProviderError> {
        let api_key = self.settings.require_api_key()?;
        let document = encode_document(request.document)?;

        let body = MessagesRequest {
            model: request.model,
            max_tokens: ANTHROPIC_MAX_TOKENS,
            system: request.guidance,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Document {
                        source: DocumentSource {
                            kind: "base64",
                            media_type: PDF_MEDIA_TYPE,
                            data: &document.base64,
                        },
                    },
                    ContentBlock::Text {
                        text: request.prompt,
                    },
                ],
            }],
        };

        let url = format!("{}/v1/messages", self.settings.base_url);
        let response: MessagesResponse = send_json(
            self.kind(),
            self.client
                .post(&url)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body),
        )?;

        // The review is the first text block of the reply
        response
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or(ProviderError::EmptyResponse {
                provider: self.kind(),
            })
    }
}
