use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{ReviewProvider, ReviewRequest};
use crate::config::{ProviderKind, ProviderSettings, PDF_MEDIA_TYPE};
use crate::document::encode_document;
use crate::error::ProviderError;
use crate::http::send_json;

/// OpenAI Responses API adapter.
pub struct OpenAiAdapter {
    client: Client,
    settings: ProviderSettings,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: Vec<InputContent<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputContent<'a> {
    InputText { text: &'a str },
    InputFile { filename: &'a str, file_data: String },
}

#[derive(Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

impl ResponsesResponse {
    /// Concatenate every `output_text` part of every message item.
    fn output_text(self) -> String {
        self.output
            .into_iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect()
    }
}

impl OpenAiAdapter {
    pub fn new(client: Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }
}

impl ReviewProvider for OpenAiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn review(&self, request: &ReviewRequest<'_>) -> Result<String, ProviderError> {
        let api_key = self.settings.require_api_key()?;
        let document = encode_document(request.document)?;

        let body = ResponsesRequest {
            model: request.model,
            input: vec![
                InputMessage {
                    role: "system",
                    content: vec![InputContent::InputText {
                        text: request.guidance,
                    }],
                },
                InputMessage {
                    role: "user",
                    content: vec![
                        InputContent::InputFile {
                            filename: &document.file_name,
                            file_data: document.data_url(PDF_MEDIA_TYPE),
                        },
                        InputContent::InputText {
                            text: request.prompt,
                        },
                    ],
                },
            ],
        };

        let url = format!("{}/v1/responses", self.settings.base_url);
        let response: ResponsesResponse = send_json(
            self.kind(),
            self.client.post(&url).bearer_auth(api_key).json(&body),
        )?;

        // Returned verbatim, even when empty
        Ok(response.output_text())
    }
}
