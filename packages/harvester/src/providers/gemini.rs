use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{ReviewProvider, ReviewRequest};
use crate::config::{ProviderKind, ProviderSettings, GEMINI_TEMPERATURE, PDF_MEDIA_TYPE};
use crate::document::encode_document;
use crate::error::ProviderError;
use crate::http::send_json;

/// Gemini `generateContent` adapter.
pub struct GeminiAdapter {
    client: Client,
    settings: ProviderSettings,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'static str,
    data: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, concatenated, or `None` when that
    /// candidate has no text part at all.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let parts: Vec<String> = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!parts.is_empty()).then(|| parts.concat())
    }
}

impl GeminiAdapter {
    pub fn new(client: Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }
}

impl ReviewProvider for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn review(&self, request: &ReviewRequest<'_>) -> Result<String, ProviderError> {
        let api_key = self.settings.require_api_key()?;
        let document = encode_document(request.document)?;

        let body = GenerateRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part::Text {
                    text: request.guidance,
                }],
            },
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: PDF_MEDIA_TYPE,
                            data: &document.base64,
                        },
                    },
                    Part::Text {
                        text: request.prompt,
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: GEMINI_TEMPERATURE,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url, request.model
        );
        let response: GenerateResponse = send_json(
            self.kind(),
            self.client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&body),
        )?;

        response.text().ok_or(ProviderError::EmptyResponse {
            provider: self.kind(),
        })
    }
}
