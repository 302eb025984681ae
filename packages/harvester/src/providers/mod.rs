//! Provider adapters.
//!
//! Each adapter translates a [`ReviewRequest`] into one vendor's
//! document-plus-text request, issues it once, and returns the response text.
//! Errors are returned untouched; retrying is not the adapter's job.

mod anthropic;
mod gemini;
mod openai;

use std::path::Path;

use reqwest::blocking::Client;

use crate::config::{ProviderKind, ProviderSettings};
use crate::error::ProviderError;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;

/// Everything one review attempt sends to a provider.
#[derive(Debug, Clone, Copy)]
pub struct ReviewRequest<'a> {
    /// Path of the PDF to review.
    pub document: &'a Path,
    /// Reviewer guidance, sent as the system instruction.
    pub guidance: &'a str,
    /// User prompt sent after the document.
    pub prompt: &'a str,
    /// Model identifier.
    pub model: &'a str,
}

/// An LLM service that can review a document.
pub trait ReviewProvider {
    fn kind(&self) -> ProviderKind;

    /// Issue one review request and return the response text.
    fn review(&self, request: &ReviewRequest<'_>) -> Result<String, ProviderError>;
}

/// Build the adapter for `settings.kind`.
pub fn build_provider(settings: ProviderSettings, client: Client) -> Box<dyn ReviewProvider> {
    match settings.kind {
        ProviderKind::OpenAi => Box::new(OpenAiAdapter::new(client, settings)),
        ProviderKind::Claude => Box::new(AnthropicAdapter::new(client, settings)),
        ProviderKind::Gemini => Box::new(GeminiAdapter::new(client, settings)),
    }
}

/// Test utilities for provider consumers.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Mock provider returning scripted responses in order and recording
    /// the model of every call.
    pub struct MockProvider {
        kind: ProviderKind,
        responses: Mutex<Vec<Result<String, ProviderError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockProvider {
        pub fn new(kind: ProviderKind, responses: Vec<Result<String, ProviderError>>) -> Self {
            // Reverse so we can pop from the end
            let mut responses = responses;
            responses.reverse();
            Self {
                kind,
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_responses(kind: ProviderKind, contents: Vec<&str>) -> Self {
            Self::new(kind, contents.into_iter().map(|c| Ok(c.to_string())).collect())
        }

        /// Models requested so far, in call order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    impl ReviewProvider for MockProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn review(&self, request: &ReviewRequest<'_>) -> Result<String, ProviderError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(request.model.to_string());
            }
            self.responses
                .lock()
                .ok()
                .and_then(|mut r| r.pop())
                .unwrap_or(Err(ProviderError::EmptyResponse {
                    provider: self.kind,
                }))
        }
    }
}
