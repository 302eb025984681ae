//! Configuration constants and provider settings for the harvester.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{HarvesterError, ProviderError};

/// Prompt sent alongside the document and the reviewer guidance.
pub const USER_PROMPT: &str =
    "Please provide a detailed review of this paper following the guidance above.";

/// Default reviewer guidance file.
pub const DEFAULT_GUIDANCE_PATH: &str = "reviewer_guidance.txt";

/// Default number of attempts per model.
pub const DEFAULT_TRIES: usize = 10;

/// Default base output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// HTTP timeout in seconds.
///
/// Whole-document reviews routinely take minutes, well past the blocking
/// client's 30 second default.
pub const HTTP_TIMEOUT_SECS: u64 = 600;

/// Media type of review documents.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Anthropic `max_tokens` for a review.
pub const ANTHROPIC_MAX_TOKENS: u32 = 10 * 1024;

/// Anthropic API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Gemini sampling temperature.
pub const GEMINI_TEMPERATURE: f64 = 1.0;

/// The LLM services a review can be requested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Claude,
    Gemini,
}

impl ProviderKind {
    /// All providers in the order a batch visits them.
    pub const ALL: [ProviderKind; 3] = [Self::OpenAi, Self::Claude, Self::Gemini];

    /// Short name used on the command line and in log output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
        }
    }

    /// Models reviewed by default for this provider.
    #[must_use]
    pub fn default_models(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => &["gpt-5", "gpt-5-mini"],
            Self::Claude => &["claude-sonnet-4-5", "claude-haiku-4-5"],
            Self::Gemini => &["gemini-2.5-flash", "gemini-2.5-flash-lite"],
        }
    }

    /// Directory under the output base that receives this provider's reviews.
    #[must_use]
    pub fn output_dir(&self, output_base: &Path) -> PathBuf {
        output_base.join(format!("output_{}", self.as_str()))
    }

    #[must_use]
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com",
            Self::Claude => "https://api.anthropic.com",
            Self::Gemini => "https://generativelanguage.googleapis.com",
        }
    }

    /// Environment variables holding the API key, in lookup order.
    #[must_use]
    pub fn api_key_vars(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => &["OPENAI_API_KEY"],
            Self::Claude => &["ANTHROPIC_API_KEY"],
            Self::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
        }
    }

    /// Environment variable overriding the API base URL.
    #[must_use]
    pub fn base_url_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_BASE_URL",
            Self::Claude => "ANTHROPIC_BASE_URL",
            Self::Gemini => "GEMINI_BASE_URL",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = HarvesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "claude" | "anthropic" => Ok(Self::Claude),
            "gemini" | "google" => Ok(Self::Gemini),
            _ => Err(HarvesterError::UnknownProvider(s.to_string())),
        }
    }
}

/// Connection settings for one provider.
///
/// `Debug` is implemented by hand so the API key is never printed.
#[derive(Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// Missing keys surface as a per-attempt error, not a startup failure.
    pub api_key: Option<String>,
    pub base_url: String,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ProviderSettings {
    /// Load settings for `kind` from environment variables.
    pub fn from_env(kind: ProviderKind) -> Self {
        let api_key = kind
            .api_key_vars()
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));

        let base_url = std::env::var(kind.base_url_var())
            .unwrap_or_else(|_| kind.default_base_url().to_string());

        Self {
            kind,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The API key, or `MissingApiKey` naming the variable to set.
    pub fn require_api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingApiKey {
                provider: self.kind,
                var: self.kind.api_key_vars()[0],
            })
    }

    /// Create a settings builder, mainly for tests.
    pub fn builder(kind: ProviderKind) -> ProviderSettingsBuilder {
        ProviderSettingsBuilder {
            kind,
            api_key: None,
            base_url: kind.default_base_url().to_string(),
        }
    }
}

/// Builder for constructing `ProviderSettings` in tests.
pub struct ProviderSettingsBuilder {
    kind: ProviderKind,
    api_key: Option<String>,
    base_url: String,
}

impl ProviderSettingsBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> ProviderSettings {
        ProviderSettings {
            kind: self.kind,
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// HTTP timeout, overridable through `REVIEWBENCH_HTTP_TIMEOUT_SECS`.
pub fn http_timeout_secs() -> u64 {
    std::env::var("REVIEWBENCH_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(HTTP_TIMEOUT_SECS)
}
