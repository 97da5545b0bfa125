use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::CoreError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MODEL: &str = "gemini-2.5-flash";

/// Instruction sent alongside a portfolio screenshot. The response is
/// expected (not guaranteed) to be delimited tabular text; whatever
/// comes back is fed to the record parser as an opaque blob.
pub const EXTRACTION_PROMPT: &str =
    "Read the table in this image and return it as CSV content only, \
     with no commentary or markdown.";

/// Image-to-text collaborator boundary. Implementations turn a
/// screenshot into raw text; the core never interprets the image.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Human-readable name (for logs/errors).
    fn name(&self) -> &str;

    /// Analyze an image file with a text prompt, returning raw text.
    async fn analyze(&self, image_path: &Path, prompt: &str) -> Result<String, CoreError>;
}

/// Gemini multimodal implementation of [`ImageAnalyzer`] over the
/// Generative Language REST API. The image is inlined base64-encoded.
pub struct GeminiAnalyzer {
    client: Client,
    api_key: String,
}

impl GeminiAnalyzer {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    fn mime_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => "image/jpeg",
        }
    }
}

// ── Gemini API response types ───────────────────────────────────────

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl ImageAnalyzer for GeminiAnalyzer {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn analyze(&self, image_path: &Path, prompt: &str) -> Result<String, CoreError> {
        let bytes = std::fs::read(image_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CoreError::InputFileNotFound(image_path.display().to_string())
            } else {
                CoreError::FileIO(format!("{}: {e}", image_path.display()))
            }
        })?;

        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": Self::mime_type(image_path),
                            "data": BASE64.encode(&bytes),
                        }
                    },
                    { "text": prompt },
                ]
            }]
        });

        let url = format!("{BASE_URL}/{MODEL}:generateContent");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(CoreError::Api {
                provider: "Gemini".into(),
                message,
            });
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| CoreError::Api {
            provider: "Gemini".into(),
            message: format!("failed to parse response: {e}"),
        })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(CoreError::Api {
                provider: "Gemini".into(),
                message: "model returned no text".into(),
            });
        }

        Ok(text)
    }
}
