//! Google Generative Language API backend.
//!
//! Translation is phrased as a single-turn `generateContent` prompt and the
//! first candidate's text is taken as the answer.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, ProviderFailure};
use crate::provider::{build_client, ProviderRequest, TranslationProvider};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Provider that forwards translation prompts to a Gemini model.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiProvider {
    pub fn new(
        base_url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            model,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model.trim_matches('/')
        )
    }
}

/// Builds the instruction sent to the model.
pub fn translation_prompt(phrase: &str, target_language_name: &str) -> String {
    format!(
        "Translate this text to {target_language_name}. Only provide the translation \
         without any additional text or explanation: {phrase}"
    )
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[async_trait]
impl TranslationProvider for GeminiProvider {
    async fn translate(&self, req: ProviderRequest) -> Result<String, ProviderFailure> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ProviderFailure::new(
                "translation provider API key is not configured; set GEMINI_API_KEY",
            ));
        };

        let prompt = translation_prompt(&req.phrase, &req.target_language_name);
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
        };

        debug!(
            model = %self.model,
            language = %req.target_language_name,
            "calling generateContent"
        );
        // Errors are stripped of their URL before they reach logs or clients.
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                ProviderFailure::new(format!(
                    "failed to reach Gemini API: {}",
                    err.without_url()
                ))
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| {
            ProviderFailure::new(format!(
                "failed to read Gemini response: {}",
                err.without_url()
            ))
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorEnvelope>(&bytes)
                .map(|env| env.error.message)
                .unwrap_or_else(|_| format!("Gemini API returned HTTP status {status}"));
            warn!(%status, error = %message, "Gemini API rejected translation request");
            return Err(ProviderFailure::new(message));
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|err| ProviderFailure::new(format!("invalid Gemini response: {err}")))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ProviderFailure::new("Gemini API returned no translation"))?;

        Ok(text)
    }
}
