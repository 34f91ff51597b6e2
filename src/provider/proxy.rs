//! Client for the `/api/translate` proxy endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ProviderFailure};
use crate::provider::{build_client, ProviderRequest, TranslationProvider};

/// Provider that delegates to a running translation proxy.
pub struct HttpProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpProvider {
    /// `server_url` is the proxy base URL, for example `http://localhost:5000`.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, AppError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: format!("{}/api/translate", server_url.trim_end_matches('/')),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxyRequest<'a> {
    text: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProxyResponse {
    translated_text: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

#[async_trait]
impl TranslationProvider for HttpProvider {
    async fn translate(&self, req: ProviderRequest) -> Result<String, ProviderFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ProxyRequest {
                text: &req.phrase,
                target_lang: &req.target_language_name,
            })
            .send()
            .await
            .map_err(|err| {
                ProviderFailure::new(format!(
                    "failed to reach translation server: {}",
                    err.without_url()
                ))
            })?;

        let status = response.status();
        let body: ProxyResponse = response.json().await.map_err(|err| {
            ProviderFailure::new(format!(
                "invalid response from translation server (HTTP {status}): {}",
                err.without_url()
            ))
        })?;

        match body {
            ProxyResponse {
                error: Some(error),
                message,
                ..
            } => Err(ProviderFailure::new(match message {
                Some(detail) => format!("{error}: {detail}"),
                None => error,
            })),
            ProxyResponse {
                translated_text: Some(text),
                ..
            } => Ok(text),
            _ => Err(ProviderFailure::new(format!(
                "translation server returned no text (HTTP {status})"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::HttpProvider;
    use crate::provider::test_support::spawn_stub;
    use crate::provider::{ProviderRequest, TranslationProvider};

    async fn fake_proxy(Json(body): Json<Value>) -> axum::response::Response {
        match (body["text"].as_str(), body["targetLang"].as_str()) {
            (Some("limit"), _) => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"error": "Too many requests. Please try again later."})),
            )
                .into_response(),
            (Some("boom"), _) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Translation failed", "message": "quota exceeded"})),
            )
                .into_response(),
            (Some(text), Some("Spanish")) => {
                Json(json!({"translatedText": format!("es:{text}")})).into_response()
            }
            _ => (StatusCode::BAD_REQUEST, "not json").into_response(),
        }
    }

    async fn provider() -> HttpProvider {
        let base = spawn_stub(Router::new().route("/api/translate", post(fake_proxy))).await;
        HttpProvider::new(&base, Duration::from_secs(5)).expect("provider")
    }

    fn request(phrase: &str, language: &str) -> ProviderRequest {
        ProviderRequest {
            phrase: phrase.to_string(),
            target_language_name: language.to_string(),
        }
    }

    #[tokio::test]
    async fn sends_language_name_and_returns_text() {
        let provider = provider().await;
        let text = provider
            .translate(request("good night", "Spanish"))
            .await
            .expect("translation");
        assert_eq!(text, "es:good night");
    }

    #[tokio::test]
    async fn rate_limit_error_becomes_failure() {
        let provider = provider().await;
        let err = provider
            .translate(request("limit", "Spanish"))
            .await
            .expect_err("should fail");
        assert_eq!(err.message, "Too many requests. Please try again later.");
    }

    #[tokio::test]
    async fn upstream_detail_is_appended() {
        let provider = provider().await;
        let err = provider
            .translate(request("boom", "Spanish"))
            .await
            .expect_err("should fail");
        assert_eq!(err.message, "Translation failed: quota exceeded");
    }

    #[tokio::test]
    async fn non_json_body_is_a_failure() {
        let provider = provider().await;
        let err = provider
            .translate(request("hello", "French"))
            .await
            .expect_err("should fail");
        assert!(err.message.contains("HTTP 400"));
    }
}
