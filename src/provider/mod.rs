//! Remote translation providers.
//!
//! The resolver and the HTTP proxy depend on the [`TranslationProvider`]
//! trait instead of a concrete client, so the Gemini backend and the
//! proxy client are interchangeable.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::error::{AppError, ProviderFailure};

pub mod gemini;
pub mod proxy;

/// Request sent to a provider. The language is addressed by its English
/// name, never by its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub phrase: String,
    pub target_language_name: String,
}

/// Contract implemented by remote translation services.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translates `req.phrase`. Failures are not retried by callers.
    async fn translate(&self, req: ProviderRequest) -> Result<String, ProviderFailure>;
}

/// Builds the server-side provider from configuration.
pub fn build_provider(cfg: &AppConfig) -> Result<Arc<dyn TranslationProvider>, AppError> {
    let timeout = Duration::from_secs(cfg.provider_timeout_secs as u64);
    Ok(Arc::new(gemini::GeminiProvider::new(
        cfg.gemini_base_url.clone(),
        cfg.gemini_model.clone(),
        cfg.gemini_api_key.clone(),
        timeout,
    )?))
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| AppError::internal(format!("failed to create HTTP client: {err}")))
}
