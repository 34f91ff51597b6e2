//! Offline/online translation fallback.
//!
//! The resolver decides whether a phrase is served from the
//! [`OfflineDictionary`] or delegated to a [`TranslationProvider`]:
//!
//! - offline preferred or unreachable: dictionary first; on a miss, the
//!   provider when reachable, otherwise [`TranslateError::NoOfflineTranslation`];
//! - otherwise: straight to the provider.
//!
//! It keeps no state between calls and never retries a failed provider call.

use std::sync::Arc;

use tracing::debug;

use crate::dictionary::OfflineDictionary;
use crate::error::TranslateError;
use crate::language::LanguageTag;
use crate::provider::{ProviderRequest, TranslationProvider};

/// Where a resolved translation came from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TranslationSource {
    Dictionary,
    Provider,
}

impl TranslationSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary",
            Self::Provider => "provider",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub target_language: LanguageTag,
    pub source: TranslationSource,
}

/// Per-call inputs supplied by the caller.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ResolveOptions {
    pub network_reachable: bool,
    pub offline_mode_preferred: bool,
}

pub struct TranslationResolver {
    dictionary: Arc<OfflineDictionary>,
    provider: Arc<dyn TranslationProvider>,
}

impl TranslationResolver {
    pub fn new(dictionary: Arc<OfflineDictionary>, provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            dictionary,
            provider,
        }
    }

    pub fn dictionary(&self) -> &OfflineDictionary {
        &self.dictionary
    }

    /// Translates `phrase` into the language named by `target_language_code`.
    pub async fn resolve(
        &self,
        phrase: &str,
        target_language_code: &str,
        opts: ResolveOptions,
    ) -> Result<Resolution, TranslateError> {
        if phrase.trim().is_empty() {
            return Err(TranslateError::EmptyInput);
        }
        let lang = LanguageTag::parse(target_language_code)?;

        if opts.offline_mode_preferred || !opts.network_reachable {
            if let Some(text) = self.dictionary.lookup(lang, phrase) {
                debug!(language = %lang, "served from offline dictionary");
                return Ok(Resolution {
                    text: text.to_string(),
                    target_language: lang,
                    source: TranslationSource::Dictionary,
                });
            }
            if !opts.network_reachable {
                return Err(TranslateError::NoOfflineTranslation);
            }
        }

        self.delegate(phrase, lang).await
    }

    async fn delegate(
        &self,
        phrase: &str,
        lang: LanguageTag,
    ) -> Result<Resolution, TranslateError> {
        debug!(language = %lang, "delegating to remote provider");
        let text = self
            .provider
            .translate(ProviderRequest {
                phrase: phrase.to_string(),
                target_language_name: lang.name().to_string(),
            })
            .await?;
        Ok(Resolution {
            text,
            target_language: lang,
            source: TranslationSource::Provider,
        })
    }
}
