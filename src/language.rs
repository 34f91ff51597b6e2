//! Supported target languages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// Target language accepted by the resolver and the proxy.
///
/// The dictionary is keyed by [`LanguageTag::code`]; the remote provider is
/// addressed by [`LanguageTag::name`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageTag {
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Chinese,
    Japanese,
    Korean,
    Russian,
    Arabic,
    Hindi,
}

const ALL: [LanguageTag; 11] = [
    LanguageTag::Spanish,
    LanguageTag::French,
    LanguageTag::German,
    LanguageTag::Italian,
    LanguageTag::Portuguese,
    LanguageTag::Chinese,
    LanguageTag::Japanese,
    LanguageTag::Korean,
    LanguageTag::Russian,
    LanguageTag::Arabic,
    LanguageTag::Hindi,
];

impl LanguageTag {
    /// Parses a language code such as `"es"`, ignoring case and surrounding
    /// whitespace.
    pub fn parse(raw: &str) -> Result<Self, TranslateError> {
        let code = raw.trim();
        ALL.into_iter()
            .find(|tag| tag.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| TranslateError::UnsupportedLanguage {
                code: code.to_string(),
            })
    }

    /// Returns every supported language in display order.
    pub fn all() -> &'static [LanguageTag] {
        &ALL
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
            Self::Italian => "it",
            Self::Portuguese => "pt",
            Self::Chinese => "zh",
            Self::Japanese => "ja",
            Self::Korean => "ko",
            Self::Russian => "ru",
            Self::Arabic => "ar",
            Self::Hindi => "hi",
        }
    }

    /// English language name sent to the remote provider.
    pub fn name(self) -> &'static str {
        match self {
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::Italian => "Italian",
            Self::Portuguese => "Portuguese",
            Self::Chinese => "Chinese",
            Self::Japanese => "Japanese",
            Self::Korean => "Korean",
            Self::Russian => "Russian",
            Self::Arabic => "Arabic",
            Self::Hindi => "Hindi",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = TranslateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.code().to_string()
    }
}
