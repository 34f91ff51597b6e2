//! Static phrase dictionary used for offline translation.

use std::collections::HashMap;

use crate::language::LanguageTag;

const BUILTIN: &[(LanguageTag, &[(&str, &str)])] = &[
    (
        LanguageTag::Spanish,
        &[
            ("hello", "hola"),
            ("goodbye", "adiós"),
            ("thank you", "gracias"),
            ("good morning", "buenos días"),
            ("please", "por favor"),
        ],
    ),
    (
        LanguageTag::French,
        &[
            ("hello", "bonjour"),
            ("goodbye", "au revoir"),
            ("thank you", "merci"),
            ("good morning", "bonjour"),
            ("please", "s'il vous plaît"),
        ],
    ),
    (
        LanguageTag::German,
        &[
            ("hello", "hallo"),
            ("goodbye", "auf wiedersehen"),
            ("thank you", "danke"),
            ("good morning", "guten morgen"),
            ("please", "bitte"),
        ],
    ),
    (
        LanguageTag::Hindi,
        &[
            ("hello", "नमस्ते"),
            ("goodbye", "अलविदा"),
            ("thank you", "धन्यवाद"),
            ("good morning", "सुप्रभात"),
            ("please", "कृपया"),
        ],
    ),
];

/// Normalizes a phrase into a dictionary key: lower-cased and trimmed.
///
/// Inner whitespace is kept as-is, so `"thank  you"` does not match
/// `"thank you"`.
pub fn normalize_phrase(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Read-only phrase table scoped per target language.
#[derive(Debug, Clone, Default)]
pub struct OfflineDictionary {
    entries: HashMap<LanguageTag, HashMap<String, String>>,
}

impl OfflineDictionary {
    /// Dictionary with the phrases shipped with the application.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN.iter().flat_map(|(lang, pairs)| {
            pairs
                .iter()
                .map(move |(source, target)| (*lang, *source, *target))
        }))
    }

    /// Builds a dictionary from `(language, source phrase, translation)`
    /// triples. Source phrases are normalized on insert; later duplicates win.
    pub fn from_entries<I, S, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (LanguageTag, S, T)>,
        S: AsRef<str>,
        T: Into<String>,
    {
        let mut map: HashMap<LanguageTag, HashMap<String, String>> = HashMap::new();
        for (lang, source, target) in entries {
            map.entry(lang)
                .or_default()
                .insert(normalize_phrase(source.as_ref()), target.into());
        }
        Self { entries: map }
    }

    /// Exact-match lookup of `phrase` after normalization.
    pub fn lookup(&self, lang: LanguageTag, phrase: &str) -> Option<&str> {
        self.entries
            .get(&lang)?
            .get(&normalize_phrase(phrase))
            .map(String::as_str)
    }

    /// Languages that have at least one entry.
    pub fn languages(&self) -> Vec<LanguageTag> {
        LanguageTag::all()
            .iter()
            .copied()
            .filter(|lang| self.entries.get(lang).is_some_and(|m| !m.is_empty()))
            .collect()
    }

    /// Total number of phrases across all languages.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
