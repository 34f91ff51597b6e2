//! Per-user translation session.
//!
//! A session owns everything that used to be ambient UI state: settings, the
//! history ledger and the speech output. It is created when a user starts
//! translating and dropped when they are done.

use tracing::{debug, info};

use crate::error::{AppError, TranslateError};
use crate::history::{HistoryLedger, TranslationRecord};
use crate::language::LanguageTag;
use crate::resolver::{ResolveOptions, TranslationResolver};
use crate::settings::{Settings, SettingsUpdate};

/// Text handed to a speech synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: LanguageTag,
    pub rate: f32,
}

/// Sink for synthesized speech. Implementations cancel any utterance still
/// playing before starting the new one.
pub trait SpeechOutput: Send + Sync {
    fn speak(&self, utterance: Utterance);
}

pub struct TranslationSession {
    resolver: TranslationResolver,
    settings: Settings,
    history: HistoryLedger,
    speech: Option<Box<dyn SpeechOutput>>,
}

impl TranslationSession {
    pub fn new(resolver: TranslationResolver, settings: Settings) -> Self {
        Self {
            resolver,
            settings,
            history: HistoryLedger::new(),
            speech: None,
        }
    }

    /// Attaches a speech output used for auto-speak and [`Self::speak_current`].
    pub fn with_speech(mut self, speech: Box<dyn SpeechOutput>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Resolves `input` and records it in history on success.
    ///
    /// Failures leave history and settings untouched.
    pub async fn translate(
        &mut self,
        input: &str,
        target_language_code: &str,
        network_reachable: bool,
    ) -> Result<TranslationRecord, TranslateError> {
        let resolution = self
            .resolver
            .resolve(
                input,
                target_language_code,
                ResolveOptions {
                    network_reachable,
                    offline_mode_preferred: self.settings.offline_mode_preferred,
                },
            )
            .await?;

        info!(
            language = %resolution.target_language,
            source = resolution.source.as_str(),
            "translation accepted"
        );
        let record = TranslationRecord::new(input, resolution.text, resolution.target_language);
        self.history.append(record.clone());

        if self.settings.auto_speak {
            self.speak_current();
        }

        Ok(record)
    }

    pub fn undo(&mut self) -> Option<&TranslationRecord> {
        self.history.undo()
    }

    pub fn redo(&mut self) -> Option<&TranslationRecord> {
        self.history.redo()
    }

    pub fn current(&self) -> Option<&TranslationRecord> {
        self.history.current()
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<Settings, AppError> {
        self.settings.update(update)?;
        debug!(settings = ?self.settings, "settings updated");
        Ok(self.settings)
    }

    /// Speaks the current record's output. Returns `false` when there is
    /// nothing to speak or no speech output is attached.
    pub fn speak_current(&self) -> bool {
        let (Some(speech), Some(record)) = (self.speech.as_ref(), self.history.current()) else {
            return false;
        };
        speech.speak(Utterance {
            text: record.output_text.clone(),
            language: record.target_language,
            rate: self.settings.speech_rate,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::dictionary::OfflineDictionary;
    use crate::resolver::tests::RecordingProvider;

    #[derive(Clone, Default)]
    struct CapturedSpeech(Arc<Mutex<Vec<Utterance>>>);

    impl SpeechOutput for CapturedSpeech {
        fn speak(&self, utterance: Utterance) {
            self.0.lock().expect("speech lock").push(utterance);
        }
    }

    impl CapturedSpeech {
        fn spoken(&self) -> Vec<Utterance> {
            self.0.lock().expect("speech lock").clone()
        }
    }

    fn session(provider: Arc<RecordingProvider>) -> TranslationSession {
        let resolver = TranslationResolver::new(Arc::new(OfflineDictionary::builtin()), provider);
        TranslationSession::new(resolver, Settings::default())
    }

    #[tokio::test]
    async fn accepted_translations_are_appended() {
        let mut session = session(Arc::new(RecordingProvider::default()));

        let record = session.translate("Hello ", "es", true).await.expect("ok");
        assert_eq!(record.input_text, "Hello ");
        assert_eq!(record.output_text, "hola");
        assert_eq!(record.target_language, LanguageTag::Spanish);

        session.translate("good night", "fr", true).await.expect("ok");
        assert_eq!(session.history().len(), 2);
        assert_eq!(
            session.current().map(|r| r.output_text.as_str()),
            Some("[French] good night")
        );
        assert_eq!(session.undo().map(|r| r.output_text.as_str()), Some("hola"));
        assert_eq!(
            session.redo().map(|r| r.output_text.as_str()),
            Some("[French] good night")
        );
    }

    #[tokio::test]
    async fn failures_leave_history_untouched() {
        let mut session = session(Arc::new(RecordingProvider::failing("Translation failed")));
        session.translate("hello", "es", false).await.expect("ok");

        let err = session.translate("xyz", "es", false).await.expect_err("offline miss");
        assert_eq!(err, TranslateError::NoOfflineTranslation);
        let err = session.translate("xyz", "es", true).await.expect_err("provider");
        assert!(matches!(err, TranslateError::ProviderError { .. }));
        let err = session.translate("  ", "es", true).await.expect_err("empty");
        assert_eq!(err, TranslateError::EmptyInput);

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.current().map(|r| r.output_text.as_str()), Some("hola"));
    }

    #[tokio::test]
    async fn settings_drive_the_offline_preference() {
        let provider = Arc::new(RecordingProvider::default());
        let mut session = session(provider.clone());

        session.translate("hello", "es", true).await.expect("ok");
        assert_eq!(provider.call_count(), 0);

        session
            .update_settings(SettingsUpdate {
                offline_mode_preferred: Some(false),
                ..Default::default()
            })
            .expect("valid update");
        session.translate("hello", "es", true).await.expect("ok");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn auto_speak_emits_one_utterance_per_translation() {
        let speech = CapturedSpeech::default();
        let mut session =
            session(Arc::new(RecordingProvider::default())).with_speech(Box::new(speech.clone()));

        session.translate("hello", "de", true).await.expect("ok");
        assert!(speech.spoken().is_empty());

        session
            .update_settings(SettingsUpdate {
                auto_speak: Some(true),
                speech_rate: Some(1.5),
                ..Default::default()
            })
            .expect("valid update");
        session.translate("please", "de", true).await.expect("ok");
        let _ = session.translate("", "de", true).await;

        assert_eq!(
            speech.spoken(),
            vec![Utterance {
                text: "bitte".to_string(),
                language: LanguageTag::German,
                rate: 1.5,
            }]
        );
    }

    #[tokio::test]
    async fn speak_current_requires_a_record_and_output() {
        let speech = CapturedSpeech::default();
        let mut bare = session(Arc::new(RecordingProvider::default()));
        bare.translate("hello", "hi", true).await.expect("ok");
        assert!(!bare.speak_current());

        let mut session =
            session(Arc::new(RecordingProvider::default())).with_speech(Box::new(speech.clone()));
        assert!(!session.speak_current());
        session.translate("hello", "hi", true).await.expect("ok");
        assert!(session.speak_current());
        assert_eq!(speech.spoken()[0].text, "नमस्ते");
    }

    #[tokio::test]
    async fn invalid_settings_update_is_rejected() {
        let mut session = session(Arc::new(RecordingProvider::default()));
        assert!(session
            .update_settings(SettingsUpdate {
                speech_rate: Some(3.0),
                ..Default::default()
            })
            .is_err());
        assert_eq!(session.settings(), Settings::default());
    }
}
