//! Line-oriented interactive translation session.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::AppError;
use crate::history::TranslationRecord;
use crate::language::LanguageTag;
use crate::session::{SpeechOutput, TranslationSession, Utterance};
use crate::settings::{Settings, SettingsUpdate};

pub const HELP: &str = "\
commands:
  <text>                 translate text
  /undo, /redo           step through history
  /current               show the current translation
  /history               list all translations
  /settings              show the session settings
  /speak                 speak the current translation
  /lang <code>           change target language
  /offline on|off        simulate losing the network
  /prefer-offline on|off consult the dictionary first
  /autospeak on|off      speak every accepted translation
  /rate <0.5-2.0>        speech rate
  /help, /quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Translate(String),
    Undo,
    Redo,
    Current,
    History,
    Settings,
    Speak,
    Lang(LanguageTag),
    Offline(bool),
    PreferOffline(bool),
    AutoSpeak(bool),
    Rate(f32),
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(ReplCommand::Translate(line.to_string())));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    let cmd = match (name, arg) {
        ("undo", None) => ReplCommand::Undo,
        ("redo", None) => ReplCommand::Redo,
        ("current", None) => ReplCommand::Current,
        ("history", None) => ReplCommand::History,
        ("settings", None) => ReplCommand::Settings,
        ("speak", None) => ReplCommand::Speak,
        ("help", None) => ReplCommand::Help,
        ("quit" | "exit", None) => ReplCommand::Quit,
        ("lang", Some(code)) => {
            ReplCommand::Lang(LanguageTag::parse(code).map_err(|err| err.to_string())?)
        }
        ("offline", Some(flag)) => ReplCommand::Offline(parse_switch(flag)?),
        ("prefer-offline", Some(flag)) => ReplCommand::PreferOffline(parse_switch(flag)?),
        ("autospeak", Some(flag)) => ReplCommand::AutoSpeak(parse_switch(flag)?),
        ("rate", Some(raw)) => ReplCommand::Rate(
            raw.parse::<f32>()
                .map_err(|_| format!("invalid rate {raw:?}; expected a number"))?,
        ),
        _ => return Err(format!("unknown command /{rest}; try /help")),
    };
    if parts.next().is_some() {
        return Err(format!("too many arguments for /{name}"));
    }
    Ok(Some(cmd))
}

fn parse_switch(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("invalid switch {raw:?}; expected on/off")),
    }
}

/// Speech output for terminals: prints what a synthesizer would say.
#[derive(Debug, Default)]
pub struct ConsoleSpeech;

impl SpeechOutput for ConsoleSpeech {
    fn speak(&self, utterance: Utterance) {
        println!(
            "(speaking [{} @ {:.1}x]) {}",
            utterance.language, utterance.rate, utterance.text
        );
    }
}

/// Mutable per-run state the session itself does not own.
#[derive(Debug, Clone, Copy)]
pub struct ReplState {
    pub language: LanguageTag,
    pub network_reachable: bool,
}

/// Reads commands from `input` until EOF or `/quit`, writing results to `out`.
pub async fn run<R, W>(
    session: &mut TranslationSession,
    mut state: ReplState,
    input: R,
    out: &mut W,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|err| AppError::internal(format!("failed to read input: {err}")))?
    {
        let cmd = match parse_line(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(message) => {
                write_line(out, &format!("error: {message}"))?;
                continue;
            }
        };

        let reply = match cmd {
            ReplCommand::Quit => break,
            ReplCommand::Help => HELP.to_string(),
            ReplCommand::Translate(text) => {
                match session
                    .translate(&text, state.language.code(), state.network_reachable)
                    .await
                {
                    Ok(record) => format_record(&record),
                    Err(err) => format!("error: {err}"),
                }
            }
            // Stepping through history also restores that record's language.
            ReplCommand::Undo => match session.undo() {
                Some(record) => {
                    state.language = record.target_language;
                    format_record(record)
                }
                None => "nothing to undo".to_string(),
            },
            ReplCommand::Redo => match session.redo() {
                Some(record) => {
                    state.language = record.target_language;
                    format_record(record)
                }
                None => "nothing to redo".to_string(),
            },
            ReplCommand::Current => session
                .current()
                .map(format_record)
                .unwrap_or_else(|| "no translations yet".to_string()),
            ReplCommand::History => format_history(session),
            ReplCommand::Settings => format_settings(&session.settings()),
            ReplCommand::Speak => {
                if session.speak_current() {
                    continue;
                }
                "nothing to speak".to_string()
            }
            ReplCommand::Lang(lang) => {
                state.language = lang;
                format!("target language: {} ({})", lang.name(), lang.code())
            }
            ReplCommand::Offline(offline) => {
                state.network_reachable = !offline;
                format!("network reachable: {}", state.network_reachable)
            }
            ReplCommand::PreferOffline(value) => settings_reply(
                session,
                SettingsUpdate {
                    offline_mode_preferred: Some(value),
                    ..Default::default()
                },
            ),
            ReplCommand::AutoSpeak(value) => settings_reply(
                session,
                SettingsUpdate {
                    auto_speak: Some(value),
                    ..Default::default()
                },
            ),
            ReplCommand::Rate(rate) => settings_reply(
                session,
                SettingsUpdate {
                    speech_rate: Some(rate),
                    ..Default::default()
                },
            ),
        };
        write_line(out, &reply)?;
    }
    Ok(())
}

fn settings_reply(session: &mut TranslationSession, update: SettingsUpdate) -> String {
    match session.update_settings(update) {
        Ok(s) => format_settings(&s),
        Err(err) => format!("error: {err}"),
    }
}

fn format_settings(s: &Settings) -> String {
    format!(
        "prefer offline: {}, auto-speak: {}, rate: {:.1}x",
        s.offline_mode_preferred, s.auto_speak, s.speech_rate
    )
}

fn format_history(session: &TranslationSession) -> String {
    let history = session.history();
    if history.is_empty() {
        return "no translations yet".to_string();
    }
    let mut lines = vec![format!("{} translation(s):", history.len())];
    lines.extend(history.records().iter().enumerate().map(|(idx, record)| {
        let marker = if history.cursor() == Some(idx) { '*' } else { ' ' };
        format!("{marker} {idx}: {}", format_record(record))
    }));
    lines.join("\n")
}

pub fn format_record(record: &TranslationRecord) -> String {
    format!(
        "[{}] {} -> {}",
        record.target_language,
        record.input_text.trim(),
        record.output_text
    )
}

fn write_line<W: Write>(out: &mut W, line: &str) -> Result<(), AppError> {
    writeln!(out, "{line}")
        .map_err(|err| AppError::internal(format!("failed to write output: {err}")))
}
