//! Linear undo/redo log of accepted translations.

use serde::Serialize;

use crate::language::LanguageTag;

/// One accepted translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRecord {
    pub input_text: String,
    pub output_text: String,
    pub target_language: LanguageTag,
}

impl TranslationRecord {
    pub fn new(
        input_text: impl Into<String>,
        output_text: impl Into<String>,
        target_language: LanguageTag,
    ) -> Self {
        Self {
            input_text: input_text.into(),
            output_text: output_text.into(),
            target_language,
        }
    }
}

/// Append-only history with a cursor on the currently displayed record.
///
/// Records are never removed. Appending after an undo keeps the records past
/// the cursor and moves the cursor to the new last record, so a later undo
/// walks back through them.
#[derive(Debug)]
pub struct HistoryLedger {
    records: Vec<TranslationRecord>,
    // -1 when empty
    cursor: isize,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            cursor: -1,
        }
    }

    /// Adds `record` at the end and makes it current.
    pub fn append(&mut self, record: TranslationRecord) {
        self.records.push(record);
        self.cursor = self.records.len() as isize - 1;
    }

    /// Steps back one record. No-op when already at the first record or empty.
    pub fn undo(&mut self) -> Option<&TranslationRecord> {
        if self.cursor <= 0 {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Steps forward one record. No-op when already at the last record.
    pub fn redo(&mut self) -> Option<&TranslationRecord> {
        if self.cursor >= self.records.len() as isize - 1 {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    pub fn current(&self) -> Option<&TranslationRecord> {
        usize::try_from(self.cursor)
            .ok()
            .and_then(|idx| self.records.get(idx))
    }

    /// Index of the current record, `None` when empty.
    pub fn cursor(&self) -> Option<usize> {
        usize::try_from(self.cursor).ok()
    }

    pub fn records(&self) -> &[TranslationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(input: &str, output: &str) -> TranslationRecord {
        TranslationRecord::new(input, output, LanguageTag::Spanish)
    }

    fn assert_cursor_in_bounds(ledger: &HistoryLedger) {
        assert!(ledger.cursor >= -1);
        assert!(ledger.cursor < ledger.len() as isize);
        if ledger.is_empty() {
            assert_eq!(ledger.cursor, -1);
        }
    }

    #[test]
    fn empty_ledger_has_no_current_and_ignores_navigation() {
        let mut ledger = HistoryLedger::new();
        assert!(ledger.current().is_none());
        assert!(ledger.cursor().is_none());
        assert!(ledger.undo().is_none());
        assert!(ledger.redo().is_none());
        assert_cursor_in_bounds(&ledger);
    }

    #[test]
    fn default_matches_new() {
        let ledger = HistoryLedger::default();
        assert!(ledger.is_empty());
        assert!(ledger.current().is_none());
        assert!(ledger.cursor().is_none());
    }

    #[test]
    fn append_moves_cursor_to_last_record() {
        let mut ledger = HistoryLedger::new();
        ledger.append(record("a", "A"));
        assert_eq!(ledger.cursor(), Some(0));
        ledger.append(record("b", "B"));
        assert_eq!(ledger.cursor(), Some(1));
        assert_eq!(ledger.current().map(|r| r.output_text.as_str()), Some("B"));
    }

    #[test]
    fn undo_undo_redo_walks_the_log() {
        let mut ledger = HistoryLedger::new();
        ledger.append(record("a", "A"));
        ledger.append(record("b", "B"));
        ledger.append(record("c", "C"));
        assert_eq!(ledger.cursor(), Some(2));

        assert_eq!(ledger.undo().map(|r| r.input_text.as_str()), Some("b"));
        assert_eq!(ledger.cursor(), Some(1));
        assert_eq!(ledger.undo().map(|r| r.input_text.as_str()), Some("a"));
        assert_eq!(ledger.cursor(), Some(0));
        assert_eq!(ledger.redo().map(|r| r.input_text.as_str()), Some("b"));
        assert_eq!(ledger.cursor(), Some(1));
    }

    #[test]
    fn undo_at_first_record_is_noop() {
        let mut ledger = HistoryLedger::new();
        ledger.append(record("a", "A"));
        let before = ledger.current().cloned();
        assert!(ledger.undo().is_none());
        assert_eq!(ledger.current().cloned(), before);
        assert_eq!(ledger.cursor(), Some(0));
    }

    #[test]
    fn redo_at_last_record_is_noop() {
        let mut ledger = HistoryLedger::new();
        ledger.append(record("a", "A"));
        ledger.append(record("b", "B"));
        assert!(ledger.redo().is_none());
        assert_eq!(ledger.cursor(), Some(1));
        assert_eq!(ledger.current().map(|r| r.input_text.as_str()), Some("b"));
    }

    #[test]
    fn undo_then_redo_restores_current() {
        let mut ledger = HistoryLedger::new();
        for i in 0..4 {
            ledger.append(record(&format!("in{i}"), &format!("out{i}")));
        }
        ledger.undo();
        let before = ledger.current().cloned();
        ledger.undo();
        ledger.redo();
        assert_eq!(ledger.current().cloned(), before);
    }

    #[test]
    fn append_after_undo_keeps_records_past_the_cursor() {
        let mut ledger = HistoryLedger::new();
        ledger.append(record("a", "A"));
        ledger.append(record("b", "B"));
        ledger.append(record("c", "C"));
        ledger.undo();
        ledger.undo();

        ledger.append(record("d", "D"));

        // No truncation: b and c remain reachable by undo.
        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.cursor(), Some(3));
        assert!(ledger.redo().is_none());
        assert_eq!(ledger.undo().map(|r| r.input_text.as_str()), Some("c"));
        assert_eq!(ledger.undo().map(|r| r.input_text.as_str()), Some("b"));
    }

    #[test]
    fn cursor_invariant_holds_over_mixed_operations() {
        let mut ledger = HistoryLedger::new();
        // 0 = append, 1 = undo, 2 = redo
        let ops = [1, 2, 0, 1, 1, 0, 0, 2, 1, 1, 1, 2, 2, 2, 0, 1, 2, 0, 1, 1, 1, 1];
        let mut last_len = 0;
        for (step, op) in ops.iter().enumerate() {
            match op {
                0 => ledger.append(record(&step.to_string(), "x")),
                1 => {
                    ledger.undo();
                }
                _ => {
                    ledger.redo();
                }
            }
            assert_cursor_in_bounds(&ledger);
            assert!(ledger.len() >= last_len);
            last_len = ledger.len();
        }
    }
}
