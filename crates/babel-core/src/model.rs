//! Core data model types for babel.
//!
//! A [`SourceRecord`] is one normalized quiz item. Records are only built
//! through [`SourceRecord::from_draft`], which enforces the record
//! invariants and shuffles the option set once.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Number of incorrect options stored with every record.
pub const DISTRACTOR_COUNT: usize = 3;

/// Number of options shown for every question (answer + distractors).
pub const OPTION_COUNT: usize = DISTRACTOR_COUNT + 1;

/// Languages with a known speech-synthesis code.
const AUDIO_CODES: &[(&str, &str)] = &[
    ("Spanish", "es"),
    ("French", "fr"),
    ("German", "de"),
    ("Italian", "it"),
    ("Portuguese", "pt"),
    ("Hebrew", "iw"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
];

/// Look up the speech-synthesis code for a language name.
///
/// Only a small allow-list of languages is known; everything else has no
/// audio support.
pub fn audio_code_for(language: &str) -> Option<&'static str> {
    AUDIO_CODES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(language.trim()))
        .map(|(_, code)| *code)
}

/// Unvalidated record fields, as read from a seed file or a source row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordDraft {
    /// The word or phrase shown to the learner.
    pub prompt: String,
    /// Native-script rendering.
    #[serde(default)]
    pub script: Option<String>,
    /// Pronunciation guide.
    #[serde(default)]
    pub phonetic: Option<String>,
    /// The correct translation.
    pub answer: String,
    /// Incorrect translations.
    pub distractors: [String; DISTRACTOR_COUNT],
    /// Speech-synthesis code.
    #[serde(default, alias = "audio")]
    pub audio_code: Option<String>,
}

/// One normalized vocabulary quiz item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    prompt: String,
    script: Option<String>,
    phonetic: Option<String>,
    answer: String,
    distractors: [String; DISTRACTOR_COUNT],
    options: [String; OPTION_COUNT],
    audio_code: Option<String>,
}

impl SourceRecord {
    /// Validate a draft and build a record, shuffling its options with `rng`.
    pub fn from_draft<R: Rng + ?Sized>(draft: RecordDraft, rng: &mut R) -> Result<Self, RecordError> {
        let prompt = draft.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(RecordError::EmptyPrompt);
        }

        let answer = draft.answer.trim().to_string();
        if answer.is_empty() {
            return Err(RecordError::EmptyAnswer);
        }

        let distractors = draft.distractors.map(|d| d.trim().to_string());
        for (i, d) in distractors.iter().enumerate() {
            if d.is_empty() {
                return Err(RecordError::EmptyDistractor(i + 1));
            }
            if *d == answer {
                return Err(RecordError::AnswerInDistractors(answer));
            }
            if distractors[..i].contains(d) {
                return Err(RecordError::DuplicateDistractor(d.clone()));
            }
        }

        let [d1, d2, d3] = distractors.clone();
        let mut options = [answer.clone(), d1, d2, d3];
        options.shuffle(rng);

        Ok(Self {
            prompt,
            script: non_empty(draft.script),
            phonetic: non_empty(draft.phonetic),
            answer,
            distractors,
            options,
            audio_code: non_empty(draft.audio_code),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn phonetic(&self) -> Option<&str> {
        self.phonetic.as_deref()
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn distractors(&self) -> &[String; DISTRACTOR_COUNT] {
        &self.distractors
    }

    /// The answer and distractors in display order.
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// Speech-synthesis code; `None` means audio is unsupported.
    pub fn audio_code(&self) -> Option<&str> {
        self.audio_code.as_deref()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One row of a tabular source: cell text keyed by column header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell. Header whitespace is trimmed.
    pub fn insert(&mut self, column: impl AsRef<str>, value: impl Into<String>) {
        self.cells
            .insert(column.as_ref().trim().to_string(), value.into());
    }

    /// Cell text for a column, if the column is present.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Build a row from a JSON object. Strings are kept, numbers and
    /// booleans are stringified, `null` becomes an empty cell.
    ///
    /// Returns `None` if `value` is not an object or holds nested values.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut row = RawRow::new();
        for (column, cell) in object {
            let text = match cell {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => String::new(),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => return None,
            };
            row.insert(column, text);
        }
        Some(row)
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}
