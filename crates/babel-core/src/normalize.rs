//! Row normalization: loosely-structured tabular rows into [`SourceRecord`]s.
//!
//! Required columns are the language-named prompt column,
//! "Correct Translation" and "Wrong 1".."Wrong 3". "Script" and "Phonetic"
//! are optional and read as empty when absent.

use rand::Rng;

use crate::error::SourceError;
use crate::model::{audio_code_for, RawRow, RecordDraft, SourceRecord};

pub const SCRIPT_COLUMN: &str = "Script";
pub const PHONETIC_COLUMN: &str = "Phonetic";
pub const ANSWER_COLUMN: &str = "Correct Translation";
pub const DISTRACTOR_COLUMNS: [&str; 3] = ["Wrong 1", "Wrong 2", "Wrong 3"];

/// Normalize a single row. `row_number` is 1-based and only used in errors.
pub fn normalize_row<R: Rng + ?Sized>(
    source_name: &str,
    language: &str,
    row_number: usize,
    row: &RawRow,
    rng: &mut R,
) -> Result<SourceRecord, SourceError> {
    let required = |column: &str| {
        row.get(column).map(str::to_string).ok_or_else(|| {
            SourceError::schema(
                source_name,
                format!("row {row_number}: missing column '{column}'"),
            )
        })
    };

    let prompt = required(language)?;
    let answer = required(ANSWER_COLUMN)?;
    let distractors = [
        required(DISTRACTOR_COLUMNS[0])?,
        required(DISTRACTOR_COLUMNS[1])?,
        required(DISTRACTOR_COLUMNS[2])?,
    ];
    let optional = |column: &str| row.get(column).unwrap_or_default().to_string();

    let draft = RecordDraft {
        prompt,
        script: Some(optional(SCRIPT_COLUMN)),
        phonetic: Some(optional(PHONETIC_COLUMN)),
        answer,
        distractors,
        audio_code: audio_code_for(language).map(str::to_string),
    };

    SourceRecord::from_draft(draft, rng)
        .map_err(|e| SourceError::schema(source_name, format!("row {row_number}: {e}")))
}

/// Normalize every row of one source into a fresh buffer.
///
/// All-or-nothing: the first malformed row fails the whole source, and a
/// source with no rows is reported as a schema mismatch.
pub fn normalize_rows<R: Rng + ?Sized>(
    source_name: &str,
    language: &str,
    rows: &[RawRow],
    rng: &mut R,
) -> Result<Vec<SourceRecord>, SourceError> {
    if rows.is_empty() {
        return Err(SourceError::schema(source_name, "source returned no rows"));
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize_row(source_name, language, i + 1, row, rng))
        .collect()
}
