//! Mock source for testing.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use babel_core::error::SourceError;
use babel_core::model::RawRow;
use babel_core::traits::VocabSource;

/// A vocabulary source that returns fixed rows (or a fixed error) and
/// counts how often it was fetched.
pub struct MockSource {
    name: String,
    language: String,
    response: Result<Vec<RawRow>, SourceError>,
    call_count: AtomicU32,
}

impl MockSource {
    /// A source that returns `rows`.
    pub fn with_rows(language: &str, rows: Vec<RawRow>) -> Self {
        Self {
            name: format!("mock-{}", language.to_lowercase()),
            language: language.to_string(),
            response: Ok(rows),
            call_count: AtomicU32::new(0),
        }
    }

    /// A source with one well-formed row per `(prompt, answer, distractors)`.
    pub fn with_words(language: &str, words: &[(&str, &str, [&str; 3])]) -> Self {
        let rows = words
            .iter()
            .map(|(prompt, answer, [w1, w2, w3])| {
                [
                    (language, *prompt),
                    ("Correct Translation", *answer),
                    ("Wrong 1", *w1),
                    ("Wrong 2", *w2),
                    ("Wrong 3", *w3),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        Self::with_rows(language, rows)
    }

    /// A source whose fetch always fails with `error`.
    pub fn failing(language: &str, error: SourceError) -> Self {
        Self {
            name: error.source_name().to_string(),
            language: language.to_string(),
            response: Err(error),
            call_count: AtomicU32::new(0),
        }
    }

    /// Number of fetches made against this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl VocabSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn language(&self) -> &str {
        &self.language
    }

    async fn fetch(&self) -> Result<Vec<RawRow>, SourceError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.response.clone()
    }
}
