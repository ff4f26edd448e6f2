//! Trait definitions for the collaborators around the quiz core.
//!
//! Vocabulary sources and the speech synthesizer are implemented in the
//! `babel-sources` crate; the label store is implemented here for plain
//! maps.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{SourceError, SpeechError};
use crate::model::RawRow;

// ---------------------------------------------------------------------------
// Vocabulary sources
// ---------------------------------------------------------------------------

/// A remote or local tabular source feeding one language.
#[async_trait]
pub trait VocabSource: Send + Sync {
    /// Human-readable source name used in warnings (e.g. "spanish-sheet").
    fn name(&self) -> &str;

    /// Language this source contributes to. Also the prompt column header.
    fn language(&self) -> &str;

    /// Fetch every row of the source.
    async fn fetch(&self) -> Result<Vec<RawRow>, SourceError>;
}

// ---------------------------------------------------------------------------
// Speech synthesis
// ---------------------------------------------------------------------------

/// Text-to-speech backend.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` in the language identified by `audio_code`.
    async fn synthesize(&self, text: &str, audio_code: &str) -> Result<Vec<u8>, SpeechError>;
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Key–value store of user-facing text.
pub trait LabelStore {
    fn label(&self, key: &str) -> Option<&str>;

    /// The label for `key`, or `default` when the key is absent.
    fn label_or(&self, key: &str, default: &str) -> String {
        self.label(key).unwrap_or(default).to_string()
    }
}

impl LabelStore for HashMap<String, String> {
    fn label(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}
