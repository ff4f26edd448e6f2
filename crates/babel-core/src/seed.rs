//! Static seed sets: built-in vocabulary and extra TOML word lists.
//!
//! Seeds are loaded as drafts and normalized on every catalog rebuild, so
//! their options are reshuffled like remote rows.

use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::error::RecordError;
use crate::model::{audio_code_for, RecordDraft, SourceRecord};

const BUILTIN_SEED: &str = include_str!("../data/builtin.toml");

#[derive(Debug, Deserialize)]
struct TomlSeedFile {
    #[serde(default)]
    languages: Vec<SeedLanguage>,
}

/// Static word list for one language.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedLanguage {
    /// Language name, used as the catalog key.
    pub name: String,
    #[serde(default)]
    pub words: Vec<RecordDraft>,
}

impl SeedLanguage {
    /// Normalize every word. Words without an audio code fall back to the
    /// language lookup table.
    pub fn normalize<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<SourceRecord>, (usize, RecordError)> {
        self.words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let mut draft = word.clone();
                if draft.audio_code.is_none() {
                    draft.audio_code = audio_code_for(&self.name).map(str::to_string);
                }
                SourceRecord::from_draft(draft, rng).map_err(|e| (i + 1, e))
            })
            .collect()
    }
}

/// The seed set compiled into the binary.
pub fn builtin_seed() -> Result<Vec<SeedLanguage>> {
    parse_seed_str(BUILTIN_SEED, Path::new("<builtin>"))
}

/// Parse a seed TOML file.
pub fn parse_seed_file(path: &Path) -> Result<Vec<SeedLanguage>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file: {}", path.display()))?;

    parse_seed_str(&content, path)
}

/// Parse a seed TOML string and check every word against the record
/// invariants.
pub fn parse_seed_str(content: &str, source_path: &Path) -> Result<Vec<SeedLanguage>> {
    let parsed: TomlSeedFile = toml::from_str(content)
        .with_context(|| format!("failed to parse seed TOML: {}", source_path.display()))?;

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    for language in &parsed.languages {
        anyhow::ensure!(
            !language.name.trim().is_empty(),
            "{}: seed language with an empty name",
            source_path.display()
        );
        if let Err((word, e)) = language.normalize(&mut rng) {
            anyhow::bail!(
                "{}: {} word {}: {}",
                source_path.display(),
                language.name,
                word,
                e
            );
        }
    }

    Ok(parsed.languages)
}
