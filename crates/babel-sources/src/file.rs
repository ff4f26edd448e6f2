//! Local JSON file source, same row format as [`crate::sheet::SheetSource`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use babel_core::error::SourceError;
use babel_core::model::RawRow;
use babel_core::traits::VocabSource;

use crate::sheet::rows_from_json;

/// A vocabulary source read from a JSON file on disk.
pub struct JsonFileSource {
    name: String,
    language: String,
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(name: &str, language: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            language: language.to_string(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl VocabSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn language(&self) -> &str {
        &self.language
    }

    async fn fetch(&self) -> Result<Vec<RawRow>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SourceError::unavailable(
                &self.name,
                format!("failed to read {}: {e}", self.path.display()),
            )
        })?;

        let payload: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            SourceError::schema(
                &self.name,
                format!("invalid JSON in {}: {e}", self.path.display()),
            )
        })?;

        rows_from_json(&self.name, &payload)
    }
}
