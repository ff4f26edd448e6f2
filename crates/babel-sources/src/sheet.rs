//! Published spreadsheet source.
//!
//! Fetches one sheet tab as a JSON array of row objects keyed by column
//! header (the format served by opensheet-style sheet publishers).

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use babel_core::error::SourceError;
use babel_core::model::RawRow;
use babel_core::traits::VocabSource;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const OPENSHEET_BASE_URL: &str = "https://opensheet.elk.sh";

/// A vocabulary source backed by a published spreadsheet tab.
pub struct SheetSource {
    name: String,
    language: String,
    url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl SheetSource {
    pub fn new(name: &str, language: &str, url: &str, timeout_secs: Option<u64>) -> Self {
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            name: name.to_string(),
            language: language.to_string(),
            url: url.to_string(),
            timeout_secs,
            client,
        }
    }

    /// URL of a sheet tab on the public opensheet endpoint. Both parts are
    /// percent-encoded as path segments.
    pub fn opensheet_url(sheet_id: &str, tab: &str) -> anyhow::Result<String> {
        let mut url = reqwest::Url::parse(OPENSHEET_BASE_URL)?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("{OPENSHEET_BASE_URL} cannot take a path"))?
            .pop_if_empty()
            .push(sheet_id.trim())
            .push(tab.trim());
        Ok(url.to_string())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Turn a JSON payload into rows. The payload must be an array of flat
/// objects.
pub fn rows_from_json(
    source_name: &str,
    payload: &serde_json::Value,
) -> Result<Vec<RawRow>, SourceError> {
    let items = payload.as_array().ok_or_else(|| {
        SourceError::schema(source_name, "expected a JSON array of row objects")
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            RawRow::from_json(item).ok_or_else(|| {
                SourceError::schema(
                    source_name,
                    format!("row {}: expected an object of text cells", i + 1),
                )
            })
        })
        .collect()
}

#[async_trait]
impl VocabSource for SheetSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn language(&self) -> &str {
        &self.language
    }

    #[instrument(skip(self), fields(source = %self.name))]
    async fn fetch(&self) -> Result<Vec<RawRow>, SourceError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::unavailable(
                    &self.name,
                    format!("request timed out after {}s", self.timeout_secs),
                )
            } else {
                SourceError::unavailable(&self.name, e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(SourceError::unavailable(
                &self.name,
                format!("HTTP {status} from {}", self.url),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::unavailable(&self.name, e.to_string()))?;

        let payload: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| SourceError::schema(&self.name, format!("invalid JSON: {e}")))?;

        let rows = rows_from_json(&self.name, &payload)?;
        tracing::debug!("fetched {} row(s)", rows.len());
        Ok(rows)
    }
}
