//! Vocabulary catalog and its TTL-cached loader.
//!
//! The loader seeds a fresh mapping with static word lists, fetches every
//! configured source, and normalizes each source into its own buffer. A
//! failing source is skipped with a warning; the rest of the catalog is
//! still built. Rebuilds happen under a lock, so concurrent readers during
//! a cache miss wait for a single rebuild and never see a partial catalog.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{QuizError, SourceError};
use crate::model::SourceRecord;
use crate::normalize::normalize_rows;
use crate::seed::SeedLanguage;
use crate::traits::VocabSource;

/// Default time-to-live for a cached catalog.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// A source that was skipped during a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWarning {
    /// Language the source would have contributed to.
    pub language: String,
    pub error: SourceError,
}

impl std::fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.language, self.error)
    }
}

/// Normalized quiz items keyed by language name.
///
/// Every language present maps to at least one record.
#[derive(Debug, Clone)]
pub struct Catalog {
    languages: BTreeMap<String, Vec<SourceRecord>>,
    warnings: Vec<SourceWarning>,
    built_at: DateTime<Utc>,
}

impl Catalog {
    /// Build a catalog from ready-made records. Languages with no records
    /// are dropped.
    pub fn from_records(languages: impl IntoIterator<Item = (String, Vec<SourceRecord>)>) -> Self {
        Self::assemble(languages.into_iter().collect(), Vec::new())
    }

    fn assemble(
        mut languages: BTreeMap<String, Vec<SourceRecord>>,
        warnings: Vec<SourceWarning>,
    ) -> Self {
        languages.retain(|_, records| !records.is_empty());
        Self {
            languages,
            warnings,
            built_at: Utc::now(),
        }
    }

    /// Language names in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn records(&self, language: &str) -> Option<&[SourceRecord]> {
        self.languages.get(language).map(Vec::as_slice)
    }

    pub fn contains(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// Number of languages.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Sources skipped while building this catalog.
    pub fn warnings(&self) -> &[SourceWarning] {
        &self.warnings
    }

    /// Wall-clock time the catalog was built.
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

/// A catalog snapshot and the instant it was built.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    catalog: Arc<Catalog>,
    built_at: Instant,
}

impl CacheEntry {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            built_at: Instant::now(),
        }
    }

    /// Valid while `now - built_at < ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.built_at.elapsed() < ttl
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

/// Builds and caches the catalog.
pub struct CatalogLoader {
    sources: Vec<Arc<dyn VocabSource>>,
    seeds: Vec<SeedLanguage>,
    ttl: Duration,
    rng_seed: Option<u64>,
    rebuilds: AtomicU64,
    slot: Mutex<Option<CacheEntry>>,
}

impl CatalogLoader {
    pub fn new(
        sources: Vec<Arc<dyn VocabSource>>,
        seeds: Vec<SeedLanguage>,
        ttl: Duration,
    ) -> Self {
        Self {
            sources,
            seeds,
            ttl,
            rng_seed: None,
            rebuilds: AtomicU64::new(0),
            slot: Mutex::new(None),
        }
    }

    /// Shuffle options deterministically (each rebuild derives its own
    /// stream from `seed`).
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of full rebuilds performed so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }

    /// Return the cached catalog, rebuilding it if missing or expired.
    ///
    /// Fails with [`QuizError::EmptyCatalog`] if no language produced any
    /// records. Empty results are not cached.
    pub async fn get_catalog(&self) -> Result<Arc<Catalog>, QuizError> {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref() {
            if entry.is_fresh(self.ttl) {
                tracing::debug!("catalog cache hit");
                return Ok(Arc::clone(entry.catalog()));
            }
            tracing::info!("catalog expired after {:?}, rebuilding", self.ttl);
        }

        let catalog = self.rebuild().await;
        if catalog.is_empty() {
            tracing::error!(
                "catalog rebuild produced no languages ({} warning(s))",
                catalog.warnings.len()
            );
            *slot = None;
            return Err(QuizError::EmptyCatalog {
                warnings: catalog.warnings,
            });
        }

        let catalog = Arc::new(catalog);
        *slot = Some(CacheEntry::new(Arc::clone(&catalog)));
        Ok(catalog)
    }

    /// Drop the cached catalog so the next read rebuilds.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }

    async fn rebuild(&self) -> Catalog {
        let generation = self.rebuilds.fetch_add(1, Ordering::Relaxed);
        let mut rng = match self.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(generation)),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut languages: BTreeMap<String, Vec<SourceRecord>> = BTreeMap::new();
        let mut warnings = Vec::new();

        for seed in &self.seeds {
            match seed.normalize(&mut rng) {
                Ok(records) => languages
                    .entry(seed.name.clone())
                    .or_default()
                    .extend(records),
                Err((word, e)) => {
                    let error = SourceError::schema(
                        format!("seed:{}", seed.name),
                        format!("word {word}: {e}"),
                    );
                    tracing::warn!("skipping seed set: {error}");
                    warnings.push(SourceWarning {
                        language: seed.name.clone(),
                        error,
                    });
                }
            }
        }

        let fetched = join_all(self.sources.iter().map(|source| async move {
            let result = source.fetch().await;
            (source, result)
        }))
        .await;

        for (source, result) in fetched {
            let normalized = result.and_then(|rows| {
                normalize_rows(source.name(), source.language(), &rows, &mut rng)
            });

            match normalized {
                Ok(records) => {
                    tracing::info!(
                        "loaded {} record(s) for {} from '{}'",
                        records.len(),
                        source.language(),
                        source.name()
                    );
                    languages
                        .entry(source.language().to_string())
                        .or_default()
                        .extend(records);
                }
                Err(error) => {
                    tracing::warn!("skipping source for {}: {error}", source.language());
                    warnings.push(SourceWarning {
                        language: source.language().to_string(),
                        error,
                    });
                }
            }
        }

        Catalog::assemble(languages, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRow;
    use crate::seed::builtin_seed;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicU32;

    struct CountingSource {
        name: String,
        language: String,
        result: Result<Vec<RawRow>, SourceError>,
        calls: AtomicU32,
    }

    impl CountingSource {
        fn ok(language: &str, words: &[(&str, &str)]) -> Arc<Self> {
            let rows = words
                .iter()
                .map(|(prompt, answer)| {
                    [
                        (language, *prompt),
                        ("Correct Translation", *answer),
                        ("Wrong 1", "w1"),
                        ("Wrong 2", "w2"),
                        ("Wrong 3", "w3"),
                    ]
                    .into_iter()
                    .collect()
                })
                .collect();
            Arc::new(Self {
                name: format!("{}-sheet", language.to_lowercase()),
                language: language.into(),
                result: Ok(rows),
                calls: AtomicU32::new(0),
            })
        }

        fn with_rows(name: &str, language: &str, rows: Vec<RawRow>) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                language: language.into(),
                result: Ok(rows),
                calls: AtomicU32::new(0),
            })
        }

        fn failing(language: &str, error: SourceError) -> Arc<Self> {
            Arc::new(Self {
                name: error.source_name().to_string(),
                language: language.into(),
                result: Err(error),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VocabSource for CountingSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn language(&self) -> &str {
            &self.language
        }

        async fn fetch(&self) -> Result<Vec<RawRow>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.result.clone()
        }
    }

    fn loader(sources: Vec<Arc<dyn VocabSource>>, seeds: Vec<SeedLanguage>) -> CatalogLoader {
        CatalogLoader::new(sources, seeds, Duration::from_secs(60)).with_rng_seed(42)
    }

    #[tokio::test(start_paused = true)]
    async fn cache_hit_within_ttl() {
        let french = CountingSource::ok("French", &[("Le chat", "The cat")]);
        let loader = loader(vec![french.clone()], vec![]);

        let first = loader.get_catalog().await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        let second = loader.get_catalog().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(french.calls(), 1);
        assert_eq!(loader.rebuild_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_triggers_one_rebuild_per_source() {
        let french = CountingSource::ok("French", &[("Le chat", "The cat")]);
        let german = CountingSource::ok("German", &[("Der Hund", "The dog")]);
        let loader = loader(vec![french.clone(), german.clone()], vec![]);

        let first = loader.get_catalog().await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        let second = loader.get_catalog().await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(french.calls(), 2);
        assert_eq!(german.calls(), 2);

        loader.get_catalog().await.unwrap();
        assert_eq!(french.calls(), 2, "fresh rebuild should be cached again");
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_share_one_rebuild() {
        let french = CountingSource::ok("French", &[("Le chat", "The cat")]);
        let loader = Arc::new(loader(vec![french.clone()], vec![]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let loader = Arc::clone(&loader);
                tokio::spawn(async move { loader.get_catalog().await.map(|c| c.len()) })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 1);
        }

        assert_eq!(french.calls(), 1);
        assert_eq!(loader.rebuild_count(), 1);
    }

    #[tokio::test]
    async fn failed_source_is_isolated() {
        let french = CountingSource::ok("French", &[("Le chat", "The cat"), ("Le pain", "The bread")]);
        let down = CountingSource::failing(
            "German",
            SourceError::unavailable("german-sheet", "connection refused"),
        );
        let renamed = CountingSource::failing(
            "Italian",
            SourceError::schema("italian-sheet", "row 1: missing column 'Italian'"),
        );
        let loader = loader(vec![french, down, renamed], vec![]);

        let catalog = loader.get_catalog().await.unwrap();
        assert_eq!(catalog.languages().collect::<Vec<_>>(), vec!["French"]);
        assert_eq!(catalog.records("French").unwrap().len(), 2);
        assert!(!catalog.contains("German"));

        let warnings = catalog.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].error.is_transport());
        assert!(!warnings[1].error.is_transport());
        assert!(warnings[1].to_string().starts_with("[Italian]"));
    }

    #[tokio::test]
    async fn seeds_come_before_remote_records() {
        let spanish = CountingSource::ok("Spanish", &[("El sol", "The sun")]);
        let loader = loader(vec![spanish], builtin_seed().unwrap());

        let catalog = loader.get_catalog().await.unwrap();
        let records = catalog.records("Spanish").unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].prompt(), "El agua");
        assert_eq!(records[3].prompt(), "El sol");
        assert!(catalog.contains("Hebrew"));
    }

    #[tokio::test]
    async fn malformed_row_discards_the_whole_source() {
        let row = |prompt: &str, answer: &str, wrong: [&str; 3]| -> RawRow {
            [
                ("Spanish", prompt),
                ("Correct Translation", answer),
                ("Wrong 1", wrong[0]),
                ("Wrong 2", wrong[1]),
                ("Wrong 3", wrong[2]),
            ]
            .into_iter()
            .collect()
        };
        let spanish = CountingSource::with_rows(
            "spanish-sheet",
            "Spanish",
            vec![
                row("El sol", "The sun", ["The moon", "The sea", "The sky"]),
                row("La luna", "The moon", ["The sun", "The moon", "The star"]),
            ],
        );
        let loader = loader(vec![spanish], builtin_seed().unwrap());

        let catalog = loader.get_catalog().await.unwrap();
        let prompts: Vec<&str> = catalog
            .records("Spanish")
            .unwrap()
            .iter()
            .map(|r| r.prompt())
            .collect();
        assert_eq!(prompts, vec!["El agua", "La biblioteca", "Buenos días"]);

        let warnings = catalog.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].language, "Spanish");
        assert!(matches!(
            warnings[0].error,
            SourceError::SchemaMismatch { .. }
        ));
        assert_eq!(warnings[0].error.source_name(), "spanish-sheet");
        assert!(warnings[0].error.to_string().contains("row 2"));
    }

    #[tokio::test]
    async fn empty_rebuild_is_an_error_and_not_cached() {
        let down = CountingSource::failing(
            "German",
            SourceError::unavailable("german-sheet", "timeout"),
        );
        let loader = loader(vec![down.clone()], vec![]);

        match loader.get_catalog().await {
            Err(QuizError::EmptyCatalog { warnings }) => assert_eq!(warnings.len(), 1),
            other => panic!("expected EmptyCatalog, got {other:?}"),
        }
        assert!(loader.get_catalog().await.is_err());
        assert_eq!(down.calls(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_rebuild() {
        let french = CountingSource::ok("French", &[("Le chat", "The cat")]);
        let loader = loader(vec![french.clone()], vec![]);

        loader.get_catalog().await.unwrap();
        loader.invalidate().await;
        loader.get_catalog().await.unwrap();
        assert_eq!(french.calls(), 2);
    }

    #[tokio::test]
    async fn every_record_keeps_the_option_invariants() {
        let loader = loader(vec![], builtin_seed().unwrap());
        let catalog = loader.get_catalog().await.unwrap();

        for language in catalog.languages() {
            for record in catalog.records(language).unwrap() {
                let unique: std::collections::HashSet<_> = record.options().iter().collect();
                assert_eq!(unique.len(), 4);
                assert!(!record.distractors().iter().any(|d| d == record.answer()));
            }
        }
    }

    #[test]
    fn from_records_drops_empty_languages() {
        let catalog = Catalog::from_records(vec![("Spanish".to_string(), vec![])]);
        assert!(catalog.is_empty());
    }
}
