//! Configuration and source factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use babel_core::catalog::{CatalogLoader, DEFAULT_TTL};
use babel_core::seed::{builtin_seed, parse_seed_file, SeedLanguage};
use babel_core::session::Tier;
use babel_core::traits::{SpeechSynthesizer, VocabSource};

use crate::file::JsonFileSource;
use crate::sheet::SheetSource;
use crate::tts::GoogleTtsSynthesizer;

/// Configuration for a single vocabulary source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// A published spreadsheet tab. Either `url`, or `sheet_id` + `tab`.
    Sheet {
        language: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        sheet_id: Option<String>,
        #[serde(default)]
        tab: Option<String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    /// A local JSON file of rows.
    File { language: String, path: PathBuf },
}

impl SourceConfig {
    pub fn language(&self) -> &str {
        match self {
            SourceConfig::Sheet { language, .. } | SourceConfig::File { language, .. } => language,
        }
    }
}

/// Speech synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            timeout_secs: None,
        }
    }
}

/// Top-level babel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BabelConfig {
    /// Language a new session starts on.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Seconds a loaded catalog stays fresh.
    #[serde(default = "default_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Include the built-in word lists.
    #[serde(default = "default_true")]
    pub builtin_seed: bool,
    /// Extra seed TOML files.
    #[serde(default)]
    pub seed_files: Vec<PathBuf>,
    /// Access tier for new sessions.
    #[serde(default)]
    pub tier: Tier,
    /// Vocabulary sources keyed by name, in declaration order. Records for
    /// a language are appended in this order.
    #[serde(default)]
    pub sources: IndexMap<String, SourceConfig>,
    #[serde(default)]
    pub speech: SpeechConfig,
    /// User-facing text overrides.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

fn default_language() -> String {
    "Spanish".to_string()
}
fn default_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}
fn default_true() -> bool {
    true
}

impl Default for BabelConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            cache_ttl_secs: default_ttl_secs(),
            builtin_seed: true,
            seed_files: Vec::new(),
            tier: Tier::Free,
            sources: IndexMap::new(),
            speech: SpeechConfig::default(),
            labels: HashMap::new(),
        }
    }
}

impl BabelConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::Sheet {
            language,
            url,
            sheet_id,
            tab,
            timeout_secs,
        } => SourceConfig::Sheet {
            language: language.clone(),
            url: url.as_deref().map(resolve_env_vars),
            sheet_id: sheet_id.as_deref().map(resolve_env_vars),
            tab: tab.as_deref().map(resolve_env_vars),
            timeout_secs: *timeout_secs,
        },
        SourceConfig::File { language, path } => SourceConfig::File {
            language: language.clone(),
            path: resolve_path(path),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `babel.toml` in the current directory
/// 2. `~/.config/babel/config.toml`
///
/// Environment variable override: `BABEL_CACHE_TTL_SECS`.
pub fn load_config() -> Result<BabelConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<BabelConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("babel.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<BabelConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => BabelConfig::default(),
    };

    if let Ok(ttl) = std::env::var("BABEL_CACHE_TTL_SECS") {
        config.cache_ttl_secs = ttl
            .trim()
            .parse()
            .with_context(|| format!("invalid BABEL_CACHE_TTL_SECS: '{ttl}'"))?;
    }

    config.sources = config
        .sources
        .iter()
        .map(|(k, v)| (k.clone(), resolve_source_config(v)))
        .collect();
    config.seed_files = config.seed_files.iter().map(|p| resolve_path(p)).collect();

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("babel"))
}

/// Create a source instance from its configuration.
pub fn create_source(name: &str, config: &SourceConfig) -> Result<Arc<dyn VocabSource>> {
    match config {
        SourceConfig::Sheet {
            language,
            url,
            sheet_id,
            tab,
            timeout_secs,
        } => {
            let url = match (url, sheet_id, tab) {
                (Some(url), _, _) => url.clone(),
                (None, Some(sheet_id), tab) => {
                    SheetSource::opensheet_url(sheet_id, tab.as_deref().unwrap_or(language))
                        .with_context(|| format!("source '{name}': invalid sheet location"))?
                }
                (None, None, _) => {
                    anyhow::bail!("source '{name}': sheet needs either `url` or `sheet_id`")
                }
            };
            Ok(Arc::new(SheetSource::new(name, language, &url, *timeout_secs)))
        }
        SourceConfig::File { language, path } => {
            Ok(Arc::new(JsonFileSource::new(name, language, path.clone())))
        }
    }
}

/// Collect the built-in seed (if enabled) and every configured seed file.
pub fn load_seeds(config: &BabelConfig) -> Result<Vec<SeedLanguage>> {
    let mut seeds = if config.builtin_seed {
        builtin_seed()?
    } else {
        Vec::new()
    };
    for path in &config.seed_files {
        seeds.extend(parse_seed_file(path)?);
    }
    Ok(seeds)
}

/// Build a catalog loader with every configured source and seed.
pub fn create_loader(config: &BabelConfig) -> Result<CatalogLoader> {
    let sources = config
        .sources
        .iter()
        .map(|(name, source)| create_source(name, source))
        .collect::<Result<Vec<_>>>()?;
    let seeds = load_seeds(config)?;

    tracing::debug!(
        "catalog loader: {} source(s), {} seed language(s), ttl {}s",
        sources.len(),
        seeds.len(),
        config.cache_ttl_secs
    );
    Ok(CatalogLoader::new(sources, seeds, config.cache_ttl()))
}

/// Create the speech synthesizer, unless speech is disabled.
pub fn create_synthesizer(config: &SpeechConfig) -> Option<Box<dyn SpeechSynthesizer>> {
    config.enabled.then(|| {
        Box::new(GoogleTtsSynthesizer::new(
            config.base_url.as_deref().map(resolve_env_vars),
            config.timeout_secs,
        )) as Box<dyn SpeechSynthesizer>
    })
}
