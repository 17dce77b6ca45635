use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::storage::{BackendLocal, StorageManager};

const CONFIG_FILE: &str = "config.yaml";

/// Default number of products returned by a search
const DEFAULT_LIMIT: usize = 4;
/// Upper bound for a requested result size
const DEFAULT_MAX_LIMIT: usize = 50;
/// Scores at or below this never reach a caller
const DEFAULT_MIN_THRESHOLD: f64 = 0.05;
/// Shortlist size multiplier for the two-stage fuzzy pass
const DEFAULT_OVERFETCH_FACTOR: usize = 2;

const DEFAULT_MULTI_MATCH_BOOST: f64 = 1.5;
const DEFAULT_MULTI_MATCH_MIN: usize = 2;

const DEFAULT_NGRAM_MIN: usize = 3;
const DEFAULT_NGRAM_MAX: usize = 8;
const DEFAULT_EXACT_MATCH_BOOST: f64 = 0.3;

const DEFAULT_JITTER_MAX: f64 = 0.1;

const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

/// Exact-overlap scoring parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExactConfig {
    /// Multiplier applied once enough tags match
    #[serde(default = "default_multi_match_boost")]
    pub multi_match_boost: f64,

    /// Matches needed for the multiplier to apply
    #[serde(default = "default_multi_match_min")]
    pub multi_match_min: usize,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            multi_match_boost: DEFAULT_MULTI_MATCH_BOOST,
            multi_match_min: DEFAULT_MULTI_MATCH_MIN,
        }
    }
}

/// Character n-gram cosine scoring parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuzzyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_ngram_min")]
    pub ngram_min: usize,

    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,

    /// Per exact tag match: similarity *= 1 + boost * matches
    #[serde(default = "default_exact_match_boost")]
    pub exact_match_boost: f64,

    /// Below this many candidates the exact strategy is used directly
    #[serde(default = "default_min_candidates")]
    pub min_candidates: usize,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ngram_min: DEFAULT_NGRAM_MIN,
            ngram_max: DEFAULT_NGRAM_MAX,
            exact_match_boost: DEFAULT_EXACT_MATCH_BOOST,
            min_candidates: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JitterMode {
    /// No jitter; fully reproducible rankings
    #[default]
    Off,
    /// Fresh entropy for every query
    Random,
    /// Same seed for every query
    Seeded,
}

/// Tie-breaking noise added to exact-overlap scores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JitterConfig {
    #[serde(default)]
    pub mode: JitterMode,

    /// Jitter is drawn from [0, max)
    #[serde(default = "default_jitter_max")]
    pub max: f64,

    #[serde(default)]
    pub seed: u64,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            mode: JitterMode::Off,
            max: DEFAULT_JITTER_MAX,
            seed: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    #[serde(default = "default_min_threshold")]
    pub min_threshold: f64,

    #[serde(default = "default_overfetch_factor")]
    pub overfetch_factor: usize,

    #[serde(default)]
    pub exact: ExactConfig,

    #[serde(default)]
    pub fuzzy: FuzzyConfig,

    #[serde(default)]
    pub jitter: JitterConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            min_threshold: DEFAULT_MIN_THRESHOLD,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
            exact: ExactConfig::default(),
            fuzzy: FuzzyConfig::default(),
            jitter: JitterConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Address of a shopfind daemon used as the primary candidate source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,

    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            remote_addr: None,
            remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub daemon: DaemonConfig,
}

fn default_true() -> bool {
    true
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_max_limit() -> usize {
    DEFAULT_MAX_LIMIT
}

fn default_min_threshold() -> f64 {
    DEFAULT_MIN_THRESHOLD
}

fn default_overfetch_factor() -> usize {
    DEFAULT_OVERFETCH_FACTOR
}

fn default_multi_match_boost() -> f64 {
    DEFAULT_MULTI_MATCH_BOOST
}

fn default_multi_match_min() -> usize {
    DEFAULT_MULTI_MATCH_MIN
}

fn default_ngram_min() -> usize {
    DEFAULT_NGRAM_MIN
}

fn default_ngram_max() -> usize {
    DEFAULT_NGRAM_MAX
}

fn default_exact_match_boost() -> f64 {
    DEFAULT_EXACT_MATCH_BOOST
}

fn default_min_candidates() -> usize {
    1
}

fn default_jitter_max() -> f64 {
    DEFAULT_JITTER_MAX
}

fn default_remote_timeout_secs() -> u64 {
    DEFAULT_REMOTE_TIMEOUT_SECS
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let search = &self.search;

        if search.default_limit == 0 || search.max_limit == 0 {
            bail!("search.default_limit and search.max_limit must be greater than 0");
        }
        if search.default_limit > search.max_limit {
            bail!(
                "search.default_limit ({}) must not exceed search.max_limit ({})",
                search.default_limit,
                search.max_limit
            );
        }
        if !search.min_threshold.is_finite() || !(0.0..=1.0).contains(&search.min_threshold) {
            bail!(
                "search.min_threshold must be between 0.0 and 1.0, got {}",
                search.min_threshold
            );
        }
        if search.overfetch_factor == 0 {
            bail!("search.overfetch_factor must be greater than 0");
        }

        if !search.exact.multi_match_boost.is_finite() || search.exact.multi_match_boost < 1.0 {
            bail!(
                "search.exact.multi_match_boost must be at least 1.0, got {}",
                search.exact.multi_match_boost
            );
        }

        let fuzzy = &search.fuzzy;
        if fuzzy.ngram_min == 0 || fuzzy.ngram_min > fuzzy.ngram_max {
            bail!(
                "search.fuzzy n-gram range {}..={} is invalid",
                fuzzy.ngram_min,
                fuzzy.ngram_max
            );
        }
        if !fuzzy.exact_match_boost.is_finite() || fuzzy.exact_match_boost < 0.0 {
            bail!(
                "search.fuzzy.exact_match_boost must be non-negative, got {}",
                fuzzy.exact_match_boost
            );
        }

        let jitter = &search.jitter;
        if !jitter.max.is_finite() || !(0.0..=1.0).contains(&jitter.max) {
            bail!("search.jitter.max must be between 0.0 and 1.0, got {}", jitter.max);
        }

        if let Some(ref addr) = self.catalog.remote_addr {
            let parsed = url::Url::parse(addr)
                .with_context(|| format!("catalog.remote_addr {addr:?} is not a valid url"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!("catalog.remote_addr must be an http(s) url, got {addr:?}");
            }
        }
        if self.catalog.remote_timeout_secs == 0 {
            bail!("catalog.remote_timeout_secs must be greater than 0");
        }

        Ok(())
    }

    /// Loads `config.yaml` from `store`, writing defaults when it is missing.
    pub fn load_with(store: &BackendLocal) -> anyhow::Result<Self> {
        // create new if does not exist
        if !store.exists(CONFIG_FILE) {
            Self::default().save(store)?;
        }

        let config_str = String::from_utf8(store.read(CONFIG_FILE)?)
            .context("config file is not valid utf8")?;
        let config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save(store)?;
        }

        Ok(config)
    }

    pub fn save(&self, store: &BackendLocal) -> anyhow::Result<()> {
        let config_str = serde_yml::to_string(&self)?;
        store
            .write(CONFIG_FILE, config_str.as_bytes())
            .context("failed to write config")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_defaults_match_documented_constants() {
        let search = SearchConfig::default();
        assert_eq!(search.default_limit, 4);
        assert!((search.min_threshold - 0.05).abs() < f64::EPSILON);
        assert!((search.exact.multi_match_boost - 1.5).abs() < f64::EPSILON);
        assert!((search.fuzzy.exact_match_boost - 0.3).abs() < f64::EPSILON);
        assert_eq!((search.fuzzy.ngram_min, search.fuzzy.ngram_max), (3, 8));
        assert_eq!(search.jitter.mode, JitterMode::Off);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.search.min_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.fuzzy.ngram_min = 9;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.default_limit = 100;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.catalog.remote_addr = Some("ftp://catalog".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.catalog.remote_addr = Some("http://catalog.local:8080".to_string());
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yml::from_str("search:\n  min_threshold: 0.1\n").unwrap();
        assert!((config.search.min_threshold - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.search.default_limit, 4);
        assert!(config.search.fuzzy.enabled);
        assert_eq!(config.daemon.listen, "0.0.0.0:8080");
    }

    #[test]
    fn test_load_creates_and_reloads() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BackendLocal::new(tmp.path()).unwrap();

        let config = Config::load_with(&store).unwrap();
        assert!(store.exists(CONFIG_FILE));
        assert_eq!(config, Config::default());

        let mut changed = config.clone();
        changed.search.jitter.mode = JitterMode::Seeded;
        changed.search.jitter.seed = 7;
        changed.save(&store).unwrap();

        let reloaded = Config::load_with(&store).unwrap();
        assert_eq!(reloaded, changed);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BackendLocal::new(tmp.path()).unwrap();
        store
            .write(CONFIG_FILE, b"search:\n  overfetch_factor: 0\n")
            .unwrap();

        assert!(Config::load_with(&store).is_err());
    }
}
