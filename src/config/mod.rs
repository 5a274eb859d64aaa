//! Scoping configuration.
//!
//! Settings come from an optional `.scoped-commits.yaml` at the repository
//! root, then from the environment, then from command-line flags. Defaults
//! are applied when the structure is built, never at the point of use.

use std::env;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::error::ScopeError;
use crate::scope::RepoPath;

/// Default number of changed-file lookups allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 500;

/// Environment variable overriding the concurrency limit.
pub const CONCURRENCY_ENV_VAR: &str = "SCOPED_COMMITS_MAX_CONCURRENCY";

/// Manifest file searched for when locating the current package.
pub const DEFAULT_MANIFEST_FILE: &str = "package.json";

/// Configuration file read from the repository root.
pub const CONFIG_FILE_NAME: &str = ".scoped-commits.yaml";

/// Upper bound on concurrently running changed-file lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ConcurrencyLimit(NonZeroUsize);

impl ConcurrencyLimit {
    /// Largest accepted limit; bigger values are clamped to it.
    pub const MAX: usize = Semaphore::MAX_PERMITS;

    /// Creates a limit, rejecting zero and clamping values above [`Self::MAX`].
    pub fn new(limit: usize) -> Result<Self, ScopeError> {
        NonZeroUsize::new(limit.min(Self::MAX))
            .map(Self)
            .ok_or_else(|| ScopeError::InvalidConcurrency {
                value: limit.to_string(),
            })
    }

    /// Parses a limit from text such as an environment value.
    pub fn parse(value: &str) -> Result<Self, ScopeError> {
        let trimmed = value.trim();
        let invalid = || ScopeError::InvalidConcurrency {
            value: value.to_string(),
        };
        let limit = trimmed.parse::<usize>().map_err(|_| invalid())?;
        Self::new(limit).map_err(|_| invalid())
    }

    /// Interprets an optional override value.
    ///
    /// An unset or blank value means no override.
    pub fn parse_override(value: Option<&str>) -> Result<Option<Self>, ScopeError> {
        match value {
            Some(v) if !v.trim().is_empty() => Self::parse(v).map(Some),
            _ => Ok(None),
        }
    }

    /// Returns the limit as a plain count.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for ConcurrencyLimit {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_CONCURRENCY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<usize> for ConcurrencyLimit {
    type Error = ScopeError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConcurrencyLimit> for usize {
    fn from(limit: ConcurrencyLimit) -> Self {
        limit.get()
    }
}

/// Options controlling which commits count as belonging to a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeConfig {
    /// Extra roots, relative to the repository root, whose changes also
    /// count towards the package.
    pub dependencies: Vec<RepoPath>,

    /// Maximum number of changed-file lookups in flight.
    pub concurrency: ConcurrencyLimit,

    /// Manifest file name identifying a package directory.
    pub manifest_file: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            dependencies: Vec::new(),
            concurrency: ConcurrencyLimit::default(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
        }
    }
}

impl ScopeConfig {
    /// Loads the repository configuration and applies the environment
    /// override.
    pub fn load(repo_root: &Path) -> Result<Self> {
        Self::load_from_path(repo_root.join(CONFIG_FILE_NAME))?.with_env_override()
    }

    /// Loads configuration from a YAML file; a missing file yields defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Applies `SCOPED_COMMITS_MAX_CONCURRENCY` when set.
    pub fn with_env_override(self) -> Result<Self> {
        let value = env::var(CONCURRENCY_ENV_VAR).ok();
        self.with_concurrency_override(value.as_deref())
    }

    /// Applies a textual concurrency override.
    pub fn with_concurrency_override(mut self, value: Option<&str>) -> Result<Self> {
        if let Some(limit) = ConcurrencyLimit::parse_override(value)
            .with_context(|| format!("Invalid {CONCURRENCY_ENV_VAR}"))?
        {
            self.concurrency = limit;
        }
        Ok(self)
    }

    /// Adds dependency roots, skipping ones already configured.
    pub fn with_dependencies<I>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = RepoPath>,
    {
        for dependency in dependencies {
            if !self.dependencies.contains(&dependency) {
                self.dependencies.push(dependency);
            }
        }
        self
    }

    /// Replaces the concurrency limit.
    pub fn with_concurrency(mut self, concurrency: ConcurrencyLimit) -> Self {
        self.concurrency = concurrency;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Serializes tests that read or write the process environment.
    pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn defaults() {
        let config = ScopeConfig::default();
        assert!(config.dependencies.is_empty());
        assert_eq!(config.concurrency.get(), 500);
        assert_eq!(config.manifest_file, "package.json");
    }

    #[test]
    fn concurrency_parse_accepts_positive_integers() {
        assert_eq!(ConcurrencyLimit::parse("1").unwrap().get(), 1);
        assert_eq!(ConcurrencyLimit::parse(" 32 ").unwrap().get(), 32);
    }

    #[test]
    fn concurrency_parse_rejects_zero_and_garbage() {
        for value in ["0", "-4", "many", "1.5"] {
            let err = ConcurrencyLimit::parse(value).unwrap_err();
            assert!(matches!(err, ScopeError::InvalidConcurrency { .. }), "{value}");
        }
    }

    #[test]
    fn oversized_limits_are_clamped() {
        assert_eq!(ConcurrencyLimit::new(usize::MAX).unwrap().get(), ConcurrencyLimit::MAX);

        let config = ScopeConfig::default()
            .with_concurrency_override(Some(&(usize::MAX / 2).to_string()))
            .unwrap();
        assert_eq!(config.concurrency.get(), ConcurrencyLimit::MAX);

        let config: ScopeConfig =
            serde_yaml::from_str(&format!("concurrency: {}\n", usize::MAX)).unwrap();
        assert_eq!(config.concurrency.get(), ConcurrencyLimit::MAX);
    }

    #[test]
    fn env_override_reads_the_environment() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        env::set_var(CONCURRENCY_ENV_VAR, "7");
        let config = ScopeConfig::default().with_env_override();
        env::set_var(CONCURRENCY_ENV_VAR, "zero");
        let invalid = ScopeConfig::default().with_env_override();
        env::remove_var(CONCURRENCY_ENV_VAR);

        assert_eq!(config.unwrap().concurrency.get(), 7);
        let err = invalid.unwrap_err();
        assert!(err.to_string().contains(CONCURRENCY_ENV_VAR));
        assert!(matches!(
            err.downcast_ref::<ScopeError>(),
            Some(ScopeError::InvalidConcurrency { .. })
        ));

        let config = ScopeConfig::default().with_env_override().unwrap();
        assert_eq!(config.concurrency.get(), DEFAULT_CONCURRENCY);
    }

    #[test]
    fn blank_override_keeps_configured_limit() {
        let config = ScopeConfig::default()
            .with_concurrency(ConcurrencyLimit::new(8).unwrap())
            .with_concurrency_override(None)
            .unwrap()
            .with_concurrency_override(Some("  "))
            .unwrap();
        assert_eq!(config.concurrency.get(), 8);

        let config = config.with_concurrency_override(Some("3")).unwrap();
        assert_eq!(config.concurrency.get(), 3);

        let err = ScopeConfig::default()
            .with_concurrency_override(Some("abc"))
            .unwrap_err();
        assert!(err.to_string().contains(CONCURRENCY_ENV_VAR));
    }

    #[test]
    fn load_from_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ScopeConfig::load_from_path(temp_dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, ScopeConfig::default());
    }

    #[test]
    fn load_from_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "dependencies:\n  - shared/lib/\n  - ./tools\nconcurrency: 16\n",
        )
        .unwrap();

        let config = ScopeConfig::load_from_path(&path).unwrap();
        let deps: Vec<String> = config.dependencies.iter().map(ToString::to_string).collect();
        assert_eq!(deps, vec!["shared/lib", "tools"]);
        assert_eq!(config.concurrency.get(), 16);
        assert_eq!(config.manifest_file, "package.json");
    }

    #[test]
    fn load_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        fs::write(&path, "concurrency: 0\n").unwrap();
        assert!(ScopeConfig::load_from_path(&path).is_err());

        fs::write(&path, "dependencies: [/etc]\n").unwrap();
        assert!(ScopeConfig::load_from_path(&path).is_err());

        fs::write(&path, "dependecies: [shared]\n").unwrap();
        assert!(ScopeConfig::load_from_path(&path).is_err());
    }

    #[test]
    fn with_dependencies_skips_duplicates() {
        let lib = RepoPath::new("shared/lib").unwrap();
        let config = ScopeConfig::default()
            .with_dependencies([lib.clone()])
            .with_dependencies([RepoPath::new("shared/lib/").unwrap(), RepoPath::new("tools").unwrap()]);
        assert_eq!(config.dependencies.len(), 2);
        assert_eq!(config.dependencies[0], lib);
    }
}
