//! Configuration module for region parsing and project scanning
//!
//! [`RegionConfig`] describes the marker micro-grammar and can be loaded
//! from a TOML file. [`ScanConfig`] and [`IgnoreFilter`] control which
//! files a project scan visits.

use crate::models::Language;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to build glob pattern: {0}")]
    GlobError(#[from] globset::Error),

    #[error("Failed to parse gitignore: {0}")]
    GitignoreError(#[from] ignore::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Marker grammar settings
///
/// Comment prefixes and block closers are tried in the listed order, first
/// match wins, so longer tokens sharing a prefix with shorter ones must come
/// first (`///` before `//`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Compare keywords case-sensitively
    pub case_sensitive: bool,

    /// Keywords opening a region
    pub start_keywords: Vec<String>,

    /// Keywords closing a region
    pub end_keywords: Vec<String>,

    /// Marks a region as folded by default
    pub fold_sentinel: String,

    /// Fold every region by default, sentinel or not
    pub fold_all_by_default: bool,

    /// Comment openers stripped before keyword matching
    pub comment_prefixes: Vec<String>,

    /// Block comment closers stripped from the end of the line
    pub block_comment_closers: Vec<String>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            start_keywords: vec!["region".to_string(), "#region".to_string()],
            end_keywords: vec!["endregion".to_string(), "#endregion".to_string()],
            fold_sentinel: "+".to_string(),
            fold_all_by_default: false,
            comment_prefixes: ["///", "//!", "//", "#", "<!--", "--", "/**", "/*", "*", ";"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            block_comment_closers: vec!["*/".to_string(), "-->".to_string()],
        }
    }
}

impl RegionConfig {
    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RegionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations that could never produce a region
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::InvalidConfig(
                "start_keywords must contain at least one keyword".to_string(),
            ));
        }
        if self.end_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::InvalidConfig(
                "end_keywords must contain at least one keyword".to_string(),
            ));
        }
        if self.fold_sentinel.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "fold_sentinel must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Set case sensitivity (builder pattern)
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Set start keywords (builder pattern)
    pub fn with_start_keywords(mut self, keywords: Vec<String>) -> Self {
        self.start_keywords = keywords;
        self
    }

    /// Set end keywords (builder pattern)
    pub fn with_end_keywords(mut self, keywords: Vec<String>) -> Self {
        self.end_keywords = keywords;
        self
    }

    /// Set the fold sentinel (builder pattern)
    pub fn with_fold_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.fold_sentinel = sentinel.into();
        self
    }

    /// Fold all regions by default (builder pattern)
    pub fn with_fold_all_by_default(mut self, fold: bool) -> Self {
        self.fold_all_by_default = fold;
        self
    }

    /// Set comment prefixes (builder pattern)
    pub fn with_comment_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.comment_prefixes = prefixes;
        self
    }
}

/// Configuration for scanning a project
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory to scan
    pub root: PathBuf,
    /// Filter to specific languages
    pub language_filter: Option<Vec<Language>>,
    /// Additional ignore patterns (glob style)
    pub ignore_patterns: Vec<String>,
    /// Custom ignore file path
    pub ignore_file: Option<PathBuf>,
    /// Include node_modules/.venv in scan
    pub include_deps: bool,
    /// Number of threads (0 = auto)
    pub threads: usize,
    /// Marker grammar used for every file
    pub region: RegionConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            language_filter: None,
            ignore_patterns: vec![],
            ignore_file: None,
            include_deps: false,
            threads: 0,
            region: RegionConfig::default(),
        }
    }
}

impl ScanConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    pub fn with_language_filter(mut self, languages: Vec<Language>) -> Self {
        self.language_filter = Some(languages);
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn with_ignore_file(mut self, path: PathBuf) -> Self {
        self.ignore_file = Some(path);
        self
    }

    pub fn with_include_deps(mut self, include: bool) -> Self {
        self.include_deps = include;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_region_config(mut self, region: RegionConfig) -> Self {
        self.region = region;
        self
    }
}

/// Filter for ignoring files and directories
pub struct IgnoreFilter {
    gitignore: Option<Gitignore>,
    custom_globs: GlobSet,
    default_ignores: GlobSet,
}

impl IgnoreFilter {
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        let gitignore_path = config
            .ignore_file
            .clone()
            .unwrap_or_else(|| config.root.join(".gitignore"));
        let gitignore = if gitignore_path.exists() {
            let mut builder = GitignoreBuilder::new(&config.root);
            if let Some(err) = builder.add(&gitignore_path) {
                return Err(err.into());
            }
            Some(builder.build()?)
        } else {
            None
        };

        let mut custom_builder = GlobSetBuilder::new();
        for pattern in &config.ignore_patterns {
            custom_builder.add(Glob::new(pattern)?);
        }
        let custom_globs = custom_builder.build()?;

        // Default ignores (unless include_deps is true)
        let mut default_builder = GlobSetBuilder::new();
        if !config.include_deps {
            for pattern in [
                "**/node_modules/**",
                "**/.venv/**",
                "**/venv/**",
                "**/__pycache__/**",
                "**/dist/**",
                "**/build/**",
                "**/.git/**",
                "**/target/**",
                "**/*.min.js",
                "**/*.bundle.js",
            ] {
                default_builder.add(Glob::new(pattern)?);
            }
        }
        let default_ignores = default_builder.build()?;

        Ok(Self {
            gitignore,
            custom_globs,
            default_ignores,
        })
    }

    /// Check if a path should be ignored
    pub fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        let path_str = path.to_string_lossy();

        if self.default_ignores.is_match(&*path_str) || self.custom_globs.is_match(&*path_str) {
            return true;
        }

        match self.gitignore {
            Some(ref gi) => gi.matched(path, is_dir).is_ignore(),
            None => false,
        }
    }

    /// Check if path matches language filter
    pub fn matches_language_filter(&self, path: &Path, filter: &Option<Vec<Language>>) -> bool {
        let Some(lang) = path
            .extension()
            .and_then(|ext| Language::from_extension(&ext.to_string_lossy()))
        else {
            return false;
        };

        match filter {
            Some(langs) => langs.contains(&lang),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::new(PathBuf::from("/test"))
            .with_threads(4)
            .with_language_filter(vec![Language::Python])
            .with_region_config(RegionConfig::default().with_case_sensitive(true));

        assert_eq!(config.threads, 4);
        assert!(config.language_filter.is_some());
        assert!(config.region.case_sensitive);
    }

    #[test]
    fn test_region_config_from_toml() {
        let config = RegionConfig::from_toml_str(
            r#"
case_sensitive = true
start_keywords = ["BEGIN"]
end_keywords = ["END"]
"#,
        )
        .unwrap();

        assert!(config.case_sensitive);
        assert_eq!(config.start_keywords, vec!["BEGIN".to_string()]);
        // Untouched keys keep their defaults
        assert_eq!(config.fold_sentinel, "+");
        assert!(config.comment_prefixes.contains(&"//".to_string()));
    }

    #[test]
    fn test_region_config_rejects_empty_keywords() {
        let result = RegionConfig::from_toml_str("start_keywords = []");
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));

        let result = RegionConfig::from_toml_str("fold_sentinel = \"\"");
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_region_config_rejects_bad_toml() {
        let result = RegionConfig::from_toml_str("case_sensitive = \"maybe\"");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_language_filter() {
        let config = ScanConfig::new(PathBuf::from("."));
        let filter = IgnoreFilter::new(&config).unwrap();

        assert!(filter.matches_language_filter(Path::new("test.py"), &Some(vec![Language::Python])));
        assert!(!filter.matches_language_filter(Path::new("test.js"), &Some(vec![Language::Python])));
        assert!(filter.matches_language_filter(Path::new("test.ts"), &None));
        assert!(!filter.matches_language_filter(Path::new("README.md"), &None));
    }

    #[test]
    fn test_default_ignores() {
        let config = ScanConfig::new(PathBuf::from("/nonexistent-root"));
        let filter = IgnoreFilter::new(&config).unwrap();

        assert!(filter.should_ignore(Path::new("/p/node_modules/x/index.js"), false));
        assert!(!filter.should_ignore(Path::new("/p/src/index.js"), false));

        let config = config.with_include_deps(true);
        let filter = IgnoreFilter::new(&config).unwrap();
        assert!(!filter.should_ignore(Path::new("/p/node_modules/x/index.js"), false));
    }
}
