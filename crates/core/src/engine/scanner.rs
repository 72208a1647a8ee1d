use crate::config::{IgnoreFilter, ScanConfig};
use crate::markers::MarkerParser;
use crate::models::{Language, RegionMap, RegionStats, ScanMetadata, SourceFile};
use crate::parsers::create_parser;
use crate::regions::build_regions;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
    #[error("Parser error: {0}")]
    ParserError(#[from] crate::parsers::ParserError),
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

/// Main scanner for finding region markers across a project
pub struct RegionScanner {
    config: ScanConfig,
    ignore_filter: IgnoreFilter,
    markers: MarkerParser,
}

impl RegionScanner {
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.region.validate()?;
        let ignore_filter = IgnoreFilter::new(&config)?;
        let markers = MarkerParser::new(&config.region);
        Ok(Self {
            config,
            ignore_filter,
            markers,
        })
    }

    /// Scan the project and return the region map
    pub fn scan(&self) -> Result<RegionMap, ScanError> {
        let start = Instant::now();

        let source_files = self.find_source_files()?;
        info!(root = %self.config.root.display(), files = source_files.len(), "scanning");

        let files: Vec<SourceFile> = if self.config.threads == 1 {
            source_files
                .iter()
                .map(|(path, lang)| self.parse_file(path, lang))
                .collect()
        } else if self.config.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .map_err(|e| ScanError::ThreadPoolError(e.to_string()))?;

            pool.install(|| {
                source_files
                    .par_iter()
                    .map(|(path, lang)| self.parse_file(path, lang))
                    .collect()
            })
        } else {
            source_files
                .par_iter()
                .map(|(path, lang)| self.parse_file(path, lang))
                .collect()
        };

        let stats = self.calculate_stats(&files);

        let duration = start.elapsed();
        let metadata = ScanMetadata {
            scan_duration_ms: duration.as_millis() as u64,
            files_per_second: if duration.as_secs_f64() > 0.0 {
                files.len() as f64 / duration.as_secs_f64()
            } else {
                0.0
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        };

        Ok(RegionMap {
            root: self.config.root.clone(),
            files,
            stats,
            metadata,
        })
    }

    /// Scan a single file
    pub fn scan_file(&self, path: &Path) -> Result<SourceFile, ScanError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();

        let lang = Language::from_extension(&ext).ok_or_else(|| {
            ScanError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Unsupported file extension: {}", ext),
            ))
        })?;

        let file = self.parse_file(path, &lang);
        if !file.parsed {
            let message = file
                .error
                .unwrap_or_else(|| "Failed to parse file".to_string());
            return Err(ScanError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                message,
            )));
        }
        Ok(file)
    }

    /// Find all source files matching the language filter
    fn find_source_files(&self) -> Result<Vec<(PathBuf, Language)>, ScanError> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.config.root)
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir() && self.ignore_filter.should_ignore(e.path(), true))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            if entry.file_type().is_dir() {
                continue;
            }

            if self.ignore_filter.should_ignore(path, false) {
                continue;
            }

            if !self
                .ignore_filter
                .matches_language_filter(path, &self.config.language_filter)
            {
                continue;
            }

            if let Some(lang) = path
                .extension()
                .and_then(|ext| Language::from_extension(&ext.to_string_lossy()))
            {
                files.push((path.to_path_buf(), lang));
            }
        }

        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }

    /// Parse a single source file; failures are recorded on the result
    fn parse_file(&self, path: &Path, language: &Language) -> SourceFile {
        let relative_path = path
            .strip_prefix(&self.config.root)
            .unwrap_or(path)
            .to_path_buf();

        let mut file = SourceFile {
            path: relative_path,
            absolute_path: path.to_path_buf(),
            language: language.clone(),
            snapshot: Default::default(),
            line_count: 0,
            parsed: false,
            error: None,
        };

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), "failed to read file: {}", e);
                file.error = Some(e.to_string());
                return file;
            }
        };
        file.line_count = content.lines().count();

        let comments = create_parser(language).and_then(|mut p| p.extract_comments(&content));
        let comments = match comments {
            Ok(lines) => lines,
            Err(e) => {
                warn!(path = %path.display(), "failed to parse file: {}", e);
                file.error = Some(e.to_string());
                return file;
            }
        };

        file.snapshot = build_regions(&self.markers.parse_lines(&comments));
        file.parsed = true;

        debug!(
            path = %file.path.display(),
            regions = file.snapshot.regions.len(),
            errors = file.snapshot.errors.len(),
            "parsed file"
        );
        for error in &file.snapshot.errors {
            warn!(path = %file.path.display(), line = error.line, "{}", error.message);
        }

        file
    }

    fn calculate_stats(&self, files: &[SourceFile]) -> RegionStats {
        let mut stats = RegionStats::default();
        for file in files {
            stats.add_file(file);
        }
        stats
    }
}
