//! @ai:module:intent Collect annotation tables for many declarations at once
//! @ai:module:layer application
//! @ai:module:public_api scan_file, scan_directory, scan_manifest, BatchScanner, ScanResult, ScanFailure, DeclarationAnnotations, Location
//! @ai:module:depends_on source, cache, config, table, error

use crate::cache::AnnotationCache;
use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::language::is_supported_file;
use crate::source::{CommentSource, SourceFile};
use crate::table::AnnotationTable;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// @ai:intent Where a scanned declaration came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Location {
    Source { file: PathBuf, line: usize },
    Manifest { index: usize },
}

impl Location {
    fn file(path: &Path) -> Self {
        Location::Source {
            file: path.to_path_buf(),
            line: 0,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Source { file, line: 0 } => write!(f, "{}", file.display()),
            Location::Source { file, line } => write!(f, "{}:{}", file.display(), line),
            Location::Manifest { index } => write!(f, "manifest[{}]", index),
        }
    }
}

/// @ai:intent Annotations of one declaration
#[derive(Debug, Clone, Serialize)]
pub struct DeclarationAnnotations {
    pub name: String,
    pub kind: String,
    pub location: Location,
    pub annotations: AnnotationTable,
}

/// @ai:intent A declaration or file that could not be processed
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub subject: String,
    pub location: Location,
    pub message: String,
}

/// @ai:intent Result of scanning a file, a tree or a manifest
#[derive(Debug, Clone, Serialize, Default)]
pub struct ScanResult {
    pub files_scanned: usize,
    pub declarations_scanned: usize,
    pub items: Vec<DeclarationAnnotations>,
    pub failures: Vec<ScanFailure>,
}

impl ScanResult {
    /// @ai:intent Check if every declaration was processed
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// @ai:intent Merge another scan result into this one
    pub fn merge(&mut self, other: ScanResult) {
        self.files_scanned += other.files_scanned;
        self.declarations_scanned += other.declarations_scanned;
        self.items.extend(other.items);
        self.failures.extend(other.failures);
    }

    fn fail(&mut self, subject: &str, location: Location, err: &Error) {
        self.failures.push(ScanFailure {
            subject: subject.to_string(),
            location,
            message: err.to_string(),
        });
    }
}

/// @ai:intent Scanner that shares one annotation cache across everything it visits
/// @ai:invariant a failure in one declaration never stops the others
pub struct BatchScanner<'a> {
    config: &'a ScanConfig,
    only: Option<Vec<String>>,
    cache: AnnotationCache,
}

impl<'a> BatchScanner<'a> {
    pub fn new(config: &'a ScanConfig) -> Self {
        Self {
            config,
            only: config.only_filter(),
            cache: AnnotationCache::new(),
        }
    }

    /// Number of distinct doc comments parsed so far.
    pub fn distinct_comments(&self) -> usize {
        self.cache.len()
    }

    /// @ai:intent Scan the module doc and every declaration of one source file
    /// @ai:effects fs:read
    pub fn scan_file(&self, path: &Path) -> Result<ScanResult> {
        let file = SourceFile::read(path)?;
        Ok(self.scan_source(&file))
    }

    /// @ai:intent Scan already-split source text
    /// @ai:effects pure
    pub fn scan_source(&self, file: &SourceFile) -> ScanResult {
        let mut result = ScanResult {
            files_scanned: 1,
            ..Default::default()
        };

        if file.module_doc.is_some() {
            let name = file
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let location = Location::Source {
                file: file.path.clone(),
                line: 1,
            };
            self.annotate(file, &name, "module", location, &mut result);
        }

        for decl in &file.declarations {
            let location = Location::Source {
                file: file.path.clone(),
                line: decl.line,
            };
            self.annotate(decl, &decl.name, &decl.kind, location, &mut result);
        }

        result
    }

    /// @ai:intent Scan every supported file below a directory
    /// @ai:post unreadable files are recorded as failures; excluded directories are not entered
    /// @ai:effects fs:read
    pub fn scan_directory(&self, path: &Path) -> Result<ScanResult> {
        if !path.is_dir() {
            return Err(Error::UnsupportedInput(format!(
                "{}: not a directory",
                path.display()
            )));
        }

        let mut result = ScanResult::default();

        for entry in WalkDir::new(path)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_path = entry.path();

            if is_supported_file(file_path) {
                match self.scan_file(file_path) {
                    Ok(file_result) => result.merge(file_result),
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", file_path.display(), e);
                        result.fail(
                            &file_path.display().to_string(),
                            Location::file(file_path),
                            &e,
                        );
                    }
                }
            }
        }

        tracing::info!(
            "Scanned {} files, {} declarations, {} distinct comments, {} failures",
            result.files_scanned,
            result.declarations_scanned,
            self.cache.len(),
            result.failures.len()
        );

        Ok(result)
    }

    /// @ai:intent Scan a JSON array of dynamic declarations
    /// @ai:pre entries look like `{"name": ..., "kind": ..., "doc": ...}`
    /// @ai:post Err only when the text is not a JSON array; bad entries become failures
    /// @ai:effects pure
    pub fn scan_manifest(&self, json: &str) -> Result<ScanResult> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut result = ScanResult::default();

        for (index, entry) in entries.iter().enumerate() {
            let name = entry
                .get("name")
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| format!("#{index}"), str::to_string);
            let kind = entry
                .get("kind")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("declaration");
            self.annotate(entry, &name, kind, Location::Manifest { index }, &mut result);
        }

        Ok(result)
    }

    fn annotate<S: CommentSource + ?Sized>(
        &self,
        source: &S,
        name: &str,
        kind: &str,
        location: Location,
        result: &mut ScanResult,
    ) {
        result.declarations_scanned += 1;

        let shared = if self.config.strict_values {
            self.cache.get_strict(source)
        } else {
            self.cache.get(source)
        };

        let mut annotations = match shared {
            Ok(table) => AnnotationTable::clone(&table),
            Err(e) => {
                tracing::warn!("{} ({}): {}", name, location, e);
                result.fail(name, location, &e);
                return;
            }
        };

        if let Some(only) = &self.only {
            annotations.retain_names(only);
        }

        if annotations.is_empty() && !self.config.include_undocumented {
            return;
        }

        result.items.push(DeclarationAnnotations {
            name: name.to_string(),
            kind: kind.to_string(),
            location,
            annotations,
        });
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.config.is_excluded_dir(name))
    }
}

/// @ai:intent Scan a single source file
/// @ai:effects fs:read
pub fn scan_file(path: &Path, config: &ScanConfig) -> Result<ScanResult> {
    BatchScanner::new(config).scan_file(path)
}

/// @ai:intent Scan all supported files in a directory
/// @ai:effects fs:read
pub fn scan_directory(path: &Path, config: &ScanConfig) -> Result<ScanResult> {
    BatchScanner::new(config).scan_directory(path)
}

/// @ai:intent Scan a JSON manifest of dynamic declarations
/// @ai:effects pure
pub fn scan_manifest(json: &str, config: &ScanConfig) -> Result<ScanResult> {
    BatchScanner::new(config).scan_manifest(json)
}
