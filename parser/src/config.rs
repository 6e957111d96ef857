//! @ai:module:intent Configuration for batch annotation scans
//! @ai:module:layer infrastructure
//! @ai:module:public_api ScanConfig, CONFIG_FILE_NAME
//! @ai:module:depends_on error

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File looked up by [`ScanConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "anno.toml";

/// @ai:intent Settings shared by every scan entry point
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Fail a declaration on an undecodable embedded value instead of keeping its text.
    pub strict_values: bool,
    /// Report declarations that carry no doc comment.
    pub include_undocumented: bool,
    /// Directory names skipped while walking a tree.
    pub exclude_dirs: Vec<String>,
    /// Keep only these annotation names, compared case-insensitively.
    pub only: Option<Vec<String>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            strict_values: false,
            include_undocumented: false,
            exclude_dirs: default_exclude_dirs(),
            only: None,
        }
    }
}

fn default_exclude_dirs() -> Vec<String> {
    ["target", ".git", "node_modules"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl ScanConfig {
    /// @ai:intent Read a configuration file
    /// @ai:post missing keys take their defaults
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// @ai:intent Load `anno.toml` from a directory, or defaults when there is none
    /// @ai:effects fs:read
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!("Using configuration {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// @ai:intent Whether a directory name is excluded from walks
    /// @ai:effects pure
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|dir| dir == name)
    }

    /// Lowercased `only` filter, ready for [`crate::table::AnnotationTable::retain_names`].
    pub(crate) fn only_filter(&self) -> Option<Vec<String>> {
        self.only
            .as_ref()
            .map(|names| names.iter().map(|n| n.trim().to_lowercase()).collect())
    }
}
