//! Result types for async feature file operations.

use std::path::PathBuf;

use crate::features::Feature;

/// Result of an async export
pub struct ExportResult {
    pub path: PathBuf,
    pub success: bool,
    pub error: Option<String>,
}

/// Result of an async import
pub struct ImportResult {
    pub path: PathBuf,
    pub features: Option<Vec<Feature>>,
    pub error: Option<String>,
}
