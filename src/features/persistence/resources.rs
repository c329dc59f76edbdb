//! Resource types for feature file state tracking.

use bevy::prelude::*;
use bevy::tasks::Task;
use std::path::PathBuf;

use super::results::{ExportResult, ImportResult};

/// Import failure shown to the user as a single message
#[derive(Resource, Default)]
pub struct FeatureLoadError {
    pub message: Option<String>,
}

#[derive(Resource, Default)]
pub struct FeatureSaveError {
    pub message: Option<String>,
}

/// Tracks in-flight file I/O so only one runs at a time
#[derive(Resource, Default)]
pub struct AsyncFileOperation {
    pub is_saving: bool,
    pub is_loading: bool,
    pub operation_description: Option<String>,
}

impl AsyncFileOperation {
    pub fn is_busy(&self) -> bool {
        self.is_saving || self.is_loading
    }
}

#[derive(Component)]
pub struct ExportTask(pub Task<ExportResult>);

#[derive(Component)]
pub struct ImportTask(pub Task<ImportResult>);

/// The file the current document was loaded from or last saved to
#[derive(Resource, Default)]
pub struct CurrentFeatureFile {
    pub path: Option<PathBuf>,
}

impl CurrentFeatureFile {
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
            .to_string()
    }
}

/// Whether the document has unsaved changes
#[derive(Resource, Default)]
pub struct DocumentDirtyState {
    pub is_dirty: bool,
}
