//! Message types for feature file operations.

use bevy::prelude::*;
use std::path::PathBuf;

#[derive(Message)]
pub struct ImportFeaturesRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct ExportFeaturesRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct NewDocumentRequest;
