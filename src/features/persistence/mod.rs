//! GeoJSON persistence for the feature store.
//!
//! Handles async file I/O for feature collections, including:
//! - Import/export with async task pooling
//! - Deterministic identity for imported features
//! - Dirty state tracking
//!
//! ## Module Structure
//!
//! - [`codec`] - FeatureCollection encoding/decoding
//! - [`messages`] - Message types for file operations
//! - [`resources`] - Resource types for state tracking
//! - [`results`] - Result types for async operations
//! - [`load`] - Import system and task polling
//! - [`save`] - Export system and task polling
//! - [`document`] - New document system
//! - [`dirty`] - Dirty state detection

mod codec;
mod dirty;
mod document;
mod load;
mod messages;
mod resources;
mod results;
mod save;


// Re-exports - Codec
pub use codec::{decode_feature_collection, encode_feature_collection, DecodeError};

// Re-exports - Messages
pub use messages::{ExportFeaturesRequest, ImportFeaturesRequest, NewDocumentRequest};

// Re-exports - Resources
pub use resources::{
    AsyncFileOperation, CurrentFeatureFile, DocumentDirtyState, FeatureLoadError,
    FeatureSaveError,
};

// Re-exports - Systems
pub use dirty::mark_dirty_on_change;
pub use document::new_document_system;
pub use load::{import_features_system, poll_import_tasks};
pub use save::{export_features_system, poll_export_tasks};
