mod color;
mod feature;
pub mod persistence;
mod store;

pub use feature::{Feature, FeatureId};
pub use persistence::{
    AsyncFileOperation, CurrentFeatureFile, DocumentDirtyState, ExportFeaturesRequest,
    FeatureLoadError, FeatureSaveError, ImportFeaturesRequest, NewDocumentRequest,
};
pub use store::{FeatureLayer, FeatureStore};

use bevy::prelude::*;

/// Sent whenever committed feature data changes (geometry, properties, order,
/// membership). Drag gestures report once, after the drag has settled.
#[derive(Message)]
pub struct FeaturesChanged;

/// The feature picked on the canvas while not editing
#[derive(Resource, Default)]
pub struct SelectedFeature {
    pub id: Option<FeatureId>,
}

pub struct FeaturesPlugin;

impl Plugin for FeaturesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FeatureStore>()
            .init_resource::<SelectedFeature>()
            .init_resource::<FeatureLoadError>()
            .init_resource::<FeatureSaveError>()
            .init_resource::<AsyncFileOperation>()
            .init_resource::<CurrentFeatureFile>()
            .init_resource::<DocumentDirtyState>()
            .add_message::<FeaturesChanged>()
            .add_message::<ImportFeaturesRequest>()
            .add_message::<ExportFeaturesRequest>()
            .add_message::<NewDocumentRequest>()
            .add_systems(
                Update,
                (
                    persistence::import_features_system
                        .run_if(on_message::<ImportFeaturesRequest>),
                    persistence::export_features_system
                        .run_if(on_message::<ExportFeaturesRequest>),
                    persistence::new_document_system.run_if(on_message::<NewDocumentRequest>),
                    persistence::poll_import_tasks,
                    persistence::poll_export_tasks,
                    persistence::mark_dirty_on_change,
                ),
            );
    }
}
