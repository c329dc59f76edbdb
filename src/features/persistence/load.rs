//! Feature import system and task polling.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::config::UpdateLastFilePathRequest;
use crate::editor::{EditSession, MapProjection, RecenterRequest};
use crate::features::{FeatureStore, SelectedFeature};
use crate::geometry::compute_bounds;

use super::codec::decode_feature_collection;
use super::messages::ImportFeaturesRequest;
use super::resources::{
    AsyncFileOperation, CurrentFeatureFile, DocumentDirtyState, FeatureLoadError, ImportTask,
};
use super::results::ImportResult;

/// Starts an async import
pub fn import_features_system(
    mut commands: Commands,
    mut events: MessageReader<ImportFeaturesRequest>,
    mut async_op: ResMut<AsyncFileOperation>,
    mut load_error: ResMut<FeatureLoadError>,
) {
    for event in events.read() {
        if async_op.is_busy() {
            warn!("File operation already in progress");
            continue;
        }

        load_error.message = None;

        let path = event.path.clone();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("features")
            .to_string();

        async_op.is_loading = true;
        async_op.operation_description = Some(format!("Loading {}...", file_name));

        let task_pool = IoTaskPool::get();
        let task = task_pool.spawn(async move {
            let json = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    return ImportResult {
                        path,
                        features: None,
                        error: Some(format!("Failed to read file: {}", e)),
                    };
                }
            };

            match decode_feature_collection(&json) {
                Ok(features) => ImportResult {
                    path,
                    features: Some(features),
                    error: None,
                },
                Err(e) => ImportResult {
                    path,
                    features: None,
                    error: Some(format!("Failed to import features: {}", e)),
                },
            }
        });

        commands.spawn(ImportTask(task));
    }
}

/// Polls import tasks and swaps the imported features into the store
#[allow(clippy::too_many_arguments)]
pub fn poll_import_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ImportTask)>,
    mut async_op: ResMut<AsyncFileOperation>,
    mut store: ResMut<FeatureStore>,
    mut session: ResMut<EditSession>,
    mut selected: ResMut<SelectedFeature>,
    mut projection: ResMut<MapProjection>,
    mut current_file: ResMut<CurrentFeatureFile>,
    mut dirty_state: ResMut<DocumentDirtyState>,
    mut load_error: ResMut<FeatureLoadError>,
    mut recenter_events: MessageWriter<RecenterRequest>,
    mut config_events: MessageWriter<UpdateLastFilePathRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };

        async_op.is_loading = false;
        async_op.operation_description = None;

        match result.features {
            Some(features) => {
                info!(
                    "Imported {} features from {:?}",
                    features.len(),
                    result.path
                );

                session.reset();
                selected.id = None;
                store.replace_all(features);

                // Keep world coordinates small around the imported data
                if let Some(bounds) =
                    compute_bounds(store.iter().map(|layer| &layer.feature.geometry))
                {
                    projection.origin = bounds.center();
                }
                recenter_events.write(RecenterRequest::default());

                current_file.path = Some(result.path.clone());
                dirty_state.is_dirty = false;
                config_events.write(UpdateLastFilePathRequest { path: result.path });
            }
            None => {
                let message = result
                    .error
                    .unwrap_or_else(|| "Failed to import features".to_string());
                error!("{}", message);
                load_error.message = Some(message);
            }
        }

        commands.entity(entity).despawn();
    }
}
