//! Feature export system and task polling.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::config::UpdateLastFilePathRequest;
use crate::features::FeatureStore;

use super::codec::encode_feature_collection;
use super::messages::ExportFeaturesRequest;
use super::resources::{
    AsyncFileOperation, CurrentFeatureFile, DocumentDirtyState, ExportTask, FeatureSaveError,
};
use super::results::ExportResult;

/// Starts an async export of the whole store
pub fn export_features_system(
    mut commands: Commands,
    mut events: MessageReader<ExportFeaturesRequest>,
    store: Res<FeatureStore>,
    mut async_op: ResMut<AsyncFileOperation>,
) {
    for event in events.read() {
        if async_op.is_busy() {
            warn!("File operation already in progress");
            continue;
        }

        let features = store.features();
        let path = event.path.clone();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("features")
            .to_string();

        async_op.is_saving = true;
        async_op.operation_description = Some(format!("Saving {}...", file_name));

        let task_pool = IoTaskPool::get();
        let task = task_pool.spawn(async move {
            match encode_feature_collection(&features) {
                Ok(json) => {
                    if let Err(e) = std::fs::write(&path, json) {
                        ExportResult {
                            path,
                            success: false,
                            error: Some(format!("Failed to write file: {}", e)),
                        }
                    } else {
                        ExportResult {
                            path,
                            success: true,
                            error: None,
                        }
                    }
                }
                Err(e) => ExportResult {
                    path,
                    success: false,
                    error: Some(format!("Failed to serialize features: {}", e)),
                },
            }
        });

        commands.spawn(ExportTask(task));
    }
}

/// Polls export tasks and handles completion
pub fn poll_export_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ExportTask)>,
    mut async_op: ResMut<AsyncFileOperation>,
    mut current_file: ResMut<CurrentFeatureFile>,
    mut dirty_state: ResMut<DocumentDirtyState>,
    mut save_error: ResMut<FeatureSaveError>,
    mut config_events: MessageWriter<UpdateLastFilePathRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(result) = future::block_on(future::poll_once(&mut task.0)) {
            async_op.is_saving = false;
            async_op.operation_description = None;

            if result.success {
                info!("Features saved to {:?}", result.path);
                save_error.message = None;
                current_file.path = Some(result.path.clone());
                dirty_state.is_dirty = false;
                config_events.write(UpdateLastFilePathRequest { path: result.path });
            } else if let Some(error) = result.error {
                error!("{}", error);
                save_error.message = Some(error);
            }

            commands.entity(entity).despawn();
        }
    }
}
