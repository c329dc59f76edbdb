//! New-document handling.

use bevy::prelude::*;

use crate::editor::EditSession;
use crate::features::{FeatureStore, SelectedFeature};

use super::messages::NewDocumentRequest;
use super::resources::{CurrentFeatureFile, DocumentDirtyState};

pub fn new_document_system(
    mut events: MessageReader<NewDocumentRequest>,
    mut store: ResMut<FeatureStore>,
    mut session: ResMut<EditSession>,
    mut selected: ResMut<SelectedFeature>,
    mut current_file: ResMut<CurrentFeatureFile>,
    mut dirty_state: ResMut<DocumentDirtyState>,
) {
    for _ in events.read() {
        session.reset();
        selected.id = None;
        store.clear();
        current_file.path = None;
        dirty_state.is_dirty = false;
        info!("Started a new document");
    }
}
