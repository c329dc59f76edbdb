//! Dirty state tracking for unsaved changes.

use bevy::prelude::*;

use crate::features::FeaturesChanged;

use super::resources::DocumentDirtyState;

/// Marks the document dirty whenever the feature set reports a change
pub fn mark_dirty_on_change(
    mut events: MessageReader<FeaturesChanged>,
    mut dirty_state: ResMut<DocumentDirtyState>,
) {
    if events.read().next().is_none() {
        return;
    }
    events.clear();
    dirty_state.is_dirty = true;
}
