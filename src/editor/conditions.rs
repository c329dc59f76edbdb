//! Run conditions for controlling when editor systems execute.

use bevy::prelude::*;

use crate::editor::session::EditSession;
use crate::ui::DialogState;

/// Run condition: returns true when a feature is being point-edited.
///
/// Usage: `.run_if(editing_active)`
pub fn editing_active(session: Res<EditSession>) -> bool {
    session.editing_feature().is_some()
}

/// Run condition: returns true when no modal dialog is open.
///
/// Use this to prevent editor input handlers from processing when
/// the user is interacting with a dialog.
///
/// Usage: `.run_if(no_dialog_open)`
pub fn no_dialog_open(dialog_state: Res<DialogState>) -> bool {
    !dialog_state.any_modal_open
}
