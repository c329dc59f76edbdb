pub mod file_menu;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::{ConfigResetNotification, MissingFileWarning};
use crate::features::{AsyncFileOperation, FeatureLoadError, FeatureSaveError};

/// Resource that tracks whether any modal dialog is currently open.
/// Editor input handlers should check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block editor input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
fn update_dialog_state(
    file_menu: Res<file_menu::FileMenuState>,
    missing_file: Res<MissingFileWarning>,
    config_reset: Res<ConfigResetNotification>,
    save_error: Res<FeatureSaveError>,
    load_error: Res<FeatureLoadError>,
    async_op: Res<AsyncFileOperation>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = file_menu.show_new_confirmation
        || missing_file.show
        || config_reset.show
        || save_error.message.is_some()
        || load_error.message.is_some()
        || async_op.is_busy();
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<file_menu::FileMenuState>()
            .add_systems(EguiPrimaryContextPass, toolbar::toolbar_ui)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Dialogs render over the toolbar
                    file_menu::file_menu_ui,
                    file_menu::missing_file_warning_ui,
                    file_menu::async_operation_modal_ui,
                    file_menu::load_error_dialog_ui,
                    file_menu::save_error_dialog_ui,
                    file_menu::config_reset_notification_ui,
                )
                    .after(toolbar::toolbar_ui),
            )
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
