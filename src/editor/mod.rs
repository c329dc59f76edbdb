mod camera;
pub mod commands;
mod conditions;
pub mod error;
mod grid;
mod input;
pub mod overlay;
pub mod params;
pub mod point_editor;
mod projection;
pub mod session;
mod shortcuts;

pub use camera::{EditorCamera, RecenterRequest};
pub use commands::EditCommand;
pub use error::EditError;
pub use grid::GraticuleSettings;
pub use projection::MapProjection;
pub use session::{DrawKind, EditMode, EditSession, SelectionMode};

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded};

/// Apply persisted editor settings to the session once config is loaded
fn apply_editor_settings(config: Res<AppConfig>, mut session: ResMut<EditSession>) {
    session.configure(&config.data.editor);
    debug!(
        "Editor settings: hit threshold {}px, drag interval {:?}",
        session.hit_threshold_px(),
        session.drag_interval()
    );
}

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditSession>()
            .init_resource::<MapProjection>()
            .init_resource::<GraticuleSettings>()
            .init_resource::<input::GestureState>()
            .init_resource::<camera::PendingRecenter>()
            .add_message::<EditCommand>()
            .add_message::<RecenterRequest>()
            // Overlays render on the overlay layer only
            .init_gizmo_group::<overlay::OverlayGizmoGroup>()
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    overlay::configure_overlay_gizmos,
                    apply_editor_settings.after(ConfigLoaded),
                ),
            )
            .add_systems(
                Update,
                (
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::apply_recenter,
                    camera::apply_camera_zoom,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    shortcuts::handle_edit_shortcuts,
                    input::handle_canvas_pointer,
                )
                    .run_if(conditions::no_dialog_open)
                    .before(commands::apply_edit_commands),
            )
            .add_systems(
                Update,
                (
                    commands::apply_edit_commands,
                    input::notify_after_drag.run_if(conditions::editing_active),
                    shortcuts::update_cursor_icon,
                    grid::draw_graticule,
                    overlay::draw_overlays,
                ),
            );
    }
}
