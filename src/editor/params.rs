//! Common SystemParam bundles to reduce parameter counts in editor systems.
//!
//! ## Available Bundles
//!
//! - [`CameraParams`]: Camera and window access for cursor and projection queries
//!
//! ## Helper Functions
//!
//! - [`is_cursor_over_ui`]: Check if cursor is over egui UI (for input gating)

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::geometry::Position;

use super::projection::MapProjection;
use super::EditorCamera;

/// Bundled camera and window queries for cursor-to-world calculations
#[derive(SystemParam)]
pub struct CameraParams<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub camera: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<EditorCamera>>,
}

impl CameraParams<'_, '_> {
    /// Cursor position in viewport pixels, if the cursor is in the window
    pub fn cursor_screen_pos(&self) -> Option<Vec2> {
        self.window.single().ok()?.cursor_position()
    }

    /// Get the world position of the cursor, if available
    pub fn cursor_world_pos(&self) -> Option<Vec2> {
        let (camera, transform) = self.camera.single().ok()?;
        let cursor_pos = self.cursor_screen_pos()?;
        camera.viewport_to_world_2d(transform, cursor_pos).ok()
    }

    /// Logical size of the primary window
    pub fn window_size(&self) -> Option<Vec2> {
        self.window.single().ok().map(Window::size)
    }

    /// Projector between positions and screen pixels for the current view
    pub fn projector<'a>(&'a self, projection: &'a MapProjection) -> Option<ScreenProjector<'a>> {
        let (camera, transform) = self.camera.single().ok()?;
        Some(ScreenProjector {
            camera,
            transform,
            projection,
        })
    }
}

/// Position to screen-pixel conversion through the editor camera
pub struct ScreenProjector<'a> {
    camera: &'a Camera,
    transform: &'a GlobalTransform,
    projection: &'a MapProjection,
}

impl ScreenProjector<'_> {
    pub fn project(&self, position: Position) -> Option<Vec2> {
        let world = self.projection.to_world(position);
        self.camera
            .world_to_viewport(self.transform, world.extend(0.0))
            .ok()
    }

    pub fn unproject(&self, screen: Vec2) -> Option<Position> {
        self.camera
            .viewport_to_world_2d(self.transform, screen)
            .ok()
            .map(|world| self.projection.to_position(world))
    }
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}
