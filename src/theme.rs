//! Centralized color theme for the application.
//!
//! Feature shapes use their identity color; everything else drawn on the
//! canvas or in the UI takes its color from here.

use bevy::prelude::Color;
use bevy_egui::egui;

// ============================================================================
// Canvas Background
// ============================================================================

/// Dark slate clear color behind the map
pub const CANVAS_BACKGROUND: Color = Color::srgb(0.11, 0.12, 0.14);

/// Faint lines at every whole degree of longitude and latitude
pub const GRATICULE_COLOR: Color = Color::srgba(0.5, 0.5, 0.5, 0.15);

// ============================================================================
// Vertex Handles
// ============================================================================

/// Unselected vertex handle
pub const HANDLE_COLOR: Color = Color::srgb(0.95, 0.95, 0.95);

/// Selected vertex handle
pub const HANDLE_SELECTED: Color = Color::srgb(0.2, 0.6, 1.0);

/// Vertex currently being dragged
pub const HANDLE_DRAGGING: Color = Color::srgb(1.0, 0.7, 0.2);

// ============================================================================
// Drawing
// ============================================================================

/// Outline and placed points of a feature being drawn
pub const DRAFT_COLOR: Color = Color::srgb(1.0, 0.85, 0.2);

/// Rubber-band segment from the last placed point to the cursor
pub const DRAFT_PREVIEW: Color = Color::srgba(1.0, 0.85, 0.2, 0.5);

/// Outline of the feature picked while not editing
pub const PICKED_OUTLINE: Color = Color::srgba(1.0, 1.0, 1.0, 0.6);

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Dark grey panel background (toolbar)
    pub const PANEL_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(45, 45, 48);

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// Red for error messages
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::RED;

    /// Amber mode badge while editing points
    pub const EDITING_BADGE: egui::Color32 = egui::Color32::from_rgb(230, 170, 60);

    /// Yellow mode badge while drawing
    pub const DRAWING_BADGE: egui::Color32 = egui::Color32::from_rgb(240, 215, 60);
}

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert a Bevy Color to egui Color32 (fully opaque)
pub fn bevy_to_egui_opaque(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgb(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
    )
}
