use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

use crate::features::SelectedFeature;

use super::commands::EditCommand;
use super::session::{DrawKind, EditSession};

impl DrawKind {
    pub fn shortcut(&self) -> KeyCode {
        match self {
            DrawKind::Point => KeyCode::KeyP,
            DrawKind::LineString => KeyCode::KeyL,
            DrawKind::Polygon => KeyCode::KeyG,
        }
    }

    pub fn shortcut_label(&self) -> &'static str {
        match self {
            DrawKind::Point => "P",
            DrawKind::LineString => "L",
            DrawKind::Polygon => "G",
        }
    }
}

fn ctrl_held(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.any_pressed([
        KeyCode::ControlLeft,
        KeyCode::ControlRight,
        KeyCode::SuperLeft,
        KeyCode::SuperRight,
    ])
}

/// The command a key press maps to in the current state
pub fn shortcut_command(
    keyboard: &ButtonInput<KeyCode>,
    session: &EditSession,
    selected: &SelectedFeature,
) -> Option<EditCommand> {
    let pressed = |key: KeyCode| keyboard.just_pressed(key);
    let editing = session.editing_feature().is_some();

    if ctrl_held(keyboard) {
        // Ctrl+Z is the single level of undo: drop the whole edit
        return (editing && pressed(KeyCode::KeyZ)).then_some(EditCommand::CancelEdit);
    }

    if let Some(kind) = DrawKind::ALL.into_iter().find(|kind| pressed(kind.shortcut())) {
        return Some(EditCommand::StartDrawing(kind));
    }

    if pressed(KeyCode::Enter) && session.is_drawing() {
        return Some(EditCommand::FinishDrawing);
    }

    if pressed(KeyCode::Escape) {
        if session.is_drawing() {
            return Some(EditCommand::CancelDrawing);
        }
        return editing.then_some(EditCommand::ExitEdit);
    }

    if pressed(KeyCode::KeyE) {
        if editing {
            return Some(EditCommand::ExitEdit);
        }
        return selected.id.map(EditCommand::EnterEdit);
    }

    if pressed(KeyCode::Delete) || pressed(KeyCode::Backspace) {
        if editing {
            return Some(EditCommand::DeleteSelectedPoints);
        }
        return selected.id.map(EditCommand::DeleteFeature);
    }

    if pressed(KeyCode::KeyI) {
        return session
            .selection()
            .and_then(|selection| selection.last_touched())
            .map(EditCommand::InsertPointAfter);
    }

    if pressed(KeyCode::KeyD) {
        if editing {
            return Some(EditCommand::DuplicateSelection);
        }
        return selected.id.map(EditCommand::DuplicateFeature);
    }

    if pressed(KeyCode::KeyF) {
        return Some(EditCommand::Recenter { padding: None });
    }

    None
}

pub fn handle_edit_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    session: Res<EditSession>,
    selected: Res<SelectedFeature>,
    mut contexts: EguiContexts,
    mut commands: MessageWriter<EditCommand>,
) {
    // Don't act on keys typed into a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if let Some(command) = shortcut_command(&keyboard, &session, &selected) {
        commands.write(command);
    }
}

/// Cursor shown over the canvas for the current session state
pub fn cursor_icon(session: &EditSession) -> CursorIcon {
    if session.is_dragging() {
        CursorIcon::System(SystemCursorIcon::Grabbing)
    } else if session.is_drawing() {
        CursorIcon::System(SystemCursorIcon::Crosshair)
    } else if session.editing_feature().is_some() {
        CursorIcon::System(SystemCursorIcon::Pointer)
    } else {
        CursorIcon::System(SystemCursorIcon::Default)
    }
}

pub fn update_cursor_icon(
    session: Res<EditSession>,
    mut window_query: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok((entity, _window)) = window_query.single_mut() else {
        return;
    };

    // Use default cursor over UI, session cursor on the canvas
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        commands
            .entity(entity)
            .insert(CursorIcon::System(SystemCursorIcon::Default));
        return;
    }

    commands.entity(entity).insert(cursor_icon(&session));
}
