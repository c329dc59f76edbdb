use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::AppConfig;
use crate::editor::{DrawKind, EditCommand, EditMode, EditSession, GraticuleSettings};
use crate::features::{
    CurrentFeatureFile, DocumentDirtyState, ExportFeaturesRequest, FeatureStore,
    ImportFeaturesRequest, NewDocumentRequest, SelectedFeature,
};
use crate::theme;

use super::file_menu::{file_menu_contents, FileEvents, FileMenuState};

/// Main toolbar: file menu, drawing and editing commands, and a mode badge
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    session: Res<EditSession>,
    store: Res<FeatureStore>,
    selected: Res<SelectedFeature>,
    config: Res<AppConfig>,
    current_file: Res<CurrentFeatureFile>,
    dirty_state: Res<DocumentDirtyState>,
    mut menu_state: ResMut<FileMenuState>,
    mut graticule: ResMut<GraticuleSettings>,
    mut edit_commands: MessageWriter<EditCommand>,
    mut new_events: MessageWriter<NewDocumentRequest>,
    mut import_events: MessageWriter<ImportFeaturesRequest>,
    mut export_events: MessageWriter<ExportFeaturesRequest>,
) -> Result {
    let mut file_events = FileEvents::default();
    let mut issued = Vec::new();

    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8))
                .fill(theme::ui::PANEL_BACKGROUND),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                ui.menu_button("File", |ui| {
                    file_menu_contents(
                        ui,
                        &mut menu_state,
                        &config,
                        &current_file,
                        &dirty_state,
                        &mut file_events,
                    );
                });

                toolbar_separator(ui);

                // Drawing buttons with keyboard shortcuts
                let editing = session.editing_feature().is_some();
                for kind in DrawKind::ALL {
                    let drawing_this = matches!(
                        session.mode(),
                        EditMode::Drawing { kind: current, .. } if *current == kind
                    );
                    let label = format!("{} [{}]", kind.display_name(), kind.shortcut_label());
                    let button = egui::Button::new(egui::RichText::new(label).size(14.0).strong())
                        .min_size(egui::vec2(0.0, 28.0))
                        .selected(drawing_this);

                    let response = ui
                        .add_enabled(!editing, button)
                        .on_hover_text(format!("Draw a new {}", kind.display_name()));
                    if response.clicked() {
                        issued.push(EditCommand::StartDrawing(kind));
                    }
                }

                toolbar_separator(ui);

                match session.mode() {
                    EditMode::Drawing { .. } => {
                        drawing_controls(ui, &session, &mut issued);
                    }
                    EditMode::Editing { .. } => {
                        editing_controls(ui, &session, &mut issued);
                    }
                    EditMode::Idle => {
                        feature_controls(ui, &store, &selected, &mut issued);
                    }
                }

                toolbar_separator(ui);

                if ui.button("Recenter [F]").clicked() {
                    issued.push(EditCommand::Recenter { padding: None });
                }
                ui.checkbox(&mut graticule.visible, "Graticule");

                // Right-aligned status
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let dirty_marker = if dirty_state.is_dirty { "*" } else { "" };
                    ui.label(
                        egui::RichText::new(format!(
                            "{}{}",
                            current_file.display_name(),
                            dirty_marker
                        ))
                        .color(theme::ui::LABEL_TEXT),
                    );
                    mode_badge(ui, &session, &store);
                });
            });
        });

    for command in issued {
        edit_commands.write(command);
    }
    file_events.send(&mut new_events, &mut import_events, &mut export_events);
    Ok(())
}

fn toolbar_separator(ui: &mut egui::Ui) {
    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);
}

fn drawing_controls(ui: &mut egui::Ui, session: &EditSession, issued: &mut Vec<EditCommand>) {
    if ui
        .add_enabled(session.can_finish(), egui::Button::new("Finish [Enter]"))
        .clicked()
    {
        issued.push(EditCommand::FinishDrawing);
    }
    if ui.button("Cancel [Esc]").clicked() {
        issued.push(EditCommand::CancelDrawing);
    }

    if let Some((kind, points)) = session.draft() {
        ui.label(
            egui::RichText::new(format!(
                "{} point(s), {} needs {}",
                points.len(),
                kind.display_name(),
                kind.min_points()
            ))
            .color(theme::ui::HINT_TEXT)
            .size(11.0),
        );
    }
}

fn editing_controls(ui: &mut egui::Ui, session: &EditSession, issued: &mut Vec<EditCommand>) {
    let has_selection = session.selection().is_some_and(|s| !s.is_empty());
    let last_touched = session.selection().and_then(|s| s.last_touched());

    if ui.button("Done [Esc]").clicked() {
        issued.push(EditCommand::ExitEdit);
    }
    if ui
        .button("Revert [Ctrl+Z]")
        .on_hover_text("Discard every change made in this edit")
        .clicked()
    {
        issued.push(EditCommand::CancelEdit);
    }

    toolbar_separator(ui);

    if ui
        .add_enabled(has_selection, egui::Button::new("Delete Points [Del]"))
        .clicked()
    {
        issued.push(EditCommand::DeleteSelectedPoints);
    }
    if ui
        .add_enabled(last_touched.is_some(), egui::Button::new("Insert After [I]"))
        .clicked()
        && let Some(index) = last_touched
    {
        issued.push(EditCommand::InsertPointAfter(index));
    }
    if ui
        .add_enabled(has_selection, egui::Button::new("Duplicate [D]"))
        .on_hover_text("Copy the selected points into a new feature")
        .clicked()
    {
        issued.push(EditCommand::DuplicateSelection);
    }

    ui.label(
        egui::RichText::new("Shift+Click: Range   Ctrl+Click: Add")
            .color(theme::ui::HINT_TEXT)
            .size(11.0),
    );
}

fn feature_controls(
    ui: &mut egui::Ui,
    store: &FeatureStore,
    selected: &SelectedFeature,
    issued: &mut Vec<EditCommand>,
) {
    let target = selected
        .id
        .and_then(|id| store.index_of(id).map(|index| (id, index)));
    let enabled = target.is_some();

    match selected.id.and_then(|id| store.layer(id)) {
        Some(layer) => {
            ui.label(
                egui::RichText::new(layer.feature.display_name())
                    .color(theme::bevy_to_egui_opaque(layer.color))
                    .strong(),
            );
        }
        None => {
            ui.label(
                egui::RichText::new("Double-click a point to edit")
                    .color(theme::ui::HINT_TEXT)
                    .size(11.0),
            );
        }
    }

    if ui.add_enabled(enabled, egui::Button::new("Edit [E]")).clicked()
        && let Some((id, _)) = target
    {
        issued.push(EditCommand::EnterEdit(id));
    }
    if ui
        .add_enabled(enabled, egui::Button::new("Duplicate [D]"))
        .clicked()
        && let Some((id, _)) = target
    {
        issued.push(EditCommand::DuplicateFeature(id));
    }
    if ui
        .add_enabled(enabled, egui::Button::new("Delete [Del]"))
        .clicked()
        && let Some((id, _)) = target
    {
        issued.push(EditCommand::DeleteFeature(id));
    }

    let last = store.len().saturating_sub(1);
    let can_raise = target.is_some_and(|(_, index)| index < last);
    let can_lower = target.is_some_and(|(_, index)| index > 0);
    if ui
        .add_enabled(can_raise, egui::Button::new("Raise"))
        .on_hover_text("Draw above the next feature")
        .clicked()
        && let Some((_, index)) = target
    {
        issued.push(EditCommand::ReorderFeature {
            from: index,
            to: index + 1,
        });
    }
    if ui
        .add_enabled(can_lower, egui::Button::new("Lower"))
        .on_hover_text("Draw below the previous feature")
        .clicked()
        && let Some((_, index)) = target
    {
        issued.push(EditCommand::ReorderFeature {
            from: index,
            to: index - 1,
        });
    }
    if ui.add_enabled(enabled, egui::Button::new("Zoom To")).clicked()
        && let Some((id, _)) = target
    {
        issued.push(EditCommand::FocusFeature(id));
    }
}

fn mode_badge(ui: &mut egui::Ui, session: &EditSession, store: &FeatureStore) {
    match session.mode() {
        EditMode::Idle => {}
        EditMode::Drawing { kind, .. } => {
            ui.colored_label(
                theme::ui::DRAWING_BADGE,
                egui::RichText::new(format!("● DRAWING {}", kind.display_name().to_uppercase()))
                    .strong(),
            );
        }
        EditMode::Editing { feature, .. } => {
            let name = store
                .feature(*feature)
                .map(|f| f.display_name().to_string())
                .unwrap_or_default();
            ui.colored_label(
                theme::ui::EDITING_BADGE,
                egui::RichText::new(format!("● EDITING {}", name)).strong(),
            );
        }
    }
}
