use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, ConfigResetNotification, MissingFileWarning, SaveConfigRequest};
use crate::features::{
    AsyncFileOperation, CurrentFeatureFile, DocumentDirtyState, ExportFeaturesRequest,
    FeatureLoadError, FeatureSaveError, ImportFeaturesRequest, NewDocumentRequest,
};
use crate::paths::dialog_start_dir;
use crate::theme;

const GEOJSON_EXTENSIONS: &[&str] = &["geojson", "json"];

#[derive(Resource, Default)]
pub struct FileMenuState {
    pub show_new_confirmation: bool,
}

/// The File menu shown in the toolbar
pub fn file_menu_contents(
    ui: &mut egui::Ui,
    menu_state: &mut FileMenuState,
    config: &AppConfig,
    current_file: &CurrentFeatureFile,
    dirty_state: &DocumentDirtyState,
    file_events: &mut FileEvents,
) {
    if ui.button("New").clicked() {
        if dirty_state.is_dirty {
            menu_state.show_new_confirmation = true;
        } else {
            file_events.new_document = true;
        }
        ui.close();
    }

    ui.separator();

    if ui.button("Open...").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("GeoJSON", GEOJSON_EXTENSIONS)
            .set_directory(start_dir(config, current_file))
            .set_title("Open GeoJSON")
            .pick_file()
        {
            file_events.import = Some(path);
        }
        ui.close();
    }

    ui.add_enabled_ui(!config.data.recent_files.is_empty(), |ui| {
        ui.menu_button("Open Recent", |ui| {
            for path in &config.data.recent_files {
                let label = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.to_string_lossy().to_string());
                if ui
                    .button(label)
                    .on_hover_text(path.to_string_lossy().to_string())
                    .clicked()
                {
                    file_events.import = Some(path.clone());
                    ui.close();
                }
            }
        });
    });

    ui.separator();

    if ui.button("Save").clicked() {
        file_events.export = match &current_file.path {
            Some(path) => Some(path.clone()),
            None => pick_save_path(config, current_file),
        };
        ui.close();
    }

    if ui.button("Save As...").clicked() {
        file_events.export = pick_save_path(config, current_file);
        ui.close();
    }
}

/// File actions chosen in the menu this frame
#[derive(Default)]
pub struct FileEvents {
    pub new_document: bool,
    pub import: Option<PathBuf>,
    pub export: Option<PathBuf>,
}

impl FileEvents {
    pub fn send(
        self,
        new_events: &mut MessageWriter<NewDocumentRequest>,
        import_events: &mut MessageWriter<ImportFeaturesRequest>,
        export_events: &mut MessageWriter<ExportFeaturesRequest>,
    ) {
        if self.new_document {
            new_events.write(NewDocumentRequest);
        }
        if let Some(path) = self.import {
            import_events.write(ImportFeaturesRequest { path });
        }
        if let Some(path) = self.export {
            export_events.write(ExportFeaturesRequest { path });
        }
    }
}

fn start_dir(config: &AppConfig, current_file: &CurrentFeatureFile) -> PathBuf {
    let last = current_file
        .path
        .as_ref()
        .or(config.data.last_file_path.as_ref());
    dialog_start_dir(last).unwrap_or_else(|| PathBuf::from("."))
}

fn pick_save_path(config: &AppConfig, current_file: &CurrentFeatureFile) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("GeoJSON", GEOJSON_EXTENSIONS)
        .set_directory(start_dir(config, current_file))
        .set_file_name(current_file.display_name())
        .set_title("Save GeoJSON")
        .save_file()
        .map(|path| with_geojson_extension(&path))
}

/// Adds `.geojson` unless the name already carries a GeoJSON extension
pub fn with_geojson_extension(path: &Path) -> PathBuf {
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| GEOJSON_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
    if has_extension {
        path.to_path_buf()
    } else {
        path.with_extension("geojson")
    }
}

/// Renders the confirmation shown before discarding unsaved changes
pub fn file_menu_ui(
    mut contexts: EguiContexts,
    mut menu_state: ResMut<FileMenuState>,
    mut new_events: MessageWriter<NewDocumentRequest>,
) -> Result {
    if !menu_state.show_new_confirmation {
        return Ok(());
    }

    egui::Window::new("New Document")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Start a new document? Unsaved changes will be lost.");
            ui.horizontal(|ui| {
                if ui.button("Discard and Start New").clicked() {
                    new_events.write(NewDocumentRequest);
                    menu_state.show_new_confirmation = false;
                }
                if ui.button("Cancel").clicked() {
                    menu_state.show_new_confirmation = false;
                }
            });
        });

    Ok(())
}

fn truncated_path(path: &Path, max: usize) -> String {
    let path_str = path.to_string_lossy();
    let count = path_str.chars().count();
    if count > max {
        let tail: String = path_str.chars().skip(count - (max - 3)).collect();
        format!("...{}", tail)
    } else {
        path_str.to_string()
    }
}

/// Renders the missing file warning dialog (shown at startup if the last file doesn't exist)
pub fn missing_file_warning_ui(
    mut contexts: EguiContexts,
    mut warning: ResMut<MissingFileWarning>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    if !warning.show {
        return Ok(());
    }

    egui::Window::new("File Not Found")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("The last opened GeoJSON file no longer exists:");

            if let Some(ref path) = warning.path {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(truncated_path(path, 50)).weak())
                    .on_hover_text(path.to_string_lossy().to_string());
                ui.add_space(10.0);
            }

            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    warning.show = false;
                }

                if ui.button("Clear from history").clicked() {
                    if let Some(ref path) = warning.path {
                        config.data.recent_files.retain(|p| p != path);
                    }
                    config.data.last_file_path = None;
                    config.dirty = true;
                    save_events.write(SaveConfigRequest);
                    warning.show = false;
                }
            });
        });

    Ok(())
}

/// Blocks the window while a file is being read or written
pub fn async_operation_modal_ui(
    mut contexts: EguiContexts,
    async_op: Res<AsyncFileOperation>,
) -> Result {
    if !async_op.is_busy() {
        return Ok(());
    }

    let description = async_op
        .operation_description
        .as_deref()
        .unwrap_or("Working...");

    egui::Window::new("Please Wait")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(description);
            });
        });

    Ok(())
}

fn error_window(ctx: &egui::Context, title: &str, message: &str) -> bool {
    let mut dismissed = false;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                ui.colored_label(theme::ui::ERROR_TEXT, message);
            });
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    dismissed
}

pub fn load_error_dialog_ui(
    mut contexts: EguiContexts,
    mut load_error: ResMut<FeatureLoadError>,
) -> Result {
    if let Some(message) = &load_error.message
        && error_window(contexts.ctx_mut()?, "Open Failed", message)
    {
        load_error.message = None;
    }
    Ok(())
}

pub fn save_error_dialog_ui(
    mut contexts: EguiContexts,
    mut save_error: ResMut<FeatureSaveError>,
) -> Result {
    if let Some(message) = &save_error.message
        && error_window(contexts.ctx_mut()?, "Save Failed", message)
    {
        save_error.message = None;
    }
    Ok(())
}

/// Tells the user their configuration was unreadable and has been reset
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Settings Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Your settings could not be loaded and were reset to defaults.");
            if let Some(ref reason) = notification.reason {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(reason).weak());
            }
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                notification.show = false;
                notification.reason = None;
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geojson_extension_added_when_missing() {
        assert_eq!(
            with_geojson_extension(Path::new("/maps/coast")),
            PathBuf::from("/maps/coast.geojson")
        );
        assert_eq!(
            with_geojson_extension(Path::new("/maps/coast.txt")),
            PathBuf::from("/maps/coast.geojson")
        );
    }

    #[test]
    fn test_geojson_extension_kept() {
        assert_eq!(
            with_geojson_extension(Path::new("/maps/coast.json")),
            PathBuf::from("/maps/coast.json")
        );
        assert_eq!(
            with_geojson_extension(Path::new("/maps/coast.GeoJSON")),
            PathBuf::from("/maps/coast.GeoJSON")
        );
    }

    #[test]
    fn test_truncated_path() {
        let long = PathBuf::from(format!("/{}/tracks.geojson", "a".repeat(60)));
        let shown = truncated_path(&long, 30);
        assert_eq!(shown.chars().count(), 30);
        assert!(shown.starts_with("..."));
        assert!(shown.ends_with("tracks.geojson"));
        assert_eq!(truncated_path(Path::new("/a.geojson"), 30), "/a.geojson");
    }
}
