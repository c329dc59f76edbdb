//! The command surface the UI and keyboard use to drive the editor.

use bevy::prelude::*;

use crate::features::{FeatureId, FeatureStore, FeaturesChanged, SelectedFeature};

use super::camera::RecenterRequest;
use super::error::EditError;
use super::session::{DrawKind, EditSession, SelectionMode};

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum EditCommand {
    StartDrawing(DrawKind),
    FinishDrawing,
    CancelDrawing,
    EnterEdit(FeatureId),
    EnterEditAtPoint { feature: FeatureId, index: usize },
    ExitEdit,
    CancelEdit,
    SelectPoint { index: usize, mode: SelectionMode },
    DeleteSelectedPoints,
    InsertPointAfter(usize),
    DuplicateSelection,
    DeleteFeature(FeatureId),
    DuplicateFeature(FeatureId),
    ReorderFeature { from: usize, to: usize },
    Recenter { padding: Option<f64> },
    FocusFeature(FeatureId),
}

/// What a successfully applied command asks of the rest of the app
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    Unchanged,
    /// Committed feature data changed
    Changed,
    Recenter(RecenterRequest),
}

/// Apply one command to the store and session
pub fn apply_command(
    command: EditCommand,
    store: &mut FeatureStore,
    session: &mut EditSession,
    selected: &mut SelectedFeature,
) -> Result<CommandOutcome, EditError> {
    use CommandOutcome::*;

    let outcome = match command {
        EditCommand::StartDrawing(kind) => {
            session.start_drawing(kind)?;
            selected.id = None;
            Unchanged
        }
        EditCommand::FinishDrawing => {
            selected.id = Some(session.finish_drawing(store)?);
            Changed
        }
        EditCommand::CancelDrawing => {
            session.cancel_drawing()?;
            Unchanged
        }
        EditCommand::EnterEdit(id) => {
            session.enter_edit(store, id)?;
            selected.id = Some(id);
            Unchanged
        }
        EditCommand::EnterEditAtPoint { feature, index } => {
            session.enter_edit_at_point(store, feature, index)?;
            selected.id = Some(feature);
            Unchanged
        }
        EditCommand::ExitEdit => {
            session.exit_edit(store)?;
            Changed
        }
        EditCommand::CancelEdit => {
            session.cancel_edit(store)?;
            Changed
        }
        EditCommand::SelectPoint { index, mode } => {
            session.select_point(store, index, mode)?;
            Unchanged
        }
        EditCommand::DeleteSelectedPoints => {
            session.delete_selected_points(store)?;
            Changed
        }
        EditCommand::InsertPointAfter(index) => {
            session.insert_point_after(store, index)?;
            Changed
        }
        EditCommand::DuplicateSelection => {
            session.duplicate_selection(store)?;
            Changed
        }
        EditCommand::DeleteFeature(id) => {
            store.remove(id).ok_or(EditError::FeatureNotFound(id))?;
            if session.is_editing_feature(id) {
                session.reset();
                store.show_all();
            }
            if selected.id == Some(id) {
                selected.id = None;
            }
            info!("Deleted feature {}", id);
            Changed
        }
        EditCommand::DuplicateFeature(id) => {
            let copy = store.duplicate(id).ok_or(EditError::FeatureNotFound(id))?;
            if session.is_editing_feature(id) {
                session.enter_edit(store, copy)?;
            } else if session.editing_feature().is_some() {
                // Keep the edited feature isolated
                store.set_visible(copy, false);
            }
            selected.id = Some(copy);
            info!("Duplicated feature {} as {}", id, copy);
            Changed
        }
        EditCommand::ReorderFeature { from, to } => {
            if !store.reorder(from, to) {
                return Err(EditError::IndexOutOfRange {
                    index: from.max(to),
                    len: store.len(),
                });
            }
            Changed
        }
        EditCommand::Recenter { padding } => Recenter(RecenterRequest {
            padding,
            focus: None,
        }),
        EditCommand::FocusFeature(id) => {
            if !store.contains(id) {
                return Err(EditError::FeatureNotFound(id));
            }
            Recenter(RecenterRequest {
                padding: None,
                focus: Some(id),
            })
        }
    };
    Ok(outcome)
}

/// Applies queued edit commands. Refused commands leave state untouched and
/// are only logged.
pub fn apply_edit_commands(
    mut commands: MessageReader<EditCommand>,
    mut store: ResMut<FeatureStore>,
    mut session: ResMut<EditSession>,
    mut selected: ResMut<SelectedFeature>,
    mut changed: MessageWriter<FeaturesChanged>,
    mut recenter: MessageWriter<RecenterRequest>,
) {
    for command in commands.read() {
        match apply_command(*command, &mut store, &mut session, &mut selected) {
            Ok(CommandOutcome::Unchanged) => {}
            Ok(CommandOutcome::Changed) => {
                changed.write(FeaturesChanged);
            }
            Ok(CommandOutcome::Recenter(request)) => {
                recenter.write(request);
            }
            Err(e) => debug!("{:?} refused: {}", command, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;
    use crate::geometry::{GeometryValue, Position};

    fn line() -> Feature {
        Feature::new(GeometryValue::line_string(vec![
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(2.0, 0.0),
        ]))
        .with_name("Path")
    }

    struct Fixture {
        store: FeatureStore,
        session: EditSession,
        selected: SelectedFeature,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: FeatureStore::default(),
                session: EditSession::default(),
                selected: SelectedFeature::default(),
            }
        }

        fn run(&mut self, command: EditCommand) -> Result<CommandOutcome, EditError> {
            apply_command(command, &mut self.store, &mut self.session, &mut self.selected)
        }
    }

    #[test]
    fn test_refused_enter_edit_at_point_leaves_state() {
        let mut fx = Fixture::new();
        let id = fx.store.add(line());
        fx.store.add(line());

        let result = fx.run(EditCommand::EnterEditAtPoint {
            feature: id,
            index: 9,
        });
        assert_eq!(result, Err(EditError::IndexOutOfRange { index: 9, len: 3 }));
        assert!(fx.session.is_idle());
        assert!(fx.selected.id.is_none());
        assert_eq!(fx.store.visible().count(), 2);
    }

    #[test]
    fn test_delete_edited_feature_resets_session() {
        let mut fx = Fixture::new();
        let id = fx.store.add(line());
        fx.store.add(line());
        fx.run(EditCommand::EnterEdit(id)).unwrap();

        assert_eq!(fx.run(EditCommand::DeleteFeature(id)), Ok(CommandOutcome::Changed));
        assert!(fx.session.is_idle());
        assert!(fx.selected.id.is_none());
        assert_eq!(fx.store.visible().count(), 1);
    }

    #[test]
    fn test_duplicate_edited_feature_moves_edit_focus() {
        let mut fx = Fixture::new();
        let id = fx.store.add(line());
        fx.run(EditCommand::EnterEdit(id)).unwrap();

        fx.run(EditCommand::DuplicateFeature(id)).unwrap();
        let copy = fx.selected.id.unwrap();
        assert_ne!(copy, id);
        assert_eq!(fx.session.editing_feature(), Some(copy));
        assert_eq!(fx.store.feature(copy).unwrap().display_name(), "Path copy");
        let visible: Vec<_> = fx.store.visible().map(|layer| layer.id()).collect();
        assert_eq!(visible, vec![copy]);
    }

    #[test]
    fn test_duplicate_other_feature_while_editing_stays_hidden() {
        let mut fx = Fixture::new();
        let edited = fx.store.add(line());
        let other = fx.store.add(line());
        fx.run(EditCommand::EnterEdit(edited)).unwrap();

        fx.run(EditCommand::DuplicateFeature(other)).unwrap();
        let copy = fx.selected.id.unwrap();
        assert!(!fx.store.layer(copy).unwrap().is_visible);
        assert_eq!(fx.session.editing_feature(), Some(edited));
    }

    #[test]
    fn test_reorder_out_of_range() {
        let mut fx = Fixture::new();
        fx.store.add(line());
        assert_eq!(
            fx.run(EditCommand::ReorderFeature { from: 0, to: 3 }),
            Err(EditError::IndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_recenter_passes_padding() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.run(EditCommand::Recenter { padding: Some(0.25) }),
            Ok(CommandOutcome::Recenter(RecenterRequest {
                padding: Some(0.25),
                focus: None,
            }))
        );
    }

    #[test]
    fn test_focus_unknown_feature() {
        let mut fx = Fixture::new();
        let id = FeatureId::new();
        assert_eq!(
            fx.run(EditCommand::FocusFeature(id)),
            Err(EditError::FeatureNotFound(id))
        );
    }

    #[test]
    fn test_finish_drawing_selects_new_feature() {
        let mut fx = Fixture::new();
        fx.run(EditCommand::StartDrawing(DrawKind::Point)).unwrap();
        fx.session.add_draw_point(Position::new(1.0, 1.0)).unwrap();
        assert_eq!(fx.run(EditCommand::FinishDrawing), Ok(CommandOutcome::Changed));
        assert!(fx.selected.id.is_some_and(|id| fx.store.contains(id)));
    }

    #[test]
    fn test_refused_command_is_unchanged_state() {
        let mut fx = Fixture::new();
        fx.run(EditCommand::StartDrawing(DrawKind::Polygon)).unwrap();
        assert!(fx.run(EditCommand::FinishDrawing).is_err());
        assert!(fx.session.is_drawing());
        assert!(fx.store.is_empty());
    }
}
