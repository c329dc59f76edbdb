use std::time::Duration;

use bevy::prelude::*;

use crate::editor::error::EditError;
use crate::editor::hit_test::{find_closest, PointHit};
use crate::editor::point_editor::{self, editable_points, is_closed_ring};
use crate::features::{FeatureId, FeatureStore};
use crate::geometry::{GeometryValue, Position};

use super::{EditMode, EditSession, PointDrag, PointSelection, SelectionMode};

impl EditSession {
    /// Start point-editing `id`: isolate it and snapshot its geometry.
    ///
    /// Editing another feature is committed and left first.
    pub fn enter_edit(&mut self, store: &mut FeatureStore, id: FeatureId) -> Result<(), EditError> {
        if self.is_drawing() {
            return Err(EditError::Busy);
        }
        if self.is_editing_feature(id) {
            return Ok(());
        }

        let feature = store.feature(id).ok_or(EditError::FeatureNotFound(id))?;
        editable_points(&feature.geometry)?;
        let snapshot = feature.geometry.clone();

        if self.editing_feature().is_some() {
            self.exit_edit(store)?;
        }

        store.isolate(id);
        self.snapshot = Some(snapshot);
        self.mode = EditMode::Editing {
            feature: id,
            selection: PointSelection::default(),
            drag: None,
        };
        info!("Editing feature {}", id);
        Ok(())
    }

    /// Enter edit mode with `index` already selected, as on a double-click
    pub fn enter_edit_at_point(
        &mut self,
        store: &mut FeatureStore,
        id: FeatureId,
        index: usize,
    ) -> Result<(), EditError> {
        // Refuse before isolating so a bad index leaves everything as it was
        let feature = store.feature(id).ok_or(EditError::FeatureNotFound(id))?;
        let len = editable_points(&feature.geometry)?.len();
        if index >= len {
            return Err(EditError::IndexOutOfRange { index, len });
        }

        self.enter_edit(store, id)?;
        self.select_point(store, index, SelectionMode::Single)
    }

    /// Leave edit mode keeping the edits. All features become visible again.
    pub fn exit_edit(&mut self, store: &mut FeatureStore) -> Result<FeatureId, EditError> {
        let id = self.editing_feature().ok_or(EditError::NotEditing)?;

        if let Some(drag) = self.take_drag() {
            // Ignore a vanished feature; leaving must always succeed
            let _ = self.commit_drag(store, id, drag);
        }

        store.show_all();
        self.reset();
        info!("Finished editing feature {}", id);
        Ok(id)
    }

    /// Leave edit mode restoring the geometry captured on entry
    pub fn cancel_edit(&mut self, store: &mut FeatureStore) -> Result<FeatureId, EditError> {
        let id = self.editing_feature().ok_or(EditError::NotEditing)?;

        if let Some(snapshot) = self.snapshot.take() {
            store.set_geometry(id, snapshot);
        }

        store.show_all();
        self.reset();
        info!("Cancelled editing feature {}", id);
        Ok(id)
    }

    /// Select a vertex of the edited feature by index
    pub fn select_point(
        &mut self,
        store: &FeatureStore,
        index: usize,
        mode: SelectionMode,
    ) -> Result<(), EditError> {
        let points = self.edited_points(store)?;
        if index >= points.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: points.len(),
            });
        }
        self.selection_mut()?.apply(index, mode);
        Ok(())
    }

    /// Resolve a click on the canvas. A hit updates the selection per `mode`
    /// and returns the vertex; a miss clears the selection but stays in edit.
    pub fn click(
        &mut self,
        store: &FeatureStore,
        screen: Vec2,
        mode: SelectionMode,
        project: impl Fn(Position) -> Option<Vec2>,
    ) -> Result<Option<usize>, EditError> {
        let hit = self.hit(store, screen, project)?;
        let selection = self.selection_mut()?;
        match hit {
            Some(hit) => {
                selection.apply(hit.index, mode);
                Ok(Some(hit.index))
            }
            None => {
                selection.clear();
                Ok(None)
            }
        }
    }

    /// Start dragging the vertex under the pointer. Without a hit nothing
    /// starts and `None` is returned.
    pub fn drag_begin(
        &mut self,
        store: &FeatureStore,
        screen: Vec2,
        project: impl Fn(Position) -> Option<Vec2>,
    ) -> Result<Option<usize>, EditError> {
        let Some(hit) = self.hit(store, screen, project)? else {
            return Ok(None);
        };

        if let EditMode::Editing {
            selection, drag, ..
        } = &mut self.mode
        {
            if !selection.contains(hit.index) {
                selection.apply(hit.index, SelectionMode::Single);
            }
            *drag = Some(PointDrag {
                index: hit.index,
                last_position: hit.position,
            });
        }
        self.throttle.begin();
        debug!("Dragging point {}", hit.index);
        Ok(Some(hit.index))
    }

    /// Move the dragged vertex. Returns whether the sample was applied; samples
    /// inside the throttle interval are only remembered for the final commit.
    pub fn drag_move(
        &mut self,
        store: &mut FeatureStore,
        position: Position,
        now: Duration,
    ) -> Result<bool, EditError> {
        let id = self.editing_feature().ok_or(EditError::NotEditing)?;
        let drag = match &mut self.mode {
            EditMode::Editing {
                drag: Some(drag), ..
            } => {
                drag.last_position = position;
                *drag
            }
            _ => return Ok(false),
        };

        if !self.throttle.accept(now) {
            return Ok(false);
        }
        self.commit_drag(store, id, drag)?;
        Ok(true)
    }

    /// Finish the drag with one authoritative commit of the last position and
    /// schedule the trailing change notification.
    pub fn drag_end(&mut self, store: &mut FeatureStore, now: Duration) -> Result<bool, EditError> {
        let id = self.editing_feature().ok_or(EditError::NotEditing)?;
        let Some(drag) = self.take_drag() else {
            return Ok(false);
        };

        self.throttle.finish(now);
        self.commit_drag(store, id, drag)?;
        debug!("Dropped point {}", drag.index);
        Ok(true)
    }

    /// An externally cancelled gesture ends like a normal drag
    pub fn drag_cancel(&mut self, store: &mut FeatureStore, now: Duration) -> Result<bool, EditError> {
        self.drag_end(store, now)
    }

    /// Delete every selected vertex, all or nothing. Returns how many went.
    pub fn delete_selected_points(&mut self, store: &mut FeatureStore) -> Result<usize, EditError> {
        let id = self.editing_feature().ok_or(EditError::NotEditing)?;
        let geometry = self.edited_geometry(store, id)?;
        let selection = self.selection().ok_or(EditError::NotEditing)?;
        if selection.is_empty() {
            return Err(EditError::EmptySelection);
        }

        // The closing position of a ring is vertex 0 under another index
        let closing = match geometry {
            GeometryValue::Polygon(rings) => rings
                .first()
                .filter(|ring| is_closed_ring(ring))
                .map(|ring| ring.len() - 1),
            _ => None,
        };
        let mut indices: Vec<usize> = selection
            .indices()
            .iter()
            .map(|&i| if Some(i) == closing { 0 } else { i })
            .collect();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();

        let mut result = geometry.clone();
        for &index in &indices {
            result = point_editor::delete_point(&result, index)?;
        }

        store.set_geometry(id, result);
        self.selection_mut()?.clear();
        Ok(indices.len())
    }

    /// Insert a midpoint after `index` and select it. Returns its index.
    pub fn insert_point_after(
        &mut self,
        store: &mut FeatureStore,
        index: usize,
    ) -> Result<usize, EditError> {
        let id = self.editing_feature().ok_or(EditError::NotEditing)?;
        let (geometry, inserted) = point_editor::insert_point(self.edited_geometry(store, id)?, index)?;

        store.set_geometry(id, geometry);
        *self.selection_mut()? = PointSelection::single(inserted);
        Ok(inserted)
    }

    /// Split the selected vertices off into a new LineString feature.
    ///
    /// The new feature stays hidden until edit mode is left, like every other
    /// feature while one is isolated.
    pub fn duplicate_selection(&mut self, store: &mut FeatureStore) -> Result<FeatureId, EditError> {
        let id = self.editing_feature().ok_or(EditError::NotEditing)?;
        let source = store.feature(id).ok_or(EditError::FeatureNotFound(id))?;
        let selection = self.selection().ok_or(EditError::NotEditing)?;

        let segment = point_editor::duplicate_selection(source, selection.indices())?;
        let new_id = store.add(segment);
        store.set_visible(new_id, false);
        info!("Copied {} points into feature {}", selection.indices().len(), new_id);
        Ok(new_id)
    }

    fn edited_geometry<'a>(
        &self,
        store: &'a FeatureStore,
        id: FeatureId,
    ) -> Result<&'a GeometryValue, EditError> {
        store
            .feature(id)
            .map(|feature| &feature.geometry)
            .ok_or(EditError::FeatureNotFound(id))
    }

    fn edited_points(&self, store: &FeatureStore) -> Result<Vec<Position>, EditError> {
        let id = self.editing_feature().ok_or(EditError::NotEditing)?;
        editable_points(self.edited_geometry(store, id)?)
    }

    fn hit(
        &self,
        store: &FeatureStore,
        screen: Vec2,
        project: impl Fn(Position) -> Option<Vec2>,
    ) -> Result<Option<PointHit>, EditError> {
        let points = self.edited_points(store)?;
        Ok(find_closest(screen, &points, project, self.hit_threshold_px))
    }

    fn selection_mut(&mut self) -> Result<&mut PointSelection, EditError> {
        match &mut self.mode {
            EditMode::Editing { selection, .. } => Ok(selection),
            _ => Err(EditError::NotEditing),
        }
    }

    fn take_drag(&mut self) -> Option<PointDrag> {
        match &mut self.mode {
            EditMode::Editing { drag, .. } => drag.take(),
            _ => None,
        }
    }

    fn commit_drag(
        &self,
        store: &mut FeatureStore,
        id: FeatureId,
        drag: PointDrag,
    ) -> Result<(), EditError> {
        let geometry = point_editor::update_drag(
            self.edited_geometry(store, id)?,
            drag.index,
            drag.last_position,
        )?;
        store.set_geometry(id, geometry);
        Ok(())
    }
}
