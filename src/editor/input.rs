//! Pointer gestures on the canvas: press, move and release become clicks,
//! double-clicks and vertex drags for the edit session.

use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants::{DOUBLE_CLICK_SECS, DRAG_SLOP_PX};
use crate::features::{FeatureId, FeatureStore, FeaturesChanged, SelectedFeature};
use crate::geometry::{GeometryValue, Position};

use super::hit_test::{find_closest, PointHit};
use super::params::{is_cursor_over_ui, CameraParams, ScreenProjector};
use super::point_editor::editable_points;
use super::projection::MapProjection;
use super::session::{EditSession, SelectionMode};

/// A left-button press on the canvas that has not been released yet
#[derive(Debug, Clone, Copy)]
struct PointerPress {
    start: Vec2,
    /// Travelled beyond the slop, so releasing is not a click
    moved: bool,
    /// A vertex drag started from this press
    dragging: bool,
}

#[derive(Resource, Default)]
pub struct GestureState {
    press: Option<PointerPress>,
    last_click: Option<(Duration, Vec2)>,
}

impl GestureState {
    /// Record a click and report whether it completes a double-click
    fn register_click(&mut self, now: Duration, at: Vec2) -> bool {
        let double = self.last_click.is_some_and(|(time, pos)| {
            now.saturating_sub(time).as_secs_f64() <= DOUBLE_CLICK_SECS
                && pos.distance(at) <= DRAG_SLOP_PX
        });
        // A double-click does not start the next one
        self.last_click = if double { None } else { Some((now, at)) };
        double
    }
}

/// Modifier keys to selection mode: Shift extends a range, Ctrl/Cmd toggles
pub fn selection_mode(keyboard: &ButtonInput<KeyCode>) -> SelectionMode {
    if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
        SelectionMode::Range
    } else if keyboard.any_pressed([
        KeyCode::ControlLeft,
        KeyCode::ControlRight,
        KeyCode::SuperLeft,
        KeyCode::SuperRight,
    ]) {
        SelectionMode::Additive
    } else {
        SelectionMode::Single
    }
}

/// Points a feature offers for picking: its editable vertices, or every
/// position for kinds that cannot be point-edited
fn pick_points(geometry: &GeometryValue) -> Vec<Position> {
    editable_points(geometry).unwrap_or_else(|_| {
        let mut points = Vec::with_capacity(geometry.position_count());
        geometry.for_each_position(&mut |p| points.push(p));
        points
    })
}

/// Nearest point of any visible feature. Later features are drawn on top and
/// win ties.
pub fn pick_feature(
    store: &FeatureStore,
    screen: Vec2,
    project: impl Fn(Position) -> Option<Vec2>,
    threshold_px: f32,
) -> Option<(FeatureId, PointHit)> {
    let mut best: Option<(FeatureId, PointHit)> = None;
    for layer in store.visible().collect::<Vec<_>>().into_iter().rev() {
        let points = pick_points(&layer.feature.geometry);
        let Some(hit) = find_closest(screen, &points, &project, threshold_px) else {
            continue;
        };
        if best.is_none_or(|(_, b)| hit.distance < b.distance) {
            best = Some((layer.id(), hit));
        }
    }
    best
}

/// Translates left-button gestures into session calls
#[allow(clippy::too_many_arguments)]
pub fn handle_canvas_pointer(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time<Real>>,
    camera: CameraParams,
    projection: Res<MapProjection>,
    mut contexts: EguiContexts,
    mut gesture: ResMut<GestureState>,
    mut store: ResMut<FeatureStore>,
    mut session: ResMut<EditSession>,
    mut selected: ResMut<SelectedFeature>,
) {
    let now = time.elapsed();
    let Some(projector) = camera.projector(&projection) else {
        return;
    };
    let project = |p: Position| projector.project(p);

    // Released outside the window or focus lost mid-drag
    if let Some(press) = gesture.press
        && !mouse.pressed(MouseButton::Left)
        && !mouse.just_released(MouseButton::Left)
    {
        if press.dragging
            && let Err(e) = session.drag_cancel(&mut store, now)
        {
            debug!("Drag cancel refused: {}", e);
        }
        gesture.press = None;
        return;
    }

    let Some(cursor) = camera.cursor_screen_pos() else {
        return;
    };

    if mouse.just_pressed(MouseButton::Left) {
        gesture.press = if is_cursor_over_ui(&mut contexts) {
            None
        } else {
            Some(PointerPress {
                start: cursor,
                moved: false,
                dragging: false,
            })
        };
        return;
    }

    let Some(mut press) = gesture.press else {
        return;
    };

    if mouse.just_released(MouseButton::Left) {
        gesture.press = None;
        if press.dragging {
            if let Err(e) = session.drag_end(&mut store, now) {
                debug!("Drag end refused: {}", e);
            }
        } else if !press.moved {
            handle_click(
                press.start,
                now,
                selection_mode(&keyboard),
                &projector,
                &mut gesture,
                &mut store,
                &mut session,
                &mut selected,
            );
        }
        return;
    }

    if !press.moved && cursor.distance(press.start) > DRAG_SLOP_PX {
        press.moved = true;
        if session.editing_feature().is_some() {
            match session.drag_begin(&store, press.start, project) {
                Ok(hit) => press.dragging = hit.is_some(),
                Err(e) => debug!("Drag refused: {}", e),
            }
        }
    }

    if press.dragging
        && let Some(position) = projector.unproject(cursor)
        && let Err(e) = session.drag_move(&mut store, position, now)
    {
        debug!("Drag move refused: {}", e);
    }

    gesture.press = Some(press);
}

#[allow(clippy::too_many_arguments)]
fn handle_click(
    at: Vec2,
    now: Duration,
    mode: SelectionMode,
    projector: &ScreenProjector,
    gesture: &mut GestureState,
    store: &mut FeatureStore,
    session: &mut EditSession,
    selected: &mut SelectedFeature,
) {
    let project = |p: Position| projector.project(p);
    let double = gesture.register_click(now, at);

    if session.is_drawing() {
        if let Some(position) = projector.unproject(at)
            && let Err(e) = session.add_draw_point(position)
        {
            debug!("Draw point refused: {}", e);
        }
        return;
    }

    if session.editing_feature().is_some() {
        if let Err(e) = session.click(store, at, mode, project) {
            debug!("Click refused: {}", e);
        }
        return;
    }

    let picked = pick_feature(store, at, project, session.hit_threshold_px());
    selected.id = picked.map(|(id, _)| id);

    if double
        && let Some((id, hit)) = picked
        && let Err(e) = session.enter_edit_at_point(store, id, hit.index)
    {
        debug!("Edit refused: {}", e);
    }
}

/// Sends the trailing change notification once a drag has settled
pub fn notify_after_drag(
    time: Res<Time<Real>>,
    mut session: ResMut<EditSession>,
    mut changed: MessageWriter<FeaturesChanged>,
) {
    if session.poll_notification(time.elapsed()) {
        changed.write(FeaturesChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;

    fn project(pos: Position) -> Option<Vec2> {
        Some(Vec2::new(pos.lon as f32 * 100.0, pos.lat as f32 * 100.0))
    }

    fn p(lon: f64, lat: f64) -> Position {
        Position::new(lon, lat)
    }

    #[test]
    fn test_pick_feature_nearest_point() {
        let mut store = FeatureStore::default();
        let a = store.add(Feature::new(GeometryValue::line_string(vec![
            p(0.0, 0.0),
            p(1.0, 0.0),
        ])));
        let b = store.add(Feature::new(GeometryValue::point(p(2.0, 0.0))));

        let (id, hit) = pick_feature(&store, Vec2::new(105.0, 0.0), project, 20.0).unwrap();
        assert_eq!((id, hit.index), (a, 1));

        let (id, _) = pick_feature(&store, Vec2::new(195.0, 0.0), project, 20.0).unwrap();
        assert_eq!(id, b);

        assert!(pick_feature(&store, Vec2::new(150.0, 0.0), project, 20.0).is_none());
    }

    #[test]
    fn test_pick_feature_topmost_wins_ties() {
        let mut store = FeatureStore::default();
        store.add(Feature::new(GeometryValue::point(p(1.0, 1.0))));
        let top = store.add(Feature::new(GeometryValue::point(p(1.0, 1.0))));
        let (id, _) = pick_feature(&store, Vec2::new(100.0, 100.0), project, 20.0).unwrap();
        assert_eq!(id, top);
    }

    #[test]
    fn test_pick_feature_skips_hidden() {
        let mut store = FeatureStore::default();
        let hidden = store.add(Feature::new(GeometryValue::point(p(1.0, 1.0))));
        store.set_visible(hidden, false);
        assert!(pick_feature(&store, Vec2::new(100.0, 100.0), project, 20.0).is_none());
    }

    #[test]
    fn test_pick_feature_multi_geometry() {
        let mut store = FeatureStore::default();
        let id = store.add(Feature::new(GeometryValue::multi_point(vec![
            p(0.0, 0.0),
            p(3.0, 3.0),
        ])));
        let (picked, hit) = pick_feature(&store, Vec2::new(300.0, 300.0), project, 20.0).unwrap();
        assert_eq!((picked, hit.index), (id, 1));
    }

    #[test]
    fn test_double_click_detection() {
        let mut gesture = GestureState::default();
        let at = Vec2::new(10.0, 10.0);
        assert!(!gesture.register_click(Duration::from_millis(0), at));
        assert!(gesture.register_click(Duration::from_millis(200), at + Vec2::ONE));
        // A third click starts over
        assert!(!gesture.register_click(Duration::from_millis(300), at));
    }

    #[test]
    fn test_slow_or_distant_clicks_are_single() {
        let mut gesture = GestureState::default();
        let at = Vec2::new(10.0, 10.0);
        gesture.register_click(Duration::from_millis(0), at);
        assert!(!gesture.register_click(Duration::from_millis(1000), at));
        assert!(!gesture.register_click(Duration::from_millis(1100), at + Vec2::new(50.0, 0.0)));
    }

    #[test]
    fn test_selection_mode_from_modifiers() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        assert_eq!(selection_mode(&keyboard), SelectionMode::Single);
        keyboard.press(KeyCode::ControlLeft);
        assert_eq!(selection_mode(&keyboard), SelectionMode::Additive);
        keyboard.press(KeyCode::ShiftRight);
        assert_eq!(selection_mode(&keyboard), SelectionMode::Range);
    }
}
