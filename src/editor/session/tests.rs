//! Unit tests for the edit session state machine.

use std::time::Duration;

use bevy::prelude::*;

use crate::editor::error::EditError;
use crate::features::persistence::{decode_feature_collection, encode_feature_collection};
use crate::features::{Feature, FeatureId, FeatureStore};
use crate::geometry::{GeometryKind, GeometryValue, Position};

use super::{DrawKind, EditMode, EditSession, SelectionMode};

/// One degree maps to 100 pixels
fn project(pos: Position) -> Option<Vec2> {
    Some(Vec2::new(pos.lon as f32 * 100.0, pos.lat as f32 * 100.0))
}

fn screen(lon: f64, lat: f64) -> Vec2 {
    Vec2::new(lon as f32 * 100.0, lat as f32 * 100.0)
}

fn p(lon: f64, lat: f64) -> Position {
    Position::new(lon, lat)
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn line_feature() -> Feature {
    Feature::new(GeometryValue::line_string(vec![
        p(0.0, 0.0),
        p(1.0, 0.0),
        p(2.0, 0.0),
        p(3.0, 0.0),
        p(4.0, 0.0),
        p(5.0, 0.0),
    ]))
    .with_name("Trail")
}

fn square_feature() -> Feature {
    Feature::new(GeometryValue::polygon(vec![vec![
        p(0.0, 0.0),
        p(4.0, 0.0),
        p(4.0, 4.0),
        p(0.0, 4.0),
        p(0.0, 0.0),
    ]]))
}

fn editing(feature: Feature) -> (FeatureStore, EditSession, FeatureId) {
    let mut store = FeatureStore::default();
    let id = store.add(feature);
    store.add(Feature::new(GeometryValue::point(p(9.0, 9.0))));
    let mut session = EditSession::default();
    session.enter_edit(&mut store, id).unwrap();
    (store, session, id)
}

fn ring(store: &FeatureStore, id: FeatureId) -> Vec<Position> {
    store.feature(id).unwrap().geometry.as_polygon().unwrap()[0].clone()
}

#[test]
fn test_import_drag_exit_export() {
    let json = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "id": "coast-path",
            "properties": {"name": "Coast path", "surface": "sand", "length_km": 3.5},
            "geometry": {
                "type": "LineString",
                "coordinates": [[1.0, 1.0], [2.0, 1.5], [3.0, 1.0], [4.0, 2.0]]
            }
        }]
    }"#;
    let imported = decode_feature_collection(json).unwrap();
    let original = imported[0].clone();

    let mut store = FeatureStore::default();
    store.replace_all(imported);
    let mut session = EditSession::default();
    session.enter_edit(&mut store, original.id).unwrap();

    let hit = session
        .drag_begin(&store, screen(1.0, 1.05), project)
        .unwrap();
    assert_eq!(hit, Some(0));
    assert!(session.is_dragging());

    session.drag_move(&mut store, p(0.5, 0.8), ms(0)).unwrap();
    session.drag_move(&mut store, p(0.25, 0.6), ms(1)).unwrap();
    assert!(session.drag_end(&mut store, ms(2)).unwrap());
    assert!(!session.is_dragging());
    session.exit_edit(&mut store).unwrap();

    let exported = encode_feature_collection(&store.features()).unwrap();
    let reloaded = decode_feature_collection(&exported).unwrap();
    assert_eq!(reloaded.len(), 1);

    let feature = &reloaded[0];
    assert_eq!(feature.id, original.id);
    assert_eq!(feature.properties, original.properties);
    let coords = feature.geometry.as_line_string().unwrap();
    let before = original.geometry.as_line_string().unwrap();
    assert_eq!(coords[0], p(0.25, 0.6));
    assert_eq!(&coords[1..], &before[1..]);
}

#[test]
fn test_draw_polygon_closes_ring() {
    let mut store = FeatureStore::default();
    let mut session = EditSession::default();

    session.start_drawing(DrawKind::Polygon).unwrap();
    session.add_draw_point(p(0.0, 0.0)).unwrap();
    session.add_draw_point(p(1.0, 0.0)).unwrap();
    session.add_draw_point(p(1.0, 1.0)).unwrap();
    let id = session.finish_drawing(&mut store).unwrap();

    assert!(session.is_idle());
    let ring = ring(&store, id);
    assert_eq!(ring.len(), 4);
    assert_eq!(ring.first(), ring.last());
}

#[test]
fn test_finish_below_minimum_keeps_drawing() {
    let mut store = FeatureStore::default();
    let mut session = EditSession::default();

    session.start_drawing(DrawKind::LineString).unwrap();
    session.add_draw_point(p(0.0, 0.0)).unwrap();
    assert!(!session.can_finish());
    assert_eq!(
        session.finish_drawing(&mut store),
        Err(EditError::TooFewPoints {
            kind: GeometryKind::LineString,
            min: 2
        })
    );
    assert!(store.is_empty());
    assert_eq!(session.draft().map(|(_, points)| points.len()), Some(1));

    session.add_draw_point(p(1.0, 1.0)).unwrap();
    assert!(session.can_finish());
    assert!(session.finish_drawing(&mut store).is_ok());
}

#[test]
fn test_polygon_click_on_first_point_does_not_count() {
    let mut session = EditSession::default();
    session.start_drawing(DrawKind::Polygon).unwrap();
    session.add_draw_point(p(0.0, 0.0)).unwrap();
    session.add_draw_point(p(1.0, 0.0)).unwrap();
    session.add_draw_point(p(0.0, 0.0)).unwrap();
    assert!(!session.can_finish());
}

#[test]
fn test_draw_point() {
    let mut store = FeatureStore::default();
    let mut session = EditSession::default();
    session.start_drawing(DrawKind::Point).unwrap();
    session.add_draw_point(p(3.0, 4.0)).unwrap();
    let id = session.finish_drawing(&mut store).unwrap();
    assert_eq!(
        store.feature(id).unwrap().geometry,
        GeometryValue::point(p(3.0, 4.0))
    );
}

#[test]
fn test_cancel_drawing_adds_nothing() {
    let mut session = EditSession::default();
    session.start_drawing(DrawKind::LineString).unwrap();
    session.add_draw_point(p(0.0, 0.0)).unwrap();
    session.cancel_drawing().unwrap();
    assert!(session.is_idle());
    assert_eq!(session.add_draw_point(p(1.0, 1.0)), Err(EditError::NotDrawing));
}

#[test]
fn test_drawing_and_editing_are_exclusive() {
    let (mut store, mut session, id) = editing(line_feature());
    assert_eq!(session.start_drawing(DrawKind::Point), Err(EditError::Busy));

    session.exit_edit(&mut store).unwrap();
    session.start_drawing(DrawKind::Point).unwrap();
    assert_eq!(session.enter_edit(&mut store, id), Err(EditError::Busy));
}

#[test]
fn test_enter_edit_isolates_and_exit_restores() {
    let (mut store, mut session, id) = editing(line_feature());
    let visible: Vec<_> = store.visible().map(|layer| layer.id()).collect();
    assert_eq!(visible, vec![id]);
    assert!(session.has_snapshot());

    session.exit_edit(&mut store).unwrap();
    assert_eq!(store.visible().count(), 2);
    assert!(!session.has_snapshot());
    assert!(session.is_idle());
}

#[test]
fn test_enter_edit_on_another_feature_commits_first() {
    let (mut store, mut session, first) = editing(line_feature());
    let second = store.add(square_feature());

    session.drag_begin(&store, screen(1.0, 0.0), project).unwrap();
    session.drag_move(&mut store, p(1.0, 2.0), ms(0)).unwrap();
    session.enter_edit(&mut store, second).unwrap();

    assert_eq!(session.editing_feature(), Some(second));
    assert_eq!(
        store.feature(first).unwrap().geometry.as_line_string().unwrap()[1],
        p(1.0, 2.0)
    );
    let visible: Vec<_> = store.visible().map(|layer| layer.id()).collect();
    assert_eq!(visible, vec![second]);
}

#[test]
fn test_enter_edit_refuses_unsupported_geometry() {
    let mut store = FeatureStore::default();
    let id = store.add(Feature::new(GeometryValue::multi_point(vec![p(0.0, 0.0)])));
    let mut session = EditSession::default();
    assert_eq!(
        session.enter_edit(&mut store, id),
        Err(EditError::Unsupported(GeometryKind::MultiPoint))
    );
    assert!(session.is_idle());
    assert_eq!(store.visible().count(), 1);
}

#[test]
fn test_enter_edit_missing_feature() {
    let mut store = FeatureStore::default();
    let mut session = EditSession::default();
    let id = FeatureId::new();
    assert_eq!(
        session.enter_edit(&mut store, id),
        Err(EditError::FeatureNotFound(id))
    );
}

#[test]
fn test_cancel_edit_restores_snapshot() {
    let (mut store, mut session, id) = editing(square_feature());
    let before = store.feature(id).unwrap().geometry.clone();

    session.drag_begin(&store, screen(4.0, 4.0), project).unwrap();
    session.drag_move(&mut store, p(6.0, 6.0), ms(0)).unwrap();
    session.drag_end(&mut store, ms(1)).unwrap();
    assert_ne!(store.feature(id).unwrap().geometry, before);

    session.cancel_edit(&mut store).unwrap();
    assert_eq!(store.feature(id).unwrap().geometry, before);
    assert_eq!(store.visible().count(), 2);
}

#[test]
fn test_click_selects_and_miss_clears() {
    let (store, mut session, _) = editing(line_feature());

    let hit = session
        .click(&store, screen(2.0, 0.1), SelectionMode::Single, project)
        .unwrap();
    assert_eq!(hit, Some(2));
    assert_eq!(session.selection().unwrap().indices(), &[2]);

    let miss = session
        .click(&store, screen(2.0, 3.0), SelectionMode::Single, project)
        .unwrap();
    assert_eq!(miss, None);
    assert!(session.selection().unwrap().is_empty());
    assert!(session.editing_feature().is_some());
}

#[test]
fn test_range_selection_fills_span_in_click_order() {
    let (store, mut session, _) = editing(line_feature());

    session
        .click(&store, screen(2.0, 0.0), SelectionMode::Single, project)
        .unwrap();
    session
        .click(&store, screen(5.0, 0.0), SelectionMode::Range, project)
        .unwrap();
    assert_eq!(session.selection().unwrap().indices(), &[2, 3, 4, 5]);

    session
        .click(&store, screen(5.0, 0.0), SelectionMode::Single, project)
        .unwrap();
    session
        .click(&store, screen(2.0, 0.0), SelectionMode::Range, project)
        .unwrap();
    assert_eq!(session.selection().unwrap().indices(), &[5, 4, 3, 2]);
}

#[test]
fn test_select_point_out_of_range() {
    let (store, mut session, _) = editing(line_feature());
    assert_eq!(
        session.select_point(&store, 6, SelectionMode::Single),
        Err(EditError::IndexOutOfRange { index: 6, len: 6 })
    );
}

#[test]
fn test_drag_begin_needs_a_hit() {
    let (store, mut session, _) = editing(line_feature());
    assert_eq!(
        session.drag_begin(&store, screen(2.5, 2.0), project),
        Ok(None)
    );
    assert!(!session.is_dragging());
}

#[test]
fn test_drag_moves_are_throttled_but_end_commits_last_position() {
    let (mut store, mut session, id) = editing(line_feature());
    let coords = |store: &FeatureStore| store.feature(id).unwrap().geometry.clone();

    session.drag_begin(&store, screen(3.0, 0.0), project).unwrap();
    assert!(session.drag_move(&mut store, p(3.0, 1.0), ms(100)).unwrap());
    assert!(!session.drag_move(&mut store, p(3.0, 2.0), ms(101)).unwrap());
    assert_eq!(coords(&store).as_line_string().unwrap()[3], p(3.0, 1.0));

    session.drag_end(&mut store, ms(102)).unwrap();
    assert_eq!(coords(&store).as_line_string().unwrap()[3], p(3.0, 2.0));
}

#[test]
fn test_drag_polygon_endpoint_keeps_ring_closed() {
    let (mut store, mut session, id) = editing(square_feature());

    assert_eq!(
        session.drag_begin(&store, screen(0.0, 0.0), project),
        Ok(Some(0))
    );
    session.drag_move(&mut store, p(-1.0, -1.0), ms(0)).unwrap();
    session.drag_end(&mut store, ms(1)).unwrap();

    let ring = ring(&store, id);
    assert_eq!(ring[0], p(-1.0, -1.0));
    assert_eq!(ring[4], p(-1.0, -1.0));
}

#[test]
fn test_drag_notifies_once_after_quiet_period() {
    let (mut store, mut session, _) = editing(line_feature());

    session.drag_begin(&store, screen(1.0, 0.0), project).unwrap();
    session.drag_move(&mut store, p(1.0, 1.0), ms(0)).unwrap();
    assert!(!session.poll_notification(ms(500)));

    session.drag_end(&mut store, ms(1000)).unwrap();
    assert!(!session.poll_notification(ms(1050)));
    assert!(session.poll_notification(ms(1100)));
    assert!(!session.poll_notification(ms(1200)));
}

#[test]
fn test_drag_cancel_commits_last_position() {
    let (mut store, mut session, id) = editing(line_feature());
    session.drag_begin(&store, screen(0.0, 0.0), project).unwrap();
    session.drag_move(&mut store, p(0.0, 1.0), ms(0)).unwrap();
    session.drag_move(&mut store, p(0.0, 2.0), ms(1)).unwrap();
    assert!(session.drag_cancel(&mut store, ms(2)).unwrap());
    assert_eq!(
        store.feature(id).unwrap().geometry.as_line_string().unwrap()[0],
        p(0.0, 2.0)
    );
}

#[test]
fn test_delete_selected_points() {
    let (mut store, mut session, id) = editing(line_feature());
    session.select_point(&store, 1, SelectionMode::Single).unwrap();
    session.select_point(&store, 4, SelectionMode::Additive).unwrap();

    assert_eq!(session.delete_selected_points(&mut store), Ok(2));
    assert_eq!(
        store.feature(id).unwrap().geometry.as_line_string().unwrap(),
        &[p(0.0, 0.0), p(2.0, 0.0), p(3.0, 0.0), p(5.0, 0.0)]
    );
    assert!(session.selection().unwrap().is_empty());
}

#[test]
fn test_delete_selected_points_is_all_or_nothing() {
    let (mut store, mut session, id) = editing(square_feature());
    let before = store.feature(id).unwrap().geometry.clone();
    session.select_point(&store, 1, SelectionMode::Single).unwrap();
    session.select_point(&store, 2, SelectionMode::Additive).unwrap();

    assert!(matches!(
        session.delete_selected_points(&mut store),
        Err(EditError::TooFewPoints { .. })
    ));
    assert_eq!(store.feature(id).unwrap().geometry, before);
    assert_eq!(session.selection().unwrap().indices(), &[1, 2]);
}

#[test]
fn test_delete_both_ends_of_ring_removes_one_vertex() {
    let mut store = FeatureStore::default();
    let id = store.add(Feature::new(GeometryValue::polygon(vec![vec![
        p(0.0, 0.0),
        p(4.0, 0.0),
        p(4.0, 4.0),
        p(2.0, 6.0),
        p(0.0, 4.0),
        p(0.0, 0.0),
    ]])));
    let mut session = EditSession::default();
    session.enter_edit(&mut store, id).unwrap();
    session.select_point(&store, 0, SelectionMode::Single).unwrap();
    session.select_point(&store, 5, SelectionMode::Additive).unwrap();

    assert_eq!(session.delete_selected_points(&mut store), Ok(1));
    let ring = ring(&store, id);
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], p(4.0, 0.0));
    assert_eq!(ring.first(), ring.last());
}

#[test]
fn test_delete_with_empty_selection() {
    let (mut store, mut session, _) = editing(line_feature());
    assert_eq!(
        session.delete_selected_points(&mut store),
        Err(EditError::EmptySelection)
    );
}

#[test]
fn test_insert_point_after_selects_new_point() {
    let (mut store, mut session, id) = editing(line_feature());
    assert_eq!(session.insert_point_after(&mut store, 2), Ok(3));
    let coords = store.feature(id).unwrap().geometry.as_line_string().unwrap().to_vec();
    assert_eq!(coords.len(), 7);
    assert_eq!(coords[3], p(2.5, 0.0));
    assert_eq!(session.selection().unwrap().indices(), &[3]);
}

#[test]
fn test_duplicate_selection_adds_hidden_segment() {
    let (mut store, mut session, id) = editing(line_feature());
    session.select_point(&store, 4, SelectionMode::Single).unwrap();
    session.select_point(&store, 1, SelectionMode::Additive).unwrap();

    let segment = session.duplicate_selection(&mut store).unwrap();
    assert_eq!(session.editing_feature(), Some(id));
    assert!(!store.layer(segment).unwrap().is_visible);
    assert_eq!(
        store.feature(segment).unwrap().geometry.as_line_string().unwrap(),
        &[p(4.0, 0.0), p(1.0, 0.0)]
    );

    session.exit_edit(&mut store).unwrap();
    assert!(store.layer(segment).unwrap().is_visible);
}

#[test]
fn test_exit_edit_when_idle() {
    let mut store = FeatureStore::default();
    let mut session = EditSession::default();
    assert_eq!(session.exit_edit(&mut store), Err(EditError::NotEditing));
    assert_eq!(session.cancel_edit(&mut store), Err(EditError::NotEditing));
}

#[test]
fn test_enter_edit_at_point() {
    let mut store = FeatureStore::default();
    let id = store.add(line_feature());
    let mut session = EditSession::default();
    session.enter_edit_at_point(&mut store, id, 3).unwrap();
    assert_eq!(session.selection().unwrap().indices(), &[3]);
}

#[test]
fn test_enter_edit_at_bad_point_changes_nothing() {
    let mut store = FeatureStore::default();
    let line = store.add(Feature::new(GeometryValue::line_string(vec![
        p(0.0, 0.0),
        p(1.0, 0.0),
    ])));
    store.add(Feature::new(GeometryValue::point(p(5.0, 5.0))));
    let mut session = EditSession::default();

    let result = session.enter_edit_at_point(&mut store, line, 9);
    assert_eq!(result, Err(EditError::IndexOutOfRange { index: 9, len: 2 }));
    assert!(session.is_idle());
    assert!(!session.has_snapshot());
    assert_eq!(store.visible().count(), 2);
}

#[test]
fn test_reset_returns_to_idle() {
    let (_, mut session, _) = editing(line_feature());
    session.reset();
    assert_eq!(session.mode(), &EditMode::Idle);
    assert!(!session.has_snapshot());
}
