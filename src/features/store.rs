//! Ordered feature collection, the single owner of all feature data.

use bevy::prelude::*;

use crate::geometry::GeometryValue;

use super::color::unique_color;
use super::{Feature, FeatureId};

/// A feature plus its editor-side presentation state
#[derive(Debug, Clone)]
pub struct FeatureLayer {
    pub feature: Feature,
    pub is_visible: bool,
    /// Derived from the identity when the layer is created, never persisted
    pub color: Color,
}

impl FeatureLayer {
    fn new(feature: Feature) -> Self {
        let color = unique_color(&feature.id);
        Self {
            feature,
            is_visible: true,
            color,
        }
    }

    pub fn id(&self) -> FeatureId {
        self.feature.id
    }
}

/// Features in user-significant order (list position and z-order).
///
/// Identities are unique within the store.
#[derive(Resource, Debug, Default)]
pub struct FeatureStore {
    layers: Vec<FeatureLayer>,
}

impl FeatureStore {
    /// Append a feature, visible by default.
    ///
    /// A feature whose identity is already present gets a fresh one.
    pub fn add(&mut self, mut feature: Feature) -> FeatureId {
        if self.contains(feature.id) {
            let fresh = FeatureId::new();
            warn!(
                "Duplicate feature id {} replaced with {}",
                feature.id, fresh
            );
            feature.id = fresh;
        }
        let id = feature.id;
        self.layers.push(FeatureLayer::new(feature));
        id
    }

    /// Remove a feature. Callers editing this feature must reset their session.
    pub fn remove(&mut self, id: FeatureId) -> Option<Feature> {
        let index = self.index_of(id)?;
        Some(self.layers.remove(index).feature)
    }

    /// Deep-copy a feature under a fresh identity, named "<name> copy", appended
    /// at the end. Returns the copy's identity.
    pub fn duplicate(&mut self, id: FeatureId) -> Option<FeatureId> {
        let source = self.feature(id)?;
        let mut copy = source.clone();
        copy.id = FeatureId::new();
        copy.set_name(format!("{} copy", source.display_name()));
        Some(self.add(copy))
    }

    /// Move the feature at `from` to position `to`. Visibility is untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.layers.len() || to >= self.layers.len() {
            return false;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        true
    }

    /// Set each feature's visibility to the predicate's verdict
    pub fn set_visibility(&mut self, predicate: impl Fn(&FeatureLayer) -> bool) {
        for layer in &mut self.layers {
            layer.is_visible = predicate(layer);
        }
    }

    /// Hide everything except `id`
    pub fn isolate(&mut self, id: FeatureId) {
        self.set_visibility(|layer| layer.id() == id);
    }

    pub fn show_all(&mut self) {
        self.set_visibility(|_| true);
    }

    pub fn set_visible(&mut self, id: FeatureId, visible: bool) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.is_visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn unique_color(&self, id: FeatureId) -> Option<Color> {
        self.layer(id).map(|layer| layer.color)
    }

    pub fn set_geometry(&mut self, id: FeatureId, geometry: GeometryValue) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.feature.geometry = geometry;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: FeatureId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: FeatureId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id() == id)
    }

    pub fn layer(&self, id: FeatureId) -> Option<&FeatureLayer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    fn layer_mut(&mut self, id: FeatureId) -> Option<&mut FeatureLayer> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.layer(id).map(|layer| &layer.feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureLayer> {
        self.layers.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &FeatureLayer> {
        self.layers.iter().filter(|layer| layer.is_visible)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Snapshot of all features in order, for export
    pub fn features(&self) -> Vec<Feature> {
        self.layers.iter().map(|layer| layer.feature.clone()).collect()
    }

    /// Replace the whole collection, as on import
    pub fn replace_all(&mut self, features: impl IntoIterator<Item = Feature>) {
        self.layers.clear();
        for feature in features {
            self.add(feature);
        }
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    fn named(name: &str) -> Feature {
        Feature::new(GeometryValue::point(Position::new(1.0, 2.0))).with_name(name)
    }

    fn names(store: &FeatureStore) -> Vec<String> {
        store
            .iter()
            .map(|layer| layer.feature.display_name().to_string())
            .collect()
    }

    #[test]
    fn test_add_defaults_to_visible() {
        let mut store = FeatureStore::default();
        let id = store.add(named("a"));
        assert!(store.layer(id).unwrap().is_visible);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_keeps_identities_unique() {
        let mut store = FeatureStore::default();
        let first = named("a");
        let mut second = named("b");
        second.id = first.id;

        let a = store.add(first);
        let b = store.add(second);
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut store = FeatureStore::default();
        let id = store.add(named("a"));
        assert_eq!(store.remove(id).map(|f| f.id), Some(id));
        assert!(store.remove(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_appends_copy_with_fresh_identity() {
        let mut store = FeatureStore::default();
        let id = store.add(named("Harbour"));
        store.add(named("Other"));

        let copy = store.duplicate(id).unwrap();
        assert_ne!(copy, id);
        assert_eq!(names(&store), vec!["Harbour", "Other", "Harbour copy"]);
        assert_eq!(
            store.feature(copy).unwrap().geometry,
            store.feature(id).unwrap().geometry
        );
    }

    #[test]
    fn test_duplicate_unnamed() {
        let mut store = FeatureStore::default();
        let id = store.add(Feature::new(GeometryValue::point(Position::new(0.0, 0.0))));
        let copy = store.duplicate(id).unwrap();
        assert_eq!(store.feature(copy).unwrap().display_name(), "Unnamed copy");
    }

    #[test]
    fn test_reorder_keeps_visibility() {
        let mut store = FeatureStore::default();
        let a = store.add(named("a"));
        store.add(named("b"));
        store.add(named("c"));
        store.set_visible(a, false);

        assert!(store.reorder(0, 2));
        assert_eq!(names(&store), vec!["b", "c", "a"]);
        assert!(!store.layer(a).unwrap().is_visible);

        assert!(!store.reorder(0, 3));
        assert_eq!(names(&store), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_isolate_and_show_all() {
        let mut store = FeatureStore::default();
        let a = store.add(named("a"));
        let b = store.add(named("b"));

        store.isolate(b);
        assert!(!store.layer(a).unwrap().is_visible);
        assert!(store.layer(b).unwrap().is_visible);
        assert_eq!(store.visible().count(), 1);

        store.show_all();
        assert_eq!(store.visible().count(), 2);
    }

    #[test]
    fn test_unique_color_is_stable() {
        let mut store = FeatureStore::default();
        let feature = named("a");
        let id = feature.id;
        store.add(feature.clone());
        let color = store.unique_color(id).unwrap();

        let mut other = FeatureStore::default();
        other.add(feature);
        assert_eq!(other.unique_color(id), Some(color));
    }

    #[test]
    fn test_replace_all() {
        let mut store = FeatureStore::default();
        store.add(named("old"));
        store.replace_all(vec![named("x"), named("y")]);
        assert_eq!(names(&store), vec!["x", "y"]);
    }
}
