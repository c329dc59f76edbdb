use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{GeometryValue, Properties, PropertyValue, NAME_KEY};

/// Namespace for identities derived from external string keys
const FEATURE_KEY_NAMESPACE: Uuid = Uuid::from_u128(0x6a0f_2c1e_8d4b_4f7a_9e35_b1c8_0d2e_7f41);

/// Stable feature identity, preserved through edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(Uuid);

impl FeatureId {
    /// A fresh random identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identity derived from an external key.
    ///
    /// Keys that already are UUIDs are kept as-is; any other key is hashed into a
    /// name-based UUID, so re-importing the same file yields the same identities.
    pub fn from_key(key: &str) -> Self {
        match Uuid::parse_str(key) {
            Ok(uuid) => Self(uuid),
            Err(_) => Self(Uuid::new_v5(&FEATURE_KEY_NAMESPACE, key.as_bytes())),
        }
    }

    /// The identity's low 64 bits. Random for v4 identities and hash output
    /// for key-derived ones, apart from the two variant bits at the top.
    pub fn low_bits(&self) -> u64 {
        self.0.as_u64_pair().1
    }
}

impl Default for FeatureId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An identified geometry plus its property bag
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub properties: Properties,
    pub geometry: GeometryValue,
}

impl Feature {
    pub fn new(geometry: GeometryValue) -> Self {
        Self {
            id: FeatureId::new(),
            properties: Properties::new(),
            geometry,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get(NAME_KEY).and_then(PropertyValue::as_str)
    }

    /// Name shown in lists, falling back to "Unnamed"
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or("Unnamed")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.properties
            .insert(NAME_KEY.to_string(), PropertyValue::String(name.into()));
    }
}
