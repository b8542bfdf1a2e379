use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub use geojson::feature::Id as FeatureId;
pub use geojson::{Feature, Geometry, JsonObject as Properties, Value as GeometryValue};

/// Point feature with `id` as its top-level GeoJSON id.
pub fn point_feature(id: Option<String>, [lon, lat]: [f64; 2], properties: Properties) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeometryValue::Point(vec![lon, lat]))),
        id: id.map(FeatureId::String),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Top-level id rendered as text; numeric ids use their JSON spelling.
pub fn feature_id(feature: &Feature) -> Option<String> {
    match feature.id.as_ref()? {
        FeatureId::String(id) => Some(id.clone()),
        FeatureId::Number(id) => Some(id.to_string()),
    }
}

/// Gives every id-less feature a top-level id. A string or numeric
/// `properties.id` is promoted; otherwise a fresh uuid v4 is used.
/// Returns how many ids were assigned.
pub fn assign_missing_ids(features: &mut [Feature]) -> usize {
    let mut assigned = 0;
    for feature in features.iter_mut().filter(|f| f.id.is_none()) {
        let id = match feature.property("id") {
            Some(Value::String(id)) => FeatureId::String(id.clone()),
            Some(Value::Number(id)) => FeatureId::Number(id.clone()),
            _ => FeatureId::String(Uuid::new_v4().to_string()),
        };
        feature.id = Some(id);
        assigned += 1;
    }
    assigned
}

/// How an `ADD_FEATURES` batch landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureInsert {
    /// The target source is declared.
    Inserted,
    /// The source is undeclared and had no bucket yet; one was created.
    CreatedImplicitly,
    /// The source is undeclared but an earlier batch already created its
    /// bucket.
    AppendedUndeclared,
}

impl FeatureInsert {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::CreatedImplicitly => "created-implicitly",
            Self::AppendedUndeclared => "appended-undeclared",
        }
    }
}

/// Feature buckets keyed by source id.
///
/// Buckets are reference counted so that cloning the store for a new map
/// snapshot only copies the bucket that is being appended to.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct FeatureStore {
    buckets: BTreeMap<String, Arc<Vec<Feature>>>,
}

impl FeatureStore {
    pub fn bucket(&self, source_id: &str) -> &[Feature] {
        self.buckets
            .get(source_id)
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_bucket(&self, source_id: &str) -> bool {
        self.buckets.contains_key(source_id)
    }

    pub fn len(&self, source_id: &str) -> usize {
        self.bucket(source_id).len()
    }

    pub fn total_len(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.len()).sum()
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Appends `features` to the bucket for `source_id`, creating the bucket
    /// when absent. Ids are kept as given; nothing is deduplicated.
    pub(crate) fn extend(&mut self, source_id: &str, features: &[Feature]) {
        let bucket = self.buckets.entry(source_id.to_string()).or_default();
        Arc::make_mut(bucket).extend_from_slice(features);
    }

    #[cfg(test)]
    pub(crate) fn shares_bucket_with(&self, other: &Self, source_id: &str) -> bool {
        match (self.buckets.get(source_id), other.buckets.get(source_id)) {
            (Some(left), Some(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}
