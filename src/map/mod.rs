mod features;
pub mod reducer;
mod state;
mod validate;

pub use features::{
    Feature, FeatureId, FeatureInsert, FeatureStore, Geometry, GeometryValue, Properties,
    assign_missing_ids, feature_id, point_feature,
};
pub use reducer::reduce;
pub use state::{LayerDescriptor, LayerKind, LngLat, MapViewState, SourceDescriptor};
pub use validate::IntegrityIssue;
