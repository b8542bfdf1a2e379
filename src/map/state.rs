use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::features::{FeatureInsert, FeatureStore};

/// Longitude/latitude pair, serialized as `[lon, lat]`.
///
/// Ranges are not enforced; out-of-range values pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(value: LngLat) -> Self {
        [value.lon, value.lat]
    }
}

/// A source declaration as handed to the renderer.
///
/// Raster and geojson sources are typed. Any other `type` (vector, image,
/// video, raster-dem, ...) is kept verbatim in [`SourceDescriptor::Other`].
/// Unrecognized fields on typed sources survive in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SourceRepr", into = "SourceRepr")]
pub enum SourceDescriptor {
    Raster {
        tiles: Vec<String>,
        tile_size: Option<u32>,
        extra: Map<String, Value>,
    },
    Geojson {
        data: Value,
        cluster_radius: Option<u32>,
        extra: Map<String, Value>,
    },
    Other {
        kind: String,
        fields: Map<String, Value>,
    },
}

impl SourceDescriptor {
    pub fn raster<I, S>(tiles: I, tile_size: Option<u32>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Raster {
            tiles: tiles.into_iter().map(Into::into).collect(),
            tile_size,
            extra: Map::new(),
        }
    }

    /// A geojson source whose inline data is an empty `FeatureCollection`.
    pub fn empty_geojson(cluster_radius: Option<u32>) -> Self {
        Self::Geojson {
            data: serde_json::json!({ "type": "FeatureCollection", "features": [] }),
            cluster_radius,
            extra: Map::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Self::Raster { .. } => "raster",
            Self::Geojson { .. } => "geojson",
            Self::Other { kind, .. } => kind,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SourceRepr {
    Typed(TypedSource),
    Other {
        #[serde(rename = "type")]
        kind: String,
        #[serde(flatten)]
        fields: Map<String, Value>,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TypedSource {
    Raster {
        tiles: Vec<String>,
        #[serde(rename = "tileSize", default, skip_serializing_if = "Option::is_none")]
        tile_size: Option<u32>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Geojson {
        data: Value,
        #[serde(
            rename = "clusterRadius",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        cluster_radius: Option<u32>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl From<SourceRepr> for SourceDescriptor {
    fn from(repr: SourceRepr) -> Self {
        match repr {
            SourceRepr::Typed(TypedSource::Raster {
                tiles,
                tile_size,
                extra,
            }) => Self::Raster {
                tiles,
                tile_size,
                extra,
            },
            SourceRepr::Typed(TypedSource::Geojson {
                data,
                cluster_radius,
                extra,
            }) => Self::Geojson {
                data,
                cluster_radius,
                extra,
            },
            SourceRepr::Other { kind, fields } => Self::Other { kind, fields },
        }
    }
}

impl From<SourceDescriptor> for SourceRepr {
    fn from(source: SourceDescriptor) -> Self {
        match source {
            SourceDescriptor::Raster {
                tiles,
                tile_size,
                extra,
            } => Self::Typed(TypedSource::Raster {
                tiles,
                tile_size,
                extra,
            }),
            SourceDescriptor::Geojson {
                data,
                cluster_radius,
                extra,
            } => Self::Typed(TypedSource::Geojson {
                data,
                cluster_radius,
                extra,
            }),
            SourceDescriptor::Other { kind, fields } => Self::Other { kind, fields },
        }
    }
}

/// Layer `type`. Types this crate does not know are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    Background,
    Circle,
    Fill,
    FillExtrusion,
    Heatmap,
    Hillshade,
    Line,
    Raster,
    Symbol,
    #[serde(untagged)]
    Other(String),
}

/// Declarative drawing instructions for one source.
///
/// `paint`, `layout` and `filter` are opaque style expressions handed to the
/// renderer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub id: String,
    pub source: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LayerKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paint: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    /// `minzoom`, `source-layer`, `metadata` and any other field, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LayerDescriptor {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            kind: None,
            paint: None,
            layout: None,
            filter: None,
            extra: Map::new(),
        }
    }

    pub fn with_kind(mut self, kind: LayerKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_paint(mut self, paint: Value) -> Self {
        self.paint = Some(paint);
        self
    }

    pub fn with_layout(mut self, layout: Value) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// The map slice: viewport, declared sources, ordered layers and the
/// per-source feature buckets.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MapViewState {
    pub(crate) center: LngLat,
    pub(crate) zoom: f64,
    pub(crate) sources: BTreeMap<String, SourceDescriptor>,
    pub(crate) layers: Vec<LayerDescriptor>,
    pub(crate) features: FeatureStore,
}

impl MapViewState {
    pub fn new(center: impl Into<LngLat>, zoom: f64) -> Self {
        Self {
            center: center.into(),
            zoom,
            ..Self::default()
        }
    }

    pub fn center(&self) -> LngLat {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn sources(&self) -> &BTreeMap<String, SourceDescriptor> {
        &self.sources
    }

    pub fn source(&self, id: &str) -> Option<&SourceDescriptor> {
        self.sources.get(id)
    }

    /// Layers in draw order.
    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    /// First layer with `id`. Duplicate ids are accepted, see
    /// [`MapViewState::integrity_issues`].
    pub fn layer(&self, id: &str) -> Option<&LayerDescriptor> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn features(&self) -> &FeatureStore {
        &self.features
    }

    /// How an `ADD_FEATURES` targeting `source_id` would land.
    pub fn classify_feature_target(&self, source_id: &str) -> FeatureInsert {
        if self.sources.contains_key(source_id) {
            FeatureInsert::Inserted
        } else if self.features.has_bucket(source_id) {
            FeatureInsert::AppendedUndeclared
        } else {
            FeatureInsert::CreatedImplicitly
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{LayerDescriptor, LayerKind, LngLat, MapViewState, SourceDescriptor};
    use crate::map::FeatureInsert;

    #[test]
    fn source_descriptors_use_renderer_field_names() {
        let raster = SourceDescriptor::raster(["https://a.tile/{z}/{x}/{y}.png"], Some(256));
        assert_eq!(
            serde_json::to_value(&raster).expect("source should serialize"),
            json!({ "type": "raster", "tiles": ["https://a.tile/{z}/{x}/{y}.png"], "tileSize": 256 })
        );

        let points = SourceDescriptor::empty_geojson(Some(50));
        assert_eq!(
            serde_json::to_value(&points).expect("source should serialize"),
            json!({
                "type": "geojson",
                "data": { "type": "FeatureCollection", "features": [] },
                "clusterRadius": 50
            })
        );
        assert_eq!(points.type_name(), "geojson");
    }

    #[test]
    fn layer_descriptor_omits_unset_style_fields() {
        let layer = LayerDescriptor::new("random-points", "points")
            .with_kind(LayerKind::Circle)
            .with_filter(json!(["!has", "point_count"]));
        assert_eq!(
            serde_json::to_value(&layer).expect("layer should serialize"),
            json!({
                "id": "random-points",
                "source": "points",
                "type": "circle",
                "filter": ["!has", "point_count"]
            })
        );

        let parsed: LayerDescriptor = serde_json::from_value(json!({ "id": "osm", "source": "osm" }))
            .expect("bare layer should deserialize");
        assert_eq!(parsed, LayerDescriptor::new("osm", "osm"));
    }

    #[test]
    fn unknown_source_types_round_trip_verbatim() {
        let payload = json!({
            "type": "vector",
            "url": "https://tiles.example/planet.json",
            "maxzoom": 14
        });
        let vector: SourceDescriptor =
            serde_json::from_value(payload.clone()).expect("vector source should deserialize");
        assert_eq!(vector.type_name(), "vector");
        assert!(matches!(
            &vector,
            SourceDescriptor::Other { fields, .. } if fields["maxzoom"] == json!(14)
        ));
        assert_eq!(
            serde_json::to_value(&vector).expect("source should serialize"),
            payload
        );

        let raster = json!({
            "type": "raster",
            "tiles": ["https://a.tile/{z}/{x}/{y}.png"],
            "attribution": "OSM contributors"
        });
        let parsed: SourceDescriptor =
            serde_json::from_value(raster.clone()).expect("raster source should deserialize");
        assert!(matches!(
            &parsed,
            SourceDescriptor::Raster { tile_size: None, extra, .. }
                if extra["attribution"] == json!("OSM contributors")
        ));
        assert_eq!(
            serde_json::to_value(&parsed).expect("source should serialize"),
            raster
        );
    }

    #[test]
    fn layer_kinds_accept_renderer_types_beyond_the_builtins() {
        let heatmap = json!({
            "id": "density",
            "source": "points",
            "type": "heatmap",
            "maxzoom": 9,
            "paint": { "heatmap-radius": 20 }
        });
        let layer: LayerDescriptor =
            serde_json::from_value(heatmap.clone()).expect("heatmap layer should deserialize");
        assert_eq!(layer.kind, Some(LayerKind::Heatmap));
        assert_eq!(layer.extra["maxzoom"], json!(9));
        assert_eq!(
            serde_json::to_value(&layer).expect("layer should serialize"),
            heatmap
        );

        let custom: LayerDescriptor = serde_json::from_value(json!({
            "id": "globe",
            "source": "none",
            "type": "custom-3d"
        }))
        .expect("custom layer type should deserialize");
        assert_eq!(custom.kind, Some(LayerKind::Other("custom-3d".to_string())));

        let extrusion = LayerDescriptor::new("buildings", "osm").with_kind(LayerKind::FillExtrusion);
        assert_eq!(
            serde_json::to_value(&extrusion).expect("layer should serialize")["type"],
            json!("fill-extrusion")
        );
    }

    #[test]
    fn classify_feature_target_depends_on_declared_sources() {
        let mut state = MapViewState::new(LngLat::new(-93.0, 45.0), 5.0);
        assert_eq!(
            state.classify_feature_target("points"),
            FeatureInsert::CreatedImplicitly
        );

        state.features.extend("points", &[]);
        assert_eq!(
            state.classify_feature_target("points"),
            FeatureInsert::AppendedUndeclared
        );

        state
            .sources
            .insert("points".to_string(), SourceDescriptor::empty_geojson(None));
        assert_eq!(state.classify_feature_target("points"), FeatureInsert::Inserted);
    }
}
