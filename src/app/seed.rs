use serde_json::json;
use tracing::{info, warn};

use crate::action::Action;
use crate::config::ViewConfig;
use crate::map::{LayerDescriptor, LayerKind, SourceDescriptor};

use super::core::App;

pub const BASEMAP_SOURCE_ID: &str = "osm";
pub const POINTS_SOURCE_ID: &str = "points";

const OSM_TILES: [&str; 3] = [
    "https://a.tile.openstreetmap.org/{z}/{x}/{y}.png",
    "https://b.tile.openstreetmap.org/{z}/{x}/{y}.png",
    "https://c.tile.openstreetmap.org/{z}/{x}/{y}.png",
];
const OSM_TILE_SIZE: u32 = 256;
const POINTS_CLUSTER_RADIUS: u32 = 50;

/// Startup view, the OSM basemap and the clustered point layers, in
/// dispatch order.
pub fn seed_actions(view: &ViewConfig) -> Vec<Action> {
    vec![
        Action::set_view(view.initial_center, view.initial_zoom),
        Action::add_source(
            BASEMAP_SOURCE_ID,
            SourceDescriptor::raster(OSM_TILES, Some(OSM_TILE_SIZE)),
        ),
        // Raster layers need no paint.
        Action::add_layer(LayerDescriptor::new(BASEMAP_SOURCE_ID, BASEMAP_SOURCE_ID)),
        Action::add_source(
            POINTS_SOURCE_ID,
            SourceDescriptor::empty_geojson(Some(POINTS_CLUSTER_RADIUS)),
        ),
        Action::add_layer(
            LayerDescriptor::new("clustered-points", POINTS_SOURCE_ID)
                .with_kind(LayerKind::Circle)
                .with_paint(json!({
                    "circle-radius": {
                        "type": "interval",
                        "default": 3,
                        "property": "point_count",
                        // [min point_count, radius]
                        "stops": [[0, 5], [2, 8], [5, 13], [10, 21]],
                    },
                    "circle-color": "#feb24c",
                    "circle-stroke-color": "#f03b20",
                }))
                .with_filter(json!(["has", "point_count"])),
        ),
        Action::add_layer(
            LayerDescriptor::new("clustered-labels", POINTS_SOURCE_ID)
                .with_layout(json!({
                    "text-field": "{point_count}",
                    "text-font": ["Arial"],
                    "text-size": 10,
                }))
                .with_filter(json!(["has", "point_count"])),
        ),
        Action::add_layer(
            LayerDescriptor::new("random-points", POINTS_SOURCE_ID)
                .with_kind(LayerKind::Circle)
                .with_paint(json!({
                    "circle-radius": 3,
                    "circle-color": "#756bb1",
                    "circle-stroke-color": "#756bb1",
                }))
                .with_filter(json!(["!has", "point_count"])),
        ),
    ]
}

impl App {
    /// Dispatches the startup actions and, when configured, the first
    /// random batch. Returns the number of dispatched actions.
    pub fn seed(&mut self) -> usize {
        let actions = seed_actions(&self.config.view);
        let mut dispatched = actions.len();
        for action in actions {
            self.store.dispatch(action);
        }

        if self.config.features.seed_random_points {
            match self.add_random_points(self.config.features.random_batch) {
                Ok(_) => dispatched += 1,
                Err(err) => warn!(error = %err, "skipped initial random points"),
            }
        }

        let state = self.store.state();
        info!(
            sources = state.map.sources().len(),
            layers = state.map.layers().len(),
            features = state.map.features().total_len(),
            "seeded map"
        );
        dispatched
    }
}
