use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::bookmark::Bookmark;
use crate::error::{AppError, AppResult};
use crate::map::LngLat;

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub view: ViewConfig,
    pub features: FeatureConfig,
    pub navigation: NavigationConfig,
    pub bookmarks: BookmarksConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    pub initial_center: LngLat,
    pub initial_zoom: f64,
    /// Zoom level used by zoom-to requests.
    pub zoom_to_level: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_center: LngLat::new(-93.0, 45.0),
            initial_zoom: 5.0,
            zoom_to_level: 5.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeatureConfig {
    pub random_batch: usize,
    /// Largest batch a single add-random-points may generate.
    pub max_batch: usize,
    pub seed_random_points: bool,
    pub rng_seed: Option<u64>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            random_batch: 10,
            max_batch: 10_000,
            seed_random_points: true,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct NavigationConfig {
    /// Slideshow interval; 0 disables it.
    pub autoplay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct BookmarksConfig(pub Vec<Bookmark>);

impl Default for BookmarksConfig {
    fn default() -> Self {
        Self(vec![
            Bookmark::new([-93.265, 44.978], 10.0).labeled("Minneapolis"),
            Bookmark::new([-87.630, 41.878], 10.0).labeled("Chicago"),
            Bookmark::new([-104.990, 39.739], 10.0).labeled("Denver"),
        ])
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        let defaults = ViewConfig::default();
        if !is_valid_zoom(self.view.initial_zoom) {
            self.view.initial_zoom = defaults.initial_zoom;
        }
        if !is_valid_zoom(self.view.zoom_to_level) {
            self.view.zoom_to_level = defaults.zoom_to_level;
        }
        self.features.max_batch = self.features.max_batch.max(1);
        self.features.random_batch = self
            .features
            .random_batch
            .clamp(1, self.features.max_batch);
        for bookmark in &mut self.bookmarks.0 {
            if !is_valid_zoom(bookmark.zoom) {
                bookmark.zoom = self.view.zoom_to_level;
            }
        }
        self
    }
}

fn is_valid_zoom(zoom: f64) -> bool {
    zoom.is_finite() && zoom >= 0.0
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("BMAP_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("bmap").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("bmap")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("bmap").join("config.toml"));
    }
    None
}
