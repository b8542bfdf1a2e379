use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bookmark::BookmarkState;
use crate::config::Config;
use crate::error::AppResult;
use crate::map::MapViewState;
use crate::store::{AppState, Store};

/// Orchestration root: owns the store and translates triggers into actions.
pub struct App {
    pub(crate) store: Store,
    pub(crate) config: Config,
    pub(crate) rng: StdRng,
}

impl App {
    pub fn new() -> AppResult<Self> {
        let config = Config::load()?;
        Ok(Self::new_with_config(config))
    }

    /// The map slice starts empty until [`App::seed`]; the bookmark list
    /// comes from `config.bookmarks`.
    pub fn new_with_config(config: Config) -> Self {
        let rng = match config.features.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let store = Store::new(
            MapViewState::default(),
            BookmarkState::new(config.bookmarks.0.clone()),
        );

        Self { store, config, rng }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> Arc<AppState> {
        self.store.state()
    }

    pub fn teardown(self) -> Arc<AppState> {
        self.store.teardown()
    }
}
