use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::Value;
use tracing::info;
use uuid::{Builder, Uuid};

use crate::action::Action;
use crate::error::{AppError, AppResult};
use crate::map::{Feature, Properties, point_feature};
use crate::store::Dispatched;

use super::core::App;
use super::seed::POINTS_SOURCE_ID;

const RANDOM_POINT_TITLE: &str = "Random Point";

// http://listofrandomnames.com/
const RANDOM_NAMES: [&str; 11] = [
    "Riva Ristau",
    "Reena Rodgers",
    "Brent Borgia",
    "Annemarie Asher",
    "Solomon Salgado",
    "Tatiana Treece",
    "Albina Auclair",
    "Breanne Blind",
    "Carmina Croney",
    "Mila Mero",
    "Lorita Laux",
];

/// `count` point features anywhere on the globe, unbounded and not biased
/// toward land.
pub fn random_point_features<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Feature> {
    (0..count).map(|_| random_point_feature(rng)).collect()
}

fn random_point_feature<R: Rng + ?Sized>(rng: &mut R) -> Feature {
    let id = random_uuid(rng).to_string();
    let lon = rng.gen_range(-180.0..180.0);
    let lat = rng.gen_range(-90.0..90.0);
    let name = RANDOM_NAMES.choose(rng).copied().unwrap_or(RANDOM_NAMES[0]);

    let mut properties = Properties::new();
    properties.insert("title".to_string(), Value::from(RANDOM_POINT_TITLE));
    properties.insert("isRandom".to_string(), Value::Bool(true));
    properties.insert("randomName".to_string(), Value::from(name));
    properties.insert("id".to_string(), Value::from(id.clone()));

    point_feature(Some(id), [lon, lat], properties)
}

/// Version 4 uuid drawn from `rng`, so seeded runs are reproducible.
fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}

impl App {
    /// Rejects batches above `[features] max_batch` before generating
    /// anything.
    pub fn add_random_points(&mut self, count: usize) -> AppResult<Dispatched> {
        let max_batch = self.config.features.max_batch;
        if count > max_batch {
            return Err(AppError::invalid_argument(format!(
                "add-random-points count {count} exceeds max_batch {max_batch}"
            )));
        }
        let features = random_point_features(&mut self.rng, count);
        info!(count, source_id = POINTS_SOURCE_ID, "adding random points");
        Ok(self
            .store
            .dispatch(Action::add_features(POINTS_SOURCE_ID, features)))
    }
}
