mod core;
mod event_bus;
mod event_loop;
mod nav;
mod random_points;
mod seed;


pub use core::App;
pub use random_points::random_point_features;
pub use seed::{BASEMAP_SOURCE_ID, POINTS_SOURCE_ID, seed_actions};
