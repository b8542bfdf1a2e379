pub mod reducer;
mod state;

pub use reducer::{clamp_target, reduce};
pub use state::{Bookmark, BookmarkState};
