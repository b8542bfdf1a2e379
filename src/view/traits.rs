use crate::bookmark::BookmarkState;
use crate::error::AppResult;
use crate::map::MapViewState;

/// Draws the map slice. Called once on connect and again whenever the
/// slice is replaced.
pub trait MapRenderer {
    fn render(&mut self, map: &MapViewState) -> AppResult<()>;
}

/// Shows the bookmark list with its cursor.
pub trait BookmarkListView {
    fn show(&mut self, bookmarks: &BookmarkState) -> AppResult<()>;
}
