use tracing::debug;

use crate::action::Action;
use crate::bookmark::Bookmark;
use crate::map::LngLat;
use crate::store::Dispatched;

use super::core::App;

impl App {
    /// Centers the map on `center` at the configured zoom-to level.
    pub fn zoom_to(&mut self, center: impl Into<LngLat>) -> Dispatched {
        let zoom = self.config.view.zoom_to_level;
        self.store.dispatch(Action::set_view(center, zoom))
    }

    pub fn next_bookmark(&mut self) -> Dispatched {
        self.step_bookmark(1)
    }

    pub fn previous_bookmark(&mut self) -> Dispatched {
        self.step_bookmark(-1)
    }

    /// Selects bookmark `index` and zooms to it. Out-of-range indexes clamp.
    pub fn goto_bookmark(&mut self, index: usize) -> Dispatched {
        let target = i64::try_from(index).unwrap_or(i64::MAX);
        let moved = self.store.dispatch(Action::move_slide(target));

        let selected = self.store.state().bookmark.current().map(|b| b.center);
        if let Some(center) = selected {
            self.zoom_to(center);
        }
        moved
    }

    pub fn current_bookmark(&self) -> Option<(usize, Bookmark)> {
        let state = self.store.state();
        let count = state.bookmark.count();
        state.bookmark.current().map(|bookmark| (count, bookmark.clone()))
    }

    // The delta is taken from the snapshot current at call time.
    fn step_bookmark(&mut self, delta: i64) -> Dispatched {
        let count = self.store.state().bookmark.count();
        let target = i64::try_from(count).unwrap_or(i64::MAX).saturating_add(delta);
        debug!(from = count, target, "stepping bookmark cursor");
        self.store.dispatch(Action::move_slide(target))
    }
}
