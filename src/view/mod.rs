//! Presentation seams. Views are subscribers: they receive the current
//! snapshot once on connect and again for each slice a dispatch replaces.

mod summary;
mod traits;

use tracing::{debug, warn};

use crate::error::AppResult;
use crate::store::{Store, Subscription};

pub use summary::{SummaryRenderer, bookmark_summary, map_summary};
pub use traits::{BookmarkListView, MapRenderer};

pub fn connect_views<V>(store: &Store, mut view: V) -> AppResult<Subscription>
where
    V: MapRenderer + BookmarkListView + 'static,
{
    let state = store.state();
    view.render(&state.map)?;
    view.show(&state.bookmark)?;

    Ok(store.subscribe(move |store, report| {
        let state = store.state();
        if let Some(cursor) = report.cursor
            && cursor.is_jump()
        {
            debug!(from = cursor.from, to = cursor.to, "bookmark list jumped");
        }
        if report.changes.map
            && let Err(err) = view.render(&state.map)
        {
            warn!(error = %err, "map render failed");
        }
        if report.changes.bookmark
            && let Err(err) = view.show(&state.bookmark)
        {
            warn!(error = %err, "bookmark list update failed");
        }
    }))
}
