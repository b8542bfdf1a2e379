use std::sync::Arc;

use crate::action::Action;

use super::state::BookmarkState;

/// Resolves a requested cursor position against a list of `len` bookmarks.
///
/// `None` when the list is empty: there is nothing to position on.
pub fn clamp_target(target: i64, len: usize) -> Option<usize> {
    let last = len.checked_sub(1)?;
    let last = i64::try_from(last).unwrap_or(i64::MAX);
    usize::try_from(target.clamp(0, last)).ok()
}

/// Applies `action` to the bookmark slice.
///
/// Only `MOVE_SLIDE` is recognized. The result is `Arc::clone(state)` when
/// the list is empty, when the clamped target equals the current cursor, or
/// for any other action.
pub fn reduce(state: &Arc<BookmarkState>, action: &Action) -> Arc<BookmarkState> {
    let Action::MoveSlide { target } = action else {
        return Arc::clone(state);
    };
    let Some(next) = clamp_target(*target, state.len()) else {
        return Arc::clone(state);
    };
    if next == state.count {
        return Arc::clone(state);
    }

    Arc::new(BookmarkState {
        bookmarks: Arc::clone(&state.bookmarks),
        count: next,
    })
}
