use std::sync::Arc;

use crate::action::Action;

use super::state::MapViewState;

/// Applies `action` to the map slice.
///
/// Returns `Arc::clone(state)` for actions owned by another slice and for
/// actions that would not change anything, so callers can detect a change
/// with [`Arc::ptr_eq`]. Never edits `state` in place.
pub fn reduce(state: &Arc<MapViewState>, action: &Action) -> Arc<MapViewState> {
    match action {
        Action::SetView { center, zoom } => {
            if state.center == *center && state.zoom == *zoom {
                return Arc::clone(state);
            }
            let mut next = MapViewState::clone(state);
            next.center = *center;
            next.zoom = *zoom;
            Arc::new(next)
        }
        Action::AddSource { id, source } => {
            let mut next = MapViewState::clone(state);
            next.sources.insert(id.clone(), source.clone());
            Arc::new(next)
        }
        Action::AddLayer { layer } => {
            let mut next = MapViewState::clone(state);
            next.layers.push(layer.clone());
            Arc::new(next)
        }
        Action::AddFeatures {
            source_id,
            features,
        } => {
            if features.is_empty() {
                return Arc::clone(state);
            }
            let mut next = MapViewState::clone(state);
            next.features.extend(source_id, features);
            Arc::new(next)
        }
        Action::MoveSlide { .. } => Arc::clone(state),
    }
}
