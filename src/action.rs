//! Action vocabulary shared by the orchestration layer and the reducers.
//!
//! Every action is an immutable record tagged by its [`ActionKind`]. Each
//! kind is owned by exactly one [`Slice`]; the reducer of every other slice
//! passes the action through untouched.

use serde::{Deserialize, Serialize};

use crate::map::{Feature, LayerDescriptor, LngLat, SourceDescriptor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    SetView {
        center: LngLat,
        zoom: f64,
    },
    AddSource {
        id: String,
        source: SourceDescriptor,
    },
    AddLayer {
        layer: LayerDescriptor,
    },
    AddFeatures {
        source_id: String,
        features: Vec<Feature>,
    },
    /// Signed so that `count - 1` from index zero is representable; the
    /// bookmark reducer clamps it.
    MoveSlide {
        target: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SetView,
    AddSource,
    AddLayer,
    AddFeatures,
    MoveSlide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    Map,
    Bookmark,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetView => "SET_VIEW",
            Self::AddSource => "ADD_SOURCE",
            Self::AddLayer => "ADD_LAYER",
            Self::AddFeatures => "ADD_FEATURES",
            Self::MoveSlide => "MOVE_SLIDE",
        }
    }

    pub fn slice(self) -> Slice {
        match self {
            Self::SetView | Self::AddSource | Self::AddLayer | Self::AddFeatures => Slice::Map,
            Self::MoveSlide => Slice::Bookmark,
        }
    }
}

impl Slice {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Bookmark => "bookmark",
        }
    }
}

impl Action {
    pub fn set_view(center: impl Into<LngLat>, zoom: f64) -> Self {
        Self::SetView {
            center: center.into(),
            zoom,
        }
    }

    pub fn add_source(id: impl Into<String>, source: SourceDescriptor) -> Self {
        Self::AddSource {
            id: id.into(),
            source,
        }
    }

    pub fn add_layer(layer: LayerDescriptor) -> Self {
        Self::AddLayer { layer }
    }

    pub fn add_features(source_id: impl Into<String>, features: Vec<Feature>) -> Self {
        Self::AddFeatures {
            source_id: source_id.into(),
            features,
        }
    }

    pub fn move_slide(target: i64) -> Self {
        Self::MoveSlide { target }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::SetView { .. } => ActionKind::SetView,
            Self::AddSource { .. } => ActionKind::AddSource,
            Self::AddLayer { .. } => ActionKind::AddLayer,
            Self::AddFeatures { .. } => ActionKind::AddFeatures,
            Self::MoveSlide { .. } => ActionKind::MoveSlide,
        }
    }

    pub fn slice(&self) -> Slice {
        self.kind().slice()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Action, ActionKind, Slice};
    use crate::map::LngLat;

    #[test]
    fn action_kind_maps_to_owning_slice() {
        assert_eq!(Action::set_view([-93.0, 45.0], 5.0).slice(), Slice::Map);
        assert_eq!(
            Action::add_features("points", Vec::new()).kind(),
            ActionKind::AddFeatures
        );
        assert_eq!(Action::move_slide(-1).slice(), Slice::Bookmark);
        assert_eq!(ActionKind::MoveSlide.as_str(), "MOVE_SLIDE");
    }

    #[test]
    fn actions_serialize_with_wire_tags() {
        let value = serde_json::to_value(Action::set_view([-93.0, 45.0], 5.0))
            .expect("action should serialize");
        assert_eq!(
            value,
            json!({ "type": "SET_VIEW", "center": [-93.0, 45.0], "zoom": 5.0 })
        );

        let parsed: Action =
            serde_json::from_value(json!({ "type": "ADD_FEATURES", "sourceId": "points", "features": [] }))
                .expect("action should deserialize");
        assert_eq!(parsed, Action::add_features("points", Vec::new()));

        let slide: Action = serde_json::from_value(json!({ "type": "MOVE_SLIDE", "target": -1 }))
            .expect("action should deserialize");
        assert_eq!(slide, Action::move_slide(-1));
        assert_eq!(
            Action::set_view(LngLat::new(1.0, 2.0), 3.0).kind().as_str(),
            "SET_VIEW"
        );
    }
}
