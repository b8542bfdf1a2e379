use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::map::LngLat;

/// A saved viewpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub center: LngLat,
    pub zoom: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Bookmark {
    pub fn new(center: impl Into<LngLat>, zoom: f64) -> Self {
        Self {
            center: center.into(),
            zoom,
            label: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("({:.4}, {:.4})", self.center.lon, self.center.lat),
        }
    }
}

/// The bookmark slice: the ordered list and a cursor into it.
///
/// `count` is zero-based and always within `0..bookmarks.len()` when the
/// list is non-empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BookmarkState {
    pub(crate) bookmarks: Arc<Vec<Bookmark>>,
    pub(crate) count: usize,
}

impl BookmarkState {
    pub fn new(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            bookmarks: Arc::new(bookmarks),
            count: 0,
        }
    }

    /// Starts positioned at `count`, clamped into range.
    pub fn with_cursor(bookmarks: Vec<Bookmark>, count: usize) -> Self {
        let count = count.min(bookmarks.len().saturating_sub(1));
        Self {
            bookmarks: Arc::new(bookmarks),
            count,
        }
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn current(&self) -> Option<&Bookmark> {
        self.bookmarks.get(self.count)
    }
}
