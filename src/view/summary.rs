use std::io::Write;

use crate::bookmark::BookmarkState;
use crate::error::{AppError, AppResult};
use crate::map::MapViewState;

use super::traits::{BookmarkListView, MapRenderer};

/// Writes a one-line text summary per update.
pub struct SummaryRenderer<W: Write> {
    out: W,
}

impl<W: Write> SummaryRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) -> AppResult<()> {
        writeln!(self.out, "{line}")
            .map_err(|source| AppError::io_with_context(source, "failed to write summary"))
    }
}

pub fn map_summary(map: &MapViewState) -> String {
    let center = map.center();
    let sources: Vec<String> = map
        .sources()
        .iter()
        .map(|(id, source)| format!("{id}:{}", source.type_name()))
        .collect();
    let features = map.features();
    let buckets: Vec<String> = features
        .source_ids()
        .map(|id| format!("{id}={}", features.len(id)))
        .collect();
    format!(
        "map: center ({:.4}, {:.4}) zoom {:.1} | sources [{}] | {} layers | features [{}]",
        center.lon,
        center.lat,
        map.zoom(),
        sources.join(", "),
        map.layers().len(),
        buckets.join(", ")
    )
}

pub fn bookmark_summary(bookmarks: &BookmarkState) -> String {
    match bookmarks.current() {
        Some(current) => format!(
            "bookmarks: {}/{} {}",
            bookmarks.count() + 1,
            bookmarks.len(),
            current.display_name()
        ),
        None => "bookmarks: none".to_string(),
    }
}

impl<W: Write> MapRenderer for SummaryRenderer<W> {
    fn render(&mut self, map: &MapViewState) -> AppResult<()> {
        self.write_line(&map_summary(map))
    }
}

impl<W: Write> BookmarkListView for SummaryRenderer<W> {
    fn show(&mut self, bookmarks: &BookmarkState) -> AppResult<()> {
        self.write_line(&bookmark_summary(bookmarks))
    }
}
