use std::sync::Arc;

use tracing::info;

use crate::app::App;
use crate::error::AppResult;

use super::types::{Command, CommandOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDispatchResult {
    pub outcome: CommandOutcome,
    pub message: String,
}

impl CommandDispatchResult {
    fn new(outcome: CommandOutcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            message: message.into(),
        }
    }
}

pub fn dispatch(app: &mut App, cmd: Command) -> AppResult<CommandDispatchResult> {
    let before = app.state();
    let id = cmd.id();

    let message = match cmd {
        Command::AddRandomPoints { count } => {
            let count = count.unwrap_or(app.config().features.random_batch);
            app.add_random_points(count)?;
            format!("added {count} random points")
        }
        Command::ZoomTo { center } => {
            app.zoom_to(center);
            format!("zoomed to ({:.4}, {:.4})", center.lon, center.lat)
        }
        Command::NextBookmark => {
            app.next_bookmark();
            describe_current(app)
        }
        Command::PrevBookmark => {
            app.previous_bookmark();
            describe_current(app)
        }
        Command::GotoBookmark { index } => {
            app.goto_bookmark(index);
            describe_current(app)
        }
        Command::CurrentBookmark => {
            let message = describe_current(app);
            info!(bookmark = %message, "current bookmark");
            return Ok(CommandDispatchResult::new(CommandOutcome::Noop, message));
        }
        Command::ShowState => {
            let json = serde_json::to_string_pretty(before.as_ref())?;
            return Ok(CommandDispatchResult::new(CommandOutcome::Noop, json));
        }
        Command::Validate => {
            before.map.validate()?;
            let layers = before.map.layers().len();
            return Ok(CommandDispatchResult::new(
                CommandOutcome::Noop,
                format!("{layers} layers ok"),
            ));
        }
        Command::Quit => {
            return Ok(CommandDispatchResult::new(
                CommandOutcome::QuitRequested,
                "quit requested",
            ));
        }
    };

    let outcome = if Arc::ptr_eq(&before, &app.state()) {
        CommandOutcome::Noop
    } else {
        CommandOutcome::Applied
    };
    info!(command = id.as_str(), ?outcome, "command dispatched");

    Ok(CommandDispatchResult::new(outcome, message))
}

fn describe_current(app: &App) -> String {
    let total = app.state().bookmark.len();
    match app.current_bookmark() {
        Some((count, bookmark)) => format!(
            "bookmark {}/{total}: {}",
            count + 1,
            bookmark.display_name()
        ),
        None => "no bookmarks".to_string(),
    }
}
