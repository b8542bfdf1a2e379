use crate::error::{AppError, AppResult};
use crate::map::LngLat;

use super::spec::command_registry;
use super::types::Command;

pub fn parse_command_text(input: &str) -> AppResult<Command> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_argument("command must not be empty"));
    }

    let (id, args_text) = match trimmed.find(char::is_whitespace) {
        Some(index) => (&trimmed[..index], trimmed[index..].trim_start()),
        None => (trimmed, ""),
    };

    if !command_registry().iter().any(|spec| spec.id == id) {
        return Err(AppError::invalid_argument(format!("unknown command id '{id}'")));
    }

    match id {
        "add-random-points" => parse_add_random_points(args_text),
        "zoom-to" => parse_zoom_to(args_text),
        "next-bookmark" => parse_no_args(id, args_text, Command::NextBookmark),
        "prev-bookmark" => parse_no_args(id, args_text, Command::PrevBookmark),
        "goto-bookmark" => parse_goto_bookmark(args_text),
        "current-bookmark" => parse_no_args(id, args_text, Command::CurrentBookmark),
        "state" => parse_no_args(id, args_text, Command::ShowState),
        "validate" => parse_no_args(id, args_text, Command::Validate),
        "quit" => parse_no_args(id, args_text, Command::Quit),
        _ => Err(AppError::unsupported(
            "command parser is out of sync with registry",
        )),
    }
}

fn parse_no_args(id: &str, args_text: &str, cmd: Command) -> AppResult<Command> {
    if args_text.is_empty() {
        return Ok(cmd);
    }

    Err(AppError::invalid_argument(format!(
        "{id} does not accept arguments"
    )))
}

fn parse_add_random_points(args_text: &str) -> AppResult<Command> {
    let mut parts = args_text.split_whitespace();
    let Some(count_text) = parts.next() else {
        return Ok(Command::AddRandomPoints { count: None });
    };
    if parts.next().is_some() {
        return Err(AppError::invalid_argument(
            "add-random-points accepts at most 1 argument",
        ));
    }

    let count = count_text
        .parse::<usize>()
        .map_err(|_| AppError::invalid_argument("add-random-points count must be an integer"))?;
    if count == 0 {
        return Err(AppError::invalid_argument(
            "add-random-points count must be >= 1",
        ));
    }

    Ok(Command::AddRandomPoints { count: Some(count) })
}

fn parse_zoom_to(args_text: &str) -> AppResult<Command> {
    let mut parts = args_text.split_whitespace();
    let (Some(lon_text), Some(lat_text)) = (parts.next(), parts.next()) else {
        return Err(AppError::invalid_argument(
            "zoom-to requires 2 arguments: lon lat",
        ));
    };
    if parts.next().is_some() {
        return Err(AppError::invalid_argument(
            "zoom-to accepts exactly 2 arguments",
        ));
    }

    let lon = parse_coordinate(lon_text, "lon")?;
    let lat = parse_coordinate(lat_text, "lat")?;

    Ok(Command::ZoomTo {
        center: LngLat::new(lon, lat),
    })
}

fn parse_coordinate(text: &str, name: &str) -> AppResult<f64> {
    let value = text
        .parse::<f64>()
        .map_err(|_| AppError::invalid_argument(format!("zoom-to {name} must be a number")))?;
    if !value.is_finite() {
        return Err(AppError::invalid_argument(format!(
            "zoom-to {name} must be finite"
        )));
    }
    Ok(value)
}

fn parse_goto_bookmark(args_text: &str) -> AppResult<Command> {
    let mut parts = args_text.split_whitespace();
    let Some(index_text) = parts.next() else {
        return Err(AppError::invalid_argument(
            "goto-bookmark requires 1 argument: index",
        ));
    };
    if parts.next().is_some() {
        return Err(AppError::invalid_argument(
            "goto-bookmark accepts exactly 1 argument",
        ));
    }

    let index = index_text
        .parse::<usize>()
        .map_err(|_| AppError::invalid_argument("goto-bookmark index must be an integer >= 0"))?;

    Ok(Command::GotoBookmark { index })
}
