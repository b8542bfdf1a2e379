use crate::map::LngLat;

/// A user intent, translated into store actions by [`super::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddRandomPoints { count: Option<usize> },
    ZoomTo { center: LngLat },
    NextBookmark,
    PrevBookmark,
    GotoBookmark { index: usize },
    CurrentBookmark,
    ShowState,
    Validate,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandId {
    AddRandomPoints,
    ZoomTo,
    NextBookmark,
    PrevBookmark,
    GotoBookmark,
    CurrentBookmark,
    ShowState,
    Validate,
    Quit,
}

impl CommandId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddRandomPoints => "add-random-points",
            Self::ZoomTo => "zoom-to",
            Self::NextBookmark => "next-bookmark",
            Self::PrevBookmark => "prev-bookmark",
            Self::GotoBookmark => "goto-bookmark",
            Self::CurrentBookmark => "current-bookmark",
            Self::ShowState => "state",
            Self::Validate => "validate",
            Self::Quit => "quit",
        }
    }
}

impl Command {
    pub fn id(&self) -> CommandId {
        match self {
            Self::AddRandomPoints { .. } => CommandId::AddRandomPoints,
            Self::ZoomTo { .. } => CommandId::ZoomTo,
            Self::NextBookmark => CommandId::NextBookmark,
            Self::PrevBookmark => CommandId::PrevBookmark,
            Self::GotoBookmark { .. } => CommandId::GotoBookmark,
            Self::CurrentBookmark => CommandId::CurrentBookmark,
            Self::ShowState => CommandId::ShowState,
            Self::Validate => CommandId::Validate,
            Self::Quit => CommandId::Quit,
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    F64,
    Usize,
}

impl ArgKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::Usize => "usize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub args: &'static [ArgSpec],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Noop,
    QuitRequested,
}
