use crate::action::ActionKind;
use crate::map::FeatureInsert;

/// Which slices a dispatch replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceChanges {
    pub map: bool,
    pub bookmark: bool,
}

impl SliceChanges {
    pub fn any(self) -> bool {
        self.map || self.bookmark
    }
}

/// Cursor transition produced by a `MOVE_SLIDE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMove {
    pub from: usize,
    pub to: usize,
}

impl CursorMove {
    /// More than one position at once, e.g. a list click rather than
    /// next/previous.
    pub fn is_jump(self) -> bool {
        self.from.abs_diff(self.to) > 1
    }
}

/// What subscribers learn about each applied dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub kind: ActionKind,
    pub changes: SliceChanges,
    pub cursor: Option<CursorMove>,
    /// Set for non-empty `ADD_FEATURES` batches only.
    pub feature_insert: Option<FeatureInsert>,
}

/// External triggers fed to the event loop through a single queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Trigger {
    Line(String),
    InputError(String),
    InputClosed,
    AutoplayTick,
}
