mod dispatch;
mod parse;
mod spec;
mod types;

pub use dispatch::{CommandDispatchResult, dispatch};
pub use parse::parse_command_text;
pub use spec::{command_registry, usage_lines};
pub use types::{ArgKind, ArgSpec, Command, CommandId, CommandOutcome, CommandSpec};
