use super::types::{ArgKind, ArgSpec, CommandSpec};

const NO_ARGS: [ArgSpec; 0] = [];
const ARGS_ADD_RANDOM_POINTS: [ArgSpec; 1] = [ArgSpec {
    name: "count",
    kind: ArgKind::Usize,
    required: false,
}];
const ARGS_ZOOM_TO: [ArgSpec; 2] = [
    ArgSpec {
        name: "lon",
        kind: ArgKind::F64,
        required: true,
    },
    ArgSpec {
        name: "lat",
        kind: ArgKind::F64,
        required: true,
    },
];
const ARGS_GOTO_BOOKMARK: [ArgSpec; 1] = [ArgSpec {
    name: "index",
    kind: ArgKind::Usize,
    required: true,
}];

const COMMAND_SPECS: [CommandSpec; 9] = [
    CommandSpec {
        id: "add-random-points",
        title: "Add Random Points",
        args: &ARGS_ADD_RANDOM_POINTS,
    },
    CommandSpec {
        id: "zoom-to",
        title: "Zoom To",
        args: &ARGS_ZOOM_TO,
    },
    CommandSpec {
        id: "next-bookmark",
        title: "Next Bookmark",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "prev-bookmark",
        title: "Previous Bookmark",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "goto-bookmark",
        title: "Go to Bookmark",
        args: &ARGS_GOTO_BOOKMARK,
    },
    CommandSpec {
        id: "current-bookmark",
        title: "Current Bookmark",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "state",
        title: "Show State",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "validate",
        title: "Validate Layers",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "quit",
        title: "Quit",
        args: &NO_ARGS,
    },
];

pub fn command_registry() -> &'static [CommandSpec] {
    &COMMAND_SPECS
}

/// One line per command, e.g. `zoom-to <lon:f64> <lat:f64>  Zoom To`.
pub fn usage_lines() -> Vec<String> {
    command_registry()
        .iter()
        .map(|spec| {
            let mut line = spec.id.to_string();
            for arg in spec.args {
                let (open, close) = if arg.required { ('<', '>') } else { ('[', ']') };
                line.push_str(&format!(" {open}{}:{}{close}", arg.name, arg.kind.as_str()));
            }
            format!("{line}  {}", spec.title)
        })
        .collect()
}
