use std::io::Write;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::command::{CommandOutcome, dispatch, parse_command_text, usage_lines};
use crate::error::{AppError, AppResult};
use crate::event::Trigger;

use super::core::App;
use super::event_bus::EventBusRuntime;

const HELP_COMMAND: &str = "help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Break,
}

/// Result of handling one trigger: whether to keep looping and what to
/// print for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TriggerOutcome {
    pub(crate) control: LoopControl,
    pub(crate) output: Vec<String>,
}

impl TriggerOutcome {
    fn proceed(output: Vec<String>) -> Self {
        Self {
            control: LoopControl::Continue,
            output,
        }
    }

    fn stop(output: Vec<String>) -> Self {
        Self {
            control: LoopControl::Break,
            output,
        }
    }
}

impl App {
    /// Reads commands from stdin until `quit` or end of input.
    pub async fn run(&mut self, out: &mut impl Write) -> AppResult<()> {
        let autoplay_ms = self.config.navigation.autoplay_ms;
        let autoplay = (autoplay_ms > 0).then(|| Duration::from_millis(autoplay_ms));
        let (mut rx, mut runtime) = EventBusRuntime::spawn(autoplay);
        info!(autoplay_ms, "event loop started");

        let result = self.run_until_closed(&mut rx, out).await;
        runtime.shutdown();
        result
    }

    /// Handles triggers one at a time, each to completion, in arrival order.
    pub(crate) async fn run_until_closed(
        &mut self,
        rx: &mut UnboundedReceiver<Trigger>,
        out: &mut impl Write,
    ) -> AppResult<()> {
        while let Some(trigger) = rx.recv().await {
            let outcome = self.handle_trigger(trigger);
            for line in &outcome.output {
                writeln!(out, "{line}")
                    .map_err(|source| AppError::io_with_context(source, "failed to write output"))?;
            }
            out.flush()
                .map_err(|source| AppError::io_with_context(source, "failed to flush output"))?;
            if outcome.control == LoopControl::Break {
                break;
            }
        }
        debug!("event loop stopped");
        Ok(())
    }

    pub(crate) fn handle_trigger(&mut self, trigger: Trigger) -> TriggerOutcome {
        match trigger {
            Trigger::Line(line) => self.handle_line(&line),
            Trigger::InputError(message) => {
                warn!(error = %message, "stdin read failed");
                TriggerOutcome::proceed(vec![format!("input error: {message}")])
            }
            Trigger::InputClosed => TriggerOutcome::stop(Vec::new()),
            Trigger::AutoplayTick => {
                self.next_bookmark();
                TriggerOutcome::proceed(Vec::new())
            }
        }
    }

    fn handle_line(&mut self, line: &str) -> TriggerOutcome {
        let line = line.trim();
        if line.is_empty() {
            return TriggerOutcome::proceed(Vec::new());
        }
        if line == HELP_COMMAND {
            return TriggerOutcome::proceed(usage_lines());
        }

        let result = parse_command_text(line).and_then(|cmd| dispatch(self, cmd));
        match result {
            Ok(result) if result.outcome == CommandOutcome::QuitRequested => {
                TriggerOutcome::stop(vec![result.message])
            }
            Ok(result) => TriggerOutcome::proceed(vec![result.message]),
            Err(err) => {
                warn!(command = line, error = %err, "command failed");
                TriggerOutcome::proceed(vec![format!("error: {err}")])
            }
        }
    }
}
