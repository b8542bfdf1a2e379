use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::event::Trigger;

pub(crate) struct EventBusRuntime {
    tasks: Vec<JoinHandle<()>>,
}

impl EventBusRuntime {
    /// Spawns the stdin reader and, when `autoplay` is set, the slideshow
    /// ticker. Both feed the returned receiver.
    pub(crate) fn spawn(autoplay: Option<Duration>) -> (UnboundedReceiver<Trigger>, Self) {
        let (tx, rx) = unbounded_channel();
        let mut tasks = vec![spawn_input_task(tx.clone())];
        if let Some(period) = autoplay {
            tasks.push(spawn_autoplay_task(tx, period));
        }
        (rx, Self { tasks })
    }

    pub(crate) fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for EventBusRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_input_task(tx: UnboundedSender<Trigger>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let trigger = match lines.next_line().await {
                Ok(Some(line)) => Trigger::Line(line),
                Ok(None) => {
                    let _ = tx.send(Trigger::InputClosed);
                    return;
                }
                Err(err) => Trigger::InputError(err.to_string()),
            };
            if tx.send(trigger).is_err() {
                return;
            }
        }
    })
}

fn spawn_autoplay_task(tx: UnboundedSender<Trigger>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        // First tick one period after start, not immediately.
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if tx.send(Trigger::AutoplayTick).is_err() {
                return;
            }
        }
    })
}
