use std::time::Duration;

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::clock::CityClock;

/// Ticking city-local clock label. Dropping the handle stops the ticker.
#[derive(Debug)]
pub struct LiveClock {
    clock: CityClock,
    receiver: watch::Receiver<String>,
    task: JoinHandle<()>,
}

impl LiveClock {
    /// Must be called inside a tokio runtime.
    pub fn start(clock: CityClock) -> Self {
        let (sender, receiver) = watch::channel(clock.now().clock_label());

        let task = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            // After a sleep/resume, jump to the present instead of bursting.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if sender.send(clock.now().clock_label()).is_err() {
                    break;
                }
            }
        });

        tracing::debug!(offset = clock.utc_offset_seconds(), "live clock started");
        Self { clock, receiver, task }
    }

    pub fn clock(&self) -> CityClock {
        self.clock
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.receiver.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for LiveClock {
    fn drop(&mut self) {
        self.task.abort();
    }
}
