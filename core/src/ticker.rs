//! The 1-second tick source that drives time decay.
//!
//! A pure interval signal: it knows nothing about the session. The engine
//! arms it on entering `Running` and disarms it everywhere else.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::engine::EngineEvent;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Interval signal source the engine arms and disarms.
pub trait TickSource {
    /// Begin emitting one tick per second. Arming while already armed is
    /// a guarded no-op: at most one ticker runs at a time.
    fn arm(&mut self);

    /// Stop emitting ticks. Safe to call when not armed.
    fn disarm(&mut self);
}

/// Tokio-backed ticker feeding [`EngineEvent::Tick`] into the engine channel.
pub struct IntervalTicker {
    events: UnboundedSender<EngineEvent>,
    task: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    pub fn new(events: UnboundedSender<EngineEvent>) -> Self {
        Self { events, task: None }
    }
}

impl TickSource for IntervalTicker {
    fn arm(&mut self) {
        if self.task.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }
        let events = self.events.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            // A late tick still decrements exactly once; lost time is
            // never replayed as a burst.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if events.send(EngineEvent::Tick).is_err() {
                    break;
                }
            }
        }));
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn emits_one_tick_per_second_until_disarmed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::new(tx);

        ticker.arm();
        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(EngineEvent::Tick));
        }

        ticker.disarm();
        tokio::time::sleep(Duration::from_secs(3)).await;
        let mut late = 0;
        while rx.try_recv().is_ok() {
            late += 1;
        }
        assert!(late <= 1, "disarm must stop the tick stream");
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_does_not_duplicate_tickers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::new(tx);

        ticker.arm();
        ticker.arm();

        tokio::time::sleep(Duration::from_millis(2100)).await;
        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
        ticker.disarm();
    }

    #[tokio::test]
    async fn disarm_without_arm_is_a_noop() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::new(tx);
        ticker.disarm();
        ticker.disarm();
    }
}
