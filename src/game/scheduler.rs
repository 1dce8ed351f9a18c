//! Cancellable tick timer driving the simulation
//!
//! The scheduler owns at most one live [`Interval`]. Arming it again replaces
//! (and drops) the previous timer in the same call, so a speed change can
//! never leave two tick streams running or let a stale-period tick through.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

#[derive(Debug, Default)]
pub struct TickScheduler {
    timer: Option<Interval>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `period`, first tick one period from now.
    /// Any previously armed timer is cancelled first.
    pub fn arm(&mut self, period: Duration) {
        self.cancel();

        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(timer);
    }

    /// Stop ticking; `tick` will then never resolve
    pub fn cancel(&mut self) {
        self.timer = None;
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.timer.as_ref().map(Interval::period)
    }

    /// Wait for the next tick. Pending forever while cancelled, which keeps
    /// it usable as a `select!` branch.
    pub async fn tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
