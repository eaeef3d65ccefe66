use std::ops::ControlFlow;
use std::thread;
use std::time::{Duration, Instant};

use super::live_session::{LiveSession, TickOutcome};

/// Drives a [`LiveSession`] at a fixed tick period on the calling thread.
///
/// Hosts without their own timer (the CLI) use this; the desktop app ticks
/// from its event loop instead.
pub struct FramePump {
    interval: Duration,
}

impl FramePump {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Ticks `session` until `on_tick` breaks and returns the number of
    /// ticks run.
    ///
    /// Each tick starts one interval after the previous one started. A tick
    /// that overruns is followed immediately by the next one.
    pub fn run<F>(&self, session: &mut LiveSession, mut on_tick: F) -> usize
    where
        F: FnMut(&mut LiveSession, TickOutcome) -> ControlFlow<()>,
    {
        let mut ticks = 0;
        loop {
            let started = Instant::now();
            let outcome = session.tick();
            ticks += 1;
            if on_tick(session, outcome).is_break() {
                return ticks;
            }

            let elapsed = started.elapsed();
            match self.interval.checked_sub(elapsed) {
                Some(remaining) => thread::sleep(remaining),
                None => log::debug!(
                    "Tick {ticks} overran its {:?} budget by {:?}",
                    self.interval,
                    elapsed - self.interval
                ),
            }
        }
    }
}
