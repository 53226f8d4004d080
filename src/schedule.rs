//! Single-threaded timer queue and the loop that drives a [`Demo`] with it.
//!
//! The [`Scheduler`] keeps virtual time: nothing sleeps inside it. Timers fire
//! in due order, ties in the order they were scheduled. [`drive`] turns
//! virtual gaps into calls to a caller-supplied sleep function, so the CLI can
//! pass `std::thread::sleep` and tests can pass a recorder.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use tracing::trace;

use crate::classify::Trainer;
use crate::demo::{Algorithm, Demo, RunToken, Tick};
use crate::error::Result;
use crate::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Timer {
    due: Duration,
    seq: u64,
    token: RunToken,
}

/// Pending run timers over a virtual clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    seq: u64,
    queue: BinaryHeap<Reverse<Timer>>,
}

impl Scheduler {
    /// Empty scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Fire `token` after `delay` from now.
    pub fn schedule(&mut self, token: RunToken, delay: Duration) {
        let timer = Timer {
            due: self.now + delay,
            seq: self.seq,
            token,
        };
        self.seq += 1;
        trace!(due = ?timer.due, generation = token.generation(), "scheduled");
        self.queue.push(Reverse(timer));
    }

    /// Drop every pending timer for `token`. Returns how many were removed.
    pub fn cancel(&mut self, token: RunToken) -> usize {
        let before = self.queue.len();
        self.queue.retain(|Reverse(t)| t.token != token);
        before - self.queue.len()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Due time of the earliest timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(t)| t.due)
    }

    /// Advance the clock to the earliest timer and return its token.
    pub fn pop_due(&mut self) -> Option<RunToken> {
        let Reverse(timer) = self.queue.pop()?;
        self.now = self.now.max(timer.due);
        Some(timer.token)
    }

    /// Advance the clock by `by`, returning the tokens that came due, in firing order.
    pub fn advance(&mut self, by: Duration) -> Vec<RunToken> {
        let until = self.now + by;
        let mut fired = Vec::new();
        while let Some(due) = self.next_due() {
            if due > until {
                break;
            }
            if let Some(token) = self.pop_due() {
                fired.push(token);
            }
        }
        self.now = until;
        fired
    }
}

/// Start `algorithm` on `demo`, cancelling whatever was pending, and schedule
/// its first round immediately if it has rounds to run.
pub fn start_run<R, T>(
    demo: &mut Demo<R, T>,
    scheduler: &mut Scheduler,
    algorithm: Algorithm,
) -> Result<RunToken>
where
    R: Renderer,
    T: Trainer,
{
    scheduler.clear();
    let token = demo.start(algorithm)?;
    if demo.is_running() {
        scheduler.schedule(token, Duration::ZERO);
    }
    Ok(token)
}

/// Deliver a fired token to `demo`, rescheduling it when the run continues.
pub fn dispatch<R, T>(demo: &mut Demo<R, T>, scheduler: &mut Scheduler, token: RunToken) -> Tick
where
    R: Renderer,
    T: Trainer,
{
    let tick = demo.tick(token);
    if let Tick::Again(delay) = tick {
        scheduler.schedule(token, delay);
    }
    tick
}

/// Run timers until none are left, calling `sleep` for every gap in virtual time.
///
/// Returns the number of ticks delivered.
pub fn drive<R, T, S>(demo: &mut Demo<R, T>, scheduler: &mut Scheduler, mut sleep: S) -> usize
where
    R: Renderer,
    T: Trainer,
    S: FnMut(Duration),
{
    let mut ticks = 0;
    while let Some(due) = scheduler.next_due() {
        let gap = due.saturating_sub(scheduler.now());
        if !gap.is_zero() {
            sleep(gap);
        }
        let Some(token) = scheduler.pop_due() else {
            break;
        };
        dispatch(demo, scheduler, token);
        ticks += 1;
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::NearestMeanTrainer;
    use crate::demo::{DemoConfig, DEFAULT_DELAY, STATUS_KMEANS_DONE};
    use crate::render::{FnRenderer, Scatter};

    fn demo() -> Demo<FnRenderer<impl FnMut(&Scatter)>, NearestMeanTrainer> {
        Demo::new(
            FnRenderer::new(|_: &Scatter| {}),
            NearestMeanTrainer,
            DemoConfig::new().with_seed(9),
        )
    }

    #[test]
    fn test_timers_fire_in_due_then_fifo_order() {
        let mut d = demo();
        let a = d.current_token();
        d.reset();
        let b = d.current_token();

        let mut s = Scheduler::new();
        s.schedule(b, Duration::from_millis(10));
        s.schedule(a, Duration::from_millis(5));
        s.schedule(b, Duration::from_millis(5));

        assert_eq!(s.pop_due(), Some(a));
        assert_eq!(s.pop_due(), Some(b));
        assert_eq!(s.now(), Duration::from_millis(5));
        assert_eq!(s.pop_due(), Some(b));
        assert_eq!(s.now(), Duration::from_millis(10));
        assert_eq!(s.pop_due(), None);
    }

    #[test]
    fn test_cancel_and_advance() {
        let mut d = demo();
        let a = d.current_token();
        d.reset();
        let b = d.current_token();

        let mut s = Scheduler::new();
        s.schedule(a, Duration::from_millis(1));
        s.schedule(a, Duration::from_millis(2));
        s.schedule(b, Duration::from_millis(3));
        assert_eq!(s.cancel(a), 2);
        assert_eq!(s.len(), 1);

        assert!(s.advance(Duration::from_millis(2)).is_empty());
        assert_eq!(s.advance(Duration::from_millis(1)), vec![b]);
        assert_eq!(s.now(), Duration::from_millis(3));
        assert!(s.is_empty());
    }

    #[test]
    fn test_drive_paces_rounds() {
        let mut d = demo();
        let mut s = Scheduler::new();
        start_run(&mut d, &mut s, Algorithm::KMeans).unwrap();

        let mut sleeps = Vec::new();
        let ticks = drive(&mut d, &mut s, |gap| sleeps.push(gap));

        assert_eq!(ticks, 10);
        // first round fires immediately, the other nine after the delay
        assert_eq!(sleeps, vec![DEFAULT_DELAY; 9]);
        assert_eq!(s.now(), DEFAULT_DELAY * 9);
        assert_eq!(d.status(), STATUS_KMEANS_DONE);
    }

    #[test]
    fn test_start_run_classification_schedules_nothing() {
        let mut d = demo();
        let mut s = Scheduler::new();
        start_run(&mut d, &mut s, Algorithm::Classification).unwrap();
        assert!(s.is_empty());
        assert_eq!(drive(&mut d, &mut s, |_| panic!("nothing to wait for")), 0);
    }
}
