//! Timer controller: the state machine and its tick source

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Notice, TimerPhase, TimerSnapshot};
use crate::tasks::{self, TickerHandle};

/// Largest accepted duration: what a six-digit seconds field can hold
/// while still formatting sensibly on screen.
pub const MAX_DURATION_SECS: u64 = 359_999;

/// Digits accepted into the input field before further keys are dropped
pub const INPUT_MAX_DIGITS: usize = 6;

/// Outcome of a tick, telling the ticker task whether to keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    Running,
    Finished,
}

/// Owns the timer state and the one live tick source.
///
/// All mutation goes through the transition table: `start`, `on_tick`
/// and `clear` are the only operations that change phase. Each change
/// publishes a fresh [`TimerSnapshot`] through the watch channel.
#[derive(Debug)]
pub struct TimerController {
    snapshot: Mutex<TimerSnapshot>,
    /// Live tick source, present exactly while the phase is `Running`
    ticker: Mutex<Option<TickerHandle>>,
    /// Channel for snapshot updates
    update_tx: watch::Sender<TimerSnapshot>,
    /// Keep one receiver alive to prevent channel closure
    _update_rx: watch::Receiver<TimerSnapshot>,
}

impl TimerController {
    /// Create a new controller in the idle phase with an empty input field
    pub fn new() -> Self {
        let (update_tx, update_rx) = watch::channel(TimerSnapshot::new());

        Self {
            snapshot: Mutex::new(TimerSnapshot::new()),
            ticker: Mutex::new(None),
            update_tx,
            _update_rx: update_rx,
        }
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.update_tx.subscribe()
    }

    /// Get the current state by value
    pub fn snapshot(&self) -> TimerSnapshot {
        self.lock_snapshot().clone()
    }

    /// Replace the input field contents wholesale.
    ///
    /// Used for the `--seconds` pre-fill; accepts arbitrary text since
    /// it stands in for the raw field contents. Ignored outside `Idle`.
    pub fn set_input(&self, text: impl Into<String>) {
        self.update(|snap| {
            if !snap.phase.input_editable() {
                return;
            }
            snap.input = text.into();
            snap.notice = None;
        });
    }

    /// Append one digit to the input field.
    ///
    /// Non-digit characters are dropped, as is anything past the field
    /// width. Ignored outside `Idle`.
    pub fn push_digit(&self, c: char) {
        self.update(|snap| {
            if !snap.phase.input_editable() || !c.is_ascii_digit() {
                return;
            }
            if snap.input.len() >= INPUT_MAX_DIGITS {
                return;
            }
            snap.input.push(c);
            snap.notice = None;
        });
    }

    /// Delete the last digit of the input field. Ignored outside `Idle`.
    pub fn pop_digit(&self) {
        self.update(|snap| {
            if !snap.phase.input_editable() {
                return;
            }
            snap.input.pop();
            snap.notice = None;
        });
    }

    /// Start a countdown from the current input field contents.
    ///
    /// Invalid input (empty, non-numeric, over the maximum) never starts
    /// a timer: the phase stays `Idle` and a notice is published instead.
    /// A zero duration finishes instantly without creating a tick source.
    pub fn start(self: &Arc<Self>) {
        let started = self.update(|snap| {
            if snap.phase != TimerPhase::Idle {
                return false;
            }

            let total = match validate_input(&snap.input) {
                Ok(total) => total,
                Err(notice) => {
                    debug!("Start rejected: {:?} (input {:?})", notice, snap.input);
                    snap.notice = Some(notice);
                    return false;
                }
            };

            snap.notice = None;
            snap.started_at = Some(chrono::Utc::now());

            if total == 0 {
                // Zero-length run: nothing to count, finish on the spot
                info!("Starting zero-second countdown, finishing instantly");
                snap.phase = TimerPhase::Finished;
                return false;
            }

            info!("Starting countdown for {} seconds", total);
            snap.phase = TimerPhase::Running;
            snap.total_seconds = total;
            snap.elapsed_seconds = 0;
            true
        });

        if started {
            let handle = tasks::spawn_ticker(Arc::clone(self));
            let mut ticker = self.lock_ticker();
            if let Some(old) = ticker.replace(handle) {
                // Unreachable through the transition table, but never
                // leave a second tick source running
                warn!("Replacing a live tick source, cancelling the old one");
                old.cancel();
            }
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Called only by the ticker task. A tick arriving outside `Running`
    /// (a straggler after cancellation) is ignored.
    pub(crate) fn on_tick(&self) -> TickOutcome {
        let outcome = self.update(|snap| {
            if snap.phase != TimerPhase::Running {
                debug!("Ignoring tick outside the running phase");
                return TickOutcome::Finished;
            }

            if snap.elapsed_seconds + 1 < snap.total_seconds {
                snap.elapsed_seconds += 1;
                debug!(
                    "Tick: {}/{} seconds elapsed",
                    snap.elapsed_seconds, snap.total_seconds
                );
                TickOutcome::Running
            } else {
                info!("Countdown of {} seconds finished", snap.total_seconds);
                snap.phase = TimerPhase::Finished;
                snap.elapsed_seconds = 0;
                TickOutcome::Finished
            }
        });

        if outcome == TickOutcome::Finished {
            // The run is over; drop the handle so the source is destroyed
            self.lock_ticker().take();
        }

        outcome
    }

    /// Return to `Idle` with an empty input field.
    ///
    /// Valid only from `Finished`; a no-op from any other phase, so
    /// calling it twice is harmless.
    pub fn clear(&self) {
        self.update(|snap| {
            if snap.phase != TimerPhase::Finished {
                return;
            }
            info!("Clearing finished timer");
            *snap = TimerSnapshot::new();
        });
    }

    /// Cancel any live tick source.
    ///
    /// The UI teardown path: a discarded screen must not keep receiving
    /// callbacks. State is left as-is since the process is going away.
    pub fn shutdown(&self) {
        if let Some(handle) = self.lock_ticker().take() {
            info!("Cancelling live tick source on shutdown");
            handle.cancel();
        }
    }

    /// Apply a mutation under the lock and publish the resulting snapshot
    fn update<F, R>(&self, updater: F) -> R
    where
        F: FnOnce(&mut TimerSnapshot) -> R,
    {
        let mut snap = self.lock_snapshot();
        let result = updater(&mut snap);
        let new_snapshot = snap.clone();
        drop(snap); // Release the lock before notifying

        if let Err(e) = self.update_tx.send(new_snapshot) {
            warn!("Failed to send snapshot update: {}", e);
        }

        result
    }

    fn lock_snapshot(&self) -> std::sync::MutexGuard<'_, TimerSnapshot> {
        // A poisoned lock only means a panic elsewhere; the snapshot
        // itself is always left consistent by `update`
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_ticker(&self) -> std::sync::MutexGuard<'_, Option<TickerHandle>> {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TimerController {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the input field into a committed duration
fn validate_input(input: &str) -> Result<u64, Notice> {
    if input.is_empty() {
        return Err(Notice::EmptyInput);
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(Notice::NotANumber);
    }
    match input.parse::<u64>() {
        Ok(n) if n <= MAX_DURATION_SECS => Ok(n),
        // Overflow of u64 itself also lands here
        _ => Err(Notice::TooLarge),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_with_input(input: &str) -> Arc<TimerController> {
        let controller = Arc::new(TimerController::new());
        controller.set_input(input);
        controller
    }

    #[tokio::test]
    async fn start_with_valid_input_begins_running() {
        let controller = controller_with_input("42");
        controller.start();

        let snap = controller.snapshot();
        assert_eq!(snap.phase, TimerPhase::Running);
        assert_eq!(snap.total_seconds, 42);
        assert_eq!(snap.elapsed_seconds, 0);
        assert!(snap.started_at.is_some());

        controller.shutdown();
    }

    #[tokio::test]
    async fn start_with_empty_input_stays_idle() {
        let controller = controller_with_input("");
        controller.start();

        let snap = controller.snapshot();
        assert_eq!(snap.phase, TimerPhase::Idle);
        assert_eq!(snap.notice, Some(Notice::EmptyInput));
    }

    #[tokio::test]
    async fn start_with_non_numeric_input_stays_idle() {
        let controller = controller_with_input("abc");
        controller.start();

        let snap = controller.snapshot();
        assert_eq!(snap.phase, TimerPhase::Idle);
        assert_eq!(snap.notice, Some(Notice::NotANumber));
        // The rejected text is left in place for the user to fix
        assert_eq!(snap.input, "abc");
    }

    #[tokio::test]
    async fn start_above_the_bound_stays_idle() {
        let controller = controller_with_input("360000");
        controller.start();
        assert_eq!(controller.snapshot().phase, TimerPhase::Idle);
        assert_eq!(controller.snapshot().notice, Some(Notice::TooLarge));

        let controller = controller_with_input("99999999999999999999");
        controller.start();
        assert_eq!(controller.snapshot().notice, Some(Notice::TooLarge));
    }

    #[tokio::test]
    async fn start_with_zero_finishes_instantly() {
        let controller = controller_with_input("0");
        controller.start();

        let snap = controller.snapshot();
        assert_eq!(snap.phase, TimerPhase::Finished);
        // No tick source was created for the empty run
        assert!(controller.lock_ticker().is_none());
    }

    #[tokio::test]
    async fn three_second_run_ticks_one_two_then_finishes() {
        let controller = controller_with_input("3");
        controller.start();
        controller.shutdown(); // drive ticks by hand below

        assert_eq!(controller.on_tick(), TickOutcome::Running);
        assert_eq!(controller.snapshot().elapsed_seconds, 1);

        assert_eq!(controller.on_tick(), TickOutcome::Running);
        assert_eq!(controller.snapshot().elapsed_seconds, 2);

        assert_eq!(controller.on_tick(), TickOutcome::Finished);
        let snap = controller.snapshot();
        assert_eq!(snap.phase, TimerPhase::Finished);
        // No elapsed == total state is ever observable
        assert_eq!(snap.elapsed_seconds, 0);
    }

    #[tokio::test]
    async fn one_second_run_finishes_on_the_first_tick() {
        let controller = controller_with_input("1");
        controller.start();
        controller.shutdown(); // drive ticks by hand below

        assert_eq!(controller.on_tick(), TickOutcome::Finished);
        assert_eq!(controller.snapshot().phase, TimerPhase::Finished);
    }

    #[tokio::test]
    async fn clear_returns_to_idle_with_empty_input() {
        let controller = controller_with_input("2");
        controller.start();
        controller.shutdown(); // drive ticks by hand below
        controller.on_tick();
        controller.on_tick();
        assert_eq!(controller.snapshot().phase, TimerPhase::Finished);

        controller.clear();
        let snap = controller.snapshot();
        assert_eq!(snap.phase, TimerPhase::Idle);
        assert!(snap.input.is_empty());
        assert_eq!(snap.total_seconds, 0);
        assert!(snap.started_at.is_none());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let controller = controller_with_input("0");
        controller.start();
        controller.clear();
        controller.clear(); // Second call is a no-op from Idle

        let snap = controller.snapshot();
        assert_eq!(snap.phase, TimerPhase::Idle);
        assert!(snap.input.is_empty());
    }

    #[tokio::test]
    async fn clear_outside_finished_is_a_no_op() {
        let controller = controller_with_input("5");
        controller.clear();
        assert_eq!(controller.snapshot().input, "5");

        controller.start();
        controller.clear();
        assert_eq!(controller.snapshot().phase, TimerPhase::Running);

        controller.shutdown();
    }

    #[tokio::test]
    async fn straggler_ticks_outside_running_are_ignored() {
        let controller = controller_with_input("");
        assert_eq!(controller.on_tick(), TickOutcome::Finished);
        assert_eq!(controller.snapshot().phase, TimerPhase::Idle);

        let controller = controller_with_input("0");
        controller.start();
        controller.on_tick();
        assert_eq!(controller.snapshot().phase, TimerPhase::Finished);
        assert_eq!(controller.snapshot().elapsed_seconds, 0);
    }

    #[tokio::test]
    async fn start_while_running_is_a_no_op() {
        let controller = controller_with_input("10");
        controller.start();
        let before = controller.snapshot();

        controller.start();
        let after = controller.snapshot();
        assert_eq!(after.phase, TimerPhase::Running);
        assert_eq!(after.total_seconds, before.total_seconds);
        assert_eq!(after.started_at, before.started_at);

        controller.shutdown();
    }

    #[tokio::test]
    async fn input_editing_builds_and_trims_digits() {
        let controller = Arc::new(TimerController::new());
        controller.push_digit('1');
        controller.push_digit('2');
        controller.push_digit('x'); // dropped
        controller.push_digit('3');
        assert_eq!(controller.snapshot().input, "123");

        controller.pop_digit();
        assert_eq!(controller.snapshot().input, "12");
    }

    #[tokio::test]
    async fn input_is_capped_at_the_field_width() {
        let controller = Arc::new(TimerController::new());
        for _ in 0..10 {
            controller.push_digit('9');
        }
        assert_eq!(controller.snapshot().input.len(), INPUT_MAX_DIGITS);
    }

    #[tokio::test]
    async fn input_is_frozen_while_running() {
        let controller = controller_with_input("5");
        controller.start();

        controller.push_digit('7');
        controller.pop_digit();
        controller.set_input("99");
        assert_eq!(controller.snapshot().input, "5");

        controller.shutdown();
    }

    #[tokio::test]
    async fn editing_clears_the_notice() {
        let controller = controller_with_input("");
        controller.start();
        assert!(controller.snapshot().notice.is_some());

        controller.push_digit('4');
        assert!(controller.snapshot().notice.is_none());
    }

    #[tokio::test]
    async fn subscribers_observe_phase_changes() {
        let controller = controller_with_input("0");
        let mut rx = controller.subscribe();

        controller.start();
        rx.changed().await.expect("update not delivered");
        assert_eq!(rx.borrow().phase, TimerPhase::Finished);
    }

    #[test]
    fn validate_input_covers_the_edge_cases() {
        assert_eq!(validate_input(""), Err(Notice::EmptyInput));
        assert_eq!(validate_input("abc"), Err(Notice::NotANumber));
        assert_eq!(validate_input("-3"), Err(Notice::NotANumber));
        assert_eq!(validate_input("1.5"), Err(Notice::NotANumber));
        assert_eq!(validate_input("0"), Ok(0));
        assert_eq!(validate_input("359999"), Ok(MAX_DURATION_SECS));
        assert_eq!(validate_input("360000"), Err(Notice::TooLarge));
    }
}
