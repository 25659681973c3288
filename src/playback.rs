use std::time::{Duration, Instant};

use crate::data::window::{WindowPosition, MAX_POSITION};

// ---------------------------------------------------------------------------
// PlaybackController – time-lapse state machine
// ---------------------------------------------------------------------------

/// Real-time period between playback steps.
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// The tick deadline lives inside `Running`, so a controller owns at most
/// one schedule at a time: `start` while running is a guarded no-op, and
/// `stop` discards the deadline before any new one can be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaybackState {
    Idle,
    Running {
        position: WindowPosition,
        next_tick: Instant,
    },
}

/// Advances a window's `end` offset by one unit per tick, animating the
/// visible date range. Driven from the frame loop via [`poll`].
///
/// [`poll`]: PlaybackController::poll
#[derive(Debug)]
pub struct PlaybackController {
    state: PlaybackState,
}

impl Default for PlaybackController {
    fn default() -> Self {
        PlaybackController {
            state: PlaybackState::Idle,
        }
    }
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PlaybackState::Running { .. })
    }

    /// Begin a run from `position`. No-op while already running; a second
    /// timer must never be scheduled for a controller.
    pub fn start(&mut self, position: WindowPosition, now: Instant) {
        if self.is_running() {
            return;
        }
        self.state = PlaybackState::Running {
            position,
            next_tick: now + TICK_PERIOD,
        };
    }

    /// Cancel the run. Idempotent; after this returns, [`poll`] fires
    /// nothing until the next `start`.
    ///
    /// [`poll`]: PlaybackController::poll
    pub fn stop(&mut self) {
        self.state = PlaybackState::Idle;
    }

    /// Fire every tick due at `now`, in order. Each tick advances the
    /// window's `end` by one unit and reports the new position through
    /// `on_tick`; the run stops once `end` cannot advance past the scale.
    pub fn poll(&mut self, now: Instant, mut on_tick: impl FnMut(WindowPosition)) {
        while let PlaybackState::Running {
            mut position,
            next_tick,
        } = self.state
        {
            if now < next_tick {
                break;
            }
            if position.end + 1 > MAX_POSITION {
                self.state = PlaybackState::Idle;
                break;
            }
            position.end += 1;
            self.state = PlaybackState::Running {
                position,
                next_tick: next_tick + TICK_PERIOD,
            };
            on_tick(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_times(start: Instant, n: u32) -> impl Iterator<Item = Instant> {
        (1..=n).map(move |i| start + TICK_PERIOD * i)
    }

    fn collect_ticks(
        controller: &mut PlaybackController,
        now: Instant,
        out: &mut Vec<WindowPosition>,
    ) {
        controller.poll(now, |pos| out.push(pos));
    }

    #[test]
    fn run_advances_end_to_the_scale_limit_then_stops() {
        let t0 = Instant::now();
        let mut controller = PlaybackController::new();
        controller.start(WindowPosition::new(0, 40), t0);

        let mut ticks = Vec::new();
        for t in tick_times(t0, 61) {
            collect_ticks(&mut controller, t, &mut ticks);
        }

        let ends: Vec<u32> = ticks.iter().map(|p| p.end).collect();
        let expected: Vec<u32> = (41..=100).collect();
        assert_eq!(ends, expected);
        assert!(!controller.is_running(), "run must stop at the limit");
        // Starts are untouched by playback.
        assert!(ticks.iter().all(|p| p.start == 0));
    }

    #[test]
    fn no_tick_fires_after_stop() {
        let t0 = Instant::now();
        let mut controller = PlaybackController::new();
        controller.start(WindowPosition::new(0, 40), t0);

        let mut ticks = Vec::new();
        for t in tick_times(t0, 10) {
            collect_ticks(&mut controller, t, &mut ticks);
        }
        assert_eq!(ticks.len(), 10);

        controller.stop();
        for t in tick_times(t0, 40).skip(10) {
            collect_ticks(&mut controller, t, &mut ticks);
        }
        assert_eq!(ticks.len(), 10, "ticks fired after stop");
        assert!(!controller.is_running());
    }

    #[test]
    fn start_while_running_is_a_guarded_no_op() {
        let t0 = Instant::now();
        let mut controller = PlaybackController::new();
        controller.start(WindowPosition::new(0, 10), t0);
        // A re-entrant start must not reset the run or double the timer.
        controller.start(WindowPosition::new(0, 90), t0);

        let mut ticks = Vec::new();
        collect_ticks(&mut controller, t0 + TICK_PERIOD, &mut ticks);
        assert_eq!(ticks, vec![WindowPosition::new(0, 11)]);
    }

    #[test]
    fn stop_then_start_begins_a_fresh_schedule() {
        let t0 = Instant::now();
        let mut controller = PlaybackController::new();
        controller.start(WindowPosition::new(0, 10), t0);
        controller.stop();

        let t1 = t0 + TICK_PERIOD * 5;
        controller.start(WindowPosition::new(20, 30), t1);

        // The old schedule is gone: nothing is due at t1 even though the
        // first run's deadlines have long passed.
        let mut ticks = Vec::new();
        collect_ticks(&mut controller, t1, &mut ticks);
        assert!(ticks.is_empty());

        collect_ticks(&mut controller, t1 + TICK_PERIOD, &mut ticks);
        assert_eq!(ticks, vec![WindowPosition::new(20, 31)]);
    }

    #[test]
    fn stop_when_idle_is_a_no_op() {
        let mut controller = PlaybackController::new();
        controller.stop();
        assert!(!controller.is_running());
    }

    #[test]
    fn starting_at_the_limit_stops_on_the_first_tick() {
        let t0 = Instant::now();
        let mut controller = PlaybackController::new();
        controller.start(WindowPosition::new(0, 100), t0);

        let mut ticks = Vec::new();
        collect_ticks(&mut controller, t0 + TICK_PERIOD, &mut ticks);
        assert!(ticks.is_empty());
        assert!(!controller.is_running());
    }

    #[test]
    fn a_late_poll_catches_up_in_order() {
        let t0 = Instant::now();
        let mut controller = PlaybackController::new();
        controller.start(WindowPosition::new(0, 95), t0);

        // One poll long after several deadlines: ticks still fire
        // sequentially with monotonically increasing ends.
        let mut ticks = Vec::new();
        collect_ticks(&mut controller, t0 + TICK_PERIOD * 3, &mut ticks);
        let ends: Vec<u32> = ticks.iter().map(|p| p.end).collect();
        assert_eq!(ends, vec![96, 97, 98]);
    }
}
