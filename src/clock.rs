use std::time::Duration;

use log::warn;

use crate::config::Settings;

/// Holding the acceleration key divides the step interval by this.
pub const ACCELERATION_FACTOR: u32 = 2;

/// Real time per countdown unit, independent of how fast the snake moves.
pub const COUNTDOWN_UNIT: Duration = Duration::from_secs(1);

/// What a call to [`SimClock::advance`] found to be due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Called again before the frame-rate cap allowed; nothing accumulated.
    Skipped,
    Due { steps: u32, seconds: u32 },
}

impl Frame {
    pub fn steps(&self) -> u32 {
        match self {
            Frame::Skipped => 0,
            Frame::Due { steps, .. } => *steps,
        }
    }

    pub fn seconds(&self) -> u32 {
        match self {
            Frame::Skipped => 0,
            Frame::Due { seconds, .. } => *seconds,
        }
    }
}

/// Turns a stream of monotonic timestamps into logical steps and countdown
/// seconds. Steps follow the (possibly accelerated) update interval; the
/// countdown follows wall time only.
///
/// Missed steps are caught up with a loop, at most `max_steps_per_frame` per
/// call. Anything beyond that is dropped rather than replayed in a burst.
#[derive(Debug, Clone)]
pub struct SimClock {
    base_interval: Duration,
    frame_budget: Duration,
    max_steps_per_frame: u32,
    last_frame: Duration,
    delta: Duration,
    timer_delta: Duration,
}

impl SimClock {
    pub fn new(base_interval: Duration, max_fps: u32, max_steps_per_frame: u32) -> Self {
        SimClock {
            base_interval,
            frame_budget: Duration::from_secs(1) / max_fps.max(1),
            max_steps_per_frame: max_steps_per_frame.max(1),
            last_frame: Duration::ZERO,
            delta: Duration::ZERO,
            timer_delta: Duration::ZERO,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        SimClock::new(settings.update_interval, settings.max_fps, settings.max_steps_per_frame)
    }

    /// Forgets accumulated time and starts measuring from `now`.
    pub fn restart(&mut self, now: Duration) {
        self.last_frame = now;
        self.delta = Duration::ZERO;
        self.timer_delta = Duration::ZERO;
    }

    pub fn interval(&self, accelerating: bool) -> Duration {
        if accelerating {
            self.base_interval / ACCELERATION_FACTOR
        } else {
            self.base_interval
        }
    }

    /// Time accumulated towards the next step.
    pub fn pending_step_time(&self) -> Duration {
        self.delta
    }

    /// Time accumulated towards the next countdown second.
    pub fn pending_timer_time(&self) -> Duration {
        self.timer_delta
    }

    pub fn advance(&mut self, now: Duration, accelerating: bool) -> Frame {
        if now < self.last_frame + self.frame_budget {
            return Frame::Skipped;
        }

        let elapsed = now - self.last_frame;
        self.last_frame = now;
        self.delta += elapsed;
        self.timer_delta += elapsed;

        let interval = self.interval(accelerating);
        let mut steps = 0;
        while self.delta >= interval && steps < self.max_steps_per_frame {
            self.delta -= interval;
            steps += 1;
        }

        if self.delta >= interval {
            warn!(
                "dropping {}ms of step backlog after {} catch-up steps",
                self.delta.as_millis(),
                steps
            );
            self.delta = Duration::ZERO;
        }

        let mut seconds = 0;
        while self.timer_delta >= COUNTDOWN_UNIT {
            self.timer_delta -= COUNTDOWN_UNIT;
            seconds += 1;
        }

        Frame::Due { steps, seconds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Feeds frames every `frame` ms from 0 up to and including `until` ms.
    fn run(clock: &mut SimClock, frame: u64, until: u64, accelerating: bool) -> (u32, u32) {
        let (mut steps, mut seconds) = (0, 0);
        let mut t = frame;
        while t <= until {
            let f = clock.advance(ms(t), accelerating);
            steps += f.steps();
            seconds += f.seconds();
            t += frame;
        }
        (steps, seconds)
    }

    #[test]
    fn frame_cap_skips_early_calls() {
        let mut clock = SimClock::new(ms(200), 60, 5);
        clock.restart(ms(1000));

        assert_eq!(clock.advance(ms(1010), false), Frame::Skipped);
        assert_eq!(clock.pending_step_time(), Duration::ZERO);
        assert_eq!(clock.advance(ms(1017), false), Frame::Due { steps: 0, seconds: 0 });
        assert_eq!(clock.pending_step_time(), ms(17));
    }

    #[test]
    fn frame_budget_follows_fps() {
        let mut clock = SimClock::new(ms(200), 10, 5);
        clock.restart(Duration::ZERO);

        assert_eq!(clock.advance(ms(99), false), Frame::Skipped);
        assert_eq!(clock.advance(ms(100), false), Frame::Due { steps: 0, seconds: 0 });
    }

    #[test]
    fn acceleration_halves_interval() {
        let clock = SimClock::new(ms(200), 60, 5);
        assert_eq!(clock.interval(false), ms(200));
        assert_eq!(clock.interval(true), ms(100));
    }

    #[test]
    fn countdown_ignores_acceleration() {
        let mut clock = SimClock::new(ms(200), 60, 5);
        clock.restart(Duration::ZERO);

        let (steps, seconds) = run(&mut clock, 20, 2500, true);
        assert_eq!(steps, 25);
        assert_eq!(seconds, 2);
        assert_eq!(clock.pending_timer_time(), ms(500));
    }

    #[test]
    fn normal_speed_steps() {
        let mut clock = SimClock::new(ms(200), 60, 5);
        clock.restart(Duration::ZERO);

        let (steps, seconds) = run(&mut clock, 20, 2500, false);
        assert_eq!(steps, 12);
        assert_eq!(seconds, 2);
        assert_eq!(clock.pending_step_time(), ms(100));
    }

    #[test]
    fn stall_catches_up_within_limit() {
        let mut clock = SimClock::new(ms(200), 60, 5);
        clock.restart(Duration::ZERO);

        assert_eq!(clock.advance(ms(650), false), Frame::Due { steps: 3, seconds: 0 });
        assert_eq!(clock.pending_step_time(), ms(50));
    }

    #[test]
    fn long_stall_drops_backlog_but_keeps_time() {
        let mut clock = SimClock::new(ms(200), 60, 5);
        clock.restart(Duration::ZERO);

        assert_eq!(clock.advance(ms(3100), false), Frame::Due { steps: 5, seconds: 3 });
        assert_eq!(clock.pending_step_time(), Duration::ZERO);
        assert_eq!(clock.pending_timer_time(), ms(100));
    }
}
