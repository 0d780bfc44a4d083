//! Animation timing: where the frame loop suspends until the next display refresh.

use std::time::{Duration, Instant};

/// Source of animation ticks.
///
/// `next_frame` is the loop's only suspension point: it returns once the next refresh tick has
/// arrived, with the tick's timestamp measured from an arbitrary fixed origin.
pub trait FrameClock {
    /// Current timestamp, without waiting.
    fn now(&mut self) -> Duration;
    /// Wait for the next refresh tick and return its timestamp.
    fn next_frame(&mut self) -> Duration;
}

/// Deterministic clock advancing by a fixed interval per tick, never sleeping.
///
/// The first tick lands on the origin, so a loop started with [`FrameClock::now`] sees `t = 0`
/// on its first frame.
#[derive(Clone, Copy, Debug)]
pub struct VirtualClock {
    interval: Duration,
    ticks: u64,
}

impl VirtualClock {
    /// Clock ticking every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self { interval, ticks: 0 }
    }

    /// Clock ticking `hz` times per second.
    pub fn with_rate(hz: u32) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1))
    }

    /// Ticks delivered so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn at(&self, tick: u64) -> Duration {
        // `Duration * u32` would overflow quietly for long runs; go through nanos.
        Duration::from_nanos((self.interval.as_nanos() as u64).saturating_mul(tick))
    }
}

impl FrameClock for VirtualClock {
    fn now(&mut self) -> Duration {
        self.at(self.ticks)
    }

    fn next_frame(&mut self) -> Duration {
        let t = self.at(self.ticks);
        self.ticks += 1;
        t
    }
}

/// Wall-clock pacing at a fixed refresh rate, sleeping between ticks.
#[derive(Debug)]
pub struct RealtimeClock {
    origin: Instant,
    interval: Duration,
    next_deadline: Duration,
}

impl RealtimeClock {
    /// Refresh rate of a typical display.
    pub const DEFAULT_REFRESH_HZ: u32 = 60;

    /// Clock ticking at `refresh_hz`.
    pub fn new(refresh_hz: u32) -> Self {
        Self {
            origin: Instant::now(),
            interval: Duration::from_secs(1) / refresh_hz.max(1),
            next_deadline: Duration::ZERO,
        }
    }
}

impl FrameClock for RealtimeClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }

    fn next_frame(&mut self) -> Duration {
        let now = self.origin.elapsed();
        if now < self.next_deadline {
            std::thread::sleep(self.next_deadline - now);
        }
        let tick = self.origin.elapsed();
        // Late ticks skip ahead instead of bursting to catch up.
        while self.next_deadline <= tick {
            self.next_deadline += self.interval;
        }
        tick
    }
}

/// Pending-callback bookkeeping of the frame loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameLoop {
    pending: bool,
    cancelled: bool,
    ticks: u64,
}

impl FrameLoop {
    /// Idle loop with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for another tick. Ignored after [`Self::cancel`].
    pub fn request_frame(&mut self) {
        if !self.cancelled {
            self.pending = true;
        }
    }

    /// Take the pending request, if any. Returns `false` once nothing is scheduled.
    pub fn take_pending(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.ticks += 1;
        true
    }

    /// Drop any pending request and refuse new ones.
    pub fn cancel(&mut self) {
        self.pending = false;
        self.cancelled = true;
    }

    /// `true` when a tick is scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// `true` after [`Self::cancel`].
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Ticks consumed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
