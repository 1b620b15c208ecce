//! Tick timing utilities
//!
//! All periodic work advances once per simulation tick. The [`TickClock`]
//! records how many ticks have elapsed and for how long; a [`TickSource`]
//! hands out tick durations to loops that run on the calling thread.

use std::time::{Duration, Instant};

/// Simulation clock advanced once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickClock {
    tick: u64,
    elapsed: f64,
    delta_time: f32,
}

impl TickClock {
    /// Create a clock at tick zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick lasting `delta_time` seconds
    pub fn advance(&mut self, delta_time: f32) {
        self.tick += 1;
        self.delta_time = delta_time;
        self.elapsed += f64::from(delta_time);
    }

    /// Number of ticks since creation
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total elapsed simulated time in seconds
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Duration of the last tick in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }
}

/// Supplier of tick durations for loops that block the calling thread
///
/// `next_tick` suspends until the next tick and returns its duration in
/// seconds, or `None` once no further ticks will come.
pub trait TickSource {
    /// Wait for the next tick
    fn next_tick(&mut self) -> Option<f32>;
}

impl<I: Iterator<Item = f32>> TickSource for I {
    fn next_tick(&mut self) -> Option<f32> {
        self.next()
    }
}

/// Fixed-step tick source that never sleeps
///
/// Used when the host already owns the frame loop, and throughout the tests.
#[derive(Debug, Clone)]
pub struct FixedTicks {
    step: f32,
    remaining: Option<u64>,
}

impl FixedTicks {
    /// Unbounded ticks of `step` seconds
    pub fn new(step: f32) -> Self {
        Self { step, remaining: None }
    }

    /// At most `count` ticks of `step` seconds
    pub fn limited(step: f32, count: u64) -> Self {
        Self {
            step,
            remaining: Some(count),
        }
    }
}

impl Iterator for FixedTicks {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        match &mut self.remaining {
            Some(0) => None,
            Some(remaining) => {
                *remaining -= 1;
                Some(self.step)
            }
            None => Some(self.step),
        }
    }
}

/// Real-time tick source pacing the caller at a fixed rate
///
/// Sleeps until the next tick boundary and reports the measured duration.
#[derive(Debug)]
pub struct PacedTicks {
    interval: Duration,
    last_tick: Instant,
}

impl PacedTicks {
    /// Pace at `rate` ticks per second
    pub fn per_second(rate: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / rate.max(1),
            last_tick: Instant::now(),
        }
    }
}

impl TickSource for PacedTicks {
    fn next_tick(&mut self) -> Option<f32> {
        let target = self.last_tick + self.interval;
        let now = Instant::now();
        if target > now {
            std::thread::sleep(target - now);
        }

        let now = Instant::now();
        let delta_time = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        Some(delta_time)
    }
}
