//! Swing phase state machine.
//!
//! Classifies the ongoing motion into one of five phases and finalizes
//! a [`SwingMetrics`] when a full cycle is recognized:
//!
//! ```text
//! idle → backswing → forward → follow-through → completed
//! ```
//!
//! `Completed` is terminal per cycle: the owner must consume the
//! metrics and call [`PhaseMachine::reset`] before the next cycle can
//! begin. Implausible inputs (near-zero divisors, missing joints)
//! simply fail to satisfy transition conditions.

use tracing::debug;

use crate::config::DetectorConfig;
use crate::metrics::{Direction, MotionSample};
use crate::pose::Point;

/// Phase of the current swing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingPhase {
    Idle,
    Backswing,
    Forward,
    FollowThrough,
    Completed,
}

impl SwingPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Backswing => "backswing",
            Self::Forward => "forward",
            Self::FollowThrough => "follow-through",
            Self::Completed => "completed",
        }
    }
}

/// Aggregated metrics of one swing cycle. Read-only once finalized.
#[derive(Debug, Clone)]
pub struct SwingMetrics {
    /// Peak wrist speed over the cycle (px/s).
    pub max_speed: f64,
    /// Horizontal spread of the path at the end of the backswing (px).
    pub amplitude: f64,
    /// Seconds from backswing onset to follow-through settling.
    pub duration: f64,
    /// Wrist path over the cycle, reference pixels, oldest first.
    pub path: Vec<Point>,
}

pub struct PhaseMachine {
    phase: SwingPhase,
    start_time: f64,
    peak_speed: f64,
    amplitude: f64,
    path: Vec<Point>,
    completed: Option<SwingMetrics>,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            phase: SwingPhase::Idle,
            start_time: 0.0,
            peak_speed: 0.0,
            amplitude: 0.0,
            path: Vec::new(),
            completed: None,
        }
    }

    pub fn phase(&self) -> SwingPhase {
        self.phase
    }

    /// Advance one tick. `wrist` is the confident wrist position in
    /// reference pixels, when available. Returns `true` when this tick
    /// entered `Completed`.
    pub fn advance(
        &mut self,
        sample: &MotionSample,
        wrist: Option<Point>,
        now: f64,
        config: &DetectorConfig,
    ) -> bool {
        match self.phase {
            SwingPhase::Idle => {
                let onset = sample.speed > config.min_swing_speed
                    && matches!(sample.direction, Direction::Right | Direction::Up);
                if onset {
                    self.start_time = now;
                    self.peak_speed = sample.speed;
                    self.amplitude = 0.0;
                    self.path.clear();
                    self.push_point(wrist);
                    self.transition(SwingPhase::Backswing, sample);
                }
                false
            }
            SwingPhase::Backswing => {
                self.track(sample, wrist);
                if sample.direction == Direction::Left && sample.speed > config.min_forward_speed {
                    self.amplitude = horizontal_spread(&self.path);
                    self.transition(SwingPhase::Forward, sample);
                } else if now - self.start_time > config.backswing_timeout {
                    debug!(elapsed = now - self.start_time, "backswing timed out, discarding");
                    self.reset();
                }
                false
            }
            SwingPhase::Forward => {
                self.track(sample, wrist);
                if sample.speed < 0.5 * self.peak_speed {
                    self.transition(SwingPhase::FollowThrough, sample);
                }
                false
            }
            SwingPhase::FollowThrough => {
                self.track(sample, wrist);
                if sample.speed < config.max_idle_speed {
                    self.completed = Some(SwingMetrics {
                        max_speed: self.peak_speed,
                        amplitude: self.amplitude,
                        duration: now - self.start_time,
                        path: self.path.clone(),
                    });
                    self.transition(SwingPhase::Completed, sample);
                    return true;
                }
                false
            }
            // Terminal until the owner calls reset().
            SwingPhase::Completed => false,
        }
    }

    /// Take the finalized metrics. Consumed-once: a second call returns
    /// `None` until another cycle completes.
    pub fn take_completed(&mut self) -> Option<SwingMetrics> {
        self.completed.take()
    }

    /// Snapshot of the in-progress accumulators, for visualization.
    pub fn snapshot(&self, now: f64) -> SwingMetrics {
        SwingMetrics {
            max_speed: self.peak_speed,
            amplitude: self.amplitude,
            duration: if self.phase == SwingPhase::Idle { 0.0 } else { now - self.start_time },
            path: self.path.clone(),
        }
    }

    /// Force phase back to idle, discarding accumulators. The only
    /// cancellation primitive.
    pub fn reset(&mut self) {
        self.phase = SwingPhase::Idle;
        self.start_time = 0.0;
        self.peak_speed = 0.0;
        self.amplitude = 0.0;
        self.path.clear();
        self.completed = None;
    }

    fn track(&mut self, sample: &MotionSample, wrist: Option<Point>) {
        if sample.speed > self.peak_speed {
            self.peak_speed = sample.speed;
        }
        self.push_point(wrist);
    }

    fn push_point(&mut self, wrist: Option<Point>) {
        if let Some(p) = wrist {
            self.path.push(p);
        }
    }

    fn transition(&mut self, to: SwingPhase, sample: &MotionSample) {
        debug!(
            from = self.phase.as_str(),
            to = to.as_str(),
            speed = sample.speed,
            "phase transition"
        );
        self.phase = to;
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

fn horizontal_spread(path: &[Point]) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in path {
        min = min.min(p.x);
        max = max.max(p.x);
    }
    if min.is_finite() { max - min } else { 0.0 }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
