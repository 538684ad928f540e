//! Swing detector: the per-frame pipeline.
//!
//! One [`SwingDetector`] owns the frame history, the phase machine,
//! and the calibration bank. [`SwingDetector::process_frame`] is the
//! sole driver: every pushed frame is echoed back, advanced through
//! the phase machine, and — when a full cycle closes and survives the
//! plausibility filter — classified and emitted as a [`SwingEvent`].
//!
//! Single-owner, no interior locking; see `session` for feeding it
//! from another thread.

use tracing::{debug, info};

use crate::calibration::{CalibrationBank, KeyValueStore, SwingPattern};
use crate::classify::{classify, SwingType};
use crate::config::DetectorConfig;
use crate::error::Result;
use crate::history::FrameHistory;
use crate::metrics::{to_pixels, MotionSample};
use crate::phase::{PhaseMachine, SwingMetrics, SwingPhase};
use crate::pose::{Point, PoseFrame};

/// Everything the detector emits, in push order.
#[derive(Debug, Clone)]
pub enum DetectorEvent {
    /// Echo of every accepted frame, for live overlay rendering.
    Pose(PoseFrame),
    /// A completed, plausible, classified swing.
    Swing(SwingEvent),
}

/// One detected swing.
#[derive(Debug, Clone)]
pub struct SwingEvent {
    pub swing_type: SwingType,
    /// Seconds from backswing onset to follow-through settling.
    pub duration: f64,
    pub metrics: SwingMetrics,
}

pub struct SwingDetector {
    config: DetectorConfig,
    history: FrameHistory,
    machine: PhaseMachine,
    bank: CalibrationBank,
    last_sample: MotionSample,
    last_completed: Option<SwingMetrics>,
    last_timestamp: f64,
}

impl SwingDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let bank = CalibrationBank::with_capacity(config.bank_capacity);
        Self::with_bank(config, bank)
    }

    /// Construct around a pre-populated (e.g. restored) calibration bank.
    pub fn with_bank(config: DetectorConfig, bank: CalibrationBank) -> Self {
        Self {
            history: FrameHistory::new(&config),
            machine: PhaseMachine::new(),
            bank,
            last_sample: MotionSample::zero(),
            last_completed: None,
            last_timestamp: 0.0,
            config,
        }
    }

    /// Push one pose frame and collect the events it produced. Always
    /// emits the frame echo first; at most one swing event follows.
    pub fn process_frame(&mut self, frame: PoseFrame) -> Vec<DetectorEvent> {
        let mut events = vec![DetectorEvent::Pose(frame.clone())];
        let now = frame.timestamp;
        self.last_timestamp = now;

        let wrist = frame.wrist.as_ref().map(|w| (to_pixels(w.location, &self.config), w.confidence));
        self.history.push_frame(frame);
        if let Some((point, confidence)) = wrist {
            self.history.push_path_point(point, confidence);
        }

        let sample = MotionSample::compute(&self.history, &self.config);
        self.last_sample = sample;

        let confident_wrist = wrist
            .filter(|(_, confidence)| *confidence >= self.config.min_confidence)
            .map(|(point, _)| point);
        if self.machine.advance(&sample, confident_wrist, now, &self.config) {
            if let Some(swing) = self.finish_cycle(now) {
                events.push(DetectorEvent::Swing(swing));
            }
        }

        events
    }

    /// Close out a completed cycle: filter, classify, reset.
    fn finish_cycle(&mut self, now: f64) -> Option<SwingEvent> {
        let metrics = self.machine.take_completed();
        self.machine.reset();
        let metrics = metrics?;

        if !self.plausible(&metrics) {
            debug!(
                duration = metrics.duration,
                max_speed = metrics.max_speed,
                "completed cycle failed plausibility, discarding"
            );
            return None;
        }

        let swing_type = classify(&metrics, &self.bank, &self.config);
        info!(
            label = swing_type.as_str(),
            duration = metrics.duration,
            max_speed = metrics.max_speed,
            at = now,
            "swing detected"
        );
        self.last_completed = Some(metrics.clone());
        Some(SwingEvent { swing_type, duration: metrics.duration, metrics })
    }

    fn plausible(&self, metrics: &SwingMetrics) -> bool {
        metrics.duration >= self.config.min_swing_duration
            && metrics.duration <= self.config.max_swing_duration
            && metrics.max_speed >= self.config.min_forward_speed
    }

    /// Current phase of the cycle in progress.
    pub fn phase(&self) -> SwingPhase {
        self.machine.phase()
    }

    /// Human-readable phase label for status displays.
    pub fn status(&self) -> &'static str {
        self.machine.phase().as_str()
    }

    /// Metrics of the cycle in progress, or of the most recent detected
    /// swing while idle.
    pub fn swing_metrics(&self) -> SwingMetrics {
        if self.machine.phase() == SwingPhase::Idle {
            if let Some(last) = &self.last_completed {
                return last.clone();
            }
        }
        self.machine.snapshot(self.last_timestamp)
    }

    /// The most recently computed motion sample (speed, direction,
    /// elbow angle, shoulder rotation).
    pub fn motion(&self) -> MotionSample {
        self.last_sample
    }

    /// Wrist path currently buffered, reference pixels.
    pub fn path(&self) -> impl Iterator<Item = &Point> {
        self.history.path().iter()
    }

    /// Store the most recent detected swing as an exemplar under
    /// `label`, regardless of what it was classified as. Returns false
    /// when there is no swing to record or its path is too short.
    ///
    /// The bank is in-memory only; persist with
    /// [`record_exemplar_and_save`] or [`CalibrationBank::save`].
    ///
    /// [`record_exemplar_and_save`]: Self::record_exemplar_and_save
    pub fn record_exemplar(&mut self, label: SwingType) -> bool {
        let Some(metrics) = &self.last_completed else {
            debug!("no completed swing to record");
            return false;
        };
        let Some(pattern) = SwingPattern::from_metrics(metrics) else {
            return false;
        };
        self.bank.add(label, pattern);
        true
    }

    /// [`record_exemplar`] followed by a write of the whole bank to
    /// `store`, so persisted state never trails a recorded exemplar.
    /// Returns `Ok(false)` without touching the store when there was
    /// nothing to record.
    ///
    /// [`record_exemplar`]: Self::record_exemplar
    pub fn record_exemplar_and_save(
        &mut self,
        label: SwingType,
        store: &mut dyn KeyValueStore,
    ) -> Result<bool> {
        if !self.record_exemplar(label) {
            return Ok(false);
        }
        self.bank.save(store)?;
        Ok(true)
    }

    pub fn bank(&self) -> &CalibrationBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut CalibrationBank {
        &mut self.bank
    }

    /// Drop all buffered state and return to idle. Does not touch the
    /// calibration bank.
    pub fn reset(&mut self) {
        self.history.clear();
        self.machine.reset();
        self.last_sample = MotionSample::zero();
        self.last_completed = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
