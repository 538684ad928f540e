//! Bounded frame and wrist-path history.
//!
//! Two fixed-capacity ring buffers: the most recent pose frames (~2 s
//! at 30 Hz) and the tracked wrist's recent path in reference pixels.
//! Appends never fail; overflow drops the oldest entry and
//! low-confidence path points are dropped silently.

use std::collections::VecDeque;

use crate::config::DetectorConfig;
use crate::pose::{Point, PoseFrame};

pub struct FrameHistory {
    frames: VecDeque<PoseFrame>,
    path: VecDeque<Point>,
    frame_capacity: usize,
    path_capacity: usize,
    min_confidence: f64,
}

impl FrameHistory {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            frames: VecDeque::with_capacity(config.frame_capacity),
            path: VecDeque::with_capacity(config.path_capacity),
            frame_capacity: config.frame_capacity,
            path_capacity: config.path_capacity,
            min_confidence: config.min_confidence,
        }
    }

    /// Append a frame, evicting the oldest on overflow. Always accepts.
    pub fn push_frame(&mut self, frame: PoseFrame) {
        if self.frames.len() == self.frame_capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Append a wrist path point (reference pixels) if the observation
    /// cleared the confidence gate; silently dropped otherwise.
    pub fn push_path_point(&mut self, point: Point, confidence: f64) {
        if confidence < self.min_confidence {
            return;
        }
        if self.path.len() == self.path_capacity {
            self.path.pop_front();
        }
        self.path.push_back(point);
    }

    pub fn frames(&self) -> &VecDeque<PoseFrame> {
        &self.frames
    }

    pub fn path(&self) -> &VecDeque<Point> {
        &self.path
    }

    /// The newest `n` frames, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &PoseFrame> {
        let skip = self.frames.len().saturating_sub(n);
        self.frames.iter().skip(skip)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.path.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
