//! Threaded capture session around a [`SwingDetector`].
//!
//! The detector is single-owner state with no interior locking, so a
//! session moves it onto a dedicated worker thread and exchanges data
//! over channels: pose frames in, [`DetectorEvent`]s out. Frames are
//! processed strictly in arrival order by one consumer, which keeps
//! the phase machine free of interleaved updates.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::detector::{DetectorEvent, SwingDetector};
use crate::pose::PoseFrame;

pub struct SwingSession {
    frames: Option<Sender<PoseFrame>>,
    events: Receiver<DetectorEvent>,
    worker: JoinHandle<SwingDetector>,
}

impl SwingSession {
    /// Move `detector` onto a worker thread and start consuming frames.
    pub fn start(detector: SwingDetector) -> io::Result<Self> {
        let (frame_tx, frame_rx) = mpsc::channel::<PoseFrame>();
        let (event_tx, event_rx) = mpsc::channel::<DetectorEvent>();

        let worker = thread::Builder::new()
            .name("swing-detector".into())
            .spawn(move || run_worker(detector, frame_rx, event_tx))?;

        Ok(Self { frames: Some(frame_tx), events: event_rx, worker })
    }

    /// Queue a frame for processing. Returns false after [`close`] or
    /// once the worker has gone away.
    ///
    /// [`close`]: Self::close
    pub fn feed(&self, frame: PoseFrame) -> bool {
        match &self.frames {
            Some(tx) => tx.send(frame).is_ok(),
            None => false,
        }
    }

    /// Stop accepting frames. The worker drains its queue and exits;
    /// [`next_event`] then yields the remaining events and `None`.
    ///
    /// [`next_event`]: Self::next_event
    pub fn close(&mut self) {
        self.frames.take();
    }

    /// Block until the next event (at least one per fed frame), or
    /// `None` once the worker has exited and the queue is drained.
    pub fn next_event(&self) -> Option<DetectorEvent> {
        self.events.recv().ok()
    }

    /// Drain whatever events are ready right now, without blocking.
    pub fn poll_events(&self) -> Vec<DetectorEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }

    /// Stop feeding, let the worker drain its queue, and get the
    /// detector back (calibration bank included). `None` only if the
    /// worker panicked.
    pub fn stop(mut self) -> Option<SwingDetector> {
        self.frames.take();
        match self.worker.join() {
            Ok(detector) => Some(detector),
            Err(_) => {
                debug!("detector worker panicked");
                None
            }
        }
    }
}

fn run_worker(
    mut detector: SwingDetector,
    frames: Receiver<PoseFrame>,
    events: Sender<DetectorEvent>,
) -> SwingDetector {
    for frame in frames {
        for event in detector.process_frame(frame) {
            if events.send(event).is_err() {
                // Receiver dropped; keep consuming so feed() stays
                // cheap until the sender side is dropped too.
                break;
            }
        }
    }
    detector
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SwingType;
    use crate::config::DetectorConfig;
    use crate::pose::JointObservation;

    const DT: f64 = 1.0 / 30.0;

    fn frames_for_full_swing() -> Vec<PoseFrame> {
        let mut frames = Vec::new();
        let mut t = 0.0;
        let mut x = 0.70;
        let mut push = |frames: &mut Vec<PoseFrame>, vx: f64, t: &mut f64, x: &mut f64| {
            *t += DT;
            *x += vx / 1920.0 * DT;
            frames.push(PoseFrame {
                timestamp: *t,
                wrist: Some(JointObservation::new(*x, 0.5, 0.9, *t)),
                elbow: Some(JointObservation::new(*x, 0.6, 0.9, *t)),
                shoulder: None,
                hip: None,
            });
        };

        push(&mut frames, 0.0, &mut t, &mut x);
        for _ in 0..5 {
            push(&mut frames, 600.0, &mut t, &mut x);
        }
        for _ in 0..12 {
            push(&mut frames, -900.0, &mut t, &mut x);
        }
        for _ in 0..2 {
            push(&mut frames, -400.0, &mut t, &mut x);
        }
        push(&mut frames, -100.0, &mut t, &mut x);
        frames
    }

    #[test]
    fn session_processes_frames_in_order() {
        let session = SwingSession::start(SwingDetector::new(DetectorConfig::default()))
            .expect("spawn worker");

        let frames = frames_for_full_swing();
        let fed = frames.len();
        for frame in frames {
            assert!(session.feed(frame));
        }

        // One echo per frame plus exactly one swing event.
        let mut poses = 0usize;
        let mut swings = Vec::new();
        let mut last_echo_t = 0.0;
        for _ in 0..fed + 1 {
            match session.next_event().expect("event") {
                DetectorEvent::Pose(frame) => {
                    assert!(frame.timestamp > last_echo_t);
                    last_echo_t = frame.timestamp;
                    poses += 1;
                }
                DetectorEvent::Swing(swing) => swings.push(swing),
            }
        }
        assert_eq!(poses, fed);
        assert_eq!(swings.len(), 1);
        assert_eq!(swings[0].swing_type, SwingType::Forehand);

        let detector = session.stop().expect("worker exits cleanly");
        assert_eq!(detector.status(), "idle");
    }

    #[test]
    fn close_ends_the_event_stream() {
        let mut session = SwingSession::start(SwingDetector::new(DetectorConfig::default()))
            .expect("spawn worker");
        let frames = frames_for_full_swing();
        let fed = frames.len();
        for frame in frames {
            assert!(session.feed(frame));
        }
        session.close();
        assert!(!session.feed(PoseFrame::default()));

        let mut total = 0usize;
        while session.next_event().is_some() {
            total += 1;
        }
        assert_eq!(total, fed + 1);
    }

    #[test]
    fn stop_returns_detector_after_drain() {
        let session = SwingSession::start(SwingDetector::new(DetectorConfig::default()))
            .expect("spawn worker");
        for frame in frames_for_full_swing() {
            session.feed(frame);
        }
        let detector = session.stop().expect("worker exits cleanly");
        // The swing completed before shutdown and is retained.
        assert!(detector.swing_metrics().max_speed >= 800.0);
    }
}
