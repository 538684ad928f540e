//! Feed a scripted pose stream through a session and print detections.
//!
//! Usage: cargo run --example live_feed
//!
//! Simulates ~30 Hz wrist motion for two forehands and a serve; in a
//! real integration the frames come from a pose-estimation model.

use std::io;
use std::process;

use swingscope::{
    DetectorConfig, DetectorEvent, JointObservation, PoseFrame, SwingDetector, SwingSession,
};

const DT: f64 = 1.0 / 30.0;

// ---------------------------------------------------------------------------
// Scripted motion
// ---------------------------------------------------------------------------

/// Generates frames for a wrist moving at scripted pixel velocities.
struct Script {
    t: f64,
    x: f64,
    y: f64,
    frames: Vec<PoseFrame>,
}

impl Script {
    fn new(x: f64, y: f64) -> Self {
        Self { t: 0.0, x, y, frames: Vec::new() }
    }

    /// One frame with the wrist moving at (`vx`, `vy`) px/s.
    fn step(&mut self, vx: f64, vy: f64) {
        self.t += DT;
        self.x += vx / 1920.0 * DT;
        self.y += vy / 1080.0 * DT;
        self.frames.push(PoseFrame {
            timestamp: self.t,
            wrist: Some(JointObservation::new(self.x, self.y, 0.92, self.t)),
            elbow: Some(JointObservation::new(self.x + 0.02, self.y + 0.08, 0.9, self.t)),
            shoulder: Some(JointObservation::new(self.x + 0.05, self.y - 0.15, 0.88, self.t)),
            hip: None,
        });
    }

    fn rest(&mut self, frames: usize) {
        for _ in 0..frames {
            self.step(0.0, 0.0);
        }
    }

    /// Rightward backswing, fast leftward forward phase, settle.
    fn forehand(&mut self) {
        for _ in 0..5 {
            self.step(600.0, 0.0);
        }
        for _ in 0..12 {
            self.step(-900.0, 0.0);
        }
        for _ in 0..2 {
            self.step(-400.0, 0.0);
        }
        self.step(-100.0, 0.0);
    }

    /// Upward toss from high, then a fast, steeply dropping strike.
    fn serve(&mut self) {
        for _ in 0..6 {
            self.step(0.0, -600.0);
        }
        self.step(-850.0, 700.0);
        for _ in 0..11 {
            self.step(-200.0, 900.0);
        }
        for _ in 0..2 {
            self.step(-300.0, 200.0);
        }
        self.step(-80.0, 0.0);
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run() -> io::Result<()> {
    let mut script = Script::new(0.70, 0.5);
    script.rest(15);
    script.forehand();
    script.rest(30);
    script.forehand();
    script.rest(30);

    // Raise the wrist to serve height slowly enough not to read as a
    // backswing onset.
    while script.y > 0.22 {
        script.step(0.0, -450.0);
    }
    script.serve();
    script.rest(15);

    let mut session = SwingSession::start(SwingDetector::new(DetectorConfig::default()))?;
    println!("=== Feeding {} frames ===", script.frames.len());
    for frame in script.frames {
        session.feed(frame);
    }
    session.close();

    let mut frames = 0usize;
    while let Some(event) = session.next_event() {
        match event {
            DetectorEvent::Pose(_) => frames += 1,
            DetectorEvent::Swing(swing) => {
                println!(
                    "{:8}  duration={:.2}s  peak={:.0} px/s  amplitude={:.0} px",
                    swing.swing_type.as_str(),
                    swing.duration,
                    swing.metrics.max_speed,
                    swing.metrics.amplitude,
                );
            }
        }
    }

    if let Some(detector) = session.stop() {
        println!("=== {} frames processed, final phase: {} ===", frames, detector.status());
    }
    Ok(())
}
