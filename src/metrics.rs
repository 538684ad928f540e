//! Motion metric engine.
//!
//! Pure, stateless functions over the buffered frames: instantaneous
//! wrist speed, elbow joint angle, shoulder rotation magnitude, and a
//! coarse direction label. Insufficient or low-confidence data
//! degrades to zero / [`Direction::None`], never an error.

use crate::config::DetectorConfig;
use crate::history::FrameHistory;
use crate::pose::{JointObservation, Point, PoseFrame};

/// Dominant axis of the wrist's most recent displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

/// Metrics derived from the last few frames, recomputed on every push.
#[derive(Debug, Clone, Copy)]
pub struct MotionSample {
    /// Wrist speed in reference pixels per second.
    pub speed: f64,
    pub direction: Direction,
    /// Angle at the elbow vertex in degrees; 0.0 when any of
    /// shoulder/elbow/wrist is missing or below confidence.
    pub elbow_angle: f64,
    /// Horizontal shoulder displacement across the window, in pixels.
    pub shoulder_rotation: f64,
}

impl MotionSample {
    pub fn zero() -> Self {
        Self { speed: 0.0, direction: Direction::None, elbow_angle: 0.0, shoulder_rotation: 0.0 }
    }

    /// Derive a sample from the newest frames in `history`.
    pub fn compute(history: &FrameHistory, config: &DetectorConfig) -> Self {
        let window: Vec<&PoseFrame> = history.recent(config.metric_window).collect();

        let (speed, direction) = match last_two_wrists(&window, config) {
            Some((prev, cur)) => (
                wrist_speed(prev, cur, config),
                displacement_direction(prev, cur, config),
            ),
            None => (0.0, Direction::None),
        };

        let elbow_angle = window.last().map_or(0.0, |f| elbow_angle(f, config));

        Self {
            speed,
            direction,
            elbow_angle,
            shoulder_rotation: shoulder_rotation(&window, config),
        }
    }
}

/// Scale a normalized location to the reference pixel frame.
pub fn to_pixels(location: Point, config: &DetectorConfig) -> Point {
    Point::new(location.x * config.ref_width, location.y * config.ref_height)
}

fn confident(joint: &JointObservation, config: &DetectorConfig) -> bool {
    joint.confidence >= config.min_confidence
}

/// The two newest trackable frames' wrists, oldest first. A frame
/// missing wrist or elbow, or with either below confidence, is skipped.
fn last_two_wrists<'a>(
    window: &[&'a PoseFrame],
    config: &DetectorConfig,
) -> Option<(&'a JointObservation, &'a JointObservation)> {
    let mut iter = window
        .iter()
        .rev()
        .filter(|f| f.is_trackable())
        .filter_map(|f| f.wrist.as_ref().zip(f.elbow.as_ref()))
        .filter(|(wrist, elbow)| confident(wrist, config) && confident(elbow, config))
        .map(|(wrist, _)| wrist);
    let cur = iter.next()?;
    let prev = iter.next()?;
    Some((prev, cur))
}

/// Pixel-space wrist speed between two observations; zero when the
/// timestamps are non-increasing.
fn wrist_speed(prev: &JointObservation, cur: &JointObservation, config: &DetectorConfig) -> f64 {
    let dt = cur.timestamp - prev.timestamp;
    if dt <= 0.0 {
        return 0.0;
    }
    let from = to_pixels(prev.location, config);
    let to = to_pixels(cur.location, config);
    from.distance(&to) / dt
}

/// Discretize the wrist displacement to its dominant axis.
fn displacement_direction(
    prev: &JointObservation,
    cur: &JointObservation,
    config: &DetectorConfig,
) -> Direction {
    let from = to_pixels(prev.location, config);
    let to = to_pixels(cur.location, config);
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() < config.direction_dead_zone && dy.abs() < config.direction_dead_zone {
        return Direction::None;
    }
    if dx.abs() >= dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else {
        // Screen coordinates: y grows downward.
        if dy > 0.0 { Direction::Down } else { Direction::Up }
    }
}

/// Angle at the elbow formed by the rays to shoulder and wrist, in
/// degrees. Requires all three joints at or above confidence.
fn elbow_angle(frame: &PoseFrame, config: &DetectorConfig) -> f64 {
    let (Some(wrist), Some(elbow), Some(shoulder)) = (&frame.wrist, &frame.elbow, &frame.shoulder)
    else {
        return 0.0;
    };
    if !confident(wrist, config) || !confident(elbow, config) || !confident(shoulder, config) {
        return 0.0;
    }

    let e = to_pixels(elbow.location, config);
    let to_shoulder = to_pixels(shoulder.location, config);
    let to_wrist = to_pixels(wrist.location, config);
    let a = Point::new(to_shoulder.x - e.x, to_shoulder.y - e.y);
    let b = Point::new(to_wrist.x - e.x, to_wrist.y - e.y);

    let mag = (a.x * a.x + a.y * a.y).sqrt() * (b.x * b.x + b.y * b.y).sqrt();
    if mag < f64::EPSILON {
        return 0.0;
    }
    let cos = ((a.x * b.x + a.y * b.y) / mag).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Horizontal shoulder displacement between the oldest and newest
/// confident shoulder observations in the window, pixel-scaled.
fn shoulder_rotation(window: &[&PoseFrame], config: &DetectorConfig) -> f64 {
    let mut shoulders = window
        .iter()
        .filter_map(|f| f.shoulder.as_ref())
        .filter(|s| confident(s, config));
    let Some(first) = shoulders.next() else { return 0.0 };
    let Some(last) = shoulders.next_back() else { return 0.0 };
    (last.location.x - first.location.x).abs() * config.ref_width
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::JointObservation;

    const FRAME_DT: f64 = 1.0 / 30.0;

    fn wrist_frame(x: f64, y: f64, confidence: f64, t: f64) -> PoseFrame {
        PoseFrame {
            timestamp: t,
            wrist: Some(JointObservation::new(x, y, confidence, t)),
            elbow: Some(JointObservation::new(x, y + 0.1, 0.9, t)),
            shoulder: None,
            hip: None,
        }
    }

    fn history_of(frames: Vec<PoseFrame>) -> FrameHistory {
        let config = DetectorConfig::default();
        let mut history = FrameHistory::new(&config);
        for f in frames {
            history.push_frame(f);
        }
        history
    }

    #[test]
    fn speed_from_last_two_wrists() {
        // 0.0104167 normalized ≈ 20 px per frame ≈ 600 px/s at 30 Hz.
        let step = 20.0 / 1920.0;
        let history = history_of(vec![
            wrist_frame(0.5, 0.5, 0.9, 0.0),
            wrist_frame(0.5 + step, 0.5, 0.9, FRAME_DT),
        ]);
        let sample = MotionSample::compute(&history, &DetectorConfig::default());
        assert!((sample.speed - 600.0).abs() < 1.0);
        assert_eq!(sample.direction, Direction::Right);
    }

    #[test]
    fn low_confidence_wrist_yields_zero_speed() {
        let history = history_of(vec![
            wrist_frame(0.5, 0.5, 0.9, 0.0),
            wrist_frame(0.6, 0.5, 0.3, FRAME_DT),
        ]);
        let sample = MotionSample::compute(&history, &DetectorConfig::default());
        assert_eq!(sample.speed, 0.0);
        assert_eq!(sample.direction, Direction::None);
    }

    #[test]
    fn elbowless_frames_yield_zero_speed() {
        // A confident wrist is not enough: frames missing the elbow are
        // untrackable and must not drive velocity.
        let mut frames = vec![
            wrist_frame(0.5, 0.5, 0.9, 0.0),
            wrist_frame(0.52, 0.5, 0.9, FRAME_DT),
        ];
        for f in &mut frames {
            f.elbow = None;
        }
        let sample = MotionSample::compute(&history_of(frames), &DetectorConfig::default());
        assert_eq!(sample.speed, 0.0);
        assert_eq!(sample.direction, Direction::None);
    }

    #[test]
    fn low_confidence_elbow_excludes_the_frame() {
        let mut second = wrist_frame(0.52, 0.5, 0.9, FRAME_DT);
        second.elbow = Some(JointObservation::new(0.52, 0.6, 0.3, FRAME_DT));
        let history = history_of(vec![wrist_frame(0.5, 0.5, 0.9, 0.0), second]);
        let sample = MotionSample::compute(&history, &DetectorConfig::default());
        assert_eq!(sample.speed, 0.0);
    }

    #[test]
    fn non_increasing_timestamps_yield_zero_speed() {
        let history = history_of(vec![
            wrist_frame(0.5, 0.5, 0.9, 1.0),
            wrist_frame(0.6, 0.5, 0.9, 1.0),
        ]);
        let sample = MotionSample::compute(&history, &DetectorConfig::default());
        assert_eq!(sample.speed, 0.0);
    }

    #[test]
    fn vertical_displacement_reads_up() {
        let history = history_of(vec![
            wrist_frame(0.5, 0.5, 0.9, 0.0),
            wrist_frame(0.5, 0.45, 0.9, FRAME_DT),
        ]);
        let sample = MotionSample::compute(&history, &DetectorConfig::default());
        assert_eq!(sample.direction, Direction::Up);
    }

    #[test]
    fn jitter_inside_dead_zone_reads_none() {
        // 0.5 px of movement — below the 2 px dead zone.
        let history = history_of(vec![
            wrist_frame(0.5, 0.5, 0.9, 0.0),
            wrist_frame(0.5 + 0.5 / 1920.0, 0.5, 0.9, FRAME_DT),
        ]);
        let sample = MotionSample::compute(&history, &DetectorConfig::default());
        assert_eq!(sample.direction, Direction::None);
    }

    #[test]
    fn right_angle_elbow() {
        let config = DetectorConfig { ref_width: 1000.0, ref_height: 1000.0, ..Default::default() };
        let frame = PoseFrame {
            timestamp: 0.0,
            wrist: Some(JointObservation::new(0.3, 0.2, 0.9, 0.0)),
            elbow: Some(JointObservation::new(0.3, 0.3, 0.9, 0.0)),
            shoulder: Some(JointObservation::new(0.2, 0.3, 0.9, 0.0)),
            hip: None,
        };
        assert!((elbow_angle(&frame, &config) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn elbow_angle_zero_without_shoulder() {
        let config = DetectorConfig::default();
        let frame = wrist_frame(0.5, 0.5, 0.9, 0.0);
        assert_eq!(elbow_angle(&frame, &config), 0.0);
    }

    #[test]
    fn shoulder_rotation_spans_window() {
        let config = DetectorConfig::default();
        let mut history = FrameHistory::new(&config);
        for i in 0..5 {
            let t = i as f64 * FRAME_DT;
            history.push_frame(PoseFrame {
                timestamp: t,
                wrist: Some(JointObservation::new(0.5, 0.5, 0.9, t)),
                elbow: Some(JointObservation::new(0.5, 0.6, 0.9, t)),
                shoulder: Some(JointObservation::new(0.4 + i as f64 * 0.01, 0.3, 0.9, t)),
                hip: None,
            });
        }
        let sample = MotionSample::compute(&history, &config);
        // 0.04 normalized over the window → 76.8 px.
        assert!((sample.shoulder_rotation - 76.8).abs() < 0.1);
    }
}
