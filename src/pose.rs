//! Joint observations and pose frames pushed by the pose-estimation
//! collaborator, one [`PoseFrame`] per processed camera frame (~30 Hz).

/// A 2D point. Normalized [0,1]×[0,1] coordinates on input frames,
/// reference-pixel coordinates everywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One tracked body landmark at one instant. Ephemeral; owned by the
/// frame that produced it.
#[derive(Debug, Clone, Copy)]
pub struct JointObservation {
    /// Normalized location in [0,1]×[0,1], origin top-left.
    pub location: Point,
    /// Model confidence in [0,1].
    pub confidence: f64,
    /// Seconds since session start.
    pub timestamp: f64,
}

impl JointObservation {
    pub fn new(x: f64, y: f64, confidence: f64, timestamp: f64) -> Self {
        Self { location: Point::new(x, y), confidence, timestamp }
    }
}

/// Up to four named joint observations for one camera frame.
///
/// A frame missing wrist or elbow still occupies a history slot but is
/// excluded from velocity/angle computation.
#[derive(Debug, Clone, Default)]
pub struct PoseFrame {
    /// Seconds since session start.
    pub timestamp: f64,
    pub wrist: Option<JointObservation>,
    pub elbow: Option<JointObservation>,
    pub shoulder: Option<JointObservation>,
    pub hip: Option<JointObservation>,
}

impl PoseFrame {
    /// A frame is trackable only if wrist and elbow were both observed.
    pub fn is_trackable(&self) -> bool {
        self.wrist.is_some() && self.elbow.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn trackable_requires_wrist_and_elbow() {
        let mut frame = PoseFrame { timestamp: 0.0, ..Default::default() };
        assert!(!frame.is_trackable());
        frame.wrist = Some(JointObservation::new(0.5, 0.5, 0.9, 0.0));
        assert!(!frame.is_trackable());
        frame.elbow = Some(JointObservation::new(0.5, 0.6, 0.9, 0.0));
        assert!(frame.is_trackable());
    }
}
