//! Tunable thresholds for detection and classification.
//!
//! Every numeric gate in the pipeline lives here, constructed per
//! capture session and passed by reference. Defaults carry the
//! empirically tuned reference set; nothing reads global state.

/// Detection and classification thresholds.
///
/// Speeds are in reference-frame pixels per second, positions in
/// reference-frame pixels, durations in seconds.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Reference pixel frame width normalized coordinates are scaled to.
    pub ref_width: f64,
    /// Reference pixel frame height.
    pub ref_height: f64,

    /// Joints below this confidence are treated as absent.
    pub min_confidence: f64,
    /// Minimum wrist speed to leave idle (backswing onset).
    pub min_swing_speed: f64,
    /// Minimum leftward speed for backswing → forward, and the floor a
    /// completed swing's peak speed must reach to be kept.
    pub min_forward_speed: f64,
    /// Below this speed the follow-through has settled.
    pub max_idle_speed: f64,
    /// Wrist displacement under this many pixels between consecutive
    /// frames reads as no direction (jitter dead zone).
    pub direction_dead_zone: f64,

    /// Completed swings shorter than this are discarded.
    pub min_swing_duration: f64,
    /// Completed swings longer than this are discarded.
    pub max_swing_duration: f64,
    /// A backswing that has not turned forward within this long is
    /// abandoned back to idle without an event.
    pub backswing_timeout: f64,

    /// Frame history ring capacity (~2 s at 30 Hz).
    pub frame_capacity: usize,
    /// Wrist path ring capacity.
    pub path_capacity: usize,
    /// How many recent frames the metric engine looks at.
    pub metric_window: usize,

    /// Net horizontal travel needed for a confident forehand/backhand.
    pub swing_horizontal_min: f64,
    /// Lower horizontal bar for the magnitude-only fallback when the
    /// half-path consistency check is inconclusive.
    pub fallback_horizontal_min: f64,
    /// Net vertical travel needed for a serve.
    pub serve_vertical_min: f64,
    /// Path-length / chord-length ratio above which a path counts as
    /// non-linear (serve arc test).
    pub serve_curve_ratio: f64,

    /// Exemplars kept per label; oldest evicted beyond this.
    pub bank_capacity: usize,
    /// Best calibrated match must score strictly above this or the
    /// swing is labeled unknown.
    pub match_floor: f64,
    /// Pixel distance at which start-position similarity reaches zero.
    pub start_proximity_scale: f64,
    /// A pattern whose |vertical change| exceeds this counts as
    /// serve-like, weighting vertical agreement more heavily.
    pub serve_like_vertical: f64,
    /// Similarity weight: horizontal-direction agreement.
    pub weight_horizontal: f64,
    /// Similarity weight: vertical displacement.
    pub weight_vertical: f64,
    /// Vertical weight when either pattern is serve-like.
    pub weight_vertical_serve: f64,
    /// Similarity weight: peak speed ratio.
    pub weight_speed: f64,
    /// Similarity weight: start-position proximity.
    pub weight_start: f64,
    /// Similarity weight: duration ratio.
    pub weight_duration: f64,
    /// Similarity weight: amplitude ratio.
    pub weight_amplitude: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            ref_width: 1920.0,
            ref_height: 1080.0,
            min_confidence: 0.6,
            min_swing_speed: 500.0,
            min_forward_speed: 800.0,
            max_idle_speed: 200.0,
            direction_dead_zone: 2.0,
            min_swing_duration: 0.3,
            max_swing_duration: 2.0,
            backswing_timeout: 3.0,
            frame_capacity: 60,
            path_capacity: 120,
            metric_window: 10,
            swing_horizontal_min: 150.0,
            fallback_horizontal_min: 80.0,
            serve_vertical_min: 150.0,
            serve_curve_ratio: 1.05,
            bank_capacity: 10,
            match_floor: 0.4,
            start_proximity_scale: 600.0,
            serve_like_vertical: 150.0,
            weight_horizontal: 3.0,
            weight_vertical: 2.0,
            weight_vertical_serve: 2.5,
            weight_speed: 1.5,
            weight_start: 1.0,
            weight_duration: 1.0,
            weight_amplitude: 1.0,
        }
    }
}
