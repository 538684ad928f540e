//! Swing type classification.
//!
//! Two interchangeable strategies selected by calibration-bank
//! emptiness: a static heuristic over the completed swing's path, and
//! a nearest-exemplar weighted-similarity scorer against the bank.
//! Both are pure functions of their inputs and always return exactly
//! one of the four labels.

use tracing::debug;

use crate::calibration::{CalibrationBank, SwingPattern};
use crate::config::DetectorConfig;
use crate::phase::SwingMetrics;
use crate::pose::Point;

/// The sole output label vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SwingType {
    Forehand,
    Backhand,
    Serve,
    Unknown,
}

impl SwingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forehand => "forehand",
            Self::Backhand => "backhand",
            Self::Serve => "serve",
            Self::Unknown => "unknown",
        }
    }
}

/// Label a completed swing: calibrated when the bank holds exemplars,
/// heuristic otherwise. Fewer than 2 path points cannot be classified.
pub fn classify(metrics: &SwingMetrics, bank: &CalibrationBank, config: &DetectorConfig) -> SwingType {
    if metrics.path.len() < 2 {
        return SwingType::Unknown;
    }
    if bank.is_empty() {
        classify_heuristic(metrics, config)
    } else {
        classify_calibrated(metrics, bank, config)
    }
}

// ---------------------------------------------------------------------------
// Heuristic strategy
// ---------------------------------------------------------------------------

/// Rule-based labeler used when no calibration exists.
pub fn classify_heuristic(metrics: &SwingMetrics, config: &DetectorConfig) -> SwingType {
    let path = &metrics.path;
    if path.len() < 2 {
        return SwingType::Unknown;
    }
    let first = path[0];
    let last = path[path.len() - 1];
    let mid = path[path.len() / 2];
    let dx = last.x - first.x;
    let dy = last.y - first.y;

    // Serve: launched from the upper third, vertically dominated, and
    // the path arcs rather than running straight.
    if first.y < config.ref_height / 3.0
        && dy.abs() > config.serve_vertical_min
        && dy.abs() > dx.abs()
        && curve_ratio(path) > config.serve_curve_ratio
    {
        return SwingType::Serve;
    }

    // Forehand/backhand only make sense in the middle height band.
    let avg_y = path.iter().map(|p| p.y).sum::<f64>() / path.len() as f64;
    if avg_y >= config.ref_height / 3.0 && avg_y <= config.ref_height * 2.0 / 3.0 {
        let first_half = mid.x - first.x;
        let second_half = last.x - mid.x;
        let consistent = first_half * second_half > 0.0;

        if consistent && dx.abs() >= config.swing_horizontal_min {
            return if dx < 0.0 { SwingType::Forehand } else { SwingType::Backhand };
        }
        if consistent && dx.abs() >= config.fallback_horizontal_min {
            // Weak travel; the starting side disambiguates.
            return if first.x > config.ref_width / 2.0 {
                SwingType::Forehand
            } else {
                SwingType::Backhand
            };
        }
        if dx.abs() >= config.fallback_horizontal_min {
            // Halves disagree but the net travel is unambiguous.
            return if dx < 0.0 { SwingType::Forehand } else { SwingType::Backhand };
        }
    }

    SwingType::Unknown
}

/// Polyline length over chord length; 1.0 for a straight path.
fn curve_ratio(path: &[Point]) -> f64 {
    let chord = path[0].distance(&path[path.len() - 1]);
    if chord < f64::EPSILON {
        return 1.0;
    }
    let length: f64 = path.windows(2).map(|w| w[0].distance(&w[1])).sum();
    length / chord
}

// ---------------------------------------------------------------------------
// Calibrated strategy
// ---------------------------------------------------------------------------

/// Nearest-exemplar labeler: per-label best similarity, highest label
/// wins, strict floor below which the result is unknown.
pub fn classify_calibrated(
    metrics: &SwingMetrics,
    bank: &CalibrationBank,
    config: &DetectorConfig,
) -> SwingType {
    let Some(candidate) = SwingPattern::from_metrics(metrics) else {
        return SwingType::Unknown;
    };

    let mut best_label = SwingType::Unknown;
    let mut best_score = 0.0;
    for label in [SwingType::Forehand, SwingType::Backhand, SwingType::Serve] {
        let score = bank
            .patterns(label)
            .iter()
            .map(|exemplar| similarity(&candidate, exemplar, config))
            .fold(0.0, f64::max);
        if score > best_score {
            best_label = label;
            best_score = score;
        }
    }

    debug!(label = best_label.as_str(), score = best_score, "calibrated match");
    if best_score > config.match_floor { best_label } else { SwingType::Unknown }
}

/// Weighted similarity of two swing summaries, normalized to [0, 1].
///
/// Horizontal-direction agreement dominates; vertical displacement
/// weighs heavier when either side looks serve-like; speed, start
/// proximity, duration, and amplitude contribute the rest.
pub fn similarity(candidate: &SwingPattern, exemplar: &SwingPattern, config: &DetectorConfig) -> f64 {
    let serve_like = candidate.vertical_change.abs() > config.serve_like_vertical
        || exemplar.vertical_change.abs() > config.serve_like_vertical;
    let w_vertical = if serve_like { config.weight_vertical_serve } else { config.weight_vertical };

    let start_dist = Point::new(candidate.start_x, candidate.start_y)
        .distance(&Point::new(exemplar.start_x, exemplar.start_y));
    let start_score = (1.0 - start_dist / config.start_proximity_scale).max(0.0);

    let terms = [
        (config.weight_horizontal, signed_ratio(candidate.horizontal_change, exemplar.horizontal_change)),
        (w_vertical, signed_ratio(candidate.vertical_change, exemplar.vertical_change)),
        (config.weight_speed, magnitude_ratio(candidate.max_speed, exemplar.max_speed)),
        (config.weight_start, start_score),
        (config.weight_duration, magnitude_ratio(candidate.duration, exemplar.duration)),
        (config.weight_amplitude, magnitude_ratio(candidate.amplitude, exemplar.amplitude)),
    ];

    let total: f64 = terms.iter().map(|(w, _)| w).sum();
    let score: f64 = terms.iter().map(|(w, s)| w * s).sum();
    score / total
}

/// min/max magnitude ratio in [0, 1]; 1.0 when both are ~zero.
fn magnitude_ratio(a: f64, b: f64) -> f64 {
    let (a, b) = (a.abs(), b.abs());
    let max = a.max(b);
    if max < f64::EPSILON { 1.0 } else { a.min(b) / max }
}

/// Magnitude ratio gated to zero when the signs disagree.
fn signed_ratio(a: f64, b: f64) -> f64 {
    if a * b < 0.0 { 0.0 } else { magnitude_ratio(a, b) }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
