//! Per-user calibration bank of labeled exemplar swings.
//!
//! Three bounded FIFO sequences of [`SwingPattern`], one per label.
//! Exemplars are only ever added through the explicit force-label
//! capture action, never inferred. Persistence round-trips each label
//! through a caller-provided [`KeyValueStore`] as versioned JSON; a
//! failed or missing restore leaves the bank empty (heuristic mode)
//! and is never an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::SwingType;
use crate::error::{Result, StoreError};
use crate::phase::SwingMetrics;

/// Bump when the persisted shape changes; mismatched payloads load as
/// empty rather than being misread.
pub const SCHEMA_VERSION: u32 = 1;

const KEY_FOREHAND: &str = "swingscope.calibration.forehand";
const KEY_BACKHAND: &str = "swingscope.calibration.backhand";
const KEY_SERVE: &str = "swingscope.calibration.serve";

/// Compact numeric summary of one labeled swing. Immutable once stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPattern {
    /// Net horizontal wrist travel (px, negative = leftward).
    pub horizontal_change: f64,
    /// Net vertical wrist travel (px, positive = downward).
    pub vertical_change: f64,
    /// Peak speed (px/s).
    pub max_speed: f64,
    /// Path start, reference pixels.
    pub start_x: f64,
    pub start_y: f64,
    /// Swing duration (s).
    pub duration: f64,
    /// Backswing horizontal spread (px).
    pub amplitude: f64,
}

impl SwingPattern {
    /// Summarize a completed swing; `None` when the path is too short
    /// to carry displacement information.
    pub fn from_metrics(metrics: &SwingMetrics) -> Option<Self> {
        let first = metrics.path.first()?;
        let last = metrics.path.last()?;
        if metrics.path.len() < 2 {
            return None;
        }
        Some(Self {
            horizontal_change: last.x - first.x,
            vertical_change: last.y - first.y,
            max_speed: metrics.max_speed,
            start_x: first.x,
            start_y: first.y,
            duration: metrics.duration,
            amplitude: metrics.amplitude,
        })
    }
}

/// Persisted wrapper: the on-store JSON shape for one label.
#[derive(Serialize, Deserialize)]
struct StoredBank {
    version: u32,
    patterns: Vec<SwingPattern>,
}

/// External key-value persistence for the calibration bank. Implemented
/// by whichever storage the host application provides.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory [`KeyValueStore`], for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// The three per-label exemplar banks, each bounded to the most recent
/// `capacity` entries (FIFO eviction).
#[derive(Debug, Clone)]
pub struct CalibrationBank {
    forehand: Vec<SwingPattern>,
    backhand: Vec<SwingPattern>,
    serve: Vec<SwingPattern>,
    capacity: usize,
}

impl Default for CalibrationBank {
    fn default() -> Self {
        Self::with_capacity(10)
    }
}

impl CalibrationBank {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            forehand: Vec::new(),
            backhand: Vec::new(),
            serve: Vec::new(),
            capacity,
        }
    }

    /// Append an exemplar under `label`, evicting the oldest entry once
    /// the label's bank is full. `Unknown` is not a calibration label
    /// and is ignored.
    pub fn add(&mut self, label: SwingType, pattern: SwingPattern) {
        let capacity = self.capacity;
        let Some(bank) = self.bank_mut(label) else {
            debug!("ignoring calibration add for unknown label");
            return;
        };
        if bank.len() == capacity {
            bank.remove(0);
        }
        bank.push(pattern);
    }

    /// Exemplars stored under `label`, oldest first.
    pub fn patterns(&self, label: SwingType) -> &[SwingPattern] {
        match label {
            SwingType::Forehand => &self.forehand,
            SwingType::Backhand => &self.backhand,
            SwingType::Serve => &self.serve,
            SwingType::Unknown => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.forehand.is_empty() && self.backhand.is_empty() && self.serve.is_empty()
    }

    pub fn len(&self) -> usize {
        self.forehand.len() + self.backhand.len() + self.serve.len()
    }

    /// Restore from `store`. Missing, corrupt, or version-mismatched
    /// entries leave the affected label empty — never an error.
    pub fn load(store: &dyn KeyValueStore, capacity: usize) -> Self {
        let mut bank = Self::with_capacity(capacity);
        bank.forehand = load_label(store, KEY_FOREHAND, capacity);
        bank.backhand = load_label(store, KEY_BACKHAND, capacity);
        bank.serve = load_label(store, KEY_SERVE, capacity);
        bank
    }

    /// Write all three label banks to `store`.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        save_label(store, KEY_FOREHAND, &self.forehand)?;
        save_label(store, KEY_BACKHAND, &self.backhand)?;
        save_label(store, KEY_SERVE, &self.serve)?;
        Ok(())
    }

    /// Empty all banks and delete the stored entries.
    pub fn clear(&mut self, store: &mut dyn KeyValueStore) -> Result<()> {
        self.forehand.clear();
        self.backhand.clear();
        self.serve.clear();
        store.remove(KEY_FOREHAND)?;
        store.remove(KEY_BACKHAND)?;
        store.remove(KEY_SERVE)?;
        Ok(())
    }

    fn bank_mut(&mut self, label: SwingType) -> Option<&mut Vec<SwingPattern>> {
        match label {
            SwingType::Forehand => Some(&mut self.forehand),
            SwingType::Backhand => Some(&mut self.backhand),
            SwingType::Serve => Some(&mut self.serve),
            SwingType::Unknown => None,
        }
    }
}

fn load_label(store: &dyn KeyValueStore, key: &str, capacity: usize) -> Vec<SwingPattern> {
    let Some(raw) = store.get(key) else {
        return Vec::new();
    };
    let stored: StoredBank = match serde_json::from_str(&raw) {
        Ok(stored) => stored,
        Err(e) => {
            warn!(key, error = %e, "unreadable calibration entry, starting empty");
            return Vec::new();
        }
    };
    if stored.version != SCHEMA_VERSION {
        warn!(key, version = stored.version, "calibration schema mismatch, starting empty");
        return Vec::new();
    }
    let mut patterns = stored.patterns;
    if patterns.len() > capacity {
        patterns.drain(..patterns.len() - capacity);
    }
    patterns
}

fn save_label(store: &mut dyn KeyValueStore, key: &str, patterns: &[SwingPattern]) -> Result<()> {
    let payload = serde_json::to_string(&StoredBank {
        version: SCHEMA_VERSION,
        patterns: patterns.to_vec(),
    })
    .map_err(StoreError::Encode)?;
    store.set(key, &payload)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(duration: f64) -> SwingPattern {
        SwingPattern {
            horizontal_change: -700.0,
            vertical_change: 10.0,
            max_speed: 900.0,
            start_x: 1200.0,
            start_y: 540.0,
            duration,
            amplitude: 80.0,
        }
    }

    #[test]
    fn eleventh_add_evicts_exactly_the_oldest() {
        let mut bank = CalibrationBank::default();
        for i in 0..11 {
            bank.add(SwingType::Serve, pattern(i as f64));
        }
        let serves = bank.patterns(SwingType::Serve);
        assert_eq!(serves.len(), 10);
        assert_eq!(serves.first().unwrap().duration, 1.0);
        assert_eq!(serves.last().unwrap().duration, 10.0);
    }

    #[test]
    fn unknown_label_is_not_stored() {
        let mut bank = CalibrationBank::default();
        bank.add(SwingType::Unknown, pattern(0.5));
        assert!(bank.is_empty());
    }

    #[test]
    fn save_load_round_trip() {
        let mut store = MemoryStore::default();
        let mut bank = CalibrationBank::default();
        bank.add(SwingType::Forehand, pattern(0.4));
        bank.add(SwingType::Backhand, pattern(0.6));
        bank.save(&mut store).unwrap();

        let restored = CalibrationBank::load(&store, 10);
        assert_eq!(restored.patterns(SwingType::Forehand), bank.patterns(SwingType::Forehand));
        assert_eq!(restored.patterns(SwingType::Backhand), bank.patterns(SwingType::Backhand));
        assert!(restored.patterns(SwingType::Serve).is_empty());
    }

    #[test]
    fn missing_store_loads_empty() {
        let store = MemoryStore::default();
        assert!(CalibrationBank::load(&store, 10).is_empty());
    }

    #[test]
    fn corrupt_entry_loads_empty() {
        let mut store = MemoryStore::default();
        store.set(KEY_FOREHAND, "{not json").unwrap();
        let bank = CalibrationBank::load(&store, 10);
        assert!(bank.patterns(SwingType::Forehand).is_empty());
    }

    #[test]
    fn version_mismatch_loads_empty() {
        let mut store = MemoryStore::default();
        let payload = serde_json::to_string(&StoredBank {
            version: SCHEMA_VERSION + 1,
            patterns: vec![pattern(0.5)],
        })
        .unwrap();
        store.set(KEY_SERVE, &payload).unwrap();
        assert!(CalibrationBank::load(&store, 10).is_empty());
    }

    #[test]
    fn clear_empties_bank_and_store() {
        let mut store = MemoryStore::default();
        let mut bank = CalibrationBank::default();
        bank.add(SwingType::Serve, pattern(0.5));
        bank.save(&mut store).unwrap();
        bank.clear(&mut store).unwrap();
        assert!(bank.is_empty());
        assert!(store.get(KEY_SERVE).is_none());
        assert!(CalibrationBank::load(&store, 10).is_empty());
    }
}
