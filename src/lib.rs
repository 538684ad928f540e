pub mod calibration;
pub mod classify;
pub mod config;
pub mod detector;
pub mod error;
pub mod history;
pub mod metrics;
pub mod phase;
pub mod pose;
pub mod session;

pub use calibration::{CalibrationBank, KeyValueStore, MemoryStore, SwingPattern};
pub use classify::SwingType;
pub use config::DetectorConfig;
pub use detector::{DetectorEvent, SwingDetector, SwingEvent};
pub use error::StoreError;
pub use metrics::{Direction, MotionSample};
pub use phase::{SwingMetrics, SwingPhase};
pub use pose::{JointObservation, Point, PoseFrame};
pub use session::SwingSession;
