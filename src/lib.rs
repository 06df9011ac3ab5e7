//! xr-proxemics — per-frame spatial-interaction analysis for XR sessions.
//!
//! Consumes raw pose samples (viewer head, two hand controllers, tracked
//! targets) and derives higher-level signals: gaze detection, proximity
//! and height sentiment, closing speed, controller velocity, reach timing,
//! and looking-away duration. The crate neither renders nor owns scene
//! objects; the embedding frame loop feeds [`InteractionAnalyzer::update`]
//! once per frame and consumes the returned snapshot plus any queued
//! transition events.

pub mod analyzer;
pub mod approach;
pub mod attention;
pub mod events;
pub mod gaze;
pub mod ipc;
pub mod math;
pub mod motion;
pub mod pose;
pub mod proximity;
pub mod reach;
pub mod snapshot;

pub use analyzer::{AnalyzerConfig, InteractionAnalyzer};
pub use events::InteractionEvent;
pub use gaze::{GazeConfig, GazeState};
pub use math::{Quat, Vec3};
pub use pose::{Hand, PoseSample, Target};
pub use proximity::{HeightTier, ProximityTier};
pub use reach::{ReachConfig, ReachSample};
pub use snapshot::InteractionSnapshot;
