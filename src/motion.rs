//! Frame-to-frame motion tracking for the viewer head and hand controllers.
//!
//! Keeps one position/timestamp history per tracked entity and reports
//! instantaneous speed only when the entity actually moved between two
//! usable samples.

use tracing::debug;

use crate::math::Vec3;
use crate::pose::{PoseSample, TrackedEntity, TRACKED_ENTITY_COUNT};

// ── History ─────────────────────────────────────────────────

/// Last accepted sample for one tracked entity.
///
/// Absent until the first sample arrives; never reset by a missing pose
/// (tracking resumes against the pre-gap baseline).
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackedHistory {
    pub prev_position: Option<Vec3>,
    pub prev_timestamp_ms: Option<f64>,
}

// ── MotionTracker ───────────────────────────────────────────

/// Per-entity speed estimation over consecutive frames.
#[derive(Debug, Default)]
pub struct MotionTracker {
    histories: [TrackedHistory; TRACKED_ENTITY_COUNT],
}

impl MotionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored history for an entity (read-only; used by the approach
    /// estimator for the viewer's previous position).
    pub fn history(&self, entity: TrackedEntity) -> &TrackedHistory {
        &self.histories[entity.index()]
    }

    /// Feed one entity's current sample; returns instantaneous speed in
    /// units per second when one can be derived.
    ///
    /// Guards, in order:
    /// - first sample: store it, report nothing;
    /// - elapsed time zero or negative: drop the frame entirely, history
    ///   keeps its previous baseline;
    /// - zero distance moved: report nothing, but accept the sample so
    ///   drift cannot accumulate.
    pub fn update(&mut self, entity: TrackedEntity, sample: &PoseSample) -> Option<f64> {
        let slot = &mut self.histories[entity.index()];

        let (prev_pos, prev_ts) = match (slot.prev_position, slot.prev_timestamp_ms) {
            (Some(p), Some(t)) => (p, t),
            _ => {
                slot.prev_position = Some(sample.position);
                slot.prev_timestamp_ms = Some(sample.timestamp_ms);
                return None;
            }
        };

        let dt_ms = sample.timestamp_ms - prev_ts;
        if dt_ms <= 0.0 {
            debug!(
                entity = entity.as_str(),
                dt_ms, "non-positive frame delta, dropping sample"
            );
            return None;
        }

        let distance = prev_pos.distance_to(sample.position);
        slot.prev_position = Some(sample.position);
        slot.prev_timestamp_ms = Some(sample.timestamp_ms);

        if distance > 0.0 {
            Some(distance / (dt_ms / 1000.0))
        } else {
            None
        }
    }

    /// Forget all histories.
    pub fn reset(&mut self) {
        self.histories = [TrackedHistory::default(); TRACKED_ENTITY_COUNT];
    }
}

// ── Tests ───────────────────────────────────────────────────
