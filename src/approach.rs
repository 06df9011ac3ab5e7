//! Closing-speed estimation between the viewer and a target.
//!
//! Canonical metric is the rate of change of separation distance, which is
//! symmetric in both parties' motion. A viewer-centric velocity projection
//! is retained as a diagnostic only.

use crate::math::Vec3;

// ── ApproachEstimator ───────────────────────────────────────

/// Tracks viewer/target separation across frames.
#[derive(Debug, Default)]
pub struct ApproachEstimator {
    prev_viewer: Option<Vec3>,
    prev_target: Option<Vec3>,
    prev_timestamp_ms: Option<f64>,
}

impl ApproachEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current viewer position and target attention point.
    ///
    /// Returns the signed closing speed in units per second — positive
    /// means the separation is shrinking. `None` until two usable samples
    /// exist or when the frame delta is non-positive (the degenerate frame
    /// is dropped without disturbing the stored baseline).
    pub fn update(
        &mut self,
        viewer_pos: Vec3,
        target_point: Vec3,
        timestamp_ms: f64,
    ) -> Option<f64> {
        let prev = match (self.prev_viewer, self.prev_target, self.prev_timestamp_ms) {
            (Some(v), Some(t), Some(ts)) => Some((v, t, ts)),
            _ => None,
        };

        let Some((prev_viewer, prev_target, prev_ts)) = prev else {
            self.store(viewer_pos, target_point, timestamp_ms);
            return None;
        };

        let dt_s = (timestamp_ms - prev_ts) / 1000.0;
        if dt_s <= 0.0 {
            return None;
        }

        let prev_distance = prev_viewer.distance_to(prev_target);
        let curr_distance = viewer_pos.distance_to(target_point);
        self.store(viewer_pos, target_point, timestamp_ms);

        Some((prev_distance - curr_distance) / dt_s)
    }

    /// Diagnostic: the viewer's own speed component toward the target's
    /// current position, ignoring target motion. `None` under the same
    /// guards as [`update`](Self::update), or when viewer and target
    /// coincide.
    pub fn viewer_component_toward(
        &self,
        viewer_pos: Vec3,
        target_point: Vec3,
        timestamp_ms: f64,
    ) -> Option<f64> {
        let prev_viewer = self.prev_viewer?;
        let prev_ts = self.prev_timestamp_ms?;
        let dt_s = (timestamp_ms - prev_ts) / 1000.0;
        if dt_s <= 0.0 {
            return None;
        }
        let velocity = (viewer_pos - prev_viewer) / dt_s;
        let direction = (target_point - viewer_pos).normalized()?;
        Some(velocity.dot(direction))
    }

    fn store(&mut self, viewer_pos: Vec3, target_point: Vec3, timestamp_ms: f64) {
        self.prev_viewer = Some(viewer_pos);
        self.prev_target = Some(target_point);
        self.prev_timestamp_ms = Some(timestamp_ms);
    }

    /// Forget the stored baseline.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_emits_nothing() {
        let mut est = ApproachEstimator::new();
        assert_eq!(
            est.update(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0), 0.0),
            None
        );
    }

    #[test]
    fn test_closing_speed_positive_when_approaching() {
        let mut est = ApproachEstimator::new();
        // Separation 5.0 at t=0, then 3.0 at t=2000ms: closing at 1.0 u/s.
        est.update(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0), 0.0);
        let speed = est
            .update(Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 0.0, -5.0), 2000.0)
            .expect("two samples");
        assert!((speed - 1.0).abs() < 1e-12, "got {}", speed);
    }

    #[test]
    fn test_receding_is_negative() {
        let mut est = ApproachEstimator::new();
        est.update(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0), 0.0);
        let speed = est
            .update(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -2.0), 1000.0)
            .expect("two samples");
        assert!((speed - -3.0).abs() < 1e-12, "got {}", speed);
    }

    #[test]
    fn test_symmetric_in_target_motion() {
        let mut est = ApproachEstimator::new();
        // Viewer stands still; the target walks one unit closer per second.
        est.update(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0), 0.0);
        let speed = est
            .update(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0), 1000.0)
            .expect("two samples");
        assert!((speed - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_dt_suppressed() {
        let mut est = ApproachEstimator::new();
        est.update(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0), 100.0);
        assert_eq!(
            est.update(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -5.0), 100.0),
            None
        );
        // Baseline still the original separation of 5.0.
        let speed = est
            .update(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0), 1100.0)
            .expect("later frame");
        assert!((speed - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_viewer_component_diagnostic() {
        let mut est = ApproachEstimator::new();
        est.update(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0), 0.0);
        // Viewer moved 1 unit toward the target over 1s.
        let toward = est
            .viewer_component_toward(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -5.0), 1000.0)
            .expect("projection defined");
        assert!((toward - 1.0).abs() < 1e-12);
        // Coincident viewer/target has no direction.
        assert_eq!(
            est.viewer_component_toward(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -5.0), 1000.0),
            None
        );
    }
}
