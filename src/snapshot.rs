//! Immutable per-frame output aggregate.
//!
//! Assembled fresh by the analyzer after all sub-components run and handed
//! to the display collaborator; owns none of the mutable histories.

use crate::pose::Hand;
use crate::proximity::{HeightTier, ProximityTier};
use crate::reach::ReachSample;

// ── InteractionSnapshot ─────────────────────────────────────

/// All derived signals for one frame.
///
/// `None` fields mean "no signal this frame" — insufficient history, a
/// suppressed degenerate computation, an untracked hand, or an empty
/// target list — never a silently defaulted zero.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSnapshot {
    pub frame_timestamp_ms: f64,
    /// Viewer head Y minus the reference target's attention-point Y.
    pub height_difference: Option<f64>,
    pub height_tier: Option<HeightTier>,
    /// Viewer distance to the reference target's attention point.
    pub proximity_distance: Option<f64>,
    pub proximity_tier: Option<ProximityTier>,
    /// Signed closing speed toward the reference target (units/sec).
    pub approach_speed: Option<f64>,
    pub head_speed: Option<f64>,
    pub left_hand_speed: Option<f64>,
    pub right_hand_speed: Option<f64>,
    /// Target the viewer is most directly facing, if any qualified.
    pub gaze_target: Option<u64>,
    pub gaze_angle_deg: Option<f64>,
    pub looking_at_reference: bool,
    /// Most recently completed away interval (seconds); 0.0 before any.
    pub away_duration_s: f64,
    /// Reach emissions completed this frame, indexed by hand.
    pub reach: [Option<ReachSample>; 2],
}

impl InteractionSnapshot {
    /// Completed reach sample for a hand this frame, if any.
    pub fn reach_for(&self, hand: Hand) -> Option<&ReachSample> {
        self.reach[hand.index()].as_ref()
    }

    /// Hand speed by hand.
    pub fn hand_speed(&self, hand: Hand) -> Option<f64> {
        match hand {
            Hand::Left => self.left_hand_speed,
            Hand::Right => self.right_hand_speed,
        }
    }

    /// Format the snapshot as an IPC s-expression plist.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:timestamp-ms {:.1} :height-diff {} :height {} :proximity {} :distance {} :approach {} :head-speed {} :left-speed {} :right-speed {} :gaze-target {} :gaze-angle {} :looking {} :away-s {:.2})",
            self.frame_timestamp_ms,
            fmt_opt_f64(self.height_difference, 2),
            self.height_tier
                .map(|t| format!(":{}", t.as_str()))
                .unwrap_or_else(|| "nil".to_string()),
            self.proximity_tier
                .map(|t| format!(":{}", t.as_str()))
                .unwrap_or_else(|| "nil".to_string()),
            fmt_opt_f64(self.proximity_distance, 2),
            fmt_opt_f64(self.approach_speed, 2),
            fmt_opt_f64(self.head_speed, 2),
            fmt_opt_f64(self.left_hand_speed, 2),
            fmt_opt_f64(self.right_hand_speed, 2),
            self.gaze_target
                .map(|id| id.to_string())
                .unwrap_or_else(|| "nil".to_string()),
            fmt_opt_f64(self.gaze_angle_deg, 1),
            if self.looking_at_reference { "t" } else { "nil" },
            self.away_duration_s,
        )
    }
}

fn fmt_opt_f64(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "nil".to_string(),
    }
}

// ── Tests ───────────────────────────────────────────────────
