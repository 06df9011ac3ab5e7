//! Gaze detection — which target the viewer's forward vector points at.
//!
//! Pure per-frame selection: the caller diffs the returned state against
//! the previous frame to detect enter/leave edges.

use tracing::debug;

use crate::math::Vec3;
use crate::pose::{PoseSample, Target};

// ── Config ──────────────────────────────────────────────────

/// Angular thresholds for gaze detection, in degrees.
#[derive(Debug, Clone)]
pub struct GazeConfig {
    /// A target is a selection candidate only below this angle.
    pub selection_threshold_deg: f64,
    /// Wider cone used for the reference-target "looking at" boolean.
    pub looking_at_threshold_deg: f64,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            selection_threshold_deg: 10.0,
            looking_at_threshold_deg: 15.0,
        }
    }
}

// ── GazeHit / GazeState ─────────────────────────────────────

/// A target that qualified as the current gaze target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeHit {
    pub target_id: u64,
    /// Angle between the forward vector and the target direction.
    pub angle_deg: f64,
}

/// Derived gaze state for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GazeState {
    /// The target closest to dead-center, if any qualified.
    pub hit: Option<GazeHit>,
    /// Whether the reference target falls within the looking-at cone.
    pub looking_at_reference: bool,
}

// ── Detection ───────────────────────────────────────────────

/// Angle in degrees between the viewer's forward vector and the direction
/// to `point`, or `None` when viewer and point coincide.
fn angle_to_point(forward: Vec3, viewer_pos: Vec3, point: Vec3) -> Option<f64> {
    let direction = (point - viewer_pos).normalized()?;
    let dot = forward.dot(direction).clamp(-1.0, 1.0);
    Some(dot.acos().to_degrees())
}

/// Evaluate gaze for one frame.
///
/// Scans `targets` in order for the smallest angle strictly below the
/// selection threshold; ties in angle keep the earlier-seen target. The
/// reference target (first element) additionally drives the looking-at
/// boolean under its own wider threshold. A target coincident with the
/// viewer has no usable direction and is treated as not gazed.
pub fn detect(config: &GazeConfig, viewer: &PoseSample, targets: &[Target]) -> GazeState {
    let forward = viewer.orientation.rotate(Vec3::FORWARD);

    let mut best: Option<GazeHit> = None;
    let mut looking_at_reference = false;

    for (i, target) in targets.iter().enumerate() {
        let angle = match angle_to_point(forward, viewer.position, target.attention_point()) {
            Some(a) => a,
            None => {
                debug!(target_id = target.id, "viewer coincident with target, skipping");
                continue;
            }
        };

        if i == 0 && angle < config.looking_at_threshold_deg {
            looking_at_reference = true;
        }

        if angle < config.selection_threshold_deg {
            let better = match best {
                Some(b) => angle < b.angle_deg,
                None => true,
            };
            if better {
                best = Some(GazeHit {
                    target_id: target.id,
                    angle_deg: angle,
                });
            }
        }
    }

    GazeState {
        hit: best,
        looking_at_reference,
    }
}

// ── Tests ───────────────────────────────────────────────────
