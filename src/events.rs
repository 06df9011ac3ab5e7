//! Transition-edge events for the display collaborator.
//!
//! The analyzer queues one event per state-machine edge; the collaborator
//! drains them each frame and renders highlights or log lines as it sees
//! fit. Wire format is an s-expression plist per event.

use crate::pose::Hand;
use crate::proximity::ProximityTier;
use crate::reach::ReachSample;

// ── InteractionEvent ────────────────────────────────────────

/// Events emitted by the interaction analyzer.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// A target entered the gaze cone (or displaced a previous one).
    GazeAcquired { target_id: u64, angle_deg: f64 },
    /// The previously gazed target no longer qualifies.
    GazeLost { target_id: u64 },
    /// The viewer stopped looking at the reference target.
    AttentionLost { at_ms: f64 },
    /// The viewer looked back; carries the completed away interval.
    AttentionRegained { away_s: f64 },
    /// A hand left the reach radius of the reference target.
    ReachStarted { hand: Hand, distance: f64 },
    /// A hand returned within the reach radius.
    ReachCompleted { sample: ReachSample },
    /// The proximity sentiment tier changed.
    ProximityChanged {
        from: ProximityTier,
        to: ProximityTier,
    },
}

impl InteractionEvent {
    /// Convert the event to an IPC s-expression.
    pub fn to_sexp(&self) -> String {
        match self {
            Self::GazeAcquired {
                target_id,
                angle_deg,
            } => {
                format!(
                    "(:type :event :event :gaze-acquired :target-id {} :angle-deg {:.1})",
                    target_id, angle_deg
                )
            }
            Self::GazeLost { target_id } => {
                format!(
                    "(:type :event :event :gaze-lost :target-id {})",
                    target_id
                )
            }
            Self::AttentionLost { at_ms } => {
                format!("(:type :event :event :attention-lost :at-ms {:.1})", at_ms)
            }
            Self::AttentionRegained { away_s } => {
                format!(
                    "(:type :event :event :attention-regained :away-s {:.2})",
                    away_s
                )
            }
            Self::ReachStarted { hand, distance } => {
                format!(
                    "(:type :event :event :reach-started :hand :{} :distance {:.3})",
                    hand.as_str(),
                    distance
                )
            }
            Self::ReachCompleted { sample } => {
                format!(
                    "(:type :event :event :reach-completed :hand :{} :speed {:.2} :elapsed-s {:.2} :distance {:.3})",
                    sample.hand.as_str(),
                    sample.speed,
                    sample.elapsed_s,
                    sample.distance
                )
            }
            Self::ProximityChanged { from, to } => {
                format!(
                    "(:type :event :event :proximity-changed :from :{} :to :{})",
                    from.as_str(),
                    to.as_str()
                )
            }
        }
    }
}

// ── Tests ───────────────────────────────────────────────────
