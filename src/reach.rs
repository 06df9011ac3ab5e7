//! Reach timing — how fast a hand returns to a target's vicinity.
//!
//! Per-hand state machine: an attempt opens when the hand leaves the reach
//! radius and closes when it re-enters, emitting the straight-line speed
//! of the excursion. Left and right hands are fully independent.

use tracing::debug;

use crate::math::Vec3;
use crate::pose::Hand;

// ── Config ──────────────────────────────────────────────────

/// Reach-distance configuration.
#[derive(Debug, Clone)]
pub struct ReachConfig {
    /// Hand-to-target distance below which the hand counts as "at" the
    /// target.
    pub radius: f64,
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self { radius: 0.2 }
    }
}

// ── Attempt / sample ────────────────────────────────────────

/// An excursion in progress: the hand left the reach radius here.
#[derive(Debug, Clone, Copy)]
struct ReachAttempt {
    start_timestamp_ms: f64,
    start_position: Vec3,
}

/// Emitted when a hand re-enters the reach radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachSample {
    pub hand: Hand,
    /// Straight-line distance from departure point to re-entry point.
    pub distance: f64,
    /// Excursion duration in seconds.
    pub elapsed_s: f64,
    /// `distance / elapsed_s` in units per second.
    pub speed: f64,
}

// ── ReachTracker ────────────────────────────────────────────

/// Per-hand reach state machines sharing one radius configuration.
#[derive(Debug, Default)]
pub struct ReachTracker {
    pub config: ReachConfig,
    attempts: [Option<ReachAttempt>; 2],
}

impl ReachTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a hand currently has an attempt in progress.
    pub fn is_retreating(&self, hand: Hand) -> bool {
        self.attempts[hand.index()].is_some()
    }

    /// Feed one hand's position against the target position for this frame.
    ///
    /// Returns a completed [`ReachSample`] on the retreating-to-idle edge.
    /// A re-entry with zero elapsed time is a degenerate attempt and is
    /// discarded without emission.
    pub fn update(
        &mut self,
        hand: Hand,
        hand_position: Vec3,
        target_position: Vec3,
        timestamp_ms: f64,
    ) -> Option<ReachSample> {
        let distance = hand_position.distance_to(target_position);
        let slot = &mut self.attempts[hand.index()];

        match slot.take() {
            // Idle: open an attempt once the hand leaves the radius.
            None => {
                if distance > self.config.radius {
                    debug!(
                        hand = hand.as_str(),
                        distance, "hand left reach radius, attempt started"
                    );
                    *slot = Some(ReachAttempt {
                        start_timestamp_ms: timestamp_ms,
                        start_position: hand_position,
                    });
                }
                None
            }
            // Retreating: close the attempt when the hand is back within
            // the radius, otherwise keep waiting.
            Some(attempt) => {
                if distance > self.config.radius {
                    *slot = Some(attempt);
                    return None;
                }
                let elapsed_s = (timestamp_ms - attempt.start_timestamp_ms) / 1000.0;
                if elapsed_s <= 0.0 {
                    debug!(hand = hand.as_str(), "degenerate reach attempt discarded");
                    return None;
                }
                let travelled = attempt.start_position.distance_to(hand_position);
                Some(ReachSample {
                    hand,
                    distance: travelled,
                    elapsed_s,
                    speed: travelled / elapsed_s,
                })
            }
        }
    }

    /// Abandon any in-progress attempts.
    pub fn reset(&mut self) {
        self.attempts = [None, None];
    }
}

// ── Tests ───────────────────────────────────────────────────
