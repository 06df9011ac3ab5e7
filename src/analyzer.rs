//! Central per-frame orchestrator.
//!
//! Owns every piece of mutable analysis state and runs the fixed pipeline
//! once per rendered frame: gaze and motion first, then the consumers of
//! their outputs (proximity, approach, reach, attention), then snapshot
//! assembly. Single-threaded by construction; the frame loop calls
//! [`InteractionAnalyzer::update`] exactly once per frame.

use tracing::info;

use crate::approach::ApproachEstimator;
use crate::attention::AttentionTimer;
use crate::events::InteractionEvent;
use crate::gaze::{self, GazeConfig, GazeState};
use crate::motion::MotionTracker;
use crate::pose::{Hand, PoseSample, Target, TrackedEntity};
use crate::proximity::{HeightTier, ProximityTier};
use crate::reach::{ReachConfig, ReachTracker};
use crate::snapshot::InteractionSnapshot;

// ── Config ──────────────────────────────────────────────────

/// Analyzer-wide configuration bundle.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub gaze: GazeConfig,
    pub reach: ReachConfig,
}

// ── InteractionAnalyzer ─────────────────────────────────────

/// One analysis session. All histories and timers live here; there are no
/// process-wide globals, so independent sessions (and tests) never share
/// state.
pub struct InteractionAnalyzer {
    config: AnalyzerConfig,
    motion: MotionTracker,
    approach: ApproachEstimator,
    reach: ReachTracker,
    attention: AttentionTimer,
    gaze_state: GazeState,
    last_proximity: Option<ProximityTier>,
    events: Vec<InteractionEvent>,
    frames: u64,
}

impl InteractionAnalyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        info!(
            gaze_deg = config.gaze.selection_threshold_deg,
            looking_deg = config.gaze.looking_at_threshold_deg,
            reach_radius = config.reach.radius,
            "interaction analyzer initialized"
        );
        let mut reach = ReachTracker::new();
        reach.config = config.reach.clone();
        Self {
            config,
            motion: MotionTracker::new(),
            approach: ApproachEstimator::new(),
            reach,
            attention: AttentionTimer::new(),
            gaze_state: GazeState::default(),
            last_proximity: None,
            events: Vec::new(),
            frames: 0,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Frames processed since construction or the last reset.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Gaze state from the most recent frame.
    pub fn gaze_state(&self) -> GazeState {
        self.gaze_state
    }

    // ── Per-frame entry point ───────────────────────────────

    /// Run one frame of analysis.
    ///
    /// `targets` is ordered; the first element is the reference target for
    /// proximity, height, approach, reach, and attention, and list order
    /// breaks gaze-angle ties. Hand poses are optional; an absent hand is
    /// skipped for the frame without resetting its history.
    pub fn update(
        &mut self,
        frame_timestamp_ms: f64,
        viewer: &PoseSample,
        left_hand: Option<&PoseSample>,
        right_hand: Option<&PoseSample>,
        targets: &[Target],
    ) -> InteractionSnapshot {
        self.frames += 1;

        // Stage 1: gaze and raw motion, producers for everything below.
        let gaze_now = gaze::detect(&self.config.gaze, viewer, targets);
        self.diff_gaze(gaze_now);

        let head_speed = self.motion.update(TrackedEntity::Head, viewer);
        let left_speed =
            left_hand.and_then(|s| self.motion.update(TrackedEntity::Hand(Hand::Left), s));
        let right_speed =
            right_hand.and_then(|s| self.motion.update(TrackedEntity::Hand(Hand::Right), s));

        // Stage 2: reference-relative signals.
        let reference = targets.first();
        let mut height_difference = None;
        let mut height_tier = None;
        let mut proximity_distance = None;
        let mut proximity_tier = None;
        let mut approach_speed = None;
        let mut reach = [None, None];

        if let Some(reference) = reference {
            let attention_point = reference.attention_point();

            let diff = viewer.position.y - attention_point.y;
            height_difference = Some(diff);
            height_tier = Some(HeightTier::classify(diff));

            let distance = viewer.position.distance_to(attention_point);
            proximity_distance = Some(distance);
            let tier = ProximityTier::classify(distance);
            proximity_tier = Some(tier);
            if let Some(prev) = self.last_proximity {
                if prev != tier {
                    self.events
                        .push(InteractionEvent::ProximityChanged { from: prev, to: tier });
                }
            }
            self.last_proximity = Some(tier);

            approach_speed =
                self.approach
                    .update(viewer.position, attention_point, frame_timestamp_ms);

            for (hand, pose) in [(Hand::Left, left_hand), (Hand::Right, right_hand)] {
                let Some(pose) = pose else { continue };
                let was_retreating = self.reach.is_retreating(hand);
                let sample = self.reach.update(
                    hand,
                    pose.position,
                    reference.position,
                    frame_timestamp_ms,
                );
                if !was_retreating && self.reach.is_retreating(hand) {
                    self.events.push(InteractionEvent::ReachStarted {
                        hand,
                        distance: pose.position.distance_to(reference.position),
                    });
                }
                if let Some(sample) = sample {
                    self.events
                        .push(InteractionEvent::ReachCompleted { sample });
                }
                reach[hand.index()] = sample;
            }
        }

        // Stage 3: attention, keyed off this frame's looking-at boolean.
        let was_away = self.attention.is_away();
        let completed = self
            .attention
            .update(gaze_now.looking_at_reference, frame_timestamp_ms);
        if !was_away && self.attention.is_away() {
            self.events.push(InteractionEvent::AttentionLost {
                at_ms: frame_timestamp_ms,
            });
        }
        if let Some(away_s) = completed {
            self.events
                .push(InteractionEvent::AttentionRegained { away_s });
        }

        InteractionSnapshot {
            frame_timestamp_ms,
            height_difference,
            height_tier,
            proximity_distance,
            proximity_tier,
            approach_speed,
            head_speed,
            left_hand_speed: left_speed,
            right_hand_speed: right_speed,
            gaze_target: gaze_now.hit.map(|h| h.target_id),
            gaze_angle_deg: gaze_now.hit.map(|h| h.angle_deg),
            looking_at_reference: gaze_now.looking_at_reference,
            away_duration_s: self.attention.last_away_duration_s(),
            reach,
        }
    }

    fn diff_gaze(&mut self, now: GazeState) {
        let prev_id = self.gaze_state.hit.map(|h| h.target_id);
        let now_id = now.hit.map(|h| h.target_id);
        if prev_id != now_id {
            if let Some(target_id) = prev_id {
                self.events.push(InteractionEvent::GazeLost { target_id });
            }
            if let Some(hit) = now.hit {
                self.events.push(InteractionEvent::GazeAcquired {
                    target_id: hit.target_id,
                    angle_deg: hit.angle_deg,
                });
            }
        }
        self.gaze_state = now;
    }

    // ── Events ──────────────────────────────────────────────

    /// Take all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Runtime tuning (IPC setters) ────────────────────────

    /// Set the gaze selection threshold in degrees.
    pub fn set_gaze_threshold(&mut self, deg: f64) {
        self.config.gaze.selection_threshold_deg = deg;
        info!("gaze selection threshold set to {:.1} deg", deg);
    }

    /// Set the reference looking-at threshold in degrees.
    pub fn set_looking_threshold(&mut self, deg: f64) {
        self.config.gaze.looking_at_threshold_deg = deg;
        info!("looking-at threshold set to {:.1} deg", deg);
    }

    /// Set the reach radius in scene units.
    pub fn set_reach_radius(&mut self, radius: f64) {
        self.config.reach.radius = radius;
        self.reach.config.radius = radius;
        info!("reach radius set to {:.3}", radius);
    }

    // ── Reporting ───────────────────────────────────────────

    /// Generate an IPC config s-expression.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:gaze-threshold-deg {:.1} :looking-threshold-deg {:.1} :reach-radius {:.3})",
            self.config.gaze.selection_threshold_deg,
            self.config.gaze.looking_at_threshold_deg,
            self.config.reach.radius,
        )
    }

    /// Generate an IPC status s-expression.
    pub fn status_sexp(&self) -> String {
        let gaze = self
            .gaze_state
            .hit
            .map(|h| h.target_id.to_string())
            .unwrap_or_else(|| "nil".to_string());
        format!(
            "(:frames {} :gaze-target {} :looking {} :away {} :away-s {:.2} :retreating-left {} :retreating-right {} :pending-events {})",
            self.frames,
            gaze,
            if self.gaze_state.looking_at_reference { "t" } else { "nil" },
            if self.attention.is_away() { "t" } else { "nil" },
            self.attention.last_away_duration_s(),
            if self.reach.is_retreating(Hand::Left) { "t" } else { "nil" },
            if self.reach.is_retreating(Hand::Right) { "t" } else { "nil" },
            self.events.len(),
        )
    }

    /// Discard all histories, timers, and queued events; configuration is
    /// kept. Equivalent to starting a fresh session.
    pub fn reset(&mut self) {
        self.motion.reset();
        self.approach.reset();
        self.reach.reset();
        self.attention.reset();
        self.gaze_state = GazeState::default();
        self.last_proximity = None;
        self.events.clear();
        self.frames = 0;
        info!("interaction analyzer reset");
    }
}

impl Default for InteractionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Quat, Vec3};

    fn viewer(x: f64, y: f64, z: f64, t_ms: f64) -> PoseSample {
        PoseSample::new(Vec3::new(x, y, z), Quat::IDENTITY, t_ms)
    }

    fn hand(x: f64, y: f64, z: f64, t_ms: f64) -> PoseSample {
        PoseSample::new(Vec3::new(x, y, z), Quat::IDENTITY, t_ms)
    }

    /// Reference target 3 units down -Z with a 0.9 eye-point offset,
    /// matching a child-sized figure the viewer faces by default.
    fn npc() -> Target {
        Target::new(1, Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.9, 0.0))
    }

    #[test]
    fn test_snapshot_reference_fields() {
        let mut analyzer = InteractionAnalyzer::new();
        let snap = analyzer.update(0.0, &viewer(0.0, 1.6, 0.0, 0.0), None, None, &[npc()]);

        let diff = snap.height_difference.expect("reference present");
        assert!((diff - 0.7).abs() < 1e-9);
        assert_eq!(snap.height_tier, Some(HeightTier::LookingDown));
        let dist = snap.proximity_distance.expect("reference present");
        assert!((dist - (3.0f64.powi(2) + 0.7f64.powi(2)).sqrt()).abs() < 1e-9);
        assert_eq!(snap.proximity_tier, Some(ProximityTier::Far));
        // First frame: no speeds anywhere.
        assert_eq!(snap.approach_speed, None);
        assert_eq!(snap.head_speed, None);
    }

    #[test]
    fn test_empty_target_list_degrades() {
        let mut analyzer = InteractionAnalyzer::new();
        let snap = analyzer.update(0.0, &viewer(0.0, 1.6, 0.0, 0.0), None, None, &[]);
        assert_eq!(snap.height_difference, None);
        assert_eq!(snap.proximity_tier, None);
        assert_eq!(snap.gaze_target, None);
        // Head history still advances across empty-target frames.
        let snap = analyzer.update(1000.0, &viewer(1.0, 1.6, 0.0, 1000.0), None, None, &[]);
        assert!((snap.head_speed.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_approach_toward_reference() {
        let mut analyzer = InteractionAnalyzer::new();
        // Stay at eye height of the attention point so separation is pure Z.
        analyzer.update(0.0, &viewer(0.0, 0.9, 2.0, 0.0), None, None, &[npc()]);
        let snap = analyzer.update(2000.0, &viewer(0.0, 0.9, 0.0, 2000.0), None, None, &[npc()]);
        // Separation went 5.0 -> 3.0 over 2 seconds.
        let speed = snap.approach_speed.expect("two samples");
        assert!((speed - 1.0).abs() < 1e-9, "got {}", speed);
    }

    #[test]
    fn test_gaze_events_on_edges() {
        let mut analyzer = InteractionAnalyzer::new();
        // Facing the target dead-on.
        analyzer.update(0.0, &viewer(0.0, 0.9, 0.0, 0.0), None, None, &[npc()]);
        let events = analyzer.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, InteractionEvent::GazeAcquired { target_id: 1, .. })));

        // Turn away: lose the gaze target and start the away timer.
        let turned = PoseSample::new(
            Vec3::new(0.0, 0.9, 0.0),
            Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), std::f64::consts::FRAC_PI_2),
            1000.0,
        );
        analyzer.update(1000.0, &turned, None, None, &[npc()]);
        let events = analyzer.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, InteractionEvent::GazeLost { target_id: 1 })));
        assert!(events
            .iter()
            .any(|e| matches!(e, InteractionEvent::AttentionLost { .. })));

        // Look back after 3.5 seconds.
        let snap = analyzer.update(4500.0, &viewer(0.0, 0.9, 0.0, 4500.0), None, None, &[npc()]);
        assert!((snap.away_duration_s - 3.5).abs() < 1e-9);
        let events = analyzer.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            InteractionEvent::AttentionRegained { away_s } if (away_s - 3.5).abs() < 1e-9
        )));
    }

    #[test]
    fn test_away_duration_overwrites() {
        let mut analyzer = InteractionAnalyzer::new();
        let away = PoseSample::new(
            Vec3::new(0.0, 0.9, 0.0),
            Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), std::f64::consts::FRAC_PI_2),
            0.0,
        );
        analyzer.update(0.0, &viewer(0.0, 0.9, 0.0, 0.0), None, None, &[npc()]);
        analyzer.update(1000.0, &away, None, None, &[npc()]);
        analyzer.update(4500.0, &viewer(0.0, 0.9, 0.0, 4500.0), None, None, &[npc()]);
        analyzer.update(10_000.0, &away, None, None, &[npc()]);
        let snap = analyzer.update(11_000.0, &viewer(0.0, 0.9, 0.0, 11_000.0), None, None, &[npc()]);
        assert!((snap.away_duration_s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_hand_reach_cycle_through_update() {
        let mut analyzer = InteractionAnalyzer::new();
        let target = npc();
        // Hand on the target's base position, then out, then back.
        analyzer.update(
            0.0,
            &viewer(0.0, 0.9, 0.0, 0.0),
            None,
            Some(&hand(0.0, 0.0, -3.0, 0.0)),
            &[target],
        );
        analyzer.update(
            100.0,
            &viewer(0.0, 0.9, 0.0, 100.0),
            None,
            Some(&hand(0.0, 0.0, -2.5, 100.0)),
            &[target],
        );
        let events = analyzer.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, InteractionEvent::ReachStarted { hand: Hand::Right, .. })));

        let snap = analyzer.update(
            600.0,
            &viewer(0.0, 0.9, 0.0, 600.0),
            None,
            Some(&hand(0.0, 0.0, -2.9, 600.0)),
            &[target],
        );
        let sample = snap.reach_for(Hand::Right).expect("reach completed");
        assert!((sample.elapsed_s - 0.5).abs() < 1e-9);
        assert!((sample.distance - 0.4).abs() < 1e-9);
        assert!((sample.speed - 0.8).abs() < 1e-9);
        let events = analyzer.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, InteractionEvent::ReachCompleted { .. })));
    }

    #[test]
    fn test_missing_hand_keeps_history() {
        let mut analyzer = InteractionAnalyzer::new();
        let target = npc();
        analyzer.update(
            0.0,
            &viewer(0.0, 0.9, 0.0, 0.0),
            Some(&hand(0.0, 0.0, 0.0, 0.0)),
            None,
            &[target],
        );
        // Hand untracked for a frame.
        let snap = analyzer.update(500.0, &viewer(0.0, 0.9, 0.0, 500.0), None, None, &[target]);
        assert_eq!(snap.left_hand_speed, None);
        // Reappears: speed measured against the pre-gap baseline.
        let snap = analyzer.update(
            1000.0,
            &viewer(0.0, 0.9, 0.0, 1000.0),
            Some(&hand(2.0, 0.0, 0.0, 1000.0)),
            None,
            &[target],
        );
        assert!((snap.left_hand_speed.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_frame_is_idempotent() {
        let mut analyzer = InteractionAnalyzer::new();
        let target = npc();
        let v = viewer(0.0, 0.9, 1.0, 0.0);
        let h = hand(0.0, 0.0, -2.0, 0.0);
        analyzer.update(0.0, &v, Some(&h), None, &[target]);

        let v2 = viewer(0.0, 0.9, 0.5, 1000.0);
        let first = analyzer.update(1000.0, &v2, Some(&h), None, &[target]);
        analyzer.drain_events();
        // Identical inputs, identical timestamp: all speed paths suppressed,
        // no new transition events, histories untouched.
        let second = analyzer.update(1000.0, &v2, Some(&h), None, &[target]);
        assert_eq!(second.head_speed, None);
        assert_eq!(second.approach_speed, None);
        assert_eq!(second.left_hand_speed, None);
        assert!(analyzer.drain_events().is_empty());
        assert_eq!(second.gaze_target, first.gaze_target);
        assert_eq!(second.away_duration_s, first.away_duration_s);

        // The baseline from t=0 still applies afterwards.
        let third = analyzer.update(2000.0, &viewer(0.0, 0.9, 0.0, 2000.0), None, None, &[target]);
        assert!(third.head_speed.is_some());
    }

    #[test]
    fn test_proximity_change_event() {
        let mut analyzer = InteractionAnalyzer::new();
        let target = npc();
        analyzer.update(0.0, &viewer(0.0, 0.9, 2.0, 0.0), None, None, &[target]);
        analyzer.drain_events();
        let snap = analyzer.update(1000.0, &viewer(0.0, 0.9, -0.5, 1000.0), None, None, &[target]);
        assert_eq!(snap.proximity_tier, Some(ProximityTier::Close));
        let events = analyzer.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            InteractionEvent::ProximityChanged {
                from: ProximityTier::Far,
                to: ProximityTier::Close,
            }
        )));
    }

    #[test]
    fn test_reset_clears_session() {
        let mut analyzer = InteractionAnalyzer::new();
        analyzer.update(0.0, &viewer(0.0, 0.9, 0.0, 0.0), None, None, &[npc()]);
        analyzer.reset();
        assert_eq!(analyzer.frame_count(), 0);
        assert!(analyzer.drain_events().is_empty());
        let snap = analyzer.update(5000.0, &viewer(1.0, 0.9, 0.0, 5000.0), None, None, &[npc()]);
        // Fresh history: no speed on the first post-reset frame.
        assert_eq!(snap.head_speed, None);
    }

    #[test]
    fn test_status_and_config_sexp() {
        let mut analyzer = InteractionAnalyzer::new();
        analyzer.update(0.0, &viewer(0.0, 0.9, 0.0, 0.0), None, None, &[npc()]);
        let status = analyzer.status_sexp();
        assert!(status.contains(":frames 1"));
        assert!(status.contains(":gaze-target 1"));
        assert!(status.contains(":looking t"));

        let config = analyzer.config_sexp();
        assert!(config.contains(":gaze-threshold-deg 10.0"));
        assert!(config.contains(":looking-threshold-deg 15.0"));
        assert!(config.contains(":reach-radius 0.200"));
    }
}
