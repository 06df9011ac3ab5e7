//! Attention timing — how long the viewer has looked away from the
//! reference target.
//!
//! Two-state machine keyed off the gaze detector's looking-at boolean.
//! The reported duration is the most recently completed away interval,
//! not a running total.

use tracing::debug;

// ── AttentionTimer ──────────────────────────────────────────

/// Looking/Away state with completed-interval duration reporting.
#[derive(Debug, Default)]
pub struct AttentionTimer {
    /// Set while the viewer is away; holds the transition timestamp.
    away_start_ms: Option<f64>,
    /// Duration of the last completed away interval, in seconds.
    last_away_duration_s: f64,
}

impl AttentionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the viewer is currently away.
    pub fn is_away(&self) -> bool {
        self.away_start_ms.is_some()
    }

    /// Duration of the most recently completed away interval (seconds);
    /// 0.0 before the first completed interval.
    pub fn last_away_duration_s(&self) -> f64 {
        self.last_away_duration_s
    }

    /// Feed this frame's looking-at boolean.
    ///
    /// Returns `Some(duration_s)` on the away-to-looking edge; the stored
    /// duration is overwritten, not accumulated. Self-loops change
    /// nothing.
    pub fn update(&mut self, looking: bool, timestamp_ms: f64) -> Option<f64> {
        match (self.away_start_ms, looking) {
            // Looking -> Away: start the timer.
            (None, false) => {
                self.away_start_ms = Some(timestamp_ms);
                debug!(timestamp_ms, "gaze left the reference target");
                None
            }
            // Away -> Looking: close the interval.
            (Some(start_ms), true) => {
                let duration_s = (timestamp_ms - start_ms) / 1000.0;
                self.away_start_ms = None;
                self.last_away_duration_s = duration_s;
                debug!(duration_s, "gaze returned to the reference target");
                Some(duration_s)
            }
            // Self-loops.
            _ => None,
        }
    }

    /// Return to the initial Looking state and clear the duration.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ── Tests ───────────────────────────────────────────────────
