//! Proximity and height sentiment classification.
//!
//! Pure threshold buckets over viewer-to-target geometry; no state.

// ── ProximityTier ───────────────────────────────────────────

/// Distance sentiment between the viewer and a target's attention point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityTier {
    /// Distance below 1.0 units.
    VeryClose,
    /// Distance in [1.0, 3.0).
    Close,
    /// Distance at or beyond 3.0 units.
    Far,
}

impl ProximityTier {
    /// Classify a viewer-to-attention-point distance.
    pub fn classify(distance: f64) -> Self {
        if distance < 1.0 {
            Self::VeryClose
        } else if distance < 3.0 {
            Self::Close
        } else {
            Self::Far
        }
    }

    /// String representation for IPC and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryClose => "very-close",
            Self::Close => "close",
            Self::Far => "far",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "very-close" => Some(Self::VeryClose),
            "close" => Some(Self::Close),
            "far" => Some(Self::Far),
            _ => None,
        }
    }
}

// ── HeightTier ──────────────────────────────────────────────

/// Vertical sentiment from the viewer-head-Y minus attention-point-Y
/// difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightTier {
    /// Difference above +0.5: viewer is above the target's eye point.
    LookingDown,
    /// Difference within [-0.5, +0.5].
    AtEyeLevel,
    /// Difference below -0.5: viewer is below the target's eye point.
    LookingUp,
}

impl HeightTier {
    /// Classify a height difference (`viewer_y - attention_y`).
    pub fn classify(height_difference: f64) -> Self {
        if height_difference > 0.5 {
            Self::LookingDown
        } else if height_difference < -0.5 {
            Self::LookingUp
        } else {
            Self::AtEyeLevel
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LookingDown => "looking-down",
            Self::AtEyeLevel => "at-eye-level",
            Self::LookingUp => "looking-up",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "looking-down" => Some(Self::LookingDown),
            "at-eye-level" => Some(Self::AtEyeLevel),
            "looking-up" => Some(Self::LookingUp),
            _ => None,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────
