//! Input data model — per-frame pose samples and tracked targets.
//!
//! The external sampler owns these; the analyzer only reads them and
//! compares consecutive frames.

use crate::math::{Quat, Vec3};

// ── Hand ────────────────────────────────────────────────────

/// Which hand controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Index into per-hand arrays (left = 0, right = 1).
    pub fn index(&self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// String representation for IPC and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

// ── Tracked entities ────────────────────────────────────────

/// Entities whose motion is tracked frame to frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedEntity {
    Head,
    Hand(Hand),
}

impl TrackedEntity {
    /// Index into the motion-history array.
    pub fn index(&self) -> usize {
        match self {
            Self::Head => 0,
            Self::Hand(h) => 1 + h.index(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Hand(Hand::Left) => "left-hand",
            Self::Hand(Hand::Right) => "right-hand",
        }
    }
}

/// Number of motion-history slots (head + two hands).
pub const TRACKED_ENTITY_COUNT: usize = 3;

// ── PoseSample ──────────────────────────────────────────────

/// One tracked entity's pose for one frame.
#[derive(Debug, Clone, Copy)]
pub struct PoseSample {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
    /// Frame timestamp in milliseconds.
    pub timestamp_ms: f64,
}

impl PoseSample {
    pub fn new(position: Vec3, orientation: Quat, timestamp_ms: f64) -> Self {
        Self {
            position,
            orientation,
            timestamp_ms,
        }
    }
}

// ── Target ──────────────────────────────────────────────────

/// An externally managed object the viewer can attend to.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    /// Stable identifier assigned by the scene owner.
    pub id: u64,
    /// Base world-space position.
    pub position: Vec3,
    /// Offset added to `position` to approximate the eye point.
    pub attention_offset: Vec3,
}

impl Target {
    pub fn new(id: u64, position: Vec3, attention_offset: Vec3) -> Self {
        Self {
            id,
            position,
            attention_offset,
        }
    }

    /// The point gaze, proximity, and height comparisons are made against.
    pub fn attention_point(&self) -> Vec3 {
        self.position + self.attention_offset
    }
}

// ── Tests ───────────────────────────────────────────────────
