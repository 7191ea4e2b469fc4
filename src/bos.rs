//! Break of structure: did the most recent swing take out its predecessor?
//!
//! Only the latest labeled point matters. A fresh higher high breaks
//! structure upward, a fresh lower low breaks it downward; every other
//! label reports "no break" while still exposing the point it looked at.

use crate::structure::{MarketStructure, SwingLabel};

const NOTE_UP: &str = "Latest swing printed a higher high; structure broke to the upside.";
const NOTE_DOWN: &str = "Latest swing printed a lower low; structure broke to the downside.";
const NOTE_NONE: &str = "Latest swing did not break structure; no BOS on this snapshot.";
const NOTE_NO_POINTS: &str = "No swing points available yet; BOS cannot be evaluated.";

// ============================================================
// TYPES
// ============================================================

/// Break-of-structure status
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BosStatus {
    BosUp,
    BosDown,
    None,
}

impl BosStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BosStatus::BosUp => "bos_up",
            BosStatus::BosDown => "bos_down",
            BosStatus::None => "none",
        }
    }
}

/// Break direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BosDirection {
    Up,
    Down,
    None,
}

impl BosDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            BosDirection::Up => "up",
            BosDirection::Down => "down",
            BosDirection::None => "none",
        }
    }
}

/// Result of one break-of-structure check
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BosEvent {
    pub status: BosStatus,
    pub direction: BosDirection,
    pub label: Option<SwingLabel>,
    pub price: Option<f64>,
    pub time: Option<i64>,
    pub note: &'static str,
}

// ============================================================
// DETECTION
// ============================================================

impl BosEvent {
    /// The no-data result: nothing to inspect, nothing reported.
    pub fn insufficient() -> Self {
        Self {
            status: BosStatus::None,
            direction: BosDirection::None,
            label: None,
            price: None,
            time: None,
            note: NOTE_NO_POINTS,
        }
    }

    /// Classify the most recent labeled point. `HH` breaks up, `LL` breaks
    /// down, anything else is no break (the inspected point is still
    /// reported).
    pub fn detect(structure: &MarketStructure) -> Self {
        let last = match structure.points.last() {
            Some(point) => point,
            None => return Self::insufficient(),
        };

        let (status, direction, note) = match last.label {
            SwingLabel::HH => (BosStatus::BosUp, BosDirection::Up, NOTE_UP),
            SwingLabel::LL => (BosStatus::BosDown, BosDirection::Down, NOTE_DOWN),
            _ => (BosStatus::None, BosDirection::None, NOTE_NONE),
        };

        Self {
            status,
            direction,
            label: Some(last.label),
            price: Some(last.price),
            time: last.time,
            note,
        }
    }
}

// ============================================================
// TESTS
// ============================================================
