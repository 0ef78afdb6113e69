//! Live-tunable HSV threshold trackbars.
//!
//! The six values live in an explicit [`ThresholdControls`] value owned by
//! whoever drives the playback loop. UI front-ends write through
//! [`ThresholdControls::set`] and the loop reads [`ThresholdControls::bounds`]
//! once per frame.

use anyhow::{Context, Result};
use std::path::Path;
use crate::models::HsvBounds;

pub const PANEL_TITLE: &str = "TrackedBars";
pub const HUE_MAX: u8 = 179;
pub const SAT_VAL_MAX: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackbarId {
    HueMin,
    HueMax,
    SatMin,
    SatMax,
    ValMin,
    ValMax,
}

impl TrackbarId {
    pub const ALL: [TrackbarId; 6] = [
        TrackbarId::HueMin,
        TrackbarId::HueMax,
        TrackbarId::SatMin,
        TrackbarId::SatMax,
        TrackbarId::ValMin,
        TrackbarId::ValMax,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TrackbarId::HueMin => "Hue Min",
            TrackbarId::HueMax => "Hue Max",
            TrackbarId::SatMin => "Sat Min",
            TrackbarId::SatMax => "Sat Max",
            TrackbarId::ValMin => "Val Min",
            TrackbarId::ValMax => "Val Max",
        }
    }

    pub fn max(self) -> u8 {
        match self {
            TrackbarId::HueMin | TrackbarId::HueMax => HUE_MAX,
            _ => SAT_VAL_MAX,
        }
    }

    pub fn initial(self) -> u8 {
        match self {
            TrackbarId::HueMin => 40,
            TrackbarId::HueMax => 65,
            TrackbarId::SatMin => 120,
            TrackbarId::SatMax => 255,
            TrackbarId::ValMin => 50,
            TrackbarId::ValMax => 255,
        }
    }

    fn index(self) -> usize {
        match self {
            TrackbarId::HueMin => 0,
            TrackbarId::HueMax => 1,
            TrackbarId::SatMin => 2,
            TrackbarId::SatMax => 3,
            TrackbarId::ValMin => 4,
            TrackbarId::ValMax => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trackbar {
    pub id: TrackbarId,
    pub value: u8,
}

impl Trackbar {
    pub fn label(&self) -> &'static str {
        self.id.label()
    }

    pub fn max(&self) -> u8 {
        self.id.max()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdControls {
    bars: [Trackbar; 6],
}

impl ThresholdControls {
    pub fn new() -> Self {
        Self {
            bars: TrackbarId::ALL.map(|id| Trackbar { id, value: id.initial() }),
        }
    }

    /// Start from a saved range instead of the initial slider positions
    pub fn from_bounds(bounds: &HsvBounds) -> Self {
        let mut controls = Self::new();
        controls.set_bounds(bounds);
        controls
    }

    /// Store a slider position, clamped to the slider's range
    pub fn set(&mut self, id: TrackbarId, value: i32) -> u8 {
        let clamped = value.clamp(0, id.max() as i32) as u8;
        self.bars[id.index()].value = clamped;
        clamped
    }

    pub fn get(&self, id: TrackbarId) -> u8 {
        self.bars[id.index()].value
    }

    pub fn set_bounds(&mut self, bounds: &HsvBounds) {
        self.set(TrackbarId::HueMin, bounds.lower[0] as i32);
        self.set(TrackbarId::SatMin, bounds.lower[1] as i32);
        self.set(TrackbarId::ValMin, bounds.lower[2] as i32);
        self.set(TrackbarId::HueMax, bounds.upper[0] as i32);
        self.set(TrackbarId::SatMax, bounds.upper[1] as i32);
        self.set(TrackbarId::ValMax, bounds.upper[2] as i32);
    }

    /// Current range; min <= max is not checked
    pub fn bounds(&self) -> HsvBounds {
        use TrackbarId::*;
        HsvBounds::new(
            [self.get(HueMin), self.get(SatMin), self.get(ValMin)],
            [self.get(HueMax), self.get(SatMax), self.get(ValMax)],
        )
    }

    pub fn trackbars(&self) -> impl Iterator<Item = &Trackbar> {
        self.bars.iter()
    }
}

impl Default for ThresholdControls {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a JSON threshold preset
pub fn load_preset(path: &Path) -> Result<HsvBounds> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read threshold preset {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid threshold preset {}", path.display()))
}

/// Write the range as a JSON threshold preset
pub fn save_preset(path: &Path, bounds: &HsvBounds) -> Result<()> {
    let json = serde_json::to_string_pretty(bounds)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write threshold preset {}", path.display()))
}
