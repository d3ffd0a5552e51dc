//! Appliance state as inferred from the control panel.

use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// Presence of the two mode indicators at the moment of inspection.
///
/// Recomputed on every invocation; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObservedSignal {
    /// The "automatic" indicator was found on the page.
    pub saw_auto_indicator: bool,
    /// The "stopped" indicator was found on the page.
    pub saw_stop_indicator: bool,
}

impl ObservedSignal {
    /// Derive the appliance state from the observed indicators.
    ///
    /// Exactly one indicator maps to its state; both or neither map to
    /// [`ApplianceState::Unknown`]. Transitional pages and partial loads
    /// produce those combinations and they must not be guessed away.
    #[must_use]
    pub fn state(self) -> ApplianceState {
        match (self.saw_auto_indicator, self.saw_stop_indicator) {
            (true, false) => ApplianceState::On,
            (false, true) => ApplianceState::Off,
            _ => ApplianceState::Unknown,
        }
    }
}

/// Operating state of the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplianceState {
    On,
    Off,
    Unknown,
}

impl ApplianceState {
    /// Whether this state already satisfies `target`.
    #[must_use]
    pub fn satisfies(self, target: Mode) -> bool {
        self == Self::from(target)
    }
}

impl From<Mode> for ApplianceState {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::On => Self::On,
            Mode::Off => Self::Off,
        }
    }
}

impl std::fmt::Display for ApplianceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}
