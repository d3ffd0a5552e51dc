//! Requested operating mode.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidModeError;

/// The end state a caller asks the appliance to reach.
///
/// `On` is the appliance's automatic mode, `Off` its stopped mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    On,
    Off,
}

impl Mode {
    /// Lowercase wire name (`"on"` / `"off"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    /// The other mode.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    /// Lenient parse used by the command-line worker.
    ///
    /// Accepts the strict names plus the French and numeric aliases operators
    /// type on the console (`arrêt`, `eteindre`, `stop`, `0`, `allumer`,
    /// `auto`, `start`, `1`, …).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidModeError`] when the input matches no alias.
    pub fn from_alias(input: &str) -> Result<Self, InvalidModeError> {
        match input.trim().to_lowercase().as_str() {
            "off" | "arret" | "arrete" | "arrêt" | "eteindre" | "éteindre" | "stop" | "0" => {
                Ok(Self::Off)
            }
            "on" | "allume" | "allumer" | "auto" | "start" | "1" => Ok(Self::On),
            _ => Err(InvalidModeError(input.to_string())),
        }
    }
}

impl FromStr for Mode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("on") {
            Ok(Self::On)
        } else if s.eq_ignore_ascii_case("off") {
            Ok(Self::Off)
        } else {
            Err(InvalidModeError(s.to_string()))
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
