//! Freshness tunables.
//!
//! Staleness windows for the cached-reading accessors. Defaults match
//! the sensor broadcast rates this core was written against: air data
//! arrives at tens of Hz, so a 250 ms pressure window already spans
//! several missed frames; temperature rides on the same frame but is a
//! lower-trust signal and gets a tighter 100 ms window.

use serde::{Deserialize, Serialize};

/// Staleness windows applied by the cached-reading accessors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Timeouts {
    /// Maximum age (ms) before a cached pressure reads as unavailable.
    pub pressure_timeout_ms: u32,
    /// Maximum age (ms) before a cached temperature reads as unavailable.
    pub temperature_timeout_ms: u32,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            pressure_timeout_ms: 250,
            temperature_timeout_ms: 100,
        }
    }
}

/// Errors from config validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl Timeouts {
    /// Range-check the windows before use.
    ///
    /// Both windows must be non-zero, and the temperature window may not
    /// exceed the pressure window — temperature is cached from the same
    /// frames, so a looser gate would report temperature on data already
    /// judged too old for pressure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pressure_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "pressure_timeout_ms must be non-zero",
            ));
        }
        if self.temperature_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "temperature_timeout_ms must be non-zero",
            ));
        }
        if self.temperature_timeout_ms > self.pressure_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "temperature_timeout_ms must not exceed pressure_timeout_ms",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sensor_rates() {
        let t = Timeouts::default();
        assert_eq!(t.pressure_timeout_ms, 250);
        assert_eq!(t.temperature_timeout_ms, 100);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn zero_windows_rejected() {
        let t = Timeouts {
            pressure_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(ConfigError::ValidationFailed(_))));

        let t = Timeouts {
            temperature_timeout_ms: 0,
            ..Default::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn temperature_window_must_be_tighter() {
        let t = Timeouts {
            pressure_timeout_ms: 100,
            temperature_timeout_ms: 250,
        };
        assert!(matches!(t.validate(), Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn serde_roundtrip() {
        let t = Timeouts::default();
        let json = serde_json::to_string(&t).unwrap();
        let t2: Timeouts = serde_json::from_str(&json).unwrap();
        assert_eq!(t.pressure_timeout_ms, t2.pressure_timeout_ms);
        assert_eq!(t.temperature_timeout_ms, t2.temperature_timeout_ms);
    }

    #[test]
    fn postcard_roundtrip() {
        let t = Timeouts::default();
        let bytes = postcard::to_allocvec(&t).unwrap();
        let t2: Timeouts = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(t.pressure_timeout_ms, t2.pressure_timeout_ms);
    }
}
