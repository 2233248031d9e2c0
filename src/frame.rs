//! Decoded measurement frames delivered by the CAN transport.
//!
//! The transport owns the wire schema; by the time a frame reaches this
//! crate it is already a plain struct. Two frame kinds matter here:
//! raw air data (differential pressure + optional outside-air
//! temperature) and the hygrometer broadcast some airspeed probes emit.

/// 0 °C in Kelvin.
const KELVIN_OFFSET: f32 = 273.15;

/// Convert an absolute temperature to Celsius.
pub fn kelvin_to_celsius(kelvin: f32) -> f32 {
    kelvin - KELVIN_OFFSET
}

/// Decoded `RawAirData` broadcast.
///
/// Probes that do not measure temperature transmit NaN in
/// `static_air_temperature_k`; see [`AirDataFrame::temperature_c`].
#[derive(Debug, Clone, Copy)]
pub struct AirDataFrame {
    /// Differential (pitot − static) pressure in Pascal.
    pub differential_pressure_pa: f32,
    /// Outside air temperature in Kelvin, NaN if not measured.
    pub static_air_temperature_k: f32,
}

impl AirDataFrame {
    /// Temperature in Celsius, if the frame carries a usable one.
    ///
    /// A temperature is accepted only if it is finite and above 0 K —
    /// anything else (NaN sentinel, infinities, sub-absolute-zero
    /// garbage) is dropped for this frame without affecting the
    /// pressure field.
    pub fn temperature_c(&self) -> Option<f32> {
        let k = self.static_air_temperature_k;
        if k.is_finite() && k > 0.0 {
            Some(kelvin_to_celsius(k))
        } else {
            None
        }
    }
}

/// Decoded hygrometer broadcast.
#[derive(Debug, Clone, Copy)]
pub struct HygrometerFrame {
    /// Air temperature at the sensing element, Kelvin.
    pub temperature_k: f32,
    /// Relative humidity, percent.
    pub humidity_pct: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(kelvin: f32) -> AirDataFrame {
        AirDataFrame {
            differential_pressure_pa: 120.0,
            static_air_temperature_k: kelvin,
        }
    }

    #[test]
    fn plausible_temperature_accepted() {
        // 15 °C standard atmosphere
        let t = frame(288.15).temperature_c().unwrap();
        assert!((t - 15.0).abs() < 1e-3);
    }

    #[test]
    fn nan_sentinel_rejected() {
        assert!(frame(f32::NAN).temperature_c().is_none());
    }

    #[test]
    fn infinities_rejected() {
        assert!(frame(f32::INFINITY).temperature_c().is_none());
        assert!(frame(f32::NEG_INFINITY).temperature_c().is_none());
    }

    #[test]
    fn absolute_zero_and_below_rejected() {
        assert!(frame(0.0).temperature_c().is_none());
        assert!(frame(-4.0).temperature_c().is_none());
    }

    #[test]
    fn stratospheric_cold_still_accepted() {
        // 216.65 K is a real temperature at cruise altitude.
        let t = frame(216.65).temperature_c().unwrap();
        assert!(t < -50.0);
    }
}
