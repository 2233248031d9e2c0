//! Bound sensor backend and its cached-reading store.
//!
//! One [`AirspeedBackend`] exists per bound physical sensor. The router
//! (frame-delivery context) writes the latest decoded fields under the
//! instance lock; the poll context reads them back through the
//! freshness-gated accessors. The backend never learns about the
//! registry — its lock is strictly the inner lock of the two-level
//! discipline.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Timeouts;
use crate::frame::{AirDataFrame, HygrometerFrame, kelvin_to_celsius};
use crate::identity::DeviceId;
use crate::time::Clock;

/// Latest hygrometer broadcast, kept as long as the backend lives.
#[derive(Debug, Clone, Copy)]
pub struct HygrometerSample {
    /// Capture time, ms monotonic. Callers judge age themselves.
    pub last_sample_ms: u64,
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Fields mutated only by the router, read only by the accessors.
#[derive(Debug, Default)]
struct CachedReadings {
    pressure_pa: f32,
    temperature_c: f32,
    have_temperature: bool,
    /// `None` until the first air-data frame lands.
    last_sample_ms: Option<u64>,
    /// `None` until the first hygrometer frame lands.
    hygrometer: Option<HygrometerSample>,
}

/// Driver instance for one bound DroneCAN airspeed node.
pub struct AirspeedBackend {
    /// Composite identity, set exactly once at bind time.
    bus_id: DeviceId,
    timeouts: Timeouts,
    clock: Arc<dyn Clock>,
    state: Mutex<CachedReadings>,
}

impl core::fmt::Debug for AirspeedBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AirspeedBackend")
            .field("bus_id", &self.bus_id)
            .finish_non_exhaustive()
    }
}

/// One backend exists per bound sensor, so equality is instance
/// identity, not a field-by-field comparison of cached state.
impl PartialEq for AirspeedBackend {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self, other)
    }
}

impl AirspeedBackend {
    pub(crate) fn new(bus_id: DeviceId, timeouts: Timeouts, clock: Arc<dyn Clock>) -> Self {
        Self {
            bus_id,
            timeouts,
            clock,
            state: Mutex::new(CachedReadings::default()),
        }
    }

    /// The identity this backend was bound under. Immutable.
    pub fn bus_id(&self) -> DeviceId {
        self.bus_id
    }

    /// Differential pressure in Pascal, or `None` if no sample has
    /// arrived within the pressure staleness window.
    pub fn pressure(&self) -> Option<f32> {
        let state = self.lock_state();
        let last = state.last_sample_ms?;
        if self.age_ms(last) > u64::from(self.timeouts.pressure_timeout_ms) {
            return None;
        }
        Some(state.pressure_pa)
    }

    /// Outside air temperature in Celsius.
    ///
    /// `None` if no frame has ever carried a usable temperature, or if
    /// the last sample is older than the (tighter) temperature window.
    pub fn temperature(&self) -> Option<f32> {
        let state = self.lock_state();
        if !state.have_temperature {
            return None;
        }
        let last = state.last_sample_ms?;
        if self.age_ms(last) > u64::from(self.timeouts.temperature_timeout_ms) {
            return None;
        }
        Some(state.temperature_c)
    }

    /// Latest hygrometer sample, `None` only if none was ever received.
    /// No staleness gate — the sample carries its own timestamp.
    pub fn hygrometer(&self) -> Option<HygrometerSample> {
        self.lock_state().hygrometer
    }

    /// Router write path for an air-data frame. Pressure is always
    /// taken; the temperature field only if the frame carries a
    /// plausible one (an invalid field never clears a previously set
    /// presence flag).
    pub(crate) fn ingest_air_data(&self, frame: &AirDataFrame) {
        let now = self.clock.now_ms();
        let mut state = self.lock_state();
        state.pressure_pa = frame.differential_pressure_pa;
        if let Some(temperature_c) = frame.temperature_c() {
            state.temperature_c = temperature_c;
            state.have_temperature = true;
        }
        state.last_sample_ms = Some(now);
    }

    /// Router write path for a hygrometer frame.
    pub(crate) fn ingest_hygrometer(&self, frame: &HygrometerFrame) {
        let now = self.clock.now_ms();
        let mut state = self.lock_state();
        state.hygrometer = Some(HygrometerSample {
            last_sample_ms: now,
            temperature_c: kelvin_to_celsius(frame.temperature_k),
            humidity_pct: frame.humidity_pct,
        });
    }

    fn age_ms(&self, last_sample_ms: u64) -> u64 {
        self.clock.now_ms().saturating_sub(last_sample_ms)
    }

    // No code path panics while holding the lock; poisoning can only
    // come from a panicking test, and the readings stay usable.
    fn lock_state(&self) -> MutexGuard<'_, CachedReadings> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
