//! Binding resolver.
//!
//! Called once per logical airspeed instance at subsystem init, with the
//! identity that instance persisted on a previous boot (or
//! [`DeviceId::UNSET`] on a fresh one). Two policies shape the outcome:
//!
//! - **Anti-swap**: once any sensor has been auto-discovered, a request
//!   carrying a *different* persisted identity will not silently attach
//!   to an unrelated device. A config/hardware mismatch surfaces as
//!   [`BindError::IdentityMismatch`] instead of hijacking whatever
//!   happens to be installed.
//! - **Pre-registration**: with nothing discovered yet and a valid
//!   persisted identity, the backend is declared in advance and its slot
//!   bound directly, so frames route correctly from the sensor's very
//!   first transmission after it powers up.
//!
//! The whole decision, including backend creation, runs inside the
//! registry lock's critical section — two concurrent resolve calls can
//! never double-bind the same discovered slot.

use std::sync::Arc;

use log::{info, warn};

use crate::backend::AirspeedBackend;
use crate::bus::BusTable;
use crate::error::BindError;
use crate::identity::{BusFamily, DeviceId};
use crate::registry::{SensorRegistry, Slot};

impl SensorRegistry {
    /// Bind one logical instance to a physical sensor.
    ///
    /// Never call again for an instance that already holds a backend;
    /// a bound backend's `bus_id` is immutable for its lifetime.
    pub fn resolve(
        &self,
        requested: DeviceId,
        buses: &dyn BusTable,
    ) -> Result<Arc<AirspeedBackend>, BindError> {
        let mut slots = self.lock_slots();

        let mut have_discovered = false;
        for slot in slots.iter_mut() {
            let Slot::Discovered { bus, node } = *slot else {
                continue;
            };
            have_discovered = true;

            let bus_id = DeviceId::new(BusFamily::DroneCan, bus.index(), node, 0);
            if requested.is_set() && requested != bus_id {
                // match with previous ID only
                continue;
            }

            let backend = Arc::new(AirspeedBackend::new(
                bus_id,
                self.timeouts,
                Arc::clone(&self.clock),
            ));
            *slot = Slot::Bound {
                bus,
                node,
                backend: Arc::clone(&backend),
            };
            info!(
                "registered DroneCAN airspeed node {} on bus {}",
                node,
                bus.index()
            );
            return Ok(backend);
        }

        // Some sensor is present but none matched the stored identity —
        // the user may be trying to swap devices. Refuse to guess.
        if have_discovered {
            return Err(BindError::IdentityMismatch);
        }

        // Nothing discovered. Pre-register from the stored identity and
        // hope the sensor turns up later.
        if !requested.is_set() {
            return Err(BindError::IdentityUnset);
        }
        if requested.family() != BusFamily::DroneCan {
            return Err(BindError::WrongBusFamily);
        }
        let Some(bus) = buses.handle_for_index(requested.bus_index()) else {
            return Err(BindError::UnknownBus);
        };
        let node = requested.node_address();

        for slot in slots.iter_mut() {
            if matches!(slot, Slot::Empty) {
                let backend = Arc::new(AirspeedBackend::new(
                    requested,
                    self.timeouts,
                    Arc::clone(&self.clock),
                ));
                *slot = Slot::Bound {
                    bus,
                    node,
                    backend: Arc::clone(&backend),
                };
                info!(
                    "registered undetected DroneCAN airspeed node {} on bus {}",
                    node,
                    bus.index()
                );
                return Ok(backend);
            }
        }

        warn!(
            "no free slot for undetected DroneCAN airspeed node {} on bus {}",
            node,
            bus.index()
        );
        Err(BindError::RegistryFull)
    }
}
