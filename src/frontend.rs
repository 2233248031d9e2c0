//! Airspeed frontend — owner of the logical instance slots.
//!
//! The frontend is the startup-side consumer of the resolver: it loads
//! each instance's persisted identity through the [`IdentityStore`]
//! port, asks the registry to bind, and writes a freshly assigned
//! identity back so the binding survives the next boot. After init it
//! is a thin passthrough from the poll context to each backend's
//! accessors.
//!
//! The core itself never writes persisted state — only the frontend
//! does, and only when a *new* identity was bound.

use std::sync::Arc;

use log::{debug, info};

use crate::backend::{AirspeedBackend, HygrometerSample};
use crate::bus::BusTable;
use crate::identity::DeviceId;
use crate::registry::{MAX_SENSORS, SensorRegistry};

/// Port: persisted per-instance identity parameters.
///
/// `load` is called once per instance at init; `store` only when a new
/// identity was assigned. Instances index 0..[`MAX_SENSORS`].
pub trait IdentityStore {
    fn load(&self, instance: usize) -> DeviceId;
    fn store(&mut self, instance: usize, id: DeviceId);
}

/// In-memory [`IdentityStore`] for hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    ids: [u32; MAX_SENSORS],
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot, as if persisted on a previous boot.
    pub fn preset(&mut self, instance: usize, id: DeviceId) {
        if let Some(raw) = self.ids.get_mut(instance) {
            *raw = id.raw();
        }
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self, instance: usize) -> DeviceId {
        DeviceId::from_raw(self.ids.get(instance).copied().unwrap_or(0))
    }

    fn store(&mut self, instance: usize, id: DeviceId) {
        if let Some(raw) = self.ids.get_mut(instance) {
            *raw = id.raw();
        }
    }
}

/// Logical airspeed subsystem: up to [`MAX_SENSORS`] instances.
pub struct AirspeedFrontend {
    registry: Arc<SensorRegistry>,
    instances: [Option<Arc<AirspeedBackend>>; MAX_SENSORS],
}

impl AirspeedFrontend {
    pub fn new(registry: Arc<SensorRegistry>) -> Self {
        Self {
            registry,
            instances: core::array::from_fn(|_| None),
        }
    }

    /// Resolve every still-unbound instance. Safe to call again on a
    /// later attempt; already-bound instances are left untouched.
    /// Returns how many instances are bound afterwards.
    pub fn init<S: IdentityStore>(&mut self, store: &mut S, buses: &dyn BusTable) -> usize {
        for (instance, entry) in self.instances.iter_mut().enumerate() {
            if entry.is_some() {
                continue;
            }
            let requested = store.load(instance);
            match self.registry.resolve(requested, buses) {
                Ok(backend) => {
                    if backend.bus_id() != requested {
                        info!(
                            "airspeed instance {}: persisting new identity {}",
                            instance,
                            backend.bus_id()
                        );
                        store.store(instance, backend.bus_id());
                    }
                    *entry = Some(backend);
                }
                Err(err) => {
                    debug!("airspeed instance {}: not bound: {}", instance, err);
                }
            }
        }
        self.instances.iter().filter(|e| e.is_some()).count()
    }

    /// Bound backend for an instance, if resolution succeeded.
    pub fn backend(&self, instance: usize) -> Option<&Arc<AirspeedBackend>> {
        self.instances.get(instance)?.as_ref()
    }

    pub fn pressure(&self, instance: usize) -> Option<f32> {
        self.backend(instance)?.pressure()
    }

    pub fn temperature(&self, instance: usize) -> Option<f32> {
        self.backend(instance)?.temperature()
    }

    pub fn hygrometer(&self, instance: usize) -> Option<HygrometerSample> {
        self.backend(instance)?.hygrometer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{BusHandle, StaticBusTable};
    use crate::config::Timeouts;
    use crate::identity::BusFamily;
    use crate::time::SimClock;

    fn setup() -> (Arc<SensorRegistry>, StaticBusTable) {
        let reg = Arc::new(SensorRegistry::new(
            Timeouts::default(),
            Arc::new(SimClock::new()),
        ));
        let mut buses = StaticBusTable::new();
        assert!(buses.add(BusHandle::new(0)));
        (reg, buses)
    }

    #[test]
    fn new_binding_is_written_back() {
        let (reg, buses) = setup();
        reg.note_device(BusHandle::new(0), 30);

        let mut store = MemoryIdentityStore::new();
        let mut frontend = AirspeedFrontend::new(reg);
        assert_eq!(frontend.init(&mut store, &buses), 1);

        let expected = DeviceId::new(BusFamily::DroneCan, 0, 30, 0);
        assert_eq!(store.load(0), expected);
        assert_eq!(frontend.backend(0).unwrap().bus_id(), expected);
    }

    #[test]
    fn matching_persisted_identity_is_not_rewritten() {
        let (reg, buses) = setup();
        reg.note_device(BusHandle::new(0), 30);

        let id = DeviceId::new(BusFamily::DroneCan, 0, 30, 0);
        let mut store = MemoryIdentityStore::new();
        store.preset(0, id);

        let mut frontend = AirspeedFrontend::new(reg);
        assert_eq!(frontend.init(&mut store, &buses), 1);
        assert_eq!(store.load(0), id);
    }

    #[test]
    fn init_is_idempotent_for_bound_instances() {
        let (reg, buses) = setup();
        reg.note_device(BusHandle::new(0), 30);

        let mut store = MemoryIdentityStore::new();
        let mut frontend = AirspeedFrontend::new(reg.clone());
        assert_eq!(frontend.init(&mut store, &buses), 1);
        let bound = Arc::clone(frontend.backend(0).unwrap());

        // A second pass must not re-resolve instance 0.
        assert_eq!(frontend.init(&mut store, &buses), 1);
        assert!(Arc::ptr_eq(&bound, frontend.backend(0).unwrap()));
    }

    #[test]
    fn unbound_instances_expose_no_readings() {
        let (reg, buses) = setup();
        let mut store = MemoryIdentityStore::new();
        let mut frontend = AirspeedFrontend::new(reg);
        assert_eq!(frontend.init(&mut store, &buses), 0);
        assert!(frontend.pressure(0).is_none());
        assert!(frontend.temperature(1).is_none());
        assert!(frontend.hygrometer(0).is_none());
        // Out-of-range instance index is simply absent.
        assert!(frontend.backend(MAX_SENSORS).is_none());
    }
}
