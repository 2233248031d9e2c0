//! Discovery registry — the fixed slot table behind the registry lock.
//!
//! One process-wide [`SensorRegistry`] tracks every (bus, node address)
//! pair seen or bound. Slots move through exactly three states:
//!
//! ```text
//!   Empty ──note_device──▶ Discovered ──resolve──▶ Bound
//!   Empty ───────────resolve (pre-registration)──▶ Bound
//! ```
//!
//! There is no transition out of `Bound` and no eviction; a slot claimed
//! is claimed for the process lifetime. All operations are linear scans
//! over [`MAX_SENSORS`] entries under the single registry lock, so every
//! call is short and deterministic.
//!
//! Lock order is always registry → backend instance, never the reverse.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::backend::AirspeedBackend;
use crate::bus::BusHandle;
use crate::config::Timeouts;
use crate::time::Clock;

/// Maximum simultaneously supported airspeed sensor instances.
pub const MAX_SENSORS: usize = 2;

/// One registry entry.
pub(crate) enum Slot {
    Empty,
    /// Seen on the bus, not yet claimed by a logical instance.
    Discovered { bus: BusHandle, node: u8 },
    /// Claimed; frames for (bus, node) route into `backend`.
    Bound {
        bus: BusHandle,
        node: u8,
        backend: Arc<AirspeedBackend>,
    },
}

impl Slot {
    /// True if this slot refers to the given pair, bound or not.
    fn refers_to(&self, bus: BusHandle, node: u8) -> bool {
        match *self {
            Slot::Empty => false,
            Slot::Discovered { bus: b, node: n } | Slot::Bound { bus: b, node: n, .. } => {
                b == bus && n == node
            }
        }
    }
}

/// Process-wide discovery and binding registry.
pub struct SensorRegistry {
    slots: Mutex<[Slot; MAX_SENSORS]>,
    pub(crate) timeouts: Timeouts,
    pub(crate) clock: Arc<dyn Clock>,
}

impl SensorRegistry {
    pub fn new(timeouts: Timeouts, clock: Arc<dyn Clock>) -> Self {
        Self {
            slots: Mutex::new(core::array::from_fn(|_| Slot::Empty)),
            timeouts,
            clock,
        }
    }

    /// Passive discovery: record that `node` was seen transmitting on
    /// `bus`.
    ///
    /// Called by the transport glue for every relevant frame sighting.
    /// Already-known pairs are ignored; a full table silently drops the
    /// observation (best effort, no eviction, no error).
    pub fn note_device(&self, bus: BusHandle, node: u8) {
        let mut slots = self.lock_slots();
        if slots.iter().any(|s| s.refers_to(bus, node)) {
            return;
        }
        for slot in slots.iter_mut() {
            if matches!(slot, Slot::Empty) {
                *slot = Slot::Discovered { bus, node };
                debug!("discovered airspeed node {} on bus {}", node, bus.index());
                return;
            }
        }
        debug!(
            "registry full, dropping node {} on bus {}",
            node,
            bus.index()
        );
    }

    /// Bound backend for the pair, if any.
    pub fn find_bound(&self, bus: BusHandle, node: u8) -> Option<Arc<AirspeedBackend>> {
        let slots = self.lock_slots();
        Self::bound_in(&slots, bus, node).cloned()
    }

    /// True if the pair sits in a `Discovered` (not yet bound) slot.
    pub fn find_unbound(&self, bus: BusHandle, node: u8) -> bool {
        let slots = self.lock_slots();
        slots
            .iter()
            .any(|s| matches!(*s, Slot::Discovered { bus: b, node: n } if b == bus && n == node))
    }

    /// True if any sensor has been discovered but not yet bound,
    /// regardless of which device.
    pub fn any_discovered_unbound(&self) -> bool {
        let slots = self.lock_slots();
        slots.iter().any(|s| matches!(s, Slot::Discovered { .. }))
    }

    /// Lookup within an already-held guard; the router uses this so the
    /// instance lock nests inside the registry lock.
    pub(crate) fn bound_in<'a>(
        slots: &'a [Slot; MAX_SENSORS],
        bus: BusHandle,
        node: u8,
    ) -> Option<&'a Arc<AirspeedBackend>> {
        slots.iter().find_map(|s| match s {
            Slot::Bound {
                bus: b,
                node: n,
                backend,
            } if *b == bus && *n == node => Some(backend),
            _ => None,
        })
    }

    // Nothing panics while holding the registry lock; recover the table
    // from a poisoned guard rather than propagating the panic.
    pub(crate) fn lock_slots(&self) -> MutexGuard<'_, [Slot; MAX_SENSORS]> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::SimClock;

    fn registry() -> SensorRegistry {
        SensorRegistry::new(Timeouts::default(), Arc::new(SimClock::new()))
    }

    #[test]
    fn discovery_records_each_distinct_pair_once() {
        let reg = registry();
        let bus = BusHandle::new(0);

        reg.note_device(bus, 17);
        reg.note_device(bus, 17);
        reg.note_device(bus, 17);

        assert!(reg.find_unbound(bus, 17));
        // Re-observations did not claim the other slot.
        reg.note_device(bus, 18);
        assert!(reg.find_unbound(bus, 18));
    }

    #[test]
    fn same_node_address_on_different_buses_is_distinct() {
        let reg = registry();
        reg.note_device(BusHandle::new(0), 17);
        reg.note_device(BusHandle::new(1), 17);
        assert!(reg.find_unbound(BusHandle::new(0), 17));
        assert!(reg.find_unbound(BusHandle::new(1), 17));
    }

    #[test]
    fn full_table_drops_further_observations() {
        let reg = registry();
        let bus = BusHandle::new(0);
        for node in 0..MAX_SENSORS as u8 {
            reg.note_device(bus, node);
        }
        reg.note_device(bus, 99);
        assert!(!reg.find_unbound(bus, 99));
        // Earlier entries unaffected.
        assert!(reg.find_unbound(bus, 0));
    }

    #[test]
    fn discovered_is_not_bound() {
        let reg = registry();
        let bus = BusHandle::new(0);
        reg.note_device(bus, 42);
        assert!(reg.find_bound(bus, 42).is_none());
        assert!(reg.any_discovered_unbound());
    }

    #[test]
    fn empty_registry_reports_nothing() {
        let reg = registry();
        assert!(!reg.any_discovered_unbound());
        assert!(!reg.find_unbound(BusHandle::new(0), 1));
        assert!(reg.find_bound(BusHandle::new(0), 1).is_none());
    }
}
