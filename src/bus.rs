//! Transport collaborator seam.
//!
//! The CAN stack itself lives outside this crate. What the core needs
//! from it is small: an opaque per-bus handle that frames arrive tagged
//! with, and a way to ask "does a transport for bus index *n* still
//! exist" when validating a persisted identity at startup.

use heapless::Vec;

/// Maximum number of simultaneously active CAN transports.
pub const MAX_BUSES: usize = 4;

/// Opaque handle to one active CAN transport instance.
///
/// Comparing handles compares transport identity; the bus index is the
/// only attribute the core ever extracts (it goes into the persisted
/// [`DeviceId`](crate::identity::DeviceId)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusHandle {
    index: u8,
}

impl BusHandle {
    pub fn new(index: u8) -> Self {
        Self { index }
    }

    /// Driver index of this transport, stable for the process lifetime.
    pub fn index(self) -> u8 {
        self.index
    }
}

/// Port: lookup of active transports by bus index.
///
/// Implemented by the platform glue that brings the CAN stack up; the
/// resolver queries it once per pre-registration attempt. Answering
/// `Some` means only "a transport with this index exists" — it does not
/// certify the transport's bus family.
pub trait BusTable {
    fn handle_for_index(&self, bus_index: u8) -> Option<BusHandle>;
}

/// Fixed-capacity [`BusTable`] for hosts that enumerate buses once at
/// startup (and for tests).
#[derive(Debug, Default)]
pub struct StaticBusTable {
    handles: Vec<BusHandle, MAX_BUSES>,
}

impl StaticBusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active transport. Returns `false` if the table is
    /// full or the index is already present.
    pub fn add(&mut self, handle: BusHandle) -> bool {
        if self.handles.iter().any(|h| h.index() == handle.index()) {
            return false;
        }
        self.handles.push(handle).is_ok()
    }
}

impl BusTable for StaticBusTable {
    fn handle_for_index(&self, bus_index: u8) -> Option<BusHandle> {
        self.handles
            .iter()
            .copied()
            .find(|h| h.index() == bus_index)
    }
}
