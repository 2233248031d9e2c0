//! Message router — frame-delivery entry points.
//!
//! The transport glue calls these for every inbound frame of the
//! relevant kinds, from whatever context delivers CAN transfers (a
//! dedicated I/O thread or interrupt bottom half). This is the only
//! code path that nests the two locks: registry lock taken first, then
//! the matched backend's instance lock inside it.
//!
//! Frames from pairs with no bound backend are a no-op here; passive
//! discovery of such pairs goes through
//! [`SensorRegistry::note_device`], not the router.

use crate::bus::BusHandle;
use crate::frame::{AirDataFrame, HygrometerFrame};
use crate::registry::SensorRegistry;

impl SensorRegistry {
    /// Route a raw air-data frame from (`bus`, `source_node`) into the
    /// bound backend's cache, if one exists.
    pub fn handle_air_data(&self, bus: BusHandle, source_node: u8, frame: &AirDataFrame) {
        let slots = self.lock_slots();
        if let Some(backend) = Self::bound_in(&slots, bus, source_node) {
            // Instance lock nests inside the registry lock, never the
            // other way around.
            backend.ingest_air_data(frame);
        }
    }

    /// Route a hygrometer frame the same way.
    pub fn handle_hygrometer(&self, bus: BusHandle, source_node: u8, frame: &HygrometerFrame) {
        let slots = self.lock_slots();
        if let Some(backend) = Self::bound_in(&slots, bus, source_node) {
            backend.ingest_hygrometer(frame);
        }
    }
}
