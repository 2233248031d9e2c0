//! PitotCAN — DroneCAN airspeed sensor core.
//!
//! Discovers airspeed sensor nodes broadcasting on one or more CAN
//! buses, binds each to a logical instance slot with an identity that
//! survives reboots, and routes inbound measurement frames into each
//! bound backend's cached-reading store. The CAN transport itself and
//! the persistent parameter store are external collaborators reached
//! through the port traits in [`bus`] and [`frontend`].
//!
//! Two execution contexts touch the core concurrently: frame delivery
//! (router) and application polling (accessors, plus one resolver pass
//! at startup). See [`registry`] for the two-level lock discipline that
//! keeps them apart.

#![deny(unused_must_use)]

pub mod backend;
pub mod bus;
pub mod config;
pub mod error;
pub mod frame;
pub mod frontend;
pub mod identity;
pub mod registry;
pub mod time;

mod resolver;
mod router;

pub use backend::{AirspeedBackend, HygrometerSample};
pub use bus::{BusHandle, BusTable, StaticBusTable};
pub use config::Timeouts;
pub use error::BindError;
pub use frame::{AirDataFrame, HygrometerFrame};
pub use frontend::{AirspeedFrontend, IdentityStore, MemoryIdentityStore};
pub use identity::{BusFamily, DeviceId};
pub use registry::{MAX_SENSORS, SensorRegistry};
pub use time::{Clock, MonotonicClock, SimClock};
