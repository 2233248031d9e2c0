//! Composite device identity persisted across reboots.
//!
//! A [`DeviceId`] packs *which physical sensor this was* into a single
//! 32-bit value the frontend can store as a parameter: bus family tag,
//! bus index, node address and a device-type sub-field. The core never
//! interprets it beyond extracting those fields — it exists so a logical
//! airspeed instance can re-attach to the same node after a reboot even
//! though node addresses are transient per-bus.
//!
//! Bit layout (low to high): family 3 bits, bus index 5 bits, node
//! address 8 bits, devtype 8 bits, upper 8 bits reserved (zero).

use core::fmt;

const FAMILY_BITS: u32 = 0x0000_0007;
const BUS_SHIFT: u32 = 3;
const BUS_BITS: u32 = 0x1F;
const ADDRESS_SHIFT: u32 = 8;
const ADDRESS_BITS: u32 = 0xFF;
const DEVTYPE_SHIFT: u32 = 16;
const DEVTYPE_BITS: u32 = 0xFF;

/// Bus family tag inside a [`DeviceId`].
///
/// Only `DroneCan` is meaningful to this crate; the other tags exist so
/// a persisted value written by a different sensor backend decodes
/// without panicking and can be rejected cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BusFamily {
    Unknown = 0,
    I2c = 1,
    Spi = 2,
    DroneCan = 3,
    Sitl = 4,
    Msp = 5,
    Serial = 6,
}

impl BusFamily {
    fn from_tag(tag: u32) -> Self {
        match tag {
            1 => Self::I2c,
            2 => Self::Spi,
            3 => Self::DroneCan,
            4 => Self::Sitl,
            5 => Self::Msp,
            6 => Self::Serial,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for BusFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::I2c => write!(f, "I2C"),
            Self::Spi => write!(f, "SPI"),
            Self::DroneCan => write!(f, "DroneCAN"),
            Self::Sitl => write!(f, "SITL"),
            Self::Msp => write!(f, "MSP"),
            Self::Serial => write!(f, "serial"),
        }
    }
}

/// Persisted composite identity of one physical sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId(u32);

impl DeviceId {
    /// The "never bound" sentinel — a fresh parameter slot reads as zero.
    pub const UNSET: Self = Self(0);

    /// Compose an identity from its fields. Out-of-range bus indices are
    /// masked to the 5-bit field, matching the wire encoding.
    pub fn new(family: BusFamily, bus_index: u8, node_address: u8, devtype: u8) -> Self {
        Self(
            (family as u32 & FAMILY_BITS)
                | ((u32::from(bus_index) & BUS_BITS) << BUS_SHIFT)
                | (u32::from(node_address) << ADDRESS_SHIFT)
                | (u32::from(devtype) << DEVTYPE_SHIFT),
        )
    }

    /// Re-wrap a raw persisted parameter value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value for the frontend to persist.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// True if this identity has ever been bound (non-zero).
    pub fn is_set(self) -> bool {
        self.0 != 0
    }

    pub fn family(self) -> BusFamily {
        BusFamily::from_tag(self.0 & FAMILY_BITS)
    }

    pub fn bus_index(self) -> u8 {
        ((self.0 >> BUS_SHIFT) & BUS_BITS) as u8
    }

    pub fn node_address(self) -> u8 {
        ((self.0 >> ADDRESS_SHIFT) & ADDRESS_BITS) as u8
    }

    pub fn devtype(self) -> u8 {
        ((self.0 >> DEVTYPE_SHIFT) & DEVTYPE_BITS) as u8
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bus {} node {}",
            self.family(),
            self.bus_index(),
            self.node_address()
        )
    }
}
