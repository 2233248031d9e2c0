//! Binding error taxonomy.
//!
//! Every failure out of the resolver is a definite, typed outcome — no
//! panic, no process-fatal path. Most variants are expected operational
//! states (a sensor that has not turned up yet, a config pointing at a
//! different device), not faults. All variants are `Copy` so they pass
//! through the frontend without allocation.

use core::fmt;

/// Why a `resolve` call did not produce a bound backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindError {
    /// No device discovered yet and no persisted identity to pre-register.
    /// Normal on a factory-fresh board; the slot stays unfilled this boot.
    IdentityUnset,
    /// Anti-swap: a different sensor is already discovered on the bus and
    /// the requested identity matches none of the discovered nodes.
    /// Expected when hardware was swapped without clearing the stored ID.
    IdentityMismatch,
    /// The persisted identity belongs to a non-DroneCAN bus family.
    WrongBusFamily,
    /// The persisted identity names a bus index with no active transport.
    UnknownBus,
    /// Every registry slot is occupied; no slot can be claimed for a
    /// pre-registration. The caller retries on a later boot — this crate
    /// never evicts and never retries internally.
    RegistryFull,
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdentityUnset => write!(f, "no device discovered and no stored identity"),
            Self::IdentityMismatch => {
                write!(f, "a different sensor is present on the bus")
            }
            Self::WrongBusFamily => write!(f, "stored identity is not a DroneCAN device"),
            Self::UnknownBus => write!(f, "stored identity names an inactive bus"),
            Self::RegistryFull => write!(f, "sensor registry is full"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_operator_readable() {
        assert_eq!(
            format!("{}", BindError::IdentityMismatch),
            "a different sensor is present on the bus"
        );
        assert_eq!(
            format!("{}", BindError::RegistryFull),
            "sensor registry is full"
        );
    }

    #[test]
    fn variants_are_copy_and_comparable() {
        let e = BindError::UnknownBus;
        let e2 = e;
        assert_eq!(e, e2);
        assert_ne!(e, BindError::WrongBusFamily);
    }
}
