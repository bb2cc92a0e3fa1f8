//! Advisory notices for the presentation surface.

use std::fmt;

use buswire_core::{identifier::Id, model::NetSide};

/// Something the user should be told about an otherwise successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A reassignment took `pin` away from `from_net` and gave it to `to_net`.
    PinEvicted {
        bus: Id,
        side: NetSide,
        pin: Id,
        from_net: Id,
        to_net: Id,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PinEvicted {
                side,
                pin,
                from_net,
                to_net,
                ..
            } => write!(
                f,
                "{side} pin {pin} evicted from net {from_net} and assigned to net {to_net}"
            ),
        }
    }
}
