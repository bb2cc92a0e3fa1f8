//! Manual net reassignment with conflict eviction.

use log::{debug, info};

use buswire_core::{identifier::Id, model::NetSide};

use super::ConnectionEngine;
use crate::notice::Notice;

impl ConnectionEngine {
    /// Point one end of a net at `pin`, or disconnect it with `None`.
    ///
    /// If another net of the bus holds `pin` on the same side, that net
    /// loses it and a [`Notice::PinEvicted`] is returned (and kept as the
    /// last notice). No-op if the bus or net is unknown, if either port of
    /// the bus has been deleted, or if `pin` does not belong to the port on
    /// that side of the bus.
    pub fn reassign(
        &mut self,
        bus: Id,
        net: Id,
        side: NetSide,
        pin: Option<Id>,
    ) -> Option<Notice> {
        let Some(ends) = self.store.resolve_bus(bus) else {
            debug!(bus:% = bus; "Ignoring reassignment on an unresolvable bus");
            return None;
        };
        if ends.bus.net(net).is_none() {
            debug!(bus:% = bus, net:% = net; "Ignoring reassignment of an unknown net");
            return None;
        }
        if let Some(pin) = pin {
            let port = match side {
                NetSide::Source => ends.source,
                NetSide::Target => ends.target,
            };
            if !port.contains_pin(pin) {
                debug!(bus:% = bus, pin:% = pin, side:%; "Ignoring reassignment to a pin outside the bus port");
                return None;
            }
        }

        let target = self.store.bus_mut(bus)?;
        let evicted_from = pin.and_then(|pin| {
            target
                .nets_mut()
                .iter_mut()
                .find(|other| other.id() != net && other.pin(side) == Some(pin))
                .map(|other| {
                    other.set_pin(side, None);
                    other.id()
                })
        });
        if let Some(slot) = target.net_mut(net) {
            slot.set_pin(side, pin);
        }
        self.normalize_bus(bus);

        let notice = match (evicted_from, pin) {
            (Some(from_net), Some(pin)) => Notice::PinEvicted {
                bus,
                side,
                pin,
                from_net,
                to_net: net,
            },
            _ => return None,
        };
        info!(bus:% = bus, net:% = net, side:%, pin:? = pin; "Pin evicted from another net");
        self.last_notice = Some(notice.clone());
        Some(notice)
    }
}
