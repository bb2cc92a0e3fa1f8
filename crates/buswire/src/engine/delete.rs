//! Deletion and its cascades.
//!
//! Only pins cascade: a net never outlives a pin it references. Deleting a
//! port or block leaves buses that reference it in place; those buses stay
//! retrievable but resolve to nothing.

use log::{debug, info};

use buswire_core::identifier::Id;

use super::{ConnectionEngine, Selection};

impl ConnectionEngine {
    /// Delete a pin and every net, in any bus, that references it.
    ///
    /// Returns `false` if the pin does not exist.
    pub fn delete_pin(&mut self, pin: Id) -> bool {
        let Some(port) = self.store.port_of_pin_mut(pin) else {
            debug!(pin:% = pin; "Ignoring deletion of an unknown pin");
            return false;
        };
        port.pins_mut().retain(|p| p.id() != pin);

        let mut removed = 0;
        for bus in self.store.buses_mut() {
            let before = bus.nets().len();
            bus.nets_mut().retain(|net| !net.references(pin));
            removed += before - bus.nets().len();
        }
        info!(pin:% = pin, nets_removed = removed; "Deleted pin");
        true
    }

    /// Delete one net from a bus.
    pub fn delete_net(&mut self, bus: Id, net: Id) -> bool {
        let Some(found) = self.store.bus_mut(bus) else {
            debug!(bus:% = bus; "Ignoring net deletion on an unknown bus");
            return false;
        };
        let before = found.nets().len();
        found.nets_mut().retain(|n| n.id() != net);
        let deleted = found.nets().len() != before;
        if deleted {
            debug!(bus:% = bus, net:% = net; "Deleted net");
        }
        deleted
    }

    /// Delete a bus with its nets, clearing the selection if it was selected.
    pub fn delete_bus(&mut self, bus: Id) -> bool {
        let buses = self.store.buses_mut();
        let before = buses.len();
        buses.retain(|b| b.id() != bus);
        if buses.len() == before {
            debug!(bus:% = bus; "Ignoring deletion of an unknown bus");
            return false;
        }

        if self.selection == Some(Selection::Bus(bus)) {
            self.selection = None;
        }
        info!(bus:% = bus; "Deleted bus");
        true
    }

    /// Delete a port and its pins. Buses that reference it are kept.
    pub fn delete_port(&mut self, port: Id) -> bool {
        let Some(block) = self
            .store
            .blocks_mut()
            .iter_mut()
            .find(|block| block.port(port).is_some())
        else {
            debug!(port:% = port; "Ignoring deletion of an unknown port");
            return false;
        };
        block.ports_mut().retain(|p| p.id() != port);

        if self.selection == Some(Selection::Port(port)) {
            self.selection = None;
        }
        if self.connect_mode.pending_source() == Some(port) {
            self.connect_mode.clear_pending();
        }
        info!(port:% = port; "Deleted port");
        true
    }

    /// Delete a block with its ports. Buses that reference them are kept.
    pub fn delete_block(&mut self, block: Id) -> bool {
        let Some(index) = self.store.blocks().iter().position(|b| b.id() == block) else {
            debug!(block:% = block; "Ignoring deletion of an unknown block");
            return false;
        };
        let removed = self.store.blocks_mut().remove(index);

        let removed_ports: Vec<Id> = removed.ports().iter().map(|port| port.id()).collect();
        match self.selection {
            Some(Selection::Block(id)) if id == block => self.selection = None,
            Some(Selection::Port(id)) if removed_ports.contains(&id) => self.selection = None,
            _ => {}
        }
        if self
            .connect_mode
            .pending_source()
            .is_some_and(|pending| removed_ports.contains(&pending))
        {
            self.connect_mode.clear_pending();
        }
        info!(block:% = block, ports = removed_ports.len(); "Deleted block");
        true
    }
}
