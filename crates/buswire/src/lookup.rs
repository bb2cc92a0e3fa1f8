//! Lookup service: resolve identifiers to entities in a [`GraphStore`].
//!
//! Every lookup returns `None` for an unknown identifier. Bus and net port
//! references are weak, so a bus can outlive the ports it names; callers
//! treat a failed resolution as "nothing to do".

use buswire_core::{
    identifier::Id,
    model::{Block, Bus, Pin, Port},
};

use crate::store::GraphStore;

/// A port together with the block that owns it.
#[derive(Debug, Clone, Copy)]
pub struct PortRef<'a> {
    block: &'a Block,
    port: &'a Port,
}

impl<'a> PortRef<'a> {
    pub fn block(&self) -> &'a Block {
        self.block
    }

    pub fn port(&self) -> &'a Port {
        self.port
    }
}

/// A pin together with its port and block.
#[derive(Debug, Clone, Copy)]
pub struct PinRef<'a> {
    block: &'a Block,
    port: &'a Port,
    pin: &'a Pin,
}

impl<'a> PinRef<'a> {
    pub fn block(&self) -> &'a Block {
        self.block
    }

    pub fn port(&self) -> &'a Port {
        self.port
    }

    pub fn pin(&self) -> &'a Pin {
        self.pin
    }

    /// Position of the pin within its port.
    pub fn index(&self) -> usize {
        self.port
            .pins()
            .iter()
            .position(|pin| pin.id() == self.pin.id())
            .unwrap_or_default()
    }
}

/// A bus with both of its ports resolved.
#[derive(Debug, Clone, Copy)]
pub struct BusEnds<'a> {
    pub bus: &'a Bus,
    pub source: &'a Port,
    pub target: &'a Port,
}

impl GraphStore {
    pub fn find_block(&self, id: Id) -> Option<&Block> {
        self.blocks().iter().find(|block| block.id() == id)
    }

    /// Find a port anywhere in the graph, along with its owning block.
    pub fn find_port(&self, id: Id) -> Option<PortRef<'_>> {
        self.blocks().iter().find_map(|block| {
            block.port(id).map(|port| PortRef { block, port })
        })
    }

    pub fn find_bus(&self, id: Id) -> Option<&Bus> {
        self.buses().iter().find(|bus| bus.id() == id)
    }

    /// Find a pin anywhere in the graph, along with its port and block.
    pub fn find_pin(&self, id: Id) -> Option<PinRef<'_>> {
        self.blocks().iter().find_map(|block| {
            block.ports().iter().find_map(|port| {
                port.pin(id).map(|pin| PinRef { block, port, pin })
            })
        })
    }

    /// The bus running from `source` to `target`, if any. Direction matters.
    pub fn find_bus_between(&self, source: Id, target: Id) -> Option<&Bus> {
        self.buses()
            .iter()
            .find(|bus| bus.source_port() == source && bus.target_port() == target)
    }

    /// Every bus that references the port on either end, in creation order.
    pub fn port_connections(&self, port: Id) -> Vec<&Bus> {
        self.buses()
            .iter()
            .filter(|bus| bus.touches_port(port))
            .collect()
    }

    /// Resolve a bus and both of its ports.
    pub fn resolve_bus(&self, id: Id) -> Option<BusEnds<'_>> {
        let bus = self.find_bus(id)?;
        let source = self.find_port(bus.source_port())?.port();
        let target = self.find_port(bus.target_port())?.port();
        Some(BusEnds {
            bus,
            source,
            target,
        })
    }

    pub(crate) fn block_mut(&mut self, id: Id) -> Option<&mut Block> {
        self.blocks_mut().iter_mut().find(|block| block.id() == id)
    }

    pub(crate) fn port_mut(&mut self, id: Id) -> Option<&mut Port> {
        self.blocks_mut()
            .iter_mut()
            .find_map(|block| block.port_mut(id))
    }

    pub(crate) fn bus_mut(&mut self, id: Id) -> Option<&mut Bus> {
        self.buses_mut().iter_mut().find(|bus| bus.id() == id)
    }

    /// The port that owns `pin`, mutably.
    pub(crate) fn port_of_pin_mut(&mut self, pin: Id) -> Option<&mut Port> {
        self.blocks_mut()
            .iter_mut()
            .flat_map(|block| block.ports_mut().iter_mut())
            .find(|port| port.contains_pin(pin))
    }
}
