//! Creation of blocks, ports, pins and nets with editor defaults.

use log::{debug, info};

use buswire_core::{
    identifier::{EntityKind, Id},
    model::{Block, Net, NetAttrs, Pin, PinDirection, Port, PortSide},
};

use super::{ConnectionEngine, Selection};

/// `Some(name)` unless the name is missing or blank.
fn given(name: Option<&str>) -> Option<&str> {
    name.filter(|name| !name.trim().is_empty())
}

impl ConnectionEngine {
    /// Create a block and select it.
    ///
    /// Without a name the block is called `Block_<n>`, counting from one.
    /// The block is placed to the right of the previously created ones.
    pub fn create_block(&mut self, name: Option<&str>) -> Id {
        let index = self.store.blocks().len();
        let name = given(name).map_or_else(|| format!("Block_{}", index + 1), str::to_string);
        let (x, y) = self.config.block().position(index);

        let block = Block::new(
            Id::generate(EntityKind::Block),
            name,
            x,
            y,
            self.config.block().width(),
        );
        let id = block.id();
        info!(block:% = id, name = block.name(); "Created block");

        self.store.blocks_mut().push(block);
        self.selection = Some(Selection::Block(id));
        id
    }

    /// Add a port to a block and select it.
    ///
    /// Ports alternate between the left and right side and start with the
    /// configured template pins. Without a name the port is called
    /// `<block>_P<n>`, counting from one. Returns `None` for an unknown block.
    pub fn create_port(&mut self, block: Id, name: Option<&str>) -> Option<Id> {
        let template = self.config.port().pins();
        let Some(owner) = self.store.block_mut(block) else {
            debug!(block:% = block; "Ignoring port for an unknown block");
            return None;
        };

        let index = owner.ports().len();
        let name = given(name).map_or_else(
            || format!("{}_P{}", owner.name(), index + 1),
            str::to_string,
        );
        let pins = template
            .iter()
            .map(|pin| Pin::new(Id::generate(EntityKind::Pin), pin.name(), pin.direction()))
            .collect();

        let port = Port::new(
            Id::generate(EntityKind::Port),
            name,
            PortSide::alternating(index),
            35.0 + index as f32 * 30.0,
            pins,
        );
        let id = port.id();
        info!(port:% = id, name = port.name(), block:% = block; "Created port");

        owner.ports_mut().push(port);
        self.selection = Some(Selection::Port(id));
        Some(id)
    }

    /// Append a pin to a port.
    ///
    /// Without a name the pin is called `pin<n>` where n is the number of pins
    /// the port already has. Returns `None` for an unknown port.
    pub fn create_pin(
        &mut self,
        port: Id,
        name: Option<&str>,
        direction: PinDirection,
    ) -> Option<Id> {
        let Some(owner) = self.store.port_mut(port) else {
            debug!(port:% = port; "Ignoring pin for an unknown port");
            return None;
        };

        let name = given(name).map_or_else(|| format!("pin{}", owner.pins().len()), str::to_string);
        let pin = Pin::new(Id::generate(EntityKind::Pin), name, direction);
        let id = pin.id();
        debug!(pin:% = id, name = pin.name(), port:% = port; "Created pin");

        owner.pins_mut().push(pin);
        Some(id)
    }

    /// Append an unmapped net to a bus.
    ///
    /// The net starts on the first source pin no net uses yet, else on the
    /// first source pin, else unconnected; its target is unset. Named
    /// `net_<n>` after the net count. No-op if the bus or its source port is
    /// missing.
    pub fn add_net(&mut self, bus: Id) -> Option<Id> {
        let Some(found) = self.store.find_bus(bus) else {
            debug!(bus:% = bus; "Ignoring net for an unknown bus");
            return None;
        };
        let Some(source) = self.store.find_port(found.source_port()) else {
            debug!(bus:% = bus; "Ignoring net for a bus without a source port");
            return None;
        };

        let pins = source.port().pins();
        let from_pin = pins
            .iter()
            .find(|pin| !found.nets().iter().any(|net| net.from_pin() == Some(pin.id())))
            .or_else(|| pins.first())
            .map(Pin::id);

        let net_config = self.config.net();
        let net = Net::new(
            Id::generate(EntityKind::Net),
            format!("net_{}", found.nets().len()),
            from_pin,
            None,
            NetAttrs::new(net_config.width(), net_config.net_type()),
        );
        let id = net.id();
        debug!(bus:% = bus, net:% = id, from_pin:? = from_pin; "Added net");

        let target = self.store.bus_mut(bus)?;
        target.nets_mut().push(net);
        self.normalize_bus(bus);
        Some(id)
    }
}
