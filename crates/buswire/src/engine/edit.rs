//! Renames and attribute edits.
//!
//! None of these touch connectivity, so none of them normalize.

use log::debug;

use buswire_core::{
    identifier::Id,
    model::{BusAttr, NetAttr, NetType, PinDirection, PortSide},
};

use super::ConnectionEngine;

/// Offset used when a port offset is zero or not a number.
const FALLBACK_PORT_OFFSET: f32 = 20.0;

fn or_default(name: &str, default: impl FnOnce() -> String) -> String {
    if name.is_empty() {
        default()
    } else {
        name.to_string()
    }
}

impl ConnectionEngine {
    /// Rename a block. An empty name becomes `Unnamed_Block`.
    pub fn rename_block(&mut self, block: Id, name: &str) {
        match self.store.block_mut(block) {
            Some(found) => found.set_name(or_default(name, || "Unnamed_Block".to_string())),
            None => debug!(block:% = block; "Ignoring rename of an unknown block"),
        }
    }

    /// Rename a port. An empty name becomes `Unnamed_Port`.
    pub fn rename_port(&mut self, port: Id, name: &str) {
        match self.store.port_mut(port) {
            Some(found) => found.set_name(or_default(name, || "Unnamed_Port".to_string())),
            None => debug!(port:% = port; "Ignoring rename of an unknown port"),
        }
    }

    /// Rename a bus. An empty name becomes `Unnamed_Bus`.
    pub fn rename_bus(&mut self, bus: Id, name: &str) {
        match self.store.bus_mut(bus) {
            Some(found) => found.set_name(or_default(name, || "Unnamed_Bus".to_string())),
            None => debug!(bus:% = bus; "Ignoring rename of an unknown bus"),
        }
    }

    /// Rename a pin. An empty name becomes `pin<index>` after the pin's
    /// position in its port.
    pub fn rename_pin(&mut self, pin: Id, name: &str) {
        let Some(port) = self.store.port_of_pin_mut(pin) else {
            debug!(pin:% = pin; "Ignoring rename of an unknown pin");
            return;
        };
        let Some(index) = port.pins().iter().position(|p| p.id() == pin) else {
            return;
        };
        let name = or_default(name, || format!("pin{index}"));
        port.pins_mut()[index].set_name(name);
    }

    /// Rename a net. Any string is accepted, including an empty one.
    pub fn rename_net(&mut self, bus: Id, net: Id, name: &str) {
        match self.store.bus_mut(bus).and_then(|found| found.net_mut(net)) {
            Some(found) => found.set_name(name),
            None => debug!(bus:% = bus, net:% = net; "Ignoring rename of an unknown net"),
        }
    }

    pub fn set_pin_direction(&mut self, pin: Id, direction: PinDirection) {
        match self
            .store
            .port_of_pin_mut(pin)
            .and_then(|port| port.pin_mut(pin))
        {
            Some(found) => found.set_direction(direction),
            None => debug!(pin:% = pin; "Ignoring direction of an unknown pin"),
        }
    }

    pub fn set_port_side(&mut self, port: Id, side: PortSide) {
        match self.store.port_mut(port) {
            Some(found) => found.set_side(side),
            None => debug!(port:% = port; "Ignoring side of an unknown port"),
        }
    }

    /// Set the vertical offset of a port. Zero or a non-finite value falls
    /// back to 20.
    pub fn set_port_offset(&mut self, port: Id, offset: f32) {
        let offset = if offset.is_finite() && offset != 0.0 {
            offset
        } else {
            FALLBACK_PORT_OFFSET
        };
        match self.store.port_mut(port) {
            Some(found) => found.set_offset_y(offset),
            None => debug!(port:% = port; "Ignoring offset of an unknown port"),
        }
    }

    /// Set a bus attribute. An empty color becomes the configured fallback.
    pub fn set_bus_attr(&mut self, bus: Id, attr: BusAttr, value: &str) {
        let value = if attr == BusAttr::Color && value.is_empty() {
            self.config.bus().fallback_color()
        } else {
            value
        };
        match self.store.bus_mut(bus) {
            Some(found) => found.attrs_mut().set(attr, value),
            None => debug!(bus:% = bus; "Ignoring attribute of an unknown bus"),
        }
    }

    /// Set a net attribute. A `type` value that is not a known net type
    /// leaves the net unchanged.
    pub fn set_net_attr(&mut self, bus: Id, net: Id, attr: NetAttr, value: &str) {
        let Some(found) = self.store.bus_mut(bus).and_then(|found| found.net_mut(net)) else {
            debug!(bus:% = bus, net:% = net; "Ignoring attribute of an unknown net");
            return;
        };
        let attrs = found.attrs_mut();
        match attr {
            NetAttr::Width => attrs.set_width(value),
            NetAttr::Note => attrs.set_note(value),
            NetAttr::Type => match value.parse::<NetType>() {
                Ok(net_type) => attrs.set_net_type(net_type),
                Err(_) => debug!(value; "Ignoring unknown net type"),
            },
        }
    }
}
