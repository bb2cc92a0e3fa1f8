//! Bus creation and auto-mapping.

use log::{debug, info, trace};

use buswire_core::{
    identifier::{EntityKind, Id},
    model::{Bus, BusAttrs, Net, NetAttrs},
};

use super::{ConnectionEngine, Selection};
use crate::automap::pair_pins;

impl ConnectionEngine {
    /// Create a bus from `source` to `target` and auto-map its nets.
    ///
    /// Returns the new bus id, which also becomes the selection. Returns
    /// `None` without touching the graph for a self connection, an existing
    /// bus between the same ordered pair, or an unknown port.
    pub fn connect(&mut self, source: Id, target: Id) -> Option<Id> {
        if source == target {
            debug!(port:% = source; "Ignoring connection of a port to itself");
            return None;
        }
        if let Some(existing) = self.store.find_bus_between(source, target) {
            debug!(bus:% = existing.id(); "Ports are already connected");
            return None;
        }

        let (Some(source_ref), Some(target_ref)) =
            (self.store.find_port(source), self.store.find_port(target))
        else {
            debug!(source:% = source, target:% = target; "Ignoring connection with an unknown port");
            return None;
        };

        let bus_config = self.config.bus();
        let name = format!("{}_to_{}", source_ref.port().name(), target_ref.port().name());
        let attrs = BusAttrs::new(
            bus_config.protocol(),
            bus_config.bandwidth(),
            bus_config.palette_color(self.store.buses().len()),
        );
        let bus = Bus::new(Id::generate(EntityKind::Bus), name, source, target, attrs);
        let bus_id = bus.id();

        info!(bus:% = bus_id, name = bus.name(); "Created bus");
        self.store.buses_mut().push(bus);

        self.auto_map(bus_id);
        self.selection = Some(Selection::Bus(bus_id));
        Some(bus_id)
    }

    /// Replace the nets of a bus with one net per source pin.
    ///
    /// Each source pin is paired with the target pin of the same name
    /// (trimmed, case-insensitive), else the target pin at the same position,
    /// else nothing. The previous nets are discarded. No-op if the bus or
    /// either port cannot be resolved.
    pub fn auto_map(&mut self, bus: Id) {
        let Some(ends) = self.store.resolve_bus(bus) else {
            debug!(bus:% = bus; "Skipping auto-map of an unresolvable bus");
            return;
        };

        let net_config = self.config.net();
        let nets: Vec<Net> = pair_pins(ends.source.pins(), ends.target.pins())
            .into_iter()
            .map(|(pin, to_pin)| {
                trace!(pin = pin.name(), matched:? = to_pin; "Mapped source pin");
                Net::new(
                    Id::generate(EntityKind::Net),
                    format!("net_{}", pin.name()),
                    Some(pin.id()),
                    to_pin,
                    NetAttrs::new(net_config.width(), net_config.net_type()),
                )
            })
            .collect();

        debug!(bus:% = bus, nets = nets.len(); "Auto-mapped bus");
        if let Some(target) = self.store.bus_mut(bus) {
            *target.nets_mut() = nets;
        }
        self.normalize_bus(bus);
    }
}
