//! Connectivity coverage of a bus.

use std::{collections::HashSet, fmt};

use buswire_core::{
    identifier::Id,
    model::{Bus, Pin, Port},
};

/// Coverage figures for one bus.
///
/// A pin only counts as claimed when the net holding it also has its target
/// end set. A net with a source pin but no target therefore leaves that
/// source pin listed as unconnected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Nets with both ends set.
    pub connected: usize,
    /// Pin count of the wider of the two ports.
    pub total_slots: usize,
    /// Source port pins not claimed, in port order.
    pub unconnected_source: Vec<Id>,
    /// Target port pins not claimed, in port order.
    pub unconnected_target: Vec<Id>,
}

impl ConnectionStats {
    /// Compute coverage for `bus` between its resolved ports.
    pub fn compute(bus: &Bus, source: &Port, target: &Port) -> Self {
        let mapped: Vec<_> = bus.nets().iter().filter(|net| net.to_pin().is_some()).collect();
        let claimed_source: HashSet<Id> = mapped.iter().filter_map(|net| net.from_pin()).collect();
        let claimed_target: HashSet<Id> = mapped.iter().filter_map(|net| net.to_pin()).collect();

        let unclaimed = |pins: &[Pin], claimed: &HashSet<Id>| -> Vec<Id> {
            pins.iter()
                .map(Pin::id)
                .filter(|id| !claimed.contains(id))
                .collect()
        };

        Self {
            connected: bus.nets().iter().filter(|net| net.is_connected()).count(),
            total_slots: source.pins().len().max(target.pins().len()),
            unconnected_source: unclaimed(source.pins(), &claimed_source),
            unconnected_target: unclaimed(target.pins(), &claimed_target),
        }
    }

    /// Returns `true` for the zeroed result of an unresolvable bus.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for ConnectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} connected, {} source and {} target pins open",
            self.connected,
            self.total_slots,
            self.unconnected_source.len(),
            self.unconnected_target.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use buswire_core::{
        identifier::EntityKind,
        model::{BusAttrs, Net, NetAttrs, NetType, PinDirection, PortSide},
    };

    use super::*;

    fn port(count: usize) -> Port {
        let pins = (0..count)
            .map(|i| Pin::new(Id::generate(EntityKind::Pin), format!("p{i}"), PinDirection::In))
            .collect();
        Port::new(Id::generate(EntityKind::Port), "p", PortSide::Left, 35.0, pins)
    }

    fn bus(source: &Port, target: &Port, ends: &[(Option<usize>, Option<usize>)]) -> Bus {
        let mut bus = Bus::new(
            Id::generate(EntityKind::Bus),
            "b",
            source.id(),
            target.id(),
            BusAttrs::new("custom", "1Gbps", "#22d3ee"),
        );
        for (from, to) in ends {
            bus.nets_mut().push(Net::new(
                Id::generate(EntityKind::Net),
                "n",
                from.map(|i| source.pins()[i].id()),
                to.map(|i| target.pins()[i].id()),
                NetAttrs::new("1", NetType::Data),
            ));
        }
        bus
    }

    #[test]
    fn test_asymmetric_ports_use_wider_count() {
        let source = port(3);
        let target = port(2);
        let bus = bus(&source, &target, &[(Some(0), Some(0)), (Some(1), Some(1)), (Some(2), None)]);

        let stats = ConnectionStats::compute(&bus, &source, &target);
        assert_eq!(stats.connected, 2);
        assert_eq!(stats.total_slots, 3);
        assert_eq!(stats.unconnected_source, [source.pins()[2].id()]);
        assert!(stats.unconnected_target.is_empty());
    }

    #[test]
    fn test_half_connected_nets_leave_pins_open() {
        let source = port(2);
        let target = port(2);
        // Net 0 holds source pin 0 without a target; net 1 holds target pin 1 without a source.
        let bus = bus(&source, &target, &[(Some(0), None), (None, Some(1))]);

        let stats = ConnectionStats::compute(&bus, &source, &target);
        assert_eq!(stats.connected, 0);
        assert_eq!(
            stats.unconnected_source,
            [source.pins()[0].id(), source.pins()[1].id()]
        );
        assert_eq!(stats.unconnected_target, [target.pins()[0].id()]);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(ConnectionStats::default().is_empty());
        assert_eq!(
            ConnectionStats::default().to_string(),
            "0/0 connected, 0 source and 0 target pins open"
        );
    }
}
