//! Buses, nets and their attribute bags.

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifier::Id;

/// Which end of a bus a net field refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetSide {
    /// The bus's source port (`from_pin`).
    Source,
    /// The bus's target port (`to_pin`).
    Target,
}

impl FromStr for NetSide {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(Self::Source),
            "target" => Ok(Self::Target),
            _ => Err("Invalid net side"),
        }
    }
}

impl fmt::Display for NetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Signal category of a net.
///
/// The names match external configuration strings (snake_case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NetType {
    #[default]
    Data,
    Ctrl,
    Clock,
    Power,
}

impl FromStr for NetType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "data" => Ok(Self::Data),
            "ctrl" => Ok(Self::Ctrl),
            "clock" => Ok(Self::Clock),
            "power" => Ok(Self::Power),
            _ => Err("Invalid net type"),
        }
    }
}

impl From<NetType> for &'static str {
    fn from(val: NetType) -> Self {
        match val {
            NetType::Data => "data",
            NetType::Ctrl => "ctrl",
            NetType::Clock => "clock",
            NetType::Power => "power",
        }
    }
}

impl fmt::Display for NetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Keys of the bus attribute bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusAttr {
    Protocol,
    Bandwidth,
    Note,
    Color,
}

impl FromStr for BusAttr {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "protocol" => Ok(Self::Protocol),
            "bandwidth" => Ok(Self::Bandwidth),
            "note" => Ok(Self::Note),
            "color" => Ok(Self::Color),
            _ => Err("Invalid bus attribute"),
        }
    }
}

/// Keys of the net attribute bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetAttr {
    Width,
    Type,
    Note,
}

impl FromStr for NetAttr {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "width" => Ok(Self::Width),
            "type" => Ok(Self::Type),
            "note" => Ok(Self::Note),
            _ => Err("Invalid net attribute"),
        }
    }
}

/// Free-form labels attached to a bus. None of them carry engine semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusAttrs {
    protocol: String,
    bandwidth: String,
    note: String,
    color: String,
}

impl BusAttrs {
    /// Create a new attribute bag with an empty note.
    pub fn new(
        protocol: impl Into<String>,
        bandwidth: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            bandwidth: bandwidth.into(),
            note: String::new(),
            color: color.into(),
        }
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn bandwidth(&self) -> &str {
        &self.bandwidth
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Read an attribute by key.
    pub fn get(&self, attr: BusAttr) -> &str {
        match attr {
            BusAttr::Protocol => &self.protocol,
            BusAttr::Bandwidth => &self.bandwidth,
            BusAttr::Note => &self.note,
            BusAttr::Color => &self.color,
        }
    }

    /// Overwrite an attribute by key.
    pub fn set(&mut self, attr: BusAttr, value: impl Into<String>) {
        let slot = match attr {
            BusAttr::Protocol => &mut self.protocol,
            BusAttr::Bandwidth => &mut self.bandwidth,
            BusAttr::Note => &mut self.note,
            BusAttr::Color => &mut self.color,
        };
        *slot = value.into();
    }
}

/// Free-form labels attached to a net, plus its [`NetType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetAttrs {
    width: String,
    net_type: NetType,
    note: String,
}

impl NetAttrs {
    /// Create a new attribute bag with an empty note.
    pub fn new(width: impl Into<String>, net_type: NetType) -> Self {
        Self {
            width: width.into(),
            net_type,
            note: String::new(),
        }
    }

    pub fn width(&self) -> &str {
        &self.width
    }

    pub fn net_type(&self) -> NetType {
        self.net_type
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn set_width(&mut self, width: impl Into<String>) {
        self.width = width.into();
    }

    pub fn set_net_type(&mut self, net_type: NetType) {
        self.net_type = net_type;
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }
}

/// A single pin-to-pin wire inside a [`Bus`].
///
/// Either end may be unset, meaning the net is unconnected on that side.
#[derive(Debug, Clone, PartialEq)]
pub struct Net {
    id: Id,
    name: String,
    from_pin: Option<Id>,
    to_pin: Option<Id>,
    attrs: NetAttrs,
}

impl Net {
    /// Create a new Net.
    pub fn new(
        id: Id,
        name: impl Into<String>,
        from_pin: Option<Id>,
        to_pin: Option<Id>,
        attrs: NetAttrs,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            from_pin,
            to_pin,
            attrs,
        }
    }

    /// Get the net identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Pin on the bus's source port, if connected.
    pub fn from_pin(&self) -> Option<Id> {
        self.from_pin
    }

    /// Pin on the bus's target port, if connected.
    pub fn to_pin(&self) -> Option<Id> {
        self.to_pin
    }

    /// Pin held on the given side.
    pub fn pin(&self, side: NetSide) -> Option<Id> {
        match side {
            NetSide::Source => self.from_pin,
            NetSide::Target => self.to_pin,
        }
    }

    /// Replace the pin held on the given side. `None` disconnects that side.
    pub fn set_pin(&mut self, side: NetSide, pin: Option<Id>) {
        match side {
            NetSide::Source => self.from_pin = pin,
            NetSide::Target => self.to_pin = pin,
        }
    }

    /// Returns `true` when both ends are set.
    pub fn is_connected(&self) -> bool {
        self.from_pin.is_some() && self.to_pin.is_some()
    }

    /// Returns `true` if either end refers to `pin`.
    pub fn references(&self, pin: Id) -> bool {
        self.from_pin == Some(pin) || self.to_pin == Some(pin)
    }

    pub fn attrs(&self) -> &NetAttrs {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut NetAttrs {
        &mut self.attrs
    }
}

/// A broken pin-claim invariant inside a bus.
///
/// These can only be produced by a bug in the code that edits nets; the
/// public command surface always normalizes before returning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("bus {bus}: {side} pin {pin} is claimed by more than one net")]
    DuplicateClaim { bus: Id, side: NetSide, pin: Id },
}

/// A directional link from a source port to a target port.
///
/// The port references are weak: the referenced ports may have been deleted,
/// in which case the bus is kept but cannot be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Bus {
    id: Id,
    name: String,
    source_port: Id,
    target_port: Id,
    attrs: BusAttrs,
    nets: Vec<Net>,
}

impl Bus {
    /// Create a new Bus without nets.
    pub fn new(
        id: Id,
        name: impl Into<String>,
        source_port: Id,
        target_port: Id,
        attrs: BusAttrs,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            source_port,
            target_port,
            attrs,
            nets: Vec::new(),
        }
    }

    /// Get the bus identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn source_port(&self) -> Id {
        self.source_port
    }

    pub fn target_port(&self) -> Id {
        self.target_port
    }

    /// Port referenced on the given side.
    pub fn port(&self, side: NetSide) -> Id {
        match side {
            NetSide::Source => self.source_port,
            NetSide::Target => self.target_port,
        }
    }

    /// Returns `true` if the bus references the port on either end.
    pub fn touches_port(&self, port: Id) -> bool {
        self.source_port == port || self.target_port == port
    }

    pub fn attrs(&self) -> &BusAttrs {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut BusAttrs {
        &mut self.attrs
    }

    /// Borrow the nets in list order. Order decides normalization tie-breaks.
    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// Mutable access to the ordered net list.
    pub fn nets_mut(&mut self) -> &mut Vec<Net> {
        &mut self.nets
    }

    pub fn net(&self, id: Id) -> Option<&Net> {
        self.nets.iter().find(|net| net.id == id)
    }

    pub fn net_mut(&mut self, id: Id) -> Option<&mut Net> {
        self.nets.iter_mut().find(|net| net.id == id)
    }

    /// Find the first net with exactly this name.
    pub fn net_named(&self, name: &str) -> Option<&Net> {
        self.nets.iter().find(|net| net.name == name)
    }

    /// Label of the form `name (mapped/total)`, counting nets whose target is set.
    pub fn summary(&self) -> String {
        let mapped = self.nets.iter().filter(|net| net.to_pin.is_some()).count();
        format!("{} ({}/{})", self.name, mapped, self.nets.len())
    }

    /// Check that no pin is claimed twice on the same side.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found in list order.
    pub fn check_pin_claims(&self) -> Result<(), InvariantViolation> {
        for side in [NetSide::Source, NetSide::Target] {
            let mut claimed = HashSet::new();
            for pin in self.nets.iter().filter_map(|net| net.pin(side)) {
                if !claimed.insert(pin) {
                    return Err(InvariantViolation::DuplicateClaim {
                        bus: self.id,
                        side,
                        pin,
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::EntityKind;

    fn net(from: Option<Id>, to: Option<Id>) -> Net {
        Net::new(
            Id::generate(EntityKind::Net),
            "n",
            from,
            to,
            NetAttrs::new("1", NetType::Data),
        )
    }

    fn bus_with(nets: Vec<Net>) -> Bus {
        let mut bus = Bus::new(
            Id::generate(EntityKind::Bus),
            "a_to_b",
            Id::generate(EntityKind::Port),
            Id::generate(EntityKind::Port),
            BusAttrs::new("custom", "1Gbps", "#22d3ee"),
        );
        *bus.nets_mut() = nets;
        bus
    }

    #[test]
    fn test_net_sides() {
        let a = Id::generate(EntityKind::Pin);
        let b = Id::generate(EntityKind::Pin);
        let mut n = net(Some(a), None);

        assert_eq!(n.pin(NetSide::Source), Some(a));
        assert!(!n.is_connected());

        n.set_pin(NetSide::Target, Some(b));
        assert!(n.is_connected());
        assert!(n.references(b));

        n.set_pin(NetSide::Source, None);
        assert_eq!(n.from_pin(), None);
        assert!(!n.references(a));
    }

    #[test]
    fn test_check_pin_claims_accepts_unset_duplicates() {
        let bus = bus_with(vec![net(None, None), net(None, None)]);
        assert_eq!(bus.check_pin_claims(), Ok(()));
    }

    #[test]
    fn test_check_pin_claims_reports_duplicate_target() {
        let shared = Id::generate(EntityKind::Pin);
        let bus = bus_with(vec![
            net(Some(Id::generate(EntityKind::Pin)), Some(shared)),
            net(Some(Id::generate(EntityKind::Pin)), Some(shared)),
        ]);

        let err = bus.check_pin_claims().unwrap_err();
        assert_eq!(
            err,
            InvariantViolation::DuplicateClaim {
                bus: bus.id(),
                side: NetSide::Target,
                pin: shared,
            }
        );
        assert!(err.to_string().contains("target pin"));
    }

    #[test]
    fn test_summary_counts_target_mapped_nets() {
        let bus = bus_with(vec![
            net(Some(Id::generate(EntityKind::Pin)), Some(Id::generate(EntityKind::Pin))),
            net(None, Some(Id::generate(EntityKind::Pin))),
            net(Some(Id::generate(EntityKind::Pin)), None),
        ]);
        assert_eq!(bus.summary(), "a_to_b (2/3)");
    }

    #[test]
    fn test_bus_attrs_by_key() {
        let mut attrs = BusAttrs::new("custom", "1Gbps", "#22d3ee");
        attrs.set(BusAttr::Protocol, "AXI4");
        attrs.set(BusAttr::Note, "main path");

        assert_eq!(attrs.protocol(), "AXI4");
        assert_eq!(attrs.get(BusAttr::Note), "main path");
        assert_eq!(attrs.get(BusAttr::Bandwidth), "1Gbps");
    }

    #[test]
    fn test_attr_keys_from_str() {
        assert_eq!("color".parse(), Ok(BusAttr::Color));
        assert_eq!("type".parse(), Ok(NetAttr::Type));
        assert!("colour".parse::<BusAttr>().is_err());
        assert_eq!("clock".parse(), Ok(NetType::Clock));
        assert_eq!("target".parse(), Ok(NetSide::Target));
    }
}
