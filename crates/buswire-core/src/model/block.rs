//! Blocks, ports and pins.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::identifier::Id;

/// The side of a block a port is attached to.
///
/// The names match external configuration strings (snake_case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortSide {
    #[default]
    Left,
    Right,
}

impl PortSide {
    /// Side used for the port at `index`: even ports go left, odd ports right.
    pub fn alternating(index: usize) -> Self {
        if index % 2 == 0 { Self::Left } else { Self::Right }
    }
}

impl FromStr for PortSide {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err("Invalid port side"),
        }
    }
}

impl From<PortSide> for &'static str {
    fn from(val: PortSide) -> Self {
        match val {
            PortSide::Left => "left",
            PortSide::Right => "right",
        }
    }
}

impl fmt::Display for PortSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Advisory signal direction of a pin.
///
/// Directions are informational only; mapping never checks compatibility.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    #[default]
    In,
    Out,
    InOut,
}

impl FromStr for PinDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            "inout" => Ok(Self::InOut),
            _ => Err("Invalid pin direction"),
        }
    }
}

impl From<PinDirection> for &'static str {
    fn from(val: PinDirection) -> Self {
        match val {
            PinDirection::In => "in",
            PinDirection::Out => "out",
            PinDirection::InOut => "inout",
        }
    }
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// An individual named terminal within a [`Port`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    id: Id,
    name: String,
    direction: PinDirection,
}

impl Pin {
    /// Create a new Pin.
    pub fn new(id: Id, name: impl Into<String>, direction: PinDirection) -> Self {
        Self {
            id,
            name: name.into(),
            direction,
        }
    }

    /// Get the pin identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn direction(&self) -> PinDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: PinDirection) {
        self.direction = direction;
    }

    /// Name used for matching: trimmed and lowercased.
    pub fn match_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.direction)
    }
}

/// A named group of [`Pin`]s attached to one side of a [`Block`].
///
/// The side and vertical offset are layout data; the connection engine carries
/// them along but never interprets them.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    id: Id,
    name: String,
    side: PortSide,
    offset_y: f32,
    pins: Vec<Pin>,
}

impl Port {
    /// Create a new Port with its initial pins.
    pub fn new(
        id: Id,
        name: impl Into<String>,
        side: PortSide,
        offset_y: f32,
        pins: Vec<Pin>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            offset_y,
            pins,
        }
    }

    /// Get the port identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn side(&self) -> PortSide {
        self.side
    }

    pub fn set_side(&mut self, side: PortSide) {
        self.side = side;
    }

    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    pub fn set_offset_y(&mut self, offset_y: f32) {
        self.offset_y = offset_y;
    }

    /// Borrow the pins in port order.
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Mutable access to the ordered pin list.
    pub fn pins_mut(&mut self) -> &mut Vec<Pin> {
        &mut self.pins
    }

    /// Find a pin of this port by identifier.
    pub fn pin(&self, id: Id) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.id == id)
    }

    pub fn pin_mut(&mut self, id: Id) -> Option<&mut Pin> {
        self.pins.iter_mut().find(|pin| pin.id == id)
    }

    /// Find the first pin with exactly this name.
    pub fn pin_named(&self, name: &str) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.name == name)
    }

    /// Returns `true` if the pin belongs to this port.
    pub fn contains_pin(&self, id: Id) -> bool {
        self.pin(id).is_some()
    }
}

/// A named, positioned container of [`Port`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    id: Id,
    name: String,
    x: f32,
    y: f32,
    width: f32,
    ports: Vec<Port>,
}

impl Block {
    /// Create a new Block without ports.
    pub fn new(id: Id, name: impl Into<String>, x: f32, y: f32, width: f32) -> Self {
        Self {
            id,
            name: name.into(),
            x,
            y,
            width,
            ports: Vec::new(),
        }
    }

    /// Get the block identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Top-left corner of the block as `(x, y)`.
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Borrow the ports in creation order.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Mutable access to the ordered port list.
    pub fn ports_mut(&mut self) -> &mut Vec<Port> {
        &mut self.ports
    }

    /// Find a port of this block by identifier.
    pub fn port(&self, id: Id) -> Option<&Port> {
        self.ports.iter().find(|port| port.id == id)
    }

    pub fn port_mut(&mut self, id: Id) -> Option<&mut Port> {
        self.ports.iter_mut().find(|port| port.id == id)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
