//! Configuration types for the Buswire engine.
//!
//! This module provides the defaults the engine applies when it creates
//! entities. All types implement [`serde::Deserialize`] and every field is
//! optional, so a partial file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`BusConfig`] - Bus attribute defaults and the color palette.
//! - [`NetConfig`] - Net attribute defaults.
//! - [`BlockConfig`] - Placement of newly created blocks.
//! - [`PortConfig`] - Pins every new port starts with.
//!
//! # Example
//!
//! ```
//! # use buswire::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.bus().palette_color(0), "#22d3ee");
//! ```

use serde::Deserialize;

use buswire_core::{
    color::Color,
    model::{NetType, PinDirection},
};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    bus: BusConfig,

    #[serde(default)]
    net: NetConfig,

    #[serde(default)]
    block: BlockConfig,

    #[serde(default)]
    port: PortConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(bus: BusConfig, net: NetConfig, block: BlockConfig, port: PortConfig) -> Self {
        Self {
            bus,
            net,
            block,
            port,
        }
    }

    pub fn bus(&self) -> &BusConfig {
        &self.bus
    }

    pub fn net(&self) -> &NetConfig {
        &self.net
    }

    pub fn block(&self) -> &BlockConfig {
        &self.block
    }

    pub fn port(&self) -> &PortConfig {
        &self.port
    }

    /// Check values that deserialization alone cannot.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting: an empty palette,
    /// a palette entry or fallback that is not a CSS color, or a non-finite
    /// block placement value.
    pub fn validate(&self) -> Result<(), String> {
        Color::parse_palette(&self.bus.palette)
            .map_err(|err| format!("Invalid bus palette in config: {err}"))?;
        Color::new(&self.bus.fallback_color)
            .map_err(|err| format!("Invalid bus fallback color in config: {err}"))?;

        let placement = [
            ("origin_x", self.block.origin_x),
            ("origin_y", self.block.origin_y),
            ("spacing", self.block.spacing),
            ("width", self.block.width),
        ];
        if let Some((name, _)) = placement.iter().find(|(_, value)| !value.is_finite()) {
            return Err(format!("Invalid block {name} in config: must be finite"));
        }

        Ok(())
    }
}

/// Bus attribute defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Colors assigned to new buses in rotation.
    palette: Vec<String>,
    protocol: String,
    bandwidth: String,
    /// Color used when a bus color is cleared.
    fallback_color: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            palette: [
                "#22d3ee", "#f59e0b", "#a78bfa", "#34d399", "#fb7185", "#60a5fa",
            ]
            .map(String::from)
            .to_vec(),
            protocol: "custom".to_string(),
            bandwidth: "1Gbps".to_string(),
            fallback_color: "#60a5fa".to_string(),
        }
    }
}

impl BusConfig {
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn bandwidth(&self) -> &str {
        &self.bandwidth
    }

    pub fn fallback_color(&self) -> &str {
        &self.fallback_color
    }

    /// Palette entry for the bus created when `index` buses already exist.
    pub fn palette_color(&self, index: usize) -> &str {
        match self.palette.len() {
            0 => &self.fallback_color,
            len => &self.palette[index % len],
        }
    }
}

/// Net attribute defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    width: String,
    #[serde(rename = "type")]
    net_type: NetType,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            width: "1".to_string(),
            net_type: NetType::Data,
        }
    }
}

impl NetConfig {
    pub fn width(&self) -> &str {
        &self.width
    }

    pub fn net_type(&self) -> NetType {
        self.net_type
    }
}

/// Placement of newly created blocks.
///
/// The n-th block (zero based) is placed at
/// `(origin_x + n * spacing, origin_y)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    origin_x: f32,
    origin_y: f32,
    spacing: f32,
    width: f32,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            origin_x: 80.0,
            origin_y: 120.0,
            spacing: 240.0,
            width: 200.0,
        }
    }
}

impl BlockConfig {
    /// Position of the block created when `index` blocks already exist.
    pub fn position(&self, index: usize) -> (f32, f32) {
        (self.origin_x + index as f32 * self.spacing, self.origin_y)
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

/// A pin every new port starts with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PinTemplate {
    name: String,
    #[serde(default)]
    direction: PinDirection,
}

impl PinTemplate {
    pub fn new(name: impl Into<String>, direction: PinDirection) -> Self {
        Self {
            name: name.into(),
            direction,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> PinDirection {
        self.direction
    }
}

/// Defaults for newly created ports.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortConfig {
    pins: Vec<PinTemplate>,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            pins: vec![
                PinTemplate::new("pin0", PinDirection::In),
                PinTemplate::new("pin1", PinDirection::Out),
            ],
        }
    }
}

impl PortConfig {
    pub fn new(pins: Vec<PinTemplate>) -> Self {
        Self { pins }
    }

    pub fn pins(&self) -> &[PinTemplate] {
        &self.pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.bus().palette().len(), 6);
        assert_eq!(config.bus().protocol(), "custom");
        assert_eq!(config.bus().bandwidth(), "1Gbps");
        assert_eq!(config.net().width(), "1");
        assert_eq!(config.net().net_type(), NetType::Data);
        assert_eq!(config.block().position(2), (560.0, 120.0));
        assert_eq!(config.port().pins().len(), 2);
        assert_eq!(config.port().pins()[1].direction(), PinDirection::Out);
    }

    #[test]
    fn test_palette_cycles() {
        let config = BusConfig::default();
        assert_eq!(config.palette_color(1), "#f59e0b");
        assert_eq!(config.palette_color(6), "#22d3ee");
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r##"
            [bus]
            palette = ["red", "#00ff00"]

            [net]
            type = "clock"

            [[port.pins]]
            name = "clk"
            direction = "out"

            [[port.pins]]
            name = "rst"
            "##,
        )
        .unwrap();

        assert_eq!(config.bus().palette_color(3), "#00ff00");
        assert_eq!(config.bus().protocol(), "custom");
        assert_eq!(config.net().net_type(), NetType::Clock);
        assert_eq!(config.net().width(), "1");
        assert_eq!(
            config.port().pins(),
            [
                PinTemplate::new("clk", PinDirection::Out),
                PinTemplate::new("rst", PinDirection::In),
            ]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_colors() {
        let config: AppConfig = toml::from_str("[bus]\npalette = []\n").unwrap();
        assert!(config.validate().unwrap_err().contains("palette"));

        let config: AppConfig =
            toml::from_str("[bus]\nfallback_color = \"not-a-color\"\n").unwrap();
        assert!(config.validate().unwrap_err().contains("fallback"));
    }

    #[test]
    fn test_unknown_net_type_fails_to_deserialize() {
        let result: Result<AppConfig, _> = toml::from_str("[net]\ntype = \"analog\"\n");
        assert!(result.is_err());
    }
}
