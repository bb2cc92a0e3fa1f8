//! Color handling for bus palettes
//!
//! Bus colors are opaque strings inside the graph, but configured palettes
//! are validated up front. This module provides the [`Color`] type which wraps
//! the `DynamicColor` type from the color crate for that validation.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use buswire_core::color::Color;
    ///
    /// let cyan = Color::new("#22d3ee").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// assert!(Color::new("bluish").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Validates every entry of a palette, reporting the first invalid one.
    ///
    /// # Errors
    ///
    /// Returns an error if the palette is empty or any entry is not a CSS color.
    pub fn parse_palette<S: AsRef<str>>(entries: &[S]) -> Result<Vec<Self>, String> {
        if entries.is_empty() {
            return Err("palette must contain at least one color".to_string());
        }
        entries.iter().map(|entry| Self::new(entry.as_ref())).collect()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}
