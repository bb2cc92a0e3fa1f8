//! Buswire Core Types and Definitions
//!
//! This crate provides the foundational types for Buswire connectivity
//! graphs. It includes:
//!
//! - **Identifiers**: Process-unique, string-interned identifiers ([`identifier::Id`])
//! - **Colors**: CSS color validation for bus palettes ([`color::Color`])
//! - **Model**: Blocks, ports, pins, buses and nets ([`model`] module)

pub mod color;
pub mod identifier;
pub mod model;
