//! Graph model types.
//!
//! The model is tree shaped: a [`Block`] owns its [`Port`]s and each port owns
//! its [`Pin`]s, while a [`Bus`] owns its [`Net`]s. The two cross references,
//! bus to port and net to pin, are plain [`Id`](crate::identifier::Id) values
//! that must be resolved through a lookup and may dangle after a deletion.
//!
//! - [`block`] - Blocks, ports and pins
//! - [`bus`] - Buses, nets and their attribute bags

pub mod block;
pub mod bus;

pub use block::*;
pub use bus::*;
