//! The connection engine: every command that edits the graph.
//!
//! Commands never fail. An unknown id, a self connection, a duplicate bus or
//! a pin that does not belong to the addressed port all leave the graph
//! untouched; the reason is logged at `debug` level. Any command that can
//! introduce a duplicate pin claim normalizes the affected bus before it
//! returns, so the one-net-per-pin invariant holds between commands.

mod connect;
mod connect_mode;
mod create;
mod delete;
mod edit;
mod reassign;

pub use connect_mode::ConnectMode;

use buswire_core::{identifier::Id, model::Bus};

use crate::{config::AppConfig, normalize::normalize, notice::Notice, stats::ConnectionStats, store::GraphStore};

/// The entity currently selected in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Block(Id),
    Port(Id),
    Bus(Id),
}

impl Selection {
    pub fn id(&self) -> Id {
        match self {
            Selection::Block(id) | Selection::Port(id) | Selection::Bus(id) => *id,
        }
    }
}

/// Owns one [`GraphStore`] and applies commands to it.
///
/// # Examples
///
/// ```
/// use buswire::ConnectionEngine;
///
/// let mut engine = ConnectionEngine::default();
/// let cpu = engine.create_block(Some("cpu"));
/// let mem = engine.create_block(Some("mem"));
/// let out = engine.create_port(cpu, None).unwrap();
/// let inp = engine.create_port(mem, None).unwrap();
///
/// let bus = engine.connect(out, inp).unwrap();
/// let stats = engine.stats(bus);
/// assert_eq!(stats.connected, 2);
/// assert_eq!(stats.total_slots, 2);
///
/// // Connecting the same pair again changes nothing.
/// assert_eq!(engine.connect(out, inp), None);
/// assert_eq!(engine.store().buses().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ConnectionEngine {
    store: GraphStore,
    config: AppConfig,
    selection: Option<Selection>,
    connect_mode: ConnectMode,
    last_notice: Option<Notice>,
}

impl ConnectionEngine {
    /// Create an engine with an empty store.
    ///
    /// # Arguments
    ///
    /// * `config` - Defaults applied to created blocks, ports, buses and nets.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Read access to the graph.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<Selection> {
        self.selection
    }

    /// Replace the selection. `None` clears it.
    pub fn select(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// The most recent advisory notice, if any command produced one.
    pub fn last_notice(&self) -> Option<&Notice> {
        self.last_notice.as_ref()
    }

    /// Coverage statistics for a bus.
    ///
    /// Returns the zeroed result when the bus or either of its ports no
    /// longer exists.
    pub fn stats(&self, bus: Id) -> ConnectionStats {
        self.store
            .resolve_bus(bus)
            .map(|ends| ConnectionStats::compute(ends.bus, ends.source, ends.target))
            .unwrap_or_default()
    }

    /// Normalize one bus in place. No-op for an unknown bus.
    fn normalize_bus(&mut self, bus: Id) -> Option<&mut Bus> {
        let bus = self.store.bus_mut(bus)?;
        normalize(bus);
        Some(bus)
    }
}
