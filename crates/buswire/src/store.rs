//! The graph store: every block and bus of one diagram.
//!
//! The store is plain owned data. Mutation goes through
//! [`ConnectionEngine`](crate::ConnectionEngine), which owns exactly one
//! store; readers borrow it through [`ConnectionEngine::store`](crate::ConnectionEngine::store).

use buswire_core::model::{Block, Bus};

/// Blocks and buses, each in creation order.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    blocks: Vec<Block>,
    buses: Vec<Bus>,
}

impl GraphStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the blocks in creation order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Borrow the buses in creation order.
    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.buses.is_empty()
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub(crate) fn buses_mut(&mut self) -> &mut Vec<Bus> {
        &mut self.buses
    }
}
