//! Chained port picking.

use log::debug;

use buswire_core::identifier::Id;

use super::{ConnectionEngine, Selection};

/// State of the connect mode.
///
/// While active, every picked port connects from the pending source and
/// then becomes the new pending source, so picking `a, b, c` creates
/// `a -> b` and `b -> c`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectMode {
    active: bool,
    pending_source: Option<Id>,
}

impl ConnectMode {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Port the next pick connects from.
    pub fn pending_source(&self) -> Option<Id> {
        self.pending_source
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending_source = None;
    }
}

impl ConnectionEngine {
    pub fn connect_mode(&self) -> ConnectMode {
        self.connect_mode
    }

    /// Enter or leave connect mode. Either way the pending source is cleared.
    ///
    /// Returns whether connect mode is now active.
    pub fn toggle_connect_mode(&mut self) -> bool {
        self.connect_mode = ConnectMode {
            active: !self.connect_mode.active,
            pending_source: None,
        };
        debug!(active = self.connect_mode.active; "Toggled connect mode");
        self.connect_mode.active
    }

    /// Handle a click on a port.
    ///
    /// Outside connect mode this selects the port. In connect mode the first
    /// pick sets the pending source and every later pick connects the
    /// pending source to the picked port, returning the new bus if one was
    /// created. Unknown ports are ignored.
    pub fn pick_port(&mut self, port: Id) -> Option<Id> {
        if self.store.find_port(port).is_none() {
            debug!(port:% = port; "Ignoring pick of an unknown port");
            return None;
        }
        if !self.connect_mode.active {
            self.selection = Some(Selection::Port(port));
            return None;
        }

        let Some(source) = self.connect_mode.pending_source else {
            self.connect_mode.pending_source = Some(port);
            return None;
        };
        let bus = self.connect(source, port);
        self.connect_mode.pending_source = Some(port);
        bus
    }
}
