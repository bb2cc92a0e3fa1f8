//! Pin-claim normalization.
//!
//! Within one bus, a pin may be held by at most one net on each side.
//! [`normalize`] restores that by scanning nets in list order: the first net
//! holding a pin keeps it and every later holder loses that side.

use std::collections::HashSet;

use log::trace;

use buswire_core::model::{Bus, NetSide};

/// Clear duplicate pin claims, first net in list order wins.
///
/// Source and target claims are arbitrated independently. Returns the
/// number of net ends that were cleared.
pub fn normalize(bus: &mut Bus) -> usize {
    let bus_id = bus.id();
    let mut cleared = 0;

    for side in [NetSide::Source, NetSide::Target] {
        let mut claimed = HashSet::new();
        for net in bus.nets_mut() {
            let Some(pin) = net.pin(side) else {
                continue;
            };
            if !claimed.insert(pin) {
                trace!(bus:% = bus_id, net:% = net.id(), pin:% = pin, side:%; "Dropping duplicate pin claim");
                net.set_pin(side, None);
                cleared += 1;
            }
        }
    }

    debug_assert!(
        bus.check_pin_claims().is_ok(),
        "normalization left duplicate claims"
    );
    cleared
}
