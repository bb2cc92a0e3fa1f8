//! Integration tests for the ConnectionEngine API
//!
//! These tests drive the engine only through its public command and query
//! surface.

use buswire::{
    ConnectionEngine, Notice, Selection,
    config::{AppConfig, BlockConfig, BusConfig, NetConfig, PortConfig},
    identifier::Id,
    model::{NetSide, PinDirection},
};

/// Engine whose new ports start without pins.
fn bare_engine() -> ConnectionEngine {
    ConnectionEngine::new(AppConfig::new(
        BusConfig::default(),
        NetConfig::default(),
        BlockConfig::default(),
        PortConfig::new(Vec::new()),
    ))
}

/// Create a port on a new block and give it the named pins.
fn port_with_pins(engine: &mut ConnectionEngine, names: &[&str]) -> (Id, Vec<Id>) {
    let block = engine.create_block(None);
    let port = engine.create_port(block, None).expect("block exists");
    let pins = names
        .iter()
        .map(|name| {
            engine
                .create_pin(port, Some(*name), PinDirection::In)
                .expect("port exists")
        })
        .collect();
    (port, pins)
}

fn target_of(engine: &ConnectionEngine, bus: Id, from: Id) -> Option<Id> {
    engine
        .store()
        .find_bus(bus)
        .and_then(|bus| bus.nets().iter().find(|net| net.from_pin() == Some(from)))
        .and_then(|net| net.to_pin())
}

#[test]
fn test_connect_twice_creates_one_bus() {
    let mut engine = bare_engine();
    let (a, _) = port_with_pins(&mut engine, &["x"]);
    let (b, _) = port_with_pins(&mut engine, &["x"]);

    let bus = engine.connect(a, b);
    assert!(bus.is_some());
    assert_eq!(engine.connect(a, b), None);
    assert_eq!(engine.store().buses().len(), 1);
    assert_eq!(engine.selected(), bus.map(Selection::Bus));
}

#[test]
fn test_reverse_direction_is_a_different_bus() {
    let mut engine = bare_engine();
    let (a, _) = port_with_pins(&mut engine, &[]);
    let (b, _) = port_with_pins(&mut engine, &[]);

    assert!(engine.connect(a, b).is_some());
    assert!(engine.connect(b, a).is_some());
    assert_eq!(engine.store().buses().len(), 2);
}

#[test]
fn test_self_connection_creates_nothing() {
    let mut engine = bare_engine();
    let (a, _) = port_with_pins(&mut engine, &["x"]);

    assert_eq!(engine.connect(a, a), None);
    assert!(engine.store().buses().is_empty());
}

#[test]
fn test_automap_matches_names_regardless_of_order() {
    let mut engine = bare_engine();
    let (a, source) = port_with_pins(&mut engine, &["clk", "data", "rst"]);
    let (b, target) = port_with_pins(&mut engine, &["RST", "Data", "CLK"]);

    let bus = engine.connect(a, b).expect("new bus");

    assert_eq!(target_of(&engine, bus, source[0]), Some(target[2]));
    assert_eq!(target_of(&engine, bus, source[1]), Some(target[1]));
    assert_eq!(target_of(&engine, bus, source[2]), Some(target[0]));
}

#[test]
fn test_automap_falls_back_to_position() {
    let mut engine = bare_engine();
    let (a, source) = port_with_pins(&mut engine, &["a", "b"]);
    let (b, target) = port_with_pins(&mut engine, &["x", "y"]);

    let bus = engine.connect(a, b).expect("new bus");

    assert_eq!(target_of(&engine, bus, source[0]), Some(target[0]));
    assert_eq!(target_of(&engine, bus, source[1]), Some(target[1]));
}

#[test]
fn test_automap_replaces_previous_nets() {
    let mut engine = bare_engine();
    let (a, _) = port_with_pins(&mut engine, &["a", "b"]);
    let (b, _) = port_with_pins(&mut engine, &["a", "b"]);
    let bus = engine.connect(a, b).expect("new bus");
    engine.add_net(bus);
    engine.add_net(bus);
    assert_eq!(engine.store().find_bus(bus).unwrap().nets().len(), 4);

    engine.auto_map(bus);

    assert_eq!(engine.store().find_bus(bus).unwrap().nets().len(), 2);
}

#[test]
fn test_reassign_evicts_previous_holder() {
    let mut engine = bare_engine();
    let (a, _) = port_with_pins(&mut engine, &["p", "q"]);
    let (b, target) = port_with_pins(&mut engine, &["x"]);
    let bus = engine.connect(a, b).expect("new bus");

    let nets: Vec<Id> = engine
        .store()
        .find_bus(bus)
        .unwrap()
        .nets()
        .iter()
        .map(|net| net.id())
        .collect();
    // "q" found no name match and nothing at index 1, so it starts open.
    let found = engine.store().find_bus(bus).unwrap();
    assert_eq!(found.nets()[0].to_pin(), Some(target[0]));
    assert_eq!(found.nets()[1].to_pin(), None);

    let notice = engine.reassign(bus, nets[1], NetSide::Target, Some(target[0]));

    assert_eq!(
        notice,
        Some(Notice::PinEvicted {
            bus,
            side: NetSide::Target,
            pin: target[0],
            from_net: nets[0],
            to_net: nets[1],
        })
    );
    assert_eq!(engine.last_notice(), notice.as_ref());

    let found = engine.store().find_bus(bus).unwrap();
    assert_eq!(found.nets()[0].to_pin(), None);
    assert_eq!(found.nets()[1].to_pin(), Some(target[0]));
    let holders = found
        .nets()
        .iter()
        .filter(|net| net.to_pin() == Some(target[0]))
        .count();
    assert_eq!(holders, 1);
}

#[test]
fn test_reassign_to_none_disconnects() {
    let mut engine = bare_engine();
    let (a, _) = port_with_pins(&mut engine, &["p"]);
    let (b, _) = port_with_pins(&mut engine, &["p"]);
    let bus = engine.connect(a, b).expect("new bus");
    let net = engine.store().find_bus(bus).unwrap().nets()[0].id();

    assert_eq!(engine.reassign(bus, net, NetSide::Source, None), None);

    let found = engine.store().find_bus(bus).unwrap();
    assert_eq!(found.nets()[0].from_pin(), None);
    assert_eq!(engine.stats(bus).connected, 0);
}

#[test]
fn test_stats_on_asymmetric_width() {
    let mut engine = bare_engine();
    let (a, source) = port_with_pins(&mut engine, &["a", "b", "c"]);
    let (b, _) = port_with_pins(&mut engine, &["a", "b"]);
    let bus = engine.connect(a, b).expect("new bus");

    let stats = engine.stats(bus);

    assert_eq!(stats.total_slots, 3);
    assert_eq!(stats.connected, 2);
    assert_eq!(stats.unconnected_source, [source[2]]);
    assert!(stats.unconnected_target.is_empty());
}

#[test]
fn test_stats_counts_only_nets_with_a_target() {
    let mut engine = bare_engine();
    let (a, source) = port_with_pins(&mut engine, &["a"]);
    let (b, target) = port_with_pins(&mut engine, &["a"]);
    let bus = engine.connect(a, b).expect("new bus");
    let net = engine.store().find_bus(bus).unwrap().nets()[0].id();

    // Only the source end is left: the source pin counts as open too.
    engine.reassign(bus, net, NetSide::Target, None);
    let stats = engine.stats(bus);

    assert_eq!(stats.connected, 0);
    assert_eq!(stats.unconnected_source, source);
    assert_eq!(stats.unconnected_target, target);
}

#[test]
fn test_pin_delete_removes_referencing_nets() {
    let mut engine = bare_engine();
    let (a, source) = port_with_pins(&mut engine, &["a", "b"]);
    let (b, _) = port_with_pins(&mut engine, &["a", "b"]);
    let bus = engine.connect(a, b).expect("new bus");

    assert!(engine.delete_pin(source[0]));

    let found = engine.store().find_bus(bus).unwrap();
    assert_eq!(found.nets().len(), 1);
    assert!(found.nets().iter().all(|net| !net.references(source[0])));
    assert!(engine.store().find_pin(source[0]).is_none());
}

#[test]
fn test_deleted_port_leaves_bus_with_zeroed_stats() {
    let mut engine = bare_engine();
    let (a, source) = port_with_pins(&mut engine, &["a", "b"]);
    let (b, _) = port_with_pins(&mut engine, &["a", "b"]);
    let bus = engine.connect(a, b).expect("new bus");

    assert!(engine.delete_port(b));

    assert!(engine.store().find_bus(bus).is_some());
    assert!(engine.stats(bus).is_empty());
    assert_eq!(engine.store().port_connections(a).len(), 1);

    let nets = |engine: &ConnectionEngine| -> Vec<(Id, Option<Id>, Option<Id>)> {
        engine
            .store()
            .find_bus(bus)
            .unwrap()
            .nets()
            .iter()
            .map(|net| (net.id(), net.from_pin(), net.to_pin()))
            .collect()
    };
    let before = nets(&engine);
    let net = before[0].0;

    // Commands on the stale bus leave its nets untouched.
    engine.auto_map(bus);
    assert_eq!(engine.reassign(bus, net, NetSide::Target, None), None);
    assert_eq!(engine.reassign(bus, net, NetSide::Source, None), None);
    assert_eq!(engine.reassign(bus, net, NetSide::Source, Some(source[1])), None);

    assert_eq!(nets(&engine), before);
    assert!(engine.stats(bus).is_empty());
    assert!(engine.last_notice().is_none());
}

#[test]
fn test_commands_on_unknown_ids_are_no_ops() {
    let mut engine = bare_engine();
    let (a, pins) = port_with_pins(&mut engine, &["a"]);
    let unknown: Id = "bus_unknown".into();

    assert_eq!(engine.connect(a, unknown), None);
    assert_eq!(engine.add_net(unknown), None);
    assert_eq!(engine.reassign(unknown, unknown, NetSide::Source, Some(pins[0])), None);
    assert!(!engine.delete_bus(unknown));
    assert!(!engine.delete_net(unknown, unknown));
    assert!(engine.stats(unknown).is_empty());
    assert!(engine.store().buses().is_empty());
}

#[test]
fn test_connect_mode_links_picked_ports() {
    let mut engine = bare_engine();
    let (a, _) = port_with_pins(&mut engine, &[]);
    let (b, _) = port_with_pins(&mut engine, &[]);
    let (c, _) = port_with_pins(&mut engine, &[]);

    assert!(engine.toggle_connect_mode());
    assert_eq!(engine.pick_port(a), None);
    assert!(engine.pick_port(b).is_some());
    assert!(engine.pick_port(c).is_some());
    assert!(!engine.toggle_connect_mode());

    let store = engine.store();
    assert!(store.find_bus_between(a, b).is_some());
    assert!(store.find_bus_between(b, c).is_some());
}
