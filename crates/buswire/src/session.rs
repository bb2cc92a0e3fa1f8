//! Script session: executes parsed statements against one engine.
//!
//! A session keeps the alias table a script builds with `let`, resolves
//! alias, net and pin references to identifiers, and collects the text the
//! query statements (`stats`, `connections`, `list`) and advisory notices
//! produce. Resolution failures stop the script with a [`Diagnostic`] that
//! points at the offending reference; the engine itself never fails.

use indexmap::IndexMap;
use log::{debug, info};

use buswire_core::{
    identifier::{EntityKind, Id},
    model::{Bus, Net},
};
use buswire_script::{
    Span, Spanned,
    ast::{Alias, Creation, Delete, NetField, Script, Statement},
    error::{Diagnostic, ErrorCode},
};

use crate::{engine::ConnectionEngine, notice::Notice};

const DELETED: &str = "<deleted>";

/// What an alias is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    kind: EntityKind,
    id: Id,
    defined_at: Span,
}

impl Binding {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Span of the alias in its `let` statement.
    pub fn defined_at(&self) -> Span {
        self.defined_at
    }
}

/// Executes script statements and records their output.
#[derive(Debug, Default)]
pub struct Session {
    engine: ConnectionEngine,
    bindings: IndexMap<String, Binding>,
    output: Vec<String>,
}

impl Session {
    pub fn new(engine: ConnectionEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn engine(&self) -> &ConnectionEngine {
        &self.engine
    }

    pub fn into_engine(self) -> ConnectionEngine {
        self.engine
    }

    /// Look up an alias bound by an earlier `let`.
    pub fn binding(&self, alias: &str) -> Option<Binding> {
        self.bindings.get(alias).copied()
    }

    /// All aliases in definition order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, Binding)> {
        self.bindings
            .iter()
            .map(|(alias, binding)| (alias.as_str(), *binding))
    }

    /// Lines produced so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Execute every statement of `script` in order.
    ///
    /// # Errors
    ///
    /// Stops at the first statement whose references cannot be resolved.
    /// Statements before it stay applied.
    pub fn run(&mut self, script: &Script) -> Result<(), Diagnostic> {
        info!(statements = script.len(); "Running script");
        for statement in script.statements() {
            self.execute(statement)?;
        }
        info!(
            aliases = self.bindings.len(),
            blocks = self.engine.store().blocks().len(),
            buses = self.engine.store().buses().len();
            "Script finished"
        );
        Ok(())
    }

    /// Execute one statement.
    ///
    /// # Errors
    ///
    /// Returns a diagnostic for an undefined, mistyped, duplicated or stale
    /// alias, an unknown net or pin name, or a self connection.
    pub fn execute(&mut self, statement: &Spanned<Statement>) -> Result<(), Diagnostic> {
        debug!(command = statement.keyword(); "Executing statement");
        match statement.inner() {
            Statement::Let { alias, creation } => self.execute_let(alias, creation),
            Statement::Pin {
                port,
                name,
                direction,
            } => {
                let port = self.resolve_as(port, EntityKind::Port)?;
                self.engine
                    .create_pin(port, Some(name.as_str()), direction.unwrap_or_default());
                Ok(())
            }
            Statement::AutoMap { bus } => {
                let bus = self.resolve_as(bus, EntityKind::Bus)?;
                self.engine.auto_map(bus);
                Ok(())
            }
            Statement::Reassign {
                bus,
                net,
                side,
                pin,
            } => {
                let bus_id = self.resolve_as(bus, EntityKind::Bus)?;
                let net = self.find_net(bus, bus_id, net)?;
                let pin = match pin {
                    Some(pin) => {
                        let port = self.engine.store().find_bus(bus_id).map(|b| b.port(*side));
                        Some(self.find_pin(port, pin)?)
                    }
                    None => None,
                };
                if let Some(notice) = self.engine.reassign(bus_id, net, *side, pin) {
                    let line = self.describe_notice(&notice);
                    self.output.push(line);
                }
                Ok(())
            }
            Statement::AddNet { bus } => {
                let bus = self.resolve_as(bus, EntityKind::Bus)?;
                self.engine.add_net(bus);
                Ok(())
            }
            Statement::Rename { target, name } => {
                let binding = self.lookup(target)?;
                match binding.kind {
                    EntityKind::Block => self.engine.rename_block(binding.id, name),
                    EntityKind::Port => self.engine.rename_port(binding.id, name),
                    _ => self.engine.rename_bus(binding.id, name),
                }
                Ok(())
            }
            Statement::SetBus { bus, attr, value } => {
                let bus = self.resolve_as(bus, EntityKind::Bus)?;
                self.engine.set_bus_attr(bus, *attr, value);
                Ok(())
            }
            Statement::SetNet {
                bus,
                net,
                field,
                value,
            } => {
                let bus_id = self.resolve_as(bus, EntityKind::Bus)?;
                let net = self.find_net(bus, bus_id, net)?;
                match field {
                    NetField::Name => self.engine.rename_net(bus_id, net, value),
                    NetField::Attr(attr) => self.engine.set_net_attr(bus_id, net, *attr, value),
                }
                Ok(())
            }
            Statement::Chain { ports } => self.execute_chain(ports),
            Statement::Delete(delete) => self.execute_delete(delete),
            Statement::Stats { bus } => {
                let id = self.resolve_as(bus, EntityKind::Bus)?;
                let line = self.describe_stats(id, bus);
                self.output.push(line);
                Ok(())
            }
            Statement::Connections { port } => {
                let id = self.resolve_as(port, EntityKind::Port)?;
                let line = self.describe_connections(id, port);
                self.output.push(line);
                Ok(())
            }
            Statement::List => {
                let lines = self.describe_graph();
                self.output.extend(lines);
                Ok(())
            }
        }
    }

    fn execute_let(&mut self, alias: &Alias, creation: &Creation) -> Result<(), Diagnostic> {
        if let Some(existing) = self.bindings.get(alias.as_str()) {
            return Err(Diagnostic::error(format!("alias `{}` is already defined", alias.inner()))
                .with_code(ErrorCode::E204)
                .with_label(alias.span(), "redefined here")
                .with_secondary_label(existing.defined_at, "first defined here")
                .with_help("pick a different alias name"));
        }

        let (kind, id) = match creation {
            Creation::Block { name } => (
                EntityKind::Block,
                self.engine.create_block(name.as_deref()),
            ),
            Creation::Port { block, name } => {
                let block_id = self.resolve_as(block, EntityKind::Block)?;
                let port = self
                    .engine
                    .create_port(block_id, name.as_deref())
                    .ok_or_else(|| stale(block, EntityKind::Block))?;
                (EntityKind::Port, port)
            }
            Creation::Connect { source, target } => {
                let source_id = self.resolve_as(source, EntityKind::Port)?;
                let target_id = self.resolve_as(target, EntityKind::Port)?;
                if source_id == target_id {
                    return Err(Diagnostic::error("a port cannot be connected to itself")
                        .with_code(ErrorCode::E205)
                        .with_label(target.span(), "same port as the source")
                        .with_secondary_label(source.span(), "source port"));
                }
                let bus = self.engine.connect(source_id, target_id).or_else(|| {
                    self.engine
                        .store()
                        .find_bus_between(source_id, target_id)
                        .map(Bus::id)
                });
                let Some(bus) = bus else {
                    let stale_end = if self.engine.store().find_port(source_id).is_none() {
                        source
                    } else {
                        target
                    };
                    return Err(stale(stale_end, EntityKind::Port));
                };
                (EntityKind::Bus, bus)
            }
        };

        debug!(alias = alias.as_str(), kind:%, id:%; "Bound alias");
        self.bindings.insert(
            alias.inner().clone(),
            Binding {
                kind,
                id,
                defined_at: alias.span(),
            },
        );
        Ok(())
    }

    fn execute_chain(&mut self, ports: &[Alias]) -> Result<(), Diagnostic> {
        let ids = ports
            .iter()
            .map(|port| self.resolve_as(port, EntityKind::Port))
            .collect::<Result<Vec<_>, _>>()?;

        if !self.engine.connect_mode().is_active() {
            self.engine.toggle_connect_mode();
        }
        for port in ids {
            self.engine.pick_port(port);
        }
        self.engine.toggle_connect_mode();
        Ok(())
    }

    fn execute_delete(&mut self, delete: &Delete) -> Result<(), Diagnostic> {
        match delete {
            Delete::Pin { port, name } => {
                let port = self.resolve_as(port, EntityKind::Port)?;
                let pin = self.find_pin(Some(port), name)?;
                self.engine.delete_pin(pin);
            }
            Delete::Net { bus, name } => {
                let bus_id = self.resolve_as(bus, EntityKind::Bus)?;
                let net = self.find_net(bus, bus_id, name)?;
                self.engine.delete_net(bus_id, net);
            }
            Delete::Bus { bus } => {
                let bus = self.resolve_as(bus, EntityKind::Bus)?;
                self.engine.delete_bus(bus);
            }
            Delete::Port { port } => {
                let port = self.resolve_as(port, EntityKind::Port)?;
                self.engine.delete_port(port);
            }
            Delete::Block { block } => {
                let block = self.resolve_as(block, EntityKind::Block)?;
                self.engine.delete_block(block);
            }
        }
        Ok(())
    }

    fn lookup(&self, alias: &Alias) -> Result<Binding, Diagnostic> {
        self.bindings.get(alias.as_str()).copied().ok_or_else(|| {
            Diagnostic::error(format!("undefined alias `{}`", alias.inner()))
                .with_code(ErrorCode::E200)
                .with_label(alias.span(), "not defined")
                .with_help("define it first with `let <alias> = block|port|connect ...`")
        })
    }

    /// Resolve an alias that must be bound to an entity of `kind`.
    fn resolve_as(&self, alias: &Alias, kind: EntityKind) -> Result<Id, Diagnostic> {
        let binding = self.lookup(alias)?;
        if binding.kind != kind {
            return Err(Diagnostic::error(format!(
                "`{}` is a {}, expected a {kind}",
                alias.inner(),
                binding.kind
            ))
            .with_code(ErrorCode::E201)
            .with_label(alias.span(), format!("this is a {}", binding.kind))
            .with_secondary_label(binding.defined_at, "defined here"));
        }
        Ok(binding.id)
    }

    fn find_net(&self, bus_alias: &Alias, bus: Id, name: &Spanned<String>) -> Result<Id, Diagnostic> {
        let found = self.engine.store().find_bus(bus);
        if let Some(net) = found.and_then(|bus| bus.net_named(name.as_str())) {
            return Ok(net.id());
        }

        let diagnostic = Diagnostic::error(format!(
            "no net named \"{}\" on bus `{}`",
            name.inner(),
            bus_alias.inner()
        ))
        .with_code(ErrorCode::E202)
        .with_label(name.span(), "unknown net");
        Err(match found {
            Some(bus) if !bus.nets().is_empty() => diagnostic.with_help(format!(
                "nets on this bus: {}",
                join(bus.nets().iter().map(Net::name))
            )),
            Some(_) => diagnostic.with_help("this bus has no nets; add one with `addnet`"),
            None => diagnostic.with_help("this bus was deleted"),
        })
    }

    /// Resolve a pin by name on `port`. `None` means the port is unknown.
    fn find_pin(&self, port: Option<Id>, name: &Spanned<String>) -> Result<Id, Diagnostic> {
        let found = port.and_then(|port| self.engine.store().find_port(port));
        if let Some(pin) = found.and_then(|port_ref| port_ref.port().pin_named(name.as_str())) {
            return Ok(pin.id());
        }

        let diagnostic = Diagnostic::error(format!("no pin named \"{}\"", name.inner()))
            .with_code(ErrorCode::E203)
            .with_label(name.span(), "unknown pin");
        Err(match found {
            Some(port_ref) if !port_ref.port().pins().is_empty() => {
                let port = port_ref.port();
                diagnostic.with_help(format!(
                    "pins on port \"{}\": {}",
                    port.name(),
                    join(port.pins().iter().map(|pin| pin.name()))
                ))
            }
            Some(port_ref) => {
                diagnostic.with_help(format!("port \"{}\" has no pins", port_ref.port().name()))
            }
            None => diagnostic.with_help("the port this pin would belong to was deleted"),
        })
    }

    fn pin_name(&self, pin: Id) -> &str {
        self.engine
            .store()
            .find_pin(pin)
            .map_or(DELETED, |pin_ref| pin_ref.pin().name())
    }

    fn port_name(&self, port: Id) -> &str {
        self.engine
            .store()
            .find_port(port)
            .map_or(DELETED, |port_ref| port_ref.port().name())
    }

    fn describe_notice(&self, notice: &Notice) -> String {
        match notice {
            Notice::PinEvicted {
                bus,
                side,
                pin,
                from_net,
                to_net,
            } => {
                let found = self.engine.store().find_bus(*bus);
                let net_name = |net: &Id| {
                    found
                        .and_then(|bus| bus.net(*net))
                        .map_or(DELETED, Net::name)
                };
                format!(
                    "notice: {side} pin \"{}\" moved from net \"{}\" to net \"{}\"",
                    self.pin_name(*pin),
                    net_name(from_net),
                    net_name(to_net)
                )
            }
        }
    }

    fn describe_stats(&self, bus: Id, alias: &Alias) -> String {
        let stats = self.engine.stats(bus);
        let name = self
            .engine
            .store()
            .find_bus(bus)
            .map_or(alias.as_str(), Bus::name);
        format!(
            "{name}: {stats} (source: {}; target: {})",
            join(stats.unconnected_source.iter().map(|pin| self.pin_name(*pin))),
            join(stats.unconnected_target.iter().map(|pin| self.pin_name(*pin)))
        )
    }

    fn describe_connections(&self, port: Id, alias: &Alias) -> String {
        let store = self.engine.store();
        let name = store
            .find_port(port)
            .map_or(alias.as_str(), |port_ref| port_ref.port().name());
        format!(
            "{name}: {}",
            join(store.port_connections(port).into_iter().map(Bus::summary))
        )
    }

    fn describe_graph(&self) -> Vec<String> {
        let store = self.engine.store();
        let mut lines = Vec::new();

        for block in store.blocks() {
            let (x, y) = block.position();
            lines.push(format!("block {} at ({x}, {y})", block.name()));
            for port in block.ports() {
                lines.push(format!(
                    "  port {} [{}]: {}",
                    port.name(),
                    port.side(),
                    join(port.pins().iter().map(|pin| pin.to_string()))
                ));
            }
        }

        for bus in store.buses() {
            let attrs = bus.attrs();
            lines.push(format!(
                "bus {}: {} -> {} protocol={} bandwidth={} color={}",
                bus.summary(),
                self.port_name(bus.source_port()),
                self.port_name(bus.target_port()),
                attrs.protocol(),
                attrs.bandwidth(),
                attrs.color()
            ));
            for net in bus.nets() {
                let end = |pin: Option<Id>| pin.map_or("-", |pin| self.pin_name(pin));
                lines.push(format!(
                    "  net {}: {} -> {} [{} {}]",
                    net.name(),
                    end(net.from_pin()),
                    end(net.to_pin()),
                    net.attrs().width(),
                    net.attrs().net_type()
                ));
            }
        }

        lines
    }
}

/// Diagnostic for an alias whose entity was deleted.
fn stale(alias: &Alias, kind: EntityKind) -> Diagnostic {
    Diagnostic::error(format!("{kind} `{}` was deleted", alias.inner()))
        .with_code(ErrorCode::E206)
        .with_label(alias.span(), "refers to a deleted entity")
}

/// Comma separated list, or `-` when empty.
fn join<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> String {
    let items: Vec<S> = items.into_iter().collect();
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use buswire_script::parse_script;

    use super::*;

    fn run(source: &str) -> Result<Session, Diagnostic> {
        let script = parse_script(source).unwrap();
        let mut session = Session::default();
        session.run(&script)?;
        Ok(session)
    }

    fn run_err(source: &str) -> Diagnostic {
        run(source).unwrap_err()
    }

    const PAIR: &str = r#"
let cpu = block "cpu"
let mem = block "mem"
let a = port cpu "axi_m"
let b = port mem "axi_s"
"#;

    #[test]
    fn test_let_binds_aliases_in_order() {
        let session = run(&format!("{PAIR}let link = connect a b\n")).unwrap();

        let kinds: Vec<_> = session
            .bindings()
            .map(|(alias, binding)| (alias.to_string(), binding.kind()))
            .collect();
        assert_eq!(
            kinds,
            [
                ("cpu".to_string(), EntityKind::Block),
                ("mem".to_string(), EntityKind::Block),
                ("a".to_string(), EntityKind::Port),
                ("b".to_string(), EntityKind::Port),
                ("link".to_string(), EntityKind::Bus),
            ]
        );
        let bus = session.binding("link").unwrap().id();
        assert_eq!(session.engine().store().find_bus(bus).unwrap().name(), "axi_m_to_axi_s");
    }

    #[test]
    fn test_duplicate_connect_binds_existing_bus() {
        let session = run(&format!("{PAIR}let one = connect a b\nlet two = connect a b\n")).unwrap();

        assert_eq!(session.engine().store().buses().len(), 1);
        assert_eq!(
            session.binding("one").unwrap().id(),
            session.binding("two").unwrap().id()
        );
    }

    #[test]
    fn test_undefined_alias() {
        let err = run_err("let p = port nowhere\n");
        assert_eq!(err.code(), Some(ErrorCode::E200));
        assert_eq!(err.labels()[0].span(), Span::new(13..20));
    }

    #[test]
    fn test_alias_kind_mismatch() {
        let err = run_err(&format!("{PAIR}stats cpu\n"));
        assert_eq!(err.code(), Some(ErrorCode::E201));
        assert!(err.message().contains("expected a bus"));
        assert_eq!(err.labels().len(), 2);
    }

    #[test]
    fn test_duplicate_alias() {
        let err = run_err("let x = block\nlet x = block\n");
        assert_eq!(err.code(), Some(ErrorCode::E204));
        assert_eq!(err.labels()[1].span(), Span::new(4..5));
    }

    #[test]
    fn test_self_connection_is_rejected() {
        let err = run_err(&format!("{PAIR}let loop = connect a a\n"));
        assert_eq!(err.code(), Some(ErrorCode::E205));
    }

    #[test]
    fn test_unknown_net_lists_available_names() {
        let err = run_err(&format!(
            "{PAIR}let link = connect a b\nreassign link \"nope\" target none\n"
        ));
        assert_eq!(err.code(), Some(ErrorCode::E202));
        assert_eq!(err.help(), Some("nets on this bus: net_pin0, net_pin1"));
    }

    #[test]
    fn test_unknown_pin_lists_available_names() {
        let err = run_err(&format!("{PAIR}delete pin a \"clk\"\n"));
        assert_eq!(err.code(), Some(ErrorCode::E203));
        assert_eq!(err.help(), Some("pins on port \"axi_m\": pin0, pin1"));
    }

    #[test]
    fn test_port_on_deleted_block_is_stale() {
        let err = run_err("let cpu = block\ndelete block cpu\nlet p = port cpu\n");
        assert_eq!(err.code(), Some(ErrorCode::E206));
    }

    #[test]
    fn test_reassign_reports_eviction() {
        let mut session = run(&format!(
            "{PAIR}let link = connect a b\nreassign link \"net_pin0\" target \"pin1\"\n"
        ))
        .unwrap();

        assert_eq!(
            session.take_output(),
            ["notice: target pin \"pin1\" moved from net \"net_pin1\" to net \"net_pin0\""]
        );
        assert!(session.output().is_empty());
    }

    #[test]
    fn test_stats_and_connections_output() {
        let session = run(&format!(
            "{PAIR}let link = connect a b\nreassign link \"net_pin1\" target none\nstats link\nconnections a\n"
        ))
        .unwrap();

        assert_eq!(
            session.output(),
            [
                "axi_m_to_axi_s: 1/2 connected, 1 source and 1 target pins open (source: pin1; target: pin1)",
                "axi_m: axi_m_to_axi_s (1/2)",
            ]
        );
    }

    #[test]
    fn test_chain_connects_consecutive_ports() {
        let session = run(
            "let x = block\nlet p = port x\nlet q = port x\nlet r = port x\nchain p q r\n",
        )
        .unwrap();

        let store = session.engine().store();
        let p = session.binding("p").unwrap().id();
        let q = session.binding("q").unwrap().id();
        let r = session.binding("r").unwrap().id();
        assert!(store.find_bus_between(p, q).is_some());
        assert!(store.find_bus_between(q, r).is_some());
        assert_eq!(store.buses().len(), 2);
        assert!(!session.engine().connect_mode().is_active());
    }

    #[test]
    fn test_set_and_rename() {
        let session = run(&format!(
            "{PAIR}let link = connect a b\nset link protocol \"axi4\"\nset link net \"net_pin0\" name \"clk\"\nset link net \"clk\" type \"clock\"\nrename link \"main\"\n"
        ))
        .unwrap();

        let bus = session.binding("link").unwrap().id();
        let bus = session.engine().store().find_bus(bus).unwrap();
        assert_eq!(bus.name(), "main");
        assert_eq!(bus.attrs().protocol(), "axi4");
        assert_eq!(
            bus.net_named("clk").unwrap().attrs().net_type().to_string(),
            "clock"
        );
    }

    #[test]
    fn test_list_describes_graph() {
        let session = run(&format!("{PAIR}let link = connect a b\nlist\n")).unwrap();
        let output = session.output();

        assert_eq!(output[0], "block cpu at (80, 120)");
        assert_eq!(output[1], "  port axi_m [left]: pin0:in, pin1:out");
        assert!(output.contains(
            &"bus axi_m_to_axi_s (2/2): axi_m -> axi_s protocol=custom bandwidth=1Gbps color=#22d3ee"
                .to_string()
        ));
        assert!(output.contains(&"  net net_pin0: pin0 -> pin0 [1 data]".to_string()));
    }

    #[test]
    fn test_bus_after_port_delete_is_tolerated() {
        let session = run(&format!(
            "{PAIR}let link = connect a b\ndelete port b\nstats link\nautomap link\naddnet link\n"
        ))
        .unwrap();

        assert_eq!(
            session.output(),
            ["axi_m_to_axi_s: 0/0 connected, 0 source and 0 target pins open (source: -; target: -)"]
        );
    }
}
