//! Statement tree produced by the script parser.
//!
//! Aliases and the names that the session resolves against the graph keep
//! their source spans so resolution failures can point at them. Free-form
//! values (new names, attribute values) are plain strings.

use std::{fmt, str::FromStr};

use buswire_core::model::{BusAttr, NetAttr, NetSide, PinDirection};

use crate::span::Spanned;

/// A parsed script: statements in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    statements: Vec<Spanned<Statement>>,
}

impl Script {
    pub fn new(statements: Vec<Spanned<Statement>>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[Spanned<Statement>] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl IntoIterator for Script {
    type Item = Spanned<Statement>;
    type IntoIter = std::vec::IntoIter<Spanned<Statement>>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

/// Reference to a previously bound alias.
pub type Alias = Spanned<String>;

/// One script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let <alias> = block|port|connect ...`
    Let { alias: Alias, creation: Creation },
    /// `pin <port> "name" [direction]`
    Pin {
        port: Alias,
        name: Spanned<String>,
        direction: Option<PinDirection>,
    },
    /// `automap <bus>`
    AutoMap { bus: Alias },
    /// `reassign <bus> "net" source|target "pin"|none`
    Reassign {
        bus: Alias,
        net: Spanned<String>,
        side: NetSide,
        pin: Option<Spanned<String>>,
    },
    /// `addnet <bus>`
    AddNet { bus: Alias },
    /// `rename <alias> "name"`
    Rename { target: Alias, name: String },
    /// `set <bus> protocol|bandwidth|note|color "value"`
    SetBus {
        bus: Alias,
        attr: BusAttr,
        value: String,
    },
    /// `set <bus> net "net" name|width|type|note "value"`
    SetNet {
        bus: Alias,
        net: Spanned<String>,
        field: NetField,
        value: String,
    },
    /// `chain <port> <port> [<port> ...]`
    Chain { ports: Vec<Alias> },
    /// `delete ...`
    Delete(Delete),
    /// `stats <bus>`
    Stats { bus: Alias },
    /// `connections <port>`
    Connections { port: Alias },
    /// `list`
    List,
}

impl Statement {
    /// The command keyword that starts this statement.
    pub fn keyword(&self) -> &'static str {
        match self {
            Statement::Let { .. } => "let",
            Statement::Pin { .. } => "pin",
            Statement::AutoMap { .. } => "automap",
            Statement::Reassign { .. } => "reassign",
            Statement::AddNet { .. } => "addnet",
            Statement::Rename { .. } => "rename",
            Statement::SetBus { .. } | Statement::SetNet { .. } => "set",
            Statement::Chain { .. } => "chain",
            Statement::Delete(_) => "delete",
            Statement::Stats { .. } => "stats",
            Statement::Connections { .. } => "connections",
            Statement::List => "list",
        }
    }
}

/// Right-hand side of a `let` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Creation {
    Block { name: Option<String> },
    Port { block: Alias, name: Option<String> },
    Connect { source: Alias, target: Alias },
}

/// Target of a `delete` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Delete {
    Pin { port: Alias, name: Spanned<String> },
    Net { bus: Alias, name: Spanned<String> },
    Bus { bus: Alias },
    Port { port: Alias },
    Block { block: Alias },
}

/// Field of a net that `set <bus> net` can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetField {
    Name,
    Attr(NetAttr),
}

impl FromStr for NetField {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            other => other
                .parse()
                .map(Self::Attr)
                .map_err(|_| "Invalid net field"),
        }
    }
}

impl fmt::Display for NetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetField::Name => write!(f, "name"),
            NetField::Attr(NetAttr::Width) => write!(f, "width"),
            NetField::Attr(NetAttr::Type) => write!(f, "type"),
            NetField::Attr(NetAttr::Note) => write!(f, "note"),
        }
    }
}
