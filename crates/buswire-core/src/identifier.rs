//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type with an efficient string-interner based approach,
//! and the process-wide generator that hands out fresh identifiers per [`EntityKind`].

use std::{
    fmt,
    str::FromStr,
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Serial shared by every entity kind, so generated ids never collide across kinds.
static SERIAL: AtomicU64 = AtomicU64::new(1);

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut interner)
}

/// The kind of graph entity an identifier was generated for.
///
/// The names match the prefix used in generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Block,
    Port,
    Pin,
    Bus,
    Net,
}

impl From<EntityKind> for &'static str {
    fn from(val: EntityKind) -> Self {
        match val {
            EntityKind::Block => "block",
            EntityKind::Port => "port",
            EntityKind::Pin => "pin",
            EntityKind::Bus => "bus",
            EntityKind::Net => "net",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Efficient identifier type using string interning
///
/// Identifiers are opaque to callers: they compare, hash and print, but nothing
/// should depend on their textual shape.
///
/// # Examples
///
/// ```
/// use buswire_core::identifier::{EntityKind, Id};
///
/// let first = Id::generate(EntityKind::Pin);
/// let second = Id::generate(EntityKind::Pin);
/// assert_ne!(first, second);
///
/// // Ids held in text form can be turned back into an `Id`
/// let same: Id = first.to_string().as_str().into();
/// assert_eq!(first, same);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Generates an identifier that this process has never returned before.
    ///
    /// The serial is shared by all kinds, so two entities of different kinds
    /// never share an identifier either. Serials whose text is already
    /// interned, for example through [`Id::new`], are skipped.
    ///
    /// Interned text is never released, so every generated id stays in memory
    /// for the life of the process, including ids of deleted entities.
    ///
    /// # Arguments
    ///
    /// * `kind` - The kind of entity the identifier is issued for.
    pub fn generate(kind: EntityKind) -> Self {
        with_interner(|interner| loop {
            let serial = SERIAL.fetch_add(1, Ordering::Relaxed);
            let text = format!("{kind}-{serial}");
            if interner.get(&text).is_none() {
                return Self(interner.get_or_intern(text));
            }
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = with_interner(|interner| interner.resolve(self.0).map(str::to_owned));
        match value {
            Some(value) => write!(f, "{value}"),
            None => write!(f, "<unknown>"),
        }
    }
}

impl FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
