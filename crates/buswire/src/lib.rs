//! Buswire - A connection graph engine for block, port, pin and bus diagrams.
//!
//! Blocks own ports, ports own pins, and buses join a source port to a
//! target port through nets that each pair one source pin with one target
//! pin. The engine keeps every pin claimed by at most one net per side and
//! bus, auto-maps pins by name, and reports coverage. Scripts written in the
//! Buswire command language drive the engine through a [`Session`].

pub mod config;
pub mod session;

mod automap;
mod engine;
mod error;
mod lookup;
mod normalize;
mod notice;
mod stats;
mod store;

pub use buswire_core::{color, identifier, model};

pub use automap::pair_pins;
pub use engine::{ConnectMode, ConnectionEngine, Selection};
pub use error::BuswireError;
pub use lookup::{BusEnds, PinRef, PortRef};
pub use normalize::normalize;
pub use notice::Notice;
pub use session::Session;
pub use stats::ConnectionStats;
pub use store::GraphStore;

use log::{debug, info, trace};

use buswire_script::ast::Script;

use config::AppConfig;

/// Runner for Buswire command scripts.
///
/// Parses a script and executes it against a fresh engine built from the
/// configuration.
///
/// # Examples
///
/// ```
/// use buswire::{ScriptRunner, config::AppConfig};
///
/// let source = r#"
///     let cpu = block "cpu"
///     let mem = block "mem"
///     let out = port cpu "axi_m"
///     let inp = port mem "axi_s"
///     let link = connect out inp
///     stats link
/// "#;
///
/// let runner = ScriptRunner::new(AppConfig::default());
/// let session = runner.run(source).expect("script runs");
/// assert_eq!(session.engine().store().buses().len(), 1);
/// assert!(session.output()[0].starts_with("axi_m_to_axi_s: 2/2 connected"));
/// ```
#[derive(Debug, Default)]
pub struct ScriptRunner {
    config: AppConfig,
}

impl ScriptRunner {
    /// Create a runner whose engines use `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Defaults applied to created blocks, ports, buses and nets
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse source code into a script.
    ///
    /// # Errors
    ///
    /// Returns `BuswireError::Parse` with one diagnostic per malformed line.
    pub fn parse(&self, source: &str) -> Result<Script, BuswireError> {
        info!("Parsing script");

        let script = buswire_script::parse_script(source)
            .map_err(|err| BuswireError::new_parse_error(err, source))?;

        debug!(statements = script.len(); "Script parsed successfully");
        trace!(script:?; "Parsed script");

        Ok(script)
    }

    /// Parse and execute a script against a fresh engine.
    ///
    /// # Errors
    ///
    /// Returns `BuswireError::Config` if the configuration is invalid,
    /// `BuswireError::Parse` for syntax errors, and `BuswireError::Script`
    /// for the first reference that cannot be resolved.
    pub fn run(&self, source: &str) -> Result<Session, BuswireError> {
        self.config.validate().map_err(BuswireError::Config)?;
        let script = self.parse(source)?;

        let mut session = Session::new(ConnectionEngine::new(self.config.clone()));
        session
            .run(&script)
            .map_err(|err| BuswireError::new_script_error(err, source))?;

        info!(output_lines = session.output().len(); "Script executed successfully");
        Ok(session)
    }
}
