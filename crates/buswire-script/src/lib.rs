//! # Buswire Script
//!
//! Parser for Buswire command scripts: a line-oriented transcript of graph
//! edits and queries.
//!
//! ## Usage
//!
//! ```
//! # use buswire_script::{parse_script, ast::Statement, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         let cpu = block "CPU"
//!         let out = port cpu "axi"
//!         pin out "clk" out
//!         list   # show everything
//!     "#;
//!
//!     let script = parse_script(source)?;
//!     assert_eq!(script.len(), 4);
//!     assert_eq!(script.statements()[3].inner(), &Statement::List);
//!     Ok(())
//! }
//! ```

pub mod ast;
pub mod error;
mod parser;
mod span;

pub use error::ParseError;
pub use span::{Span, Spanned};

use log::debug;

use ast::Script;

/// Parse script source text into statements.
///
/// Parsing continues past malformed lines, so the returned error carries one
/// diagnostic per bad line.
///
/// # Errors
///
/// Returns [`ParseError`] if any line fails to parse.
pub fn parse_script(source: &str) -> Result<Script, ParseError> {
    let result = parser::parse(source);
    match &result {
        Ok(script) => debug!(statements = script.len(); "Parsed script"),
        Err(err) => debug!(diagnostics = err.diagnostics().len(); "Script has syntax errors"),
    }
    result
}
