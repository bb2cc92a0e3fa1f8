//! Error and diagnostic system for Buswire scripts.
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error with an error code, labeled source spans and optional help
//! text. Parse failures wrap every diagnostic found in the script in a
//! [`ParseError`]; the script session reuses [`Diagnostic`] for name
//! resolution failures so both render the same way.
//!
//! # Example
//!
//! ```
//! # use buswire_script::error::{Diagnostic, ErrorCode};
//! # use buswire_script::Span;
//!
//! let diag = Diagnostic::error("alias `cpu` is already defined")
//!     .with_code(ErrorCode::E204)
//!     .with_label(Span::new(40..43), "redefined here")
//!     .with_secondary_label(Span::new(4..7), "first defined here")
//!     .with_help("pick a different alias name");
//! assert_eq!(diag.labels().len(), 2);
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
