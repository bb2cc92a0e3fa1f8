//! Buswire CLI library
//!
//! This module contains the core CLI logic for the Buswire script runner.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use buswire::{BuswireError, ScriptRunner};

/// Run the Buswire CLI application
///
/// This function executes the input script against a fresh connection
/// engine and writes the lines its queries produce to the output file, or
/// to standard output when no output path is given.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `BuswireError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Alias, net or pin resolution errors
pub fn run(args: &Args) -> Result<(), BuswireError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Running script"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let runner = ScriptRunner::new(app_config);
    let session = runner.run(&source)?;

    let lines = session.output();
    match &args.output {
        Some(path) => {
            let mut report = lines.join("\n");
            if !report.is_empty() {
                report.push('\n');
            }
            fs::write(path, report)?;
            info!(output_file = path, lines = lines.len(); "Output written");
        }
        None => {
            for line in lines {
                println!("{line}");
            }
        }
    }

    Ok(())
}
