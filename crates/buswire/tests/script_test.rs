//! Integration tests for the ScriptRunner API

use buswire::{BuswireError, ScriptRunner, config::AppConfig};
use buswire_script::error::ErrorCode;

const SOC: &str = r#"
# A small system: the CPU master port talks to memory.
let cpu = block "cpu"
let mem = block "mem"
let m = port cpu "axi_m"
let s = port mem "axi_s"
pin m "clk" out
pin s "CLK" in

let link = connect m s
set link protocol "axi4"
set link bandwidth "12.8GB/s"
stats link
connections s
"#;

#[test]
fn test_runner_api_exists() {
    let _runner = ScriptRunner::default();
}

#[test]
fn test_run_builds_graph_and_reports() {
    let runner = ScriptRunner::new(AppConfig::default());
    let session = runner.run(SOC).expect("script should run");

    let store = session.engine().store();
    assert_eq!(store.blocks().len(), 2);
    assert_eq!(store.buses().len(), 1);
    assert_eq!(store.buses()[0].attrs().protocol(), "axi4");
    assert_eq!(
        session.output(),
        [
            "axi_m_to_axi_s: 3/3 connected, 0 source and 0 target pins open (source: -; target: -)",
            "axi_s: axi_m_to_axi_s (3/3)",
        ]
    );
}

#[test]
fn test_parse_errors_are_collected() {
    let source = "let a = block\nfrobnicate a\nlet b = \nlist\n";
    let err = ScriptRunner::default().run(source).unwrap_err();

    match err {
        BuswireError::Parse { err, src } => {
            assert_eq!(err.diagnostics().len(), 2);
            assert_eq!(src, source);
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_resolution_error_carries_source() {
    let source = "let a = block\nstats a\n";
    let err = ScriptRunner::default().run(source).unwrap_err();

    match err {
        BuswireError::Script { err, src } => {
            assert_eq!(err.code(), Some(ErrorCode::E201));
            assert_eq!(src, source);
        }
        other => panic!("expected a script error, got {other:?}"),
    }
}

#[test]
fn test_invalid_config_is_reported_before_running() {
    let config: AppConfig = toml::from_str("[bus]\npalette = []\n").unwrap();
    let err = ScriptRunner::new(config).run("list\n").unwrap_err();

    assert!(matches!(err, BuswireError::Config(_)));
}

#[test]
fn test_runner_reusability() {
    let runner = ScriptRunner::default();

    let first = runner.run("let a = block\nlet b = block\n").unwrap();
    let second = runner.run("let a = block\n").unwrap();

    assert_eq!(first.engine().store().blocks().len(), 2);
    assert_eq!(second.engine().store().blocks().len(), 1);
}
