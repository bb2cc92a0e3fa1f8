use buswire_core::model::{BusAttr, NetSide};
use buswire_script::{
    ast::{Creation, Delete, Statement},
    error::ErrorCode,
    parse_script,
};

const DEMO: &str = r#"
# Two blocks joined by one bus
let cpu = block "CPU"
let mem = block "Memory"

let cpu_axi = port cpu "axi_m"
let mem_axi = port mem "axi_s"
pin cpu_axi "clk" out
pin mem_axi "CLK" in

let link = connect cpu_axi mem_axi
set link protocol "AXI4"
reassign link "net_clk" target none
stats link
delete net link "net_clk"
"#;

#[test]
fn parses_full_script_in_order() {
    let script = parse_script(DEMO).unwrap();
    let keywords: Vec<_> = script
        .statements()
        .iter()
        .map(|statement| statement.keyword())
        .collect();

    assert_eq!(
        keywords,
        [
            "let", "let", "let", "let", "pin", "pin", "let", "set", "reassign", "stats", "delete"
        ]
    );
}

#[test]
fn statement_spans_point_into_source() {
    let script = parse_script(DEMO).unwrap();

    for statement in script.statements() {
        let span = statement.span();
        let text = &DEMO[span.start()..span.end()];
        assert!(
            text.starts_with(statement.keyword()),
            "span {span:?} does not start with `{}`: {text:?}",
            statement.keyword()
        );
        assert!(!text.contains('\n'));
    }
}

#[test]
fn creation_statements_keep_alias_spans() {
    let script = parse_script(DEMO).unwrap();
    let Statement::Let { alias, creation } = script.statements()[6].inner() else {
        panic!("expected let");
    };

    assert_eq!(alias.inner(), "link");
    assert_eq!(&DEMO[alias.span().start()..alias.span().end()], "link");
    let Creation::Connect { source, target } = creation else {
        panic!("expected connect");
    };
    assert_eq!(source.inner(), "cpu_axi");
    assert_eq!(target.inner(), "mem_axi");
}

#[test]
fn attribute_and_side_arguments_are_typed() {
    let script = parse_script(DEMO).unwrap();

    assert!(matches!(
        script.statements()[7].inner(),
        Statement::SetBus { attr: BusAttr::Protocol, value, .. } if value == "AXI4"
    ));
    assert!(matches!(
        script.statements()[8].inner(),
        Statement::Reassign { side: NetSide::Target, pin: None, .. }
    ));
    assert!(matches!(
        script.statements()[10].inner(),
        Statement::Delete(Delete::Net { name, .. }) if name.inner() == "net_clk"
    ));
}

#[test]
fn reports_each_bad_line_once() {
    let source = "let cpu = block\nlet = port cpu\npin cpu_axi \"clk\nlist\nset link colour \"red\"\n";
    let err = parse_script(source).unwrap_err();
    let codes: Vec<_> = err
        .diagnostics()
        .iter()
        .map(|diag| diag.code())
        .collect();

    assert_eq!(
        codes,
        [Some(ErrorCode::E100), Some(ErrorCode::E001), Some(ErrorCode::E100)]
    );
    assert_eq!(err.diagnostics()[2].message(), "unknown bus attribute");
}

#[test]
fn empty_and_comment_only_scripts_are_valid() {
    assert!(parse_script("").unwrap().is_empty());
    assert!(parse_script("   \n# nothing here\n\t\n").unwrap().is_empty());
}
