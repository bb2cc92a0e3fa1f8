//! Line-oriented parser for Buswire command scripts.
//!
//! Every line holds at most one statement, optionally followed by a `#`
//! comment. Parsing recovers at line granularity: a bad line produces one
//! diagnostic and parsing resumes on the next line, so a single pass reports
//! every broken statement.

use std::str::FromStr;

use winnow::{
    Parser as _,
    ascii::{line_ending, space0, till_line_ending},
    combinator::{alt, cut_err, eof, opt, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{none_of, one_of, take_while},
};

use buswire_core::model::{BusAttr, NetSide, PinDirection};

use crate::{
    ast::{Alias, Creation, Delete, NetField, Script, Statement},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::{Span, Spanned},
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScriptDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<ScriptDiagnostic>>;

const COMMANDS_HELP: &str = "commands are `let`, `pin`, `automap`, `reassign`, `addnet`, \
     `rename`, `set`, `chain`, `delete`, `stats`, `connections` and `list`";

/// Spaces and tabs, never newlines.
fn blank(input: &mut Input<'_>) -> IResult<()> {
    space0.void().parse_next(input)
}

/// A bare word: `[A-Za-z_][A-Za-z0-9_]*`.
fn word<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// Match exactly `expected` as a whole word.
fn keyword<'a>(expected: &'static str) -> impl FnMut(&mut Input<'a>) -> IResult<&'a str> {
    move |input: &mut Input<'a>| word.verify(|w: &str| w == expected).parse_next(input)
}

/// Record the byte span consumed by `parser`.
fn spanned<'a, O>(
    mut parser: impl FnMut(&mut Input<'a>) -> IResult<O>,
) -> impl FnMut(&mut Input<'a>) -> IResult<Spanned<O>> {
    move |input: &mut Input<'a>| {
        let start = input.current_token_start();
        let value = parser(input)?;
        Ok(Spanned::new(
            value,
            Span::new(start..input.current_token_start()),
        ))
    }
}

/// A required argument: optional leading blanks, then `parser`, committed.
///
/// A failure is a cut error labeled with `message` unless the inner parser
/// already attached a more precise diagnostic.
fn required<'a, O>(
    message: &'static str,
    mut parser: impl FnMut(&mut Input<'a>) -> IResult<O>,
) -> impl FnMut(&mut Input<'a>) -> IResult<O> {
    move |input: &mut Input<'a>| {
        blank(input)?;
        let start = input.current_token_start();
        cut_err(|i: &mut Input<'a>| parser(i))
            .context(ScriptDiagnostic {
                code: ErrorCode::E100,
                message,
                help: None,
                start,
            })
            .parse_next(input)
    }
}

/// A word that must parse as `T`.
///
/// Backtracks when there is no word at all; a word that does not parse is a
/// cut error spanning the word.
fn choice<'a, T: FromStr>(
    message: &'static str,
    help: &'static str,
) -> impl FnMut(&mut Input<'a>) -> IResult<T> {
    move |input: &mut Input<'a>| {
        let start = input.current_token_start();
        let checkpoint = input.checkpoint();
        let text = word.parse_next(input)?;
        match text.parse() {
            Ok(value) => Ok(value),
            Err(_) => Err(ErrMode::Cut(ContextError::new().add_context(
                input,
                &checkpoint,
                ScriptDiagnostic {
                    code: ErrorCode::E100,
                    message,
                    help: Some(help),
                    start,
                },
            ))),
        }
    }
}

fn alias(input: &mut Input<'_>) -> IResult<Alias> {
    spanned(word)
        .parse_next(input)
        .map(|w| w.map(str::to_string))
}

fn equals(input: &mut Input<'_>) -> IResult<char> {
    '='.parse_next(input)
}

fn quote(input: &mut Input<'_>) -> IResult<char> {
    '"'.parse_next(input)
}

/// One character of string content: an escape or any char except quote,
/// backslash and line breaks.
fn string_char(input: &mut Input<'_>) -> IResult<char> {
    alt((
        preceded('\\', one_of(['"', '\\'])),
        none_of(['"', '\\', '\n', '\r']),
    ))
    .parse_next(input)
}

/// A double-quoted string literal with `\"` and `\\` escapes.
fn string_literal(input: &mut Input<'_>) -> IResult<String> {
    let start = input.current_token_start();

    quote(input)?;

    // Commit after the opening quote so the span covers the whole literal
    cut_err(terminated(
        repeat(0.., string_char).fold(String::new, |mut acc, ch| {
            acc.push(ch);
            acc
        }),
        '"',
    ))
    .context(ScriptDiagnostic {
        code: ErrorCode::E001,
        message: "unterminated string literal",
        help: Some("close the string on the same line; only `\\\"` and `\\\\` escapes are allowed"),
        start,
    })
    .parse_next(input)
}

fn spanned_string(input: &mut Input<'_>) -> IResult<Spanned<String>> {
    spanned(string_literal).parse_next(input)
}

fn optional_string(input: &mut Input<'_>) -> IResult<Option<String>> {
    opt(preceded(blank, string_literal)).parse_next(input)
}

// ============================================================================
// `let` right-hand sides
// ============================================================================

fn block_creation(input: &mut Input<'_>) -> IResult<Creation> {
    keyword("block").parse_next(input)?;
    let name = optional_string(input)?;
    Ok(Creation::Block { name })
}

fn port_creation(input: &mut Input<'_>) -> IResult<Creation> {
    keyword("port").parse_next(input)?;
    let block = required("expected a block alias after `port`", alias).parse_next(input)?;
    let name = optional_string(input)?;
    Ok(Creation::Port { block, name })
}

fn connect_creation(input: &mut Input<'_>) -> IResult<Creation> {
    keyword("connect").parse_next(input)?;
    let source = required("expected the source port alias", alias).parse_next(input)?;
    let target = required("expected the target port alias", alias).parse_next(input)?;
    Ok(Creation::Connect { source, target })
}

fn creation(input: &mut Input<'_>) -> IResult<Creation> {
    alt((block_creation, port_creation, connect_creation)).parse_next(input)
}

// ============================================================================
// Statements
// ============================================================================

fn let_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("let").parse_next(input)?;
    let name = required("expected an alias name after `let`", alias).parse_next(input)?;
    required("expected `=` after the alias", equals).parse_next(input)?;
    let creation = required("expected `block`, `port` or `connect`", creation).parse_next(input)?;
    Ok(Statement::Let {
        alias: name,
        creation,
    })
}

fn pin_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("pin").parse_next(input)?;
    let port = required("expected a port alias after `pin`", alias).parse_next(input)?;
    let name = required("expected a quoted pin name", spanned_string).parse_next(input)?;
    let direction = opt(preceded(
        blank,
        choice::<PinDirection>("unknown pin direction", "directions are `in`, `out` and `inout`"),
    ))
    .parse_next(input)?;
    Ok(Statement::Pin {
        port,
        name,
        direction,
    })
}

fn automap_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("automap").parse_next(input)?;
    let bus = required("expected a bus alias after `automap`", alias).parse_next(input)?;
    Ok(Statement::AutoMap { bus })
}

fn pin_or_none(input: &mut Input<'_>) -> IResult<Option<Spanned<String>>> {
    alt((keyword("none").value(None), spanned_string.map(Some))).parse_next(input)
}

fn reassign_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("reassign").parse_next(input)?;
    let bus = required("expected a bus alias after `reassign`", alias).parse_next(input)?;
    let net = required("expected a quoted net name", spanned_string).parse_next(input)?;
    let side = required(
        "expected `source` or `target`",
        choice::<NetSide>("unknown net side", "a net side is `source` or `target`"),
    )
    .parse_next(input)?;
    let pin = required("expected a quoted pin name or `none`", pin_or_none).parse_next(input)?;
    Ok(Statement::Reassign {
        bus,
        net,
        side,
        pin,
    })
}

fn addnet_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("addnet").parse_next(input)?;
    let bus = required("expected a bus alias after `addnet`", alias).parse_next(input)?;
    Ok(Statement::AddNet { bus })
}

fn rename_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("rename").parse_next(input)?;
    let target = required("expected an alias after `rename`", alias).parse_next(input)?;
    let name = required("expected the new name as a quoted string", string_literal)
        .parse_next(input)?;
    Ok(Statement::Rename { target, name })
}

fn set_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("set").parse_next(input)?;
    let bus = required("expected a bus alias after `set`", alias).parse_next(input)?;
    blank(input)?;

    if opt(keyword("net")).parse_next(input)?.is_some() {
        let net = required("expected a quoted net name", spanned_string).parse_next(input)?;
        let field = required(
            "expected a net field",
            choice::<NetField>(
                "unknown net field",
                "net fields are `name`, `width`, `type` and `note`",
            ),
        )
        .parse_next(input)?;
        let value = required("expected a quoted value", string_literal).parse_next(input)?;
        return Ok(Statement::SetNet {
            bus,
            net,
            field,
            value,
        });
    }

    let attr = required(
        "expected a bus attribute or `net`",
        choice::<BusAttr>(
            "unknown bus attribute",
            "bus attributes are `protocol`, `bandwidth`, `note` and `color`",
        ),
    )
    .parse_next(input)?;
    let value = required("expected a quoted value", string_literal).parse_next(input)?;
    Ok(Statement::SetBus { bus, attr, value })
}

fn chain_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("chain").parse_next(input)?;
    let first = required("expected a port alias after `chain`", alias).parse_next(input)?;
    let rest: Vec<Alias> = required(
        "`chain` needs at least two ports",
        |i| repeat(1.., preceded(blank, alias)).parse_next(i),
    )
    .parse_next(input)?;

    let mut ports = Vec::with_capacity(rest.len() + 1);
    ports.push(first);
    ports.extend(rest);
    Ok(Statement::Chain { ports })
}

fn delete_pin(input: &mut Input<'_>) -> IResult<Delete> {
    keyword("pin").parse_next(input)?;
    let port = required("expected a port alias", alias).parse_next(input)?;
    let name = required("expected a quoted pin name", spanned_string).parse_next(input)?;
    Ok(Delete::Pin { port, name })
}

fn delete_net(input: &mut Input<'_>) -> IResult<Delete> {
    keyword("net").parse_next(input)?;
    let bus = required("expected a bus alias", alias).parse_next(input)?;
    let name = required("expected a quoted net name", spanned_string).parse_next(input)?;
    Ok(Delete::Net { bus, name })
}

fn delete_bus(input: &mut Input<'_>) -> IResult<Delete> {
    keyword("bus").parse_next(input)?;
    let bus = required("expected a bus alias", alias).parse_next(input)?;
    Ok(Delete::Bus { bus })
}

fn delete_port(input: &mut Input<'_>) -> IResult<Delete> {
    keyword("port").parse_next(input)?;
    let port = required("expected a port alias", alias).parse_next(input)?;
    Ok(Delete::Port { port })
}

fn delete_block(input: &mut Input<'_>) -> IResult<Delete> {
    keyword("block").parse_next(input)?;
    let block = required("expected a block alias", alias).parse_next(input)?;
    Ok(Delete::Block { block })
}

fn delete_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("delete").parse_next(input)?;
    let target = required(
        "expected `pin`, `net`, `bus`, `port` or `block` after `delete`",
        |i| alt((delete_pin, delete_net, delete_bus, delete_port, delete_block)).parse_next(i),
    )
    .parse_next(input)?;
    Ok(Statement::Delete(target))
}

fn stats_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("stats").parse_next(input)?;
    let bus = required("expected a bus alias after `stats`", alias).parse_next(input)?;
    Ok(Statement::Stats { bus })
}

fn connections_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("connections").parse_next(input)?;
    let port = required("expected a port alias after `connections`", alias).parse_next(input)?;
    Ok(Statement::Connections { port })
}

fn list_statement(input: &mut Input<'_>) -> IResult<Statement> {
    keyword("list").value(Statement::List).parse_next(input)
}

fn statement(input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    alt((
        let_statement,
        pin_statement,
        automap_statement,
        reassign_statement,
        addnet_statement,
        rename_statement,
        set_statement,
        chain_statement,
        delete_statement,
        stats_statement,
        connections_statement,
        list_statement,
    ))
    .context(ScriptDiagnostic {
        code: ErrorCode::E100,
        message: "unknown command",
        help: Some(COMMANDS_HELP),
        start,
    })
    .parse_next(input)
}

/// Trailing blanks, an optional comment, then a newline or end of input.
fn line_end(input: &mut Input<'_>) -> IResult<()> {
    (
        space0,
        opt(('#', till_line_ending)),
        alt((line_ending.void(), eof.void())),
    )
        .void()
        .parse_next(input)
}

/// One source line. Blank and comment-only lines yield `None`.
fn line(input: &mut Input<'_>) -> IResult<Option<Spanned<Statement>>> {
    blank(input)?;
    if opt(line_end).parse_next(input)?.is_some() {
        return Ok(None);
    }

    let statement = spanned(statement).parse_next(input)?;

    blank(input)?;
    let start = input.current_token_start();
    cut_err(line_end)
        .context(ScriptDiagnostic {
            code: ErrorCode::E100,
            message: "unexpected input after statement",
            help: Some("write one statement per line; comments start with `#`"),
            start,
        })
        .parse_next(input)?;

    Ok(Some(statement))
}

/// Parser state: statements parsed so far and the diagnostics of bad lines.
struct ScriptParser<'a> {
    source: &'a str,
    statements: Vec<Spanned<Statement>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> ScriptParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            statements: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn parse(&mut self) {
        let mut input = LocatingSlice::new(self.source);

        while !input.is_empty() {
            let checkpoint = input.checkpoint();
            match line(&mut input) {
                Ok(Some(statement)) => self.statements.push(statement),
                Ok(None) => {}
                Err(err) => {
                    let error_pos = input.current_token_start();
                    let diagnostic = self.convert_err_mode(err, error_pos);
                    self.diagnostics.emit(diagnostic);

                    input.reset(&checkpoint);
                    Self::skip_line(&mut input);
                }
            }
        }
    }

    /// Advance past the next newline (or to the end of input).
    fn skip_line(input: &mut Input<'a>) {
        while let Some(ch) = input.next_token() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// Text from `pos` to the end of its line.
    fn rest_of_line(&self, pos: usize) -> &'a str {
        let rest = self.source.get(pos..).unwrap_or_default();
        rest.split('\n').next().unwrap_or_default()
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// A failure at the very start of a word underlines that word; a failure
    /// where only blanks or a comment remain on the line is reported as an
    /// incomplete statement.
    fn convert_err_mode(
        &self,
        err: ErrMode<ContextError<ScriptDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        let rest = self.rest_of_line(error_pos);
        let remaining = rest.trim();
        let line_is_done = remaining.is_empty() || remaining.starts_with('#');

        let Some(ScriptDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        else {
            let len = rest.chars().next().map_or(0, char::len_utf8);
            return Diagnostic::error("unexpected input")
                .with_code(ErrorCode::E100)
                .with_label(
                    Span::new(error_pos..error_pos + len),
                    ErrorCode::E100.description(),
                );
        };

        let (code, span) = if *code == ErrorCode::E100 && line_is_done {
            (ErrorCode::E101, Span::new(error_pos..error_pos))
        } else if error_pos > *start {
            (*code, Span::new(*start..error_pos))
        } else {
            let token_len = match rest.find(char::is_whitespace) {
                Some(0) => rest.chars().next().map_or(0, char::len_utf8),
                Some(len) => len,
                None => rest.len(),
            };
            (*code, Span::new(*start..*start + token_len))
        };

        let mut diag = Diagnostic::error(*message)
            .with_code(code)
            .with_label(span, code.description());
        if let Some(h) = help {
            diag = diag.with_help(*h);
        }
        diag
    }

    fn finish(self) -> Result<Script, ParseError> {
        self.diagnostics
            .finish()
            .map(|()| Script::new(self.statements))
    }
}

/// Parse a script, collecting one diagnostic per malformed line.
pub(crate) fn parse(source: &str) -> Result<Script, ParseError> {
    let mut parser = ScriptParser::new(source);
    parser.parse();
    parser.finish()
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    /// Single-line strings, biased towards quotes and backslashes.
    fn value_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                Just('"'),
                Just('\\'),
                Just(' '),
                Just('#'),
                any::<char>().prop_filter("no line breaks", |c| *c != '\n' && *c != '\r'),
            ],
            0..24,
        )
        .prop_map(|chars| chars.into_iter().collect())
    }

    fn escape(value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('"');
        for ch in value.chars() {
            if ch == '"' || ch == '\\' {
                out.push('\\');
            }
            out.push(ch);
        }
        out.push('"');
        out
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Escaping any single-line string yields a literal that parses back to it.
    fn check_string_literal_round_trip(value: String) -> Result<(), TestCaseError> {
        let source = format!("rename cpu {}", escape(&value));
        let script = parse(&source).map_err(|err| TestCaseError::fail(err.to_string()))?;
        let Some(Statement::Rename { name, .. }) =
            script.statements().first().map(|s| s.inner().clone())
        else {
            return Err(TestCaseError::fail("expected a rename statement"));
        };
        prop_assert_eq!(name, value);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn string_literal_round_trip(value in value_strategy()) {
            check_string_literal_round_trip(value)?;
        }
    }
}
