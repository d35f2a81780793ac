//! Indented text outline of a syntax tree.
//!
//! Every node prints a one-line header with its tag and scalar fields,
//! followed by labeled sub-sections one level deeper. Nested nodes sit two
//! levels below their parent header, two spaces per level:
//!
//! ```text
//! PROGRAM
//!   VAR_DECL: x (type: int)
//!     INIT:
//!       BIN_OP: +
//!         LEFT:
//!           IDENT: a
//!         RIGHT:
//!           LITERAL: 1 (type: int)
//!   RETURN
//!     NO VALUE
//! ```
//!
//! An absent optional child always prints a `NO <LABEL>` marker in place of
//! its section; a missing root prints `NULL`. Names, type names and
//! operators are escaped the same way as string literal contents, without
//! quotes, so each entry of the outline stays on a single line.
//!
//! Rendering walks the tree with a work stack and handles trees of any depth.

use std::fmt::{self, Write as _};
use std::io::{self, Write as _};

use crate::{
    errors::AstError,
    nodes::{Block, Node, Parameter, Program},
};

const INDENT_WIDTH: usize = 2;
const SPACES: &str = "                                                                ";

/// Writes the outline of `node` to `out`.
///
/// Output is buffered and flushed before returning.
///
/// # Errors
///
/// Returns [`AstError::Io`] if `out` fails; the sink may then hold a partial outline.
pub fn render_text<W: io::Write>(node: Option<&Node>, out: &mut W) -> Result<(), AstError> {
    tracing::debug!(root = ?node.map(Node::kind), "rendering text outline");
    let mut sink = IoSink {
        inner: io::BufWriter::new(out),
        error: None,
    };
    let result = TextPrinter { out: &mut sink }.print(node);
    if let Some(err) = sink.error.take() {
        return Err(AstError::Io(err));
    }
    if result.is_err() {
        return Err(AstError::Io(io::Error::other("formatter error")));
    }
    sink.inner.flush()?;
    Ok(())
}

/// Returns the outline of `node` as a string.
#[must_use]
pub fn to_text(node: Option<&Node>) -> String {
    let mut text = String::new();
    // Writing into a `String` never fails.
    let _ = TextPrinter { out: &mut text }.print(node);
    text
}

/// Adapts an `io::Write` sink to `fmt::Write`, keeping the underlying I/O error.
struct IoSink<W: io::Write> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: io::Write> fmt::Write for IoSink<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.inner.write_all(s.as_bytes()).map_err(|err| {
            self.error = Some(err);
            fmt::Error
        })
    }
}

/// One pending line of the outline, with its indentation level.
enum Task<'a> {
    Node(Option<&'a Node>, usize),
    Section(&'static str, usize),
    Absent(&'static str, usize),
    Parameter(&'a Parameter, usize),
}

/// Pushes `LABEL:` followed by `child` two levels down, or `NO LABEL`.
fn section<'a>(
    tasks: &mut Vec<Task<'a>>,
    indent: usize,
    label: &'static str,
    child: Option<&'a Node>,
) {
    match child {
        Some(child) => {
            tasks.push(Task::Section(label, indent + 1));
            tasks.push(Task::Node(Some(child), indent + 2));
        }
        None => tasks.push(Task::Absent(label, indent + 1)),
    }
}

/// Lines below the header of `node`, in output order.
fn body<'a>(node: &'a Node, indent: usize, tasks: &mut Vec<Task<'a>>) {
    match node {
        Node::Program(Program { statements, .. }) | Node::Block(Block { statements, .. }) => {
            tasks.extend(statements.iter().map(|s| Task::Node(Some(s), indent + 1)));
        }
        Node::VariableDeclaration(decl) => {
            section(tasks, indent, "INIT", decl.initializer.as_deref());
        }
        Node::Assignment(assign) => section(tasks, indent, "VALUE", Some(&*assign.value)),
        Node::BinaryOperation(bin) => {
            section(tasks, indent, "LEFT", Some(&*bin.left));
            section(tasks, indent, "RIGHT", Some(&*bin.right));
        }
        Node::Literal(_) | Node::Identifier(_) => {}
        Node::IfStatement(stmt) => {
            section(tasks, indent, "CONDITION", Some(&*stmt.condition));
            section(tasks, indent, "THEN", Some(&*stmt.then_branch));
            section(tasks, indent, "ELSE", stmt.else_branch.as_deref());
        }
        Node::WhileLoop(stmt) => {
            section(tasks, indent, "CONDITION", Some(&*stmt.condition));
            section(tasks, indent, "BODY", Some(&*stmt.body));
        }
        Node::RangeLoop(stmt) => {
            section(tasks, indent, "START", Some(&*stmt.start));
            section(tasks, indent, "END", Some(&*stmt.end));
            section(tasks, indent, "STEP", stmt.step.as_deref());
            section(tasks, indent, "BODY", Some(&*stmt.body));
        }
        Node::PrintStatement(stmt) => {
            section(tasks, indent, "EXPRESSION", Some(&*stmt.expression));
        }
        Node::FunctionDeclaration(decl) => {
            if decl.parameters.is_empty() {
                tasks.push(Task::Absent("PARAMS", indent + 1));
            } else {
                tasks.push(Task::Section("PARAMS", indent + 1));
                tasks.extend(decl.parameters.iter().map(|p| Task::Parameter(p, indent + 2)));
            }
            section(tasks, indent, "BODY", decl.body.as_deref());
        }
        Node::FunctionCall(call) => {
            if call.arguments.is_empty() {
                tasks.push(Task::Absent("ARGUMENTS", indent + 1));
            } else {
                tasks.push(Task::Section("ARGUMENTS", indent + 1));
                tasks.extend(call.arguments.iter().map(|a| Task::Node(Some(a), indent + 2)));
            }
        }
        Node::ReturnStatement(stmt) => section(tasks, indent, "VALUE", stmt.value.as_deref()),
    }
}

struct TextPrinter<'a, W: fmt::Write> {
    out: &'a mut W,
}

impl<W: fmt::Write> TextPrinter<'_, W> {
    fn line(&mut self, indent: usize, text: fmt::Arguments) -> fmt::Result {
        let mut width = indent * INDENT_WIDTH;
        while width > 0 {
            let chunk = width.min(SPACES.len());
            self.out.write_str(&SPACES[..chunk])?;
            width -= chunk;
        }
        self.out.write_fmt(text)?;
        self.out.write_char('\n')
    }

    fn print(&mut self, root: Option<&Node>) -> fmt::Result {
        let mut pending = vec![Task::Node(root, 0)];
        let mut below = Vec::new();
        while let Some(task) = pending.pop() {
            match task {
                Task::Node(None, indent) => self.line(indent, format_args!("NULL"))?,
                Task::Node(Some(node), indent) => {
                    self.header(node, indent)?;
                    body(node, indent, &mut below);
                    pending.extend(below.drain(..).rev());
                }
                Task::Section(label, indent) => self.line(indent, format_args!("{label}:"))?,
                Task::Absent(label, indent) => self.line(indent, format_args!("NO {label}"))?,
                Task::Parameter(param, indent) => self.line(
                    indent,
                    format_args!(
                        "{}: {}",
                        param.name.escape_debug(),
                        param.param_type.escape_debug()
                    ),
                )?,
            }
        }
        Ok(())
    }

    /// Names, type names and operators are escaped like string literal contents, unquoted.
    fn header(&mut self, node: &Node, indent: usize) -> fmt::Result {
        let tag = node.kind().tag();
        match node {
            Node::Program(_)
            | Node::Block(_)
            | Node::IfStatement(_)
            | Node::WhileLoop(_)
            | Node::PrintStatement(_)
            | Node::ReturnStatement(_) => self.line(indent, format_args!("{tag}")),
            Node::VariableDeclaration(decl) => {
                let scope = if decl.is_global { ", global" } else { "" };
                self.line(
                    indent,
                    format_args!(
                        "{tag}: {} (type: {}{scope})",
                        decl.name.escape_debug(),
                        decl.declared_type.escape_debug()
                    ),
                )
            }
            Node::Assignment(assign) => {
                self.line(indent, format_args!("{tag}: {}", assign.target.escape_debug()))
            }
            Node::BinaryOperation(bin) => {
                self.line(indent, format_args!("{tag}: {}", bin.operator.escape_debug()))
            }
            Node::Literal(literal) => self.line(
                indent,
                format_args!("{tag}: {} (type: {})", literal.value, literal.value_type()),
            ),
            Node::Identifier(ident) => {
                self.line(indent, format_args!("{tag}: {}", ident.name.escape_debug()))
            }
            Node::RangeLoop(stmt) => {
                self.line(indent, format_args!("{tag}: {}", stmt.variable.escape_debug()))
            }
            Node::FunctionDeclaration(decl) => self.line(
                indent,
                format_args!(
                    "{tag}: {} (return type: {})",
                    decl.name.escape_debug(),
                    decl.return_type.escape_debug()
                ),
            ),
            Node::FunctionCall(call) => {
                self.line(indent, format_args!("{tag}: {}", call.name.escape_debug()))
            }
        }
    }
}
