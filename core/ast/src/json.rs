//! JSON form of a syntax tree.
//!
//! Each node becomes one object whose `"type"` member holds the node tag
//! (`"PROGRAM"`, `"VAR_DECL"`, ...), followed by the node's fields. Child
//! nodes nest as objects and sequences become arrays in source order:
//!
//! ```json
//! {"type":"VAR_DECL","name":"x","declared_type":"int","is_global":false,
//!  "initializer":{"type":"LITERAL","value":1,"value_type":"int"}}
//! ```
//!
//! Absent optional children (`initializer`, `else`, `step`, `body`, `value`)
//! are written as explicit `null`. Nodes that carry a source position get
//! trailing `line` and `column` members.
//!
//! [`from_json`] reads the same format back, which is how the backend
//! consumes trees produced by the front end.

use std::io::{self, Write as _};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{
    Map, Value,
    ser::{CompactFormatter, Formatter, PrettyFormatter},
};

use crate::{
    errors::AstError,
    node_list::NodeList,
    nodes::{
        Assignment, BinaryOperation, Block, FunctionCall, FunctionDeclaration, Identifier,
        IfStatement, Literal, LiteralValue, Node, NodeKind, Parameter, Position, PrintStatement,
        Program, RangeLoop, ReturnStatement, ValueType, VariableDeclaration, WhileLoop,
    },
};

/// Layout of the rendered JSON document.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonStyle {
    /// Single line, no insignificant whitespace.
    #[default]
    Compact,
    /// Two-space indented, one member per line.
    Pretty,
}

/// Writes the JSON form of `node` to `out`. A missing root is written as `null`.
///
/// Output is buffered and flushed before returning.
///
/// # Errors
///
/// Returns [`AstError::Io`] if `out` fails; the sink may then hold a partial document.
pub fn render_json<W: io::Write>(
    node: Option<&Node>,
    out: &mut W,
    style: JsonStyle,
) -> Result<(), AstError> {
    tracing::debug!(root = ?node.map(Node::kind), ?style, "rendering JSON");
    let mut buffered = io::BufWriter::new(out);
    write_document(node, &mut buffered, style)?;
    buffered.flush()?;
    Ok(())
}

/// Returns the JSON form of `node` as a string.
///
/// # Errors
///
/// Writing a tree into memory does not fail in practice; the error type is
/// shared with [`render_json`].
pub fn to_json(node: Option<&Node>, style: JsonStyle) -> Result<String, AstError> {
    let mut buffer = Vec::new();
    write_document(node, &mut buffer, style)?;
    String::from_utf8(buffer)
        .map_err(|err| AstError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

fn write_document<W: io::Write>(
    node: Option<&Node>,
    out: &mut W,
    style: JsonStyle,
) -> io::Result<()> {
    match style {
        JsonStyle::Compact => JsonWriter {
            out,
            formatter: CompactFormatter,
        }
        .document(node),
        JsonStyle::Pretty => JsonWriter {
            out,
            formatter: PrettyFormatter::new(),
        }
        .document(node),
    }
}

/// A member value of a node object.
enum Member<'a> {
    Text(&'a str),
    Flag(bool),
    Coordinate(u32),
    Literal(&'a LiteralValue),
    Child(Option<&'a Node>),
    Children(&'a NodeList),
    Parameters(&'a [Parameter]),
}

/// Members of the JSON object for `node`, in output order.
fn members(node: &Node) -> Vec<(&'static str, Member<'_>)> {
    let mut members = vec![("type", Member::Text(node.kind().tag()))];
    match node {
        Node::Program(Program { statements, .. }) | Node::Block(Block { statements, .. }) => {
            members.push(("children", Member::Children(statements)));
        }
        Node::VariableDeclaration(decl) => members.extend([
            ("name", Member::Text(&decl.name)),
            ("declared_type", Member::Text(&decl.declared_type)),
            ("is_global", Member::Flag(decl.is_global)),
            ("initializer", Member::Child(decl.initializer.as_deref())),
        ]),
        Node::Assignment(assign) => members.extend([
            ("target", Member::Text(&assign.target)),
            ("value", Member::Child(Some(&*assign.value))),
        ]),
        Node::BinaryOperation(bin) => members.extend([
            ("operator", Member::Text(&bin.operator)),
            ("left", Member::Child(Some(&*bin.left))),
            ("right", Member::Child(Some(&*bin.right))),
        ]),
        Node::Literal(literal) => members.extend([
            ("value", Member::Literal(&literal.value)),
            ("value_type", Member::Text(literal.value_type().as_str())),
        ]),
        Node::Identifier(ident) => members.push(("name", Member::Text(&ident.name))),
        Node::IfStatement(stmt) => members.extend([
            ("condition", Member::Child(Some(&*stmt.condition))),
            ("then", Member::Child(Some(&*stmt.then_branch))),
            ("else", Member::Child(stmt.else_branch.as_deref())),
        ]),
        Node::WhileLoop(stmt) => members.extend([
            ("condition", Member::Child(Some(&*stmt.condition))),
            ("body", Member::Child(Some(&*stmt.body))),
        ]),
        Node::RangeLoop(stmt) => members.extend([
            ("variable", Member::Text(&stmt.variable)),
            ("start", Member::Child(Some(&*stmt.start))),
            ("end", Member::Child(Some(&*stmt.end))),
            ("step", Member::Child(stmt.step.as_deref())),
            ("body", Member::Child(Some(&*stmt.body))),
        ]),
        Node::PrintStatement(stmt) => {
            members.push(("expression", Member::Child(Some(&*stmt.expression))));
        }
        Node::FunctionDeclaration(decl) => members.extend([
            ("name", Member::Text(&decl.name)),
            ("params", Member::Parameters(&decl.parameters)),
            ("return_type", Member::Text(&decl.return_type)),
            ("body", Member::Child(decl.body.as_deref())),
        ]),
        Node::FunctionCall(call) => members.extend([
            ("name", Member::Text(&call.name)),
            ("args", Member::Children(&call.arguments)),
        ]),
        Node::ReturnStatement(stmt) => {
            members.push(("value", Member::Child(stmt.value.as_deref())));
        }
    }

    if let Some(position) = node.position() {
        members.push(("line", Member::Coordinate(position.line)));
        members.push(("column", Member::Coordinate(position.column)));
    }
    members
}

/// An object or array whose remaining entries are still to be written.
enum Frame<'a> {
    Object {
        members: std::vec::IntoIter<(&'static str, Member<'a>)>,
        first: bool,
    },
    Array {
        items: std::slice::Iter<'a, Node>,
        first: bool,
    },
}

/// Streams a tree through a `serde_json` formatter with an explicit stack of
/// open containers, so output matches `serde_json` for trees of any depth.
struct JsonWriter<'w, W: io::Write, F: Formatter> {
    out: &'w mut W,
    formatter: F,
}

impl<W: io::Write, F: Formatter> JsonWriter<'_, W, F> {
    fn document(&mut self, root: Option<&Node>) -> io::Result<()> {
        let Some(root) = root else {
            return self.formatter.write_null(self.out);
        };
        let mut stack = vec![self.open_object(root)?];

        while let Some(frame) = stack.last_mut() {
            let next = match frame {
                Frame::Object { members, first } => match members.next() {
                    Some((key, member)) => {
                        self.formatter.begin_object_key(self.out, *first)?;
                        *first = false;
                        self.string(key)?;
                        self.formatter.end_object_key(self.out)?;
                        self.formatter.begin_object_value(self.out)?;
                        Some(member)
                    }
                    None => {
                        self.formatter.end_object(self.out)?;
                        None
                    }
                },
                Frame::Array { items, first } => match items.next() {
                    Some(node) => {
                        self.formatter.begin_array_value(self.out, *first)?;
                        *first = false;
                        Some(Member::Child(Some(node)))
                    }
                    None => {
                        self.formatter.end_array(self.out)?;
                        None
                    }
                },
            };

            match next {
                Some(member) => match self.value(member)? {
                    Some(opened) => stack.push(opened),
                    None => self.end_value(stack.last())?,
                },
                None => {
                    stack.pop();
                    self.end_value(stack.last())?;
                }
            }
        }
        Ok(())
    }

    fn open_object<'a>(&mut self, node: &'a Node) -> io::Result<Frame<'a>> {
        self.formatter.begin_object(self.out)?;
        Ok(Frame::Object {
            members: members(node).into_iter(),
            first: true,
        })
    }

    /// Writes a scalar member, or opens the container it starts.
    fn value<'a>(&mut self, member: Member<'a>) -> io::Result<Option<Frame<'a>>> {
        match member {
            Member::Text(text) => self.string(text)?,
            Member::Literal(LiteralValue::String(text)) => self.string(text)?,
            Member::Flag(flag) => self.formatter.write_bool(self.out, flag)?,
            Member::Coordinate(n) => self.formatter.write_u32(self.out, n)?,
            Member::Literal(LiteralValue::Int(value)) => self.formatter.write_i64(self.out, *value)?,
            Member::Literal(LiteralValue::Float(value)) if value.is_finite() => {
                self.formatter.write_f64(self.out, *value)?;
            }
            // Non-finite floats have no JSON spelling.
            Member::Literal(LiteralValue::Float(_)) | Member::Child(None) => {
                self.formatter.write_null(self.out)?;
            }
            Member::Child(Some(node)) => return self.open_object(node).map(Some),
            Member::Children(list) => {
                self.formatter.begin_array(self.out)?;
                return Ok(Some(Frame::Array {
                    items: list.iter(),
                    first: true,
                }));
            }
            Member::Parameters(params) => self.parameters(params)?,
        }
        Ok(None)
    }

    fn end_value(&mut self, parent: Option<&Frame<'_>>) -> io::Result<()> {
        match parent {
            Some(Frame::Object { .. }) => self.formatter.end_object_value(self.out),
            Some(Frame::Array { .. }) => self.formatter.end_array_value(self.out),
            None => Ok(()),
        }
    }

    fn parameters(&mut self, params: &[Parameter]) -> io::Result<()> {
        self.formatter.begin_array(self.out)?;
        for (index, param) in params.iter().enumerate() {
            self.formatter.begin_array_value(self.out, index == 0)?;
            self.formatter.begin_object(self.out)?;
            let fields = [("name", &param.name), ("param_type", &param.param_type)];
            for (slot, (key, value)) in fields.into_iter().enumerate() {
                self.formatter.begin_object_key(self.out, slot == 0)?;
                self.string(key)?;
                self.formatter.end_object_key(self.out)?;
                self.formatter.begin_object_value(self.out)?;
                self.string(value)?;
                self.formatter.end_object_value(self.out)?;
            }
            self.formatter.end_object(self.out)?;
            self.formatter.end_array_value(self.out)?;
        }
        self.formatter.end_array(self.out)
    }

    /// Quoted, escaped string. Escaping does not depend on the layout.
    fn string(&mut self, text: &str) -> io::Result<()> {
        serde_json::to_writer(&mut *self.out, text).map_err(io::Error::from)
    }
}

/// Parses a document produced by [`render_json`]. A top-level `null` yields `None`.
///
/// Nesting depth is not limited.
///
/// # Errors
///
/// Returns [`AstError::MalformedJson`] if the text is not JSON, names an
/// unknown node type, lacks a required member, or carries a literal whose
/// `value` does not match its `value_type`.
pub fn from_json(text: &str) -> Result<Option<Node>, AstError> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    if let Err(err) = deserializer.end() {
        release_value(value);
        return Err(err.into());
    }

    let result = if value.is_null() {
        Ok(None)
    } else {
        read_tree(&value).map(Some)
    };
    release_value(value);
    result
}

/// Drops a parsed document without recursing into it.
fn release_value(value: Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Object(members) => pending.extend(members.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

fn node_object(value: &Value) -> Result<(&Map<String, Value>, NodeKind), AstError> {
    let object = value
        .as_object()
        .ok_or_else(|| AstError::malformed(format!("expected a node object, found `{value}`")))?;
    let tag = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| AstError::malformed("node object without a string `type` member"))?;
    let kind = NodeKind::from_tag(tag)
        .ok_or_else(|| AstError::malformed(format!("unknown node type `{tag}`")))?;
    Ok((object, kind))
}

const LIST_MEMBERS: [&str; 2] = ["children", "args"];

/// Members of a `kind` object that hold nodes or arrays of nodes.
fn nested_members(kind: NodeKind) -> &'static [&'static str] {
    match kind {
        NodeKind::Program | NodeKind::Block => &["children"],
        NodeKind::VariableDeclaration => &["initializer"],
        NodeKind::Assignment | NodeKind::ReturnStatement => &["value"],
        NodeKind::BinaryOperation => &["left", "right"],
        NodeKind::Literal | NodeKind::Identifier => &[],
        NodeKind::IfStatement => &["condition", "then", "else"],
        NodeKind::WhileLoop => &["condition", "body"],
        NodeKind::RangeLoop => &["start", "end", "step", "body"],
        NodeKind::PrintStatement => &["expression"],
        NodeKind::FunctionDeclaration => &["body"],
        NodeKind::FunctionCall => &["args"],
    }
}

/// Collects every node object parents-first, then builds nodes in reverse so
/// each parent finds its children already built.
fn read_tree(root: &Value) -> Result<Node, AstError> {
    let mut order = Vec::new();
    let mut pending = vec![root];
    while let Some(value) = pending.pop() {
        let (object, kind) = node_object(value)?;
        for name in nested_members(kind) {
            match object.get(*name) {
                Some(Value::Array(items)) if LIST_MEMBERS.contains(name) => pending.extend(items),
                Some(child @ Value::Object(_)) => pending.push(child),
                _ => {}
            }
        }
        order.push((value, object, kind));
    }

    let mut built = FxHashMap::default();
    for (value, object, kind) in order.into_iter().rev() {
        let mut fields = Fields {
            object,
            kind,
            built: &mut built,
        };
        let node = build_node(&mut fields)?;
        built.insert(std::ptr::from_ref(value), node);
    }
    built
        .remove(&std::ptr::from_ref(root))
        .ok_or_else(|| AstError::malformed("document does not hold a node"))
}

fn build_node(fields: &mut Fields<'_, '_>) -> Result<Node, AstError> {
    let position = fields.position()?;

    let node = match fields.kind {
        NodeKind::Program => Node::Program(Program {
            position,
            statements: fields.node_list("children")?,
        }),
        NodeKind::Block => Node::Block(Block {
            position,
            statements: fields.node_list("children")?,
        }),
        NodeKind::VariableDeclaration => Node::VariableDeclaration(VariableDeclaration::new(
            fields.string("name")?,
            fields.string("declared_type")?,
            fields.boolean("is_global")?,
            fields.optional_node("initializer")?,
            position,
        )),
        NodeKind::Assignment => Node::Assignment(Assignment::new(
            fields.string("target")?,
            fields.node("value")?,
            position,
        )),
        NodeKind::BinaryOperation => Node::BinaryOperation(BinaryOperation::new(
            fields.string("operator")?,
            fields.node("left")?,
            fields.node("right")?,
            position,
        )),
        NodeKind::Literal => Node::Literal(Literal::new(fields.literal_value()?, position)),
        NodeKind::Identifier => Node::Identifier(Identifier::new(fields.string("name")?, position)),
        NodeKind::IfStatement => Node::IfStatement(IfStatement::new(
            fields.node("condition")?,
            fields.node("then")?,
            fields.optional_node("else")?,
            position,
        )),
        NodeKind::WhileLoop => Node::WhileLoop(WhileLoop::new(
            fields.node("condition")?,
            fields.node("body")?,
            position,
        )),
        NodeKind::RangeLoop => Node::RangeLoop(RangeLoop::new(
            fields.string("variable")?,
            fields.node("start")?,
            fields.node("end")?,
            fields.optional_node("step")?,
            fields.node("body")?,
            position,
        )),
        NodeKind::PrintStatement => {
            Node::PrintStatement(PrintStatement::new(fields.node("expression")?, position))
        }
        NodeKind::FunctionDeclaration => Node::FunctionDeclaration(FunctionDeclaration::new(
            fields.string("name")?,
            fields.parameters("params")?,
            fields.string("return_type")?,
            fields.optional_node("body")?,
            position,
        )),
        NodeKind::FunctionCall => Node::FunctionCall(FunctionCall::new(
            fields.string("name")?,
            fields.node_list("args")?,
            position,
        )),
        NodeKind::ReturnStatement => {
            Node::ReturnStatement(ReturnStatement::new(fields.optional_node("value")?, position))
        }
    };
    Ok(node)
}

/// Typed access to the members of one node object.
struct Fields<'a, 'b> {
    object: &'a Map<String, Value>,
    kind: NodeKind,
    built: &'b mut FxHashMap<*const Value, Node>,
}

impl<'a> Fields<'a, '_> {
    fn required(&self, name: &str) -> Result<&'a Value, AstError> {
        self.object
            .get(name)
            .ok_or_else(|| AstError::malformed(format!("`{}` node is missing `{name}`", self.kind)))
    }

    fn mistyped(&self, name: &str, expected: &str) -> AstError {
        AstError::malformed(format!(
            "`{}` member `{name}` must be {expected}",
            self.kind
        ))
    }

    fn string(&self, name: &str) -> Result<String, AstError> {
        self.required(name)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.mistyped(name, "a string"))
    }

    fn boolean(&self, name: &str) -> Result<bool, AstError> {
        self.required(name)?
            .as_bool()
            .ok_or_else(|| self.mistyped(name, "a boolean"))
    }

    /// Takes the already built node for `value`.
    fn take(&mut self, value: &Value) -> Option<Node> {
        self.built.remove(&std::ptr::from_ref(value))
    }

    fn node(&mut self, name: &str) -> Result<Node, AstError> {
        let value = self.required(name)?;
        self.take(value).ok_or_else(|| self.mistyped(name, "a node"))
    }

    /// A missing member is read the same as an explicit `null`.
    fn optional_node(&mut self, name: &str) -> Result<Option<Node>, AstError> {
        match self.object.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => self
                .take(value)
                .map(Some)
                .ok_or_else(|| self.mistyped(name, "a node or null")),
        }
    }

    fn node_list(&mut self, name: &str) -> Result<NodeList, AstError> {
        let items = self
            .required(name)?
            .as_array()
            .ok_or_else(|| self.mistyped(name, "an array of nodes"))?;
        let mut list = NodeList::new();
        for item in items {
            let node = self
                .take(item)
                .ok_or_else(|| self.mistyped(name, "an array of nodes"))?;
            list.append(node)?;
        }
        Ok(list)
    }

    fn parameters(&self, name: &str) -> Result<Vec<Parameter>, AstError> {
        Ok(Vec::<Parameter>::deserialize(self.required(name)?)?)
    }

    fn literal_value(&self) -> Result<LiteralValue, AstError> {
        let tag = self.string("value_type")?;
        let value_type = ValueType::from_name(&tag)
            .ok_or_else(|| AstError::malformed(format!("unknown literal value type `{tag}`")))?;
        let value = self.required("value")?;
        let literal = match value_type {
            ValueType::Int => value.as_i64().map(LiteralValue::Int),
            ValueType::Float => value.as_f64().map(LiteralValue::Float),
            ValueType::String => value
                .as_str()
                .map(|text| LiteralValue::String(text.to_string())),
        };
        literal.ok_or_else(|| {
            AstError::malformed(format!(
                "literal value `{value}` does not match value type `{value_type}`"
            ))
        })
    }

    fn position(&self) -> Result<Option<Position>, AstError> {
        let coordinate = |name: &str| -> Result<Option<u32>, AstError> {
            self.object
                .get(name)
                .map(|value| {
                    value
                        .as_u64()
                        .and_then(|n| u32::try_from(n).ok())
                        .ok_or_else(|| self.mistyped(name, "a non-negative 32-bit integer"))
                })
                .transpose()
        };
        match (coordinate("line")?, coordinate("column")?) {
            (Some(line), Some(column)) => Ok(Some(Position::new(line, column))),
            (None, None) => Ok(None),
            _ => Err(AstError::malformed(format!(
                "`{}` node must carry both `line` and `column` or neither",
                self.kind
            ))),
        }
    }
}
