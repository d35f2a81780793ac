//! Construction API used by the parser.
//!
//! The parser reduces productions bottom-up and calls one factory per node
//! kind. Every factory returns a fully initialized [`Node`]:
//!
//! - string inputs are converted into owned `String`s (`&str` is copied, a
//!   `String` is moved in), so the tree never borrows parser buffers
//! - child nodes are moved into the new parent and cannot be reused afterwards
//! - no validation beyond shape is performed; operator spellings, type names
//!   and literal ranges are stored as given
//! - the trailing `position` records where the construct starts, `None` when
//!   the parser does not track it
//!
//! # Example
//!
//! ```
//! use waki_ast::builder::{
//!     append_child, create_binary_operation, create_identifier, create_literal_int,
//!     create_program, create_variable_declaration,
//! };
//!
//! let sum = create_binary_operation(
//!     "+",
//!     create_identifier("a", None),
//!     create_literal_int(1, None),
//!     None,
//! );
//! let decl = create_variable_declaration("x", "int", false, Some(sum), None);
//!
//! let mut program = create_program(None);
//! append_child(&mut program, decl)?;
//! assert_eq!(program.node_count(), 5);
//! # Ok::<(), waki_ast::errors::AstError>(())
//! ```
//!
//! Statements are accumulated into programs and blocks with [`append_child`],
//! which is the only mutation the API allows after a node is created.

use crate::{
    errors::AstError,
    node_list::NodeList,
    nodes::{
        Assignment, BinaryOperation, Block, FunctionCall, FunctionDeclaration, Identifier,
        IfStatement, Literal, LiteralValue, Node, Parameter, Position, PrintStatement, Program,
        RangeLoop, ReturnStatement, VariableDeclaration, WhileLoop,
    },
};

#[must_use]
pub fn create_program(position: Option<Position>) -> Node {
    Node::Program(Program::new(position))
}

#[must_use]
pub fn create_block(position: Option<Position>) -> Node {
    Node::Block(Block::new(position))
}

/// Creates a variable declaration. Without `initializer` the variable is default-valued.
#[must_use]
pub fn create_variable_declaration(
    name: impl Into<String>,
    declared_type: impl Into<String>,
    is_global: bool,
    initializer: Option<Node>,
    position: Option<Position>,
) -> Node {
    Node::VariableDeclaration(VariableDeclaration::new(
        name.into(),
        declared_type.into(),
        is_global,
        initializer,
        position,
    ))
}

#[must_use]
pub fn create_assignment(
    target: impl Into<String>,
    value: Node,
    position: Option<Position>,
) -> Node {
    Node::Assignment(Assignment::new(target.into(), value, position))
}

#[must_use]
pub fn create_binary_operation(
    operator: impl Into<String>,
    left: Node,
    right: Node,
    position: Option<Position>,
) -> Node {
    Node::BinaryOperation(BinaryOperation::new(operator.into(), left, right, position))
}

#[must_use]
pub fn create_literal(value: LiteralValue, position: Option<Position>) -> Node {
    Node::Literal(Literal::new(value, position))
}

#[must_use]
pub fn create_literal_int(value: i64, position: Option<Position>) -> Node {
    create_literal(LiteralValue::Int(value), position)
}

#[must_use]
pub fn create_literal_float(value: f64, position: Option<Position>) -> Node {
    create_literal(LiteralValue::Float(value), position)
}

#[must_use]
pub fn create_literal_string(value: impl Into<String>, position: Option<Position>) -> Node {
    create_literal(LiteralValue::String(value.into()), position)
}

#[must_use]
pub fn create_identifier(name: impl Into<String>, position: Option<Position>) -> Node {
    Node::Identifier(Identifier::new(name.into(), position))
}

#[must_use]
pub fn create_if(
    condition: Node,
    then_branch: Node,
    else_branch: Option<Node>,
    position: Option<Position>,
) -> Node {
    Node::IfStatement(IfStatement::new(
        condition,
        then_branch,
        else_branch,
        position,
    ))
}

#[must_use]
pub fn create_while(condition: Node, body: Node, position: Option<Position>) -> Node {
    Node::WhileLoop(WhileLoop::new(condition, body, position))
}

/// Creates a `round` loop binding `variable` from `start` to `end`.
/// A missing `step` means the loop advances by 1.
#[must_use]
pub fn create_round(
    variable: impl Into<String>,
    start: Node,
    end: Node,
    step: Option<Node>,
    body: Node,
    position: Option<Position>,
) -> Node {
    Node::RangeLoop(RangeLoop::new(
        variable.into(),
        start,
        end,
        step,
        body,
        position,
    ))
}

#[must_use]
pub fn create_print(expression: Node, position: Option<Position>) -> Node {
    Node::PrintStatement(PrintStatement::new(expression, position))
}

#[must_use]
pub fn create_function_declaration(
    name: impl Into<String>,
    parameters: Vec<Parameter>,
    return_type: impl Into<String>,
    body: Option<Node>,
    position: Option<Position>,
) -> Node {
    Node::FunctionDeclaration(FunctionDeclaration::new(
        name.into(),
        parameters,
        return_type.into(),
        body,
        position,
    ))
}

#[must_use]
pub fn create_function_call(
    name: impl Into<String>,
    arguments: NodeList,
    position: Option<Position>,
) -> Node {
    Node::FunctionCall(FunctionCall::new(name.into(), arguments, position))
}

/// Creates a return statement. Without `value` it is a void return.
#[must_use]
pub fn create_return(value: Option<Node>, position: Option<Position>) -> Node {
    Node::ReturnStatement(ReturnStatement::new(value, position))
}

/// Appends `child` to the statements of a program or block.
///
/// # Errors
///
/// Returns [`AstError::InvalidOperation`] when `parent` is neither a program
/// nor a block; `child` is dropped in that case. Returns
/// [`AstError::AllocationFailure`] if the statement list cannot grow.
pub fn append_child(parent: &mut Node, child: Node) -> Result<(), AstError> {
    match parent {
        Node::Program(Program { statements, .. }) | Node::Block(Block { statements, .. }) => {
            statements.append(child)
        }
        other => {
            tracing::warn!(
                parent = %other.kind(),
                child = %child.kind(),
                "rejected append_child on a node without statements"
            );
            Err(AstError::InvalidOperation {
                operation: "append_child",
                kind: other.kind(),
            })
        }
    }
}
