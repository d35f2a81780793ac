use std::mem;

use crate::node_list::NodeList;

use super::nodes::{
    Assignment, BinaryOperation, Block, FunctionCall, FunctionDeclaration, Identifier,
    IfStatement, Literal, LiteralValue, Node, Parameter, Position, PrintStatement, Program,
    RangeLoop, ReturnStatement, ValueType, VariableDeclaration, WhileLoop,
};

impl Program {
    #[must_use]
    pub fn new(position: Option<Position>) -> Self {
        Program {
            position,
            statements: NodeList::new(),
        }
    }
}

impl Block {
    #[must_use]
    pub fn new(position: Option<Position>) -> Self {
        Block {
            position,
            statements: NodeList::new(),
        }
    }
}

impl VariableDeclaration {
    #[must_use]
    pub fn new(
        name: String,
        declared_type: String,
        is_global: bool,
        initializer: Option<Node>,
        position: Option<Position>,
    ) -> Self {
        VariableDeclaration {
            position,
            name,
            declared_type,
            is_global,
            initializer: initializer.map(Box::new),
        }
    }

    /// A declaration without initializer starts with the default value of its type.
    #[must_use]
    pub fn is_default_valued(&self) -> bool {
        self.initializer.is_none()
    }
}

impl Assignment {
    #[must_use]
    pub fn new(target: String, value: Node, position: Option<Position>) -> Self {
        Assignment {
            position,
            target,
            value: Box::new(value),
        }
    }
}

impl BinaryOperation {
    #[must_use]
    pub fn new(operator: String, left: Node, right: Node, position: Option<Position>) -> Self {
        BinaryOperation {
            position,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl Literal {
    #[must_use]
    pub fn new(value: LiteralValue, position: Option<Position>) -> Self {
        Literal { position, value }
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }
}

impl LiteralValue {
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            LiteralValue::Int(_) => ValueType::Int,
            LiteralValue::Float(_) => ValueType::Float,
            LiteralValue::String(_) => ValueType::String,
        }
    }
}

impl Identifier {
    #[must_use]
    pub fn new(name: String, position: Option<Position>) -> Self {
        Identifier { position, name }
    }
}

impl IfStatement {
    #[must_use]
    pub fn new(
        condition: Node,
        then_branch: Node,
        else_branch: Option<Node>,
        position: Option<Position>,
    ) -> Self {
        IfStatement {
            position,
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        }
    }
}

impl WhileLoop {
    #[must_use]
    pub fn new(condition: Node, body: Node, position: Option<Position>) -> Self {
        WhileLoop {
            position,
            condition: Box::new(condition),
            body: Box::new(body),
        }
    }
}

impl RangeLoop {
    #[must_use]
    pub fn new(
        variable: String,
        start: Node,
        end: Node,
        step: Option<Node>,
        body: Node,
        position: Option<Position>,
    ) -> Self {
        RangeLoop {
            position,
            variable,
            start: Box::new(start),
            end: Box::new(end),
            step: step.map(Box::new),
            body: Box::new(body),
        }
    }

    /// Loops without an explicit step advance by 1.
    #[must_use]
    pub fn has_implicit_step(&self) -> bool {
        self.step.is_none()
    }
}

impl PrintStatement {
    #[must_use]
    pub fn new(expression: Node, position: Option<Position>) -> Self {
        PrintStatement {
            position,
            expression: Box::new(expression),
        }
    }
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            param_type: param_type.into(),
        }
    }
}

impl FunctionDeclaration {
    #[must_use]
    pub fn new(
        name: String,
        parameters: Vec<Parameter>,
        return_type: String,
        body: Option<Node>,
        position: Option<Position>,
    ) -> Self {
        FunctionDeclaration {
            position,
            name,
            parameters,
            return_type,
            body: body.map(Box::new),
        }
    }

    #[must_use]
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Declarations without a body are forward declarations.
    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.body.is_none()
    }
}

impl FunctionCall {
    #[must_use]
    pub fn new(name: String, arguments: NodeList, position: Option<Position>) -> Self {
        FunctionCall {
            position,
            name,
            arguments,
        }
    }
}

impl ReturnStatement {
    #[must_use]
    pub fn new(value: Option<Node>, position: Option<Position>) -> Self {
        ReturnStatement {
            position,
            value: value.map(Box::new),
        }
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        self.value.is_none()
    }
}

impl Node {
    /// Line of the node, or 0 when the parser did not record a position.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.position().unwrap_or_default().line
    }

    /// Column of the node, or 0 when the parser did not record a position.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.position().unwrap_or_default().column
    }

    /// Direct children in rendering order.
    #[must_use]
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Program(Program { statements, .. }) | Node::Block(Block { statements, .. }) => {
                statements.iter().collect()
            }
            Node::VariableDeclaration(decl) => decl.initializer.as_deref().into_iter().collect(),
            Node::Assignment(assign) => vec![&*assign.value],
            Node::BinaryOperation(bin) => vec![&*bin.left, &*bin.right],
            Node::Literal(_) | Node::Identifier(_) => Vec::new(),
            Node::IfStatement(stmt) => {
                let mut children = vec![&*stmt.condition, &*stmt.then_branch];
                children.extend(stmt.else_branch.as_deref());
                children
            }
            Node::WhileLoop(stmt) => vec![&*stmt.condition, &*stmt.body],
            Node::RangeLoop(stmt) => {
                let mut children = vec![&*stmt.start, &*stmt.end];
                children.extend(stmt.step.as_deref());
                children.push(&*stmt.body);
                children
            }
            Node::PrintStatement(stmt) => vec![&*stmt.expression],
            Node::FunctionDeclaration(decl) => decl.body.as_deref().into_iter().collect(),
            Node::FunctionCall(call) => call.arguments.iter().collect(),
            Node::ReturnStatement(stmt) => stmt.value.as_deref().into_iter().collect(),
        }
    }

    /// Pre-order walk over this node and all of its descendants.
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    /// Number of nodes in the subtree rooted at `self`, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.preorder().count()
    }

    /// `true` if this node currently owns at least one child node.
    #[must_use]
    pub fn has_children(&self) -> bool {
        match self {
            Node::Program(Program { statements, .. }) | Node::Block(Block { statements, .. }) => {
                !statements.is_empty()
            }
            Node::VariableDeclaration(decl) => decl.initializer.is_some(),
            Node::Literal(_) | Node::Identifier(_) => false,
            Node::FunctionDeclaration(decl) => decl.body.is_some(),
            Node::FunctionCall(call) => !call.arguments.is_empty(),
            Node::ReturnStatement(stmt) => stmt.value.is_some(),
            Node::Assignment(_)
            | Node::BinaryOperation(_)
            | Node::IfStatement(_)
            | Node::WhileLoop(_)
            | Node::RangeLoop(_)
            | Node::PrintStatement(_) => true,
        }
    }
}

/// Moves the children that own further nodes onto a work stack, leaving an
/// empty identifier in each vacated slot. Childless children stay in place.
pub(crate) trait DetachNested {
    fn detach_nested(&mut self, out: &mut Vec<Node>);
}

fn detach(slot: &mut Node, out: &mut Vec<Node>) {
    if slot.has_children() {
        let vacant = Node::Identifier(Identifier {
            position: None,
            name: String::new(),
        });
        out.push(mem::replace(slot, vacant));
    }
}

fn detach_optional(slot: Option<&mut Node>, out: &mut Vec<Node>) {
    if let Some(slot) = slot {
        detach(slot, out);
    }
}

fn detach_list(list: &mut NodeList, out: &mut Vec<Node>) {
    for slot in list.iter_mut() {
        detach(slot, out);
    }
}

impl DetachNested for Node {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        match self {
            Node::Program(program) => program.detach_nested(out),
            Node::Block(block) => block.detach_nested(out),
            Node::VariableDeclaration(decl) => decl.detach_nested(out),
            Node::Assignment(assign) => assign.detach_nested(out),
            Node::BinaryOperation(bin) => bin.detach_nested(out),
            Node::Literal(_) | Node::Identifier(_) => {}
            Node::IfStatement(stmt) => stmt.detach_nested(out),
            Node::WhileLoop(stmt) => stmt.detach_nested(out),
            Node::RangeLoop(stmt) => stmt.detach_nested(out),
            Node::PrintStatement(stmt) => stmt.detach_nested(out),
            Node::FunctionDeclaration(decl) => decl.detach_nested(out),
            Node::FunctionCall(call) => call.detach_nested(out),
            Node::ReturnStatement(stmt) => stmt.detach_nested(out),
        }
    }
}

impl DetachNested for Program {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach_list(&mut self.statements, out);
    }
}

impl DetachNested for Block {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach_list(&mut self.statements, out);
    }
}

impl DetachNested for VariableDeclaration {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach_optional(self.initializer.as_deref_mut(), out);
    }
}

impl DetachNested for Assignment {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach(&mut self.value, out);
    }
}

impl DetachNested for BinaryOperation {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach(&mut self.left, out);
        detach(&mut self.right, out);
    }
}

impl DetachNested for IfStatement {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach(&mut self.condition, out);
        detach(&mut self.then_branch, out);
        detach_optional(self.else_branch.as_deref_mut(), out);
    }
}

impl DetachNested for WhileLoop {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach(&mut self.condition, out);
        detach(&mut self.body, out);
    }
}

impl DetachNested for RangeLoop {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach(&mut self.start, out);
        detach(&mut self.end, out);
        detach_optional(self.step.as_deref_mut(), out);
        detach(&mut self.body, out);
    }
}

impl DetachNested for PrintStatement {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach(&mut self.expression, out);
    }
}

impl DetachNested for FunctionDeclaration {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach_optional(self.body.as_deref_mut(), out);
    }
}

impl DetachNested for FunctionCall {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach_list(&mut self.arguments, out);
    }
}

impl DetachNested for ReturnStatement {
    fn detach_nested(&mut self, out: &mut Vec<Node>) {
        detach_optional(self.value.as_deref_mut(), out);
    }
}

/// Iterator returned by [`Node::preorder`].
pub struct Preorder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}
