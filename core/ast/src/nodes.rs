use core::fmt;
use std::fmt::{Display, Formatter};

use crate::node_list::NodeList;

/// Source position of a node, as reported by the parser.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[macro_export]
macro_rules! ast_node {
    (
        $(#[$outer:meta])*
        $struct_vis:vis struct $name:ident {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field_name:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Debug)]
        $struct_vis struct $name {
            pub position: Option<$crate::nodes::Position>,
            $(
                $(#[$field_attr])*
                $field_vis $field_name : $field_ty,
            )*
        }
    };
}

macro_rules! ast_nodes {
    (
        $(
            $(#[$outer:meta])*
            $struct_vis:vis struct $name:ident { $($fields:tt)* }
        )+
    ) => {
        $(
            ast_node! {
                $(#[$outer])*
                $struct_vis struct $name { $($fields)* }
            }
        )+
    };
}

/// Generates the node sum type together with its discriminant enum.
///
/// Each arm is declared as `Variant(Payload) => "TAG"`; the tag is the name
/// used by both renderers.
macro_rules! ast_enum {
    (
        $(#[$outer:meta])*
        $enum_vis:vis enum $name:ident : $kind:ident {
            $(
                $(#[$arm_attr:meta])*
                $arm:ident ( $payload:ty ) => $tag:literal,
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Debug)]
        $enum_vis enum $name {
            $(
                $(#[$arm_attr])*
                $arm($payload),
            )*
        }

        /// Discriminant of [`Node`], one value per syntactic construct.
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $enum_vis enum $kind {
            $(
                $arm,
            )*
        }

        impl $kind {
            /// Every node kind, in declaration order.
            pub const ALL: &'static [$kind] = &[$($kind::$arm,)*];

            /// Tag naming this kind in the text outline and in JSON `"type"` members.
            #[must_use]
            pub fn tag(self) -> &'static str {
                match self {
                    $(
                        $kind::$arm => $tag,
                    )*
                }
            }

            #[must_use]
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $(
                        $tag => Some($kind::$arm),
                    )*
                    _ => None,
                }
            }
        }

        impl $name {
            #[must_use]
            pub fn kind(&self) -> $kind {
                match self {
                    $(
                        $name::$arm(_) => $kind::$arm,
                    )*
                }
            }

            #[must_use]
            pub fn position(&self) -> Option<Position> {
                match self {
                    $(
                        $name::$arm(n) => n.position,
                    )*
                }
            }
        }

        $(
            impl From<$payload> for $name {
                fn from(n: $payload) -> Self {
                    $name::$arm(n)
                }
            }
        )*
    };
}

ast_enum! {
    /// A node of the Waki syntax tree. Every child is exclusively owned by its parent.
    pub enum Node: NodeKind {
        Program(Program) => "PROGRAM",
        Block(Block) => "BLOCK",
        VariableDeclaration(VariableDeclaration) => "VAR_DECL",
        Assignment(Assignment) => "ASSIGN",
        BinaryOperation(BinaryOperation) => "BIN_OP",
        Literal(Literal) => "LITERAL",
        Identifier(Identifier) => "IDENT",
        IfStatement(IfStatement) => "IF",
        WhileLoop(WhileLoop) => "WHILE",
        /// `round` loop over a bounded range.
        RangeLoop(RangeLoop) => "ROUND",
        PrintStatement(PrintStatement) => "PRINT",
        FunctionDeclaration(FunctionDeclaration) => "FUNC_DECL",
        FunctionCall(FunctionCall) => "FUNC_CALL",
        ReturnStatement(ReturnStatement) => "RETURN",
    }
}

/// Type tag of a literal. Always derived from the active [`LiteralValue`] arm.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ValueType {
    Int,
    Float,
    String,
}

#[derive(Clone, PartialEq, Debug)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    String(String),
}

/// A single `name: type` entry of a function signature.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: String,
}

ast_nodes! {

    pub struct Program {
        pub statements: NodeList,
    }

    pub struct Block {
        pub statements: NodeList,
    }

    pub struct VariableDeclaration {
        pub name: String,
        pub declared_type: String,
        /// `evere` declarations are global, `lim` declarations are local.
        pub is_global: bool,
        pub initializer: Option<Box<Node>>,
    }

    pub struct Assignment {
        pub target: String,
        pub value: Box<Node>,
    }

    pub struct BinaryOperation {
        pub operator: String,
        pub left: Box<Node>,
        pub right: Box<Node>,
    }

    pub struct Literal {
        pub value: LiteralValue,
    }

    pub struct Identifier {
        pub name: String,
    }

    pub struct IfStatement {
        pub condition: Box<Node>,
        pub then_branch: Box<Node>,
        pub else_branch: Option<Box<Node>>,
    }

    pub struct WhileLoop {
        pub condition: Box<Node>,
        pub body: Box<Node>,
    }

    pub struct RangeLoop {
        pub variable: String,
        pub start: Box<Node>,
        pub end: Box<Node>,
        pub step: Option<Box<Node>>,
        pub body: Box<Node>,
    }

    pub struct PrintStatement {
        pub expression: Box<Node>,
    }

    pub struct FunctionDeclaration {
        pub name: String,
        pub parameters: Vec<Parameter>,
        pub return_type: String,
        pub body: Option<Box<Node>>,
    }

    pub struct FunctionCall {
        pub name: String,
        pub arguments: NodeList,
    }

    pub struct ReturnStatement {
        pub value: Option<Box<Node>>,
    }

}
