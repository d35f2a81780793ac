//! Implementation methods for AST enum types.
//!
//! This module provides the display names shared by the renderers and
//! convenience queries on node kinds and literal tags.

use core::fmt;
use std::fmt::{Display, Formatter};

use crate::nodes::{LiteralValue, NodeKind, ValueType};

impl NodeKind {
    /// Returns `true` for the kinds that own a statement list.
    ///
    /// Only these kinds accept [`crate::builder::append_child`].
    ///
    /// # Example
    ///
    /// ```
    /// use waki_ast::nodes::NodeKind;
    ///
    /// assert!(NodeKind::Block.has_statements());
    /// assert!(!NodeKind::WhileLoop.has_statements());
    /// ```
    #[must_use]
    pub fn has_statements(self) -> bool {
        matches!(self, NodeKind::Program | NodeKind::Block)
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl ValueType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ValueType::Int),
            "float" => Some(ValueType::Float),
            "string" => Some(ValueType::String),
            _ => None,
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-like spelling of a literal: integers as is, floats always with a
/// fractional part or exponent, strings quoted with escapes.
impl Display for LiteralValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LiteralValue::Int(value) => write!(f, "{value}"),
            LiteralValue::Float(value) => write!(f, "{value:?}"),
            LiteralValue::String(value) => write!(f, "{value:?}"),
        }
    }
}
