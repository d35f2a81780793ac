//! Holder for the finished tree of one parse.
//!
//! The driver sets the root once after parsing, hands the tree to the
//! renderers, and releases it at the end. There is no process-wide root.

use std::io;

use crate::{
    errors::AstError,
    json::{self, JsonStyle},
    lifecycle,
    nodes::Node,
    printer,
};

#[derive(Clone, PartialEq, Debug, Default)]
pub struct SyntaxTree {
    root: Option<Node>,
}

impl SyntaxTree {
    #[must_use]
    pub fn new() -> Self {
        Self { root: None }
    }

    #[must_use]
    pub fn with_root(root: Node) -> Self {
        Self { root: Some(root) }
    }

    /// Stores the root produced by the parser.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::RootAlreadySet`] if a root was stored before; the
    /// existing root is kept and `root` is dropped.
    pub fn set_root(&mut self, root: Node) -> Result<(), AstError> {
        if self.root.is_some() {
            return Err(AstError::RootAlreadySet);
        }
        self.root = Some(root);
        Ok(())
    }

    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Writes the text outline of the tree; an unset root prints `NULL`.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::Io`] if `out` fails.
    pub fn render_text<W: io::Write>(&self, out: &mut W) -> Result<(), AstError> {
        printer::render_text(self.root(), out)
    }

    /// Writes the JSON form of the tree; an unset root is written as `null`.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::Io`] if `out` fails.
    pub fn render_json<W: io::Write>(&self, out: &mut W, style: JsonStyle) -> Result<(), AstError> {
        json::render_json(self.root(), out, style)
    }

    /// Releases the tree, returning the number of nodes released.
    pub fn release(self) -> usize {
        lifecycle::destroy(self.root)
    }
}
