//! Release of syntax trees.
//!
//! Every node kind that owns children releases them with a work stack instead
//! of recursion, so dropping an arbitrarily deep tree (long `else if` chains,
//! deeply nested expressions) never exhausts the call stack. This holds for
//! plain `drop`, for a [`crate::tree::SyntaxTree`] going out of scope and for
//! [`destroy`], which additionally reports how many nodes were released.

use crate::nodes::{
    Assignment, BinaryOperation, Block, FunctionCall, FunctionDeclaration, IfStatement, Node,
    PrintStatement, Program, RangeLoop, ReturnStatement, VariableDeclaration, WhileLoop,
};
use crate::nodes_impl::DetachNested;

/// Releases `node` and its whole subtree, returning the number of nodes released.
///
/// `None` releases nothing. Ownership makes a second release of the same tree
/// impossible: the tree is moved into this call.
pub fn destroy(node: Option<Node>) -> usize {
    let Some(root) = node else {
        return 0;
    };
    let root_kind = root.kind();
    let released = root.node_count();
    drop(root);

    tracing::debug!(root = %root_kind, released, "syntax tree destroyed");
    released
}

fn release_nested(owner: &mut impl DetachNested) {
    let mut pending = Vec::new();
    owner.detach_nested(&mut pending);
    // Each popped node hands its nested children over before it is dropped,
    // so its own drop finds nothing left to walk.
    while let Some(mut node) = pending.pop() {
        node.detach_nested(&mut pending);
    }
}

macro_rules! release_iteratively {
    ($($payload:ty),+ $(,)?) => {
        $(
            impl Drop for $payload {
                fn drop(&mut self) {
                    release_nested(self);
                }
            }
        )+
    };
}

release_iteratively!(
    Program,
    Block,
    VariableDeclaration,
    Assignment,
    BinaryOperation,
    IfStatement,
    WhileLoop,
    RangeLoop,
    PrintStatement,
    FunctionDeclaration,
    FunctionCall,
    ReturnStatement,
);
