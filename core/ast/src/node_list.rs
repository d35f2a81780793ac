//! Ordered, owning container of child nodes.
//!
//! `NodeList` backs the statements of programs and blocks and the arguments of
//! function calls. It only ever grows at the end, keeps insertion order, and
//! reports allocation failures instead of dropping the node being appended.

use crate::{errors::AstError, nodes::Node};

const BASE_CAPACITY: usize = 4;

#[derive(Clone, PartialEq, Debug, Default)]
pub struct NodeList {
    items: Vec<Node>,
}

impl NodeList {
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Builds a list from already collected nodes, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::AllocationFailure`] if the backing storage cannot grow.
    pub fn try_from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self, AstError> {
        let mut list = Self::new();
        for node in nodes {
            list.append(node)?;
        }
        Ok(list)
    }

    /// Appends `node` at the end of the list.
    ///
    /// Storage doubles from a base capacity of 4 whenever the list is full.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::AllocationFailure`] if the backing storage cannot grow.
    /// The list is left unchanged in that case.
    pub fn append(&mut self, node: Node) -> Result<(), AstError> {
        if self.items.len() == self.items.capacity() {
            self.grow()?;
        }
        self.items.push(node);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Returns the node stored at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::IndexOutOfRange`] if `index >= self.len()`.
    pub fn at(&self, index: usize) -> Result<&Node, AstError> {
        self.items.get(index).ok_or(AstError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.items.iter_mut()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Node] {
        &self.items
    }

    fn grow(&mut self) -> Result<(), AstError> {
        let current = self.items.capacity();
        let requested = if current == 0 {
            BASE_CAPACITY
        } else {
            current.saturating_mul(2)
        };
        self.items
            .try_reserve_exact(requested - self.items.len())
            .map_err(|source| AstError::AllocationFailure {
                what: "node list",
                requested,
                source,
            })?;
        tracing::trace!(capacity = self.items.capacity(), "node list grown");
        Ok(())
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for NodeList {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
