#![warn(clippy::pedantic)]
//! Abstract syntax tree of the Waki language front end.
//!
//! The parser builds trees bottom-up through [`builder`]; the finished tree is
//! held by a [`tree::SyntaxTree`], rendered with [`printer`] (indented text)
//! or [`json`], and released with [`lifecycle::destroy`].
pub mod builder;
pub(crate) mod enums_impl;
pub mod errors;
pub mod json;
pub mod lifecycle;
pub mod node_list;
pub mod nodes;
pub(crate) mod nodes_impl;
pub mod printer;
pub mod tree;

pub use nodes_impl::Preorder;
