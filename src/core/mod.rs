pub mod ast;

pub use ast::{Descendants, NodeKind, SyntaxNode};
