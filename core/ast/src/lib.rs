#![warn(clippy::pedantic)]
//! AST schema and visitors for the Lattice language.
//!
//! The node kinds live in [`nodes`], declared with the `lattice-tree`
//! schema macros; [`visit`] and [`walk`] provide the two visitor
//! disciplines (result-producing dispatch with refinement-chain fallback,
//! and depth-first traversal); [`resolve`] is the pass that binds
//! variable references to their declarations.

pub mod nodes;
pub(crate) mod nodes_impl;
pub mod resolve;
pub mod visit;
pub mod walk;

pub use nodes::{
    Add, Assignment, Binary, Div, ErroneousStatement, ErroneousValue, Literal, Mul, Negate, Print,
    Program, Reference, Rvalue, Statement, Sub, Variable,
};
pub use resolve::resolve_references;
pub use visit::{Accept, BinaryRef, RvalueRef, StatementRef, Visitor};
pub use walk::{
    RecursiveVisitor, Traverse, walk_assignment, walk_binary, walk_negate, walk_print,
    walk_program, walk_variable,
};
