#![warn(clippy::pedantic)]
//! Typed tree runtime for the Lattice compiler pipeline.
//!
//! Compiler stages hand each other trees: the parser produces one, every
//! analysis pass reads or rewrites one, and tooling serializes them
//! across process boundaries. This crate is the runtime those trees share.
//! Schema crates declare their node kinds with [`tree_nodes!`] and
//! [`tree_kinds!`] and get, for free:
//!
//! - ownership edges with the four cardinalities ([`One`], [`Maybe`],
//!   [`Any`], [`Many`]) plus non-owning [`Link`]s resolved by identity;
//! - per-node bookkeeping: stable [`NodeId`]s, the erroneous marker, and
//!   a type-erased [`Annotations`] store for pass-private data;
//! - structural [`check_well_formed`] validation;
//! - a text dump, a JSON dump, and a self-describing binary round-trip
//!   format whose annotation handling is driven by a [`SerdesRegistry`].

pub mod annotations;
pub mod check;
pub mod codec;
pub mod dump;
pub mod edge;
pub mod errors;
pub mod json;
pub mod location;
mod macros;
pub mod node;
pub mod serdes;

pub use annotations::Annotations;
pub use check::check_well_formed;
pub use codec::{Decode, DecodeContext, DecodeNode, deserialize, serialize};
pub use dump::dump;
pub use edge::{Any, Link, Many, Maybe, One, TreeField};
pub use errors::{FormatError, NotWellFormed, VisitError, Violation};
pub use json::to_json;
pub use location::SourceLocation;
pub use node::{NodeData, NodeId, TreeNode};
pub use serdes::SerdesRegistry;
