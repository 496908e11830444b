//! Node identity and per-node bookkeeping.
//!
//! Every node in a Lattice tree carries a [`NodeData`] value next to its
//! schema-defined fields. It holds the node's identity, the erroneous
//! marker set by error-recovering builders, and the open annotation set.
//! The schema macros place it in a `data` field on every generated kind.

use core::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::annotations::Annotations;
use crate::edge::TreeField;
use crate::location::SourceLocation;

/// Process-wide node identity.
///
/// Uses `NonZeroU64` internally so `Option<NodeId>` has no overhead.
/// Identities are handed out by an atomic counter; deep-cloning a node
/// assigns fresh identities throughout the clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(NonZeroU64);

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

impl NodeId {
    /// Allocates a new, unique identity.
    #[must_use]
    pub fn fresh() -> Self {
        let raw = NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed);
        // The counter starts at 1 and would take centuries to wrap.
        NodeId(NonZeroU64::new(raw).expect("node id counter wrapped"))
    }

    /// Gets the inner u64 value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Bookkeeping carried by every node: identity, erroneous marker, and the
/// open annotation set.
///
/// `Clone` assigns a fresh [`NodeId`] and shares the annotation values
/// (they are reference-counted); `PartialEq` compares only the erroneous
/// marker, so identity and annotations never participate in structural
/// equality.
#[derive(Debug)]
pub struct NodeData {
    pub id: NodeId,
    pub erroneous: bool,
    pub annotations: Annotations,
}

impl NodeData {
    /// Bookkeeping for a regular node.
    #[must_use]
    pub fn new() -> Self {
        NodeData {
            id: NodeId::fresh(),
            erroneous: false,
            annotations: Annotations::new(),
        }
    }

    /// Bookkeeping for a node that represents error-recovered content.
    /// Such a node is permanently not well-formed.
    #[must_use]
    pub fn new_erroneous() -> Self {
        NodeData {
            erroneous: true,
            ..NodeData::new()
        }
    }

    /// Attaches an annotation, replacing any existing one of the same type.
    pub fn set_annotation<T: 'static>(&mut self, value: T) {
        self.annotations.set(value);
    }

    /// Reads back an annotation of the given type, if attached.
    #[must_use]
    pub fn get_annotation<T: 'static>(&self) -> Option<&T> {
        self.annotations.get::<T>()
    }

    /// The node's source location annotation, if one is attached.
    #[must_use]
    pub fn source_location(&self) -> Option<&SourceLocation> {
        self.annotations.get::<SourceLocation>()
    }
}

impl Default for NodeData {
    fn default() -> Self {
        NodeData::new()
    }
}

impl Clone for NodeData {
    fn clone(&self) -> Self {
        NodeData {
            id: NodeId::fresh(),
            erroneous: self.erroneous,
            annotations: self.annotations.clone(),
        }
    }
}

impl PartialEq for NodeData {
    fn eq(&self, other: &Self) -> bool {
        self.erroneous == other.erroneous
    }
}

/// The object-safe interface every tree node implements, whether it is a
/// concrete kind (a generated struct) or a refinement group (a generated
/// enum delegating to its variants).
///
/// The checker, dumpers, and binary encoder traverse nodes exclusively
/// through this trait plus [`TreeField`], which keeps them agnostic to the
/// concrete schema.
pub trait TreeNode {
    /// The kind discriminator; for refinement enums, the concrete
    /// variant's kind.
    fn kind_name(&self) -> &'static str;

    /// Per-node bookkeeping.
    fn data(&self) -> &NodeData;

    /// Mutable per-node bookkeeping.
    fn data_mut(&mut self) -> &mut NodeData;

    /// The node's fields in declaration order, paired with their names.
    fn fields(&self) -> Vec<(&'static str, &dyn TreeField)>;
}
