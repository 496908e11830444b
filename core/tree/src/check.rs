//! Structural well-formedness checking.
//!
//! A node is well-formed iff it is not marked erroneous, every `One` edge
//! is bound, every `Many` edge is non-empty, and every owned child is
//! itself well-formed. Links and annotations play no part. The check is a
//! pure read-only traversal, depth-first in edge-declaration order, and
//! stops at the first violation.

use crate::errors::{NotWellFormed, Violation};
use crate::node::TreeNode;

/// How a single field failed, as reported by
/// [`TreeField::check`](crate::edge::TreeField::check).
#[derive(Debug)]
pub enum EdgeViolation {
    /// A `One` edge with no child.
    Unbound,
    /// A `Many` edge with no elements.
    Empty,
    /// A child deeper in the tree failed; already fully attributed.
    Child(NotWellFormed),
}

/// Checks `node` and its owned closure for structural completeness.
///
/// # Errors
///
/// Returns the first violation found, attributed to the offending node's
/// kind and source location annotation (when attached).
pub fn check_well_formed(node: &dyn TreeNode) -> Result<(), NotWellFormed> {
    if node.data().erroneous {
        return Err(violation(node, Violation::Erroneous));
    }
    for (name, field) in node.fields() {
        match field.check() {
            Ok(()) => {}
            Err(EdgeViolation::Unbound) => {
                return Err(violation(node, Violation::Unbound { field: name }));
            }
            Err(EdgeViolation::Empty) => {
                return Err(violation(node, Violation::Empty { field: name }));
            }
            Err(EdgeViolation::Child(error)) => return Err(error),
        }
    }
    Ok(())
}

fn violation(node: &dyn TreeNode, reason: Violation) -> NotWellFormed {
    NotWellFormed {
        kind: node.kind_name(),
        location: node.data().source_location().cloned(),
        reason,
    }
}
