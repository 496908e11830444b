//! Ownership edges between nodes.
//!
//! Four cardinalities connect a parent node to the children it exclusively
//! owns:
//!
//! - [`One`]: exactly one child; unbound only while the tree is under
//!   construction.
//! - [`Maybe`]: zero or one child.
//! - [`Any`]: zero or more children, ordered.
//! - [`Many`]: one or more children, ordered; empty fails the
//!   well-formedness check.
//!
//! An edge owns its children outright: dropping the edge drops them, and
//! rebinding first releases whatever was bound before, so a child can
//! never have two owners and can never leak. [`Link`] is the non-owning
//! counterpart: a symbolic reference to another node by identity, filled
//! in by a resolution pass and deliberately excluded from drop, clone
//! depth, and recursive equality so the ownership graph stays a tree.
//!
//! [`TreeField`] is the uniform lens through which the checker, the
//! dumpers, and the binary encoder see fields; scalars implement it as
//! leaves, edges implement it by recursing into their children.

use core::fmt;
use std::marker::PhantomData;

use crate::check::EdgeViolation;
use crate::codec::Value;
use crate::dump::Dumper;
use crate::node::{NodeId, TreeNode};
use crate::serdes::SerdesRegistry;

/// Uniform field interface used by the generic tree traversals.
///
/// Implemented by the edge containers and by the scalar field types;
/// schema crates never need to implement it themselves.
pub trait TreeField {
    /// Structural completeness of this field, recursing into owned
    /// children.
    fn check(&self) -> Result<(), EdgeViolation>;

    /// Encodes this field for the binary codec.
    fn encode(&self, registry: &SerdesRegistry) -> Result<Value, crate::errors::FormatError>;

    /// Renders this field into the debug text dump.
    fn dump(&self, name: &'static str, dumper: &mut Dumper<'_>);

    /// Renders this field's JSON value (the caller writes the key).
    fn dump_json(&self, out: &mut String, registry: &SerdesRegistry);
}

/// An edge owning exactly one child node.
///
/// Unbound only during construction; reading an unbound `One` yields
/// `None` rather than failing, because trees are legitimately incomplete
/// during incremental construction and error recovery. The
/// well-formedness check is what rules unbound edges out.
#[derive(Debug, Clone, PartialEq)]
pub struct One<T> {
    child: Option<Box<T>>,
}

impl<T> One<T> {
    /// An edge owning `child`.
    #[must_use]
    pub fn new(child: T) -> Self {
        One {
            child: Some(Box::new(child)),
        }
    }

    /// An unbound edge, to be bound later.
    #[must_use]
    pub fn empty() -> Self {
        One { child: None }
    }

    /// Transfers ownership of an already-heap-allocated child into the
    /// edge. Any previously bound child is released (dropped) first.
    pub fn bind(&mut self, child: Box<T>) {
        self.child = Some(child);
    }

    /// Convenience form of [`One::bind`] taking the child by value.
    pub fn set(&mut self, child: T) {
        self.bind(Box::new(child));
    }

    /// Takes the child out, leaving the edge unbound.
    pub fn take(&mut self) -> Option<Box<T>> {
        self.child.take()
    }

    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.child.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.child.as_deref_mut()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.child.is_some()
    }
}

impl<T> Default for One<T> {
    fn default() -> Self {
        One::empty()
    }
}

/// An edge owning zero or one child node.
#[derive(Debug, Clone, PartialEq)]
pub struct Maybe<T> {
    child: Option<Box<T>>,
}

impl<T> Maybe<T> {
    /// An edge owning `child`.
    #[must_use]
    pub fn new(child: T) -> Self {
        Maybe {
            child: Some(Box::new(child)),
        }
    }

    /// The explicit "unset" state; well-formed as-is.
    #[must_use]
    pub fn empty() -> Self {
        Maybe { child: None }
    }

    /// Transfers ownership of an already-heap-allocated child into the
    /// edge, releasing any previous child first.
    pub fn bind(&mut self, child: Box<T>) {
        self.child = Some(child);
    }

    /// Convenience form of [`Maybe::bind`] taking the child by value.
    pub fn set(&mut self, child: T) {
        self.bind(Box::new(child));
    }

    /// Drops the child, if any, returning to the unset state.
    pub fn clear(&mut self) {
        self.child = None;
    }

    /// Takes the child out, leaving the edge unset.
    pub fn take(&mut self) -> Option<Box<T>> {
        self.child.take()
    }

    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.child.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.child.as_deref_mut()
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.child.is_some()
    }
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Maybe::empty()
    }
}

/// An edge owning an ordered sequence of zero or more children.
#[derive(Debug, Clone, PartialEq)]
pub struct Any<T> {
    children: Vec<T>,
}

impl<T> Any<T> {
    #[must_use]
    pub fn new() -> Self {
        Any {
            children: Vec::new(),
        }
    }

    /// Transfers ownership of one more child into the sequence.
    pub fn append(&mut self, child: T) {
        self.children.push(child);
    }

    /// Boundary form of [`Any::append`] for an already-heap-allocated
    /// child.
    pub fn append_box(&mut self, child: Box<T>) {
        self.children.push(*child);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.children.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.children.iter_mut()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.children.get(index)
    }
}

impl<T> Default for Any<T> {
    fn default() -> Self {
        Any::new()
    }
}

impl<T> From<Vec<T>> for Any<T> {
    fn from(children: Vec<T>) -> Self {
        Any { children }
    }
}

impl<'a, T> IntoIterator for &'a Any<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

/// An edge owning an ordered sequence of one or more children.
///
/// Structurally identical to [`Any`]; the difference is that an empty
/// `Many` violates well-formedness.
#[derive(Debug, Clone, PartialEq)]
pub struct Many<T> {
    children: Vec<T>,
}

impl<T> Many<T> {
    #[must_use]
    pub fn new() -> Self {
        Many {
            children: Vec::new(),
        }
    }

    /// Transfers ownership of one more child into the sequence.
    pub fn append(&mut self, child: T) {
        self.children.push(child);
    }

    /// Boundary form of [`Many::append`] for an already-heap-allocated
    /// child.
    pub fn append_box(&mut self, child: Box<T>) {
        self.children.push(*child);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.children.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.children.iter_mut()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.children.get(index)
    }
}

impl<T> Default for Many<T> {
    fn default() -> Self {
        Many::new()
    }
}

impl<T> From<Vec<T>> for Many<T> {
    fn from(children: Vec<T>) -> Self {
        Many { children }
    }
}

impl<'a, T> IntoIterator for &'a Many<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

/// A non-owning, resolvable reference to another node.
///
/// Identifies its target by [`NodeId`], typically filled in by a
/// resolution pass after construction. Never traversed when owned
/// children are dropped, cloned, checked, or compared structurally;
/// equality compares the referenced identity only. Cloning a tree copies
/// links as-is, so a clone's links still name nodes in the original
/// tree's identity space until re-resolved.
pub struct Link<T> {
    target: Option<NodeId>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Link<T> {
    /// A link with no target yet.
    #[must_use]
    pub fn unresolved() -> Self {
        Link {
            target: None,
            _marker: PhantomData,
        }
    }

    /// A link to the node with the given identity.
    #[must_use]
    pub fn to(target: NodeId) -> Self {
        Link {
            target: Some(target),
            _marker: PhantomData,
        }
    }

    /// Points the link at `target`.
    pub fn resolve(&mut self, target: NodeId) {
        self.target = Some(target);
    }

    /// Returns the link to the unresolved state.
    pub fn clear(&mut self) {
        self.target = None;
    }

    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Link<T> {}

impl<T> Default for Link<T> {
    fn default() -> Self {
        Link::unresolved()
    }
}

impl<T> PartialEq for Link<T> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Some(target) => write!(f, "Link({target})"),
            None => write!(f, "Link(unresolved)"),
        }
    }
}

// --- TreeField implementations -------------------------------------------

impl<T: TreeNode> TreeField for One<T> {
    fn check(&self) -> Result<(), EdgeViolation> {
        match self.get() {
            Some(child) => crate::check::check_well_formed(child).map_err(EdgeViolation::Child),
            None => Err(EdgeViolation::Unbound),
        }
    }

    fn encode(&self, registry: &SerdesRegistry) -> Result<Value, crate::errors::FormatError> {
        match self.get() {
            Some(child) => crate::codec::encode_node(child, registry),
            None => Ok(Value::Null),
        }
    }

    fn dump(&self, name: &'static str, dumper: &mut Dumper<'_>) {
        match self.get() {
            Some(child) => dumper.child(name, child),
            None => dumper.missing(name),
        }
    }

    fn dump_json(&self, out: &mut String, registry: &SerdesRegistry) {
        match self.get() {
            Some(child) => crate::json::write_node(out, child, registry),
            None => crate::json::write_str(out, crate::json::MISSING),
        }
    }
}

impl<T: TreeNode> TreeField for Maybe<T> {
    fn check(&self) -> Result<(), EdgeViolation> {
        match self.get() {
            Some(child) => crate::check::check_well_formed(child).map_err(EdgeViolation::Child),
            None => Ok(()),
        }
    }

    fn encode(&self, registry: &SerdesRegistry) -> Result<Value, crate::errors::FormatError> {
        match self.get() {
            Some(child) => crate::codec::encode_node(child, registry),
            None => Ok(Value::Null),
        }
    }

    fn dump(&self, name: &'static str, dumper: &mut Dumper<'_>) {
        match self.get() {
            Some(child) => dumper.child(name, child),
            None => dumper.missing(name),
        }
    }

    fn dump_json(&self, out: &mut String, registry: &SerdesRegistry) {
        match self.get() {
            Some(child) => crate::json::write_node(out, child, registry),
            None => crate::json::write_str(out, crate::json::MISSING),
        }
    }
}

fn check_sequence<T: TreeNode>(children: &[T]) -> Result<(), EdgeViolation> {
    for child in children {
        crate::check::check_well_formed(child).map_err(EdgeViolation::Child)?;
    }
    Ok(())
}

fn encode_sequence<T: TreeNode>(
    children: &[T],
    registry: &SerdesRegistry,
) -> Result<Value, crate::errors::FormatError> {
    let mut items = Vec::with_capacity(children.len());
    for child in children {
        items.push(crate::codec::encode_node(child, registry)?);
    }
    Ok(Value::List(items))
}

fn dump_sequence<T: TreeNode>(children: &[T], name: &'static str, dumper: &mut Dumper<'_>) {
    dumper.sequence(name, children.iter().map(|child| child as &dyn TreeNode));
}

fn dump_json_sequence<T: TreeNode>(children: &[T], out: &mut String, registry: &SerdesRegistry) {
    if children.is_empty() {
        // Empty sequences render as the literal string "[]", not an
        // empty array.
        crate::json::write_str(out, "[]");
        return;
    }
    out.push('[');
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        crate::json::write_node(out, child, registry);
    }
    out.push(']');
}

impl<T: TreeNode> TreeField for Any<T> {
    fn check(&self) -> Result<(), EdgeViolation> {
        check_sequence(&self.children)
    }

    fn encode(&self, registry: &SerdesRegistry) -> Result<Value, crate::errors::FormatError> {
        encode_sequence(&self.children, registry)
    }

    fn dump(&self, name: &'static str, dumper: &mut Dumper<'_>) {
        dump_sequence(&self.children, name, dumper);
    }

    fn dump_json(&self, out: &mut String, registry: &SerdesRegistry) {
        dump_json_sequence(&self.children, out, registry);
    }
}

impl<T: TreeNode> TreeField for Many<T> {
    fn check(&self) -> Result<(), EdgeViolation> {
        if self.children.is_empty() {
            return Err(EdgeViolation::Empty);
        }
        check_sequence(&self.children)
    }

    fn encode(&self, registry: &SerdesRegistry) -> Result<Value, crate::errors::FormatError> {
        encode_sequence(&self.children, registry)
    }

    fn dump(&self, name: &'static str, dumper: &mut Dumper<'_>) {
        dump_sequence(&self.children, name, dumper);
    }

    fn dump_json(&self, out: &mut String, registry: &SerdesRegistry) {
        dump_json_sequence(&self.children, out, registry);
    }
}

impl<T> TreeField for Link<T> {
    fn check(&self) -> Result<(), EdgeViolation> {
        // Links are excluded from the structural traversal; an
        // unresolved link is not a well-formedness violation.
        Ok(())
    }

    fn encode(&self, _registry: &SerdesRegistry) -> Result<Value, crate::errors::FormatError> {
        match self.target {
            // Targets are remapped to the decoded identity space on the
            // way back in.
            Some(target) => Ok(Value::Int(target.get() as i64)),
            None => Ok(Value::Null),
        }
    }

    fn dump(&self, name: &'static str, dumper: &mut Dumper<'_>) {
        dumper.link(name, self.target);
    }

    fn dump_json(&self, out: &mut String, _registry: &SerdesRegistry) {
        match self.target {
            Some(target) => crate::json::write_str(out, &target.to_string()),
            None => crate::json::write_str(out, crate::json::MISSING),
        }
    }
}

macro_rules! scalar_tree_field {
    ($( $ty:ty => $encode:expr ),+ $(,)?) => {$(
        impl TreeField for $ty {
            fn check(&self) -> Result<(), EdgeViolation> {
                Ok(())
            }

            fn encode(
                &self,
                _registry: &SerdesRegistry,
            ) -> Result<Value, crate::errors::FormatError> {
                let encode: fn(&$ty) -> Value = $encode;
                Ok(encode(self))
            }

            fn dump(&self, name: &'static str, dumper: &mut Dumper<'_>) {
                dumper.scalar(name, self);
            }

            fn dump_json(&self, out: &mut String, _registry: &SerdesRegistry) {
                crate::json::write_str(out, &self.to_string());
            }
        }
    )+};
}

scalar_tree_field! {
    i64 => |value| Value::Int(*value),
    bool => |value| Value::Bool(*value),
    String => |value| Value::Str(value.clone()),
}
