//! Depth-first traversal visitor.
//!
//! [`RecursiveVisitor`] resolves handlers exactly like
//! [`Visitor`](crate::visit::Visitor), but when the refinement chain of a
//! kind that owns children runs out of overrides, it descends into those
//! children (edge-declaration order, then sequence order) instead of
//! failing. Leaf kinds with no owned children still bottom out in
//! [`RecursiveVisitor::visit_node`] and its `UnhandledKind` default, and
//! `Link` fields are never followed.
//!
//! The `walk_*` functions are the traversal halves, callable from an
//! override that wants to do something and then continue downward.

use lattice_tree::{TreeNode, VisitError};

use crate::nodes::{
    Add, Assignment, Binary, Div, ErroneousStatement, ErroneousValue, Literal, Mul, Negate, Print,
    Program, Reference, Rvalue, Statement, Sub, Variable,
};
use crate::visit::{BinaryRef, RvalueRef, StatementRef};

pub trait RecursiveVisitor {
    /// Universal fallback for leaf kinds with no override anywhere on
    /// their chain.
    ///
    /// # Errors
    ///
    /// `UnhandledKind` by default.
    fn visit_node(&mut self, node: &dyn TreeNode) -> Result<(), VisitError> {
        Err(VisitError::UnhandledKind {
            kind: node.kind_name(),
        })
    }

    fn visit_program(&mut self, node: &Program) -> Result<(), VisitError> {
        walk_program(self, node)
    }

    fn visit_variable(&mut self, node: &Variable) -> Result<(), VisitError> {
        walk_variable(self, node)
    }

    fn visit_statement(&mut self, node: StatementRef<'_>) -> Result<(), VisitError> {
        match node {
            StatementRef::Assignment(node) => walk_assignment(self, node),
            StatementRef::Print(node) => walk_print(self, node),
            StatementRef::Erroneous(node) => self.visit_node(node),
        }
    }

    fn visit_assignment(&mut self, node: &Assignment) -> Result<(), VisitError> {
        self.visit_statement(StatementRef::Assignment(node))
    }

    fn visit_print(&mut self, node: &Print) -> Result<(), VisitError> {
        self.visit_statement(StatementRef::Print(node))
    }

    fn visit_erroneous_statement(&mut self, node: &ErroneousStatement) -> Result<(), VisitError> {
        self.visit_statement(StatementRef::Erroneous(node))
    }

    fn visit_rvalue(&mut self, node: RvalueRef<'_>) -> Result<(), VisitError> {
        match node {
            RvalueRef::Negate(node) => walk_negate(self, node),
            RvalueRef::Binary(node) => walk_binary(self, node),
            leaf => self.visit_node(leaf.as_node()),
        }
    }

    fn visit_literal(&mut self, node: &Literal) -> Result<(), VisitError> {
        self.visit_rvalue(RvalueRef::Literal(node))
    }

    fn visit_reference(&mut self, node: &Reference) -> Result<(), VisitError> {
        self.visit_rvalue(RvalueRef::Reference(node))
    }

    fn visit_negate(&mut self, node: &Negate) -> Result<(), VisitError> {
        self.visit_rvalue(RvalueRef::Negate(node))
    }

    fn visit_erroneous_value(&mut self, node: &ErroneousValue) -> Result<(), VisitError> {
        self.visit_rvalue(RvalueRef::Erroneous(node))
    }

    fn visit_binary(&mut self, node: BinaryRef<'_>) -> Result<(), VisitError> {
        self.visit_rvalue(RvalueRef::Binary(node))
    }

    fn visit_add(&mut self, node: &Add) -> Result<(), VisitError> {
        self.visit_binary(BinaryRef::Add(node))
    }

    fn visit_sub(&mut self, node: &Sub) -> Result<(), VisitError> {
        self.visit_binary(BinaryRef::Sub(node))
    }

    fn visit_mul(&mut self, node: &Mul) -> Result<(), VisitError> {
        self.visit_binary(BinaryRef::Mul(node))
    }

    fn visit_div(&mut self, node: &Div) -> Result<(), VisitError> {
        self.visit_binary(BinaryRef::Div(node))
    }
}

/// Entry point for [`RecursiveVisitor`] dispatch, the depth-first
/// counterpart of [`Accept`](crate::visit::Accept).
pub trait Traverse {
    /// Dispatches `visitor` on this node, starting at its most specific
    /// handler.
    ///
    /// # Errors
    ///
    /// Whatever the resolved handler returns.
    fn traverse<V: RecursiveVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), VisitError>;
}

macro_rules! traverse_concrete {
    ($( $name:ident => $handler:ident ),+ $(,)?) => {$(
        impl Traverse for $name {
            fn traverse<V: RecursiveVisitor + ?Sized>(
                &self,
                visitor: &mut V,
            ) -> Result<(), VisitError> {
                visitor.$handler(self)
            }
        }
    )+};
}

traverse_concrete! {
    Program => visit_program,
    Variable => visit_variable,
    Assignment => visit_assignment,
    Print => visit_print,
    ErroneousStatement => visit_erroneous_statement,
    Literal => visit_literal,
    Reference => visit_reference,
    Negate => visit_negate,
    ErroneousValue => visit_erroneous_value,
    Add => visit_add,
    Sub => visit_sub,
    Mul => visit_mul,
    Div => visit_div,
}

impl Traverse for Statement {
    fn traverse<V: RecursiveVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), VisitError> {
        match self {
            Statement::Assignment(node) => visitor.visit_assignment(node),
            Statement::Print(node) => visitor.visit_print(node),
            Statement::Erroneous(node) => visitor.visit_erroneous_statement(node),
        }
    }
}

impl Traverse for Rvalue {
    fn traverse<V: RecursiveVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), VisitError> {
        match self {
            Rvalue::Literal(node) => visitor.visit_literal(node),
            Rvalue::Reference(node) => visitor.visit_reference(node),
            Rvalue::Negate(node) => visitor.visit_negate(node),
            Rvalue::Binary(node) => match node {
                Binary::Add(node) => visitor.visit_add(node),
                Binary::Sub(node) => visitor.visit_sub(node),
                Binary::Mul(node) => visitor.visit_mul(node),
                Binary::Div(node) => visitor.visit_div(node),
            },
            Rvalue::Erroneous(node) => visitor.visit_erroneous_value(node),
        }
    }
}

/// Visits a program's variables, then its statements.
///
/// # Errors
///
/// The first child failure, immediately.
pub fn walk_program<V: RecursiveVisitor + ?Sized>(
    visitor: &mut V,
    node: &Program,
) -> Result<(), VisitError> {
    for variable in &node.variables {
        visitor.visit_variable(variable)?;
    }
    for statement in &node.statements {
        statement.traverse(visitor)?;
    }
    Ok(())
}

/// Visits a variable's initializer, when one is set.
///
/// # Errors
///
/// The first child failure, immediately.
pub fn walk_variable<V: RecursiveVisitor + ?Sized>(
    visitor: &mut V,
    node: &Variable,
) -> Result<(), VisitError> {
    if let Some(init) = node.init.get() {
        init.traverse(visitor)?;
    }
    Ok(())
}

/// Visits an assignment's bound children, left side first.
///
/// # Errors
///
/// The first child failure, immediately.
pub fn walk_assignment<V: RecursiveVisitor + ?Sized>(
    visitor: &mut V,
    node: &Assignment,
) -> Result<(), VisitError> {
    if let Some(lhs) = node.lhs.get() {
        visitor.visit_reference(lhs)?;
    }
    if let Some(rhs) = node.rhs.get() {
        rhs.traverse(visitor)?;
    }
    Ok(())
}

/// Visits a print statement's bound value.
///
/// # Errors
///
/// The first child failure, immediately.
pub fn walk_print<V: RecursiveVisitor + ?Sized>(
    visitor: &mut V,
    node: &Print,
) -> Result<(), VisitError> {
    if let Some(value) = node.value.get() {
        value.traverse(visitor)?;
    }
    Ok(())
}

/// Visits a negation's bound operand.
///
/// # Errors
///
/// The first child failure, immediately.
pub fn walk_negate<V: RecursiveVisitor + ?Sized>(
    visitor: &mut V,
    node: &Negate,
) -> Result<(), VisitError> {
    if let Some(operand) = node.operand.get() {
        operand.traverse(visitor)?;
    }
    Ok(())
}

/// Visits a binary operation's bound operands, left first.
///
/// # Errors
///
/// The first child failure, immediately.
pub fn walk_binary<V: RecursiveVisitor + ?Sized>(
    visitor: &mut V,
    node: BinaryRef<'_>,
) -> Result<(), VisitError> {
    if let Some(lhs) = node.lhs().get() {
        lhs.traverse(visitor)?;
    }
    if let Some(rhs) = node.rhs().get() {
        rhs.traverse(visitor)?;
    }
    Ok(())
}
