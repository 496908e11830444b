//! Kind-directed visitor dispatch.
//!
//! [`Visitor`] has one handler per concrete kind plus one per refinement
//! group, each defaulting to the next-less-specific handler: `visit_add`
//! falls back to `visit_binary`, which falls back to `visit_rvalue`,
//! which falls back to [`Visitor::visit_node`]. Implementors override the
//! most specific level they care about; a node whose chain reaches the
//! unoverridden `visit_node` fails with [`VisitError::UnhandledKind`]
//! rather than fabricating a default result.
//!
//! The group handlers receive borrowed view enums ([`StatementRef`],
//! [`RvalueRef`], [`BinaryRef`]) so an ancestor handler can still match
//! on the concrete kind it was reached from.
//!
//! Entry is through [`Accept::accept`], implemented on every node type;
//! dispatch always starts at the node's most specific handler.

use lattice_tree::{TreeNode, VisitError};

use crate::nodes::{
    Add, Assignment, Binary, Div, ErroneousStatement, ErroneousValue, Literal, Mul, Negate, Print,
    Program, Reference, Rvalue, Statement, Sub, Variable,
};

/// Borrowed view of a statement-like node, carried by the group handler.
#[derive(Clone, Copy)]
pub enum StatementRef<'a> {
    Assignment(&'a Assignment),
    Print(&'a Print),
    Erroneous(&'a ErroneousStatement),
}

impl<'a> StatementRef<'a> {
    #[must_use]
    pub fn as_node(self) -> &'a dyn TreeNode {
        match self {
            StatementRef::Assignment(node) => node,
            StatementRef::Print(node) => node,
            StatementRef::Erroneous(node) => node,
        }
    }
}

/// Borrowed view of an expression-like node.
#[derive(Clone, Copy)]
pub enum RvalueRef<'a> {
    Literal(&'a Literal),
    Reference(&'a Reference),
    Negate(&'a Negate),
    Binary(BinaryRef<'a>),
    Erroneous(&'a ErroneousValue),
}

impl<'a> RvalueRef<'a> {
    #[must_use]
    pub fn as_node(self) -> &'a dyn TreeNode {
        match self {
            RvalueRef::Literal(node) => node,
            RvalueRef::Reference(node) => node,
            RvalueRef::Negate(node) => node,
            RvalueRef::Binary(node) => node.as_node(),
            RvalueRef::Erroneous(node) => node,
        }
    }
}

/// Borrowed view of a binary arithmetic node.
#[derive(Clone, Copy)]
pub enum BinaryRef<'a> {
    Add(&'a Add),
    Sub(&'a Sub),
    Mul(&'a Mul),
    Div(&'a Div),
}

impl<'a> BinaryRef<'a> {
    #[must_use]
    pub fn as_node(self) -> &'a dyn TreeNode {
        match self {
            BinaryRef::Add(node) => node,
            BinaryRef::Sub(node) => node,
            BinaryRef::Mul(node) => node,
            BinaryRef::Div(node) => node,
        }
    }

    #[must_use]
    pub fn lhs(self) -> &'a lattice_tree::One<Rvalue> {
        match self {
            BinaryRef::Add(node) => &node.lhs,
            BinaryRef::Sub(node) => &node.lhs,
            BinaryRef::Mul(node) => &node.lhs,
            BinaryRef::Div(node) => &node.lhs,
        }
    }

    #[must_use]
    pub fn rhs(self) -> &'a lattice_tree::One<Rvalue> {
        match self {
            BinaryRef::Add(node) => &node.rhs,
            BinaryRef::Sub(node) => &node.rhs,
            BinaryRef::Mul(node) => &node.rhs,
            BinaryRef::Div(node) => &node.rhs,
        }
    }
}

/// One handler per node kind, producing an `R` per visited node.
///
/// # Errors
///
/// Every handler returns `Err(VisitError::UnhandledKind)` when the
/// refinement chain bottoms out without an override.
pub trait Visitor<R> {
    /// Universal fallback, reached when no kind on the chain is handled.
    fn visit_node(&mut self, node: &dyn TreeNode) -> Result<R, VisitError> {
        Err(VisitError::UnhandledKind {
            kind: node.kind_name(),
        })
    }

    fn visit_program(&mut self, node: &Program) -> Result<R, VisitError> {
        self.visit_node(node)
    }

    fn visit_variable(&mut self, node: &Variable) -> Result<R, VisitError> {
        self.visit_node(node)
    }

    fn visit_statement(&mut self, node: StatementRef<'_>) -> Result<R, VisitError> {
        self.visit_node(node.as_node())
    }

    fn visit_assignment(&mut self, node: &Assignment) -> Result<R, VisitError> {
        self.visit_statement(StatementRef::Assignment(node))
    }

    fn visit_print(&mut self, node: &Print) -> Result<R, VisitError> {
        self.visit_statement(StatementRef::Print(node))
    }

    fn visit_erroneous_statement(&mut self, node: &ErroneousStatement) -> Result<R, VisitError> {
        self.visit_statement(StatementRef::Erroneous(node))
    }

    fn visit_rvalue(&mut self, node: RvalueRef<'_>) -> Result<R, VisitError> {
        self.visit_node(node.as_node())
    }

    fn visit_literal(&mut self, node: &Literal) -> Result<R, VisitError> {
        self.visit_rvalue(RvalueRef::Literal(node))
    }

    fn visit_reference(&mut self, node: &Reference) -> Result<R, VisitError> {
        self.visit_rvalue(RvalueRef::Reference(node))
    }

    fn visit_negate(&mut self, node: &Negate) -> Result<R, VisitError> {
        self.visit_rvalue(RvalueRef::Negate(node))
    }

    fn visit_erroneous_value(&mut self, node: &ErroneousValue) -> Result<R, VisitError> {
        self.visit_rvalue(RvalueRef::Erroneous(node))
    }

    fn visit_binary(&mut self, node: BinaryRef<'_>) -> Result<R, VisitError> {
        self.visit_rvalue(RvalueRef::Binary(node))
    }

    fn visit_add(&mut self, node: &Add) -> Result<R, VisitError> {
        self.visit_binary(BinaryRef::Add(node))
    }

    fn visit_sub(&mut self, node: &Sub) -> Result<R, VisitError> {
        self.visit_binary(BinaryRef::Sub(node))
    }

    fn visit_mul(&mut self, node: &Mul) -> Result<R, VisitError> {
        self.visit_binary(BinaryRef::Mul(node))
    }

    fn visit_div(&mut self, node: &Div) -> Result<R, VisitError> {
        self.visit_binary(BinaryRef::Div(node))
    }
}

/// Entry point for [`Visitor`] dispatch, implemented for every node type
/// and refinement enum. Always starts at the node's most specific
/// handler.
pub trait Accept {
    /// Dispatches `visitor` on this node.
    ///
    /// # Errors
    ///
    /// Whatever the resolved handler returns; the default chain ends in
    /// [`VisitError::UnhandledKind`].
    fn accept<R, V: Visitor<R> + ?Sized>(&self, visitor: &mut V) -> Result<R, VisitError>;
}

macro_rules! accept_concrete {
    ($( $name:ident => $handler:ident ),+ $(,)?) => {$(
        impl Accept for $name {
            fn accept<R, V: Visitor<R> + ?Sized>(
                &self,
                visitor: &mut V,
            ) -> Result<R, VisitError> {
                visitor.$handler(self)
            }
        }
    )+};
}

accept_concrete! {
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

impl Accept for Statement {
    fn accept<R, V: Visitor<R> + ?Sized>(&self, visitor: &mut V) -> Result<R, VisitError> {
        match self {
            Statement::Assignment(node) => visitor.visit_assignment(node),
            Statement::Print(node) => visitor.visit_print(node),
            Statement::Erroneous(node) => visitor.visit_erroneous_statement(node),
        }
    }
}

impl Accept for Rvalue {
    fn accept<R, V: Visitor<R> + ?Sized>(&self, visitor: &mut V) -> Result<R, VisitError> {
        match self {
            Rvalue::Literal(node) => visitor.visit_literal(node),
            Rvalue::Reference(node) => visitor.visit_reference(node),
            Rvalue::Negate(node) => visitor.visit_negate(node),
            Rvalue::Binary(node) => node.accept(visitor),
            Rvalue::Erroneous(node) => visitor.visit_erroneous_value(node),
        }
    }
}

impl Accept for Binary {
    fn accept<R, V: Visitor<R> + ?Sized>(&self, visitor: &mut V) -> Result<R, VisitError> {
        match self {
            Binary::Add(node) => visitor.visit_add(node),
            Binary::Sub(node) => visitor.visit_sub(node),
            Binary::Mul(node) => visitor.visit_mul(node),
            Binary::Div(node) => visitor.visit_div(node),
        }
    }
}
