//! Node kinds of the Lattice AST.
//!
//! Declared with the runtime's schema macros; field order here is
//! rendering and traversal order. The refinement enums near the bottom
//! group concrete kinds for visitor dispatch: `Add` refines `Binary`
//! refines `Rvalue`, so a visitor handling `Rvalue` catches every
//! expression kind it does not handle more specifically.

use lattice_tree::{Any, Link, Many, Maybe, One, tree_kinds, tree_nodes};

tree_nodes! {
    /// Root of a parsed program.
    pub struct Program {
        pub variables: Any<Variable>,
        pub statements: Many<Statement>,
    }

    /// A declared variable; referenced by name from expressions.
    pub struct Variable {
        pub name: String,
        pub init: Maybe<Rvalue>,
    }

    /// Assigns the value of `rhs` to the variable `lhs` refers to.
    pub struct Assignment {
        pub lhs: One<Reference>,
        pub rhs: One<Rvalue>,
    }

    /// Writes the value of an expression to the program's output.
    pub struct Print {
        pub value: One<Rvalue>,
    }

    /// Placeholder for a statement the parser could not recover.
    [erroneous]
    pub struct ErroneousStatement {}

    /// An integer constant.
    pub struct Literal {
        pub value: i64,
    }

    /// A use of a variable by name. `target` is filled in by the
    /// reference resolution pass.
    pub struct Reference {
        pub name: String,
        pub target: Link<Variable>,
    }

    /// Arithmetic negation of a single operand.
    pub struct Negate {
        pub operand: One<Rvalue>,
    }

    pub struct Add {
        pub lhs: One<Rvalue>,
        pub rhs: One<Rvalue>,
    }

    pub struct Sub {
        pub lhs: One<Rvalue>,
        pub rhs: One<Rvalue>,
    }

    pub struct Mul {
        pub lhs: One<Rvalue>,
        pub rhs: One<Rvalue>,
    }

    pub struct Div {
        pub lhs: One<Rvalue>,
        pub rhs: One<Rvalue>,
    }

    /// Placeholder for an expression the parser could not recover.
    [erroneous]
    pub struct ErroneousValue {}
}

tree_kinds! {
    /// Statement-like kinds.
    pub enum Statement {
        Assignment(Assignment),
        Print(Print),
        Erroneous(ErroneousStatement),
    }

    /// Expression-like kinds.
    pub enum Rvalue {
        Literal(Literal),
        Reference(Reference),
        Negate(Negate),
        Binary(Binary),
        Erroneous(ErroneousValue),
    }

    /// Binary arithmetic, refining [`Rvalue`].
    pub enum Binary {
        Add(Add),
        Sub(Sub),
        Mul(Mul),
        Div(Div),
    }
}
