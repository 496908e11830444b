use lattice_tree::{Link, Maybe, One};

use crate::nodes::{
    Add, Assignment, Binary, Div, Literal, Mul, Negate, Print, Program, Reference, Rvalue,
    Statement, Sub, Variable,
};

impl Program {
    /// Declares a variable without an initializer.
    pub fn declare(&mut self, name: impl Into<String>) {
        self.variables.append(Variable::new(name.into(), Maybe::empty()));
    }

    pub fn push_statement(&mut self, statement: impl Into<Statement>) {
        self.statements.append(statement.into());
    }
}

impl Assignment {
    /// An assignment of `rhs` to `lhs`, with both edges bound.
    #[must_use]
    pub fn of(lhs: Reference, rhs: impl Into<Rvalue>) -> Self {
        Assignment::new(One::new(lhs), One::new(rhs.into()))
    }
}

impl Print {
    /// A print of a fully built expression.
    #[must_use]
    pub fn of(value: impl Into<Rvalue>) -> Self {
        Print::new(One::new(value.into()))
    }
}

impl Negate {
    /// The negation of a fully built operand.
    #[must_use]
    pub fn of(operand: impl Into<Rvalue>) -> Self {
        Negate::new(One::new(operand.into()))
    }
}

impl Reference {
    /// An unresolved reference to the variable called `name`.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Reference::new(name.into(), Link::unresolved())
    }
}

impl Literal {
    #[must_use]
    pub fn of(value: i64) -> Self {
        Literal::new(value)
    }
}

macro_rules! binary_ctor {
    ($($name:ident),+ $(,)?) => {$(
        impl $name {
            /// The operation applied to two fully built operands.
            #[must_use]
            pub fn of(lhs: impl Into<Rvalue>, rhs: impl Into<Rvalue>) -> Self {
                $name::new(One::new(lhs.into()), One::new(rhs.into()))
            }
        }

        impl From<$name> for Rvalue {
            fn from(node: $name) -> Self {
                Rvalue::Binary(Binary::$name(node))
            }
        }
    )+};
}

binary_ctor!(Add, Sub, Mul, Div);
