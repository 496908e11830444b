use lattice_ast::{
    Accept, Add, ErroneousStatement, Literal, Mul, Program, RecursiveVisitor, Reference, Rvalue,
    RvalueRef, Statement, Sub, Traverse, Variable, Visitor,
};
use lattice_tree::{TreeNode, VisitError};

use crate::utils::example_program;

/// Tags every expression-like node without distinguishing kinds.
struct RvalueTagger;

impl Visitor<&'static str> for RvalueTagger {
    fn visit_rvalue(&mut self, _node: RvalueRef<'_>) -> Result<&'static str, VisitError> {
        Ok("rvalue")
    }
}

#[test]
fn test_ancestor_override_catches_every_descendant() {
    let literal = Literal::of(1);
    assert_eq!(literal.accept(&mut RvalueTagger), Ok("rvalue"));

    // Two levels down the chain: Add -> Binary -> Rvalue.
    let add = Add::of(Literal::of(1), Literal::of(2));
    assert_eq!(add.accept(&mut RvalueTagger), Ok("rvalue"));

    let reference = Reference::named("x");
    assert_eq!(reference.accept(&mut RvalueTagger), Ok("rvalue"));
}

#[test]
fn test_kinds_outside_the_overridden_chain_still_fail() {
    let program = example_program();
    assert_eq!(
        program.accept(&mut RvalueTagger),
        Err(VisitError::UnhandledKind { kind: "Program" })
    );
}

/// Distinguishes the binary group from other expressions.
struct BinaryTagger;

impl Visitor<&'static str> for BinaryTagger {
    fn visit_binary(
        &mut self,
        _node: lattice_ast::BinaryRef<'_>,
    ) -> Result<&'static str, VisitError> {
        Ok("binary")
    }
}

#[test]
fn test_intermediate_override_only_catches_its_subtree() {
    let add = Add::of(Literal::of(1), Literal::of(2));
    assert_eq!(add.accept(&mut BinaryTagger), Ok("binary"));

    let literal = Literal::of(1);
    assert_eq!(
        literal.accept(&mut BinaryTagger),
        Err(VisitError::UnhandledKind { kind: "Literal" })
    );
}

/// Overrides both a concrete kind and its ancestor group.
struct MostSpecificWins;

impl Visitor<&'static str> for MostSpecificWins {
    fn visit_literal(&mut self, _node: &Literal) -> Result<&'static str, VisitError> {
        Ok("literal")
    }

    fn visit_rvalue(&mut self, _node: RvalueRef<'_>) -> Result<&'static str, VisitError> {
        Ok("rvalue")
    }
}

#[test]
fn test_concrete_override_beats_the_ancestor() {
    let literal = Literal::of(1);
    assert_eq!(literal.accept(&mut MostSpecificWins), Ok("literal"));

    let sub = Sub::of(Literal::of(3), Literal::of(1));
    assert_eq!(sub.accept(&mut MostSpecificWins), Ok("rvalue"));
}

/// Universal fallback override: accepts anything, reporting kind names.
struct KindCollector {
    kinds: Vec<&'static str>,
}

impl Visitor<()> for KindCollector {
    fn visit_node(&mut self, node: &dyn TreeNode) -> Result<(), VisitError> {
        self.kinds.push(node.kind_name());
        Ok(())
    }
}

#[test]
fn test_universal_fallback_sees_the_concrete_kind() {
    let mut collector = KindCollector { kinds: Vec::new() };
    Literal::of(1).accept(&mut collector).expect("fallback accepts");
    ErroneousStatement::default()
        .accept(&mut collector)
        .expect("fallback accepts");
    assert_eq!(collector.kinds, vec!["Literal", "ErroneousStatement"]);
}

/// Collects literal values during a depth-first traversal.
struct LiteralCollector {
    values: Vec<i64>,
}

impl RecursiveVisitor for LiteralCollector {
    fn visit_literal(&mut self, node: &Literal) -> Result<(), VisitError> {
        self.values.push(node.value);
        Ok(())
    }
}

#[test]
fn test_recursive_visitor_descends_in_declaration_order() {
    let expr = Rvalue::from(Add::of(
        Literal::of(2),
        Mul::of(Literal::of(3), Literal::of(4)),
    ));
    let mut collector = LiteralCollector { values: Vec::new() };
    expr.traverse(&mut collector).expect("composites walk");
    assert_eq!(collector.values, vec![2, 3, 4]);
}

#[test]
fn test_recursive_visitor_still_fails_on_unhandled_leaves() {
    // The program contains a Reference leaf no handler covers.
    let program = example_program();
    let mut collector = LiteralCollector { values: Vec::new() };
    assert_eq!(
        program.traverse(&mut collector),
        Err(VisitError::UnhandledKind { kind: "Reference" })
    );
}

/// Counts node visits during traversal, treating leaves as handled.
struct VisitCounter {
    variables: usize,
    references: usize,
    literals: usize,
}

impl RecursiveVisitor for VisitCounter {
    fn visit_node(&mut self, _node: &dyn TreeNode) -> Result<(), VisitError> {
        Ok(())
    }

    fn visit_variable(&mut self, node: &Variable) -> Result<(), VisitError> {
        self.variables += 1;
        lattice_ast::walk_variable(self, node)
    }

    fn visit_reference(&mut self, _node: &Reference) -> Result<(), VisitError> {
        self.references += 1;
        Ok(())
    }

    fn visit_literal(&mut self, _node: &Literal) -> Result<(), VisitError> {
        self.literals += 1;
        Ok(())
    }
}

#[test]
fn test_recursive_visitor_ignores_links() {
    let mut program = Program::default();
    program.declare("x");
    program.push_statement(Statement::Assignment(lattice_ast::Assignment::of(
        Reference::named("x"),
        Literal::of(2),
    )));
    lattice_ast::resolve_references(&mut program);

    let mut counter = VisitCounter {
        variables: 0,
        references: 0,
        literals: 0,
    };
    program.traverse(&mut counter).expect("all kinds handled");
    // The resolved link back to the variable is not followed, so the
    // variable is visited exactly once.
    assert_eq!(counter.variables, 1);
    assert_eq!(counter.references, 1);
    assert_eq!(counter.literals, 1);
}
