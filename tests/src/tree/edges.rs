use std::cell::Cell;
use std::rc::Rc;

use lattice_ast::{
    Add, Assignment, Literal, Mul, Program, Reference, Rvalue, Statement, Variable,
    resolve_references,
};
use lattice_tree::{Any, Link, Many, Maybe, One, SourceLocation, TreeNode};

use crate::utils::example_program;

struct DropCounter(Rc<Cell<usize>>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn test_one_rebind_drops_previous_child() {
    let drops = Rc::new(Cell::new(0));
    let mut edge = One::new(DropCounter(drops.clone()));
    edge.set(DropCounter(drops.clone()));
    assert_eq!(drops.get(), 1);
    edge.set(DropCounter(drops.clone()));
    assert_eq!(drops.get(), 2);
    drop(edge);
    assert_eq!(drops.get(), 3);
}

#[test]
fn test_dropping_an_edge_drops_its_closure() {
    let drops = Rc::new(Cell::new(0));
    let mut sequence = Many::new();
    sequence.append(DropCounter(drops.clone()));
    sequence.append(DropCounter(drops.clone()));
    assert_eq!(drops.get(), 0);
    drop(sequence);
    assert_eq!(drops.get(), 2);
}

#[test]
fn test_one_take_leaves_edge_unbound() {
    let mut edge = One::new(Literal::of(7));
    let child = edge.take().expect("child was bound");
    assert_eq!(child.value, 7);
    assert!(!edge.is_bound());
    assert!(edge.get().is_none());
}

#[test]
fn test_maybe_set_and_clear() {
    let mut edge = Maybe::empty();
    assert!(!edge.is_set());
    edge.set(Literal::of(1));
    assert!(edge.is_set());
    edge.clear();
    assert!(edge.get().is_none());
}

#[test]
fn test_sequences_preserve_append_order() {
    let mut edge = Any::new();
    edge.append(Literal::of(1));
    edge.append(Literal::of(2));
    edge.append_box(Box::new(Literal::of(3)));
    let values: Vec<i64> = edge.iter().map(|literal| literal.value).collect();
    assert_eq!(values, vec![1, 2, 3]);
    assert_eq!(edge.get(1).map(|literal| literal.value), Some(2));
}

#[test]
fn test_clone_is_structurally_equal_and_independent() {
    let original = example_program();
    let mut copy = original.clone();
    assert_eq!(original, copy);

    let Statement::Assignment(assignment) =
        copy.statements.iter_mut().next().expect("one statement")
    else {
        panic!("expected an assignment");
    };
    let Some(Rvalue::Literal(literal)) = assignment.rhs.get_mut() else {
        panic!("expected a literal rhs");
    };
    literal.value = 99;
    assert_ne!(original, copy);

    let Some(Statement::Assignment(assignment)) = original.statements.get(0) else {
        panic!("expected an assignment");
    };
    let Some(Rvalue::Literal(literal)) = assignment.rhs.get() else {
        panic!("expected a literal rhs");
    };
    assert_eq!(literal.value, 2);
}

#[test]
fn test_clone_assigns_fresh_identities() {
    let original = example_program();
    let copy = original.clone();
    assert_ne!(original.data.id, copy.data.id);
}

#[test]
fn test_clone_shares_annotation_values() {
    let original = example_program();
    let mut copy = original.clone();
    copy.data
        .set_annotation(SourceLocation::new("other", 9, 9));
    assert_eq!(
        original.data.source_location(),
        Some(&SourceLocation::new("test", 1, 1))
    );
    assert_eq!(
        copy.data.source_location(),
        Some(&SourceLocation::new("other", 9, 9))
    );
}

#[test]
fn test_equality_ignores_identity_and_annotations() {
    let mut lhs = Literal::of(5);
    let rhs = Literal::of(5);
    assert_ne!(lhs.data.id, rhs.data.id);
    lhs.data.set_annotation(SourceLocation::new("test", 3, 3));
    assert_eq!(lhs, rhs);
}

#[test]
fn test_equality_sees_the_erroneous_marker() {
    let lhs = Literal::of(5);
    let mut rhs = Literal::of(5);
    rhs.data.erroneous = true;
    assert_ne!(lhs, rhs);
}

#[test]
fn test_equality_compares_link_targets_by_identity() {
    let variable = Variable::new("x".to_string(), Maybe::empty());
    let unresolved = Reference::named("x");
    let mut resolved = Reference::named("x");
    resolved.target.resolve(variable.data.id);
    assert_ne!(unresolved, resolved);

    let mut other = Reference::named("x");
    other.target.resolve(variable.data.id);
    assert_eq!(resolved, other);
}

#[test]
fn test_links_are_copied_not_deep_cloned() {
    let variable = Variable::new("x".to_string(), Maybe::empty());
    let mut link: Link<Variable> = Link::unresolved();
    link.resolve(variable.data.id);
    let copy = link;
    assert_eq!(copy.target(), Some(variable.data.id));
    assert!(copy.is_resolved());
}

#[test]
fn test_cloned_tree_links_still_point_into_the_original() {
    let mut program = Program::default();
    program.declare("x");
    program.push_statement(Statement::Assignment(Assignment::of(
        Reference::named("x"),
        Literal::of(2),
    )));
    resolve_references(&mut program);

    let original_variable_id = program.variables.get(0).expect("declared").data.id;
    let copy = program.clone();
    let copied_variable_id = copy.variables.get(0).expect("declared").data.id;
    assert_ne!(original_variable_id, copied_variable_id);

    let Some(Statement::Assignment(assignment)) = copy.statements.get(0) else {
        panic!("expected an assignment");
    };
    let target = assignment
        .lhs
        .get()
        .expect("bound")
        .target
        .target()
        .expect("resolved");
    assert_eq!(target, original_variable_id);
}

#[test]
fn test_kind_names_come_from_the_schema() {
    let program = example_program();
    assert_eq!(program.kind_name(), "Program");
    let statement = program.statements.get(0).expect("one statement");
    assert_eq!(statement.kind_name(), "Assignment");
    let rvalue = Rvalue::from(Add::of(Literal::of(1), Mul::of(Literal::of(2), Literal::of(3))));
    assert_eq!(rvalue.kind_name(), "Add");
}

#[test]
fn test_fields_are_reported_in_declaration_order() {
    let program = example_program();
    let names: Vec<&str> = program.fields().iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["variables", "statements"]);
}
