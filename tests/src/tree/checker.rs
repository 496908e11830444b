use lattice_ast::{Assignment, ErroneousStatement, ErroneousValue, Program, Statement, Variable};
use lattice_tree::{Maybe, SourceLocation, Violation, check_well_formed};

use crate::utils::{example_program, located};

#[test]
fn test_example_program_is_well_formed() {
    let program = example_program();
    check_well_formed(&program).expect("example program is complete");
}

#[test]
fn test_erroneous_node_is_never_well_formed() {
    let statement = ErroneousStatement::default();
    let error = check_well_formed(&statement).expect_err("erroneous by construction");
    assert_eq!(error.kind, "ErroneousStatement");
    assert_eq!(error.reason, Violation::Erroneous);
    assert_eq!(error.location, None);
}

#[test]
fn test_erroneous_node_reports_its_location() {
    let value = located(ErroneousValue::default(), 2, 7);
    let error = check_well_formed(&value).expect_err("erroneous by construction");
    assert_eq!(error.location, Some(SourceLocation::new("test", 2, 7)));
    assert_eq!(
        error.to_string(),
        "node `ErroneousValue` at test:2:7 is not well-formed: node was produced by error recovery"
    );
}

#[test]
fn test_empty_many_edge_is_not_well_formed() {
    let program = Program::default();
    let error = check_well_formed(&program).expect_err("no statements");
    assert_eq!(error.kind, "Program");
    assert_eq!(
        error.reason,
        Violation::Empty {
            field: "statements"
        }
    );
}

#[test]
fn test_unbound_one_edge_is_not_well_formed() {
    let assignment = Assignment::default();
    let error = check_well_formed(&assignment).expect_err("nothing bound");
    assert_eq!(error.kind, "Assignment");
    assert_eq!(error.reason, Violation::Unbound { field: "lhs" });
}

#[test]
fn test_empty_maybe_edge_is_well_formed() {
    let variable = Variable::new("x".to_string(), Maybe::empty());
    check_well_formed(&variable).expect("unset initializer is fine");
}

#[test]
fn test_check_descends_into_children() {
    let mut program = example_program();
    program.push_statement(Statement::Assignment(Assignment::default()));
    let error = check_well_formed(&program).expect_err("second assignment incomplete");
    // Attributed to the offending child, not the root.
    assert_eq!(error.kind, "Assignment");
    assert_eq!(error.reason, Violation::Unbound { field: "lhs" });
}

#[test]
fn test_check_reports_the_first_violation_in_field_order() {
    let mut program = Program::default();
    program.variables.append(Variable::default());
    let error = check_well_formed(&program).expect_err("statements still empty");
    // `variables` is checked first and passes; `statements` fails.
    assert_eq!(
        error.reason,
        Violation::Empty {
            field: "statements"
        }
    );
}

#[test]
fn test_unresolved_links_do_not_fail_the_check() {
    // The example program's reference target is never resolved.
    let program = example_program();
    check_well_formed(&program).expect("links are outside the structural rule");
}
