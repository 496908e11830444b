use lattice_ast::{Literal, Program, Reference, Rvalue, Statement};
use lattice_tree::codec::{Value, from_bytes, to_bytes};
use lattice_tree::{
    FormatError, SerdesRegistry, SourceLocation, check_well_formed, deserialize, serialize,
};

use crate::utils::{example_program, located, location_registry};

#[test]
fn test_value_wire_round_trip() {
    let value = Value::Map(vec![
        ("kind".to_string(), Value::Str("example".to_string())),
        ("negative".to_string(), Value::Int(-42)),
        ("flag".to_string(), Value::Bool(true)),
        ("blob".to_string(), Value::Bytes(vec![0, 255, 7])),
        (
            "items".to_string(),
            Value::List(vec![Value::Null, Value::Int(1 << 40)]),
        ),
    ]);
    let bytes = to_bytes(&value).expect("encodes");
    assert_eq!(from_bytes(&bytes).expect("decodes"), value);
}

#[test]
fn test_truncated_input_is_rejected() {
    let bytes = to_bytes(&Value::Str("truncate me".to_string())).expect("encodes");
    let error = from_bytes(&bytes[..bytes.len() - 1]).expect_err("cut short");
    assert!(matches!(error, FormatError::Truncated));
}

#[test]
fn test_trailing_bytes_are_rejected() {
    let mut bytes = to_bytes(&Value::Int(7)).expect("encodes");
    bytes.push(0);
    let error = from_bytes(&bytes).expect_err("junk at the end");
    assert!(matches!(error, FormatError::TrailingBytes));
}

#[test]
fn test_invalid_tag_reports_its_offset() {
    let error = from_bytes(&[0x2a]).expect_err("not a value tag");
    assert!(matches!(
        error,
        FormatError::InvalidTag {
            tag: 0x2a,
            offset: 0
        }
    ));
}

#[test]
fn test_tree_round_trip_preserves_structure() {
    let original = example_program();
    let registry = location_registry();
    let bytes = serialize(&original, &registry).expect("serializes");
    let decoded: Program = deserialize(&bytes, &registry).expect("deserializes");
    assert_eq!(decoded, original);
    check_well_formed(&decoded).expect("round trip keeps the tree complete");
}

#[test]
fn test_round_trip_restores_registered_annotations() {
    let registry = location_registry();
    let node = located(Literal::of(2), 1, 5);
    let bytes = serialize(&node, &registry).expect("serializes");
    let decoded: Literal = deserialize(&bytes, &registry).expect("deserializes");
    assert_eq!(
        decoded.data.source_location(),
        Some(&SourceLocation::new("test", 1, 5))
    );
}

#[test]
fn test_unregistered_annotations_are_dropped_not_errors() {
    let registry = SerdesRegistry::new();
    let node = located(Literal::of(2), 1, 5);
    let bytes = serialize(&node, &registry).expect("serializes without the annotation");
    let decoded: Literal = deserialize(&bytes, &registry).expect("deserializes");
    assert_eq!(decoded.value, 2);
    assert_eq!(decoded.data.source_location(), None);
}

#[test]
fn test_unknown_tags_are_skipped_at_decode_time() {
    let write_registry = location_registry();
    let node = located(Literal::of(2), 1, 5);
    let bytes = serialize(&node, &write_registry).expect("serializes");

    let read_registry = SerdesRegistry::new();
    let decoded: Literal = deserialize(&bytes, &read_registry).expect("deserializes");
    assert_eq!(decoded.data.source_location(), None);
}

#[test]
fn test_unknown_kind_is_a_fatal_format_error() {
    let registry = SerdesRegistry::new();
    let bytes = serialize(&example_program(), &registry).expect("serializes");
    let error = deserialize::<Literal>(&bytes, &registry).expect_err("wrong schema");
    match error {
        FormatError::UnknownKind { kind } => assert_eq!(kind, "Program"),
        other => panic!("expected UnknownKind, got {other:?}"),
    }
}

#[test]
fn test_decoded_links_resolve_within_the_decoded_tree() {
    let mut program = Program::default();
    program.declare("x");
    program.push_statement(Statement::Assignment(lattice_ast::Assignment::of(
        Reference::named("x"),
        Literal::of(2),
    )));
    lattice_ast::resolve_references(&mut program);

    let registry = SerdesRegistry::new();
    let bytes = serialize(&program, &registry).expect("serializes");
    let decoded: Program = deserialize(&bytes, &registry).expect("deserializes");

    let variable_id = decoded.variables.get(0).expect("declared").data.id;
    let original_variable_id = program.variables.get(0).expect("declared").data.id;
    assert_ne!(variable_id, original_variable_id);

    let Some(Statement::Assignment(assignment)) = decoded.statements.get(0) else {
        panic!("expected an assignment");
    };
    let target = assignment
        .lhs
        .get()
        .expect("bound")
        .target
        .target()
        .expect("resolved");
    assert_eq!(target, variable_id);
}

#[test]
fn test_erroneous_marker_survives_the_round_trip() {
    let statement = lattice_ast::ErroneousStatement::default();
    let registry = SerdesRegistry::new();
    let bytes = serialize(&statement, &registry).expect("serializes");
    let decoded: lattice_ast::ErroneousStatement =
        deserialize(&bytes, &registry).expect("deserializes");
    assert!(decoded.data.erroneous);
    check_well_formed(&decoded).expect_err("still erroneous after the round trip");
}

#[test]
fn test_refinement_enums_decode_through_their_variants() {
    let rvalue = Rvalue::from(lattice_ast::Add::of(Literal::of(1), Literal::of(2)));
    let registry = SerdesRegistry::new();
    let bytes = serialize(&rvalue, &registry).expect("serializes");
    let decoded: Rvalue = deserialize(&bytes, &registry).expect("deserializes");
    assert_eq!(decoded, rvalue);
    assert!(matches!(
        decoded,
        Rvalue::Binary(lattice_ast::Binary::Add(_))
    ));
}

#[test]
fn test_missing_fields_decode_to_their_unset_state() {
    let map = Value::Map(vec![
        ("@kind".to_string(), Value::Str("Literal".to_string())),
        ("@id".to_string(), Value::Int(1)),
    ]);
    let bytes = to_bytes(&map).expect("encodes");
    let registry = SerdesRegistry::new();
    let decoded: Literal = deserialize(&bytes, &registry).expect("tolerant decode");
    assert_eq!(decoded.value, 0);
}

#[test]
fn test_error_recovery_kinds_decode_erroneous_without_the_marker() {
    // A hand-built map for an error-recovery kind, with no `@error`
    // entry. Such kinds are erroneous from birth, so decoding must not
    // produce a well-formed instance.
    let map = Value::Map(vec![(
        "@kind".to_string(),
        Value::Str("ErroneousStatement".to_string()),
    )]);
    let bytes = to_bytes(&map).expect("encodes");
    let registry = SerdesRegistry::new();
    let decoded: lattice_ast::ErroneousStatement =
        deserialize(&bytes, &registry).expect("tolerant decode");
    assert!(decoded.data.erroneous);
    check_well_formed(&decoded).expect_err("never well-formed");
}

#[test]
fn test_wrong_field_shape_is_rejected() {
    let map = Value::Map(vec![
        ("@kind".to_string(), Value::Str("Literal".to_string())),
        ("value".to_string(), Value::Str("not an int".to_string())),
    ]);
    let bytes = to_bytes(&map).expect("encodes");
    let registry = SerdesRegistry::new();
    let error = deserialize::<Literal>(&bytes, &registry).expect_err("shape mismatch");
    assert!(matches!(error, FormatError::UnexpectedValue { .. }));
}
