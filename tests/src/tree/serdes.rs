use std::fmt;

use serde::{Deserialize, Serialize};

use lattice_ast::Literal;
use lattice_tree::{FormatError, SerdesRegistry, SourceLocation, deserialize, serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Cost(u32);

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cost={}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Depth(u8);

#[test]
fn test_registration_is_queryable() {
    let mut registry = SerdesRegistry::new();
    assert!(!registry.is_registered::<Cost>());
    registry.register::<Cost>("cost");
    assert!(registry.is_registered::<Cost>());
    assert_eq!(registry.tag_of::<Cost>(), Some("cost"));
    assert_eq!(registry.tag_of::<SourceLocation>(), None);
}

#[test]
fn test_reregistration_replaces_the_previous_tag() {
    let mut registry = SerdesRegistry::new();
    registry.register::<Cost>("cost");
    registry.register::<Cost>("weight");
    assert_eq!(registry.tag_of::<Cost>(), Some("weight"));
}

#[test]
fn test_reregistration_steals_a_tag_from_another_type() {
    let mut registry = SerdesRegistry::new();
    registry.register::<Cost>("meta");
    registry.register::<SourceLocation>("meta");
    assert!(!registry.is_registered::<Cost>());
    assert_eq!(registry.tag_of::<SourceLocation>(), Some("meta"));
}

#[test]
fn test_register_with_custom_codec_round_trips() {
    let mut registry = SerdesRegistry::new();
    registry.register_with::<Depth, _, _>(
        "depth",
        |depth| Ok(vec![depth.0]),
        |bytes| match bytes {
            [depth] => Ok(Depth(*depth)),
            _ => Err(FormatError::Annotation {
                tag: "depth".to_string(),
                reason: "expected exactly one byte".to_string(),
            }),
        },
    );

    let mut node = Literal::of(3);
    node.data.set_annotation(Depth(4));
    let bytes = serialize(&node, &registry).expect("encodes");
    let decoded: Literal = deserialize(&bytes, &registry).expect("decodes");
    assert_eq!(decoded.data.get_annotation::<Depth>(), Some(&Depth(4)));
}

#[test]
fn test_annotations_without_serdes_are_local_only() {
    let mut node = Literal::of(3);
    node.data.set_annotation(Depth(1));
    assert!(node.data.annotations.has::<Depth>());
    assert_eq!(node.data.annotations.len(), 1);
    assert!(node.data.annotations.erase::<Depth>());
    assert!(!node.data.annotations.erase::<Depth>());
    assert!(node.data.annotations.is_empty());
}

#[test]
fn test_set_replaces_an_existing_annotation() {
    let mut node = Literal::of(3);
    node.data.set_annotation(Depth(1));
    node.data.set_annotation(Depth(2));
    assert_eq!(node.data.get_annotation::<Depth>(), Some(&Depth(2)));
}
