//! Compact JSON dump.
//!
//! A machine-readable rendering of a tree for tooling and golden tests,
//! written directly without an intermediate document. Every node becomes
//! a single-key object `{"Kind": {...fields...}}`; scalar fields render
//! as strings in their display form, empty sequences render as the
//! literal string `"[]"`, and unbound edges and unresolved links render
//! as [`MISSING`]. Annotations with a registered display form are
//! appended to the field object under their registered tag.
//!
//! This dump is one-way: the binary codec is the round-trip format.

use crate::node::TreeNode;
use crate::serdes::SerdesRegistry;

/// Placeholder for an unbound edge or unresolved link.
pub const MISSING: &str = "!MISSING";

/// Renders `node` and its owned closure as a compact JSON document.
#[must_use]
pub fn to_json(node: &dyn TreeNode, registry: &SerdesRegistry) -> String {
    let mut out = String::new();
    write_node(&mut out, node, registry);
    out
}

pub(crate) fn write_node(out: &mut String, node: &dyn TreeNode, registry: &SerdesRegistry) {
    out.push('{');
    write_str(out, node.kind_name());
    out.push_str(":{");
    let mut first = true;
    for (name, field) in node.fields() {
        if !first {
            out.push(',');
        }
        first = false;
        write_str(out, name);
        out.push(':');
        field.dump_json(out, registry);
    }
    let data = node.data();
    for entry in registry.iter() {
        let Some(display) = &entry.display else {
            continue;
        };
        if let Some(value) = data.annotations.get_raw(entry.type_id) {
            if let Some(text) = display(value.as_ref()) {
                if !first {
                    out.push(',');
                }
                first = false;
                write_str(out, &entry.tag);
                out.push(':');
                write_str(out, &text);
            }
        }
    }
    out.push_str("}}");
}

/// Writes `text` as a JSON string literal, escaping as needed.
pub(crate) fn write_str(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if (ch as u32) < 0x20 => {
                out.push_str("\\u");
                let code = ch as u32;
                for shift in [12u32, 8, 4, 0] {
                    let digit = (code >> shift) & 0xf;
                    out.push(char::from_digit(digit, 16).unwrap_or('0'));
                }
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
}
