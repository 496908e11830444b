//! Human-readable debug dump.
//!
//! Renders a tree as indented text, one field per line, for diagnostics
//! and golden tests. Annotations with a registered display form show up
//! as `#`-suffixes on the node header, so a dump of a located tree reads
//! like:
//!
//! ```text
//! Literal( # test:1:5
//!   value: 2
//! )
//! ```
//!
//! Nodes marked erroneous carry an `# error` suffix. Unbound edges and
//! unresolved links render as `!MISSING`; resolved links render as
//! `-> n<id>` without recursing, since the target is owned elsewhere in
//! the tree.

use std::fmt::Display;

use crate::json::MISSING;
use crate::node::{NodeId, TreeNode};
use crate::serdes::SerdesRegistry;

const INDENT: &str = "  ";

/// Renders `node` and its owned closure as indented debug text.
#[must_use]
pub fn dump(node: &dyn TreeNode, registry: &SerdesRegistry) -> String {
    let mut dumper = Dumper {
        out: String::new(),
        indent: 0,
        registry,
    };
    dumper.write_indent();
    dumper.open(node);
    dumper.out
}

/// Line-oriented writer the field renderers append to.
pub struct Dumper<'a> {
    out: String,
    indent: usize,
    registry: &'a SerdesRegistry,
}

impl Dumper<'_> {
    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    /// Writes a node header, its fields one level deeper, and the closing
    /// parenthesis. The caller has already written the indent (and, for
    /// named edges, the `name: ` prefix).
    fn open(&mut self, node: &dyn TreeNode) {
        self.out.push_str(node.kind_name());
        self.out.push('(');
        let data = node.data();
        if data.erroneous {
            self.out.push_str(" # error");
        }
        for entry in self.registry.iter() {
            let Some(display) = &entry.display else {
                continue;
            };
            if let Some(value) = data.annotations.get_raw(entry.type_id) {
                if let Some(text) = display(value.as_ref()) {
                    self.out.push_str(" # ");
                    self.out.push_str(&text);
                }
            }
        }
        self.out.push('\n');
        self.indent += 1;
        for (name, field) in node.fields() {
            field.dump(name, self);
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push_str(")\n");
    }

    pub(crate) fn child(&mut self, name: &'static str, node: &dyn TreeNode) {
        self.write_indent();
        self.out.push_str(name);
        self.out.push_str(": ");
        self.open(node);
    }

    pub(crate) fn missing(&mut self, name: &'static str) {
        self.write_indent();
        self.out.push_str(name);
        self.out.push_str(": ");
        self.out.push_str(MISSING);
        self.out.push('\n');
    }

    pub(crate) fn scalar(&mut self, name: &'static str, value: &dyn Display) {
        self.write_indent();
        self.out.push_str(name);
        self.out.push_str(": ");
        self.out.push_str(&value.to_string());
        self.out.push('\n');
    }

    pub(crate) fn sequence<'n>(
        &mut self,
        name: &'static str,
        children: impl Iterator<Item = &'n dyn TreeNode>,
    ) {
        let mut children = children.peekable();
        self.write_indent();
        self.out.push_str(name);
        if children.peek().is_none() {
            self.out.push_str(": []\n");
            return;
        }
        self.out.push_str(": [\n");
        self.indent += 1;
        for child in children {
            self.write_indent();
            self.open(child);
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push_str("]\n");
    }

    pub(crate) fn link(&mut self, name: &'static str, target: Option<NodeId>) {
        self.write_indent();
        self.out.push_str(name);
        self.out.push_str(": ");
        match target {
            Some(target) => {
                self.out.push_str("-> ");
                self.out.push_str(&target.to_string());
            }
            None => self.out.push_str(MISSING),
        }
        self.out.push('\n');
    }
}
