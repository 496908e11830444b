//! Reference resolution.
//!
//! Points every [`Reference`]'s `target` link at the program variable
//! with the matching name. References to undeclared names are left
//! unresolved rather than failing; later passes decide whether that is a
//! diagnostic. Re-running the pass is fine, links are simply rebound.

use rustc_hash::FxHashMap;
use tracing::debug;

use lattice_tree::NodeId;

use crate::nodes::{Binary, Program, Reference, Rvalue, Statement};

/// Resolves all reference links in `program` against its declared
/// variables. Returns the number of references left unresolved.
pub fn resolve_references(program: &mut Program) -> usize {
    let mut variables = FxHashMap::default();
    for variable in &program.variables {
        // Later declarations shadow earlier ones of the same name.
        variables.insert(variable.name.clone(), variable.data.id);
    }
    let mut unresolved = 0;
    for variable in program.variables.iter_mut() {
        if let Some(init) = variable.init.get_mut() {
            resolve_rvalue(init, &variables, &mut unresolved);
        }
    }
    for statement in program.statements.iter_mut() {
        match statement {
            Statement::Assignment(node) => {
                if let Some(lhs) = node.lhs.get_mut() {
                    resolve_reference(lhs, &variables, &mut unresolved);
                }
                if let Some(rhs) = node.rhs.get_mut() {
                    resolve_rvalue(rhs, &variables, &mut unresolved);
                }
            }
            Statement::Print(node) => {
                if let Some(value) = node.value.get_mut() {
                    resolve_rvalue(value, &variables, &mut unresolved);
                }
            }
            Statement::Erroneous(_) => {}
        }
    }
    unresolved
}

fn resolve_rvalue(node: &mut Rvalue, variables: &FxHashMap<String, NodeId>, unresolved: &mut usize) {
    match node {
        Rvalue::Reference(node) => resolve_reference(node, variables, unresolved),
        Rvalue::Negate(node) => {
            if let Some(operand) = node.operand.get_mut() {
                resolve_rvalue(operand, variables, unresolved);
            }
        }
        Rvalue::Binary(node) => {
            let (lhs, rhs) = match node {
                Binary::Add(node) => (&mut node.lhs, &mut node.rhs),
                Binary::Sub(node) => (&mut node.lhs, &mut node.rhs),
                Binary::Mul(node) => (&mut node.lhs, &mut node.rhs),
                Binary::Div(node) => (&mut node.lhs, &mut node.rhs),
            };
            if let Some(lhs) = lhs.get_mut() {
                resolve_rvalue(lhs, variables, unresolved);
            }
            if let Some(rhs) = rhs.get_mut() {
                resolve_rvalue(rhs, variables, unresolved);
            }
        }
        Rvalue::Literal(_) | Rvalue::Erroneous(_) => {}
    }
}

fn resolve_reference(
    node: &mut Reference,
    variables: &FxHashMap<String, NodeId>,
    unresolved: &mut usize,
) {
    match variables.get(&node.name) {
        Some(target) => node.target.resolve(*target),
        None => {
            debug!(name = %node.name, node = %node.data.id, "reference to undeclared variable");
            node.target.clear();
            *unresolved += 1;
        }
    }
}
