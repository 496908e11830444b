//! End to end tests for the Lattice tree runtime and AST crates.
