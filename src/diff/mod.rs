//! Symbol sequence diffing for morph transitions.

/// LCS edit scripts over symbol names.
pub mod symbols;
