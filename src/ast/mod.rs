//! The abstract syntax tree produced by the parser.
//!
//! A closed sum of statement and expression variants — no untagged nodes,
//! so an unhandled case is a compile-time exhaustiveness error rather than
//! a runtime "unknown node kind" check.
mod expression;
mod modifiers;
mod statement;
mod type_name;

pub use expression::*;
pub use modifiers::*;
pub use statement::*;
pub use type_name::*;

/// A full program: the statements at the top level of a single source unit.
pub type Program = Vec<Statement>;
