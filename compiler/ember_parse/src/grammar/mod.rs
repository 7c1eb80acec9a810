//! Grammar modules.
//!
//! Each submodule extends [`Parser`](crate::Parser) with the methods for one
//! part of the language:
//! - `top_level`: the three passes over items
//! - `ty`: type spellings
//! - `stmt`: statements, blocks and function bodies
//! - `expr`: operands, operators and precedence climbing

mod expr;
mod stmt;
mod top_level;
mod ty;

pub use expr::{Literal, Operand};
