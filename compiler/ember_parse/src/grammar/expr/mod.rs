//! Expression parsing and emission.
//!
//! Precedence climbing over a flat operator table. Operands are emitted as
//! they are parsed, so the value of every sub-expression is already an SSA
//! value (or a constant not yet given a type) by the time its operator is
//! applied.
//!
//! # Typing
//!
//! Both operands of a binary operator must have the same type. Literals are
//! untyped until something constrains them: a literal next to a typed
//! operand takes that operand's type, and two literals are folded into a new
//! literal at compile time. A literal that is still untyped when its value is
//! needed gets its default type (`i64`, `f64`, `char` or `bool`).
//!
//! # Precedence
//!
//! | Level | Operators |
//! |-------|-----------|
//! | 12 | prefix `~`, prefix `-` |
//! | 11 | `*` `/` `%` |
//! | 10 | `+` `-` |
//! | 9 | `<<` `>>` |
//! | 8 | `<` `>` `<=` `>=` |
//! | 7 | `==` `!=` |
//! | 6 | `&` |
//! | 5 | `^` |
//! | 4 | `\|` |
//! | 1 | `=` and compound assignments, postfix `~~` |

mod operand;
mod operator;

use ember_ir::{Span, TokenKind};

use crate::backend::Backend;
use crate::unit::VariableRef;
use crate::{CompileError, Parser, VariableType};

use operator::Operator;

/// A constant whose type has not been decided yet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Literal {
    Int(i128),
    Float(f64),
    Char(char),
    Bool(bool),
}

impl Literal {
    /// Type given to the literal when nothing constrains it.
    pub fn default_type(self) -> VariableType {
        match self {
            Literal::Int(_) => VariableType::Int(64),
            Literal::Float(_) => VariableType::Float(64),
            Literal::Char(_) => VariableType::Char,
            Literal::Bool(_) => VariableType::Bool,
        }
    }

    /// Can this literal become a value of type `ty`?
    pub fn accepts(self, ty: VariableType) -> bool {
        match self {
            Literal::Int(_) => ty.is_integer(),
            Literal::Float(_) => ty.is_float(),
            Literal::Char(_) => ty == VariableType::Char,
            Literal::Bool(_) => ty == VariableType::Bool,
        }
    }

    pub(crate) fn describe(self) -> &'static str {
        match self {
            Literal::Int(_) => "integer literal",
            Literal::Float(_) => "floating literal",
            Literal::Char(_) => "character literal",
            Literal::Bool(_) => "boolean literal",
        }
    }
}

/// The result of parsing an operand or applying an operator.
///
/// `V` is the backend's value handle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand<V> {
    /// A named variable, not loaded until its value is needed.
    Variable(VariableRef),
    Literal(Literal),
    /// An emitted value.
    Value { value: V, ty: VariableType },
}

impl<B: Backend> Parser<'_, '_, B> {
    /// Parse an expression up to (not including) `terminator`.
    ///
    /// Operators binding looser than `min_precedence` end the expression as
    /// well. With an `expected` type other than `None`, the result is
    /// converted to (or checked against) that type and returned as a value.
    pub(crate) fn parse_expression(
        &mut self,
        terminator: &TokenKind,
        min_precedence: u8,
        expected: VariableType,
    ) -> Result<Operand<B::Value>, CompileError> {
        let (operand, span) = self.parse_binary(terminator, min_precedence)?;
        if expected == VariableType::None {
            return Ok(operand);
        }
        let value = self.coerce(operand, span, expected)?;
        Ok(Operand::Value {
            value,
            ty: expected,
        })
    }

    /// Parse a full expression whose value must have type `expected`.
    pub(crate) fn parse_value(
        &mut self,
        terminator: &TokenKind,
        expected: VariableType,
    ) -> Result<B::Value, CompileError> {
        let (operand, span) = self.parse_binary(terminator, 0)?;
        self.coerce(operand, span, expected)
    }

    /// Precedence climbing loop.
    fn parse_binary(
        &mut self,
        terminator: &TokenKind,
        min_precedence: u8,
    ) -> Result<(Operand<B::Value>, Span), CompileError> {
        let (mut left, mut span) = self.parse_operand()?;
        loop {
            if self.check(terminator) {
                break;
            }
            let Some(op) = Operator::from_token(self.current_kind()) else {
                return Err(self.unexpected(&format!("an operator or {terminator}")));
            };
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            let op_span = self.advance()?.span;

            match op {
                Operator::ComplementAssign => {
                    span = span.merge(op_span);
                    left = self.emit_complement_assign(left, span)?;
                }
                Operator::Binary(binary) => {
                    let (right, right_span) = ember_stack::ensure_sufficient_stack(|| {
                        self.parse_binary(terminator, precedence + 1)
                    })?;
                    let left_span = span;
                    span = span.merge(right_span);
                    left = self.emit_binary(
                        binary,
                        (left, left_span),
                        (right, right_span),
                        op_span,
                    )?;
                }
                Operator::Assign(compound) => {
                    // Right-associative: `a = b = c` is `a = (b = c)`.
                    let (right, right_span) = ember_stack::ensure_sufficient_stack(|| {
                        self.parse_binary(terminator, precedence)
                    })?;
                    let target_span = span;
                    span = span.merge(right_span);
                    left = self.emit_assignment(
                        compound,
                        (left, target_span),
                        (right, right_span),
                        op_span,
                    )?;
                }
            }
        }
        Ok((left, span))
    }
}
