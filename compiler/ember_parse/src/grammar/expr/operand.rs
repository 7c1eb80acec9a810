//! Operands: names, literals, parentheses and prefix operators, plus the
//! conversions that turn an operand into a typed SSA value.

use ember_diagnostic::ErrorCode;
use ember_ir::{Span, TokenKind};

use super::{Literal, Operand};
use crate::backend::{sign_extend, width_mask, Backend, BinaryOp, Constant, IrType};
use crate::unit::VariableRef;
use crate::{CompileError, Parser, VariableType};

impl<B: Backend> Parser<'_, '_, B> {
    /// Parse one operand, including any prefix operators.
    pub(crate) fn parse_operand(&mut self) -> Result<(Operand<B::Value>, Span), CompileError> {
        let span = self.current_span();
        let literal = match *self.current_kind() {
            TokenKind::Int(v) => Literal::Int(i128::from(v)),
            TokenKind::Float(v) => Literal::Float(v),
            TokenKind::Char(c) => Literal::Char(c),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Ident(name) => {
                if self.peek_kind().same_kind(&TokenKind::LParen) {
                    return Err(self.call_error(name, span));
                }
                let Some(var) = self.unit.find_variable(self.function, self.scope, name) else {
                    return Err(CompileError::semantic(
                        ErrorCode::E2013,
                        format!("cannot find value `{}` in this scope", self.name_str(name)),
                        span,
                    ));
                };
                self.advance()?;
                return Ok((Operand::Variable(var), span));
            }
            TokenKind::LParen => {
                self.advance()?;
                let (inner, _) = ember_stack::ensure_sufficient_stack(|| {
                    self.parse_binary(&TokenKind::RParen, 0)
                })?;
                let close = self.expect(&TokenKind::RParen)?.span;
                return Ok((inner, span.merge(close)));
            }
            TokenKind::Minus => {
                self.advance()?;
                let (inner, inner_span) =
                    ember_stack::ensure_sufficient_stack(|| self.parse_operand())?;
                let span = span.merge(inner_span);
                return Ok((self.emit_negate(inner, span)?, span));
            }
            TokenKind::Tilde => {
                self.advance()?;
                let (inner, inner_span) =
                    ember_stack::ensure_sufficient_stack(|| self.parse_operand())?;
                let span = span.merge(inner_span);
                return Ok((self.emit_not(inner, span)?, span));
            }
            TokenKind::Str(_) => {
                return Err(CompileError::semantic(
                    ErrorCode::E2008,
                    "string literals cannot be used in expressions",
                    span,
                ));
            }
            _ => return Err(self.unexpected("an expression")),
        };
        self.advance()?;
        Ok((Operand::Literal(literal), span))
    }

    /// `name(...)`: calls are not compiled, but an unknown callee is reported
    /// as such first.
    #[cold]
    fn call_error(&self, name: ember_ir::Name, span: Span) -> CompileError {
        let text = self.name_str(name);
        if self.unit.find_function(name).is_some() {
            CompileError::semantic(
                ErrorCode::E2009,
                format!("cannot call `{text}`: function calls are not supported"),
                span,
            )
        } else {
            CompileError::semantic(
                ErrorCode::E2013,
                format!("cannot find function `{text}` in this scope"),
                span,
            )
        }
    }

    /// Type of an operand; `None` for a literal.
    pub(crate) fn operand_type(&self, operand: Operand<B::Value>) -> VariableType {
        match operand {
            Operand::Variable(var) => self.unit.variable(var).ty,
            Operand::Literal(_) => VariableType::None,
            Operand::Value { ty, .. } => ty,
        }
    }

    /// Produce the value of `operand` as type `ty`.
    ///
    /// Literals are converted (and range checked); typed operands must
    /// already have type `ty`. `None` accepts any type and gives literals
    /// their default type.
    pub(crate) fn coerce(
        &mut self,
        operand: Operand<B::Value>,
        span: Span,
        ty: VariableType,
    ) -> Result<B::Value, CompileError> {
        match operand {
            Operand::Literal(literal) => {
                let target = if ty == VariableType::None {
                    literal.default_type()
                } else {
                    ty
                };
                let constant = self.literal_constant(literal, target, span)?;
                Ok(self.emit_constant(target, constant))
            }
            Operand::Variable(_) | Operand::Value { .. } => {
                let actual = self.operand_type(operand);
                if ty != VariableType::None && actual != ty {
                    return Err(self.mismatch(ty, actual, span));
                }
                self.operand_value(operand)
            }
        }
    }

    /// Value of a typed operand, loading variables.
    fn operand_value(&mut self, operand: Operand<B::Value>) -> Result<B::Value, CompileError> {
        match operand {
            Operand::Variable(var) => self.load_variable(var),
            Operand::Value { value, .. } => Ok(value),
            Operand::Literal(literal) => {
                let ty = literal.default_type();
                let constant = self.literal_constant(literal, ty, Span::DUMMY)?;
                Ok(self.emit_constant(ty, constant))
            }
        }
    }

    /// Load a variable's current value; the load is named `<name>_ssa`.
    pub(crate) fn load_variable(&mut self, var: VariableRef) -> Result<B::Value, CompileError> {
        let (ptr, ir) = self.variable_storage(var)?;
        let name = format!("{}_ssa", self.name_str(self.unit.variable(var).name));
        Ok(self.builder.load(ir, ptr, &name))
    }

    /// Storage pointer and backend type of a variable.
    pub(crate) fn variable_storage(
        &self,
        var: VariableRef,
    ) -> Result<(B::Value, IrType), CompileError> {
        let variable = self.unit.variable(var);
        match (variable.storage, variable.ty.ir_type()) {
            (Some(ptr), Some(ir)) => Ok((ptr, ir)),
            _ => Err(CompileError::backend(format!(
                "variable `{}` has no storage",
                self.name_str(variable.name)
            ))),
        }
    }

    /// The constant for `literal` as a value of type `ty`.
    pub(crate) fn literal_constant(
        &self,
        literal: Literal,
        ty: VariableType,
        span: Span,
    ) -> Result<Constant, CompileError> {
        match (literal, ty) {
            (Literal::Int(v), VariableType::Int(width)) => {
                if fits_signed(v, width) {
                    Ok(Constant::Int(int_bits(v, width)))
                } else {
                    Err(out_of_range(v, ty, span))
                }
            }
            (Literal::Int(v), VariableType::Unsigned(width)) => {
                if fits_unsigned(v, width) {
                    Ok(Constant::Int(int_bits(v, width)))
                } else {
                    Err(out_of_range(v, ty, span))
                }
            }
            (Literal::Float(v), VariableType::Float(32)) => {
                #[expect(clippy::cast_possible_truncation, reason = "rounding to single precision")]
                let single = v as f32;
                Ok(Constant::Float(f64::from(single)))
            }
            (Literal::Float(v), VariableType::Float(_)) => Ok(Constant::Float(v)),
            (Literal::Char(c), VariableType::Char) => Ok(Constant::Int(u128::from(u32::from(c)))),
            (Literal::Bool(b), VariableType::Bool) => Ok(Constant::Int(u128::from(b))),
            _ => Err(self.literal_mismatch(literal, ty, span)),
        }
    }

    /// Emit a constant of a scalar type.
    pub(crate) fn emit_constant(&mut self, ty: VariableType, constant: Constant) -> B::Value {
        let ir = ty.ir_type().unwrap_or(IrType::I64);
        match (constant, ir) {
            (Constant::Float(v), _) => self.builder.const_float(ir, v),
            (Constant::Int(bits), IrType::Int(width)) => {
                self.builder.const_int(ir, sign_extend(bits, width))
            }
            (Constant::Int(_), _) => self.builder.const_zero(ir),
        }
    }

    /// `-literal`, folded.
    pub(crate) fn negate_literal(&self, literal: Literal, span: Span) -> Result<Literal, CompileError> {
        match literal {
            Literal::Int(v) => v.checked_neg().map(Literal::Int).ok_or_else(|| {
                CompileError::semantic(
                    ErrorCode::E2004,
                    "negation overflows the constant range",
                    span,
                )
            }),
            Literal::Float(v) => Ok(Literal::Float(-v)),
            Literal::Char(_) | Literal::Bool(_) => Err(CompileError::semantic(
                ErrorCode::E2002,
                format!("cannot apply unary `-` to a {}", literal.describe()),
                span,
            )),
        }
    }

    fn emit_negate(
        &mut self,
        operand: Operand<B::Value>,
        span: Span,
    ) -> Result<Operand<B::Value>, CompileError> {
        if let Operand::Literal(literal) = operand {
            return self.negate_literal(literal, span).map(Operand::Literal);
        }
        let ty = self.operand_type(operand);
        let value = self.operand_value(operand)?;
        let result = if ty.is_integer() {
            let zero = self.emit_constant(ty, Constant::Int(0));
            self.builder.binary(BinaryOp::Sub, zero, value, "neg")
        } else if ty.is_float() {
            let ir = ty.ir_type().unwrap_or(IrType::Double);
            let negative_zero = self.builder.const_float(ir, -0.0);
            self.builder
                .binary(BinaryOp::FSub, negative_zero, value, "neg")
        } else {
            return Err(self.not_applicable("-", ty, span));
        };
        Ok(Operand::Value { value: result, ty })
    }

    fn emit_not(
        &mut self,
        operand: Operand<B::Value>,
        span: Span,
    ) -> Result<Operand<B::Value>, CompileError> {
        match operand {
            Operand::Literal(Literal::Int(v)) => return Ok(Operand::Literal(Literal::Int(!v))),
            Operand::Literal(Literal::Bool(b)) => return Ok(Operand::Literal(Literal::Bool(!b))),
            Operand::Literal(literal) => {
                return Err(CompileError::semantic(
                    ErrorCode::E2002,
                    format!("cannot apply unary `~` to a {}", literal.describe()),
                    span,
                ));
            }
            Operand::Variable(_) | Operand::Value { .. } => {}
        }
        let ty = self.operand_type(operand);
        if !(ty.is_integer() || ty == VariableType::Bool) {
            return Err(self.not_applicable("~", ty, span));
        }
        let value = self.operand_value(operand)?;
        let ir = ty.ir_type().unwrap_or(IrType::I64);
        let ones = self.builder.const_all_ones(ir);
        let result = self.builder.binary(BinaryOp::Xor, value, ones, "not");
        Ok(Operand::Value { value: result, ty })
    }

    #[cold]
    pub(crate) fn mismatch(
        &self,
        expected: VariableType,
        found: VariableType,
        span: Span,
    ) -> CompileError {
        CompileError::semantic(
            ErrorCode::E2001,
            format!(
                "mismatched types: expected `{}`, found `{}`",
                self.type_name(expected),
                self.type_name(found)
            ),
            span,
        )
    }

    #[cold]
    pub(crate) fn literal_mismatch(
        &self,
        literal: Literal,
        expected: VariableType,
        span: Span,
    ) -> CompileError {
        CompileError::semantic(
            ErrorCode::E2001,
            format!(
                "mismatched types: expected `{}`, found {}",
                self.type_name(expected),
                literal.describe()
            ),
            span,
        )
    }

    #[cold]
    pub(crate) fn not_applicable(&self, op: &str, ty: VariableType, span: Span) -> CompileError {
        CompileError::semantic(
            ErrorCode::E2002,
            format!("operator `{op}` cannot be applied to `{}`", self.type_name(ty)),
            span,
        )
    }
}

fn fits_signed(v: i128, width: u32) -> bool {
    if width >= 128 {
        return true;
    }
    let half = 1i128 << (width - 1);
    (-half..half).contains(&v)
}

fn fits_unsigned(v: i128, width: u32) -> bool {
    v >= 0 && (width >= 127 || v < (1i128 << width))
}

/// Two's complement bits of `v` truncated to `width`.
fn int_bits(v: i128, width: u32) -> u128 {
    u128::from_ne_bytes(v.to_ne_bytes()) & width_mask(width)
}

#[cold]
fn out_of_range(v: i128, ty: VariableType, span: Span) -> CompileError {
    CompileError::semantic(
        ErrorCode::E2004,
        format!("literal `{v}` does not fit in `{ty}`"),
        span,
    )
}
