//! Binary operators: the precedence table, constant folding and emission.

use ember_diagnostic::ErrorCode;
use ember_ir::{Span, TokenKind};

use super::{Literal, Operand};
use crate::backend::{Backend, BinaryOp, FloatPredicate, IntPredicate, IrType};
use crate::{CompileError, Parser, VariableType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOperator {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    BitAnd,
    BitXor,
    BitOr,
}

impl BinaryOperator {
    pub(crate) fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Rem => 11,
            BinaryOperator::Add | BinaryOperator::Sub => 10,
            BinaryOperator::Shl | BinaryOperator::Shr => 9,
            BinaryOperator::Lt | BinaryOperator::Gt | BinaryOperator::LtEq | BinaryOperator::GtEq => {
                8
            }
            BinaryOperator::Eq | BinaryOperator::NotEq => 7,
            BinaryOperator::BitAnd => 6,
            BinaryOperator::BitXor => 5,
            BinaryOperator::BitOr => 4,
        }
    }

    pub(crate) fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Shr => ">>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitOr => "|",
        }
    }

    pub(crate) fn is_comparison(self) -> bool {
        self.is_equality() || self.is_relational()
    }

    fn is_equality(self) -> bool {
        matches!(self, BinaryOperator::Eq | BinaryOperator::NotEq)
    }

    fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOperator::Lt | BinaryOperator::Gt | BinaryOperator::LtEq | BinaryOperator::GtEq
        )
    }

    /// Whether the operator is defined on operands of type `ty`.
    pub(crate) fn applies_to(self, ty: VariableType) -> bool {
        match self {
            BinaryOperator::Add
            | BinaryOperator::Sub
            | BinaryOperator::Mul
            | BinaryOperator::Div
            | BinaryOperator::Rem => ty.is_integer() || ty.is_float(),
            BinaryOperator::BitAnd | BinaryOperator::BitOr | BinaryOperator::BitXor => {
                ty.is_integer() || ty == VariableType::Bool
            }
            BinaryOperator::Shl | BinaryOperator::Shr => ty.is_integer(),
            BinaryOperator::Eq | BinaryOperator::NotEq => ty.is_scalar(),
            BinaryOperator::Lt | BinaryOperator::Gt | BinaryOperator::LtEq | BinaryOperator::GtEq => {
                ty.is_integer() || ty.is_float() || ty == VariableType::Char
            }
        }
    }

    /// Name hint for the emitted instruction.
    fn value_name(self) -> &'static str {
        match self {
            BinaryOperator::Mul => "mul",
            BinaryOperator::Div => "div",
            BinaryOperator::Rem => "rem",
            BinaryOperator::Add => "add",
            BinaryOperator::Sub => "sub",
            BinaryOperator::Shl => "shl",
            BinaryOperator::Shr => "shr",
            BinaryOperator::BitAnd => "and",
            BinaryOperator::BitXor => "xor",
            BinaryOperator::BitOr => "or",
            _ => "cmp",
        }
    }
}

/// Anything that can follow an operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operator {
    Binary(BinaryOperator),
    /// `=` or a compound assignment such as `+=`.
    Assign(Option<BinaryOperator>),
    /// Postfix `~~`.
    ComplementAssign,
}

impl Operator {
    pub(crate) fn from_token(kind: &TokenKind) -> Option<Self> {
        use BinaryOperator as B;
        let op = match kind {
            TokenKind::Star => Operator::Binary(B::Mul),
            TokenKind::Slash => Operator::Binary(B::Div),
            TokenKind::Percent => Operator::Binary(B::Rem),
            TokenKind::Plus => Operator::Binary(B::Add),
            TokenKind::Minus => Operator::Binary(B::Sub),
            TokenKind::Shl => Operator::Binary(B::Shl),
            TokenKind::Shr => Operator::Binary(B::Shr),
            TokenKind::Lt => Operator::Binary(B::Lt),
            TokenKind::Gt => Operator::Binary(B::Gt),
            TokenKind::LtEq => Operator::Binary(B::LtEq),
            TokenKind::GtEq => Operator::Binary(B::GtEq),
            TokenKind::EqEq => Operator::Binary(B::Eq),
            TokenKind::NotEq => Operator::Binary(B::NotEq),
            TokenKind::Amp => Operator::Binary(B::BitAnd),
            TokenKind::Caret => Operator::Binary(B::BitXor),
            TokenKind::Pipe => Operator::Binary(B::BitOr),
            TokenKind::Eq => Operator::Assign(None),
            TokenKind::PlusEq => Operator::Assign(Some(B::Add)),
            TokenKind::MinusEq => Operator::Assign(Some(B::Sub)),
            TokenKind::StarEq => Operator::Assign(Some(B::Mul)),
            TokenKind::SlashEq => Operator::Assign(Some(B::Div)),
            TokenKind::PercentEq => Operator::Assign(Some(B::Rem)),
            TokenKind::AmpEq => Operator::Assign(Some(B::BitAnd)),
            TokenKind::PipeEq => Operator::Assign(Some(B::BitOr)),
            TokenKind::CaretEq => Operator::Assign(Some(B::BitXor)),
            TokenKind::ShlEq => Operator::Assign(Some(B::Shl)),
            TokenKind::ShrEq => Operator::Assign(Some(B::Shr)),
            TokenKind::TildeTilde => Operator::ComplementAssign,
            _ => return None,
        };
        Some(op)
    }

    pub(crate) fn precedence(self) -> u8 {
        match self {
            Operator::Binary(op) => op.precedence(),
            Operator::Assign(_) | Operator::ComplementAssign => 1,
        }
    }
}

impl<B: Backend> Parser<'_, '_, B> {
    /// Apply a binary operator, folding when both sides are literals.
    pub(crate) fn emit_binary(
        &mut self,
        op: BinaryOperator,
        (lhs, lhs_span): (Operand<B::Value>, Span),
        (rhs, rhs_span): (Operand<B::Value>, Span),
        op_span: Span,
    ) -> Result<Operand<B::Value>, CompileError> {
        if let (Operand::Literal(a), Operand::Literal(b)) = (lhs, rhs) {
            return fold(op, a, b, lhs_span.merge(rhs_span)).map(Operand::Literal);
        }

        let ty = match (self.operand_type(lhs), self.operand_type(rhs)) {
            (VariableType::None, ty) | (ty, VariableType::None) => ty,
            (left, right) if left == right => left,
            (left, right) => return Err(self.mismatch(left, right, rhs_span)),
        };
        // A literal of the wrong kind is a mismatch even where the operator
        // would not apply to the typed side.
        for (operand, span) in [(lhs, lhs_span), (rhs, rhs_span)] {
            if let Operand::Literal(literal) = operand {
                if !literal.accepts(ty) {
                    return Err(self.literal_mismatch(literal, ty, span));
                }
            }
        }
        if !op.applies_to(ty) {
            return Err(self.not_applicable(op.symbol(), ty, op_span));
        }
        if matches!(op, BinaryOperator::Div | BinaryOperator::Rem)
            && ty.is_integer()
            && rhs == Operand::Literal(Literal::Int(0))
        {
            return Err(division_by_zero(rhs_span));
        }

        let l = self.coerce(lhs, lhs_span, ty)?;
        let r = self.coerce(rhs, rhs_span, ty)?;
        let value = self.emit_typed(op, ty, l, r);
        let result_ty = if op.is_comparison() {
            VariableType::Bool
        } else {
            ty
        };
        Ok(Operand::Value {
            value,
            ty: result_ty,
        })
    }

    /// Emit `op` on two values of type `ty`.
    fn emit_typed(
        &mut self,
        op: BinaryOperator,
        ty: VariableType,
        l: B::Value,
        r: B::Value,
    ) -> B::Value {
        use BinaryOperator as Op;
        let name = op.value_name();
        let b = &mut *self.builder;
        if ty.is_float() {
            let pred = match op {
                Op::Add => return b.binary(BinaryOp::FAdd, l, r, name),
                Op::Sub => return b.binary(BinaryOp::FSub, l, r, name),
                Op::Mul => return b.binary(BinaryOp::FMul, l, r, name),
                Op::Div => return b.binary(BinaryOp::FDiv, l, r, name),
                Op::Rem => return b.binary(BinaryOp::FRem, l, r, name),
                Op::Eq => FloatPredicate::Oeq,
                Op::NotEq => FloatPredicate::One,
                Op::Lt => FloatPredicate::Olt,
                Op::Gt => FloatPredicate::Ogt,
                Op::LtEq => FloatPredicate::Ole,
                Op::GtEq => FloatPredicate::Oge,
                // Rejected by `applies_to`.
                Op::Shl | Op::Shr | Op::BitAnd | Op::BitOr | Op::BitXor => {
                    return b.const_zero(ty.ir_type().unwrap_or(IrType::Double));
                }
            };
            return b.fcmp(pred, l, r, name);
        }
        let unsigned = ty.is_unsigned_like();
        let pred = match op {
            Op::Eq => IntPredicate::Eq,
            Op::NotEq => IntPredicate::Ne,
            Op::Lt if unsigned => IntPredicate::Ult,
            Op::Lt => IntPredicate::Slt,
            Op::Gt if unsigned => IntPredicate::Ugt,
            Op::Gt => IntPredicate::Sgt,
            Op::LtEq if unsigned => IntPredicate::Ule,
            Op::LtEq => IntPredicate::Sle,
            Op::GtEq if unsigned => IntPredicate::Uge,
            Op::GtEq => IntPredicate::Sge,
            arithmetic => {
                let instruction = match arithmetic {
                    Op::Add => BinaryOp::Add,
                    Op::Sub => BinaryOp::Sub,
                    Op::Mul => BinaryOp::Mul,
                    Op::Div if unsigned => BinaryOp::UDiv,
                    Op::Div => BinaryOp::SDiv,
                    Op::Rem if unsigned => BinaryOp::URem,
                    Op::Rem => BinaryOp::SRem,
                    Op::Shl => BinaryOp::Shl,
                    Op::Shr if unsigned => BinaryOp::LShr,
                    Op::Shr => BinaryOp::AShr,
                    Op::BitAnd => BinaryOp::And,
                    Op::BitOr => BinaryOp::Or,
                    _ => BinaryOp::Xor,
                };
                return b.binary(instruction, l, r, name);
            }
        };
        b.icmp(pred, l, r, name)
    }

    /// `target = value` or `target op= value`; yields the stored value.
    pub(crate) fn emit_assignment(
        &mut self,
        compound: Option<BinaryOperator>,
        (target, target_span): (Operand<B::Value>, Span),
        (value, value_span): (Operand<B::Value>, Span),
        op_span: Span,
    ) -> Result<Operand<B::Value>, CompileError> {
        let Operand::Variable(var) = target else {
            return Err(not_assignable(target_span));
        };
        let ty = self.unit.variable(var).ty;
        let (ptr, _) = self.variable_storage(var)?;

        let stored = match compound {
            None => self.coerce(value, value_span, ty)?,
            Some(op) => {
                let result =
                    self.emit_binary(op, (target, target_span), (value, value_span), op_span)?;
                self.coerce(result, value_span, ty)?
            }
        };
        self.builder.store(stored, ptr);
        Ok(Operand::Value { value: stored, ty })
    }

    /// Postfix `x ~~`: `x = x ^ all_ones`.
    pub(crate) fn emit_complement_assign(
        &mut self,
        target: Operand<B::Value>,
        span: Span,
    ) -> Result<Operand<B::Value>, CompileError> {
        let Operand::Variable(var) = target else {
            return Err(not_assignable(span));
        };
        let ty = self.unit.variable(var).ty;
        if !(ty.is_integer() || ty == VariableType::Bool) {
            return Err(self.not_applicable("~~", ty, span));
        }
        let (ptr, ir) = self.variable_storage(var)?;
        let current = self.load_variable(var)?;
        let ones = self.builder.const_all_ones(ir);
        let flipped = self.builder.binary(BinaryOp::Xor, current, ones, "not");
        self.builder.store(flipped, ptr);
        Ok(Operand::Value { value: flipped, ty })
    }
}

/// Evaluate `a op b` at compile time.
fn fold(op: BinaryOperator, a: Literal, b: Literal, span: Span) -> Result<Literal, CompileError> {
    use BinaryOperator as B;
    let not_applicable = |lit: Literal| {
        CompileError::semantic(
            ErrorCode::E2002,
            format!("operator `{}` cannot be applied to a {}", op.symbol(), lit.describe()),
            span,
        )
    };
    let overflow = || {
        CompileError::semantic(
            ErrorCode::E2004,
            format!("constant `{}` overflows", op.symbol()),
            span,
        )
    };

    match (a, b) {
        (Literal::Int(x), Literal::Int(y)) => {
            let v = match op {
                B::Add => x.checked_add(y).ok_or_else(overflow)?,
                B::Sub => x.checked_sub(y).ok_or_else(overflow)?,
                B::Mul => x.checked_mul(y).ok_or_else(overflow)?,
                B::Div | B::Rem if y == 0 => return Err(division_by_zero(span)),
                B::Div => x.checked_div(y).ok_or_else(overflow)?,
                B::Rem => x.checked_rem(y).ok_or_else(overflow)?,
                B::Shl => {
                    let amount = shift_amount(y).ok_or_else(overflow)?;
                    if amount == 127 && x != 0 {
                        return Err(overflow());
                    }
                    x.checked_mul(1i128 << amount.min(126)).ok_or_else(overflow)?
                }
                B::Shr => x >> shift_amount(y).ok_or_else(overflow)?,
                B::BitAnd => x & y,
                B::BitOr => x | y,
                B::BitXor => x ^ y,
                _ => return Ok(Literal::Bool(compare(op, x.cmp(&y)))),
            };
            Ok(Literal::Int(v))
        }
        (Literal::Float(x), Literal::Float(y)) => {
            let v = match op {
                B::Add => x + y,
                B::Sub => x - y,
                B::Mul => x * y,
                B::Div => x / y,
                B::Rem => x % y,
                _ if op.is_comparison() => {
                    // Ordered comparison: anything involving NaN is false.
                    return Ok(Literal::Bool(
                        x.partial_cmp(&y).is_some_and(|ord| compare(op, ord)),
                    ));
                }
                _ => return Err(not_applicable(a)),
            };
            Ok(Literal::Float(v))
        }
        (Literal::Char(x), Literal::Char(y)) if op.is_comparison() => {
            Ok(Literal::Bool(compare(op, x.cmp(&y))))
        }
        (Literal::Bool(x), Literal::Bool(y)) => match op {
            B::BitAnd => Ok(Literal::Bool(x & y)),
            B::BitOr => Ok(Literal::Bool(x | y)),
            B::BitXor => Ok(Literal::Bool(x ^ y)),
            B::Eq => Ok(Literal::Bool(x == y)),
            B::NotEq => Ok(Literal::Bool(x != y)),
            _ => Err(not_applicable(a)),
        },
        (Literal::Char(_), Literal::Char(_)) => Err(not_applicable(a)),
        _ => Err(CompileError::semantic(
            ErrorCode::E2001,
            format!("mismatched types: {} and {}", a.describe(), b.describe()),
            span,
        )),
    }
}

fn shift_amount(y: i128) -> Option<u32> {
    u32::try_from(y).ok().filter(|&s| s < 128)
}

/// Outcome of a comparison operator given the ordering of its operands.
fn compare(op: BinaryOperator, ord: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering;
    match op {
        BinaryOperator::Eq => ord == Ordering::Equal,
        BinaryOperator::NotEq => ord != Ordering::Equal,
        BinaryOperator::Lt => ord == Ordering::Less,
        BinaryOperator::Gt => ord == Ordering::Greater,
        BinaryOperator::LtEq => ord != Ordering::Greater,
        BinaryOperator::GtEq => ord != Ordering::Less,
        _ => false,
    }
}

#[cold]
fn division_by_zero(span: Span) -> CompileError {
    CompileError::semantic(ErrorCode::E2005, "attempt to divide by zero", span)
}

#[cold]
fn not_assignable(span: Span) -> CompileError {
    CompileError::semantic(
        ErrorCode::E2003,
        "invalid left-hand side of assignment: expected a variable",
        span,
    )
}
