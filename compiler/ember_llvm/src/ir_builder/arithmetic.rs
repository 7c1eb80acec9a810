//! Integer, float and bitwise arithmetic for `IrBuilder`.

use inkwell::values::BasicValueEnum;

use ember_parse::backend::BinaryOp;

use super::IrBuilder;
use crate::value_id::ValueId;

impl IrBuilder<'_, '_> {
    /// Build `lhs op rhs`.
    ///
    /// Defensive: operands of different types, or of the wrong family for
    /// `op`, record a codegen error and yield a zero of the left type.
    pub(crate) fn binary_impl(
        &mut self,
        op: BinaryOp,
        lhs: ValueId,
        rhs: ValueId,
        name: &str,
    ) -> ValueId {
        let l = self.arena.get_value(lhs);
        let r = self.arena.get_value(rhs);
        let family_ok = if op.is_float() {
            l.is_float_value() && r.is_float_value()
        } else {
            l.is_int_value() && r.is_int_value()
        };
        if !family_ok || l.get_type() != r.get_type() {
            tracing::error!(
                op = op.mnemonic(),
                lhs_type = ?l.get_type(),
                rhs_type = ?r.get_type(),
                "binary operation on mismatched operands"
            );
            self.record_codegen_error();
            return self.zero_value(l.get_type());
        }
        if !self.require_position(op.mnemonic()) {
            return self.zero_value(l.get_type());
        }

        let b = &self.builder;
        let v: BasicValueEnum<'_> = if op.is_float() {
            let (l, r) = (l.into_float_value(), r.into_float_value());
            let built = match op {
                BinaryOp::FAdd => b.build_float_add(l, r, name),
                BinaryOp::FSub => b.build_float_sub(l, r, name),
                BinaryOp::FMul => b.build_float_mul(l, r, name),
                BinaryOp::FDiv => b.build_float_div(l, r, name),
                _ => b.build_float_rem(l, r, name),
            };
            built.expect("float arithmetic").into()
        } else {
            let (l, r) = (l.into_int_value(), r.into_int_value());
            let built = match op {
                BinaryOp::Add => b.build_int_add(l, r, name),
                BinaryOp::Sub => b.build_int_sub(l, r, name),
                BinaryOp::Mul => b.build_int_mul(l, r, name),
                BinaryOp::SDiv => b.build_int_signed_div(l, r, name),
                BinaryOp::UDiv => b.build_int_unsigned_div(l, r, name),
                BinaryOp::SRem => b.build_int_signed_rem(l, r, name),
                BinaryOp::URem => b.build_int_unsigned_rem(l, r, name),
                BinaryOp::And => b.build_and(l, r, name),
                BinaryOp::Or => b.build_or(l, r, name),
                BinaryOp::Xor => b.build_xor(l, r, name),
                BinaryOp::Shl => b.build_left_shift(l, r, name),
                BinaryOp::AShr => b.build_right_shift(l, r, true, name),
                _ => b.build_right_shift(l, r, false, name),
            };
            built.expect("integer arithmetic").into()
        };
        self.arena.push_value(v)
    }
}
