//! Integer and floating-point comparisons for `IrBuilder`.

use ember_parse::backend::{FloatPredicate, IntPredicate};
use inkwell::{FloatPredicate as LlvmFloatPredicate, IntPredicate as LlvmIntPredicate};

use super::IrBuilder;
use crate::value_id::ValueId;

fn int_predicate(pred: IntPredicate) -> LlvmIntPredicate {
    match pred {
        IntPredicate::Eq => LlvmIntPredicate::EQ,
        IntPredicate::Ne => LlvmIntPredicate::NE,
        IntPredicate::Slt => LlvmIntPredicate::SLT,
        IntPredicate::Sgt => LlvmIntPredicate::SGT,
        IntPredicate::Sle => LlvmIntPredicate::SLE,
        IntPredicate::Sge => LlvmIntPredicate::SGE,
        IntPredicate::Ult => LlvmIntPredicate::ULT,
        IntPredicate::Ugt => LlvmIntPredicate::UGT,
        IntPredicate::Ule => LlvmIntPredicate::ULE,
        IntPredicate::Uge => LlvmIntPredicate::UGE,
    }
}

fn float_predicate(pred: FloatPredicate) -> LlvmFloatPredicate {
    match pred {
        FloatPredicate::Oeq => LlvmFloatPredicate::OEQ,
        FloatPredicate::One => LlvmFloatPredicate::ONE,
        FloatPredicate::Olt => LlvmFloatPredicate::OLT,
        FloatPredicate::Ogt => LlvmFloatPredicate::OGT,
        FloatPredicate::Ole => LlvmFloatPredicate::OLE,
        FloatPredicate::Oge => LlvmFloatPredicate::OGE,
    }
}

impl IrBuilder<'_, '_> {
    /// Integer comparison.
    ///
    /// Defensive: non-integer or mismatched operands return `false` (i1 0)
    /// instead of panicking.
    pub(crate) fn icmp_impl(
        &mut self,
        pred: IntPredicate,
        lhs: ValueId,
        rhs: ValueId,
        name: &str,
    ) -> ValueId {
        let l = self.arena.get_value(lhs);
        let r = self.arena.get_value(rhs);
        if !l.is_int_value() || l.get_type() != r.get_type() {
            tracing::error!(
                lhs_type = ?l.get_type(),
                rhs_type = ?r.get_type(),
                "icmp on non-int operands, returning false"
            );
            self.record_codegen_error();
            return self.zero_value(self.scx.type_int(1).into());
        }
        if !self.require_position("icmp") {
            return self.zero_value(self.scx.type_int(1).into());
        }
        let v = self
            .builder
            .build_int_compare(int_predicate(pred), l.into_int_value(), r.into_int_value(), name)
            .expect("icmp");
        self.arena.push_value(v.into())
    }

    /// Ordered float comparison.
    ///
    /// Defensive: non-float or mismatched operands return `false`.
    pub(crate) fn fcmp_impl(
        &mut self,
        pred: FloatPredicate,
        lhs: ValueId,
        rhs: ValueId,
        name: &str,
    ) -> ValueId {
        let l = self.arena.get_value(lhs);
        let r = self.arena.get_value(rhs);
        if !l.is_float_value() || l.get_type() != r.get_type() {
            tracing::error!(
                lhs_type = ?l.get_type(),
                rhs_type = ?r.get_type(),
                "fcmp on non-float operands, returning false"
            );
            self.record_codegen_error();
            return self.zero_value(self.scx.type_int(1).into());
        }
        if !self.require_position("fcmp") {
            return self.zero_value(self.scx.type_int(1).into());
        }
        let v = self
            .builder
            .build_float_compare(
                float_predicate(pred),
                l.into_float_value(),
                r.into_float_value(),
                name,
            )
            .expect("fcmp");
        self.arena.push_value(v.into())
    }
}
