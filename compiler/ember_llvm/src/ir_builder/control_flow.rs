//! Terminators for `IrBuilder`.

use inkwell::values::BasicValue;

use super::IrBuilder;
use crate::value_id::{BlockId, ValueId};

impl IrBuilder<'_, '_> {
    pub(crate) fn br_impl(&mut self, dest: BlockId) {
        if !self.require_position("br") {
            return;
        }
        let bb = self.arena.get_block(dest);
        self.builder
            .build_unconditional_branch(bb)
            .expect("build_br");
    }

    /// Defensive: a condition that is not an `i1` records a codegen error and
    /// emits nothing.
    pub(crate) fn cond_br_impl(&mut self, cond: ValueId, then_bb: BlockId, else_bb: BlockId) {
        let c = self.arena.get_value(cond);
        if !c.is_int_value() || c.into_int_value().get_type().get_bit_width() != 1 {
            tracing::error!(cond_type = ?c.get_type(), "cond_br on a non-i1 condition");
            self.record_codegen_error();
            return;
        }
        if !self.require_position("cond_br") {
            return;
        }
        let then_bb = self.arena.get_block(then_bb);
        let else_bb = self.arena.get_block(else_bb);
        self.builder
            .build_conditional_branch(c.into_int_value(), then_bb, else_bb)
            .expect("build_cond_br");
    }

    /// `ret value`, or `ret void` for `None`.
    pub(crate) fn ret_impl(&mut self, value: Option<ValueId>) {
        if !self.require_position("ret") {
            return;
        }
        let v = value.map(|id| self.arena.get_value(id));
        self.builder
            .build_return(v.as_ref().map(|v| v as &dyn BasicValue<'_>))
            .expect("build_return");
    }

    pub(crate) fn unreachable_impl(&mut self) {
        if !self.require_position("unreachable") {
            return;
        }
        self.builder
            .build_unreachable()
            .expect("build_unreachable");
    }
}
