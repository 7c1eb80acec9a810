//! Stack slots, loads, stores and globals for `IrBuilder`.

use inkwell::values::InstructionOpcode;

use ember_parse::backend::Constant;
use ember_parse::IrType;

use super::IrBuilder;
use crate::value_id::{FunctionId, ValueId};

impl IrBuilder<'_, '_> {
    /// Build an alloca in the function's entry block.
    ///
    /// Allocas are kept together at the top of the entry block, in the order
    /// they were requested, so `mem2reg` can promote them. The insertion
    /// point is restored afterwards.
    pub(crate) fn entry_alloca(&mut self, function: FunctionId, name: &str, ty: IrType) -> ValueId {
        let func_val = self.arena.get_function(function);
        let (Some(entry), Some(llvm_ty)) = (func_val.get_first_basic_block(), self.scx.basic_type(ty))
        else {
            tracing::error!(%ty, name, "alloca without an entry block or of type void");
            self.record_codegen_error();
            return self.zero_value(self.scx.type_ptr().into());
        };

        let mut insert_before = entry.get_first_instruction();
        while let Some(inst) = insert_before {
            if inst.get_opcode() != InstructionOpcode::Alloca {
                break;
            }
            insert_before = inst.get_next_instruction();
        }
        match insert_before {
            Some(inst) => self.builder.position_before(&inst),
            None => self.builder.position_at_end(entry),
        }

        let ptr = self.builder.build_alloca(llvm_ty, name).expect("alloca");

        match self.current_block {
            Some(block) => self.builder.position_at_end(self.arena.get_block(block)),
            None => self.builder.clear_insertion_position(),
        }
        self.arena.push_value(ptr.into())
    }

    /// Build a load of `ty` from a pointer.
    ///
    /// Defensive: a non-pointer address records a codegen error and yields
    /// a zero of `ty`.
    pub(crate) fn load_from(&mut self, ty: IrType, ptr: ValueId, name: &str) -> ValueId {
        let raw = self.arena.get_value(ptr);
        let llvm_ty = self.scx.basic_type(ty).unwrap_or_else(|| self.scx.type_int(64).into());
        if !raw.is_pointer_value() || ty == IrType::Void {
            tracing::error!(val_type = ?raw.get_type(), %ty, "load from non-pointer or of type void");
            self.record_codegen_error();
            return self.zero_value(llvm_ty);
        }
        if !self.require_position("load") {
            return self.zero_value(llvm_ty);
        }
        let v = self
            .builder
            .build_load(llvm_ty, raw.into_pointer_value(), name)
            .expect("load");
        self.arena.push_value(v)
    }

    /// Build a store to a pointer.
    ///
    /// Defensive: a non-pointer address records a codegen error and skips
    /// the store.
    pub(crate) fn store_to(&mut self, val: ValueId, ptr: ValueId) {
        let v = self.arena.get_value(val);
        let p = self.arena.get_value(ptr);
        if !p.is_pointer_value() {
            tracing::error!(val_type = ?p.get_type(), "store to non-pointer, skipping");
            self.record_codegen_error();
            return;
        }
        if !self.require_position("store") {
            return;
        }
        self.builder
            .build_store(p.into_pointer_value(), v)
            .expect("store");
    }

    /// Define a global with a constant initializer and return its address.
    pub(crate) fn global(&mut self, name: &str, ty: IrType, init: Constant) -> ValueId {
        let Some(llvm_ty) = self.scx.basic_type(ty) else {
            tracing::error!(name, "global of type void");
            self.record_codegen_error();
            return self.zero_value(self.scx.type_ptr().into());
        };
        let global = self.scx.llmod.add_global(llvm_ty, None, name);
        global.set_initializer(&self.constant(ty, init));
        self.arena.push_value(global.as_pointer_value().into())
    }
}
