//! Constant construction for `IrBuilder`.

use inkwell::types::BasicTypeEnum;
use inkwell::values::BasicValueEnum;

use ember_parse::backend::{width_mask, Constant};
use ember_parse::IrType;

use super::IrBuilder;
use crate::value_id::ValueId;

impl<'ctx> IrBuilder<'_, 'ctx> {
    /// Integer constant of `ty`, truncated to its width.
    ///
    /// Widths above 64 bits are built from two little-endian words.
    pub(crate) fn int_constant(&self, ty: IrType, value: i128) -> BasicValueEnum<'ctx> {
        let Some(width) = ty.int_width() else {
            tracing::error!(%ty, "integer constant of a non-integer type");
            self.record_codegen_error();
            return self.scx.type_int(64).const_zero().into();
        };
        let int_ty = self.scx.type_int(width);
        let bits = u128::from_ne_bytes(value.to_ne_bytes()) & width_mask(width);
        #[expect(clippy::cast_possible_truncation, reason = "splitting into 64-bit words")]
        let (low, high) = (bits as u64, (bits >> 64) as u64);
        let v = if width <= 64 {
            int_ty.const_int(low, false)
        } else {
            int_ty.const_int_arbitrary_precision(&[low, high])
        };
        v.into()
    }

    pub(crate) fn float_constant(&self, ty: IrType, value: f64) -> BasicValueEnum<'ctx> {
        let Some(float_ty) = self.scx.type_float(ty) else {
            tracing::error!(%ty, "float constant of a non-float type");
            self.record_codegen_error();
            return self.scx.llcx.f64_type().const_zero().into();
        };
        float_ty.const_float(value).into()
    }

    /// Initializer for a global of type `ty`.
    pub(crate) fn constant(&self, ty: IrType, constant: Constant) -> BasicValueEnum<'ctx> {
        match constant {
            Constant::Int(bits) => self.int_constant(ty, i128::from_ne_bytes(bits.to_ne_bytes())),
            Constant::Float(v) => self.float_constant(ty, v),
        }
    }

    /// Zero of an arbitrary LLVM type, used as the placeholder result of a
    /// malformed request.
    pub(crate) fn zero_value(&mut self, ty: BasicTypeEnum<'ctx>) -> ValueId {
        let v: BasicValueEnum<'ctx> = match ty {
            BasicTypeEnum::IntType(t) => t.const_zero().into(),
            BasicTypeEnum::FloatType(t) => t.const_zero().into(),
            BasicTypeEnum::PointerType(t) => t.const_null().into(),
            _ => self.scx.type_int(64).const_zero().into(),
        };
        self.arena.push_value(v)
    }
}
