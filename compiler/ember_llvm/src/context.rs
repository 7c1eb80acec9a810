//! Minimal LLVM context: the module being built and type lookup.
//!
//! Follows the `SimpleCx` layer of `rustc_codegen_llvm`. Everything here
//! is read-only after construction; the builder borrows it.

use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::targets::TargetTriple;
use inkwell::types::{
    BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FloatType, FunctionType, IntType, PointerType,
};
use inkwell::AddressSpace;

use ember_parse::{CompileOptions, IrType};

/// The LLVM context and the one module compiled into it.
pub struct SimpleCx<'ll> {
    /// The LLVM context (owns all LLVM types and values).
    pub llcx: &'ll Context,
    /// The LLVM module being compiled.
    pub llmod: Module<'ll>,
}

impl<'ll> SimpleCx<'ll> {
    /// Create the module named after the source file, with the requested
    /// target triple recorded in it.
    pub fn new(context: &'ll Context, options: &CompileOptions) -> Self {
        let llmod = context.create_module(&options.module_name);
        llmod.set_source_file_name(&options.module_name);
        llmod.set_triple(&TargetTriple::create(&options.target_triple));
        Self {
            llcx: context,
            llmod,
        }
    }

    /// `iN` for any width LLVM accepts.
    pub fn type_int(&self, width: u32) -> IntType<'ll> {
        match width {
            1 => self.llcx.bool_type(),
            8 => self.llcx.i8_type(),
            16 => self.llcx.i16_type(),
            32 => self.llcx.i32_type(),
            64 => self.llcx.i64_type(),
            128 => self.llcx.i128_type(),
            _ => self.llcx.custom_width_int_type(width),
        }
    }

    pub fn type_float(&self, ty: IrType) -> Option<FloatType<'ll>> {
        match ty {
            IrType::Half => Some(self.llcx.f16_type()),
            IrType::Float => Some(self.llcx.f32_type()),
            IrType::Double => Some(self.llcx.f64_type()),
            IrType::Fp128 => Some(self.llcx.f128_type()),
            IrType::Void | IrType::Int(_) => None,
        }
    }

    #[inline]
    pub fn type_ptr(&self) -> PointerType<'ll> {
        self.llcx.ptr_type(AddressSpace::default())
    }

    /// The first-class type for `ty`; `None` for `void`.
    pub fn basic_type(&self, ty: IrType) -> Option<BasicTypeEnum<'ll>> {
        match ty {
            IrType::Void => None,
            IrType::Int(width) => Some(self.type_int(width).into()),
            float => self.type_float(float).map(Into::into),
        }
    }

    /// Signature `ret(params...)`. Parameters without a first-class type
    /// are skipped.
    pub fn type_fn(&self, ret: IrType, params: &[IrType]) -> FunctionType<'ll> {
        let params: Vec<BasicMetadataTypeEnum<'ll>> = params
            .iter()
            .filter_map(|&ty| self.basic_type(ty))
            .map(Into::into)
            .collect();
        match self.basic_type(ret) {
            Some(ret) => ret.fn_type(&params, false),
            None => self.llcx.void_type().fn_type(&params, false),
        }
    }
}
