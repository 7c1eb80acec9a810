//! ID-based LLVM instruction builder.
//!
//! `IrBuilder` wraps inkwell's `Builder`, stores all LLVM values in a
//! `ValueArena`, and implements the front end's [`Backend`] over opaque ID
//! types. The `'ctx` lifetime stays inside this struct.
//!
//! # Defensive emission
//!
//! A malformed request (operand type mismatch, no insertion point) is
//! logged with `tracing::error!`, counted, and answered with a placeholder
//! value. The front end refuses to finish a module with a non-zero count,
//! so malformed IR never reaches the verifier or the JIT.
//!
//! # Method Organization
//!
//! | Category | Module |
//! |----------|--------|
//! | Constants | `constants` |
//! | Memory and globals | `memory` |
//! | Arithmetic | `arithmetic` |
//! | Comparisons | `comparisons` |
//! | Terminators | `control_flow` |
//! | Functions and blocks | `blocks` |

mod arithmetic;
mod blocks;
mod comparisons;
mod constants;
mod control_flow;
mod memory;

use std::cell::Cell;

use inkwell::builder::Builder as InkwellBuilder;

use ember_parse::backend::{Backend, BackendTypes, BinaryOp, Constant, FloatPredicate, IntPredicate};
use ember_parse::IrType;

use crate::context::SimpleCx;
use crate::value_id::{BlockId, FunctionId, ValueArena, ValueId};

/// ID-based LLVM IR builder.
///
/// Two lifetimes:
/// - `'ctx`: the LLVM context lifetime (from `Context::create()`).
/// - `'scx`: the borrow of the `SimpleCx`.
///
/// These are separate to avoid drop-checker issues where `IrBuilder`
/// and `SimpleCx` are local variables in the same scope.
pub struct IrBuilder<'scx, 'ctx> {
    builder: InkwellBuilder<'ctx>,
    scx: &'scx SimpleCx<'ctx>,
    arena: ValueArena<'ctx>,
    /// Block the builder is positioned at, if any.
    current_block: Option<BlockId>,
    /// Count of malformed requests during IR construction.
    codegen_errors: Cell<u32>,
}

impl<'scx, 'ctx> IrBuilder<'scx, 'ctx> {
    pub fn new(scx: &'scx SimpleCx<'ctx>) -> Self {
        Self {
            builder: scx.llcx.create_builder(),
            scx,
            arena: ValueArena::new(),
            current_block: None,
            codegen_errors: Cell::new(0),
        }
    }

    /// Record a malformed request. The module must not be used afterwards.
    pub(crate) fn record_codegen_error(&self) {
        self.codegen_errors.set(self.codegen_errors.get() + 1);
    }

    /// False, with the error recorded, when there is no insertion point.
    pub(crate) fn require_position(&self, what: &str) -> bool {
        if self.current_block.is_some() {
            return true;
        }
        tracing::error!(instruction = what, "no insertion point");
        self.record_codegen_error();
        false
    }
}

impl BackendTypes for IrBuilder<'_, '_> {
    type Value = ValueId;
    type Block = BlockId;
    type Function = FunctionId;
}

impl Backend for IrBuilder<'_, '_> {
    fn declare_function(&mut self, name: &str, params: &[IrType], ret: IrType) -> FunctionId {
        self.declare_fn(name, params, ret)
    }

    fn param(&mut self, func: FunctionId, index: usize) -> Option<ValueId> {
        self.get_param(func, index)
    }

    fn set_value_name(&mut self, value: ValueId, name: &str) {
        self.arena.get_value(value).set_name(name);
    }

    fn add_global(&mut self, name: &str, ty: IrType, init: Constant) -> ValueId {
        self.global(name, ty, init)
    }

    fn append_block(&mut self, func: FunctionId, label: &str) -> BlockId {
        self.append_bb(func, label)
    }

    fn position_at_end(&mut self, block: BlockId) {
        self.builder.position_at_end(self.arena.get_block(block));
        self.current_block = Some(block);
    }

    fn clear_position(&mut self) {
        self.builder.clear_insertion_position();
        self.current_block = None;
    }

    fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    fn block_terminated(&self, block: BlockId) -> bool {
        self.arena.get_block(block).get_terminator().is_some()
    }

    fn block_has_predecessors(&self, block: BlockId) -> bool {
        // Blocks are only ever used as branch targets.
        self.arena.get_block(block).get_first_use().is_some()
    }

    fn create_entry_alloca(&mut self, func: FunctionId, name: &str, ty: IrType) -> ValueId {
        self.entry_alloca(func, name, ty)
    }

    fn load(&mut self, ty: IrType, ptr: ValueId, name: &str) -> ValueId {
        self.load_from(ty, ptr, name)
    }

    fn store(&mut self, value: ValueId, ptr: ValueId) {
        self.store_to(value, ptr);
    }

    fn binary(&mut self, op: BinaryOp, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.binary_impl(op, lhs, rhs, name)
    }

    fn icmp(&mut self, pred: IntPredicate, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp_impl(pred, lhs, rhs, name)
    }

    fn fcmp(&mut self, pred: FloatPredicate, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp_impl(pred, lhs, rhs, name)
    }

    fn const_int(&mut self, ty: IrType, value: i128) -> ValueId {
        let v = self.int_constant(ty, value);
        self.arena.push_value(v)
    }

    fn const_float(&mut self, ty: IrType, value: f64) -> ValueId {
        let v = self.float_constant(ty, value);
        self.arena.push_value(v)
    }

    fn br(&mut self, dest: BlockId) {
        self.br_impl(dest);
    }

    fn cond_br(&mut self, cond: ValueId, then_dest: BlockId, else_dest: BlockId) {
        self.cond_br_impl(cond, then_dest, else_dest);
    }

    fn ret(&mut self, value: ValueId) {
        self.ret_impl(Some(value));
    }

    fn ret_void(&mut self) {
        self.ret_impl(None);
    }

    fn unreachable(&mut self) {
        self.unreachable_impl();
    }

    fn codegen_error_count(&self) -> u32 {
        self.codegen_errors.get()
    }

    fn verify(&self) -> Result<(), String> {
        self.scx.llmod.verify().map_err(|e| e.to_string())
    }
}
