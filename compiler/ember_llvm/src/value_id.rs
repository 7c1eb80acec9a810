//! Opaque ID newtypes and `ValueArena` for [`IrBuilder`](crate::IrBuilder).
//!
//! The front end holds value, block and function handles in its symbol
//! tables. These IDs keep inkwell's `'ctx` lifetime out of those tables:
//! every LLVM object lives in a `ValueArena` and is referenced by a `Copy`
//! index.

use inkwell::basic_block::BasicBlock;
use inkwell::values::{BasicValueEnum, FunctionValue};

/// Handle to an LLVM value stored in a `ValueArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueId(u32);

/// Handle to an LLVM basic block stored in a `ValueArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(u32);

/// Handle to an LLVM function stored in a `ValueArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId(u32);

#[expect(
    clippy::cast_possible_truncation,
    reason = "one module never holds u32::MAX values"
)]
#[inline]
fn next_index(len: usize) -> u32 {
    len as u32
}

/// Stores LLVM values behind opaque IDs.
///
/// Internal to `IrBuilder`. Each `push_*` allocates a slot and returns an
/// ID; each `get_*` retrieves the stored object.
pub(crate) struct ValueArena<'ctx> {
    values: Vec<BasicValueEnum<'ctx>>,
    blocks: Vec<BasicBlock<'ctx>>,
    functions: Vec<FunctionValue<'ctx>>,
}

impl<'ctx> ValueArena<'ctx> {
    pub(crate) fn new() -> Self {
        Self {
            values: Vec::new(),
            blocks: Vec::new(),
            functions: Vec::new(),
        }
    }

    // -- Values --

    #[inline]
    pub(crate) fn push_value(&mut self, val: BasicValueEnum<'ctx>) -> ValueId {
        let id = ValueId(next_index(self.values.len()));
        self.values.push(val);
        id
    }

    #[inline]
    pub(crate) fn get_value(&self, id: ValueId) -> BasicValueEnum<'ctx> {
        debug_assert!(
            (id.0 as usize) < self.values.len(),
            "ValueId {} out of bounds (arena has {} values)",
            id.0,
            self.values.len()
        );
        self.values[id.0 as usize]
    }

    // -- Blocks --

    #[inline]
    pub(crate) fn push_block(&mut self, bb: BasicBlock<'ctx>) -> BlockId {
        let id = BlockId(next_index(self.blocks.len()));
        self.blocks.push(bb);
        id
    }

    #[inline]
    pub(crate) fn get_block(&self, id: BlockId) -> BasicBlock<'ctx> {
        debug_assert!(
            (id.0 as usize) < self.blocks.len(),
            "BlockId {} out of bounds (arena has {} blocks)",
            id.0,
            self.blocks.len()
        );
        self.blocks[id.0 as usize]
    }

    // -- Functions --

    #[inline]
    pub(crate) fn push_function(&mut self, func: FunctionValue<'ctx>) -> FunctionId {
        let id = FunctionId(next_index(self.functions.len()));
        self.functions.push(func);
        id
    }

    #[inline]
    pub(crate) fn get_function(&self, id: FunctionId) -> FunctionValue<'ctx> {
        debug_assert!(
            (id.0 as usize) < self.functions.len(),
            "FunctionId {} out of bounds (arena has {} functions)",
            id.0,
            self.functions.len()
        );
        self.functions[id.0 as usize]
    }
}
