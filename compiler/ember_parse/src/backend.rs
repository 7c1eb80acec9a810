//! The interface the front end emits through.
//!
//! The parser never builds IR itself. It drives a [`Backend`]: a typed SSA
//! builder positioned at one block at a time, handing out `Copy` handles for
//! values, blocks and functions. Handles are owned by the backend; the front
//! end only stores them in its symbol tables and passes them back.
//!
//! Trait hierarchy, after `rustc_codegen_ssa`:
//! - [`BackendTypes`]: the handle types
//! - [`Backend`]: module items, blocks, instructions and verification
//!
//! Type and operation vocabularies ([`IrType`], [`BinaryOp`], the predicates)
//! are defined here so that every backend speaks the same language.

use std::fmt;

/// A backend scalar type. Displayed the way LLVM spells it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IrType {
    Void,
    /// `iN`, 1 to 128 bits.
    Int(u32),
    Half,
    Float,
    Double,
    Fp128,
}

impl IrType {
    pub const BOOL: IrType = IrType::Int(1);
    pub const I32: IrType = IrType::Int(32);
    pub const I64: IrType = IrType::Int(64);

    /// The float type of a given bit width, if one exists.
    pub fn float_of_width(width: u32) -> Option<IrType> {
        match width {
            16 => Some(IrType::Half),
            32 => Some(IrType::Float),
            64 => Some(IrType::Double),
            128 => Some(IrType::Fp128),
            _ => None,
        }
    }

    #[inline]
    pub fn is_int(self) -> bool {
        matches!(self, IrType::Int(_))
    }

    #[inline]
    pub fn is_float(self) -> bool {
        matches!(
            self,
            IrType::Half | IrType::Float | IrType::Double | IrType::Fp128
        )
    }

    pub fn int_width(self) -> Option<u32> {
        match self {
            IrType::Int(w) => Some(w),
            _ => None,
        }
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => write!(f, "void"),
            IrType::Int(w) => write!(f, "i{w}"),
            IrType::Half => write!(f, "half"),
            IrType::Float => write!(f, "float"),
            IrType::Double => write!(f, "double"),
            IrType::Fp128 => write!(f, "fp128"),
        }
    }
}

/// A global initializer. Integer bits are stored masked to the type width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Constant {
    Int(u128),
    Float(f64),
}

/// Mask selecting the low `width` bits.
pub fn width_mask(width: u32) -> u128 {
    if width >= 128 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    }
}

/// Sign-extend the low `width` bits of `bits`.
#[expect(clippy::cast_possible_wrap, reason = "reinterpreting two's complement bits")]
pub fn sign_extend(bits: u128, width: u32) -> i128 {
    if width == 0 || width >= 128 {
        return bits as i128;
    }
    let shift = 128 - width;
    ((bits << shift) as i128) >> shift
}

/// Two-operand arithmetic and bitwise instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    SDiv,
    UDiv,
    SRem,
    URem,
    FAdd,
    FSub,
    FMul,
    FDiv,
    FRem,
    And,
    Or,
    Xor,
    Shl,
    AShr,
    LShr,
}

impl BinaryOp {
    /// The LLVM instruction name.
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::SDiv => "sdiv",
            BinaryOp::UDiv => "udiv",
            BinaryOp::SRem => "srem",
            BinaryOp::URem => "urem",
            BinaryOp::FAdd => "fadd",
            BinaryOp::FSub => "fsub",
            BinaryOp::FMul => "fmul",
            BinaryOp::FDiv => "fdiv",
            BinaryOp::FRem => "frem",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Shl => "shl",
            BinaryOp::AShr => "ashr",
            BinaryOp::LShr => "lshr",
        }
    }

    /// Does this operation take floating operands?
    pub fn is_float(self) -> bool {
        matches!(
            self,
            BinaryOp::FAdd | BinaryOp::FSub | BinaryOp::FMul | BinaryOp::FDiv | BinaryOp::FRem
        )
    }
}

/// Integer comparison predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntPredicate {
    Eq,
    Ne,
    Slt,
    Sgt,
    Sle,
    Sge,
    Ult,
    Ugt,
    Ule,
    Uge,
}

/// Ordered floating comparison predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloatPredicate {
    Oeq,
    One,
    Olt,
    Ogt,
    Ole,
    Oge,
}

/// Handle types of a backend.
pub trait BackendTypes {
    /// An SSA value: a constant, parameter, instruction result or address.
    type Value: Copy + fmt::Debug + PartialEq;
    type Block: Copy + fmt::Debug + PartialEq;
    type Function: Copy + fmt::Debug + PartialEq;
}

/// Instruction builder for one module.
///
/// Malformed requests (mismatched operand types, no insertion point) must not
/// panic: a backend logs them, counts them in
/// [`codegen_error_count`](Backend::codegen_error_count) and returns a
/// placeholder. The front end turns a non-zero count into an error.
pub trait Backend: BackendTypes {
    // -- Module items --

    /// Declare a function. Parameter values exist from this point on.
    fn declare_function(&mut self, name: &str, params: &[IrType], ret: IrType)
        -> Self::Function;

    /// The `index`th parameter of `func`.
    fn param(&mut self, func: Self::Function, index: usize) -> Option<Self::Value>;

    fn set_value_name(&mut self, value: Self::Value, name: &str);

    /// Add a global with a constant initializer; returns its address.
    fn add_global(&mut self, name: &str, ty: IrType, init: Constant) -> Self::Value;

    // -- Blocks and positioning --

    fn append_block(&mut self, func: Self::Function, label: &str) -> Self::Block;

    fn position_at_end(&mut self, block: Self::Block);

    /// Drop the insertion point.
    fn clear_position(&mut self);

    /// The block new instructions go into.
    fn current_block(&self) -> Option<Self::Block>;

    /// Does `block` already end in a terminator?
    fn block_terminated(&self, block: Self::Block) -> bool;

    /// Does any branch target `block`?
    fn block_has_predecessors(&self, block: Self::Block) -> bool;

    /// Is there nowhere left to build? True without an insertion point.
    fn current_block_terminated(&self) -> bool {
        self.current_block()
            .map_or(true, |block| self.block_terminated(block))
    }

    // -- Memory --

    /// Allocate a stack slot at the front of `func`'s entry block, leaving
    /// the insertion point where it was.
    fn create_entry_alloca(&mut self, func: Self::Function, name: &str, ty: IrType)
        -> Self::Value;

    fn load(&mut self, ty: IrType, ptr: Self::Value, name: &str) -> Self::Value;

    fn store(&mut self, value: Self::Value, ptr: Self::Value);

    // -- Instructions --

    fn binary(&mut self, op: BinaryOp, lhs: Self::Value, rhs: Self::Value, name: &str)
        -> Self::Value;

    /// Integer comparison; the result is `i1`.
    fn icmp(&mut self, pred: IntPredicate, lhs: Self::Value, rhs: Self::Value, name: &str)
        -> Self::Value;

    /// Ordered float comparison; the result is `i1`.
    fn fcmp(
        &mut self,
        pred: FloatPredicate,
        lhs: Self::Value,
        rhs: Self::Value,
        name: &str,
    ) -> Self::Value;

    // -- Constants --

    /// Integer constant of type `ty`, truncated to its width.
    fn const_int(&mut self, ty: IrType, value: i128) -> Self::Value;

    fn const_float(&mut self, ty: IrType, value: f64) -> Self::Value;

    fn const_zero(&mut self, ty: IrType) -> Self::Value {
        if ty.is_float() {
            self.const_float(ty, 0.0)
        } else {
            self.const_int(ty, 0)
        }
    }

    /// `-1` of an integer type, for bitwise complement.
    fn const_all_ones(&mut self, ty: IrType) -> Self::Value {
        self.const_int(ty, -1)
    }

    // -- Terminators --

    fn br(&mut self, dest: Self::Block);

    fn cond_br(&mut self, cond: Self::Value, then_dest: Self::Block, else_dest: Self::Block);

    fn ret(&mut self, value: Self::Value);

    fn ret_void(&mut self);

    fn unreachable(&mut self);

    // -- Checks --

    /// Number of malformed build requests so far.
    fn codegen_error_count(&self) -> u32;

    /// Check the finished module.
    fn verify(&self) -> Result<(), String>;
}
