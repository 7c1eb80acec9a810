//! A backend that records what the front end asks for.
//!
//! Instructions are kept as plain data so tests can assert on block layout,
//! terminators and folded constants without a real code generator.

use crate::backend::{
    width_mask, Backend, BackendTypes, BinaryOp, Constant, FloatPredicate, IntPredicate, IrType,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Value(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Func(usize);

#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    Const(Constant),
    Param(usize),
    /// Address of a global.
    Global(Constant),
    /// Result of the instruction that defined it.
    Inst,
}

#[derive(Clone, Debug)]
pub struct RecordedValue {
    /// `None` for addresses.
    pub ty: Option<IrType>,
    pub name: String,
    pub kind: ValueKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Alloca { result: Value, ty: IrType },
    Load { result: Value, ty: IrType, ptr: Value },
    Store { value: Value, ptr: Value },
    Binary { result: Value, op: BinaryOp, lhs: Value, rhs: Value },
    Icmp { result: Value, pred: IntPredicate, lhs: Value, rhs: Value },
    Fcmp { result: Value, pred: FloatPredicate, lhs: Value, rhs: Value },
    Br(Block),
    CondBr { cond: Value, then_dest: Block, else_dest: Block },
    Ret(Option<Value>),
    Unreachable,
}

impl Op {
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Op::Br(_) | Op::CondBr { .. } | Op::Ret(_) | Op::Unreachable
        )
    }

    fn successors(&self) -> Vec<Block> {
        match *self {
            Op::Br(dest) => vec![dest],
            Op::CondBr { then_dest, else_dest, .. } => vec![then_dest, else_dest],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct RecordedFunction {
    pub name: String,
    pub params: Vec<Value>,
    pub ret: IrType,
    pub blocks: Vec<Block>,
}

#[derive(Debug)]
pub struct RecordedBlock {
    pub label: String,
    pub function: Func,
    pub ops: Vec<Op>,
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub functions: Vec<RecordedFunction>,
    pub blocks: Vec<RecordedBlock>,
    pub values: Vec<RecordedValue>,
    /// Name, type and address of each global.
    pub globals: Vec<(String, IrType, Value)>,
    position: Option<Block>,
    errors: u32,
}

impl BackendTypes for Recorder {
    type Value = Value;
    type Block = Block;
    type Function = Func;
}

impl Recorder {
    fn new_value(&mut self, ty: Option<IrType>, name: &str, kind: ValueKind) -> Value {
        self.values.push(RecordedValue {
            ty,
            name: name.to_owned(),
            kind,
        });
        Value(self.values.len() - 1)
    }

    fn ty_of(&self, value: Value) -> Option<IrType> {
        self.values[value.0].ty
    }

    /// Append to the current block, counting a malformed request when there
    /// is nowhere to put it.
    fn push(&mut self, op: Op) {
        match self.position {
            Some(block) if !self.block_terminated(block) => self.blocks[block.0].ops.push(op),
            _ => self.errors += 1,
        }
    }

    fn same_type(&mut self, lhs: Value, rhs: Value) -> Option<IrType> {
        let ty = self.ty_of(lhs);
        if ty.is_none() || ty != self.ty_of(rhs) {
            self.errors += 1;
        }
        ty
    }

    // Queries used by the tests.

    pub fn function(&self, name: &str) -> &RecordedFunction {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("no function `{name}`"))
    }

    pub fn block(&self, block: Block) -> &RecordedBlock {
        &self.blocks[block.0]
    }

    pub fn value(&self, value: Value) -> &RecordedValue {
        &self.values[value.0]
    }

    pub fn block_labels(&self, function: &str) -> Vec<&str> {
        self.function(function)
            .blocks
            .iter()
            .map(|&b| self.block(b).label.as_str())
            .collect()
    }

    /// Terminator of the first block of `function` labelled `label`.
    pub fn terminator(&self, function: &str, label: &str) -> &Op {
        let block = self
            .function(function)
            .blocks
            .iter()
            .copied()
            .find(|&b| self.block(b).label == label)
            .unwrap_or_else(|| panic!("no block `{label}` in `{function}`"));
        self.block(block)
            .ops
            .last()
            .filter(|op| op.is_terminator())
            .unwrap_or_else(|| panic!("block `{label}` is not terminated"))
    }

    pub fn count_ops(&self, function: &str, pred: impl Fn(&Op) -> bool) -> usize {
        self.function(function)
            .blocks
            .iter()
            .flat_map(|&b| self.block(b).ops.iter())
            .filter(|op| pred(op))
            .count()
    }

    /// Constants returned by `function`, in block order.
    pub fn returned_constants(&self, function: &str) -> Vec<Constant> {
        self.function(function)
            .blocks
            .iter()
            .flat_map(|&b| self.block(b).ops.iter())
            .filter_map(|op| match op {
                Op::Ret(Some(value)) => match self.value(*value).kind {
                    ValueKind::Const(constant) => Some(constant),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    pub fn global(&self, name: &str) -> (IrType, Constant) {
        let &(_, ty, address) = self
            .globals
            .iter()
            .find(|(n, _, _)| n == name)
            .unwrap_or_else(|| panic!("no global `{name}`"));
        match self.value(address).kind {
            ValueKind::Global(init) => (ty, init),
            ref other => panic!("global `{name}` recorded as {other:?}"),
        }
    }
}

impl Backend for Recorder {
    fn declare_function(&mut self, name: &str, params: &[IrType], ret: IrType) -> Func {
        let func = Func(self.functions.len());
        let params = params
            .iter()
            .enumerate()
            .map(|(i, &ty)| self.new_value(Some(ty), "", ValueKind::Param(i)))
            .collect();
        self.functions.push(RecordedFunction {
            name: name.to_owned(),
            params,
            ret,
            blocks: Vec::new(),
        });
        func
    }

    fn param(&mut self, func: Func, index: usize) -> Option<Value> {
        self.functions[func.0].params.get(index).copied()
    }

    fn set_value_name(&mut self, value: Value, name: &str) {
        name.clone_into(&mut self.values[value.0].name);
    }

    fn add_global(&mut self, name: &str, ty: IrType, init: Constant) -> Value {
        let address = self.new_value(None, name, ValueKind::Global(init));
        self.globals.push((name.to_owned(), ty, address));
        address
    }

    fn append_block(&mut self, func: Func, label: &str) -> Block {
        let block = Block(self.blocks.len());
        self.blocks.push(RecordedBlock {
            label: label.to_owned(),
            function: func,
            ops: Vec::new(),
        });
        self.functions[func.0].blocks.push(block);
        block
    }

    fn position_at_end(&mut self, block: Block) {
        self.position = Some(block);
    }

    fn clear_position(&mut self) {
        self.position = None;
    }

    fn current_block(&self) -> Option<Block> {
        self.position
    }

    fn block_terminated(&self, block: Block) -> bool {
        self.blocks[block.0].ops.last().is_some_and(Op::is_terminator)
    }

    fn block_has_predecessors(&self, block: Block) -> bool {
        self.blocks
            .iter()
            .flat_map(|b| b.ops.iter())
            .any(|op| op.successors().contains(&block))
    }

    fn create_entry_alloca(&mut self, func: Func, name: &str, ty: IrType) -> Value {
        let Some(&entry) = self.functions[func.0].blocks.first() else {
            self.errors += 1;
            return self.new_value(None, name, ValueKind::Inst);
        };
        let result = self.new_value(None, name, ValueKind::Inst);
        let ops = &mut self.blocks[entry.0].ops;
        let at = ops
            .iter()
            .position(|op| !matches!(op, Op::Alloca { .. }))
            .unwrap_or(ops.len());
        ops.insert(at, Op::Alloca { result, ty });
        result
    }

    fn load(&mut self, ty: IrType, ptr: Value, name: &str) -> Value {
        if self.ty_of(ptr).is_some() {
            self.errors += 1;
        }
        let result = self.new_value(Some(ty), name, ValueKind::Inst);
        self.push(Op::Load { result, ty, ptr });
        result
    }

    fn store(&mut self, value: Value, ptr: Value) {
        if self.ty_of(ptr).is_some() || self.ty_of(value).is_none() {
            self.errors += 1;
        }
        self.push(Op::Store { value, ptr });
    }

    fn binary(&mut self, op: BinaryOp, lhs: Value, rhs: Value, name: &str) -> Value {
        let ty = self.same_type(lhs, rhs);
        if ty.is_some_and(|ty| ty.is_float() != op.is_float()) {
            self.errors += 1;
        }
        let result = self.new_value(ty, name, ValueKind::Inst);
        self.push(Op::Binary { result, op, lhs, rhs });
        result
    }

    fn icmp(&mut self, pred: IntPredicate, lhs: Value, rhs: Value, name: &str) -> Value {
        if !self.same_type(lhs, rhs).is_some_and(IrType::is_int) {
            self.errors += 1;
        }
        let result = self.new_value(Some(IrType::BOOL), name, ValueKind::Inst);
        self.push(Op::Icmp { result, pred, lhs, rhs });
        result
    }

    fn fcmp(&mut self, pred: FloatPredicate, lhs: Value, rhs: Value, name: &str) -> Value {
        if !self.same_type(lhs, rhs).is_some_and(IrType::is_float) {
            self.errors += 1;
        }
        let result = self.new_value(Some(IrType::BOOL), name, ValueKind::Inst);
        self.push(Op::Fcmp { result, pred, lhs, rhs });
        result
    }

    fn const_int(&mut self, ty: IrType, value: i128) -> Value {
        let width = ty.int_width().unwrap_or_else(|| {
            self.errors += 1;
            64
        });
        #[expect(clippy::cast_sign_loss, reason = "two's complement bits")]
        let bits = value as u128 & width_mask(width);
        self.new_value(Some(ty), "", ValueKind::Const(Constant::Int(bits)))
    }

    fn const_float(&mut self, ty: IrType, value: f64) -> Value {
        if !ty.is_float() {
            self.errors += 1;
        }
        self.new_value(Some(ty), "", ValueKind::Const(Constant::Float(value)))
    }

    fn br(&mut self, dest: Block) {
        self.push(Op::Br(dest));
    }

    fn cond_br(&mut self, cond: Value, then_dest: Block, else_dest: Block) {
        if self.ty_of(cond) != Some(IrType::BOOL) {
            self.errors += 1;
        }
        self.push(Op::CondBr {
            cond,
            then_dest,
            else_dest,
        });
    }

    fn ret(&mut self, value: Value) {
        self.push(Op::Ret(Some(value)));
    }

    fn ret_void(&mut self) {
        self.push(Op::Ret(None));
    }

    fn unreachable(&mut self) {
        self.push(Op::Unreachable);
    }

    fn codegen_error_count(&self) -> u32 {
        self.errors
    }

    fn verify(&self) -> Result<(), String> {
        for function in &self.functions {
            for &block in &function.blocks {
                let recorded = self.block(block);
                if !self.block_terminated(block) {
                    return Err(format!(
                        "block `{}` in `{}` has no terminator",
                        recorded.label, function.name
                    ));
                }
                for op in &recorded.ops {
                    if let Op::Ret(value) = op {
                        let ty = value.map_or(Some(IrType::Void), |v| self.ty_of(v));
                        if ty != Some(function.ret) {
                            return Err(format!("`{}` returns the wrong type", function.name));
                        }
                    }
                    if op
                        .successors()
                        .iter()
                        .any(|dest| self.block(*dest).function != recorded.function)
                    {
                        return Err(format!("branch out of `{}`", function.name));
                    }
                }
            }
        }
        Ok(())
    }
}
