//! Functions, parameters and basic blocks for `IrBuilder`.

use ember_parse::IrType;

use super::IrBuilder;
use crate::value_id::{BlockId, FunctionId, ValueId};

impl IrBuilder<'_, '_> {
    /// Add a function with external linkage to the module.
    pub(crate) fn declare_fn(&mut self, name: &str, params: &[IrType], ret: IrType) -> FunctionId {
        let fn_type = self.scx.type_fn(ret, params);
        let func = self.scx.llmod.add_function(name, fn_type, None);
        self.arena.push_function(func)
    }

    /// The `index`th parameter, or `None` (with a codegen error) when the
    /// function has fewer parameters.
    pub(crate) fn get_param(&mut self, func: FunctionId, index: usize) -> Option<ValueId> {
        let func_val = self.arena.get_function(func);
        let param = u32::try_from(index)
            .ok()
            .and_then(|i| func_val.get_nth_param(i));
        let Some(param) = param else {
            tracing::error!(
                function = %func_val.get_name().to_string_lossy(),
                index,
                count = func_val.count_params(),
                "parameter index out of range"
            );
            self.record_codegen_error();
            return None;
        };
        Some(self.arena.push_value(param))
    }

    pub(crate) fn append_bb(&mut self, function: FunctionId, name: &str) -> BlockId {
        let func = self.arena.get_function(function);
        let bb = self.scx.llcx.append_basic_block(func, name);
        self.arena.push_block(bb)
    }
}
