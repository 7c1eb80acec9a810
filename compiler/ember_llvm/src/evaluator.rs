//! JIT execution of compiled modules.
//!
//! Functions are looked up by name and called through the MCJIT with
//! integer arguments. Only signatures the C ABI can express without
//! marshalling are supported: integer parameters of at most 64 bits and a
//! return of `void`, an integer of at most 64 bits, `f32` or `f64`.

use std::fmt;
use std::sync::OnceLock;

use inkwell::execution_engine::ExecutionEngine;
use inkwell::module::Module;
use inkwell::targets::{InitializationConfig, Target};
use inkwell::types::BasicTypeEnum;
use inkwell::OptimizationLevel;

use ember_parse::backend::{sign_extend, width_mask};

/// A value returned from JIT-executed code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JitValue {
    Void,
    /// Low `width` bits of the returned register.
    Int { width: u32, bits: u64 },
    Float(f64),
}

impl JitValue {
    /// The integer read as two's complement.
    pub fn as_signed(self) -> Option<i64> {
        match self {
            JitValue::Int { width, bits } => {
                i64::try_from(sign_extend(u128::from(bits), width)).ok()
            }
            _ => None,
        }
    }

    pub fn as_unsigned(self) -> Option<u64> {
        match self {
            JitValue::Int { bits, .. } => Some(bits),
            _ => None,
        }
    }

    pub fn as_float(self) -> Option<f64> {
        match self {
            JitValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

/// Error during JIT evaluation.
#[derive(Debug, Clone)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

/// Native target registration is process-wide and must happen once.
fn initialize_native_target() -> Result<(), EvalError> {
    static NATIVE: OnceLock<Result<(), String>> = OnceLock::new();
    NATIVE
        .get_or_init(|| Target::initialize_native(&InitializationConfig::default()))
        .clone()
        .map_err(|e| EvalError::new(format!("native target unavailable: {e}")))
}

/// Return shapes the evaluator can call.
enum ReturnKind {
    Void,
    Int(u32),
    F32,
    F64,
}

/// Owns a module handed to the MCJIT.
pub struct Evaluator<'ctx> {
    module: Module<'ctx>,
    engine: ExecutionEngine<'ctx>,
}

impl<'ctx> Evaluator<'ctx> {
    pub fn new(module: Module<'ctx>) -> Result<Self, EvalError> {
        initialize_native_target()?;
        let engine = module
            .create_jit_execution_engine(OptimizationLevel::None)
            .map_err(|e| EvalError::new(e.to_string()))?;
        Ok(Evaluator { module, engine })
    }

    /// Call `name` with integer arguments, each truncated to its parameter's
    /// width by the callee.
    pub fn call(&self, name: &str, args: &[u64]) -> Result<JitValue, EvalError> {
        let function = self
            .module
            .get_function(name)
            .ok_or_else(|| EvalError::new(format!("function `{name}` not found")))?;
        let params = function.get_type().get_param_types();
        if params.len() != args.len() {
            return Err(EvalError::new(format!(
                "`{name}` takes {} argument(s), {} given",
                params.len(),
                args.len()
            )));
        }
        if !params
            .iter()
            .all(|p| p.is_int_type() && p.into_int_type().get_bit_width() <= 64)
        {
            return Err(EvalError::new(format!(
                "`{name}` has parameters that are not integers of at most 64 bits"
            )));
        }

        let context = self.module.get_context();
        let ret = match function.get_type().get_return_type() {
            None => ReturnKind::Void,
            Some(BasicTypeEnum::IntType(t)) if t.get_bit_width() <= 64 => {
                ReturnKind::Int(t.get_bit_width())
            }
            Some(BasicTypeEnum::FloatType(t)) if t == context.f32_type() => ReturnKind::F32,
            Some(BasicTypeEnum::FloatType(t)) if t == context.f64_type() => ReturnKind::F64,
            Some(other) => {
                return Err(EvalError::new(format!(
                    "`{name}` returns {other:?}, which cannot be read back"
                )))
            }
        };

        // SAFETY: the signature was checked against the module above. Each
        // integer parameter is passed in a full 64-bit slot and the callee
        // reads only its low bits.
        unsafe {
            Ok(match ret {
                ReturnKind::Void => {
                    call::<()>(&self.engine, name, args)?;
                    JitValue::Void
                }
                ReturnKind::Int(width) => {
                    let raw = call::<u64>(&self.engine, name, args)?;
                    // Bits above `width` in the return register are undefined.
                    #[expect(clippy::cast_possible_truncation, reason = "width is at most 64")]
                    let bits = raw & (width_mask(width) as u64);
                    JitValue::Int { width, bits }
                }
                ReturnKind::F32 => {
                    JitValue::Float(f64::from(call::<f32>(&self.engine, name, args)?))
                }
                ReturnKind::F64 => JitValue::Float(call::<f64>(&self.engine, name, args)?),
            })
        }
    }
}

/// Look up and call `name` as `extern "C" fn(u64, ...) -> R`.
///
/// The caller guarantees the function's signature matches.
unsafe fn call<R>(engine: &ExecutionEngine<'_>, name: &str, args: &[u64]) -> Result<R, EvalError> {
    let missing = |e: inkwell::execution_engine::FunctionLookupError| {
        EvalError::new(format!("function `{name}` not found: {e}"))
    };
    match *args {
        [] => {
            let f = engine
                .get_function::<unsafe extern "C" fn() -> R>(name)
                .map_err(missing)?;
            Ok(f.call())
        }
        [a] => {
            let f = engine
                .get_function::<unsafe extern "C" fn(u64) -> R>(name)
                .map_err(missing)?;
            Ok(f.call(a))
        }
        [a, b] => {
            let f = engine
                .get_function::<unsafe extern "C" fn(u64, u64) -> R>(name)
                .map_err(missing)?;
            Ok(f.call(a, b))
        }
        _ => Err(EvalError::new(format!(
            "`{name}` takes more arguments than the evaluator supports"
        ))),
    }
}
