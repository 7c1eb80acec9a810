//! Source-level types of variables, parameters and expressions.

use std::fmt;

use crate::backend::IrType;

use crate::unit::StructId;

/// The type of a value as written in Ember source.
///
/// `None` is "no constraint yet" while parsing an expression; no variable or
/// emitted value ever has it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum VariableType {
    #[default]
    None,
    Int(u32),
    Unsigned(u32),
    Float(u32),
    /// A 32-bit code unit.
    Char,
    Bool,
    Void,
    Struct(StructId),
}

impl VariableType {
    /// Widest integer the compiler evaluates constants in.
    pub const MAX_INT_WIDTH: u32 = 128;

    /// The backend type used for storage and values of this type.
    ///
    /// `None`, `Void` and struct types have no scalar representation.
    pub fn ir_type(self) -> Option<IrType> {
        match self {
            VariableType::Int(width) | VariableType::Unsigned(width) => Some(IrType::Int(width)),
            VariableType::Float(width) => IrType::float_of_width(width),
            VariableType::Char => Some(IrType::I32),
            VariableType::Bool => Some(IrType::BOOL),
            VariableType::None | VariableType::Void | VariableType::Struct(_) => None,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, VariableType::Int(_) | VariableType::Unsigned(_))
    }

    pub fn is_float(self) -> bool {
        matches!(self, VariableType::Float(_))
    }

    /// Types that can live in a variable: scalars only.
    pub fn is_scalar(self) -> bool {
        self.ir_type().is_some()
    }

    /// Compare with unsigned predicates and shift logically.
    pub fn is_unsigned_like(self) -> bool {
        matches!(
            self,
            VariableType::Unsigned(_) | VariableType::Char | VariableType::Bool
        )
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableType::None => write!(f, "{{unknown}}"),
            VariableType::Int(w) => write!(f, "i{w}"),
            VariableType::Unsigned(w) => write!(f, "u{w}"),
            VariableType::Float(w) => write!(f, "f{w}"),
            VariableType::Char => write!(f, "char"),
            VariableType::Bool => write!(f, "bool"),
            VariableType::Void => write!(f, "void"),
            VariableType::Struct(id) => write!(f, "struct #{}", id.index()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalar_types_lower_to_backend_types() {
        assert_eq!(VariableType::Int(7).ir_type(), Some(IrType::Int(7)));
        assert_eq!(VariableType::Unsigned(64).ir_type(), Some(IrType::I64));
        assert_eq!(VariableType::Float(16).ir_type(), Some(IrType::Half));
        assert_eq!(VariableType::Float(128).ir_type(), Some(IrType::Fp128));
        assert_eq!(VariableType::Char.ir_type(), Some(IrType::I32));
        assert_eq!(VariableType::Bool.ir_type(), Some(IrType::BOOL));
    }

    #[test]
    fn non_scalar_types_have_no_storage() {
        assert_eq!(VariableType::Void.ir_type(), None);
        assert_eq!(VariableType::None.ir_type(), None);
        assert!(!VariableType::Struct(StructId::new(0)).is_scalar());
    }

    #[test]
    fn display_uses_source_spelling() {
        assert_eq!(VariableType::Unsigned(8).to_string(), "u8");
        assert_eq!(VariableType::Float(32).to_string(), "f32");
        assert_eq!(VariableType::Char.to_string(), "char");
    }
}
