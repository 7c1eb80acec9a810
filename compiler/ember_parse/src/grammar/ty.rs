//! Type parsing.

use ember_diagnostic::ErrorCode;
use ember_ir::{Span, TokenKind};

use crate::backend::{Backend, IrType};
use crate::{CompileError, Parser, VariableType};

impl<B: Backend> Parser<'_, '_, B> {
    /// Parse a type spelling: `iN`, `uN`, `fN`, `bool`, `char` or a struct name.
    pub(crate) fn parse_type(&mut self) -> Result<(VariableType, Span), CompileError> {
        let span = self.current_span();
        let ty = match *self.current_kind() {
            TokenKind::IntType(width) => VariableType::Int(check_int_width(width, 'i', span)?),
            TokenKind::UnsignedType(width) => {
                VariableType::Unsigned(check_int_width(width, 'u', span)?)
            }
            TokenKind::FloatType(width) => {
                if IrType::float_of_width(width).is_none() {
                    return Err(CompileError::syntax(
                        ErrorCode::E1002,
                        format!("invalid floating type `f{width}`: width must be 16, 32, 64 or 128"),
                        span,
                    ));
                }
                VariableType::Float(width)
            }
            TokenKind::BoolType => VariableType::Bool,
            TokenKind::CharType => VariableType::Char,
            TokenKind::Ident(name) => match self.unit.find_struct(name) {
                Some(id) => VariableType::Struct(id),
                None => {
                    return Err(CompileError::semantic(
                        ErrorCode::E2013,
                        format!("cannot find type `{}`", self.name_str(name)),
                        span,
                    ));
                }
            },
            _ => return Err(self.unexpected("a type")),
        };
        self.advance()?;
        Ok((ty, span))
    }

    /// Backend type for a variable of type `ty`; only scalars have storage.
    pub(crate) fn storage_type(&self, ty: VariableType, span: Span) -> Result<IrType, CompileError> {
        ty.ir_type().ok_or_else(|| {
            CompileError::semantic(
                ErrorCode::E2007,
                format!("variables of type `{}` are not supported", self.type_name(ty)),
                span,
            )
        })
    }
}

fn check_int_width(width: u32, prefix: char, span: Span) -> Result<u32, CompileError> {
    if (1..=VariableType::MAX_INT_WIDTH).contains(&width) {
        Ok(width)
    } else {
        Err(CompileError::syntax(
            ErrorCode::E1002,
            format!(
                "invalid integer type `{prefix}{width}`: width must be between 1 and {}",
                VariableType::MAX_INT_WIDTH
            ),
            span,
        ))
    }
}
