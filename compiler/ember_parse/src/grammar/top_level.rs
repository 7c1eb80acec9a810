//! Top-level items: structs, functions and globals.
//!
//! The file is scanned three times. Each pass rewinds the token stream to the
//! start; the identifier table is not reset, so a name keeps its id across
//! passes.
//!
//! 1. Struct pass: register struct names, skip everything else.
//! 2. Signature pass: register function prototypes and globals.
//! 3. Body pass: emit every function body.

use ember_diagnostic::ErrorCode;
use ember_ir::{Name, Span, TokenKind};

use crate::backend::{Backend, Constant, IrType};
use crate::unit::{Function, FunctionId, StructType, Variable};
use crate::{CompileError, Literal, Parser, VariableType};

impl<B: Backend> Parser<'_, '_, B> {
    /// Run all three passes over the source.
    pub(crate) fn parse_module(&mut self) -> Result<(), CompileError> {
        self.struct_pass()?;
        self.rewind()?;
        self.signature_pass()?;
        self.rewind()?;
        self.body_pass()
    }

    fn struct_pass(&mut self) -> Result<(), CompileError> {
        tracing::debug!("struct pass");
        loop {
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::Struct => {
                    self.advance()?;
                    let (name, span) = self.expect_ident()?;
                    self.check_top_level_unique(name, span)?;
                    let id = self.unit.add_struct(StructType { name, span });
                    tracing::trace!(name = self.name_str(name), id = id.index(), "struct registered");
                    self.skip_scope()?;
                }
                TokenKind::Fn => self.skip_function()?,
                TokenKind::Ident(_) => self.skip_global()?,
                _ => return Err(self.unexpected("`fn`, `struct` or a global declaration")),
            }
        }
        tracing::debug!(structs = self.unit.struct_count(), "struct pass done");
        Ok(())
    }

    fn signature_pass(&mut self) -> Result<(), CompileError> {
        tracing::debug!("signature pass");
        loop {
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::Struct => {
                    self.advance()?;
                    self.expect_ident()?;
                    self.skip_scope()?;
                }
                TokenKind::Fn => self.parse_signature()?,
                TokenKind::Ident(_) => self.parse_global()?,
                _ => return Err(self.unexpected("`fn`, `struct` or a global declaration")),
            }
        }
        tracing::debug!(
            functions = self.unit.function_count(),
            globals = self.unit.global_count(),
            "signature pass done"
        );
        Ok(())
    }

    fn body_pass(&mut self) -> Result<(), CompileError> {
        tracing::debug!("body pass");
        // Functions were registered in source order, so the n-th `fn` is id n.
        let mut next = 0u32;
        loop {
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::Struct => {
                    self.advance()?;
                    self.expect_ident()?;
                    self.skip_scope()?;
                }
                TokenKind::Fn => {
                    self.emit_function(FunctionId::new(next))?;
                    next += 1;
                }
                TokenKind::Ident(_) => self.skip_global()?,
                _ => return Err(self.unexpected("`fn`, `struct` or a global declaration")),
            }
        }
        Ok(())
    }

    /// `fn name(p: T, ...) [-> T] { ... }`: register the prototype, skip the body.
    fn parse_signature(&mut self) -> Result<(), CompileError> {
        self.expect(&TokenKind::Fn)?;
        let (name, name_span) = self.expect_ident()?;
        self.check_top_level_unique(name, name_span)?;

        self.expect(&TokenKind::LParen)?;
        let mut params: Vec<Variable<B>> = Vec::new();
        while !self.check(&TokenKind::RParen) {
            if !params.is_empty() {
                self.expect(&TokenKind::Comma)?;
            }
            let (param, span) = self.expect_ident()?;
            self.expect(&TokenKind::Colon)?;
            let (ty, ty_span) = self.parse_type()?;
            self.storage_type(ty, ty_span)?;
            if params.iter().any(|p| p.name == param) {
                return Err(CompileError::semantic(
                    ErrorCode::E2006,
                    format!("parameter `{}` is declared more than once", self.name_str(param)),
                    span,
                ));
            }
            params.push(Variable::new(param, ty, span));
        }
        self.expect(&TokenKind::RParen)?;

        let is_entry = self.name_str(name) == self.options.entry_point;
        let return_type = if self.check(&TokenKind::Arrow) {
            self.advance()?;
            let (ty, span) = self.parse_type()?;
            if is_entry && !ty.is_integer() {
                return Err(CompileError::semantic(
                    ErrorCode::E2010,
                    format!(
                        "`{}` must return an integer type, found `{}`",
                        self.options.entry_point,
                        self.type_name(ty)
                    ),
                    span,
                ));
            }
            self.storage_type(ty, span)?;
            ty
        } else if is_entry {
            VariableType::Int(32)
        } else {
            VariableType::Void
        };

        let param_types: Vec<IrType> = params.iter().filter_map(|p| p.ty.ir_type()).collect();
        let ret = return_type.ir_type().unwrap_or(IrType::Void);
        let backend = self
            .builder
            .declare_function(self.unit.identifiers.resolve(name), &param_types, ret);
        for (index, param) in params.iter().enumerate() {
            if let Some(value) = self.builder.param(backend, index) {
                self.builder
                    .set_value_name(value, self.unit.identifiers.resolve(param.name));
            }
        }

        let id = self
            .unit
            .add_function(Function::new(name, return_type, backend, name_span));
        for param in params {
            self.unit.add_parameter(id, param);
        }
        tracing::trace!(
            name = self.name_str(name),
            ret = %return_type,
            "function signature registered"
        );

        self.skip_scope()
    }

    /// `name: T [= literal];` at the top level.
    fn parse_global(&mut self) -> Result<(), CompileError> {
        let (name, span) = self.expect_ident()?;
        self.check_top_level_unique(name, span)?;
        self.expect(&TokenKind::Colon)?;
        let (ty, ty_span) = self.parse_type()?;
        let ir = self.storage_type(ty, ty_span)?;

        let init = if self.check(&TokenKind::Eq) {
            self.advance()?;
            self.parse_constant(ty)?
        } else if ir.is_float() {
            Constant::Float(0.0)
        } else {
            Constant::Int(0)
        };
        self.expect(&TokenKind::Semicolon)?;

        let storage = self
            .builder
            .add_global(self.unit.identifiers.resolve(name), ir, init);
        let mut variable = Variable::new(name, ty, span);
        variable.storage = Some(storage);
        self.unit.add_global(variable);
        tracing::trace!(name = self.name_str(name), %ty, "global registered");
        Ok(())
    }

    /// A global initializer: a literal, optionally negated.
    fn parse_constant(&mut self, ty: VariableType) -> Result<Constant, CompileError> {
        let start = self.current_span();
        let negate = self.check(&TokenKind::Minus);
        if negate {
            self.advance()?;
        }
        let literal = match *self.current_kind() {
            TokenKind::Int(v) => Literal::Int(i128::from(v)),
            TokenKind::Float(v) => Literal::Float(v),
            TokenKind::Char(c) => Literal::Char(c),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            _ => return Err(self.unexpected("a literal initializer")),
        };
        let span = start.merge(self.advance()?.span);
        let literal = if negate {
            self.negate_literal(literal, span)?
        } else {
            literal
        };
        self.literal_constant(literal, ty, span)
    }

    /// Reject a second top-level item with an existing name.
    fn check_top_level_unique(&self, name: Name, span: Span) -> Result<(), CompileError> {
        match self.unit.find_top_level(name) {
            Some(_) => Err(CompileError::semantic(
                ErrorCode::E2006,
                format!("`{}` is defined more than once", self.name_str(name)),
                span,
            )),
            None => Ok(()),
        }
    }

    /// Skip from `fn` to the end of its body.
    fn skip_function(&mut self) -> Result<(), CompileError> {
        while !self.check(&TokenKind::LBrace) {
            if self.check(&TokenKind::Eof) {
                return Err(self.unexpected("`{`"));
            }
            self.advance()?;
        }
        self.skip_scope()
    }

    /// Skip a top-level declaration through its `;`.
    fn skip_global(&mut self) -> Result<(), CompileError> {
        while !self.check(&TokenKind::Semicolon) {
            if self.check(&TokenKind::Eof) {
                return Err(self.unexpected("`;`"));
            }
            self.advance()?;
        }
        self.advance()?;
        Ok(())
    }

    /// Skip a brace-delimited scope, nested scopes included.
    ///
    /// Starts on `{` and stops after the matching `}`.
    pub(crate) fn skip_scope(&mut self) -> Result<(), CompileError> {
        let open = self.expect(&TokenKind::LBrace)?.span;
        let mut depth = 1usize;
        while depth > 0 {
            match self.current_kind() {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Eof => {
                    return Err(CompileError::syntax(
                        ErrorCode::E1004,
                        "hit end of file while skipping over scope",
                        open,
                    ));
                }
                _ => {}
            }
            self.advance()?;
        }
        Ok(())
    }
}
