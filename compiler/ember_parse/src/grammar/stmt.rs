//! Statements, blocks and function bodies.
//!
//! Local storage is always allocated at the top of the entry block, wherever
//! the declaration appears, so every alloca dominates every use. Control flow
//! is lowered directly to basic blocks:
//!
//! ```text
//! while c { body }          if c { a } else { b }
//!
//!   br while_condition        <cond>
//! while_condition:            br c, if_then, if_else
//!   <cond>                  if_then:
//!   br c, while_body,         <a>
//!         while_exit          br if_merge
//! while_body:               if_else:
//!   <body>                    <b>
//!   br while_condition        br if_merge
//! while_exit:               if_merge:
//! ```
//!
//! The conditional branch is only added once the arms have been emitted,
//! because the target blocks do not exist while the condition is parsed.

use ember_diagnostic::ErrorCode;
use ember_ir::{Span, TokenKind};

use crate::backend::{Backend, IrType};
use crate::unit::{FunctionId, Variable, VariableRef};
use crate::{CompileError, Parser, VariableType};

impl<B: Backend> Parser<'_, '_, B> {
    /// Emit the body of `id`. The stream is on the function's `fn`.
    pub(crate) fn emit_function(&mut self, id: FunctionId) -> Result<(), CompileError> {
        // The signature was read in the previous pass.
        while !self.check(&TokenKind::LBrace) {
            if self.check(&TokenKind::Eof) {
                return Err(self.unexpected("`{`"));
            }
            self.advance()?;
        }

        let backend = self.unit.function(id).backend;
        tracing::debug!(function = self.name_str(self.unit.function(id).name), "emitting body");

        let entry = self.builder.append_block(backend, "entry");
        self.builder.position_at_end(entry);
        self.unit.function_mut(id).entry = Some(entry);
        self.function = id;
        self.scope = self.unit.add_scope(id, None);

        // Parameters are copied into allocas so they can be assigned.
        for index in 0..self.unit.function(id).parameters.len() {
            let param = VariableRef::Parameter {
                function: id,
                index: u32::try_from(index).unwrap_or(u32::MAX),
            };
            let variable = self.unit.variable(param);
            let Some(ir) = variable.ty.ir_type() else {
                continue;
            };
            let label = format!("{}.addr", self.name_str(variable.name));
            let slot = self.builder.create_entry_alloca(backend, &label, ir);
            if let Some(incoming) = self.builder.param(backend, index) {
                self.builder.store(incoming, slot);
            }
            self.unit.variable_mut(param).storage = Some(slot);
        }

        self.expect(&TokenKind::LBrace)?;
        let close = self.parse_block_statements()?;
        self.emit_implicit_return(id, entry, close)?;

        self.builder.clear_position();
        Ok(())
    }

    /// Terminate a body that falls off its end.
    fn emit_implicit_return(
        &mut self,
        id: FunctionId,
        entry: B::Block,
        close: Span,
    ) -> Result<(), CompileError> {
        if self.builder.current_block_terminated() {
            return Ok(());
        }
        let function = self.unit.function(id);
        let return_type = function.return_type;
        let is_entry = self.name_str(function.name) == self.options.entry_point;

        if is_entry {
            let ir = return_type.ir_type().unwrap_or(IrType::I32);
            let zero = self.builder.const_int(ir, 0);
            self.builder.ret(zero);
        } else if return_type == VariableType::Void {
            self.builder.ret_void();
        } else if self
            .builder
            .current_block()
            .is_some_and(|block| block != entry && !self.builder.block_has_predecessors(block))
        {
            self.builder.unreachable();
        } else {
            return Err(CompileError::semantic(
                ErrorCode::E2011,
                format!(
                    "function `{}` can reach its end without returning a `{}`",
                    self.name_str(function.name),
                    self.type_name(return_type)
                ),
                close,
            ));
        }
        Ok(())
    }

    /// Statements up to and including the closing `}`; returns its span.
    pub(crate) fn parse_block_statements(&mut self) -> Result<Span, CompileError> {
        ember_stack::ensure_sufficient_stack(|| loop {
            match self.current_kind() {
                TokenKind::RBrace => return Ok(self.advance()?.span),
                TokenKind::Eof => {
                    return Err(CompileError::syntax(
                        ErrorCode::E1004,
                        "unexpected end of file inside a block: missing `}`",
                        self.current_span(),
                    ));
                }
                _ => self.parse_statement()?,
            }
        })
    }

    fn parse_statement(&mut self) -> Result<(), CompileError> {
        // Code after a `return` still has to be emitted somewhere.
        if self.builder.current_block_terminated() {
            let backend = self.backend_function();
            let dead = self.builder.append_block(backend, "after_return");
            self.builder.position_at_end(dead);
        }

        match self.current_kind() {
            TokenKind::Ident(_) if self.peek_kind().same_kind(&TokenKind::Colon) => {
                self.parse_declaration()
            }
            TokenKind::While => self.parse_while(),
            TokenKind::If => self.parse_if(),
            TokenKind::Return => self.parse_return(),
            TokenKind::LBrace => {
                self.advance()?;
                self.in_child_scope(|p| p.parse_block_statements().map(|_| ()))
            }
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(())
            }
            TokenKind::Fn | TokenKind::Struct | TokenKind::For | TokenKind::Else => {
                Err(self.unexpected("a statement"))
            }
            _ => {
                self.parse_expression(&TokenKind::Semicolon, 0, VariableType::None)?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(())
            }
        }
    }

    /// Run `f` with a fresh scope nested in the current one.
    fn in_child_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        let parent = self.scope;
        self.scope = self.unit.add_scope(self.function, Some(parent));
        let result = f(self);
        self.scope = parent;
        result
    }

    /// `name: T [= expr];`
    fn parse_declaration(&mut self) -> Result<(), CompileError> {
        let (name, span) = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        if self.unit.find_in_scope(self.function, self.scope, name).is_some() {
            return Err(CompileError::semantic(
                ErrorCode::E2006,
                format!("`{}` is already declared in this scope", self.name_str(name)),
                span,
            ));
        }
        let (ty, ty_span) = self.parse_type()?;
        let ir = self.storage_type(ty, ty_span)?;

        let backend = self.backend_function();
        let slot = self
            .builder
            .create_entry_alloca(backend, self.unit.identifiers.resolve(name), ir);
        let mut variable = Variable::new(name, ty, span);
        variable.storage = Some(slot);
        self.unit
            .add_scope_variable(self.function, self.scope, variable);

        if self.check(&TokenKind::Eq) {
            self.advance()?;
            let value = self.parse_value(&TokenKind::Semicolon, ty)?;
            self.builder.store(value, slot);
        }
        self.expect(&TokenKind::Semicolon)?;
        Ok(())
    }

    /// `while cond { body }`
    fn parse_while(&mut self) -> Result<(), CompileError> {
        self.expect(&TokenKind::While)?;
        let backend = self.backend_function();

        let cond_block = self.builder.append_block(backend, "while_condition");
        self.builder.br(cond_block);
        self.builder.position_at_end(cond_block);
        let cond = self.parse_value(&TokenKind::LBrace, VariableType::Bool)?;
        let cond_end = self.current_block_or_error()?;

        let body_block = self.builder.append_block(backend, "while_body");
        self.builder.position_at_end(body_block);
        self.expect(&TokenKind::LBrace)?;
        self.in_child_scope(|p| p.parse_block_statements())?;
        if !self.builder.current_block_terminated() {
            self.builder.br(cond_block);
        }

        let exit_block = self.builder.append_block(backend, "while_exit");
        self.builder.position_at_end(cond_end);
        self.builder.cond_br(cond, body_block, exit_block);
        self.builder.position_at_end(exit_block);
        Ok(())
    }

    /// `if cond { ... } [else { ... } | else if ...]`
    fn parse_if(&mut self) -> Result<(), CompileError> {
        self.expect(&TokenKind::If)?;
        let backend = self.backend_function();

        let cond = self.parse_value(&TokenKind::LBrace, VariableType::Bool)?;
        let cond_end = self.current_block_or_error()?;

        let then_block = self.builder.append_block(backend, "if_then");
        self.builder.position_at_end(then_block);
        self.expect(&TokenKind::LBrace)?;
        self.in_child_scope(|p| p.parse_block_statements())?;
        let then_end = self.open_block();

        let (else_block, else_end) = if self.check(&TokenKind::Else) {
            self.advance()?;
            let else_block = self.builder.append_block(backend, "if_else");
            self.builder.position_at_end(else_block);
            if self.check(&TokenKind::If) {
                self.in_child_scope(|p| {
                    ember_stack::ensure_sufficient_stack(|| p.parse_if())
                })?;
            } else {
                self.expect(&TokenKind::LBrace)?;
                self.in_child_scope(|p| p.parse_block_statements())?;
            }
            (Some(else_block), self.open_block())
        } else {
            (None, None)
        };

        let merge_block = self.builder.append_block(backend, "if_merge");
        for arm_end in [then_end, else_end].into_iter().flatten() {
            self.builder.position_at_end(arm_end);
            self.builder.br(merge_block);
        }
        self.builder.position_at_end(cond_end);
        self.builder
            .cond_br(cond, then_block, else_block.unwrap_or(merge_block));
        self.builder.position_at_end(merge_block);
        Ok(())
    }

    /// `return;` or `return expr;`
    fn parse_return(&mut self) -> Result<(), CompileError> {
        let span = self.expect(&TokenKind::Return)?.span;
        let function = self.unit.function(self.function);
        let return_type = function.return_type;
        let function_name = self.name_str(function.name).to_owned();

        if self.check(&TokenKind::Semicolon) {
            if return_type != VariableType::Void {
                return Err(CompileError::semantic(
                    ErrorCode::E2012,
                    format!(
                        "`return;` in function `{function_name}`, which returns `{}`",
                        self.type_name(return_type)
                    ),
                    span,
                ));
            }
            self.advance()?;
            self.builder.ret_void();
            return Ok(());
        }

        if return_type == VariableType::Void {
            return Err(CompileError::semantic(
                ErrorCode::E2012,
                format!("function `{function_name}` has no return type but returns a value"),
                span,
            ));
        }
        let value = self.parse_value(&TokenKind::Semicolon, return_type)?;
        self.expect(&TokenKind::Semicolon)?;
        self.builder.ret(value);
        Ok(())
    }

    /// The current block if it still needs a terminator.
    fn open_block(&self) -> Option<B::Block> {
        if self.builder.current_block_terminated() {
            None
        } else {
            self.builder.current_block()
        }
    }

    fn current_block_or_error(&self) -> Result<B::Block, CompileError> {
        self.builder
            .current_block()
            .ok_or_else(|| CompileError::backend("no insertion block while emitting a statement"))
    }
}
