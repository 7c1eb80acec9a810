//! Single-pass front end for Ember.
//!
//! There is no AST. Each function body is parsed, type checked and lowered
//! to SSA in one walk over the tokens: every expression is emitted through
//! a [`Backend`] as soon as its operands are known.
//!
//! Top-level items are read in three passes over the same token stream:
//! struct names, then function signatures and globals, then function
//! bodies. A body can therefore refer to any global or function in the file
//! regardless of declaration order.

pub mod backend;
mod error;
mod grammar;
mod options;
mod types;
pub mod unit;

pub use backend::{Backend, BackendTypes, IrType};
pub use error::CompileError;
pub use grammar::{Literal, Operand};
pub use options::{CompileOptions, DEFAULT_TARGET_TRIPLE};
pub use types::VariableType;
pub use unit::CompilationUnit;

use ember_diagnostic::ErrorCode;
use ember_ir::{Name, Span, Token, TokenKind};
use ember_lexer::TokenStream;

use unit::{FunctionId, ScopeId};

/// Compile `source` through `backend`, returning the populated symbol store.
///
/// On success the backend holds a verified module. On error it holds
/// whatever was emitted before the error and should be discarded.
pub fn compile<B: Backend>(
    source: &str,
    options: &CompileOptions,
    backend: &mut B,
) -> Result<CompilationUnit<B>, CompileError> {
    let mut parser = Parser::new(source, options, backend)?;
    parser.parse_module()?;
    parser.finish()
}

/// Parser state: the token stream, the symbol store and the builder.
pub(crate) struct Parser<'src, 'b, B: Backend> {
    tokens: TokenStream<'src>,
    unit: CompilationUnit<B>,
    builder: &'b mut B,
    options: CompileOptions,
    /// Function whose body is being emitted. Only meaningful in the body pass.
    function: FunctionId,
    /// Innermost open scope of `function`.
    scope: ScopeId,
}

impl<'src, 'b, B: Backend> Parser<'src, 'b, B> {
    /// Tokenize the first token of `source`.
    pub(crate) fn new(
        source: &'src str,
        options: &CompileOptions,
        builder: &'b mut B,
    ) -> Result<Self, CompileError> {
        let mut unit = CompilationUnit::new();
        let tokens = TokenStream::new(source, &mut unit.identifiers)?;
        Ok(Parser {
            tokens,
            unit,
            builder,
            options: options.clone(),
            function: FunctionId::new(0),
            scope: ScopeId::ROOT,
        })
    }

    /// Verify the module and hand back the symbol store.
    pub(crate) fn finish(self) -> Result<CompilationUnit<B>, CompileError> {
        let malformed = self.builder.codegen_error_count();
        if malformed > 0 {
            return Err(CompileError::backend(format!(
                "{malformed} malformed instruction(s) were requested during emission"
            )));
        }
        self.builder.verify().map_err(|message| {
            CompileError::backend(format!("module verification failed: {message}"))
        })?;
        Ok(self.unit)
    }

    // Token navigation

    #[inline]
    fn current(&self) -> &Token {
        self.tokens.current()
    }

    #[inline]
    fn current_kind(&self) -> &TokenKind {
        &self.tokens.current().kind
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.tokens.current().span
    }

    #[inline]
    fn peek_kind(&self) -> &TokenKind {
        &self.tokens.peek().kind
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind().same_kind(kind)
    }

    /// Move to the next token, returning the one just consumed.
    #[inline]
    fn advance(&mut self) -> Result<Token, CompileError> {
        Ok(self.tokens.advance(&mut self.unit.identifiers)?)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, CompileError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn expect_ident(&mut self) -> Result<(Name, Span), CompileError> {
        if let TokenKind::Ident(name) = *self.current_kind() {
            let span = self.advance()?.span;
            Ok((name, span))
        } else {
            Err(self.unexpected("an identifier"))
        }
    }

    /// Restart the token stream for another top-level pass.
    fn rewind(&mut self) -> Result<(), CompileError> {
        Ok(self.tokens.rewind(&mut self.unit.identifiers)?)
    }

    fn name_str(&self, name: Name) -> &str {
        self.unit.identifiers.resolve(name)
    }

    /// Backend prototype of the function being emitted.
    fn backend_function(&self) -> B::Function {
        self.unit.function(self.function).backend
    }

    /// Error for the current token not being `expected`.
    #[cold]
    fn unexpected(&self, expected: &str) -> CompileError {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            return CompileError::syntax(
                ErrorCode::E1003,
                format!("expected {expected}, found end of file"),
                token.span,
            );
        }
        let found = match token.kind {
            TokenKind::Ident(name) => format!("identifier `{}`", self.name_str(name)),
            ref kind => kind.to_string(),
        };
        CompileError::syntax(
            ErrorCode::E1001,
            format!("expected {expected}, found {found}"),
            token.span,
        )
    }

    /// Source spelling of a type, with struct names resolved.
    fn type_name(&self, ty: VariableType) -> String {
        match ty {
            VariableType::Struct(id) => self.name_str(self.unit.struct_type(id).name).to_owned(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests;
