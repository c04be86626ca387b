//! Centralised error hierarchy for the **Basil interpreter**.
//!
//! Every stage (preprocessor, scanner, parser, resolver, runtime) converts its
//! failure modes into one of the variants defined here, and each variant
//! renders itself in the user-facing diagnostic format:
//!
//! ```text
//! [line 3] Error at ';': Expect expression.
//! [line 7] Runtime Error: Operands must be numbers.
//! ```
//!
//! The compile-time stages accumulate their errors into [`Diagnostics`]; the
//! runtime stops at the first one.
//!
//! The module **does not** print diagnostics itself.

use std::io;
use thiserror::Error;

use log::debug;

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BasilError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error. `location` is either ` at 'lexeme'` or ` at end`.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        location: String,
        line: usize,
    },

    /// Static‑analysis failure found by the resolver.
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        location: String,
        line: usize,
    },

    /// Failure while splicing `import "path";` directives.
    #[error("[line {line}] Error: {message}")]
    Import { message: String, line: usize },

    /// Runtime evaluation error. Aborts the rest of the program.
    #[error("[line {line}] Runtime Error: {message}")]
    Runtime { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl BasilError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Lex error: line={}, msg={}", line, message);

        BasilError::Lex { message, line }
    }

    /// Helper constructor for the **parser**, located at `token`.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Parse error: line={}, msg={}", token.line, message);

        BasilError::Parse {
            message,
            location: location_of(token),
            line: token.line,
        }
    }

    /// Helper constructor for the **resolver**, located at `token`.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Resolve error: line={}, msg={}", token.line, message);

        BasilError::Resolve {
            message,
            location: location_of(token),
            line: token.line,
        }
    }

    /// Helper constructor for the **preprocessor**.
    pub fn import<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Import error: line={}, msg={}", line, message);

        BasilError::Import { message, line }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Runtime error: line={}, msg={}", line, message);

        BasilError::Runtime { message, line }
    }

    /// True for every error that is found before execution starts.
    pub fn is_compile_time(&self) -> bool {
        matches!(
            self,
            BasilError::Lex { .. }
                | BasilError::Parse { .. }
                | BasilError::Resolve { .. }
                | BasilError::Import { .. }
        )
    }

    /// Source line the error points at, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            BasilError::Lex { line, .. }
            | BasilError::Parse { line, .. }
            | BasilError::Resolve { line, .. }
            | BasilError::Import { line, .. }
            | BasilError::Runtime { line, .. } => Some(*line),
            BasilError::Io(_) => None,
        }
    }
}

fn location_of(token: &Token) -> String {
    if token.token_type == TokenType::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, BasilError>;

/// Accumulated compile‑time errors of one stage.
pub type Diagnostics = Vec<BasilError>;
