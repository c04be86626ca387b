//! The full pipeline: preprocess → scan → parse → resolve → interpret,
//! against one interpreter that outlives individual programs.

use std::io::Write;

use log::{debug, info};

use crate::ast::{ExprId, Stmt};
use crate::error::{BasilError, Diagnostics};
use crate::importer::{FsLoader, Importer, SourceLoader};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::token::Token;

/// How running a piece of source ended.
#[derive(Debug)]
pub enum Outcome {
    Ok,

    /// Nothing was executed.
    CompileErrors(Diagnostics),

    /// Execution stopped at this error; earlier side effects stand.
    RuntimeError(BasilError),
}

impl Outcome {
    /// Conventional process exit status: 65 compile errors, 70 runtime error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Ok => 0,
            Outcome::CompileErrors(_) => 65,
            Outcome::RuntimeError(_) => 70,
        }
    }
}

pub struct Session {
    interpreter: Interpreter,
    loader: Box<dyn SourceLoader>,
    next_id: ExprId,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session printing to stdout and importing from the filesystem.
    pub fn new() -> Self {
        Self::with_interpreter(Interpreter::new())
    }

    /// A session whose `print` output goes to `output`.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self::with_interpreter(Interpreter::with_output(output))
    }

    pub fn with_interpreter(interpreter: Interpreter) -> Self {
        info!("Session started");

        Self {
            interpreter,
            loader: Box::new(FsLoader),
            next_id: 0,
        }
    }

    /// Replace where `import` reads files from.
    pub fn with_loader(mut self, loader: Box<dyn SourceLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn interpreter(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// Compile and execute `source`.
    pub fn run(&mut self, source: &str) -> Outcome {
        let statements: Vec<Stmt> = match self.compile(source) {
            Ok(statements) => statements,
            Err(errors) => return Outcome::CompileErrors(errors),
        };

        match self.interpreter.interpret(&statements) {
            Ok(()) => Outcome::Ok,
            Err(e) => Outcome::RuntimeError(e),
        }
    }

    /// Everything short of execution. On success the resolved references are
    /// already registered with the interpreter.
    pub fn compile(&mut self, source: &str) -> std::result::Result<Vec<Stmt>, Diagnostics> {
        let statements: Vec<Stmt> = self.parse(source)?;

        let locals = Resolver::new().resolve(&statements)?;
        self.interpreter.add_locals(locals);

        Ok(statements)
    }

    /// Preprocess, scan and parse. Lexical and syntax errors are reported
    /// together.
    pub fn parse(&mut self, source: &str) -> std::result::Result<Vec<Stmt>, Diagnostics> {
        let source: String = Importer::new(self.loader.as_ref()).process(source)?;

        let mut tokens: Vec<Token> = Vec::new();
        let mut errors: Diagnostics = Vec::new();

        for item in Scanner::new(&source) {
            match item {
                Ok(token) => tokens.push(token),
                Err(e) => errors.push(e),
            }
        }

        let mut parser = Parser::with_first_id(&tokens, self.next_id);
        let parsed = parser.parse();
        self.next_id = parser.next_id();

        debug!("Next expression id: {}", self.next_id);

        match parsed {
            Ok(statements) if errors.is_empty() => Ok(statements),
            Ok(_) => Err(errors),
            Err(parse_errors) => {
                errors.extend(parse_errors);
                errors.sort_by_key(|e| e.line());
                Err(errors)
            }
        }
    }
}

/// Run `source` in a fresh session writing to `output`.
pub fn run_source(source: &str, output: Box<dyn Write>) -> Outcome {
    Session::with_output(output).run(source)
}
