pub mod ast;
pub mod ast_printer;
pub mod environment;
pub mod error;
pub mod importer;
pub mod interpreter;
pub mod natives;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod session;
pub mod token;
pub mod value;

pub use error::{BasilError, Diagnostics, Result};
pub use session::{run_source, Outcome, Session};
