//! Traits for the reader and writer halves of the pipeline.

use crate::input::lexer::LexError;
use crate::input::python::ParseError;
use crate::ir::Program;

/// Error that can occur when compiling source code.
///
/// Both kinds are terminal: no output is produced once either is raised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// A reader parses source code into the syntax tree.
pub trait Reader: Send + Sync {
    /// Language identifier (e.g., "python").
    fn language(&self) -> &'static str;

    /// File extensions this reader handles (e.g., &["py"]).
    fn extensions(&self) -> &'static [&'static str];

    /// Parse source code into the tree.
    fn read(&self, source: &str) -> Result<Program, CompileError>;
}

/// A writer emits the syntax tree as source code in a target language.
pub trait Writer: Send + Sync {
    /// Language identifier (e.g., "javascript").
    fn language(&self) -> &'static str;

    /// File extension for output (e.g., "js").
    fn extension(&self) -> &'static str;

    /// Emit the tree as source code.
    fn write(&self, program: &Program) -> String;
}
