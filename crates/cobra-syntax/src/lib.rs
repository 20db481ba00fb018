//! Compile an indentation-based scripting syntax to JavaScript.
//!
//! `cobra-syntax` reads a restricted Python-like syntax and writes
//! JavaScript with a fixed, byte-exact layout.
//!
//! # Architecture
//!
//! ```text
//! source ─> lexer ─> tokens ─> parser ─> Program ─┬─> scope ─┐
//!          (input)             (input)   (ir.rs)  └──────────┴─> writer ─> JavaScript
//!                                                                (output)
//! ```
//!
//! The pipeline is a single forward pass. The writer asks the scope collector
//! for the hoisted names of each body as it reaches that body.
//!
//! # Example
//!
//! ```
//! let js = cobra_syntax::compile("x = y = 2").unwrap();
//! assert_eq!(js, "var x, y;\nx = y = 2;");
//! ```
//!
//! # Note on Translation Fidelity
//!
//! This is a syntactic translation. Number and string literals are copied
//! verbatim and explicit parentheses are reproduced exactly; no semantic
//! rewriting takes place.

use std::borrow::Cow;

pub mod input;
pub mod ir;
pub mod output;
pub mod scope;
pub mod traits;

// Re-exports: tree types
pub use ir::{BinaryOp, Branch, Expr, Function, IfChain, Program, Stmt, StructureEq, UnaryOp};

// Re-exports: traits and errors
pub use traits::{CompileError, Reader, Writer};

// Re-exports: pipeline stages
pub use input::{LexError, PYTHON_READER, ParseError, PythonReader, read_python, tokenize};
pub use output::{JAVASCRIPT_WRITER, JavaScriptWriter};
pub use scope::Scope;

/// Knobs for [`compile_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Strip indentation common to every line before lexing, so sources
    /// embedded in indented string literals compile as written.
    pub dedent: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { dedent: true }
    }
}

impl CompileOptions {
    /// Apply source-level preprocessing ahead of lexing.
    pub fn prepare<'a>(&self, source: &'a str) -> Cow<'a, str> {
        if self.dedent {
            Cow::Owned(textwrap::dedent(source))
        } else {
            Cow::Borrowed(source)
        }
    }
}

/// Compile source text to JavaScript with default options.
pub fn compile(source: &str) -> Result<String, CompileError> {
    compile_with(source, CompileOptions::default())
}

/// Compile source text to JavaScript.
pub fn compile_with(source: &str, options: CompileOptions) -> Result<String, CompileError> {
    let _span = tracing::debug_span!("compile", bytes = source.len()).entered();

    let source = options.prepare(source);
    let program = PYTHON_READER.read(&source)?;
    Ok(JAVASCRIPT_WRITER.write(&program))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedent_is_optional() {
        let source = "\n    x = 2\n";
        assert_eq!(compile(source).unwrap(), "var x;\nx = 2;");

        let err = compile_with(source, CompileOptions { dedent: false }).unwrap_err();
        assert!(matches!(err, CompileError::Parse(ref e) if e.found == "indent"));
    }

    #[test]
    fn test_errors_display_their_kind() {
        let err = compile("x = \"abc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "lex error: unterminated string literal at line 1, column 5"
        );

        let err = compile("class A:\n    x = 1").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("parse error: expected a statement"));
    }

    #[test]
    fn test_reader_and_writer_metadata() {
        assert_eq!(PYTHON_READER.language(), "python");
        assert_eq!(PYTHON_READER.extensions(), &["py"]);
        assert_eq!(JAVASCRIPT_WRITER.extension(), "js");
    }
}
