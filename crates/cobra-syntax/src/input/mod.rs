//! Input side: lexing and parsing source code into the syntax tree.

pub mod lexer;
pub mod python;
pub mod token;

pub use lexer::{LexError, tokenize};
pub use python::{PYTHON_READER, ParseError, PythonReader, parse_tokens, read_python};
pub use token::{Span, Token, TokenKind};
