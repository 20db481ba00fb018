//! Recursive-descent reader for the indentation-based source syntax.
//!
//! Statements dispatch on their leading token; expressions are parsed by
//! precedence climbing. Every explicit pair of parentheses becomes an
//! `Expr::Grouped` node so the writer can reproduce it exactly.

use super::lexer::tokenize;
use super::token::{Keyword, Op, Punct, Span, Token, TokenKind};
use crate::ir::*;
use crate::traits::{CompileError, Reader};

/// Static instance of the Python reader.
pub static PYTHON_READER: PythonReader = PythonReader;

/// Reader for the indentation-based source syntax.
pub struct PythonReader;

impl Reader for PythonReader {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn read(&self, source: &str) -> Result<Program, CompileError> {
        read_python(source)
    }
}

/// A required token or construct was not found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found} at {span}")]
pub struct ParseError {
    pub expected: String,
    pub found: String,
    pub span: Span,
}

/// Parse source into a syntax tree.
pub fn read_python(source: &str) -> Result<Program, CompileError> {
    let tokens = tokenize(source)?;
    let program = parse_tokens(&tokens)?;
    tracing::debug!(statements = program.body.len(), "parsed program");
    Ok(program)
}

/// Parse an already-lexed token stream. The stream must end with `Eof`.
pub fn parse_tokens(tokens: &[Token<'_>]) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Token<'a> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Token<'a> {
        let index = (self.pos + offset).min(self.tokens.len().saturating_sub(1));
        self.tokens
            .get(index)
            .copied()
            .unwrap_or(Token::new(TokenKind::Eof, "", Span::default()))
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token<'a>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(expected))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<String, ParseError> {
        Ok(self.expect(TokenKind::Ident, expected)?.text.to_string())
    }

    fn expect_newline(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Newline, "end of line")?;
        Ok(())
    }

    fn error(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError {
            expected: expected.to_string(),
            found: token.to_string(),
            span: token.span,
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        loop {
            while self.eat(TokenKind::Newline) {}
            if self.check(TokenKind::Eof) {
                break;
            }
            body.push(self.parse_statement()?);
        }
        Ok(Program::new(body))
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek().kind {
            TokenKind::Keyword(Keyword::Def) => self.parse_function(),
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::Class) => {
                Err(self.error("a statement (class declarations are not supported)"))
            }
            _ => self.parse_simple_statement(),
        }
    }

    /// Statements that fit on one line and end with a newline.
    fn parse_simple_statement(&mut self) -> Result<Stmt, ParseError> {
        if self.check(TokenKind::Keyword(Keyword::Return)) {
            return self.parse_return();
        }
        if self.check(TokenKind::Ident) && self.peek_at(1).kind == TokenKind::Op(Op::Assign) {
            return self.parse_assignment();
        }
        let expr = self.parse_expr()?;
        self.expect_newline()?;
        Ok(Stmt::expr(expr))
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let value = match self.peek().kind {
            TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof => None,
            _ => Some(self.parse_expr()?),
        };
        self.expect_newline()?;
        Ok(Stmt::return_stmt(value))
    }

    fn parse_assignment(&mut self) -> Result<Stmt, ParseError> {
        let mut targets = Vec::new();
        while self.check(TokenKind::Ident) && self.peek_at(1).kind == TokenKind::Op(Op::Assign) {
            targets.push(self.advance().text.to_string());
            self.advance();
        }
        let value = self.parse_expr()?;
        self.expect_newline()?;

        if targets.len() == 1 {
            let target = targets.remove(0);
            Ok(Stmt::assign(target, value))
        } else {
            Ok(Stmt::multi_assign(targets, value))
        }
    }

    fn parse_function(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let name = self.expect_ident("function name")?;
        self.expect(TokenKind::Punct(Punct::LParen), "'('")?;
        let params = self.parse_comma_list(Punct::RParen, Self::parse_param)?;
        self.expect(TokenKind::Punct(Punct::Colon), "':'")?;
        let body = self.parse_block()?;
        Ok(Stmt::Function(Function::new(name, params, body)))
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let mut branches = vec![self.parse_branch()?];
        while self.eat(TokenKind::Keyword(Keyword::Elif)) {
            branches.push(self.parse_branch()?);
        }
        let orelse = if self.eat(TokenKind::Keyword(Keyword::Else)) {
            self.expect(TokenKind::Punct(Punct::Colon), "':'")?;
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::If(IfChain { branches, orelse }))
    }

    /// `<test>: <block>`, after the `if`/`elif` keyword.
    fn parse_branch(&mut self) -> Result<Branch, ParseError> {
        let test = self.parse_expr()?;
        self.expect(TokenKind::Punct(Punct::Colon), "':'")?;
        let body = self.parse_block()?;
        Ok(Branch { test, body })
    }

    /// The body after a colon: an indented block, or one simple statement on
    /// the same line.
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if !self.eat(TokenKind::Newline) {
            return Ok(vec![self.parse_simple_statement()?]);
        }
        self.expect(TokenKind::Indent, "an indented block")?;
        let mut body = Vec::new();
        while !self.check(TokenKind::Dedent) && !self.check(TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }
        self.expect(TokenKind::Dedent, "end of block")?;
        Ok(body)
    }

    // ------------------------------------------------------------------
    // Expressions, lowest precedence first
    // ------------------------------------------------------------------

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::Keyword(Keyword::Lambda)) {
            return self.parse_lambda();
        }
        self.parse_or()
    }

    fn parse_lambda(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        let mut params = Vec::new();
        while !self.check(TokenKind::Punct(Punct::Colon)) {
            params.push(self.parse_param()?);
            if !self.eat(TokenKind::Punct(Punct::Comma)) {
                break;
            }
        }
        self.expect(TokenKind::Punct(Punct::Colon), "':'")?;
        let body = self.parse_expr()?;
        Ok(Expr::lambda(params, body))
    }

    fn parse_param(&mut self) -> Result<String, ParseError> {
        self.expect_ident("parameter name")
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat(TokenKind::Keyword(Keyword::Or)) {
            let right = self.parse_and()?;
            left = Expr::binary(left, BinaryOp::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        while self.eat(TokenKind::Keyword(Keyword::And)) {
            let right = self.parse_comparison()?;
            left = Expr::binary(left, BinaryOp::And, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Keyword(Keyword::Is) => {
                    self.advance();
                    if self.eat(TokenKind::Keyword(Keyword::Not)) {
                        BinaryOp::IsNot
                    } else {
                        BinaryOp::Is
                    }
                }
                TokenKind::Op(op) => match comparison_op(op) {
                    Some(op) => {
                        self.advance();
                        op
                    }
                    None => break,
                },
                _ => break,
            };
            let right = self.parse_additive()?;
            left = Expr::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Op(Op::Plus) => BinaryOp::Add,
                TokenKind::Op(Op::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Op(Op::Star) => BinaryOp::Mul,
                TokenKind::Op(Op::Slash) => BinaryOp::Div,
                TokenKind::Op(Op::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Keyword(Keyword::Not) => UnaryOp::Not,
            TokenKind::Op(Op::Minus) => UnaryOp::Neg,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::unary(op, operand))
    }

    /// Calls, attribute access and indexing.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek().kind {
                TokenKind::Punct(Punct::LParen) => {
                    self.advance();
                    let args = self.parse_comma_list(Punct::RParen, Self::parse_expr)?;
                    expr = Expr::call(expr, args);
                }
                TokenKind::Punct(Punct::Dot) => {
                    self.advance();
                    let name = self.expect_ident("attribute name")?;
                    expr = Expr::attribute(expr, name);
                }
                TokenKind::Punct(Punct::LBracket) => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::Punct(Punct::RBracket), "']'")?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek();
        let expr = match token.kind {
            TokenKind::Number => Expr::number(token.text),
            TokenKind::String => Expr::string(token.text),
            TokenKind::Ident => Expr::ident(token.text),
            TokenKind::Keyword(Keyword::None) => Expr::None,
            TokenKind::Keyword(Keyword::True) => Expr::Bool { value: true },
            TokenKind::Keyword(Keyword::False) => Expr::Bool { value: false },
            TokenKind::Punct(Punct::LParen) => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::Punct(Punct::RParen), "')'")?;
                return Ok(Expr::grouped(inner));
            }
            TokenKind::Punct(Punct::LBracket) => {
                self.advance();
                let items = self.parse_comma_list(Punct::RBracket, Self::parse_expr)?;
                return Ok(Expr::List { items });
            }
            TokenKind::Punct(Punct::LBrace) => {
                self.advance();
                let entries = self.parse_comma_list(Punct::RBrace, Self::parse_entry)?;
                return Ok(Expr::Dict { entries });
            }
            _ => return Err(self.error("an expression")),
        };
        self.advance();
        Ok(expr)
    }

    /// `key: value` inside a dict literal. An identifier key is a property
    /// name, not a variable reference.
    fn parse_entry(&mut self) -> Result<(Expr, Expr), ParseError> {
        let token = self.peek();
        let key = match token.kind {
            TokenKind::String => Expr::string(token.text),
            TokenKind::Ident => Expr::ident(token.text),
            _ => return Err(self.error("a string or identifier dict key")),
        };
        self.advance();
        self.expect(TokenKind::Punct(Punct::Colon), "':'")?;
        let value = self.parse_expr()?;
        Ok((key, value))
    }

    /// Comma-separated items up to and including `close`. A trailing comma is
    /// allowed.
    fn parse_comma_list<T>(
        &mut self,
        close: Punct,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();
        while !self.check(TokenKind::Punct(close)) {
            items.push(item(self)?);
            if !self.eat(TokenKind::Punct(Punct::Comma)) {
                break;
            }
        }
        self.expect(TokenKind::Punct(close), close.quoted())?;
        Ok(items)
    }
}

fn comparison_op(op: Op) -> Option<BinaryOp> {
    match op {
        Op::EqEq => Some(BinaryOp::Eq),
        Op::NotEq => Some(BinaryOp::Ne),
        Op::Lt => Some(BinaryOp::Lt),
        Op::LtEq => Some(BinaryOp::Le),
        Op::Gt => Some(BinaryOp::Gt),
        Op::GtEq => Some(BinaryOp::Ge),
        Op::Plus | Op::Minus | Op::Star | Op::Slash | Op::Percent | Op::Assign => None,
    }
}
