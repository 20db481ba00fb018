//! Indentation-aware lexer.
//!
//! Source is processed one physical line at a time. Leading whitespace of each
//! logical line is compared against a stack of open indentation widths and
//! turned into `Indent`/`Dedent` tokens, so the parser never looks at
//! whitespace. Inside `()`, `[]` and `{}` line breaks are not significant.

use super::token::{Keyword, Punct, SYMBOLS, Span, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("inconsistent dedent to width {width} at line {line}, column {column}")]
    InconsistentDedent {
        width: usize,
        line: usize,
        column: usize,
    },

    #[error("unterminated string literal at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("unterminated number literal '{text}' at line {line}, column {column}")]
    UnterminatedNumber {
        text: String,
        line: usize,
        column: usize,
    },

    #[error("tab in indentation at line {line}, column {column}")]
    TabIndentation { line: usize, column: usize },

    #[error("unexpected character '{character}' at line {line}, column {column}")]
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
    },
}

impl LexError {
    pub fn span(&self) -> Span {
        match *self {
            LexError::InconsistentDedent { line, column, .. }
            | LexError::UnterminatedString { line, column }
            | LexError::UnterminatedNumber { line, column, .. }
            | LexError::TabIndentation { line, column }
            | LexError::UnexpectedCharacter { line, column, .. } => Span::new(line, column),
        }
    }
}

/// Split source text into tokens, ending with `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    let tokens = Lexer::new(source).run()?;
    tracing::debug!(tokens = tokens.len(), "lexed source");
    Ok(tokens)
}

struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    indent_stack: Vec<usize>,
    /// Open brackets; while non-zero, newlines and indentation are ignored.
    bracket_depth: usize,
    /// Content tokens were emitted since the last `Newline`.
    line_open: bool,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            indent_stack: vec![0],
            bracket_depth: 0,
            line_open: false,
        }
    }

    fn run(mut self) -> Result<Vec<Token<'a>>, LexError> {
        let mut last_line = 1;
        for (index, raw) in self.source.split('\n').enumerate() {
            let line_no = index + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            last_line = line_no;

            let mut start = 0;
            if self.bracket_depth == 0 {
                let rest = line.trim_start_matches([' ', '\t']);
                if rest.is_empty() || rest.starts_with('#') {
                    continue;
                }
                start = line.len() - rest.len();
                if let Some(tab) = line[..start].find('\t') {
                    return Err(LexError::TabIndentation {
                        line: line_no,
                        column: tab + 1,
                    });
                }
                self.indent_to(start, line_no)?;
            }

            self.scan_line(line, start, line_no)?;

            if self.bracket_depth == 0 && self.line_open {
                let end = Span::new(line_no, column(line, line.len()));
                self.push(TokenKind::Newline, "", end);
                self.line_open = false;
            }
        }

        let end = Span::new(last_line + 1, 1);
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.push(TokenKind::Dedent, "", end);
        }
        self.push(TokenKind::Eof, "", end);
        Ok(self.tokens)
    }

    fn push(&mut self, kind: TokenKind, text: &'a str, span: Span) {
        self.tokens.push(Token::new(kind, text, span));
    }

    fn indent_to(&mut self, width: usize, line: usize) -> Result<(), LexError> {
        let span = Span::new(line, width + 1);
        let top = self.indent_stack.last().copied().unwrap_or(0);

        if width > top {
            self.indent_stack.push(width);
            self.push(TokenKind::Indent, "", span);
        } else if width < top {
            while let Some(&open) = self.indent_stack.last() {
                if open <= width {
                    break;
                }
                self.indent_stack.pop();
                self.push(TokenKind::Dedent, "", span);
            }
            if self.indent_stack.last().copied().unwrap_or(0) != width {
                return Err(LexError::InconsistentDedent {
                    width,
                    line,
                    column: width + 1,
                });
            }
        }
        Ok(())
    }

    fn scan_line(&mut self, line: &'a str, start: usize, line_no: usize) -> Result<(), LexError> {
        let mut pos = start;
        while let Some(c) = line[pos..].chars().next() {
            let span = Span::new(line_no, column(line, pos));

            if c == ' ' || c == '\t' {
                pos += 1;
                continue;
            }
            if c == '#' {
                break;
            }

            let end = if c.is_ascii_digit() {
                let end = scan_number(line, pos, span)?;
                self.push(TokenKind::Number, &line[pos..end], span);
                end
            } else if c == '_' || c.is_alphabetic() {
                let end = scan_identifier(line, pos);
                let text = &line[pos..end];
                let kind = match Keyword::from_ident(text) {
                    Some(keyword) => TokenKind::Keyword(keyword),
                    None => TokenKind::Ident,
                };
                self.push(kind, text, span);
                end
            } else if c == '"' || c == '\'' {
                let end = scan_string(line, pos, c, span)?;
                self.push(TokenKind::String, &line[pos..end], span);
                end
            } else {
                let rest = &line[pos..];
                let Some(&(symbol, kind)) = SYMBOLS.iter().find(|(s, _)| rest.starts_with(s))
                else {
                    return Err(LexError::UnexpectedCharacter {
                        character: c,
                        line: line_no,
                        column: span.column,
                    });
                };
                if let TokenKind::Punct(punct) = kind {
                    self.track_bracket(punct);
                }
                let end = pos + symbol.len();
                self.push(kind, &line[pos..end], span);
                end
            };

            self.line_open = true;
            pos = end;
        }
        Ok(())
    }

    fn track_bracket(&mut self, punct: Punct) {
        if punct.opens_group() {
            self.bracket_depth += 1;
        } else if punct.closes_group() {
            // Unbalanced closers are reported by the parser.
            self.bracket_depth = self.bracket_depth.saturating_sub(1);
        }
    }
}

/// 1-based character column of the byte offset `pos` in `line`.
fn column(line: &str, pos: usize) -> usize {
    line[..pos].chars().count() + 1
}

fn scan_identifier(line: &str, start: usize) -> usize {
    line[start..]
        .char_indices()
        .find(|&(_, c)| !(c == '_' || c.is_alphanumeric()))
        .map(|(offset, _)| start + offset)
        .unwrap_or(line.len())
}

fn scan_digits(line: &str, start: usize) -> usize {
    line[start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|offset| start + offset)
        .unwrap_or(line.len())
}

fn scan_number(line: &str, start: usize, span: Span) -> Result<usize, LexError> {
    let end = scan_digits(line, start);
    if !line[end..].starts_with('.') {
        return Ok(end);
    }
    let fraction = end + 1;
    let fraction_end = scan_digits(line, fraction);
    if fraction_end == fraction {
        return Err(LexError::UnterminatedNumber {
            text: line[start..fraction].to_string(),
            line: span.line,
            column: span.column,
        });
    }
    Ok(fraction_end)
}

/// Returns the byte index just past the closing quote.
fn scan_string(line: &str, start: usize, quote: char, span: Span) -> Result<usize, LexError> {
    let mut chars = line[start + 1..].char_indices();
    while let Some((offset, c)) = chars.next() {
        if c == '\\' {
            if chars.next().is_none() {
                break;
            }
        } else if c == quote {
            return Ok(start + 1 + offset + c.len_utf8());
        }
    }
    Err(LexError::UnterminatedString {
        line: span.line,
        column: span.column,
    })
}
