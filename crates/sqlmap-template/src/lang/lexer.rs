//! Lexer: splits statement text into literal text and `{{ … }}` actions,
//! tokenizing each action.

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A lexical token inside an action.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// `.` (empty path) or `.a.b`.
    Field(Vec<String>),
    /// `$` (empty name) or `$name`, with an optional trailing field path.
    Variable(String, Vec<String>),
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    Pipe,
    LParen,
    RParen,
    Comma,
    Declare,
}

/// A lexed chunk of the template.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Item {
    Text(String),
    Action { tokens: Vec<Token>, line: usize },
}

/// Syntax failure with the 1-based line it occurred on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SyntaxError {
    pub line: usize,
    pub message: String,
}

pub(crate) fn lex(src: &str) -> Result<Vec<Item>, SyntaxError> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    items: Vec<Item>,
    trim_next_text: bool,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            items: Vec::new(),
            trim_next_text: false,
        }
    }

    fn run(mut self) -> Result<Vec<Item>, SyntaxError> {
        while self.pos < self.src.len() {
            let rest = &self.src[self.pos..];
            let text_len = rest.find(OPEN).unwrap_or(rest.len());
            let mut text = &rest[..text_len];
            self.line += text.matches('\n').count();
            self.pos += text_len;

            let has_action = self.pos < self.src.len();
            let trim_before = has_action && self.at_left_trim_marker();

            if self.trim_next_text {
                text = text.trim_start();
                self.trim_next_text = false;
            }
            if trim_before {
                text = text.trim_end();
            }
            if !text.is_empty() {
                self.items.push(Item::Text(text.to_string()));
            }
            if has_action {
                self.lex_action(trim_before)?;
            }
        }
        Ok(self.items)
    }

    /// `{{- ` with whitespace after the dash; `{{-3}}` is a number.
    fn at_left_trim_marker(&self) -> bool {
        let after = &self.src[self.pos + OPEN.len()..];
        let mut chars = after.chars();
        chars.next() == Some('-') && chars.next().map_or(false, char::is_whitespace)
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            line: self.line,
            message: message.into(),
        }
    }

    fn lex_action(&mut self, trimmed_left: bool) -> Result<(), SyntaxError> {
        let start_line = self.line;
        self.pos += OPEN.len();
        if trimmed_left {
            self.pos += 1;
        }
        self.skip_whitespace();

        if self.src[self.pos..].starts_with("/*") {
            let body = &self.src[self.pos..];
            let end = body
                .find("*/")
                .ok_or_else(|| self.error("unclosed comment"))?;
            self.line += body[..end].matches('\n').count();
            self.pos += end + 2;
            self.skip_whitespace();
            if !self.close_action() {
                return Err(self.error("comment must be followed by `}}`"));
            }
            return Ok(());
        }

        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.src.len() {
                return Err(SyntaxError {
                    line: start_line,
                    message: "unclosed action".to_string(),
                });
            }
            if self.close_action() {
                break;
            }
            tokens.push(self.next_token()?);
        }

        self.items.push(Item::Action {
            tokens,
            line: start_line,
        });
        Ok(())
    }

    /// Consume `}}` or `-}}`, remembering to trim the following text.
    fn close_action(&mut self) -> bool {
        let rest = &self.src[self.pos..];
        if rest.starts_with(CLOSE) {
            self.pos += CLOSE.len();
            return true;
        }
        if rest.starts_with("-}}") && self.preceded_by_whitespace() {
            self.pos += 1 + CLOSE.len();
            self.trim_next_text = true;
            return true;
        }
        false
    }

    fn preceded_by_whitespace(&self) -> bool {
        self.src[..self.pos]
            .chars()
            .next_back()
            .map_or(false, char::is_whitespace)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.pos += c.len_utf8();
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let c = match self.peek() {
            Some(c) => c,
            None => return Err(self.error("unexpected end of template")),
        };
        match c {
            '|' => {
                self.pos += 1;
                Ok(Token::Pipe)
            }
            '(' => {
                self.pos += 1;
                Ok(Token::LParen)
            }
            ')' => {
                self.pos += 1;
                Ok(Token::RParen)
            }
            ',' => {
                self.pos += 1;
                Ok(Token::Comma)
            }
            ':' if self.peek_second() == Some('=') => {
                self.pos += 2;
                Ok(Token::Declare)
            }
            '.' => {
                self.pos += 1;
                let path = self.field_chain(true)?;
                Ok(Token::Field(path))
            }
            '$' => {
                self.pos += 1;
                let name = self.identifier();
                let path = self.field_chain(false)?;
                Ok(Token::Variable(name, path))
            }
            '"' => self.quoted_string(),
            '`' => self.raw_string(),
            c if c.is_ascii_digit() => self.number(),
            '-' if self.peek_second().map_or(false, |d| d.is_ascii_digit()) => self.number(),
            c if is_ident_char(c) => Ok(Token::Ident(self.identifier())),
            other => Err(self.error(format!("unexpected character `{other}` in action"))),
        }
    }

    fn identifier(&mut self) -> String {
        let rest = &self.src[self.pos..];
        let len = rest
            .find(|c: char| !is_ident_char(c))
            .unwrap_or(rest.len());
        self.pos += len;
        rest[..len].to_string()
    }

    /// Parse `a.b.c` after a leading `.`; `first_consumed` is true when the
    /// leading dot was already taken (a bare `.` yields an empty path).
    fn field_chain(&mut self, first_consumed: bool) -> Result<Vec<String>, SyntaxError> {
        let mut path = Vec::new();
        if first_consumed {
            let name = self.identifier();
            if name.is_empty() {
                return Ok(path);
            }
            path.push(name);
        }
        while self.peek() == Some('.') {
            self.pos += 1;
            let name = self.identifier();
            if name.is_empty() {
                return Err(self.error("expected field name after `.`"));
            }
            path.push(name);
        }
        Ok(path)
    }

    fn quoted_string(&mut self) -> Result<Token, SyntaxError> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            let c = self.peek().ok_or_else(|| self.error("unterminated string"))?;
            self.pos += c.len_utf8();
            match c {
                '"' => return Ok(Token::Str(out)),
                '\n' => return Err(self.error("newline in string")),
                '\\' => {
                    let esc = self.peek().ok_or_else(|| self.error("unterminated string"))?;
                    self.pos += esc.len_utf8();
                    out.push(match esc {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '\\' => '\\',
                        '"' => '"',
                        '\'' => '\'',
                        other => return Err(self.error(format!("unknown escape `\\{other}`"))),
                    });
                }
                other => out.push(other),
            }
        }
    }

    fn raw_string(&mut self) -> Result<Token, SyntaxError> {
        self.pos += 1;
        let rest = &self.src[self.pos..];
        let end = rest
            .find('`')
            .ok_or_else(|| self.error("unterminated raw string"))?;
        let text = rest[..end].to_string();
        self.line += text.matches('\n').count();
        self.pos += end + 1;
        Ok(Token::Str(text))
    }

    fn number(&mut self) -> Result<Token, SyntaxError> {
        let rest = &self.src[self.pos..];
        let mut len = 0;
        let mut is_float = false;
        for (i, c) in rest.char_indices() {
            let accepted = match c {
                '-' => i == 0 || matches!(rest[..i].chars().last(), Some('e' | 'E')),
                '+' => matches!(rest[..i].chars().last(), Some('e' | 'E')),
                '.' | 'e' | 'E' => {
                    is_float = true;
                    true
                }
                c => c.is_ascii_digit(),
            };
            if !accepted {
                break;
            }
            len = i + c.len_utf8();
        }
        let text = &rest[..len];
        self.pos += len;
        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| self.error(format!("invalid number `{text}`")))
        } else {
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| self.error(format!("invalid number `{text}`")))
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
