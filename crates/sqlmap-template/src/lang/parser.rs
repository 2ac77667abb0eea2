//! Parser: turns lexed items into the node tree, resolving functions and
//! checking variable scope and arity up front.

use serde_json::{Number, Value};

use super::ast::{Command, Node, Operand, Pipeline};
use super::funcs::Func;
use super::lexer::{Item, SyntaxError, Token};

pub(crate) fn parse(items: Vec<Item>) -> Result<Vec<Node>, SyntaxError> {
    let mut parser = Parser {
        items: items.into_iter(),
        vars: Vec::new(),
    };
    let (nodes, stop) = parser.parse_list()?;
    match stop {
        Stop::Eof => Ok(nodes),
        Stop::End { line } => Err(error(line, "unexpected {{end}}")),
        Stop::Else { line, .. } => Err(error(line, "unexpected {{else}}")),
    }
}

/// What ended a node list.
enum Stop {
    Eof,
    End { line: usize },
    Else { tokens: Vec<Token>, line: usize },
}

struct Parser {
    items: std::vec::IntoIter<Item>,
    /// Variables declared by enclosing `range` actions.
    vars: Vec<String>,
}

fn error(line: usize, message: impl Into<String>) -> SyntaxError {
    SyntaxError {
        line,
        message: message.into(),
    }
}

impl Parser {
    fn parse_list(&mut self) -> Result<(Vec<Node>, Stop), SyntaxError> {
        let mut nodes = Vec::new();
        while let Some(item) = self.items.next() {
            let (tokens, line) = match item {
                Item::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Item::Action { tokens, line } => (tokens, line),
            };

            let keyword = match tokens.first() {
                Some(Token::Ident(name)) => name.as_str(),
                Some(_) => "",
                None => return Err(error(line, "empty action")),
            };
            match keyword {
                "if" => nodes.push(self.parse_if(&tokens[1..], line)?),
                "range" => nodes.push(self.parse_range(&tokens[1..], line)?),
                "with" => nodes.push(self.parse_with(&tokens[1..], line)?),
                "end" => {
                    if tokens.len() > 1 {
                        return Err(error(line, "unexpected tokens after end"));
                    }
                    return Ok((nodes, Stop::End { line }));
                }
                "else" => {
                    let rest = tokens[1..].to_vec();
                    return Ok((nodes, Stop::Else { tokens: rest, line }));
                }
                "define" | "template" | "block" | "break" | "continue" => {
                    return Err(error(line, format!("`{keyword}` is not supported")));
                }
                _ => nodes.push(Node::Output(self.pipeline(&tokens, line)?)),
            }
        }
        Ok((nodes, Stop::Eof))
    }

    /// Body after `{{else}}`, which must be closed by `{{end}}`.
    fn parse_else_body(&mut self, action: &str, line: usize) -> Result<Vec<Node>, SyntaxError> {
        let (nodes, stop) = self.parse_list()?;
        match stop {
            Stop::End { .. } => Ok(nodes),
            Stop::Else { line, .. } => {
                Err(error(line, format!("{{{{else}}}} after final {{{{else}}}} in {action}")))
            }
            Stop::Eof => Err(error(line, format!("unclosed {action}"))),
        }
    }

    fn parse_if(&mut self, tokens: &[Token], line: usize) -> Result<Node, SyntaxError> {
        let mut branches = Vec::new();
        let mut condition = self.pipeline(tokens, line)?;
        loop {
            let (body, stop) = self.parse_list()?;
            branches.push((condition, body));
            match stop {
                Stop::End { .. } => {
                    return Ok(Node::If {
                        branches,
                        otherwise: Vec::new(),
                    })
                }
                Stop::Else {
                    tokens,
                    line: else_line,
                } => match tokens.first() {
                    None => {
                        let otherwise = self.parse_else_body("if", line)?;
                        return Ok(Node::If {
                            branches,
                            otherwise,
                        });
                    }
                    Some(Token::Ident(name)) if name == "if" => {
                        condition = self.pipeline(&tokens[1..], else_line)?;
                    }
                    Some(_) => return Err(error(else_line, "unexpected tokens after else")),
                },
                Stop::Eof => return Err(error(line, "unclosed if")),
            }
        }
    }

    fn parse_range(&mut self, tokens: &[Token], line: usize) -> Result<Node, SyntaxError> {
        let (key_var, value_var, rest) = match tokens {
            [Token::Variable(k, kp), Token::Comma, Token::Variable(v, vp), Token::Declare, rest @ ..]
                if kp.is_empty() && vp.is_empty() && !k.is_empty() && !v.is_empty() =>
            {
                (Some(k.clone()), Some(v.clone()), rest)
            }
            [Token::Variable(v, vp), Token::Declare, rest @ ..] if vp.is_empty() && !v.is_empty() => {
                (None, Some(v.clone()), rest)
            }
            _ => (None, None, tokens),
        };
        if tokens.iter().any(|t| *t == Token::Declare) && value_var.is_none() {
            return Err(error(line, "malformed range declaration"));
        }

        let pipeline = self.pipeline(rest, line)?;

        let scope = self.vars.len();
        self.vars.extend(key_var.iter().chain(value_var.iter()).cloned());
        let listed = self.parse_list();
        self.vars.truncate(scope);
        let (body, stop) = listed?;

        let otherwise = match stop {
            Stop::End { .. } => Vec::new(),
            Stop::Else {
                tokens,
                line: else_line,
            } => {
                if !tokens.is_empty() {
                    return Err(error(else_line, "unexpected tokens after else"));
                }
                self.parse_else_body("range", line)?
            }
            Stop::Eof => return Err(error(line, "unclosed range")),
        };

        Ok(Node::Range {
            key_var,
            value_var,
            pipeline,
            body,
            otherwise,
        })
    }

    fn parse_with(&mut self, tokens: &[Token], line: usize) -> Result<Node, SyntaxError> {
        let pipeline = self.pipeline(tokens, line)?;
        let (body, stop) = self.parse_list()?;
        let otherwise = match stop {
            Stop::End { .. } => Vec::new(),
            Stop::Else {
                tokens,
                line: else_line,
            } => {
                if !tokens.is_empty() {
                    return Err(error(else_line, "unexpected tokens after else"));
                }
                self.parse_else_body("with", line)?
            }
            Stop::Eof => return Err(error(line, "unclosed with")),
        };
        Ok(Node::With {
            pipeline,
            body,
            otherwise,
        })
    }

    fn pipeline(&self, tokens: &[Token], line: usize) -> Result<Pipeline, SyntaxError> {
        if tokens.is_empty() {
            return Err(error(line, "missing value"));
        }

        let mut stages = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        for (i, token) in tokens.iter().enumerate() {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| error(line, "unexpected `)`"))?;
                }
                Token::Pipe if depth == 0 => {
                    stages.push(&tokens[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(error(line, "unclosed `(`"));
        }
        stages.push(&tokens[start..]);

        let commands = stages
            .iter()
            .enumerate()
            .map(|(i, stage)| self.command(stage, line, i > 0))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Pipeline { line, commands })
    }

    fn command(&self, tokens: &[Token], line: usize, piped: bool) -> Result<Command, SyntaxError> {
        let first = tokens
            .first()
            .ok_or_else(|| error(line, "missing command in pipeline"))?;

        if let Token::Ident(name) = first {
            if !is_constant(name) {
                let func = Func::lookup(name)
                    .ok_or_else(|| error(line, format!("function `{name}` not defined")))?;
                let args = self.operands(&tokens[1..], line)?;
                func.check_arity(args.len() + usize::from(piped))
                    .map_err(|message| error(line, message))?;
                return Ok(Command::Call { func, args });
            }
        }

        if piped {
            return Err(error(line, "non-function in a pipeline stage"));
        }
        let mut operands = self.operands(tokens, line)?;
        if operands.len() > 1 {
            return Err(error(line, "unexpected operand; only functions take arguments"));
        }
        Ok(Command::Operand(operands.remove(0)))
    }

    fn operands(&self, tokens: &[Token], line: usize) -> Result<Vec<Operand>, SyntaxError> {
        let mut operands = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let operand = match &tokens[i] {
                Token::Field(path) => Operand::Field(path.clone()),
                Token::Variable(name, path) if name.is_empty() => Operand::Root(path.clone()),
                Token::Variable(name, path) => {
                    if !self.vars.iter().any(|v| v == name) {
                        return Err(error(line, format!("undefined variable `${name}`")));
                    }
                    Operand::Variable(name.clone(), path.clone())
                }
                Token::Str(s) => Operand::Literal(Value::String(s.clone())),
                Token::Int(n) => Operand::Literal(Value::from(*n)),
                Token::Float(f) => Number::from_f64(*f)
                    .map(|n| Operand::Literal(Value::Number(n)))
                    .ok_or_else(|| error(line, format!("invalid number `{f}`")))?,
                Token::Ident(name) => match name.as_str() {
                    "true" => Operand::Literal(Value::Bool(true)),
                    "false" => Operand::Literal(Value::Bool(false)),
                    "nil" => Operand::Literal(Value::Null),
                    _ => {
                        return Err(error(
                            line,
                            format!("function `{name}` used as an argument; wrap the call in parentheses"),
                        ))
                    }
                },
                Token::LParen => {
                    let close = matching_paren(tokens, i)
                        .ok_or_else(|| error(line, "unclosed `(`"))?;
                    let inner = self.pipeline(&tokens[i + 1..close], line)?;
                    i = close;
                    Operand::Nested(Box::new(inner))
                }
                other => return Err(error(line, format!("unexpected {other:?} in operand list"))),
            };
            operands.push(operand);
            i += 1;
        }
        Ok(operands)
    }
}

fn is_constant(name: &str) -> bool {
    matches!(name, "true" | "false" | "nil")
}

fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
