//! Compiled template tree.

use serde_json::Value;

use super::funcs::Func;

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Text(String),
    Output(Pipeline),
    If {
        branches: Vec<(Pipeline, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
    Range {
        key_var: Option<String>,
        value_var: Option<String>,
        pipeline: Pipeline,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
    With {
        pipeline: Pipeline,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

/// `cmd | cmd | …`; each stage after the first receives the previous
/// value as its last argument.
#[derive(Debug, Clone)]
pub(crate) struct Pipeline {
    pub line: usize,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone)]
pub(crate) enum Command {
    Operand(Operand),
    Call { func: Func, args: Vec<Operand> },
}

#[derive(Debug, Clone)]
pub(crate) enum Operand {
    /// Path relative to dot; empty means dot itself.
    Field(Vec<String>),
    /// Path relative to the root parameters (`$`, `$.a`).
    Root(Vec<String>),
    Variable(String, Vec<String>),
    Literal(Value),
    Nested(Box<Pipeline>),
}
