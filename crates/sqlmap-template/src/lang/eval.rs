//! Evaluator: walks the node tree against a parameter value.

use serde_json::Value;

use super::ast::{Command, Node, Operand, Pipeline};
use super::value::{display_value, is_truthy, resolve_path, type_name};

pub(crate) fn execute(nodes: &[Node], params: &Value) -> Result<String, String> {
    let mut exec = Exec {
        root: params,
        vars: Vec::new(),
        out: String::new(),
    };
    exec.walk(nodes, params)?;
    Ok(exec.out)
}

struct Exec<'a> {
    root: &'a Value,
    /// Range variables in scope, innermost last.
    vars: Vec<(String, Value)>,
    out: String,
}

fn at_line(line: usize, message: String) -> String {
    format!("line {line}: {message}")
}

impl<'a> Exec<'a> {
    fn walk(&mut self, nodes: &[Node], dot: &Value) -> Result<(), String> {
        for node in nodes {
            self.walk_node(node, dot)?;
        }
        Ok(())
    }

    fn walk_node(&mut self, node: &Node, dot: &Value) -> Result<(), String> {
        match node {
            Node::Text(text) => self.out.push_str(text),
            Node::Output(pipeline) => {
                let value = self.pipeline(pipeline, dot)?;
                let text = display_value(&value).map_err(|e| at_line(pipeline.line, e))?;
                self.out.push_str(&text);
            }
            Node::If {
                branches,
                otherwise,
            } => {
                for (condition, body) in branches {
                    if is_truthy(&self.pipeline(condition, dot)?) {
                        return self.walk(body, dot);
                    }
                }
                self.walk(otherwise, dot)?;
            }
            Node::With {
                pipeline,
                body,
                otherwise,
            } => {
                let value = self.pipeline(pipeline, dot)?;
                if is_truthy(&value) {
                    self.walk(body, &value)?;
                } else {
                    self.walk(otherwise, dot)?;
                }
            }
            Node::Range {
                key_var,
                value_var,
                pipeline,
                body,
                otherwise,
            } => {
                let collection = self.pipeline(pipeline, dot)?;
                let entries: Vec<(Value, &Value)> = match &collection {
                    Value::Array(items) => items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| (Value::from(i), item))
                        .collect(),
                    Value::Object(map) => map
                        .iter()
                        .map(|(k, item)| (Value::String(k.clone()), item))
                        .collect(),
                    Value::Null => Vec::new(),
                    other => {
                        return Err(at_line(
                            pipeline.line,
                            format!("cannot range over a {}", type_name(other)),
                        ))
                    }
                };
                if entries.is_empty() {
                    return self.walk(otherwise, dot);
                }
                for (key, item) in entries {
                    let scope = self.vars.len();
                    if let Some(name) = key_var {
                        self.vars.push((name.clone(), key));
                    }
                    if let Some(name) = value_var {
                        self.vars.push((name.clone(), item.clone()));
                    }
                    let walked = self.walk(body, item);
                    self.vars.truncate(scope);
                    walked?;
                }
            }
        }
        Ok(())
    }

    fn pipeline(&self, pipeline: &Pipeline, dot: &Value) -> Result<Value, String> {
        let mut piped: Option<Value> = None;
        for command in &pipeline.commands {
            let value = match command {
                Command::Operand(operand) => self.operand(operand, dot, pipeline.line)?,
                Command::Call { func, args } => {
                    let mut values = Vec::with_capacity(args.len() + 1);
                    let mut decided = false;
                    for arg in args {
                        let value = self.operand(arg, dot, pipeline.line)?;
                        decided = func.short_circuits(&value);
                        values.push(value);
                        if decided {
                            break;
                        }
                    }
                    if let Some(previous) = piped.take() {
                        if !decided {
                            values.push(previous);
                        }
                    }
                    func.call(values)
                        .map_err(|e| at_line(pipeline.line, format!("{}: {e}", func.name())))?
                }
            };
            piped = Some(value);
        }
        Ok(piped.unwrap_or(Value::Null))
    }

    fn operand(&self, operand: &Operand, dot: &Value, line: usize) -> Result<Value, String> {
        let resolved = match operand {
            Operand::Field(path) => resolve_path(dot, path),
            Operand::Root(path) => resolve_path(self.root, path),
            Operand::Variable(name, path) => {
                let value = self
                    .vars
                    .iter()
                    .rev()
                    .find(|(var, _)| var == name)
                    .map(|(_, value)| value)
                    .ok_or_else(|| at_line(line, format!("undefined variable `${name}`")))?;
                resolve_path(value, path)
            }
            Operand::Literal(value) => Ok(value),
            Operand::Nested(inner) => return self.pipeline(inner, dot),
        };
        resolved.cloned().map_err(|e| at_line(line, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::lexer::lex;
    use crate::lang::parser::parse;
    use serde_json::json;

    fn run(src: &str, params: Value) -> Result<String, String> {
        let nodes = parse(lex(src).map_err(|e| e.message)?).map_err(|e| e.message)?;
        execute(&nodes, &params)
    }

    #[test]
    fn substitutes_fields_and_root() {
        let out = run("id = {{ .id }} AND {{ $.name | quote }}", json!({"id": 7, "name": "x"}));
        assert_eq!(out.unwrap(), "id = 7 AND 'x'");
    }

    #[test]
    fn if_else_if_picks_first_truthy_branch() {
        let src = "{{ if .a }}A{{ else if .b }}B{{ else }}C{{ end }}";
        assert_eq!(run(src, json!({"a": 0, "b": "y"})).unwrap(), "B");
        assert_eq!(run(src, json!({"a": 0, "b": ""})).unwrap(), "C");
    }

    #[test]
    fn range_rebinds_dot_and_variables() {
        let src = "{{ range $i, $e := .xs }}{{ if $i }},{{ end }}{{ $e.v }}{{ end }}";
        let out = run(src, json!({"xs": [{"v": 1}, {"v": 2}]})).unwrap();
        assert_eq!(out, "1,2");
        let dotted = run("{{ range .xs }}[{{ . }}]{{ end }}", json!({"xs": ["a", "b"]}));
        assert_eq!(dotted.unwrap(), "[a][b]");
    }

    #[test]
    fn range_over_object_is_in_key_order() {
        let out = run("{{ range $k, $v := . }}{{ $k }}={{ $v }};{{ end }}", json!({"b": 2, "a": 1}));
        assert_eq!(out.unwrap(), "a=1;b=2;");
    }

    #[test]
    fn empty_range_runs_else() {
        let src = "{{ range .xs }}x{{ else }}none{{ end }}";
        assert_eq!(run(src, json!({"xs": []})).unwrap(), "none");
        assert_eq!(run(src, json!({"xs": null})).unwrap(), "none");
    }

    #[test]
    fn with_rebinds_dot_when_truthy() {
        let src = "{{ with .user }}{{ .name }}{{ else }}anon{{ end }}";
        assert_eq!(run(src, json!({"user": {"name": "ann"}})).unwrap(), "ann");
        assert_eq!(run(src, json!({"user": null})).unwrap(), "anon");
    }

    #[test]
    fn missing_field_is_a_render_error() {
        let err = run("{{ .nope }}", json!({})).unwrap_err();
        assert!(err.contains("missing field `nope`"));
    }

    #[test]
    fn and_short_circuits_before_missing_fields() {
        let src = "{{ if and .user .user.admin }}admin{{ end }}";
        assert_eq!(run(src, json!({"user": null})).unwrap(), "");
    }

    #[test]
    fn printing_a_list_is_an_error() {
        assert!(run("{{ .xs }}", json!({"xs": [1]})).is_err());
        assert_eq!(run(r#"{{ join "," .xs }}"#, json!({"xs": [1, 2]})).unwrap(), "1,2");
    }

    #[test]
    fn null_prints_as_sql_null() {
        assert_eq!(run("{{ .x }}", json!({"x": null})).unwrap(), "NULL");
    }
}
