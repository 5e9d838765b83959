use ruff_python_ast::{self as ast, Expr as AstExpr, Stmt};
use ruff_python_parser::{parse_expression, parse_module};

use crate::{
    custom,
    schema::RuleNode,
    value::{Env, Value},
    world::{FunctionSource, Predicate},
};

/// Result of source extraction for one predicate.
#[derive(Debug)]
pub enum Extraction {
    /// A parsed single-expression body with the callable's parameter names
    /// and captured environment. The first parameter is the collection
    /// state by calling convention.
    Ast {
        body: Box<AstExpr>,
        params: Vec<String>,
        env: Env,
    },
    /// A fully-formed rule node for a known custom predicate class.
    Serialized(RuleNode),
    /// The predicate is neither textually available nor a known class.
    Failed(String),
}

/// Extracts an analyzable form from a predicate.
///
/// Custom predicate objects short-circuit to their registered serializer;
/// textual callables go through lambda/def source recovery and parsing.
pub fn extract(predicate: &Predicate) -> Extraction {
    match predicate {
        Predicate::Custom(rule) => match custom::serialize_rule(rule) {
            Some(node) => Extraction::Serialized(node),
            None => Extraction::Failed(format!("unknown custom predicate shape: {rule:?}")),
        },
        Predicate::Opaque { repr } => Extraction::Failed(format!("source unavailable for {repr}")),
        Predicate::Lambda(func) => extract_function(func),
    }
}

fn extract_function(func: &FunctionSource) -> Extraction {
    let Some(slice) = func.source.get(func.col_offset as usize..) else {
        return Extraction::Failed(format!("column offset {} out of range", func.col_offset));
    };
    let text = strip_comments(slice);
    let trimmed = text.trim_start();
    if trimmed.starts_with("lambda") {
        extract_lambda(&text, func)
    } else if trimmed.starts_with("def ") {
        extract_def(&text, func)
    } else {
        // Bare expression predicate (e.g. a rule assembled from a string).
        match parse_expression(text.trim()) {
            Ok(parsed) => Extraction::Ast {
                body: parsed.into_syntax().body,
                params: Vec::new(),
                env: func.env.clone(),
            },
            Err(err) => Extraction::Failed(format!("failed to parse rule expression: {err}")),
        }
    }
}

/// Slices the lambda out of surrounding code and parses it.
///
/// The source line may contain several lambdas (the column offset already
/// picked ours) and arbitrary trailing code: the enclosing call's other
/// arguments, closing brackets, another statement. The extent scan finds
/// where the lambda expression ends.
fn extract_lambda(text: &str, func: &FunctionSource) -> Extraction {
    let end = lambda_extent(text);
    let lambda_text = text[..end].trim_end();
    let parsed = match parse_expression(lambda_text) {
        Ok(parsed) => parsed,
        Err(err) => {
            return Extraction::Failed(format!("failed to parse lambda {lambda_text:?}: {err}"));
        }
    };
    let AstExpr::Lambda(ast::ExprLambda { parameters, body, .. }) = *parsed.into_syntax().body else {
        return Extraction::Failed(format!("expected a lambda expression in {lambda_text:?}"));
    };
    let mut env = func.env.clone();
    let params = match parameters {
        Some(parameters) => collect_params(&parameters, &mut env),
        None => Vec::new(),
    };
    Extraction::Ast { body, params, env }
}

/// Recovers the body of a `def` helper whose body is a single return
/// expression (optionally preceded by a docstring).
fn extract_def(text: &str, func: &FunctionSource) -> Extraction {
    // Methods arrive indented at their class-body depth.
    let text = dedent(text);
    let parsed = match parse_module(&text) {
        Ok(parsed) => parsed,
        Err(err) => return Extraction::Failed(format!("failed to parse helper {}: {err}", func.name)),
    };
    let module = parsed.into_syntax();
    let Some(Stmt::FunctionDef(def)) = module.body.into_iter().next() else {
        return Extraction::Failed(format!("helper {} is not a function definition", func.name));
    };
    let mut env = func.env.clone();
    let params = collect_params(&def.parameters, &mut env);
    let mut body_stmts = def.body.into_iter().peekable();
    // Skip a leading docstring.
    if let Some(Stmt::Expr(expr_stmt)) = body_stmts.peek()
        && matches!(*expr_stmt.value, AstExpr::StringLiteral(_))
    {
        body_stmts.next();
    }
    match (body_stmts.next(), body_stmts.next()) {
        (Some(Stmt::Return(ret)), None) => match ret.value {
            Some(body) => Extraction::Ast { body, params, env },
            None => Extraction::Failed(format!("helper {} returns no value", func.name)),
        },
        _ => Extraction::Failed(format!(
            "helper {} body is not a single return expression",
            func.name
        )),
    }
}

/// Collects parameter names in declaration order and folds literal default
/// values into the environment's defaults layer when the dump did not
/// already capture them.
fn collect_params(parameters: &ast::Parameters, env: &mut Env) -> Vec<String> {
    let mut names = Vec::new();
    for param in parameters.posonlyargs.iter().chain(parameters.args.iter()) {
        let name = param.parameter.name.id().as_str().to_owned();
        if let Some(default) = &param.default
            && !env.defaults.contains_key(&name)
            && let Some(value) = literal_value(default)
        {
            env.defaults.insert(name.clone(), value);
        }
        names.push(name);
    }
    names
}

/// Converts a literal default-argument expression into a captured value.
fn literal_value(expr: &AstExpr) -> Option<Value> {
    match expr {
        AstExpr::NoneLiteral(_) => Some(Value::None),
        AstExpr::BooleanLiteral(b) => Some(Value::Bool(b.value)),
        AstExpr::NumberLiteral(n) => match &n.value {
            ast::Number::Int(i) => i.as_i64().map(Value::Int),
            ast::Number::Float(f) => Some(Value::Float(*f)),
            ast::Number::Complex { .. } => None,
        },
        AstExpr::StringLiteral(s) => Some(Value::Str(s.value.to_string())),
        _ => None,
    }
}

/// Finds the byte length of the lambda expression starting at offset 0.
///
/// Phase one scans to the `:` closing the parameter list (commas between
/// parameters sit at bracket depth zero). Phase two scans the body: the
/// lambda ends at a depth-zero comma or newline, at a closing bracket that
/// would unbalance the scan (the enclosing call's), or at end of input.
fn lambda_extent(text: &str) -> usize {
    let mut depth: i32 = 0;
    let mut in_body = false;
    let mut string: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if let Some(quote) = string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                string = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => string = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
            }
            ':' if depth == 0 && !in_body => in_body = true,
            ',' if depth == 0 && in_body => return i,
            '\n' if depth == 0 => return i,
            _ => {}
        }
    }
    text.len()
}

/// Strips the common leading whitespace of every non-empty line.
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    text.lines()
        .map(|line| if line.len() >= indent { &line[indent..] } else { line.trim_start() })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes `#` comments with a character-level scanner rather than a regex:
/// `#` inside string literals must survive.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut string: Option<char> = None;
    let mut escaped = false;
    let mut in_comment = false;
    for c in text.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                out.push(c);
            }
            continue;
        }
        if let Some(quote) = string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                string = None;
            }
            out.push(c);
            continue;
        }
        match c {
            '\'' | '"' => {
                string = Some(c);
                out.push(c);
            }
            '#' => in_comment = true,
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lambda_source(source: &str) -> FunctionSource {
        FunctionSource::lambda(source, Env::new())
    }

    fn expect_ast(extraction: Extraction) -> (Box<AstExpr>, Vec<String>, Env) {
        match extraction {
            Extraction::Ast { body, params, env } => (body, params, env),
            other => panic!("expected Ast extraction, got {other:?}"),
        }
    }

    #[test]
    fn plain_lambda_extracts_body_and_params() {
        let (body, params, _) = expect_ast(extract_function(&lambda_source(
            "lambda state: state.has(\"Sword\", player)",
        )));
        assert_eq!(params, vec!["state"]);
        assert!(matches!(*body, AstExpr::Call(_)));
    }

    #[test]
    fn column_offset_picks_the_right_lambda() {
        let line = "set_rule(a, lambda s: s.has(\"A\", p)); set_rule(b, lambda s: s.has(\"B\", p))";
        let offset = line.rfind("lambda").unwrap();
        let func = FunctionSource {
            name: "<lambda>".to_owned(),
            source: line.to_owned(),
            col_offset: u32::try_from(offset).unwrap(),
            env: Env::new(),
        };
        let (body, _, _) = expect_ast(extract_function(&func));
        let AstExpr::Call(call) = *body else {
            panic!("expected a call body");
        };
        let AstExpr::StringLiteral(item) = &call.arguments.args[0] else {
            panic!("expected a string argument");
        };
        assert_eq!(item.value.to_string(), "B");
    }

    #[test]
    fn lambda_inside_call_stops_at_sibling_argument() {
        let line = "add_rule(loc, lambda state: state.has(\"Key\", player), combine=\"and\")";
        let offset = line.find("lambda").unwrap();
        let func = FunctionSource {
            name: "<lambda>".to_owned(),
            source: line.to_owned(),
            col_offset: u32::try_from(offset).unwrap(),
            env: Env::new(),
        };
        let (body, _, _) = expect_ast(extract_function(&func));
        assert!(matches!(*body, AstExpr::Call(_)));
    }

    #[test]
    fn multi_line_lambda_balances_brackets() {
        let source = "lambda state: state.has_all([\n    \"Hookshot\",\n    \"Bow\",\n], player)";
        let (body, _, _) = expect_ast(extract_function(&lambda_source(source)));
        assert!(matches!(*body, AstExpr::Call(_)));
    }

    #[test]
    fn hash_inside_string_literal_survives_comment_stripping() {
        let (body, _, _) = expect_ast(extract_function(&lambda_source(
            "lambda state: state.has(\"Key #1\", player)  # gate rule",
        )));
        let AstExpr::Call(call) = *body else {
            panic!("expected a call body");
        };
        let AstExpr::StringLiteral(item) = &call.arguments.args[0] else {
            panic!("expected a string argument");
        };
        assert_eq!(item.value.to_string(), "Key #1");
    }

    #[test]
    fn default_bound_loop_variable_lands_in_defaults() {
        let (_, params, env) = expect_ast(extract_function(&lambda_source(
            "lambda state, count=3: state.has(\"Rupee\", player, count)",
        )));
        assert_eq!(params, vec!["state", "count"]);
        assert_eq!(env.defaults.get("count"), Some(&Value::Int(3)));
    }

    #[test]
    fn def_helper_with_docstring_extracts_return_expression() {
        let func = FunctionSource {
            name: "can_cross".to_owned(),
            source: "def can_cross(state):\n    \"\"\"Gate for the bridge.\"\"\"\n    return state.has(\"Hookshot\", player)\n".to_owned(),
            col_offset: 0,
            env: Env::new(),
        };
        let (body, params, _) = expect_ast(extract_function(&func));
        assert_eq!(params, vec!["state"]);
        assert!(matches!(*body, AstExpr::Call(_)));
    }

    #[test]
    fn indented_method_source_is_dedented_before_parsing() {
        let func = FunctionSource {
            name: "can_climb".to_owned(),
            source: "    def can_climb(self, state):\n        return state.has(\"Claws\", player)\n".to_owned(),
            col_offset: 4,
            env: Env::new(),
        };
        let (body, params, _) = expect_ast(extract_function(&func));
        assert_eq!(params, vec!["self", "state"]);
        assert!(matches!(*body, AstExpr::Call(_)));
    }

    #[test]
    fn def_helper_with_statements_fails_structurally() {
        let func = FunctionSource {
            name: "complex_helper".to_owned(),
            source: "def complex_helper(state):\n    x = 1\n    return x\n".to_owned(),
            col_offset: 0,
            env: Env::new(),
        };
        assert!(matches!(extract_function(&func), Extraction::Failed(_)));
    }

    #[test]
    fn opaque_predicate_fails_with_reason() {
        let predicate = Predicate::Opaque {
            repr: "functools.partial(<built-in>)".to_owned(),
        };
        let Extraction::Failed(reason) = extract(&predicate) else {
            panic!("expected extraction failure");
        };
        assert!(reason.contains("functools.partial"));
    }
}
