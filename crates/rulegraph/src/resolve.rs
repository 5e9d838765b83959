use serde_json::Value as JsonValue;

use crate::{
    schema::{BinaryOperator, CompareOp, RuleNode, UnaryOperator},
    value::{Env, Value},
};

/// Post-analysis constant folding over rule trees.
///
/// The analyzer folds what it can while the expression tree is in hand;
/// this pass catches what only becomes foldable afterwards — nodes built by
/// handler hooks, quantifiers whose iterators a postprocess pass filled in,
/// attribute/subscript chains over names that resolve against the captured
/// environment. It runs once after analysis and once more after handler
/// postprocessing. Pure: unresolvable nodes pass through untouched.
pub fn resolve_rule(node: RuleNode, env: &Env) -> RuleNode {
    let node = resolve_children(node, env);
    fold(&node, env).unwrap_or(node)
}

fn resolve_children(node: RuleNode, env: &Env) -> RuleNode {
    match node {
        RuleNode::Helper { name, args } => RuleNode::Helper {
            name,
            args: args.into_iter().map(|a| resolve_rule(a, env)).collect(),
        },
        RuleNode::StateMethod { method, args } => RuleNode::StateMethod {
            method,
            args: args.into_iter().map(|a| resolve_rule(a, env)).collect(),
        },
        RuleNode::And { conditions } => RuleNode::And {
            conditions: conditions.into_iter().map(|c| resolve_rule(c, env)).collect(),
        },
        RuleNode::Or { conditions } => RuleNode::Or {
            conditions: conditions.into_iter().map(|c| resolve_rule(c, env)).collect(),
        },
        RuleNode::Not { condition } => RuleNode::Not {
            condition: Box::new(resolve_rule(*condition, env)),
        },
        RuleNode::Compare { left, op, right } => RuleNode::Compare {
            left: Box::new(resolve_rule(*left, env)),
            op,
            right: Box::new(resolve_rule(*right, env)),
        },
        RuleNode::BinaryOp { left, op, right } => RuleNode::BinaryOp {
            left: Box::new(resolve_rule(*left, env)),
            op,
            right: Box::new(resolve_rule(*right, env)),
        },
        RuleNode::UnaryOp { op, operand } => RuleNode::UnaryOp {
            op,
            operand: Box::new(resolve_rule(*operand, env)),
        },
        RuleNode::Conditional { test, if_true, if_false } => RuleNode::Conditional {
            test: Box::new(resolve_rule(*test, env)),
            if_true: Box::new(resolve_rule(*if_true, env)),
            if_false: Box::new(resolve_rule(*if_false, env)),
        },
        RuleNode::Attribute { object, attr } => RuleNode::Attribute {
            object: Box::new(resolve_rule(*object, env)),
            attr,
        },
        RuleNode::Subscript { value, index } => RuleNode::Subscript {
            value: Box::new(resolve_rule(*value, env)),
            index: Box::new(resolve_rule(*index, env)),
        },
        RuleNode::AllOf {
            element_rule,
            mut iterator_info,
        } => {
            iterator_info.iterable = Box::new(resolve_rule(*iterator_info.iterable, env));
            RuleNode::AllOf {
                element_rule: Box::new(resolve_rule(*element_rule, env)),
                iterator_info,
            }
        }
        RuleNode::AnyOf {
            element_rule,
            mut iterator_info,
        } => {
            iterator_info.iterable = Box::new(resolve_rule(*iterator_info.iterable, env));
            RuleNode::AnyOf {
                element_rule: Box::new(resolve_rule(*element_rule, env)),
                iterator_info,
            }
        }
        leaf => leaf,
    }
}

/// Tries to fold one node whose children are already resolved.
fn fold(node: &RuleNode, env: &Env) -> Option<RuleNode> {
    match node {
        // `self` is reserved for the evaluation-time settings escape hatch
        // and is only resolved when the environment actually binds it.
        RuleNode::Name { name } => env.lookup(name)?.to_json().map(RuleNode::constant),
        RuleNode::Attribute { object, attr } => match &**object {
            RuleNode::Name { name } => env.lookup(name)?.attr(attr)?.to_json().map(RuleNode::constant),
            RuleNode::Constant {
                value: JsonValue::Object(map),
            } => map.get(attr).cloned().map(RuleNode::constant),
            _ => None,
        },
        RuleNode::Subscript { value, index } => {
            let index_value = constant_of(index)?;
            match &**value {
                RuleNode::Name { name } => {
                    let key = json_to_value(index_value)?;
                    env.lookup(name)?.index(&key)?.to_json().map(RuleNode::constant)
                }
                RuleNode::Constant { value: base } => subscript_json(base, index_value).map(RuleNode::constant),
                _ => None,
            }
        }
        RuleNode::BinaryOp { left, op, right } => {
            fold_binary(constant_of(left)?, *op, constant_of(right)?).map(RuleNode::constant)
        }
        RuleNode::UnaryOp { op, operand } => match (op, constant_of(operand)?) {
            (UnaryOperator::Neg, JsonValue::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    Some(RuleNode::constant(-i))
                } else {
                    n.as_f64().map(|f| RuleNode::constant(-f))
                }
            }
            (UnaryOperator::Pos, JsonValue::Number(n)) => Some(RuleNode::Constant {
                value: JsonValue::Number(n.clone()),
            }),
            (UnaryOperator::Not, value) => json_truthiness(value).map(|t| RuleNode::constant(!t)),
            _ => None,
        },
        RuleNode::Not { condition } => {
            json_truthiness(constant_of(condition)?).map(|t| RuleNode::constant(!t))
        }
        RuleNode::Compare { left, op, right } => {
            fold_compare(constant_of(left)?, *op, constant_of(right)?).map(RuleNode::constant)
        }
        RuleNode::Conditional { test, if_true, if_false } => {
            let truthy = json_truthiness(constant_of(test)?)?;
            Some(if truthy { (**if_true).clone() } else { (**if_false).clone() })
        }
        // A quantifier whose iterator resolved late expands to the n-ary
        // connective the analyzer would have emitted up front.
        RuleNode::AllOf {
            element_rule,
            iterator_info,
        } => expand_late_quantifier(true, element_rule, iterator_info, env),
        RuleNode::AnyOf {
            element_rule,
            iterator_info,
        } => expand_late_quantifier(false, element_rule, iterator_info, env),
        _ => None,
    }
}

fn expand_late_quantifier(
    conjunctive: bool,
    element_rule: &RuleNode,
    iterator_info: &crate::schema::IteratorInfo,
    env: &Env,
) -> Option<RuleNode> {
    let JsonValue::Array(elements) = constant_of(&iterator_info.iterable)? else {
        return None;
    };
    let conditions = elements
        .iter()
        .map(|element| {
            let substituted = substitute_name(element_rule.clone(), &iterator_info.target, element);
            resolve_rule(substituted, env)
        })
        .collect();
    Some(if conjunctive {
        RuleNode::and(conditions)
    } else {
        RuleNode::or(conditions)
    })
}

/// Replaces every `name` node (and bare-name subscript/attribute base)
/// matching `target` with a constant.
fn substitute_name(node: RuleNode, target: &str, replacement: &JsonValue) -> RuleNode {
    match node {
        RuleNode::Name { name } if name == target => RuleNode::Constant {
            value: replacement.clone(),
        },
        RuleNode::Helper { name, args } => RuleNode::Helper {
            name,
            args: args
                .into_iter()
                .map(|a| substitute_name(a, target, replacement))
                .collect(),
        },
        RuleNode::StateMethod { method, args } => RuleNode::StateMethod {
            method,
            args: args
                .into_iter()
                .map(|a| substitute_name(a, target, replacement))
                .collect(),
        },
        RuleNode::And { conditions } => RuleNode::And {
            conditions: conditions
                .into_iter()
                .map(|c| substitute_name(c, target, replacement))
                .collect(),
        },
        RuleNode::Or { conditions } => RuleNode::Or {
            conditions: conditions
                .into_iter()
                .map(|c| substitute_name(c, target, replacement))
                .collect(),
        },
        RuleNode::Not { condition } => RuleNode::Not {
            condition: Box::new(substitute_name(*condition, target, replacement)),
        },
        RuleNode::Compare { left, op, right } => RuleNode::Compare {
            left: Box::new(substitute_name(*left, target, replacement)),
            op,
            right: Box::new(substitute_name(*right, target, replacement)),
        },
        RuleNode::BinaryOp { left, op, right } => RuleNode::BinaryOp {
            left: Box::new(substitute_name(*left, target, replacement)),
            op,
            right: Box::new(substitute_name(*right, target, replacement)),
        },
        RuleNode::UnaryOp { op, operand } => RuleNode::UnaryOp {
            op,
            operand: Box::new(substitute_name(*operand, target, replacement)),
        },
        RuleNode::Conditional { test, if_true, if_false } => RuleNode::Conditional {
            test: Box::new(substitute_name(*test, target, replacement)),
            if_true: Box::new(substitute_name(*if_true, target, replacement)),
            if_false: Box::new(substitute_name(*if_false, target, replacement)),
        },
        RuleNode::Attribute { object, attr } => RuleNode::Attribute {
            object: Box::new(substitute_name(*object, target, replacement)),
            attr,
        },
        RuleNode::Subscript { value, index } => RuleNode::Subscript {
            value: Box::new(substitute_name(*value, target, replacement)),
            index: Box::new(substitute_name(*index, target, replacement)),
        },
        other => other,
    }
}

fn constant_of(node: &RuleNode) -> Option<&JsonValue> {
    match node {
        RuleNode::Constant { value } => Some(value),
        _ => None,
    }
}

fn json_to_value(json: &JsonValue) -> Option<Value> {
    match json {
        JsonValue::String(s) => Some(Value::Str(s.clone())),
        JsonValue::Number(n) => n.as_i64().map(Value::Int),
        JsonValue::Bool(b) => Some(Value::Bool(*b)),
        _ => None,
    }
}

fn json_truthiness(json: &JsonValue) -> Option<bool> {
    match json {
        JsonValue::Null => Some(false),
        JsonValue::Bool(b) => Some(*b),
        JsonValue::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        JsonValue::String(s) => Some(!s.is_empty()),
        JsonValue::Array(items) => Some(!items.is_empty()),
        JsonValue::Object(map) => Some(!map.is_empty()),
    }
}

fn subscript_json(base: &JsonValue, index: &JsonValue) -> Option<JsonValue> {
    match (base, index) {
        (JsonValue::Array(items), JsonValue::Number(n)) => {
            let i = usize::try_from(n.as_i64()?).ok()?;
            items.get(i).cloned()
        }
        (JsonValue::Object(map), JsonValue::String(key)) => map.get(key).cloned(),
        // Integer keys were stringified when the dict became a constant.
        (JsonValue::Object(map), JsonValue::Number(n)) => map.get(&n.to_string()).cloned(),
        _ => None,
    }
}

fn fold_binary(left: &JsonValue, op: BinaryOperator, right: &JsonValue) -> Option<JsonValue> {
    match (left, right) {
        (JsonValue::Number(a), JsonValue::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                return match op {
                    BinaryOperator::Add => a.checked_add(b).map(JsonValue::from),
                    BinaryOperator::Sub => a.checked_sub(b).map(JsonValue::from),
                    BinaryOperator::Mult => a.checked_mul(b).map(JsonValue::from),
                    BinaryOperator::Div => {
                        if b == 0 {
                            return None;
                        }
                        serde_json::Number::from_f64(a as f64 / b as f64).map(JsonValue::Number)
                    }
                    BinaryOperator::FloorDiv => a.checked_div_euclid(b).map(JsonValue::from),
                    BinaryOperator::Mod => a.checked_rem_euclid(b).map(JsonValue::from),
                };
            }
            let (a, b) = (a.as_f64()?, b.as_f64()?);
            let result = match op {
                BinaryOperator::Add => a + b,
                BinaryOperator::Sub => a - b,
                BinaryOperator::Mult => a * b,
                BinaryOperator::Div => {
                    if b == 0.0 {
                        return None;
                    }
                    a / b
                }
                BinaryOperator::FloorDiv => {
                    if b == 0.0 {
                        return None;
                    }
                    (a / b).floor()
                }
                BinaryOperator::Mod => {
                    if b == 0.0 {
                        return None;
                    }
                    a.rem_euclid(b)
                }
            };
            serde_json::Number::from_f64(result).map(JsonValue::Number)
        }
        (JsonValue::String(a), JsonValue::String(b)) if op == BinaryOperator::Add => {
            Some(JsonValue::String(format!("{a}{b}")))
        }
        _ => None,
    }
}

fn fold_compare(left: &JsonValue, op: CompareOp, right: &JsonValue) -> Option<bool> {
    match op {
        CompareOp::Eq | CompareOp::Is => Some(left == right),
        CompareOp::NotEq | CompareOp::IsNot => Some(left != right),
        CompareOp::Lt | CompareOp::LtE | CompareOp::Gt | CompareOp::GtE => {
            let ordering = match (left, right) {
                (JsonValue::Number(a), JsonValue::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?)?,
                (JsonValue::String(a), JsonValue::String(b)) => a.cmp(b),
                _ => return None,
            };
            Some(match op {
                CompareOp::Lt => ordering.is_lt(),
                CompareOp::LtE => ordering.is_le(),
                CompareOp::Gt => ordering.is_gt(),
                CompareOp::GtE => ordering.is_ge(),
                _ => unreachable!(),
            })
        }
        CompareOp::In | CompareOp::NotIn => {
            let contains = match right {
                JsonValue::Array(items) => items.contains(left),
                JsonValue::String(haystack) => match left {
                    JsonValue::String(needle) => haystack.contains(needle.as_str()),
                    _ => return None,
                },
                JsonValue::Object(map) => match left {
                    JsonValue::String(key) => map.contains_key(key),
                    _ => return None,
                },
                _ => return None,
            };
            Some(if op == CompareOp::In { contains } else { !contains })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IteratorInfo;

    fn env_with_global(name: &str, value: Value) -> Env {
        let mut env = Env::new();
        env.globals.insert(name.to_owned(), value);
        env
    }

    #[test]
    fn attribute_on_resolvable_name_folds() {
        let mut attrs = indexmap::IndexMap::new();
        attrs.insert("damage".to_owned(), Value::Int(4));
        let env = env_with_global(
            "sword",
            Value::Object {
                class: "Weapon".to_owned(),
                attrs,
            },
        );
        let node = RuleNode::Attribute {
            object: Box::new(RuleNode::Name {
                name: "sword".to_owned(),
            }),
            attr: "damage".to_owned(),
        };
        assert_eq!(resolve_rule(node, &env), RuleNode::constant(4));
    }

    #[test]
    fn unresolvable_self_attribute_passes_through() {
        let node = RuleNode::Attribute {
            object: Box::new(RuleNode::Name {
                name: "self".to_owned(),
            }),
            attr: "story_tech_granted".to_owned(),
        };
        assert_eq!(resolve_rule(node.clone(), &Env::new()), node);
    }

    #[test]
    fn constant_subscript_chain_folds() {
        let node = RuleNode::Subscript {
            value: Box::new(RuleNode::constant(serde_json::json!({"ANCIENT": {"X": 1}}))),
            index: Box::new(RuleNode::constant("ANCIENT")),
        };
        assert_eq!(resolve_rule(node, &Env::new()), RuleNode::constant(serde_json::json!({"X": 1})));
    }

    #[test]
    fn constant_arithmetic_folds() {
        let node = RuleNode::BinaryOp {
            left: Box::new(RuleNode::constant(7)),
            op: BinaryOperator::FloorDiv,
            right: Box::new(RuleNode::constant(2)),
        };
        assert_eq!(resolve_rule(node, &Env::new()), RuleNode::constant(3));
    }

    #[test]
    fn late_quantifier_expands_when_iterable_resolves() {
        let env = env_with_global(
            "keys",
            Value::List(vec![Value::Str("A".to_owned()), Value::Str("B".to_owned())]),
        );
        let node = RuleNode::AnyOf {
            element_rule: Box::new(RuleNode::Name { name: "k".to_owned() }),
            iterator_info: IteratorInfo {
                target: "k".to_owned(),
                iterable: Box::new(RuleNode::Name { name: "keys".to_owned() }),
            },
        };
        let resolved = resolve_rule(node, &env);
        assert_eq!(
            resolved,
            RuleNode::Or {
                conditions: vec![RuleNode::constant("A"), RuleNode::constant("B")],
            }
        );
    }

    #[test]
    fn folding_is_idempotent() {
        let node = RuleNode::And {
            conditions: vec![
                RuleNode::item("Sword"),
                RuleNode::BinaryOp {
                    left: Box::new(RuleNode::constant(1)),
                    op: BinaryOperator::Add,
                    right: Box::new(RuleNode::constant(2)),
                },
            ],
        };
        let once = resolve_rule(node, &Env::new());
        let twice = resolve_rule(once.clone(), &Env::new());
        assert_eq!(once, twice);
    }
}
