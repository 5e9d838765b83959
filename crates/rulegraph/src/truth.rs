use ahash::{AHashMap, AHashSet};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::schema::{BinaryOperator, CompareOp, RuleNode, UnaryOperator};

/// Three-valued truth for rule evaluation.
///
/// `Undefined` arises from unresolved names, unknown helpers, and
/// quantifiers whose sequence never materialized. The connectives follow
/// the Kleene tables: `and` is false if any operand is false, else
/// undefined if any is undefined; `or` is true if any operand is truthy,
/// else undefined if any is undefined. `not undefined` is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Truth {
    True,
    False,
    Undefined,
}

impl Truth {
    pub fn from_bool(b: bool) -> Self {
        if b { Self::True } else { Self::False }
    }

    pub fn negate(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Undefined => Self::Undefined,
        }
    }

    pub fn and_all(operands: impl IntoIterator<Item = Self>) -> Self {
        let mut result = Self::True;
        for operand in operands {
            match operand {
                Self::False => return Self::False,
                Self::Undefined => result = Self::Undefined,
                Self::True => {}
            }
        }
        result
    }

    pub fn or_all(operands: impl IntoIterator<Item = Self>) -> Self {
        let mut result = Self::False;
        for operand in operands {
            match operand {
                Self::True => return Self::True,
                Self::Undefined => result = Self::Undefined,
                Self::False => {}
            }
        }
        result
    }
}

/// Truthiness of an evaluated value. Any non-zero, non-empty, non-null,
/// non-false value passes; a strict `== true` comparison here would be a
/// defect.
pub fn json_truth(value: &JsonValue) -> Truth {
    Truth::from_bool(match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(items) => !items.is_empty(),
        JsonValue::Object(map) => !map.is_empty(),
    })
}

/// A helper implementation registered by name, mirroring the runtime's
/// per-game helper registry. Receives the snapshot and the evaluated
/// arguments (`None` = undefined).
pub type HelperFn = Box<dyn Fn(&Snapshot, &[Option<JsonValue>]) -> Truth>;

/// A frozen view of a player's progress: inventory, group tables, the
/// reachability sets, and the settings backing the `self` escape hatch.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub items: AHashMap<String, u64>,
    pub groups: AHashMap<String, Vec<String>>,
    pub reachable_regions: AHashSet<String>,
    pub accessible_locations: AHashSet<String>,
    pub reachable_entrances: AHashSet<String>,
    pub settings: JsonMap<String, JsonValue>,
}

impl Snapshot {
    pub fn count(&self, item: &str) -> u64 {
        self.items.get(item).copied().unwrap_or(0)
    }
}

/// Reference evaluator for emitted rule trees.
///
/// This is not part of the export pipeline; it exists so the evaluation
/// contract the schema fixes (three-valued logic, the `self` settings
/// escape hatch, helper deferral) is executable in tests against the
/// generator's ground truth.
#[derive(Default)]
pub struct Evaluator {
    helpers: AHashMap<String, HelperFn>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_helper(&mut self, name: impl Into<String>, helper: HelperFn) {
        self.helpers.insert(name.into(), helper);
    }

    pub fn truth(&self, node: &RuleNode, snapshot: &Snapshot) -> Truth {
        self.truth_with(node, snapshot, &AHashMap::new())
    }

    fn truth_with(&self, node: &RuleNode, snapshot: &Snapshot, locals: &AHashMap<String, JsonValue>) -> Truth {
        match node {
            RuleNode::Constant { value } => json_truth(value),
            RuleNode::ItemCheck { item, count } => {
                Truth::from_bool(snapshot.count(item) >= count.unwrap_or(1))
            }
            RuleNode::GroupCheck { group, count } => match snapshot.groups.get(group) {
                Some(members) => {
                    let total: u64 = members.iter().map(|m| snapshot.count(m)).sum();
                    Truth::from_bool(total >= count.unwrap_or(1))
                }
                None => Truth::Undefined,
            },
            RuleNode::GroupUniqueCheck { group, count } => match snapshot.groups.get(group) {
                Some(members) => {
                    let distinct = members.iter().filter(|m| snapshot.count(m) > 0).count() as u64;
                    Truth::from_bool(distinct >= *count)
                }
                None => Truth::Undefined,
            },
            RuleNode::LocationCheck { location } => {
                Truth::from_bool(snapshot.accessible_locations.contains(location))
            }
            RuleNode::RegionCheck { region } => Truth::from_bool(snapshot.reachable_regions.contains(region)),
            RuleNode::CanReachEntrance { entrance } => {
                Truth::from_bool(snapshot.reachable_entrances.contains(entrance))
            }
            RuleNode::Helper { name, args } => match self.helpers.get(name) {
                Some(helper) => {
                    let evaluated: Vec<Option<JsonValue>> =
                        args.iter().map(|a| self.value_with(a, snapshot, locals)).collect();
                    helper(snapshot, &evaluated)
                }
                None => Truth::Undefined,
            },
            RuleNode::StateMethod { method, args } => self.state_method_truth(method, args, snapshot, locals),
            RuleNode::And { conditions } => {
                Truth::and_all(conditions.iter().map(|c| self.truth_with(c, snapshot, locals)))
            }
            RuleNode::Or { conditions } => {
                Truth::or_all(conditions.iter().map(|c| self.truth_with(c, snapshot, locals)))
            }
            RuleNode::Not { condition } => self.truth_with(condition, snapshot, locals).negate(),
            RuleNode::Compare { left, op, right } => {
                let (Some(left), Some(right)) = (
                    self.value_with(left, snapshot, locals),
                    self.value_with(right, snapshot, locals),
                ) else {
                    return Truth::Undefined;
                };
                match compare_json(&left, *op, &right) {
                    Some(holds) => Truth::from_bool(holds),
                    None => Truth::Undefined,
                }
            }
            RuleNode::Conditional { test, if_true, if_false } => match self.truth_with(test, snapshot, locals) {
                Truth::True => self.truth_with(if_true, snapshot, locals),
                Truth::False => self.truth_with(if_false, snapshot, locals),
                Truth::Undefined => Truth::Undefined,
            },
            RuleNode::AllOf {
                element_rule,
                iterator_info,
            } => self.quantify(true, element_rule, iterator_info, snapshot, locals),
            RuleNode::AnyOf {
                element_rule,
                iterator_info,
            } => self.quantify(false, element_rule, iterator_info, snapshot, locals),
            other => match self.value_with(other, snapshot, locals) {
                Some(value) => json_truth(&value),
                None => Truth::Undefined,
            },
        }
    }

    fn quantify(
        &self,
        conjunctive: bool,
        element_rule: &RuleNode,
        iterator_info: &crate::schema::IteratorInfo,
        snapshot: &Snapshot,
        locals: &AHashMap<String, JsonValue>,
    ) -> Truth {
        let Some(JsonValue::Array(elements)) = self.value_with(&iterator_info.iterable, snapshot, locals) else {
            return Truth::Undefined;
        };
        let truths = elements.into_iter().map(|element| {
            let mut bound = locals.clone();
            bound.insert(iterator_info.target.clone(), element);
            self.truth_with(element_rule, snapshot, &bound)
        });
        if conjunctive {
            Truth::and_all(truths)
        } else {
            Truth::or_all(truths)
        }
    }

    fn state_method_truth(
        &self,
        method: &str,
        args: &[RuleNode],
        snapshot: &Snapshot,
        locals: &AHashMap<String, JsonValue>,
    ) -> Truth {
        match method {
            "has_all_counts" => {
                let Some(JsonValue::Object(counts)) = args.first().and_then(|a| self.value_with(a, snapshot, locals))
                else {
                    return Truth::Undefined;
                };
                Truth::and_all(counts.iter().map(|(item, count)| {
                    match count.as_u64() {
                        Some(count) => Truth::from_bool(snapshot.count(item) >= count),
                        None => Truth::Undefined,
                    }
                }))
            }
            "has_from_list" | "has_from_list_unique" => {
                let Some(JsonValue::Array(items)) = args.first().and_then(|a| self.value_with(a, snapshot, locals))
                else {
                    return Truth::Undefined;
                };
                let Some(needed) = args.get(1).and_then(|a| self.value_with(a, snapshot, locals)).and_then(|v| v.as_u64())
                else {
                    return Truth::Undefined;
                };
                let names: Vec<&str> = items.iter().filter_map(JsonValue::as_str).collect();
                let total: u64 = if method == "has_from_list" {
                    names.iter().map(|n| snapshot.count(n)).sum()
                } else {
                    names.iter().filter(|n| snapshot.count(n) > 0).count() as u64
                };
                Truth::from_bool(total >= needed)
            }
            _ => Truth::Undefined,
        }
    }

    fn value_with(
        &self,
        node: &RuleNode,
        snapshot: &Snapshot,
        locals: &AHashMap<String, JsonValue>,
    ) -> Option<JsonValue> {
        match node {
            RuleNode::Constant { value } => Some(value.clone()),
            RuleNode::Name { name } => locals.get(name).cloned(),
            RuleNode::StateMethod { method, args } if method == "count" => {
                let item = args.first().and_then(|a| self.value_with(a, snapshot, locals))?;
                Some(JsonValue::from(snapshot.count(item.as_str()?)))
            }
            RuleNode::Attribute { object, attr } => match &**object {
                // The documented escape hatch: attribute access on the
                // reserved `self` name reads the player's settings.
                RuleNode::Name { name } if name == "self" => snapshot.settings.get(attr).cloned(),
                _ => match self.value_with(object, snapshot, locals)? {
                    JsonValue::Object(map) => map.get(attr).cloned(),
                    _ => None,
                },
            },
            RuleNode::Subscript { value, index } => {
                let base = self.value_with(value, snapshot, locals)?;
                let index = self.value_with(index, snapshot, locals)?;
                match (base, index) {
                    (JsonValue::Array(items), JsonValue::Number(n)) => {
                        items.get(usize::try_from(n.as_i64()?).ok()?).cloned()
                    }
                    (JsonValue::Object(map), JsonValue::String(key)) => map.get(&key).cloned(),
                    (JsonValue::Object(map), JsonValue::Number(n)) => map.get(&n.to_string()).cloned(),
                    _ => None,
                }
            }
            RuleNode::BinaryOp { left, op, right } => {
                let left = self.value_with(left, snapshot, locals)?;
                let right = self.value_with(right, snapshot, locals)?;
                binary_json(&left, *op, &right)
            }
            RuleNode::UnaryOp { op, operand } => {
                let value = self.value_with(operand, snapshot, locals)?;
                match op {
                    UnaryOperator::Neg => {
                        if let Some(i) = value.as_i64() {
                            Some(JsonValue::from(-i))
                        } else {
                            serde_json::Number::from_f64(-value.as_f64()?).map(JsonValue::Number)
                        }
                    }
                    UnaryOperator::Pos => Some(value),
                    UnaryOperator::Not => match json_truth(&value) {
                        Truth::True => Some(JsonValue::Bool(false)),
                        Truth::False => Some(JsonValue::Bool(true)),
                        Truth::Undefined => None,
                    },
                }
            }
            RuleNode::Conditional { test, if_true, if_false } => match self.truth_with(test, snapshot, locals) {
                Truth::True => self.value_with(if_true, snapshot, locals),
                Truth::False => self.value_with(if_false, snapshot, locals),
                Truth::Undefined => None,
            },
            // Boolean-valued node kinds surface as their truth value;
            // undefined stays undefined.
            other => match self.truth_with(other, snapshot, locals) {
                Truth::True => Some(JsonValue::Bool(true)),
                Truth::False => Some(JsonValue::Bool(false)),
                Truth::Undefined => None,
            },
        }
    }
}

fn compare_json(left: &JsonValue, op: CompareOp, right: &JsonValue) -> Option<bool> {
    match op {
        CompareOp::Eq | CompareOp::Is => Some(json_eq(left, right)),
        CompareOp::NotEq | CompareOp::IsNot => Some(!json_eq(left, right)),
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
                JsonValue::Array(items) => items.iter().any(|i| json_eq(i, left)),
                JsonValue::String(haystack) => haystack.contains(left.as_str()?),
                JsonValue::Object(map) => map.contains_key(left.as_str()?),
                _ => return None,
            };
            Some(if op == CompareOp::In { contains } else { !contains })
        }
    }
}

/// Equality with numeric coercion, matching the host language's `1 == 1.0`.
fn json_eq(left: &JsonValue, right: &JsonValue) -> bool {
    match (left, right) {
        (JsonValue::Number(a), JsonValue::Number(b)) => a.as_f64() == b.as_f64(),
        (JsonValue::Bool(a), JsonValue::Number(b)) | (JsonValue::Number(b), JsonValue::Bool(a)) => {
            b.as_f64() == Some(f64::from(u8::from(*a)))
        }
        (a, b) => a == b,
    }
}

fn binary_json(left: &JsonValue, op: BinaryOperator, right: &JsonValue) -> Option<JsonValue> {
    match (left, right) {
        (JsonValue::Number(a), JsonValue::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                match op {
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
                }
            } else {
                let (a, b) = (a.as_f64()?, b.as_f64()?);
                let result = match op {
                    BinaryOperator::Add => a + b,
                    BinaryOperator::Sub => a - b,
                    BinaryOperator::Mult => a * b,
                    BinaryOperator::Div | BinaryOperator::FloorDiv | BinaryOperator::Mod => {
                        if b == 0.0 {
                            return None;
                        }
                        match op {
                            BinaryOperator::Div => a / b,
                            BinaryOperator::FloorDiv => (a / b).floor(),
                            _ => a.rem_euclid(b),
                        }
                    }
                };
                serde_json::Number::from_f64(result).map(JsonValue::Number)
            }
        }
        (JsonValue::String(a), JsonValue::String(b)) if op == BinaryOperator::Add => {
            Some(JsonValue::String(format!("{a}{b}")))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_passes_truthy_numbers() {
        // Strict `== true` here would be a defect.
        let node = RuleNode::Or {
            conditions: vec![RuleNode::constant(1), RuleNode::constant(false)],
        };
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.truth(&node, &Snapshot::default()), Truth::True);
    }

    #[test]
    fn undefined_comparison_operand_poisons_the_comparison() {
        let node = RuleNode::Compare {
            left: Box::new(RuleNode::Name { name: "mystery".to_owned() }),
            op: CompareOp::Lt,
            right: Box::new(RuleNode::constant(3)),
        };
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.truth(&node, &Snapshot::default()), Truth::Undefined);
    }

    #[test]
    fn self_attribute_reads_settings() {
        let node = RuleNode::Attribute {
            object: Box::new(RuleNode::Name { name: "self".to_owned() }),
            attr: "story_tech_granted".to_owned(),
        };
        let mut snapshot = Snapshot::default();
        snapshot
            .settings
            .insert("story_tech_granted".to_owned(), JsonValue::Bool(true));
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.truth(&node, &snapshot), Truth::True);
    }

    #[test]
    fn unknown_helper_is_undefined() {
        let node = RuleNode::Helper {
            name: "can_levitate".to_owned(),
            args: vec![],
        };
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.truth(&node, &Snapshot::default()), Truth::Undefined);
    }
}
