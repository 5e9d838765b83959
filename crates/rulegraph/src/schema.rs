use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Value as JsonValue};
use strum::Display;

/// Comparison operators carried verbatim into the rule graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, serde::Serialize, serde::Deserialize)]
pub enum CompareOp {
    #[strum(serialize = "==")]
    #[serde(rename = "==")]
    Eq,
    #[strum(serialize = "!=")]
    #[serde(rename = "!=")]
    NotEq,
    #[strum(serialize = "<")]
    #[serde(rename = "<")]
    Lt,
    #[strum(serialize = "<=")]
    #[serde(rename = "<=")]
    LtE,
    #[strum(serialize = ">")]
    #[serde(rename = ">")]
    Gt,
    #[strum(serialize = ">=")]
    #[serde(rename = ">=")]
    GtE,
    #[strum(serialize = "in")]
    #[serde(rename = "in")]
    In,
    #[strum(serialize = "not in")]
    #[serde(rename = "not in")]
    NotIn,
    #[strum(serialize = "is")]
    #[serde(rename = "is")]
    Is,
    #[strum(serialize = "is not")]
    #[serde(rename = "is not")]
    IsNot,
}

/// Arithmetic/string operators in `binary_op` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, serde::Serialize, serde::Deserialize)]
pub enum BinaryOperator {
    #[strum(serialize = "+")]
    #[serde(rename = "+")]
    Add,
    #[strum(serialize = "-")]
    #[serde(rename = "-")]
    Sub,
    #[strum(serialize = "*")]
    #[serde(rename = "*")]
    Mult,
    #[strum(serialize = "/")]
    #[serde(rename = "/")]
    Div,
    #[strum(serialize = "//")]
    #[serde(rename = "//")]
    FloorDiv,
    #[strum(serialize = "%")]
    #[serde(rename = "%")]
    Mod,
}

/// Operators in `unary_op` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, serde::Serialize, serde::Deserialize)]
pub enum UnaryOperator {
    #[strum(serialize = "-")]
    #[serde(rename = "-")]
    Neg,
    #[strum(serialize = "+")]
    #[serde(rename = "+")]
    Pos,
    #[strum(serialize = "not")]
    #[serde(rename = "not")]
    Not,
}

/// Iterator description preserved on `all_of`/`any_of` nodes whose sequence
/// did not resolve at export time. A game handler's postprocess pass (or the
/// runtime) gets one more chance to supply the sequence.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IteratorInfo {
    /// The comprehension target name the element rule refers to.
    pub target: String,
    /// The unresolved iterable expression.
    pub iterable: Box<RuleNode>,
}

/// A node in the emitted rule graph.
///
/// The taxonomy is closed: every node kind here has fixed evaluation
/// semantics that a consumer on another runtime must reproduce, including
/// the three-valued truth rules for `and`/`or`/`not` and comparisons.
/// Serialized with a `type` discriminator.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleNode {
    /// Literal boolean/number/string/array/object.
    Constant { value: JsonValue },
    /// Player has at least `count` (default 1) of `item`.
    ItemCheck {
        item: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u64>,
    },
    /// Player has at least `count` items, summed, from `group`.
    GroupCheck {
        group: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u64>,
    },
    /// Player has at least `count` distinct items from `group`.
    GroupUniqueCheck { group: String, count: u64 },
    /// The named location is accessible.
    LocationCheck { location: String },
    /// The named region is accessible.
    RegionCheck { region: String },
    /// The named entrance is accessible.
    CanReachEntrance { entrance: String },
    /// Named helper with already-analyzed arguments; resolution deferred to
    /// the runtime's per-game helper registry.
    Helper { name: String, args: Vec<RuleNode> },
    /// Built-in state method not otherwise specialized.
    StateMethod { method: String, args: Vec<RuleNode> },
    /// Short-circuit conjunction with three-valued truth.
    And { conditions: Vec<RuleNode> },
    /// Short-circuit disjunction with three-valued truth.
    Or { conditions: Vec<RuleNode> },
    /// Logical negation; `not undefined` is `undefined`.
    Not { condition: Box<RuleNode> },
    Compare {
        left: Box<RuleNode>,
        op: CompareOp,
        right: Box<RuleNode>,
    },
    BinaryOp {
        left: Box<RuleNode>,
        op: BinaryOperator,
        right: Box<RuleNode>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<RuleNode>,
    },
    /// Ternary: evaluates `if_true` or `if_false` by the truth of `test`.
    Conditional {
        test: Box<RuleNode>,
        if_true: Box<RuleNode>,
        if_false: Box<RuleNode>,
    },
    /// Member access, resolved at evaluation time when `object` is a name
    /// or constant. `attribute` on `name: "self"` is the documented
    /// settings escape hatch.
    Attribute { object: Box<RuleNode>, attr: String },
    /// Indexing, same late-resolution rule as `attribute`.
    Subscript {
        value: Box<RuleNode>,
        index: Box<RuleNode>,
    },
    /// An unresolved reference. Emitted only when resolution genuinely
    /// fails; `name: "self"` is reserved (see `Attribute`).
    Name { name: String },
    /// Quantified conjunction over a sequence that stayed unresolved.
    AllOf {
        element_rule: Box<RuleNode>,
        iterator_info: IteratorInfo,
    },
    /// Quantified disjunction over a sequence that stayed unresolved.
    AnyOf {
        element_rule: Box<RuleNode>,
        iterator_info: IteratorInfo,
    },
}

impl RuleNode {
    pub fn constant(value: impl Into<JsonValue>) -> Self {
        Self::Constant { value: value.into() }
    }

    pub fn item(name: impl Into<String>) -> Self {
        Self::ItemCheck {
            item: name.into(),
            count: None,
        }
    }

    /// N-ary conjunction. Empty input is vacuously true (`all([])`);
    /// singleton input collapses to the lone condition.
    pub fn and(mut conditions: Vec<Self>) -> Self {
        match conditions.len() {
            0 => Self::constant(true),
            1 => conditions.remove(0),
            _ => Self::And { conditions },
        }
    }

    /// N-ary disjunction. Empty input is false (`any([])`); singleton input
    /// collapses to the lone condition.
    pub fn or(mut conditions: Vec<Self>) -> Self {
        match conditions.len() {
            0 => Self::constant(false),
            1 => conditions.remove(0),
            _ => Self::Or { conditions },
        }
    }

    /// Whether this node is the literal `true`/`false` constant.
    pub fn as_bool_constant(&self) -> Option<bool> {
        match self {
            Self::Constant { value: JsonValue::Bool(b) } => Some(*b),
            _ => None,
        }
    }

    /// Depth-first visit of this node and all children.
    pub fn walk(&self, visit: &mut impl FnMut(&Self)) {
        visit(self);
        match self {
            Self::Constant { .. }
            | Self::ItemCheck { .. }
            | Self::GroupCheck { .. }
            | Self::GroupUniqueCheck { .. }
            | Self::LocationCheck { .. }
            | Self::RegionCheck { .. }
            | Self::CanReachEntrance { .. }
            | Self::Name { .. } => {}
            Self::Helper { args, .. } | Self::StateMethod { args, .. } => {
                for arg in args {
                    arg.walk(visit);
                }
            }
            Self::And { conditions } | Self::Or { conditions } => {
                for condition in conditions {
                    condition.walk(visit);
                }
            }
            Self::Not { condition } => condition.walk(visit),
            Self::Compare { left, right, .. } | Self::BinaryOp { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Self::UnaryOp { operand, .. } => operand.walk(visit),
            Self::Conditional { test, if_true, if_false } => {
                test.walk(visit);
                if_true.walk(visit);
                if_false.walk(visit);
            }
            Self::Attribute { object, .. } => object.walk(visit),
            Self::Subscript { value, index } => {
                value.walk(visit);
                index.walk(visit);
            }
            Self::AllOf { element_rule, iterator_info } | Self::AnyOf { element_rule, iterator_info } => {
                element_rule.walk(visit);
                iterator_info.iterable.walk(visit);
            }
        }
    }

    /// Structural validity check applied to every handler-returned rule.
    ///
    /// The analyzer cannot produce an invalid node; handlers can, and a
    /// malformed rule from extension code is the one fatal export error.
    pub fn validate(&self) -> Result<(), String> {
        let mut problem = None;
        self.walk(&mut |node| {
            if problem.is_some() {
                return;
            }
            problem = match node {
                Self::ItemCheck { item, count } if item.is_empty() || *count == Some(0) => {
                    Some(format!("item_check with empty item or zero count: {node:?}"))
                }
                Self::GroupCheck { group, count } if group.is_empty() || *count == Some(0) => {
                    Some(format!("group_check with empty group or zero count: {node:?}"))
                }
                Self::GroupUniqueCheck { group, count } if group.is_empty() || *count == 0 => {
                    Some(format!("group_unique_check with empty group or zero count: {node:?}"))
                }
                Self::LocationCheck { location } if location.is_empty() => {
                    Some("location_check with empty location".to_owned())
                }
                Self::RegionCheck { region } if region.is_empty() => {
                    Some("region_check with empty region".to_owned())
                }
                Self::CanReachEntrance { entrance } if entrance.is_empty() => {
                    Some("can_reach_entrance with empty entrance".to_owned())
                }
                Self::Helper { name, .. } if name.is_empty() => Some("helper with empty name".to_owned()),
                Self::StateMethod { method, .. } if method.is_empty() => {
                    Some("state_method with empty method".to_owned())
                }
                Self::And { conditions } | Self::Or { conditions } if conditions.is_empty() => {
                    Some(format!("empty conjunction/disjunction: {node:?}"))
                }
                _ => None,
            };
        });
        match problem {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

/// The item a location holds in the emitted document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemPlacement {
    pub name: String,
    pub player: u32,
}

/// One exported item definition.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub id: Option<i64>,
    pub groups: Vec<String>,
    pub advancement: bool,
    pub useful: bool,
    pub trap: bool,
    /// True for synthetic progress tokens (locations without numeric ids).
    pub event: bool,
    #[serde(rename = "type")]
    pub type_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u64>,
}

/// One exported location.
///
/// A `null` access rule means "always accessible given the parent region is
/// reachable".
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LocationRecord {
    pub name: String,
    pub id: Option<i64>,
    pub access_rule: Option<RuleNode>,
    pub item_rule: Option<RuleNode>,
    pub item: Option<ItemPlacement>,
    pub region: String,
    pub parent_region_name: String,
    /// Extra per-location metadata supplied by the game handler.
    #[serde(default, flatten)]
    pub attributes: JsonMap<String, JsonValue>,
}

/// One exit in a region record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExitRecord {
    pub target: String,
    pub rule: Option<RuleNode>,
}

/// One exported region.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegionRecord {
    pub name: String,
    pub exits: Vec<ExitRecord>,
    pub locations: Vec<String>,
}

/// Accumulator mapping: many item names feed one virtual counter.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProgressionMapping {
    #[serde(rename = "type")]
    pub kind: ProgressionKind,
    pub base_item: String,
    /// Item name to the weight it contributes to the counter.
    pub items: IndexMap<String, i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionKind {
    Additive,
}

/// The emitted document root. Per-player tables are keyed by player id and
/// emitted in world order; JSON object keys preserve insertion order.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RulesDocument {
    pub items: IndexMap<u32, IndexMap<String, ItemRecord>>,
    pub locations: IndexMap<u32, Vec<LocationRecord>>,
    pub regions: IndexMap<u32, Vec<RegionRecord>>,
    pub settings: IndexMap<u32, JsonMap<String, JsonValue>>,
    pub progression_mapping: IndexMap<u32, IndexMap<String, ProgressionMapping>>,
    pub start_regions: IndexMap<u32, Option<String>>,
    pub item_name_groups: IndexMap<u32, IndexMap<String, Vec<String>>>,
    pub game_info: IndexMap<u32, JsonMap<String, JsonValue>>,
    pub game: String,
    pub assume_bidirectional_exits: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_nodes_serialize_with_type_discriminator() {
        let node = RuleNode::ItemCheck {
            item: "Sword".to_owned(),
            count: Some(2),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({"type": "item_check", "item": "Sword", "count": 2}));
    }

    #[test]
    fn default_count_is_omitted() {
        let json = serde_json::to_value(RuleNode::item("Sword")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "item_check", "item": "Sword"}));
    }

    #[test]
    fn compare_ops_use_source_spelling() {
        let node = RuleNode::Compare {
            left: Box::new(RuleNode::constant(1)),
            op: CompareOp::NotIn,
            right: Box::new(RuleNode::constant(serde_json::json!([1, 2]))),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["op"], "not in");
    }

    #[test]
    fn empty_conjunction_is_vacuously_true() {
        assert_eq!(RuleNode::and(vec![]), RuleNode::constant(true));
        assert_eq!(RuleNode::or(vec![]), RuleNode::constant(false));
    }

    #[test]
    fn singleton_connectives_collapse() {
        let inner = RuleNode::item("Key");
        assert_eq!(RuleNode::and(vec![inner.clone()]), inner);
    }

    #[test]
    fn validation_rejects_zero_counts() {
        let node = RuleNode::ItemCheck {
            item: "Sword".to_owned(),
            count: Some(0),
        };
        assert!(node.validate().is_err());
    }

    #[test]
    fn validation_recurses_into_children() {
        let node = RuleNode::And {
            conditions: vec![
                RuleNode::item("Sword"),
                RuleNode::Helper {
                    name: String::new(),
                    args: vec![],
                },
            ],
        };
        assert!(node.validate().is_err());
    }

    #[test]
    fn round_trip_preserves_structure() {
        let node = RuleNode::Or {
            conditions: vec![
                RuleNode::item("A"),
                RuleNode::GroupUniqueCheck {
                    group: "keys".to_owned(),
                    count: 3,
                },
            ],
        };
        let json = serde_json::to_string(&node).unwrap();
        let back: RuleNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
