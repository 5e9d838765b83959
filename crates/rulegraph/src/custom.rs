use crate::schema::RuleNode;

/// Reach targets distinguish which reachability table the rule consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ReachKind {
    Region,
    Location,
    Entrance,
}

/// Typed access-rule objects used by games that build predicates as data
/// rather than closures.
///
/// Detection is by class-qualified name (the serde `class` tag), never by
/// attribute sniffing: a game-specific class that happens to expose an
/// `item` attribute must not be mistaken for `Received`. Classes outside
/// this taxonomy arrive as [`CustomRule::Unknown`] and serialize to `None`,
/// which the exporter turns into a loud warning and an explicit `null` rule.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "class")]
pub enum CustomRule {
    Received {
        item: String,
        player: u32,
        #[serde(default = "default_count")]
        count: u64,
    },
    And {
        rules: Vec<CustomRule>,
    },
    Or {
        rules: Vec<CustomRule>,
    },
    True_,
    False_,
    Has {
        rule: Box<CustomRule>,
    },
    Count {
        count: u64,
        rules: Vec<CustomRule>,
    },
    Reach {
        target: String,
        kind: ReachKind,
        player: u32,
    },
    TotalReceived {
        count: u64,
        items: Vec<String>,
        player: u32,
    },
    /// A custom predicate class the registry does not recognize. Carries
    /// the class name and repr for diagnostics.
    Unknown {
        name: String,
        repr: String,
    },
}

fn default_count() -> u64 {
    1
}

/// Serializes a custom rule into the rule graph, or `None` for unknown
/// class shapes.
pub fn serialize_rule(rule: &CustomRule) -> Option<RuleNode> {
    match rule {
        CustomRule::Received { item, count, .. } => Some(RuleNode::ItemCheck {
            item: item.clone(),
            count: (*count > 1).then_some(*count),
        }),
        CustomRule::And { rules } => Some(RuleNode::and(serialize_all(rules)?)),
        CustomRule::Or { rules } => Some(RuleNode::or(serialize_all(rules)?)),
        CustomRule::True_ => Some(RuleNode::constant(true)),
        CustomRule::False_ => Some(RuleNode::constant(false)),
        CustomRule::Has { rule } => serialize_rule(rule),
        CustomRule::Count { count, rules } => {
            let serialized = serialize_all(rules)?;
            let count = usize::try_from(*count).ok()?;
            if count == 1 {
                Some(RuleNode::or(serialized))
            } else if count == rules.len() {
                Some(RuleNode::and(serialized))
            } else {
                // n-of-m: the runtime helper receives the threshold and the
                // serialized rule array, and evaluates each element itself.
                let rule_array = serialized
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<Result<Vec<_>, _>>()
                    .ok()?;
                Some(RuleNode::Helper {
                    name: "count_true".to_owned(),
                    args: vec![
                        RuleNode::constant(count as u64),
                        RuleNode::constant(serde_json::Value::Array(rule_array)),
                    ],
                })
            }
        }
        CustomRule::Reach { target, kind, .. } => Some(match kind {
            ReachKind::Region => RuleNode::RegionCheck { region: target.clone() },
            ReachKind::Location => RuleNode::LocationCheck {
                location: target.clone(),
            },
            ReachKind::Entrance => RuleNode::CanReachEntrance {
                entrance: target.clone(),
            },
        }),
        CustomRule::TotalReceived { count, items, .. } => Some(RuleNode::Helper {
            name: "total_received".to_owned(),
            args: vec![
                RuleNode::constant(*count),
                RuleNode::constant(serde_json::json!(items)),
            ],
        }),
        CustomRule::Unknown { .. } => None,
    }
}

fn serialize_all(rules: &[CustomRule]) -> Option<Vec<RuleNode>> {
    rules.iter().map(serialize_rule).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn received(item: &str, count: u64) -> CustomRule {
        CustomRule::Received {
            item: item.to_owned(),
            player: 1,
            count,
        }
    }

    #[test]
    fn received_with_default_count_omits_count() {
        assert_eq!(serialize_rule(&received("Sword", 1)), Some(RuleNode::item("Sword")));
    }

    #[test]
    fn has_unwraps_to_the_inner_rule() {
        let rule = CustomRule::Has {
            rule: Box::new(received("Sword", 2)),
        };
        assert_eq!(
            serialize_rule(&rule),
            Some(RuleNode::ItemCheck {
                item: "Sword".to_owned(),
                count: Some(2),
            })
        );
    }

    #[test]
    fn count_of_one_lowers_to_disjunction() {
        let rule = CustomRule::Count {
            count: 1,
            rules: vec![received("A", 1), received("B", 1)],
        };
        assert_eq!(
            serialize_rule(&rule),
            Some(RuleNode::Or {
                conditions: vec![RuleNode::item("A"), RuleNode::item("B")],
            })
        );
    }

    #[test]
    fn count_of_all_lowers_to_conjunction() {
        let rule = CustomRule::Count {
            count: 2,
            rules: vec![received("A", 1), received("B", 1)],
        };
        assert_eq!(
            serialize_rule(&rule),
            Some(RuleNode::And {
                conditions: vec![RuleNode::item("A"), RuleNode::item("B")],
            })
        );
    }

    #[test]
    fn partial_count_lowers_to_count_true_helper() {
        let rule = CustomRule::Count {
            count: 2,
            rules: vec![received("A", 1), received("B", 1), received("C", 1)],
        };
        let Some(RuleNode::Helper { name, args }) = serialize_rule(&rule) else {
            panic!("expected a count_true helper");
        };
        assert_eq!(name, "count_true");
        assert_eq!(args[0], RuleNode::constant(2u64));
        let RuleNode::Constant {
            value: serde_json::Value::Array(rules),
        } = &args[1]
        else {
            panic!("expected the serialized rule array");
        };
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0]["type"], "item_check");
    }

    #[test]
    fn reach_dispatches_on_kind() {
        let rule = CustomRule::Reach {
            target: "Boss Door".to_owned(),
            kind: ReachKind::Entrance,
            player: 1,
        };
        assert_eq!(
            serialize_rule(&rule),
            Some(RuleNode::CanReachEntrance {
                entrance: "Boss Door".to_owned(),
            })
        );
    }

    #[test]
    fn unknown_class_refuses_to_serialize() {
        let rule = CustomRule::Unknown {
            name: "worlds.sc2.ItemFilter".to_owned(),
            repr: "<ItemFilter>".to_owned(),
        };
        assert_eq!(serialize_rule(&rule), None);
    }
}
