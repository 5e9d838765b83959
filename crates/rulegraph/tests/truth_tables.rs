use rulegraph::{Evaluator, RuleNode, Snapshot, Truth};

/// An operand with a known evaluation result: constants for true/false, an
/// unresolved name for undefined.
fn operand(truth: Truth) -> RuleNode {
    match truth {
        Truth::True => RuleNode::constant(true),
        Truth::False => RuleNode::constant(false),
        Truth::Undefined => RuleNode::Name {
            name: "unresolved".to_owned(),
        },
    }
}

fn kleene_and(operands: &[Truth]) -> Truth {
    if operands.contains(&Truth::False) {
        Truth::False
    } else if operands.contains(&Truth::Undefined) {
        Truth::Undefined
    } else {
        Truth::True
    }
}

fn kleene_or(operands: &[Truth]) -> Truth {
    if operands.contains(&Truth::True) {
        Truth::True
    } else if operands.contains(&Truth::Undefined) {
        Truth::Undefined
    } else {
        Truth::False
    }
}

/// Every combination of {true, false, undefined} over `arity` operands.
fn combinations(arity: u32) -> Vec<Vec<Truth>> {
    let values = [Truth::True, Truth::False, Truth::Undefined];
    let mut out: Vec<Vec<Truth>> = vec![Vec::new()];
    for _ in 0..arity {
        out = out
            .into_iter()
            .flat_map(|prefix| {
                values.iter().map(move |v| {
                    let mut next = prefix.clone();
                    next.push(*v);
                    next
                })
            })
            .collect();
    }
    out
}

#[test]
fn conjunction_matches_the_kleene_table_for_every_combination() {
    let evaluator = Evaluator::new();
    let snapshot = Snapshot::default();
    for arity in 2..=3 {
        for combo in combinations(arity) {
            let node = RuleNode::And {
                conditions: combo.iter().copied().map(operand).collect(),
            };
            assert_eq!(
                evaluator.truth(&node, &snapshot),
                kleene_and(&combo),
                "and over {combo:?}"
            );
        }
    }
}

#[test]
fn disjunction_matches_the_kleene_table_for_every_combination() {
    let evaluator = Evaluator::new();
    let snapshot = Snapshot::default();
    for arity in 2..=3 {
        for combo in combinations(arity) {
            let node = RuleNode::Or {
                conditions: combo.iter().copied().map(operand).collect(),
            };
            assert_eq!(
                evaluator.truth(&node, &snapshot),
                kleene_or(&combo),
                "or over {combo:?}"
            );
        }
    }
}

#[test]
fn negation_maps_undefined_to_undefined() {
    let evaluator = Evaluator::new();
    let snapshot = Snapshot::default();
    for (input, expected) in [
        (Truth::True, Truth::False),
        (Truth::False, Truth::True),
        (Truth::Undefined, Truth::Undefined),
    ] {
        let node = RuleNode::Not {
            condition: Box::new(operand(input)),
        };
        assert_eq!(evaluator.truth(&node, &snapshot), expected, "not {input:?}");
    }
}

#[test]
fn disjunction_passes_non_boolean_truthy_primitives() {
    let evaluator = Evaluator::new();
    let snapshot = Snapshot::default();
    for truthy in [
        RuleNode::constant(1),
        RuleNode::constant("yes"),
        RuleNode::constant(serde_json::json!([1])),
        RuleNode::constant(2.5),
    ] {
        let node = RuleNode::Or {
            conditions: vec![RuleNode::constant(false), truthy.clone()],
        };
        assert_eq!(
            evaluator.truth(&node, &snapshot),
            Truth::True,
            "or should accept {truthy:?} as truthy"
        );
    }
}

#[test]
fn comparisons_with_an_undefined_operand_are_undefined() {
    let evaluator = Evaluator::new();
    let snapshot = Snapshot::default();
    for op in [
        rulegraph::CompareOp::Eq,
        rulegraph::CompareOp::Lt,
        rulegraph::CompareOp::GtE,
        rulegraph::CompareOp::In,
    ] {
        let node = RuleNode::Compare {
            left: Box::new(operand(Truth::Undefined)),
            op,
            right: Box::new(RuleNode::constant(3)),
        };
        assert_eq!(
            evaluator.truth(&node, &snapshot),
            Truth::Undefined,
            "comparison {op:?} with undefined operand"
        );
    }
}

#[test]
fn item_and_group_checks_consult_the_snapshot() {
    let evaluator = Evaluator::new();
    let mut snapshot = Snapshot::default();
    snapshot.items.insert("Bomb".to_owned(), 3);
    snapshot.items.insert("Arrow".to_owned(), 1);
    snapshot
        .groups
        .insert("Ammo".to_owned(), vec!["Bomb".to_owned(), "Arrow".to_owned()]);

    let has_two_bombs = RuleNode::ItemCheck {
        item: "Bomb".to_owned(),
        count: Some(2),
    };
    assert_eq!(evaluator.truth(&has_two_bombs, &snapshot), Truth::True);

    let group_total = RuleNode::GroupCheck {
        group: "Ammo".to_owned(),
        count: Some(4),
    };
    assert_eq!(evaluator.truth(&group_total, &snapshot), Truth::True);

    let group_distinct = RuleNode::GroupUniqueCheck {
        group: "Ammo".to_owned(),
        count: 3,
    };
    assert_eq!(evaluator.truth(&group_distinct, &snapshot), Truth::False);
}

#[test]
fn registered_helpers_evaluate_and_unknown_helpers_stay_undefined() {
    let mut evaluator = Evaluator::new();
    evaluator.register_helper(
        "can_surf",
        Box::new(|snapshot: &Snapshot, _args: &[_]| Truth::from_bool(snapshot.count("Surf") > 0)),
    );
    let mut snapshot = Snapshot::default();
    snapshot.items.insert("Surf".to_owned(), 1);

    let known = RuleNode::Helper {
        name: "can_surf".to_owned(),
        args: vec![],
    };
    assert_eq!(evaluator.truth(&known, &snapshot), Truth::True);

    let unknown = RuleNode::Helper {
        name: "can_fly".to_owned(),
        args: vec![],
    };
    assert_eq!(evaluator.truth(&unknown, &snapshot), Truth::Undefined);
}
