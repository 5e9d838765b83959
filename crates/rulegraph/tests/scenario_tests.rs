use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use rulegraph::{
    AccessRule, Analyzer, Diagnostics, Env, Exporter, FunctionSource, GameHandler, GenericHandler, HandlerRegistry,
    Location, Predicate, Region, RuleCache, RuleNode, Value, World,
};

fn empty_world(game: &str) -> World {
    World {
        game: game.to_owned(),
        player: 1,
        options: IndexMap::new(),
        origin_region: None,
        regions: Vec::new(),
        items: IndexMap::new(),
        precollected: Vec::new(),
        module_source: None,
        module_dir: None,
        logic: None,
    }
}

fn lambda_rule(id: u64, source: &str, env: Env) -> AccessRule {
    AccessRule::new(id, Predicate::Lambda(FunctionSource::lambda(source, env)))
}

/// Runs the analyzer the way the exporter does for one rule.
fn analyze(world: &World, handler: &dyn GameHandler, rule: &AccessRule, target: &str) -> Option<RuleNode> {
    let mut diagnostics = Diagnostics::new();
    let mut cache = RuleCache::default();
    let mut analyzer = Analyzer::new(world, handler, &mut diagnostics, &mut cache, false);
    analyzer.analyze_rule(rule, target)
}

fn region_object(code: &str) -> Value {
    let mut attrs = IndexMap::new();
    attrs.insert("code".to_owned(), Value::Str(code.to_owned()));
    Value::Object {
        class: "Region".to_owned(),
        attrs,
    }
}

#[test]
fn closure_list_of_region_objects_expands_to_event_checks() {
    let mut env = Env::new();
    env.cells.insert(
        "regions".to_owned(),
        Value::List(vec![region_object("a"), region_object("b")]),
    );
    let world = empty_world("Test Game");
    let rule = lambda_rule(
        1,
        "lambda state: state.has_all([f\"event_{r.code}\" for r in regions], player)",
        env,
    );
    let node = analyze(&world, &GenericHandler, &rule, "Gate").expect("rule should analyze");
    assert_eq!(
        node,
        RuleNode::And {
            conditions: vec![RuleNode::item("event_a"), RuleNode::item("event_b")],
        }
    );
}

#[test]
fn bare_state_method_wrappers_specialize_instead_of_preserving() {
    // Module-level wrappers of the state methods are called without the
    // state receiver; the name itself is recognized, and recognition
    // outranks the has_/can_ preserve heuristic.
    let mut env = Env::new();
    env.globals.insert("R1".to_owned(), region_object("a"));
    env.globals.insert("R2".to_owned(), region_object("b"));
    let world = empty_world("Test Game");
    let rule = lambda_rule(
        20,
        "lambda state: has_all([f\"event_{r.code}\" for r in [R1, R2]])",
        env,
    );
    let node = analyze(&world, &GenericHandler, &rule, "Gate").expect("rule should analyze");
    assert_eq!(
        node,
        RuleNode::And {
            conditions: vec![RuleNode::item("event_a"), RuleNode::item("event_b")],
        }
    );
}

#[test]
fn enum_keyed_requirement_table_resolves_by_member_value() {
    let ancient = Value::Enum {
        class: "EraType".to_owned(),
        member: "ANCIENT".to_owned(),
        value: Box::new(Value::Str("ANCIENT".to_owned())),
    };
    let mut era_attrs = IndexMap::new();
    era_attrs.insert("ANCIENT".to_owned(), ancient.clone());
    let mut env = Env::new();
    env.globals.insert(
        "EraType".to_owned(),
        Value::Object {
            class: "EnumMeta".to_owned(),
            attrs: era_attrs,
        },
    );
    env.globals.insert(
        "era_requirements".to_owned(),
        Value::Dict(vec![(
            ancient,
            Value::Dict(vec![
                (Value::Str("X".to_owned()), Value::Int(1)),
                (Value::Str("Y".to_owned()), Value::Int(2)),
            ]),
        )]),
    );
    let world = empty_world("Test Game");
    let rule = lambda_rule(
        2,
        "lambda state: state.has_all_counts(era_requirements[EraType.ANCIENT], player)",
        env,
    );
    let node = analyze(&world, &GenericHandler, &rule, "Era Gate").expect("rule should analyze");
    assert_eq!(
        node,
        RuleNode::StateMethod {
            method: "has_all_counts".to_owned(),
            args: vec![RuleNode::constant(serde_json::json!({"X": 1, "Y": 2}))],
        }
    );
}

#[test]
fn any_over_generator_with_closure_iterator_expands_to_disjunction() {
    let mut env = Env::new();
    env.cells.insert(
        "keys".to_owned(),
        Value::List(vec![
            Value::Str("A".to_owned()),
            Value::Str("B".to_owned()),
            Value::Str("C".to_owned()),
        ]),
    );
    let world = empty_world("Test Game");
    let rule = lambda_rule(3, "lambda s: any(s.has(k, player) for k in keys)", env);
    let node = analyze(&world, &GenericHandler, &rule, "Key Door").expect("rule should analyze");
    assert_eq!(
        node,
        RuleNode::Or {
            conditions: vec![RuleNode::item("A"), RuleNode::item("B"), RuleNode::item("C")],
        }
    );
}

struct InlineEverything;

impl GameHandler for InlineEverything {
    fn should_preserve_as_helper(&self, _name: &str) -> bool {
        false
    }
}

fn can_surf_env() -> Env {
    let mut env = Env::new();
    env.globals.insert(
        "can_surf".to_owned(),
        Value::Function(FunctionSource {
            name: "can_surf".to_owned(),
            source: "def can_surf(state):\n    return state.has(\"Surf\", player)\n".to_owned(),
            col_offset: 0,
            env: Env::new(),
        }),
    );
    env
}

#[test]
fn preserved_helper_stays_a_named_reference() {
    let world = empty_world("Test Game");
    let rule = lambda_rule(4, "lambda s: can_surf(s)", can_surf_env());
    let node = analyze(&world, &GenericHandler, &rule, "Water").expect("rule should analyze");
    assert_eq!(
        node,
        RuleNode::Helper {
            name: "can_surf".to_owned(),
            args: vec![],
        }
    );
}

#[test]
fn unpreserved_helper_is_inlined() {
    let world = empty_world("Test Game");
    let rule = lambda_rule(5, "lambda s: can_surf(s)", can_surf_env());
    let node = analyze(&world, &InlineEverything, &rule, "Water").expect("rule should analyze");
    assert_eq!(node, RuleNode::item("Surf"));
}

#[test]
fn reserved_self_survives_as_attribute_access() {
    let world = empty_world("Test Game");
    let rule = lambda_rule(6, "lambda s: s and self.story_tech_granted", Env::new());
    let node = analyze(&world, &GenericHandler, &rule, "Story Gate").expect("rule should analyze");
    assert_eq!(
        node,
        RuleNode::And {
            conditions: vec![
                RuleNode::constant(true),
                RuleNode::Attribute {
                    object: Box::new(RuleNode::Name {
                        name: "self".to_owned(),
                    }),
                    attr: "story_tech_granted".to_owned(),
                },
            ],
        }
    );
}

/// Gives every shop slot its own rule identity, with a rule that excludes
/// the sibling slot, before analysis runs.
struct ShopHandler;

impl GameHandler for ShopHandler {
    fn postprocess_regions(&self, world: &mut World) {
        for region in &mut world.regions {
            if region.name != "Shop" {
                continue;
            }
            let names: Vec<String> = region.locations.iter().map(|l| l.name.clone()).collect();
            for (i, location) in region.locations.iter_mut().enumerate() {
                let sibling = names
                    .iter()
                    .enumerate()
                    .find(|(j, _)| *j != i)
                    .map(|(_, name)| name.clone())
                    .expect("shop has two slots");
                let source = format!(
                    "lambda state: state.has(\"Coin\", player) and not state.can_reach_location(\"{sibling}\", player)"
                );
                location.access_rule = Some(AccessRule::new(
                    9000 + i as u64,
                    Predicate::Lambda(FunctionSource::lambda(source, Env::new())),
                ));
            }
        }
    }
}

#[test]
fn shop_slots_get_distinct_context_sensitive_rules() {
    let shared = lambda_rule(7, "lambda state: state.has(\"Coin\", player)", Env::new());
    let mut world = empty_world("Test Game");
    world.regions.push(Region {
        name: "Shop".to_owned(),
        exits: Vec::new(),
        locations: vec![
            Location {
                name: "Shop Slot 1".to_owned(),
                id: Some(11),
                parent_region: "Shop".to_owned(),
                access_rule: Some(shared.clone()),
                item_rule: None,
                item: None,
            },
            Location {
                name: "Shop Slot 2".to_owned(),
                id: Some(12),
                parent_region: "Shop".to_owned(),
                access_rule: Some(shared),
                item_rule: None,
                item: None,
            },
        ],
    });
    world.items.insert("Coin".to_owned(), rulegraph::ItemDef {
        id: Some(1),
        advancement: true,
        ..rulegraph::ItemDef::default()
    });

    let mut registry = HandlerRegistry::new();
    registry.register("Test Game", Box::new(ShopHandler));
    let output = Exporter::new(&registry)
        .export(std::slice::from_mut(&mut world))
        .expect("export should succeed");

    let locations = &output.document.locations[&1];
    let slot1 = locations
        .iter()
        .find(|l| l.name == "Shop Slot 1")
        .and_then(|l| l.access_rule.as_ref())
        .expect("slot 1 has a rule");
    let slot2 = locations
        .iter()
        .find(|l| l.name == "Shop Slot 2")
        .and_then(|l| l.access_rule.as_ref())
        .expect("slot 2 has a rule");
    assert_ne!(slot1, slot2, "sibling slots must not share one rule tree");

    let mentions = |node: &RuleNode, needle: &str| {
        let mut found = false;
        node.walk(&mut |n| {
            if let RuleNode::LocationCheck { location } = n
                && location == needle
            {
                found = true;
            }
        });
        found
    };
    assert!(mentions(slot1, "Shop Slot 2"), "slot 1 excludes its sibling");
    assert!(mentions(slot2, "Shop Slot 1"), "slot 2 excludes its sibling");
}

#[test]
fn shared_rule_objects_analyze_to_identical_trees() {
    let shared = lambda_rule(8, "lambda state: state.has(\"Hammer\", player)", Env::new());
    let world = empty_world("Test Game");
    let first = analyze(&world, &GenericHandler, &shared, "Location A");
    let second = analyze(&world, &GenericHandler, &shared, "Location B");
    assert_eq!(first, second);
}
