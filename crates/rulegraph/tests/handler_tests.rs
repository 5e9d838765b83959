use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use rulegraph::{
    AccessRule, CustomRule, Env, ExportError, Exporter, FunctionSource, GameHandler, HandlerRegistry, Location,
    Predicate, ProgressionKind, ProgressionMapping, Region, RuleContext, RuleNode, World,
};
use serde_json::{Map as JsonMap, Value as JsonValue};

fn lambda_rule(id: u64, source: &str) -> AccessRule {
    AccessRule::new(id, Predicate::Lambda(FunctionSource::lambda(source, Env::new())))
}

fn one_location_world(game: &str, rule: Option<AccessRule>) -> World {
    let mut items = IndexMap::new();
    items.insert("Lantern".to_owned(), rulegraph::ItemDef {
        id: Some(1),
        advancement: true,
        ..rulegraph::ItemDef::default()
    });
    World {
        game: game.to_owned(),
        player: 1,
        options: IndexMap::new(),
        origin_region: None,
        regions: vec![Region {
            name: "Cave".to_owned(),
            exits: Vec::new(),
            locations: vec![Location {
                name: "Cave Chest".to_owned(),
                id: Some(1),
                parent_region: "Cave".to_owned(),
                access_rule: rule,
                item_rule: None,
                item: None,
            }],
        }],
        items,
        precollected: Vec::new(),
        module_source: None,
        module_dir: None,
        logic: None,
    }
}

fn export_with(handler: Box<dyn GameHandler>, mut world: World) -> Result<rulegraph::ExportOutput, ExportError> {
    let mut registry = HandlerRegistry::new();
    registry.register(world.game.clone(), handler);
    Exporter::new(&registry).export(std::slice::from_mut(&mut world))
}

fn chest_rule(output: &rulegraph::ExportOutput) -> Option<RuleNode> {
    output.document.locations[&1]
        .iter()
        .find(|l| l.name == "Cave Chest")
        .and_then(|l| l.access_rule.clone())
}

struct CustomAndOverride;

impl GameHandler for CustomAndOverride {
    fn custom_location_access_rule(&self, location: &Location, _world: &World) -> Option<RuleNode> {
        (location.name == "Cave Chest").then(|| RuleNode::item("Custom Wins"))
    }

    fn override_rule_analysis(&self, _rule: &AccessRule, _target: &str) -> Option<RuleNode> {
        Some(RuleNode::item("Override Wins"))
    }
}

#[test]
fn custom_rule_provider_outranks_override_and_analyzer() {
    let world = one_location_world("Precedence Game", Some(lambda_rule(1, "lambda s: s.has(\"Lantern\", player)")));
    let output = export_with(Box::new(CustomAndOverride), world).expect("export should succeed");
    assert_eq!(chest_rule(&output), Some(RuleNode::item("Custom Wins")));
}

struct OverrideOnly;

impl GameHandler for OverrideOnly {
    fn override_rule_analysis(&self, _rule: &AccessRule, _target: &str) -> Option<RuleNode> {
        Some(RuleNode::item("Override Wins"))
    }
}

#[test]
fn override_outranks_the_generic_analyzer() {
    let world = one_location_world("Precedence Game", Some(lambda_rule(2, "lambda s: s.has(\"Lantern\", player)")));
    let output = export_with(Box::new(OverrideOnly), world).expect("export should succeed");
    assert_eq!(chest_rule(&output), Some(RuleNode::item("Override Wins")));
}

struct MalformedHandler;

impl GameHandler for MalformedHandler {
    fn override_rule_analysis(&self, _rule: &AccessRule, _target: &str) -> Option<RuleNode> {
        Some(RuleNode::ItemCheck {
            item: String::new(),
            count: Some(0),
        })
    }
}

#[test]
fn malformed_handler_rule_aborts_with_schema_violation() {
    let world = one_location_world("Broken Game", Some(lambda_rule(3, "lambda s: s.has(\"Lantern\", player)")));
    let err = export_with(Box::new(MalformedHandler), world).expect_err("export must abort");
    match err {
        ExportError::SchemaViolation { game, target, .. } => {
            assert_eq!(game, "Broken Game");
            assert_eq!(target, "Cave Chest");
        }
        other => panic!("expected SchemaViolation, got {other}"),
    }
}

struct RewriteHandler;

impl GameHandler for RewriteHandler {
    fn expand_rule(&self, rule: RuleNode) -> RuleNode {
        // Collapse a legacy helper spelling to the canonical item check.
        if let RuleNode::Helper { name, .. } = &rule
            && name == "has_lantern"
        {
            return RuleNode::item("Lantern");
        }
        rule
    }

    fn postprocess_rule(&self, rule: RuleNode, context: &RuleContext) -> RuleNode {
        RuleNode::And {
            conditions: vec![
                rule,
                RuleNode::RegionCheck {
                    region: format!("{} Annex", context.target),
                },
            ],
        }
    }
}

#[test]
fn expand_and_postprocess_run_in_order_with_context() {
    let world = one_location_world("Rewrite Game", Some(lambda_rule(4, "lambda s: has_lantern(s)")));
    let output = export_with(Box::new(RewriteHandler), world).expect("export should succeed");
    assert_eq!(
        chest_rule(&output),
        Some(RuleNode::And {
            conditions: vec![
                RuleNode::item("Lantern"),
                RuleNode::RegionCheck {
                    region: "Cave Chest Annex".to_owned(),
                },
            ],
        })
    );
    // The postprocess pass referenced a region outside the graph; the
    // invariant sweep reports it rather than silently passing.
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.message.contains("Cave Chest Annex")),
        "dangling region reference should be diagnosed: {:?}",
        output.diagnostics
    );
}

struct DataHandler;

impl GameHandler for DataHandler {
    fn settings_data(&self, _world: &World) -> Option<JsonMap<String, JsonValue>> {
        let mut settings = JsonMap::new();
        settings.insert("glitches".to_owned(), JsonValue::Bool(false));
        Some(settings)
    }

    fn game_info(&self, _world: &World) -> Option<JsonMap<String, JsonValue>> {
        let mut info = JsonMap::new();
        info.insert("assume_bidirectional_exits".to_owned(), JsonValue::Bool(true));
        info.insert("coin_target".to_owned(), JsonValue::from(50));
        Some(info)
    }

    fn progression_mapping(&self, _world: &World) -> Option<IndexMap<String, ProgressionMapping>> {
        let mut items = IndexMap::new();
        items.insert("Ten Coins".to_owned(), 10);
        items.insert("Fifty Coins".to_owned(), 50);
        let mut mapping = IndexMap::new();
        mapping.insert(
            "coins".to_owned(),
            ProgressionMapping {
                kind: ProgressionKind::Additive,
                base_item: "coins".to_owned(),
                items,
            },
        );
        Some(mapping)
    }

    fn location_attributes(&self, location: &Location, _world: &World) -> Option<JsonMap<String, JsonValue>> {
        let mut attrs = JsonMap::new();
        attrs.insert("shop_price".to_owned(), JsonValue::from(20));
        (location.name == "Cave Chest").then_some(attrs)
    }
}

#[test]
fn data_hooks_feed_the_document_tables() {
    let world = one_location_world("Data Game", None);
    let output = export_with(Box::new(DataHandler), world).expect("export should succeed");
    let document = &output.document;

    assert_eq!(document.settings[&1]["glitches"], JsonValue::Bool(false));
    assert!(document.assume_bidirectional_exits);
    assert_eq!(document.game_info[&1]["coin_target"], JsonValue::from(50));

    let mapping = &document.progression_mapping[&1]["coins"];
    assert_eq!(mapping.base_item, "coins");
    assert_eq!(mapping.items["Fifty Coins"], 50);
    let serialized = serde_json::to_value(mapping).unwrap();
    assert_eq!(serialized["type"], "additive");

    let chest = document.locations[&1].iter().find(|l| l.name == "Cave Chest").unwrap();
    assert_eq!(chest.attributes["shop_price"], JsonValue::from(20));
}

#[test]
fn custom_predicates_export_without_the_analyzer() {
    let rule = AccessRule::new(
        7,
        Predicate::Custom(CustomRule::Count {
            count: 2,
            rules: vec![
                CustomRule::Received {
                    item: "Lantern".to_owned(),
                    player: 1,
                    count: 1,
                },
                CustomRule::True_,
                CustomRule::Reach {
                    target: "Cave".to_owned(),
                    kind: rulegraph::ReachKind::Region,
                    player: 1,
                },
            ],
        }),
    );
    let mut world = one_location_world("Custom Game", Some(rule));
    let registry = HandlerRegistry::new();
    let output = Exporter::new(&registry)
        .export(std::slice::from_mut(&mut world))
        .expect("export should succeed");
    let Some(RuleNode::Helper { name, args }) = chest_rule(&output) else {
        panic!("2-of-3 count should become a count_true helper");
    };
    assert_eq!(name, "count_true");
    assert_eq!(args[0], RuleNode::constant(2u64));
}

#[test]
fn unknown_custom_predicate_degrades_to_null_with_warning() {
    let rule = AccessRule::new(
        8,
        Predicate::Custom(CustomRule::Unknown {
            name: "worlds.sc2.ItemFilter".to_owned(),
            repr: "<ItemFilter>".to_owned(),
        }),
    );
    let mut world = one_location_world("Custom Game", Some(rule));
    let registry = HandlerRegistry::new();
    let output = Exporter::new(&registry)
        .export(std::slice::from_mut(&mut world))
        .expect("export should succeed");
    assert_eq!(chest_rule(&output), None, "unknown shapes must export as explicit null");
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == rulegraph::DiagnosticKind::ExtractionFailure),
        "a loud structured warning is required: {:?}",
        output.diagnostics
    );
}
