use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use rulegraph::{
    AccessRule, DiagnosticKind, Entrance, Env, ExportOptions, Exporter, FunctionSource, HandlerRegistry, ItemDef,
    Location, PlacedItem, Predicate, Region, RuleNode, RulesDocument, Value, World,
};

fn lambda_rule(id: u64, source: &str) -> AccessRule {
    AccessRule::new(id, Predicate::Lambda(FunctionSource::lambda(source, Env::new())))
}

fn item(id: i64, advancement: bool, groups: &[&str]) -> ItemDef {
    ItemDef {
        id: Some(id),
        advancement,
        groups: groups.iter().map(|g| (*g).to_owned()).collect(),
        ..ItemDef::default()
    }
}

/// A small but complete world: two regions, a gated exit, a gated
/// location, an event placement, and a precollected item.
fn sample_world() -> World {
    let mut items = IndexMap::new();
    items.insert("Zephyr Blade".to_owned(), item(1, true, &["Weapons"]));
    items.insert("Anchor".to_owned(), item(2, true, &["Weapons", "Tools"]));
    items.insert("Old Map".to_owned(), item(3, false, &[]));

    let mut options = IndexMap::new();
    options.insert("difficulty".to_owned(), Value::Str("hard".to_owned()));
    options.insert("shuffle_portals".to_owned(), Value::Bool(true));

    World {
        game: "Test Game".to_owned(),
        player: 1,
        options,
        origin_region: None,
        regions: vec![
            Region {
                name: "Menu".to_owned(),
                exits: vec![Entrance {
                    name: "Menu -> Harbor".to_owned(),
                    parent_region: "Menu".to_owned(),
                    target_region: "Harbor".to_owned(),
                    access_rule: None,
                }],
                locations: Vec::new(),
            },
            Region {
                name: "Harbor".to_owned(),
                exits: vec![Entrance {
                    name: "Harbor -> Depths".to_owned(),
                    parent_region: "Harbor".to_owned(),
                    target_region: "Depths".to_owned(),
                    access_rule: Some(lambda_rule(10, "lambda state: state.has(\"Anchor\", player)")),
                }],
                locations: vec![
                    Location {
                        name: "Harbor Chest".to_owned(),
                        id: Some(100),
                        parent_region: "Harbor".to_owned(),
                        access_rule: Some(lambda_rule(11, "lambda state: state.has(\"Zephyr Blade\", player)")),
                        item_rule: None,
                        item: Some(PlacedItem {
                            name: "Old Map".to_owned(),
                            player: 1,
                            id: Some(3),
                            advancement: false,
                            useful: false,
                            trap: false,
                        }),
                    },
                    Location {
                        name: "Harbor Beacon".to_owned(),
                        id: None,
                        parent_region: "Harbor".to_owned(),
                        access_rule: None,
                        item_rule: None,
                        item: Some(PlacedItem {
                            name: "Beacon Lit".to_owned(),
                            player: 1,
                            id: None,
                            advancement: true,
                            useful: false,
                            trap: false,
                        }),
                    },
                ],
            },
            Region {
                name: "Depths".to_owned(),
                exits: Vec::new(),
                locations: Vec::new(),
            },
        ],
        items,
        precollected: vec!["Zephyr Blade".to_owned()],
        module_source: None,
        module_dir: Some("test_game".to_owned()),
        logic: None,
    }
}

fn export(world: World) -> rulegraph::ExportOutput {
    let registry = HandlerRegistry::new();
    let mut worlds = [world];
    Exporter::new(&registry).export(&mut worlds).expect("export should succeed")
}

#[test]
fn document_tables_are_complete_and_ordered() {
    let output = export(sample_world());
    let document = &output.document;

    // Regions in declaration order.
    let region_names: Vec<&str> = document.regions[&1].iter().map(|r| r.name.as_str()).collect();
    assert_eq!(region_names, ["Menu", "Harbor", "Depths"]);

    // Locations sorted by name, but region location lists keep in-region
    // declaration order.
    let location_names: Vec<&str> = document.locations[&1].iter().map(|l| l.name.as_str()).collect();
    assert_eq!(location_names, ["Harbor Beacon", "Harbor Chest"]);
    assert_eq!(
        document.regions[&1][1].locations,
        vec!["Harbor Chest".to_owned(), "Harbor Beacon".to_owned()]
    );

    // Items sorted by name, with the placed event synthesized.
    let item_names: Vec<&str> = document.items[&1].keys().map(String::as_str).collect();
    assert_eq!(item_names, ["Anchor", "Beacon Lit", "Old Map", "Zephyr Blade"]);
    let beacon = &document.items[&1]["Beacon Lit"];
    assert!(beacon.event && beacon.advancement && beacon.id.is_none());

    // Group memberships, sorted.
    assert_eq!(
        document.item_name_groups[&1]["Weapons"],
        vec!["Anchor".to_owned(), "Zephyr Blade".to_owned()]
    );

    // The gated exit carries its analyzed rule.
    let harbor = &document.regions[&1][1];
    assert_eq!(harbor.exits[0].target, "Depths");
    assert_eq!(harbor.exits[0].rule, Some(RuleNode::item("Anchor")));

    // Start region resolution: no declared origin, Menu is the unique root.
    assert_eq!(document.start_regions[&1].as_deref(), Some("Menu"));

    // Settings fall back to the world options.
    assert_eq!(document.settings[&1]["difficulty"], serde_json::json!("hard"));
    assert_eq!(document.settings[&1]["shuffle_portals"], serde_json::json!(true));

    assert_eq!(output.game_slug, "test_game");
    assert!(output.diagnostics.is_empty(), "clean world exports without warnings: {:?}", output.diagnostics);
}

#[test]
fn export_is_idempotent() {
    let first = serde_json::to_string(&export(sample_world()).document).unwrap();
    let second = serde_json::to_string(&export(sample_world()).document).unwrap();
    assert_eq!(first, second);
}

#[test]
fn document_round_trips_byte_identical() {
    let output = export(sample_world());
    let json = serde_json::to_string(&output.document).unwrap();
    let reparsed: RulesDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(serde_json::to_string(&reparsed).unwrap(), json);
}

#[test]
fn declared_origin_region_wins_start_region_resolution() {
    let mut world = sample_world();
    world.origin_region = Some("Harbor".to_owned());
    let output = export(world);
    assert_eq!(output.document.start_regions[&1].as_deref(), Some("Harbor"));
}

#[test]
fn opaque_predicate_degrades_to_null_rule_with_warning() {
    let mut world = sample_world();
    world.regions[1].locations[0].access_rule = Some(AccessRule::new(
        99,
        Predicate::Opaque {
            repr: "<bound method of native object>".to_owned(),
        },
    ));
    let output = export(world);
    let chest = output.document.locations[&1]
        .iter()
        .find(|l| l.name == "Harbor Chest")
        .unwrap();
    assert_eq!(chest.access_rule, None, "unanalyzable rule exports as an explicit null");
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::ExtractionFailure && d.target.as_deref() == Some("Harbor Chest")),
        "extraction failure is reported against the location: {:?}",
        output.diagnostics
    );
}

#[test]
fn missing_item_references_are_reported() {
    let mut world = sample_world();
    world.regions[1].locations[0].access_rule =
        Some(lambda_rule(42, "lambda state: state.has(\"Ghost Item\", player)"));
    let output = export(world);
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::MissingItem && d.message.contains("Ghost Item")),
        "missing item should be diagnosed: {:?}",
        output.diagnostics
    );
}

#[test]
fn helper_preservation_keeps_bodies_out_of_the_tree() {
    let mut env = Env::new();
    env.globals.insert(
        "can_dive".to_owned(),
        Value::Function(FunctionSource {
            name: "can_dive".to_owned(),
            source: "def can_dive(state):\n    return state.has(\"Flippers\", player)\n".to_owned(),
            col_offset: 0,
            env: Env::new(),
        }),
    );
    let mut world = sample_world();
    world.regions[1].locations[0].access_rule = Some(AccessRule::new(
        50,
        Predicate::Lambda(FunctionSource::lambda("lambda s: can_dive(s)", env)),
    ));
    let output = export(world);
    let rule = output.document.locations[&1]
        .iter()
        .find(|l| l.name == "Harbor Chest")
        .and_then(|l| l.access_rule.as_ref())
        .unwrap();
    assert_eq!(
        rule,
        &RuleNode::Helper {
            name: "can_dive".to_owned(),
            args: vec![],
        }
    );
    let mut saw_inlined_body = false;
    rule.walk(&mut |node| {
        if matches!(node, RuleNode::ItemCheck { item, .. } if item == "Flippers") {
            saw_inlined_body = true;
        }
    });
    assert!(!saw_inlined_body, "preserved helper must not be inlined");
}

#[test]
fn multiworld_export_keys_every_table_by_player() {
    let mut second = sample_world();
    second.player = 2;
    // An event placed in world 2 that belongs to player 1 lands in player
    // 1's item table.
    second.regions[1].locations[1].item = Some(PlacedItem {
        name: "Foreign Beacon".to_owned(),
        player: 1,
        id: None,
        advancement: true,
        useful: false,
        trap: false,
    });
    let registry = HandlerRegistry::new();
    let mut worlds = [sample_world(), second];
    let output = Exporter::new(&registry).export(&mut worlds).expect("export should succeed");
    let document = &output.document;

    assert_eq!(document.locations.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert!(document.items[&1].contains_key("Foreign Beacon"));
    assert!(!document.items[&2].contains_key("Foreign Beacon"));
    assert!(document.items[&1]["Foreign Beacon"].event);
}

#[test]
fn pretty_and_compact_output_options_are_honored() {
    let registry = HandlerRegistry::new();
    let output_root = std::env::temp_dir().join(format!("rulegraph_test_{}", std::process::id()));
    let mut worlds = [sample_world()];
    let (path, _) = rulegraph::export_to_dir(
        &mut worlds,
        &registry,
        ExportOptions::default(),
        &output_root,
        "SEED42",
    )
    .expect("write should succeed");
    assert!(path.ends_with("test_game/SEED42/SEED42_rules.json"));
    let written = std::fs::read_to_string(&path).unwrap();
    let reparsed: RulesDocument = serde_json::from_str(&written).unwrap();
    assert_eq!(reparsed.game, "Test Game");
    std::fs::remove_dir_all(&output_root).ok();
}
