use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::{
    analyze::{Analyzer, RuleCache},
    diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, ExportError},
    handler::{GameHandler, HandlerRegistry, RuleContext},
    resolve::resolve_rule,
    schema::{
        ExitRecord, ItemPlacement, ItemRecord, LocationRecord, RegionRecord, RuleNode, RulesDocument,
    },
    slug::resolve_game_slug,
    value::Env,
    world::{AccessRule, ItemDef, Predicate, World},
};

/// Per-call export configuration. No global state and no environment
/// variables influence behavior.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Opt into serializing closure values without a documented identity by
    /// their textual repr (with a warning) instead of failing the rule.
    pub allow_repr_fallback: bool,
    /// Pretty-print the emitted JSON.
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            allow_repr_fallback: false,
            pretty: true,
        }
    }
}

/// The emitted document plus everything the caller needs around it.
#[derive(Debug)]
pub struct ExportOutput {
    pub document: RulesDocument,
    pub diagnostics: Vec<Diagnostic>,
    /// Output directory slug derived from the first world.
    pub game_slug: String,
}

/// Orchestrates one export run over a list of worlds.
///
/// Single-threaded and synchronous; the only state shared between worlds is
/// the rule-analysis cache, scoped to this run. Worlds are mutated only
/// through the two documented handler hooks, and nothing is retained after
/// [`Exporter::export`] returns.
pub struct Exporter<'r> {
    registry: &'r HandlerRegistry,
    options: ExportOptions,
}

/// Event item placements discovered while walking locations, keyed by the
/// owning player.
struct PendingEvent {
    player: u32,
    name: String,
    advancement: bool,
    useful: bool,
    trap: bool,
}

impl<'r> Exporter<'r> {
    pub fn new(registry: &'r HandlerRegistry) -> Self {
        Self {
            registry,
            options: ExportOptions::default(),
        }
    }

    pub fn with_options(registry: &'r HandlerRegistry, options: ExportOptions) -> Self {
        Self { registry, options }
    }

    /// Runs the full pipeline: handler preparation, rule analysis for every
    /// location/entrance/exit, post-analysis resolution and postprocessing,
    /// and document assembly.
    pub fn export(&self, worlds: &mut [World]) -> Result<ExportOutput, ExportError> {
        let mut diagnostics = Diagnostics::new();
        let mut cache = RuleCache::default();
        let mut document = RulesDocument {
            game: worlds.first().map(|w| w.game.clone()).unwrap_or_default(),
            ..RulesDocument::default()
        };
        let mut pending_events: Vec<PendingEvent> = Vec::new();
        let mut entrance_names: ahash::AHashMap<u32, ahash::AHashSet<String>> = ahash::AHashMap::new();

        for world in worlds.iter_mut() {
            let handler = self.registry.get(&world.game);
            handler.prepare_closure_vars(world);
            handler.postprocess_regions(world);
        }

        for world in worlds.iter() {
            let handler = self.registry.get(&world.game);
            entrance_names.insert(
                world.player,
                world
                    .regions
                    .iter()
                    .flat_map(|r| r.exits.iter())
                    .map(|e| e.name.clone())
                    .collect(),
            );
            self.export_world(world, handler, &mut document, &mut diagnostics, &mut cache, &mut pending_events)?;
        }

        for event in pending_events {
            let items = document.items.entry(event.player).or_default();
            if !items.contains_key(&event.name) {
                items.insert(
                    event.name.clone(),
                    ItemRecord {
                        name: event.name,
                        id: None,
                        groups: Vec::new(),
                        advancement: event.advancement,
                        useful: event.useful,
                        trap: event.trap,
                        event: true,
                        type_tag: None,
                        max_count: None,
                    },
                );
            }
        }
        for items in document.items.values_mut() {
            items.sort_keys();
        }

        check_references(&document, &entrance_names, &mut diagnostics);

        let game_slug = worlds.first().map(resolve_game_slug).unwrap_or_default();
        Ok(ExportOutput {
            document,
            diagnostics: diagnostics.into_entries(),
            game_slug,
        })
    }

    fn export_world(
        &self,
        world: &World,
        handler: &dyn GameHandler,
        document: &mut RulesDocument,
        diagnostics: &mut Diagnostics,
        cache: &mut RuleCache,
        pending_events: &mut Vec<PendingEvent>,
    ) -> Result<(), ExportError> {
        let player = world.player;
        let mut location_records = Vec::new();
        let mut region_records = Vec::new();

        // Regions in declaration order; location lists keep their in-region
        // order for stable frontend iteration.
        for region in &world.regions {
            let mut exits = Vec::new();
            for exit in &region.exits {
                diagnostics.set_context(player, Some(exit.name.clone()));
                let rule = self.exit_rule(world, handler, exit, diagnostics, cache)?;
                exits.push(ExitRecord {
                    target: exit.target_region.clone(),
                    rule,
                });
            }
            region_records.push(RegionRecord {
                name: region.name.clone(),
                exits,
                locations: region.locations.iter().map(|l| l.name.clone()).collect(),
            });

            for location in &region.locations {
                diagnostics.set_context(player, Some(location.name.clone()));
                let access_rule = self.location_rule(world, handler, location, diagnostics, cache)?;
                let item_rule = match &location.item_rule {
                    Some(rule) => self.analyzed_rule(world, handler, rule, &location.name, diagnostics, cache)?,
                    None => None,
                };
                let item = location.item.as_ref().map(|placed| {
                    if placed.id.is_none() {
                        pending_events.push(PendingEvent {
                            player: placed.player,
                            name: placed.name.clone(),
                            advancement: placed.advancement,
                            useful: placed.useful,
                            trap: placed.trap,
                        });
                    }
                    ItemPlacement {
                        name: placed.name.clone(),
                        player: placed.player,
                    }
                });
                let attributes = handler
                    .location_attributes(location, world)
                    .unwrap_or_default();
                location_records.push(LocationRecord {
                    name: location.name.clone(),
                    id: location.id,
                    access_rule,
                    item_rule,
                    item,
                    region: location.parent_region.clone(),
                    parent_region_name: location.parent_region.clone(),
                    attributes,
                });
            }
        }
        diagnostics.set_context(player, None);

        location_records.sort_by(|a, b| a.name.cmp(&b.name));

        let mut item_records: IndexMap<String, ItemRecord> = world
            .items
            .iter()
            .map(|(name, def)| (name.clone(), item_record(name, def)))
            .collect();
        for name in &world.precollected {
            if !item_records.contains_key(name) {
                item_records.insert(
                    name.clone(),
                    ItemRecord {
                        name: name.clone(),
                        id: None,
                        groups: Vec::new(),
                        advancement: true,
                        useful: false,
                        trap: false,
                        event: true,
                        type_tag: None,
                        max_count: None,
                    },
                );
            }
        }

        let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
        for (name, def) in &world.items {
            for group in &def.groups {
                groups.entry(group.clone()).or_default().push(name.clone());
            }
        }
        groups.sort_keys();
        for members in groups.values_mut() {
            members.sort();
        }

        let settings = handler
            .settings_data(world)
            .unwrap_or_else(|| default_settings(world));
        let game_info = handler.game_info(world).unwrap_or_default();
        if game_info
            .get("assume_bidirectional_exits")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
        {
            document.assume_bidirectional_exits = true;
        }
        let progression = handler.progression_mapping(world).unwrap_or_default();

        document.items.insert(player, item_records);
        document.locations.insert(player, location_records);
        document.regions.insert(player, region_records);
        document.settings.insert(player, settings);
        document.progression_mapping.insert(player, progression);
        document.start_regions.insert(player, world.start_region());
        document.item_name_groups.insert(player, groups);
        document.game_info.insert(player, game_info);
        Ok(())
    }

    /// Location access rule, in the fixed precedence order: the handler's
    /// custom rule provider, then its analysis override, then the analyzer.
    fn location_rule(
        &self,
        world: &World,
        handler: &dyn GameHandler,
        location: &crate::world::Location,
        diagnostics: &mut Diagnostics,
        cache: &mut RuleCache,
    ) -> Result<Option<RuleNode>, ExportError> {
        if let Some(custom) = handler.custom_location_access_rule(location, world) {
            custom.validate().map_err(|reason| ExportError::SchemaViolation {
                game: world.game.clone(),
                target: location.name.clone(),
                reason,
            })?;
            let context = RuleContext {
                player: world.player,
                target: location.name.clone(),
            };
            return self.finish_rule(world, handler, Some(custom), &Env::new(), &context);
        }
        match &location.access_rule {
            Some(rule) => self.analyzed_rule(world, handler, rule, &location.name, diagnostics, cache),
            None => Ok(None),
        }
    }

    /// Exit access rule: the override hook applies, then generic analysis.
    fn exit_rule(
        &self,
        world: &World,
        handler: &dyn GameHandler,
        exit: &crate::world::Entrance,
        diagnostics: &mut Diagnostics,
        cache: &mut RuleCache,
    ) -> Result<Option<RuleNode>, ExportError> {
        match &exit.access_rule {
            Some(rule) => self.analyzed_rule(world, handler, rule, &exit.name, diagnostics, cache),
            None => Ok(None),
        }
    }

    /// Analyzes one access rule (consulting the override hook first) and
    /// runs the post-analysis pipeline on the result.
    fn analyzed_rule(
        &self,
        world: &World,
        handler: &dyn GameHandler,
        rule: &AccessRule,
        target: &str,
        diagnostics: &mut Diagnostics,
        cache: &mut RuleCache,
    ) -> Result<Option<RuleNode>, ExportError> {
        let node = if let Some(overridden) = handler.override_rule_analysis(rule, target) {
            overridden.validate().map_err(|reason| ExportError::SchemaViolation {
                game: world.game.clone(),
                target: target.to_owned(),
                reason,
            })?;
            Some(overridden)
        } else {
            let mut analyzer = Analyzer::new(world, handler, diagnostics, cache, self.options.allow_repr_fallback);
            analyzer.analyze_rule(rule, target)
        };
        let context = RuleContext {
            player: world.player,
            target: target.to_owned(),
        };
        self.finish_rule(world, handler, node, &rule_env(rule, world), &context)
    }

    /// The shared tail of the rule pipeline: `expand_rule`, resolver,
    /// `postprocess_rule`, resolver again (postprocessing may introduce new
    /// foldable constants), then validation of whatever the handler passes
    /// back.
    fn finish_rule(
        &self,
        world: &World,
        handler: &dyn GameHandler,
        node: Option<RuleNode>,
        env: &Env,
        context: &RuleContext,
    ) -> Result<Option<RuleNode>, ExportError> {
        let Some(node) = node else { return Ok(None) };
        let node = handler.expand_rule(node);
        let node = resolve_rule(node, env);
        let node = handler.postprocess_rule(node, context);
        let node = resolve_rule(node, env);
        node.validate().map_err(|reason| ExportError::SchemaViolation {
            game: world.game.clone(),
            target: context.target.clone(),
            reason,
        })?;
        Ok(Some(node))
    }
}

/// The environment the resolver folds against: the predicate's own captured
/// bindings, with the handler-attached logic instance backing `logic`.
fn rule_env(rule: &AccessRule, world: &World) -> Env {
    let mut env = match &rule.predicate {
        Predicate::Lambda(func) => func.env.clone(),
        _ => Env::new(),
    };
    if let Some(logic) = &world.logic
        && env.lookup("logic").is_none()
    {
        env.globals.insert("logic".to_owned(), logic.clone());
    }
    env
}

fn item_record(name: &str, def: &ItemDef) -> ItemRecord {
    let mut groups = def.groups.clone();
    groups.sort();
    ItemRecord {
        name: name.to_owned(),
        id: def.id,
        groups,
        advancement: def.advancement,
        useful: def.useful,
        trap: def.trap,
        event: def.id.is_none(),
        type_tag: def.type_tag.clone(),
        max_count: def.max_count,
    }
}

/// Settings fall back to the world's options, serialized by value identity.
fn default_settings(world: &World) -> JsonMap<String, JsonValue> {
    let mut settings = JsonMap::new();
    for (name, value) in &world.options {
        let json = value
            .to_json()
            .unwrap_or_else(|| JsonValue::String(value.repr()));
        settings.insert(name.clone(), json);
    }
    settings
}

/// Post-assembly invariant sweep: every item/location/region/entrance a
/// rule references must exist in the corresponding table.
fn check_references(
    document: &RulesDocument,
    entrance_names: &ahash::AHashMap<u32, ahash::AHashSet<String>>,
    diagnostics: &mut Diagnostics,
) {
    for (player, locations) in &document.locations {
        let items = document.items.get(player);
        let groups = document.item_name_groups.get(player);
        let regions = document.regions.get(player);
        let entrances = entrance_names.get(player);
        let location_names: ahash::AHashSet<&str> =
            locations.iter().map(|l| l.name.as_str()).collect();
        let region_names: ahash::AHashSet<&str> = regions
            .map(|rs| rs.iter().map(|r| r.name.as_str()).collect())
            .unwrap_or_default();

        let mut rules: Vec<&RuleNode> = Vec::new();
        for location in locations {
            rules.extend(location.access_rule.iter());
            rules.extend(location.item_rule.iter());
        }
        if let Some(regions) = regions {
            for region in regions {
                for exit in &region.exits {
                    rules.extend(exit.rule.iter());
                }
            }
        }

        diagnostics.set_context(*player, None);
        let mut missing_items: Vec<String> = Vec::new();
        for rule in rules {
            rule.walk(&mut |node| match node {
                RuleNode::ItemCheck { item, .. } => {
                    let known = items.is_some_and(|table| table.contains_key(item));
                    if !known && !missing_items.contains(item) {
                        missing_items.push(item.clone());
                    }
                }
                RuleNode::GroupCheck { group, .. } | RuleNode::GroupUniqueCheck { group, .. } => {
                    if !groups.is_some_and(|table| table.contains_key(group)) {
                        diagnostics.warn(
                            DiagnosticKind::ResolutionFailure,
                            format!("rule references unknown item group {group:?}"),
                        );
                    }
                }
                RuleNode::LocationCheck { location } => {
                    if !location_names.contains(location.as_str()) {
                        diagnostics.warn(
                            DiagnosticKind::ResolutionFailure,
                            format!("rule references unknown location {location:?}"),
                        );
                    }
                }
                RuleNode::RegionCheck { region } => {
                    if !region_names.contains(region.as_str()) {
                        diagnostics.warn(
                            DiagnosticKind::ResolutionFailure,
                            format!("rule references unknown region {region:?}"),
                        );
                    }
                }
                RuleNode::CanReachEntrance { entrance } => {
                    if !entrances.is_some_and(|table| table.contains(entrance)) {
                        diagnostics.warn(
                            DiagnosticKind::ResolutionFailure,
                            format!("rule references unknown entrance {entrance:?}"),
                        );
                    }
                }
                _ => {}
            });
        }
        for item in missing_items {
            diagnostics.warn(
                DiagnosticKind::MissingItem,
                format!("rule references item {item:?} absent from the item table"),
            );
        }
    }
}

/// Exports the worlds and writes the document to
/// `<output_root>/<game_slug>/<seed_id>/<seed_id>_rules.json`.
///
/// Returns the written path. This is the single entry point the command
/// line wraps.
pub fn export_to_dir(
    worlds: &mut [World],
    registry: &HandlerRegistry,
    options: ExportOptions,
    output_root: &Path,
    seed_id: &str,
) -> Result<(PathBuf, ExportOutput), ExportError> {
    let pretty = options.pretty;
    let exporter = Exporter::with_options(registry, options);
    let output = exporter.export(worlds)?;
    let dir = output_root.join(&output.game_slug).join(seed_id);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{seed_id}_rules.json"));
    let json = if pretty {
        serde_json::to_string_pretty(&output.document)
    } else {
        serde_json::to_string(&output.document)
    }
    .map_err(|err| ExportError::Io(std::io::Error::other(err)))?;
    fs::write(&path, json)?;
    Ok((path, output))
}
