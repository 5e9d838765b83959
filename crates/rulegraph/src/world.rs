use indexmap::IndexMap;

use crate::{custom::CustomRule, value::Env, value::Value};

/// Source text and captured environment of a callable predicate.
///
/// This is what the host-side dumper recovers from a live closure: the
/// source line(s) the callable was defined on, the column the definition
/// starts at (needed when several lambdas share a line), and the free
/// variables resolved through closure cells, defaults, and module globals.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FunctionSource {
    /// `<lambda>` for lambdas, the function name for `def` helpers.
    pub name: String,
    /// Full source line(s) containing the callable. May include unrelated
    /// surrounding code; the extractor slices the callable out.
    pub source: String,
    /// Column offset of the `lambda`/`def` keyword within `source`.
    #[serde(default)]
    pub col_offset: u32,
    /// Captured free-variable bindings.
    #[serde(default)]
    pub env: Env,
}

impl FunctionSource {
    /// Convenience constructor for a lambda occupying its own line(s).
    pub fn lambda(source: impl Into<String>, env: Env) -> Self {
        Self {
            name: "<lambda>".to_owned(),
            source: source.into(),
            col_offset: 0,
            env,
        }
    }
}

/// An access-rule predicate as carried in the world dump.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// A lambda or helper function with recoverable source text.
    Lambda(FunctionSource),
    /// A typed rule object from a game that builds predicates as data
    /// rather than closures. Serialized without touching the analyzer.
    Custom(CustomRule),
    /// A callable whose source is not recoverable (native method,
    /// `functools.partial` over a builtin). Extraction fails structurally.
    Opaque { repr: String },
}

/// A predicate together with its host object identity.
///
/// The `id` is the analysis cache key component: predicates shared between
/// locations carry the same id and analyze once. Handlers that need
/// per-location rule trees (shop uniqueness) synthesize fresh ids in
/// `postprocess_regions`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AccessRule {
    pub id: u64,
    pub predicate: Predicate,
}

impl AccessRule {
    pub fn new(id: u64, predicate: Predicate) -> Self {
        Self { id, predicate }
    }
}

/// An entrance from one region to another, with an optional gating rule.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Entrance {
    /// Explicit name, or a synthesized `"A -> B"` label when unnamed.
    pub name: String,
    pub parent_region: String,
    pub target_region: String,
    #[serde(default)]
    pub access_rule: Option<AccessRule>,
}

/// A location inside a region.
///
/// A missing numeric id marks an event location: its placed item is a
/// synthetic progress token that still participates in rules.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub id: Option<i64>,
    pub parent_region: String,
    #[serde(default)]
    pub access_rule: Option<AccessRule>,
    #[serde(default)]
    pub item_rule: Option<AccessRule>,
    #[serde(default)]
    pub item: Option<PlacedItem>,
}

/// The item placed at a location by the generator.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacedItem {
    pub name: String,
    pub player: u32,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub advancement: bool,
    #[serde(default)]
    pub useful: bool,
    #[serde(default)]
    pub trap: bool,
}

/// A region in the world graph: a set of locations plus exits to other
/// regions. The graph may be cyclic; the exporter enumerates regions in
/// declaration order and never follows edges.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub name: String,
    #[serde(default)]
    pub exits: Vec<Entrance>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// A registered item definition.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ItemDef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub advancement: bool,
    #[serde(default)]
    pub useful: bool,
    #[serde(default)]
    pub trap: bool,
    #[serde(default)]
    pub groups: Vec<String>,
    /// Optional per-game type tag (e.g. weapon class).
    #[serde(default)]
    pub type_tag: Option<String>,
    #[serde(default)]
    pub max_count: Option<u64>,
}

/// One game instance in a multi-world seed.
///
/// Held by reference for the duration of one export; the compiler mutates
/// it only through the documented handler hooks (`prepare_closure_vars`
/// may attach `logic`, `postprocess_regions` may rewrite rules) and
/// retains nothing after emission.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct World {
    pub game: String,
    pub player: u32,
    #[serde(default)]
    pub options: IndexMap<String, Value>,
    /// Declared origin region, when the world names one.
    #[serde(default)]
    pub origin_region: Option<String>,
    /// Region graph in declaration order.
    #[serde(default)]
    pub regions: Vec<Region>,
    /// Item registry: name to definition, insertion order preserved.
    #[serde(default)]
    pub items: IndexMap<String, ItemDef>,
    /// Items the player starts with.
    #[serde(default)]
    pub precollected: Vec<String>,
    /// Source of the world module, used for `game`-attribute slug
    /// resolution when no hosting directory name is available.
    #[serde(default)]
    pub module_source: Option<String>,
    /// Short name of the directory hosting the world module. Takes
    /// precedence over the declared game name for the output slug.
    #[serde(default)]
    pub module_dir: Option<String>,
    /// Handler attachment slot: `prepare_closure_vars` may store a live
    /// logic instance here so rules can resolve `logic.*` and `self.*`.
    /// Owned by the handler; never read after emission.
    #[serde(default)]
    pub logic: Option<Value>,
}

impl World {
    /// Looks up a region by name.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Iterates all locations across all regions in declaration order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.regions.iter().flat_map(|r| r.locations.iter())
    }

    /// Resolves the start region by the three-tier policy: the declared
    /// origin region, else the unique region with no inbound entrance,
    /// else `"Menu"` iff it exists in the graph.
    pub fn start_region(&self) -> Option<String> {
        if let Some(origin) = &self.origin_region {
            return Some(origin.clone());
        }
        let mut no_inbound = self.regions.iter().filter(|region| {
            !self
                .regions
                .iter()
                .flat_map(|r| r.exits.iter())
                .any(|exit| exit.target_region == region.name)
        });
        if let Some(first) = no_inbound.next()
            && no_inbound.next().is_none()
        {
            return Some(first.name.clone());
        }
        self.region("Menu").map(|r| r.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(name: &str, exits_to: &[&str]) -> Region {
        Region {
            name: name.to_owned(),
            exits: exits_to
                .iter()
                .map(|target| Entrance {
                    name: format!("{name} -> {target}"),
                    parent_region: name.to_owned(),
                    target_region: (*target).to_owned(),
                    access_rule: None,
                })
                .collect(),
            locations: Vec::new(),
        }
    }

    fn world_with_regions(regions: Vec<Region>) -> World {
        World {
            game: "Test Game".to_owned(),
            player: 1,
            options: IndexMap::new(),
            origin_region: None,
            regions,
            items: IndexMap::new(),
            precollected: Vec::new(),
            module_source: None,
            module_dir: None,
            logic: None,
        }
    }

    #[test]
    fn declared_origin_region_wins() {
        let mut world = world_with_regions(vec![region("A", &["B"]), region("B", &[])]);
        world.origin_region = Some("B".to_owned());
        assert_eq!(world.start_region().as_deref(), Some("B"));
    }

    #[test]
    fn unique_root_region_is_the_start() {
        let world = world_with_regions(vec![region("Overworld", &["Cave"]), region("Cave", &[])]);
        assert_eq!(world.start_region().as_deref(), Some("Overworld"));
    }

    #[test]
    fn world_dumps_round_trip_through_json() {
        let mut env = Env::new();
        env.cells.insert("keys".to_owned(), Value::List(vec![Value::Str("A".to_owned())]));
        let mut world = world_with_regions(vec![region("Menu", &["Field"]), region("Field", &[])]);
        world.regions[1].locations.push(Location {
            name: "Field Chest".to_owned(),
            id: Some(7),
            parent_region: "Field".to_owned(),
            access_rule: Some(AccessRule::new(
                3,
                Predicate::Lambda(FunctionSource::lambda("lambda s: any(s.has(k, p) for k in keys)", env)),
            )),
            item_rule: None,
            item: None,
        });
        let json = serde_json::to_string(&world).unwrap();
        let back: World = serde_json::from_str(&json).unwrap();
        assert_eq!(back.regions[1].locations[0].access_rule, world.regions[1].locations[0].access_rule);
        assert_eq!(back.player, world.player);
    }

    #[test]
    fn menu_sentinel_breaks_root_ties() {
        // Two rootless candidates, but a Menu region exists.
        let world = world_with_regions(vec![
            region("A", &["B"]),
            region("B", &["A"]),
            region("Menu", &["A"]),
            region("Detached", &[]),
        ]);
        // Both Menu and Detached lack inbound edges, so the unique-root rule
        // fails and the Menu sentinel applies.
        assert_eq!(world.start_region().as_deref(), Some("Menu"));
    }
}
