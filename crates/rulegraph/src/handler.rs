use ahash::AHashMap;
use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::{
    schema::{ProgressionMapping, RuleNode},
    world::{AccessRule, Location, World},
};

/// Per-rule context handed to the second postprocess pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleContext {
    pub player: u32,
    /// Location or entrance name the rule gates.
    pub target: String,
}

/// Per-game customization hooks consulted during analysis and export.
///
/// Every hook has a default implementation, so a handler implements only
/// what its game needs. Hook precedence during rule analysis is fixed:
/// [`GameHandler::custom_location_access_rule`] wins over
/// [`GameHandler::override_rule_analysis`], which wins over the generic
/// analyzer.
///
/// The two `&mut World` hooks are the only places the export pipeline
/// permits input mutation; anything a handler attaches there is owned by
/// the handler and is never read after emission.
pub trait GameHandler {
    /// Returns true to keep a function by this name as a named helper
    /// reference instead of inlining its body.
    ///
    /// The default is the documented heuristic: preserve `has_*`/`can_*`
    /// names. Game handlers override this when the heuristic is wrong for
    /// them in either direction.
    fn should_preserve_as_helper(&self, name: &str) -> bool {
        name.starts_with("has_") || name.starts_with("can_")
    }

    /// Runs once per world before any rule analysis; may attach a live
    /// logic instance so rules can resolve `logic.*` and `self.*`.
    fn prepare_closure_vars(&self, world: &mut World) {
        let _ = world;
    }

    /// Produces the rule directly, bypassing the analyzer. `None` falls
    /// through to generic analysis.
    fn override_rule_analysis(&self, rule: &AccessRule, target: &str) -> Option<RuleNode> {
        let _ = (rule, target);
        None
    }

    /// First post-pass over every analyzed rule.
    fn expand_rule(&self, rule: RuleNode) -> RuleNode {
        rule
    }

    /// Second post-pass with location/entrance context.
    fn postprocess_rule(&self, rule: RuleNode, context: &RuleContext) -> RuleNode {
        let _ = context;
        rule
    }

    /// Mutates locations/entrances before analysis, e.g. to give each shop
    /// slot a rule with a fresh identity so per-location analysis is not
    /// served from the cache.
    fn postprocess_regions(&self, world: &mut World) {
        let _ = world;
    }

    /// Provides a location's access rule without invoking the analyzer.
    fn custom_location_access_rule(&self, location: &Location, world: &World) -> Option<RuleNode> {
        let _ = (location, world);
        None
    }

    /// Emits the player's settings block. The exporter falls back to the
    /// world's serializable options when this returns `None`.
    fn settings_data(&self, world: &World) -> Option<JsonMap<String, JsonValue>> {
        let _ = world;
        None
    }

    /// Auxiliary export-time variables for the `game_info` table.
    fn game_info(&self, world: &World) -> Option<JsonMap<String, JsonValue>> {
        let _ = world;
        None
    }

    /// Accumulator mappings for the `progression_mapping` table.
    fn progression_mapping(&self, world: &World) -> Option<IndexMap<String, ProgressionMapping>> {
        let _ = world;
        None
    }

    /// Extra per-location metadata merged into the location record.
    fn location_attributes(&self, location: &Location, world: &World) -> Option<JsonMap<String, JsonValue>> {
        let _ = (location, world);
        None
    }
}

/// The fallback handler for games without a registered one: every hook at
/// its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericHandler;

impl GameHandler for GenericHandler {}

/// Maps game names to handlers.
///
/// Built per export call — never a singleton — so parallel exports with
/// different handler sets cannot observe each other.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: AHashMap<String, Box<dyn GameHandler>>,
    generic: GenericHandler,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under an exact game name.
    pub fn register(&mut self, game: impl Into<String>, handler: Box<dyn GameHandler>) {
        self.handlers.insert(game.into(), handler);
    }

    /// Exact-name lookup with generic fallback.
    pub fn get(&self, game: &str) -> &dyn GameHandler {
        match self.handlers.get(game) {
            Some(handler) => handler.as_ref(),
            None => &self.generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_handler_preserves_by_prefix() {
        let handler = GenericHandler;
        assert!(handler.should_preserve_as_helper("can_surf"));
        assert!(handler.should_preserve_as_helper("has_bombs"));
        assert!(!handler.should_preserve_as_helper("count_medallions"));
    }

    #[test]
    fn registry_falls_back_to_generic() {
        let registry = HandlerRegistry::new();
        assert!(registry.get("Unknown Game").should_preserve_as_helper("can_swim"));
    }

    struct NeverPreserve;

    impl GameHandler for NeverPreserve {
        fn should_preserve_as_helper(&self, _name: &str) -> bool {
            false
        }
    }

    #[test]
    fn registered_handler_overrides_the_heuristic() {
        let mut registry = HandlerRegistry::new();
        registry.register("Test Game", Box::new(NeverPreserve));
        assert!(!registry.get("Test Game").should_preserve_as_helper("can_swim"));
        assert!(registry.get("Other Game").should_preserve_as_helper("can_swim"));
    }
}
