#![doc = include_str!("../../../README.md")]

mod analyze;
mod custom;
mod diagnostics;
mod export;
mod extract;
mod handler;
mod resolve;
mod schema;
mod slug;
mod truth;
mod value;
mod world;

pub use crate::{
    analyze::{Analyzer, RuleCache},
    custom::{CustomRule, ReachKind, serialize_rule},
    diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, ExportError},
    export::{ExportOptions, ExportOutput, Exporter, export_to_dir},
    extract::{Extraction, extract},
    handler::{GameHandler, GenericHandler, HandlerRegistry, RuleContext},
    resolve::resolve_rule,
    schema::{
        BinaryOperator, CompareOp, ExitRecord, ItemPlacement, ItemRecord, IteratorInfo, LocationRecord,
        ProgressionKind, ProgressionMapping, RegionRecord, RuleNode, RulesDocument, UnaryOperator,
    },
    slug::resolve_game_slug,
    truth::{Evaluator, HelperFn, Snapshot, Truth, json_truth},
    value::{Env, Value},
    world::{AccessRule, Entrance, FunctionSource, ItemDef, Location, PlacedItem, Predicate, Region, World},
};
