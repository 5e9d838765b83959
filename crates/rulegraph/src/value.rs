use std::fmt;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::world::FunctionSource;

/// A host-language value captured by a predicate at closure-creation time.
///
/// Predicates arrive as source text plus the environment their free variables
/// were bound to. This enum models that environment's values: plain data is
/// carried structurally, while live game objects (regions, logic instances)
/// are carried as duck-typed [`Value::Object`]s whose attributes were
/// snapshotted at capture time.
///
/// `Dict` preserves insertion order and allows non-string keys (enum members
/// are a common key type in per-game requirement tables), so it is stored as
/// a pair list rather than a map.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(Vec<Value>),
    /// Order-preserving key/value pairs. Keys may be any value, including
    /// enum members; lookups match enum keys by their `.value`.
    Dict(Vec<(Value, Value)>),
    /// An enum member: `EraType.ANCIENT` carries class, member name, and the
    /// member's `.value`.
    Enum {
        class: String,
        member: String,
        value: Box<Value>,
    },
    /// A named tuple. Field order is declaration order; serialization to a
    /// constant is positional so downstream consumers see a stable array.
    NamedTuple {
        class: String,
        fields: Vec<(String, Value)>,
    },
    /// A duck-typed live object (region, location, logic instance, enum
    /// class). Attribute access goes through `attrs`; helper methods appear
    /// as [`Value::Function`] attributes.
    Object {
        class: String,
        attrs: IndexMap<String, Value>,
    },
    /// A helper function or bound method, carried as source text plus its
    /// own captured environment so the analyzer can inline it.
    Function(FunctionSource),
    /// Last-resort textual representation of a value the dump could not
    /// encode structurally. Conversion to a constant always fails for these;
    /// the analyzer decides whether to fall back to the repr with a warning.
    Opaque { repr: String },
}

impl Value {
    /// Python truthiness, where decidable.
    ///
    /// `Function` values are always truthy. `Opaque` values return `None`:
    /// their truthiness is unknowable from the repr alone, and guessing here
    /// would let the ternary simplifier silently drop a live branch.
    pub fn truthiness(&self) -> Option<bool> {
        match self {
            Self::None => Some(false),
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            Self::Float(f) => Some(*f != 0.0),
            Self::Str(s) => Some(!s.is_empty()),
            Self::List(v) | Self::Tuple(v) | Self::Set(v) => Some(!v.is_empty()),
            Self::Dict(pairs) => Some(!pairs.is_empty()),
            Self::Enum { value, .. } => value.truthiness(),
            // Objects without __bool__/__len__ are truthy; the dump does not
            // carry either, so named tuples and objects count as truthy.
            Self::NamedTuple { .. } | Self::Object { .. } | Self::Function(_) => Some(true),
            Self::Opaque { .. } => None,
        }
    }

    /// Attribute access on a captured value.
    ///
    /// Returns an owned value because enum members synthesize their `.value`
    /// and `.name` attributes rather than storing them.
    pub fn attr(&self, name: &str) -> Option<Value> {
        match self {
            Self::Object { attrs, .. } => attrs.get(name).cloned(),
            Self::NamedTuple { fields, .. } => {
                fields.iter().find(|(f, _)| f == name).map(|(_, v)| v.clone())
            }
            Self::Enum { member, value, .. } => match name {
                "value" => Some((**value).clone()),
                "name" => Some(Self::Str(member.clone())),
                _ => None,
            },
            _ => None,
        }
    }

    /// Subscript access: list/tuple by integer index, dict by key.
    pub fn index(&self, key: &Value) -> Option<Value> {
        match self {
            Self::List(items) | Self::Tuple(items) => {
                let Value::Int(i) = key else { return None };
                let idx = usize::try_from(*i).ok()?;
                items.get(idx).cloned()
            }
            Self::Dict(pairs) => pairs
                .iter()
                .find(|(k, _)| k.key_matches(key))
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    /// Dictionary-key equality. Enum keys match by their `.value` so a rule
    /// that subscripts a table with `EraType.ANCIENT` finds the same entry
    /// whether the table key was captured as the enum member or its value.
    pub fn key_matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Enum { value, .. }, _) => value.key_matches(other),
            (_, Self::Enum { value, .. }) => self.key_matches(value),
            // bool/int cross-matching follows Python dict semantics
            (Self::Bool(a), Self::Int(b)) | (Self::Int(b), Self::Bool(a)) => i64::from(*a) == *b,
            (a, b) => a == b,
        }
    }

    /// Converts a captured value into a JSON constant, if it has a
    /// documented serializable identity.
    ///
    /// Enum members serialize as their `.value`; named tuples serialize
    /// positionally to preserve field order; live objects serialize via
    /// their `code` (then `name`) attribute. Returns `None` when no
    /// documented identity exists — callers own the repr-fallback decision
    /// and its warning.
    pub fn to_json(&self) -> Option<JsonValue> {
        match self {
            Self::None => Some(JsonValue::Null),
            Self::Bool(b) => Some(JsonValue::Bool(*b)),
            Self::Int(i) => Some(JsonValue::from(*i)),
            Self::Float(f) => serde_json::Number::from_f64(*f).map(JsonValue::Number),
            Self::Str(s) => Some(JsonValue::String(s.clone())),
            Self::List(items) | Self::Tuple(items) | Self::Set(items) => items
                .iter()
                .map(Value::to_json)
                .collect::<Option<Vec<_>>>()
                .map(JsonValue::Array),
            Self::Dict(pairs) => {
                let mut map = serde_json::Map::new();
                for (key, value) in pairs {
                    map.insert(key.json_key()?, value.to_json()?);
                }
                Some(JsonValue::Object(map))
            }
            Self::Enum { value, .. } => value.to_json(),
            Self::NamedTuple { fields, .. } => fields
                .iter()
                .map(|(_, v)| v.to_json())
                .collect::<Option<Vec<_>>>()
                .map(JsonValue::Array),
            Self::Object { attrs, .. } => match attrs.get("code").or_else(|| attrs.get("name")) {
                Some(Self::Str(s)) => Some(JsonValue::String(s.clone())),
                Some(Self::Int(i)) => Some(JsonValue::from(*i)),
                _ => None,
            },
            Self::Function(_) | Self::Opaque { .. } => None,
        }
    }

    /// JSON object keys must be strings; enum keys flatten to their value.
    fn json_key(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Enum { value, .. } => value.json_key(),
            _ => None,
        }
    }

    /// The repr used for diagnostics and the documented warn-and-fallback
    /// serialization path.
    pub fn repr(&self) -> String {
        match self {
            Self::Opaque { repr } => repr.clone(),
            Self::Object { class, .. } => format!("<{class} object>"),
            Self::Function(f) => format!("<function {}>", f.name),
            other => match other.to_json() {
                Some(json) => json.to_string(),
                None => format!("{other:?}"),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

/// The environment a predicate's free variables were captured from.
///
/// Lookup precedence follows the host runtime's closure semantics: closure
/// cells shadow default-argument bindings, which shadow module globals.
/// Defaults are listed separately because binding loop variables through
/// lambda defaults (`lambda state, n=n: ...`) is a common idiom in world
/// modules.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Env {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub cells: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub defaults: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub globals: IndexMap<String, Value>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a free variable: cells, then defaults, then globals.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.cells
            .get(name)
            .or_else(|| self.defaults.get(name))
            .or_else(|| self.globals.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.defaults.is_empty() && self.globals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn era(member: &str, value: &str) -> Value {
        Value::Enum {
            class: "EraType".to_owned(),
            member: member.to_owned(),
            value: Box::new(Value::Str(value.to_owned())),
        }
    }

    #[test]
    fn enum_keys_match_dict_entries_by_value() {
        let table = Value::Dict(vec![(era("ANCIENT", "ANCIENT"), Value::Int(2))]);
        assert_eq!(
            table.index(&Value::Str("ANCIENT".to_owned())),
            Some(Value::Int(2)),
            "string key should find the enum-keyed entry"
        );
        assert_eq!(table.index(&era("ANCIENT", "ANCIENT")), Some(Value::Int(2)));
    }

    #[test]
    fn named_tuples_serialize_positionally() {
        let nt = Value::NamedTuple {
            class: "Requirement".to_owned(),
            fields: vec![
                ("item".to_owned(), Value::Str("Sword".to_owned())),
                ("count".to_owned(), Value::Int(2)),
            ],
        };
        assert_eq!(nt.to_json(), Some(serde_json::json!(["Sword", 2])));
    }

    #[test]
    fn objects_serialize_via_code_attribute() {
        let mut attrs = IndexMap::new();
        attrs.insert("code".to_owned(), Value::Str("a".to_owned()));
        attrs.insert("name".to_owned(), Value::Str("Area One".to_owned()));
        let region = Value::Object {
            class: "Region".to_owned(),
            attrs,
        };
        assert_eq!(region.to_json(), Some(serde_json::json!("a")));
    }

    #[test]
    fn opaque_values_have_unknown_truthiness() {
        let opaque = Value::Opaque {
            repr: "<built-in method>".to_owned(),
        };
        assert_eq!(opaque.truthiness(), None);
    }

    #[test]
    fn env_lookup_precedence_is_cells_defaults_globals() {
        let mut env = Env::new();
        env.globals.insert("x".to_owned(), Value::Int(1));
        assert_eq!(env.lookup("x"), Some(&Value::Int(1)));
        env.defaults.insert("x".to_owned(), Value::Int(2));
        assert_eq!(env.lookup("x"), Some(&Value::Int(2)));
        env.cells.insert("x".to_owned(), Value::Int(3));
        assert_eq!(env.lookup("x"), Some(&Value::Int(3)));
    }
}
