use std::fmt;

use strum::{Display, IntoStaticStr};

/// Category of a non-fatal export warning.
///
/// Mirrors the recovery table in the export contract: every kind has a
/// documented fallback, and none of them aborts the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Source text was unavailable for a predicate (native method, wrapped
    /// callable). The rule degrades to `null` unless a handler overrides.
    ExtractionFailure,
    /// A name referenced by a rule was not in scope and no handler provided
    /// it. The rule keeps an unresolved `name` node.
    ResolutionFailure,
    /// A call or attribute pattern the analyzer cannot translate.
    UnknownPredicateShape,
    /// A rule references an item absent from the item table and not an
    /// event item.
    MissingItem,
    /// A closure value without a documented serializable identity was
    /// serialized by textual repr as a last resort.
    ReprFallback,
}

/// A structured, accumulated export warning.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub player: u32,
    /// Location/entrance name the warning applies to, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] player {}", self.kind, self.player)?;
        if let Some(target) = &self.target {
            write!(f, " at {target:?}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Collector threaded through extraction, analysis, and export.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    player: u32,
    target: Option<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the player/target context attached to subsequent warnings.
    pub fn set_context(&mut self, player: u32, target: Option<String>) {
        self.player = player;
        self.target = target;
    }

    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            kind,
            player: self.player,
            target: self.target.clone(),
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fatal export failure. Everything else degrades to a diagnostic.
#[derive(Debug)]
pub enum ExportError {
    /// A handler returned a malformed rule. Names the handler's game and
    /// the target so the extension author can find it.
    SchemaViolation {
        game: String,
        target: String,
        reason: String,
    },
    /// Writing the emitted document failed.
    Io(std::io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaViolation { game, target, reason } => {
                write!(f, "handler for {game:?} returned a malformed rule for {target:?}: {reason}")
            }
            Self::Io(err) => write!(f, "failed to write rules document: {err}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
