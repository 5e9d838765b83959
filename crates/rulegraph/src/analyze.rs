use ahash::AHashMap;
use indexmap::IndexMap;
use ruff_python_ast::{self as ast, BoolOp, CmpOp, Expr as AstExpr, Operator as AstOperator, UnaryOp};

use crate::{
    diagnostics::{DiagnosticKind, Diagnostics},
    extract::{self, Extraction},
    handler::GameHandler,
    schema::{BinaryOperator, CompareOp, IteratorInfo, RuleNode, UnaryOperator},
    value::{Env, Value},
    world::{AccessRule, FunctionSource, World},
};

/// Helper inlining depth limit. Real rule graphs nest helpers two or three
/// deep; anything past this is a cycle between helpers.
const MAX_INLINE_DEPTH: u16 = 16;

/// Analysis memo, keyed by predicate identity and location context, scoped
/// to one export run.
pub type RuleCache = AHashMap<(u64, Option<String>), Option<RuleNode>>;

/// A name binding introduced during analysis: comprehension targets and
/// destructured tuples bind captured values, inlined helper parameters bind
/// already-analyzed argument rules.
#[derive(Debug, Clone)]
enum Binding {
    Value(Value),
    Rule(RuleNode),
}

/// The name-resolution scope for one predicate body.
///
/// Lookup order: analysis-time locals, then the captured environment
/// (cells, defaults, globals). `state_params` are the parameter names bound
/// to the collection state; a bare reference to one is truthy and calls on
/// one dispatch to the state-method table.
#[derive(Debug, Clone)]
struct Scope {
    env: Env,
    state_params: Vec<String>,
    locals: IndexMap<String, Binding>,
}

impl Scope {
    fn new(env: Env, state_params: Vec<String>) -> Self {
        Self {
            env,
            state_params,
            locals: IndexMap::new(),
        }
    }

    fn is_state(&self, name: &str) -> bool {
        self.state_params.iter().any(|p| p == name)
    }

    fn lookup_value(&self, name: &str) -> Option<&Value> {
        match self.locals.get(name) {
            Some(Binding::Value(value)) => Some(value),
            Some(Binding::Rule(_)) => None,
            None => self.env.lookup(name),
        }
    }
}

/// Translates predicate expression trees into the rule-graph schema.
///
/// Analysis never panics and never raises: a predicate the analyzer cannot
/// translate yields `None` alongside a structured diagnostic, and the
/// exporter substitutes the documented fallback.
pub struct Analyzer<'a> {
    world: &'a World,
    handler: &'a dyn GameHandler,
    diagnostics: &'a mut Diagnostics,
    cache: &'a mut RuleCache,
    /// Location/entrance context for cache keys and diagnostics.
    context: Option<String>,
    /// Opt-in for the last-resort repr serialization of closure values
    /// without a documented identity.
    allow_repr_fallback: bool,
    depth: u16,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        world: &'a World,
        handler: &'a dyn GameHandler,
        diagnostics: &'a mut Diagnostics,
        cache: &'a mut RuleCache,
        allow_repr_fallback: bool,
    ) -> Self {
        Self {
            world,
            handler,
            diagnostics,
            cache,
            context: None,
            allow_repr_fallback,
            depth: 0,
        }
    }

    /// Analyzes one access rule in the given location/entrance context,
    /// consulting and filling the per-run cache.
    pub fn analyze_rule(&mut self, rule: &AccessRule, target: &str) -> Option<RuleNode> {
        self.context = Some(target.to_owned());
        let key = (rule.id, self.context.clone());
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }
        let result = match extract::extract(&rule.predicate) {
            Extraction::Serialized(node) => Some(node),
            Extraction::Failed(reason) => {
                self.diagnostics.warn(DiagnosticKind::ExtractionFailure, reason);
                None
            }
            Extraction::Ast { body, params, env } => {
                let mut env = env;
                // A logic instance attached by prepare_closure_vars backs
                // `logic.*` and `self.*` references the closure itself did
                // not capture.
                if let Some(logic) = &self.world.logic {
                    for name in ["logic", "self"] {
                        if env.lookup(name).is_none() {
                            env.globals.insert(name.to_owned(), logic.clone());
                        }
                    }
                }
                let state_params = params.first().cloned().into_iter().collect();
                let scope = Scope::new(env, state_params);
                self.analyze_expr(&body, &scope)
            }
        };
        self.cache.insert(key, result.clone());
        result
    }

    fn warn(&mut self, kind: DiagnosticKind, message: String) {
        self.diagnostics.warn(kind, message);
    }

    /// Translates one expression. `None` means the rule (or this branch of
    /// it) could not be translated; a diagnostic explains why.
    fn analyze_expr(&mut self, expr: &AstExpr, scope: &Scope) -> Option<RuleNode> {
        match expr {
            AstExpr::BooleanLiteral(b) => Some(RuleNode::constant(b.value)),
            AstExpr::NoneLiteral(_) => Some(RuleNode::Constant {
                value: serde_json::Value::Null,
            }),
            AstExpr::NumberLiteral(_) | AstExpr::StringLiteral(_) => self.constant_from(expr, scope),
            AstExpr::FString(_) => self.constant_from(expr, scope),
            AstExpr::Name(name) => self.analyze_name(name.id.as_str(), scope),
            AstExpr::Attribute(_) | AstExpr::Subscript(_) => self.analyze_access(expr, scope),
            AstExpr::BoolOp(bool_op) => self.analyze_bool_op(bool_op, scope),
            AstExpr::UnaryOp(unary) => self.analyze_unary(unary, scope),
            AstExpr::BinOp(bin_op) => self.analyze_bin_op(bin_op, scope),
            AstExpr::Compare(compare) => self.analyze_compare(compare, scope),
            AstExpr::If(if_expr) => self.analyze_ternary(if_expr, scope),
            AstExpr::Call(call) => self.analyze_call(call, scope),
            AstExpr::List(_) | AstExpr::Tuple(_) | AstExpr::Set(_) | AstExpr::Dict(_) => {
                self.constant_from(expr, scope)
            }
            AstExpr::ListComp(_) | AstExpr::SetComp(_) | AstExpr::Generator(_) => self.constant_from(expr, scope),
            other => {
                self.warn(
                    DiagnosticKind::UnknownPredicateShape,
                    format!("unsupported expression form: {other:?}"),
                );
                None
            }
        }
    }

    /// Folds an expression to a constant node, or fails with a diagnostic.
    fn constant_from(&mut self, expr: &AstExpr, scope: &Scope) -> Option<RuleNode> {
        match eval_const(expr, scope) {
            Some(value) => self.value_to_rule(&value),
            None => {
                self.warn(
                    DiagnosticKind::UnknownPredicateShape,
                    format!("expression did not resolve to a constant: {expr:?}"),
                );
                None
            }
        }
    }

    fn analyze_name(&mut self, name: &str, scope: &Scope) -> Option<RuleNode> {
        if scope.is_state(name) {
            // A bare reference to the collection state is truthy.
            return Some(RuleNode::constant(true));
        }
        if let Some(Binding::Rule(rule)) = scope.locals.get(name) {
            return Some(rule.clone());
        }
        if let Some(value) = scope.lookup_value(name) {
            let value = value.clone();
            return self.value_to_rule(&value);
        }
        // `self` is reserved: the runtime resolves attribute access on it
        // through the player's settings, so no warning is due.
        if name != "self" {
            self.warn(
                DiagnosticKind::ResolutionFailure,
                format!("name {name:?} is not in scope"),
            );
        }
        Some(RuleNode::Name { name: name.to_owned() })
    }

    /// Converts a captured value into a constant node, honoring the
    /// repr-fallback policy for values without a serializable identity.
    fn value_to_rule(&mut self, value: &Value) -> Option<RuleNode> {
        if let Some(json) = value.to_json() {
            return Some(RuleNode::Constant { value: json });
        }
        if self.allow_repr_fallback {
            let repr = value.repr();
            self.warn(
                DiagnosticKind::ReprFallback,
                format!("serialized {repr:?} by repr; no documented identity"),
            );
            return Some(RuleNode::constant(repr));
        }
        self.warn(
            DiagnosticKind::ResolutionFailure,
            format!("value has no serializable identity: {}", value.repr()),
        );
        None
    }

    /// Attribute/subscript access: folded to a constant when the chain
    /// resolves now, kept structural for evaluation-time resolution
    /// otherwise (the `self` settings escape hatch rides this path).
    fn analyze_access(&mut self, expr: &AstExpr, scope: &Scope) -> Option<RuleNode> {
        if let Some(value) = eval_const(expr, scope) {
            return self.value_to_rule(&value);
        }
        match expr {
            AstExpr::Attribute(ast::ExprAttribute { value, attr, .. }) => {
                let object = self.analyze_expr(value, scope)?;
                Some(RuleNode::Attribute {
                    object: Box::new(object),
                    attr: attr.id().as_str().to_owned(),
                })
            }
            AstExpr::Subscript(ast::ExprSubscript { value, slice, .. }) => {
                let base = self.analyze_expr(value, scope)?;
                let index = self.analyze_expr(slice, scope)?;
                Some(RuleNode::Subscript {
                    value: Box::new(base),
                    index: Box::new(index),
                })
            }
            _ => unreachable!("analyze_access called on non-access expression"),
        }
    }

    fn analyze_bool_op(&mut self, bool_op: &ast::ExprBoolOp, scope: &Scope) -> Option<RuleNode> {
        let conditions = bool_op
            .values
            .iter()
            .map(|value| self.analyze_expr(value, scope))
            .collect::<Option<Vec<_>>>()?;
        Some(match bool_op.op {
            BoolOp::And => RuleNode::and(conditions),
            BoolOp::Or => RuleNode::or(conditions),
        })
    }

    fn analyze_unary(&mut self, unary: &ast::ExprUnaryOp, scope: &Scope) -> Option<RuleNode> {
        let operand = self.analyze_expr(&unary.operand, scope)?;
        match unary.op {
            UnaryOp::Not => Some(RuleNode::Not {
                condition: Box::new(operand),
            }),
            UnaryOp::USub => Some(RuleNode::UnaryOp {
                op: UnaryOperator::Neg,
                operand: Box::new(operand),
            }),
            UnaryOp::UAdd => Some(RuleNode::UnaryOp {
                op: UnaryOperator::Pos,
                operand: Box::new(operand),
            }),
            UnaryOp::Invert => {
                self.warn(
                    DiagnosticKind::UnknownPredicateShape,
                    "bitwise invert has no rule-graph form".to_owned(),
                );
                None
            }
        }
    }

    fn analyze_bin_op(&mut self, bin_op: &ast::ExprBinOp, scope: &Scope) -> Option<RuleNode> {
        if let Some(value) = eval_const(&AstExpr::BinOp(bin_op.clone()), scope) {
            return self.value_to_rule(&value);
        }
        let op = match bin_op.op {
            AstOperator::Add => BinaryOperator::Add,
            AstOperator::Sub => BinaryOperator::Sub,
            AstOperator::Mult => BinaryOperator::Mult,
            AstOperator::Div => BinaryOperator::Div,
            AstOperator::FloorDiv => BinaryOperator::FloorDiv,
            AstOperator::Mod => BinaryOperator::Mod,
            other => {
                self.warn(
                    DiagnosticKind::UnknownPredicateShape,
                    format!("operator {other:?} has no rule-graph form"),
                );
                return None;
            }
        };
        let left = self.analyze_expr(&bin_op.left, scope)?;
        let right = self.analyze_expr(&bin_op.right, scope)?;
        Some(RuleNode::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    /// Single comparisons map 1:1; chains lower to a conjunction of
    /// pairwise comparisons (operands are pure, so re-analysis is safe).
    fn analyze_compare(&mut self, compare: &ast::ExprCompare, scope: &Scope) -> Option<RuleNode> {
        let mut conditions = Vec::with_capacity(compare.ops.len());
        let mut left = &*compare.left;
        for (op, right) in compare.ops.iter().zip(compare.comparators.iter()) {
            let left_rule = self.analyze_expr(left, scope)?;
            let right_rule = self.analyze_expr(right, scope)?;
            conditions.push(RuleNode::Compare {
                left: Box::new(left_rule),
                op: convert_compare_op(*op),
                right: Box::new(right_rule),
            });
            left = right;
        }
        Some(RuleNode::and(conditions))
    }

    /// Ternaries simplify aggressively when the test folds to a known
    /// truthiness at export time; only the live branch is analyzed.
    fn analyze_ternary(&mut self, if_expr: &ast::ExprIf, scope: &Scope) -> Option<RuleNode> {
        if let Some(truthy) = eval_const(&if_expr.test, scope).and_then(|v| v.truthiness()) {
            let branch = if truthy { &if_expr.body } else { &if_expr.orelse };
            return self.analyze_expr(branch, scope);
        }
        let test = self.analyze_expr(&if_expr.test, scope)?;
        let if_true = self.analyze_expr(&if_expr.body, scope)?;
        let if_false = self.analyze_expr(&if_expr.orelse, scope)?;
        Some(RuleNode::Conditional {
            test: Box::new(test),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    fn analyze_call(&mut self, call: &ast::ExprCall, scope: &Scope) -> Option<RuleNode> {
        let args: Vec<&AstExpr> = call.arguments.args.iter().collect();
        let kwargs: IndexMap<&str, &AstExpr> = call
            .arguments
            .keywords
            .iter()
            .filter_map(|kw| kw.arg.as_ref().map(|name| (name.id().as_str(), &kw.value)))
            .collect();

        match &*call.func {
            AstExpr::Attribute(ast::ExprAttribute { value, attr, .. }) => {
                let method = attr.id().as_str();
                if let AstExpr::Name(name) = &**value
                    && scope.is_state(name.id.as_str())
                {
                    return self.analyze_state_method(method, &args, &kwargs, scope);
                }
                self.analyze_method_call(value, method, &args, &kwargs, scope)
            }
            AstExpr::Name(name) => self.analyze_named_call(name.id.as_str(), call, &args, &kwargs, scope),
            other => {
                self.warn(
                    DiagnosticKind::UnknownPredicateShape,
                    format!("cannot analyze indirect call through {other:?}"),
                );
                None
            }
        }
    }

    /// Dispatches a call on the collection state to the specialized node
    /// kinds. The player-id argument is positional in every signature and
    /// never reaches the emitted node.
    fn analyze_state_method(
        &mut self,
        method: &str,
        args: &[&AstExpr],
        kwargs: &IndexMap<&str, &AstExpr>,
        scope: &Scope,
    ) -> Option<RuleNode> {
        match method {
            "has" => {
                let item = self.const_string(args.first()?, scope)?;
                let count = self.optional_count(args.get(2).copied().or_else(|| kwargs.get("count").copied()), scope)?;
                Some(RuleNode::ItemCheck { item, count })
            }
            "has_all" | "has_any" => {
                let items = self.const_string_list(args.first()?, scope)?;
                let checks = items.into_iter().map(RuleNode::item).collect();
                Some(if method == "has_all" {
                    RuleNode::and(checks)
                } else {
                    RuleNode::or(checks)
                })
            }
            "has_group" => {
                let group = self.const_string(args.first()?, scope)?;
                let count = self.optional_count(args.get(2).copied().or_else(|| kwargs.get("count").copied()), scope)?;
                Some(RuleNode::GroupCheck { group, count })
            }
            "has_group_unique" => {
                let group = self.const_string(args.first()?, scope)?;
                let count = self
                    .optional_count(args.get(2).copied().or_else(|| kwargs.get("count").copied()), scope)?
                    .unwrap_or(1);
                Some(RuleNode::GroupUniqueCheck { group, count })
            }
            "has_all_counts" | "has_any_count" => {
                let counts = self.analyze_expr(args.first()?, scope)?;
                Some(RuleNode::StateMethod {
                    method: method.to_owned(),
                    args: vec![counts],
                })
            }
            "has_from_list" | "has_from_list_unique" => {
                let items = self.analyze_expr(args.first()?, scope)?;
                let count = self.analyze_expr(args.get(2).copied().or_else(|| kwargs.get("count").copied())?, scope)?;
                Some(RuleNode::StateMethod {
                    method: method.to_owned(),
                    args: vec![items, count],
                })
            }
            "count" => {
                let item = self.analyze_expr(args.first()?, scope)?;
                Some(RuleNode::StateMethod {
                    method: "count".to_owned(),
                    args: vec![item],
                })
            }
            "can_reach" => {
                let args = strip_player_arg(args, self.world.player);
                let target = self.const_string(args.first()?, scope)?;
                let kind = match args.get(1) {
                    Some(arg) => self.const_string(arg, scope)?,
                    None => "Region".to_owned(),
                };
                self.reach_node(&target, &kind)
            }
            "can_reach_region" => {
                let region = self.const_string(args.first()?, scope)?;
                Some(RuleNode::RegionCheck { region })
            }
            "can_reach_location" => {
                let location = self.const_string(args.first()?, scope)?;
                Some(RuleNode::LocationCheck { location })
            }
            "can_reach_entrance" => {
                let entrance = self.const_string(args.first()?, scope)?;
                Some(RuleNode::CanReachEntrance { entrance })
            }
            other => {
                // Unspecialized state method: keep it by name with analyzed
                // arguments, minus the trailing player id.
                let mut analyzed = Vec::new();
                for arg in strip_player_arg(args, self.world.player) {
                    analyzed.push(self.analyze_expr(arg, scope)?);
                }
                Some(RuleNode::StateMethod {
                    method: other.to_owned(),
                    args: analyzed,
                })
            }
        }
    }

    fn reach_node(&mut self, target: &str, kind: &str) -> Option<RuleNode> {
        match kind {
            "Region" => Some(RuleNode::RegionCheck {
                region: target.to_owned(),
            }),
            "Location" => Some(RuleNode::LocationCheck {
                location: target.to_owned(),
            }),
            "Entrance" => Some(RuleNode::CanReachEntrance {
                entrance: target.to_owned(),
            }),
            other => {
                self.warn(
                    DiagnosticKind::UnknownPredicateShape,
                    format!("unknown can_reach kind {other:?}"),
                );
                None
            }
        }
    }

    /// A method call on a non-state object: a game helper. Preserved as a
    /// named helper reference when the handler says so, inlined otherwise.
    fn analyze_method_call(
        &mut self,
        object: &AstExpr,
        method: &str,
        args: &[&AstExpr],
        kwargs: &IndexMap<&str, &AstExpr>,
        scope: &Scope,
    ) -> Option<RuleNode> {
        if self.handler.should_preserve_as_helper(method) {
            let helper_args = self.helper_args(args, scope)?;
            return Some(RuleNode::Helper {
                name: method.to_owned(),
                args: helper_args,
            });
        }
        let receiver = eval_const(object, scope);
        match receiver.as_ref().and_then(|obj| obj.attr(method)) {
            Some(Value::Function(func)) => self.inline_function(&func, receiver.as_ref(), args, kwargs, scope),
            Some(other) => {
                self.warn(
                    DiagnosticKind::UnknownPredicateShape,
                    format!("attribute {method:?} is not callable: {}", other.repr()),
                );
                None
            }
            None => {
                self.warn(
                    DiagnosticKind::UnknownPredicateShape,
                    format!("cannot resolve method {method:?} for inlining"),
                );
                None
            }
        }
    }

    /// A call through a bare name: builtins, preserved helpers, or
    /// closure-captured functions to inline.
    fn analyze_named_call(
        &mut self,
        name: &str,
        call: &ast::ExprCall,
        args: &[&AstExpr],
        kwargs: &IndexMap<&str, &AstExpr>,
        scope: &Scope,
    ) -> Option<RuleNode> {
        if is_state_method(name) {
            // World modules often call module-level wrappers of the state
            // methods directly; the schema recognizes the names themselves,
            // and that recognition outranks the helper-preserve heuristic.
            return self.analyze_state_method(name, args, kwargs, scope);
        }
        match name {
            "any" | "all" => {
                if let Some(arg) = args.first() {
                    if let Some((elt, generators)) = as_comprehension(arg) {
                        return self.expand_quantifier(name == "all", elt, generators, scope);
                    }
                    // any/all over an export-time sequence of constants.
                    if let Some(value) = eval_const(arg, scope)
                        && let Some(truthy) = fold_quantifier(&value, name == "all")
                    {
                        return Some(RuleNode::constant(truthy));
                    }
                }
                self.warn(
                    DiagnosticKind::UnknownPredicateShape,
                    format!("{name}() argument is neither a comprehension nor a resolvable sequence"),
                );
                None
            }
            // Transparent conversions: `has_all(set([...]))` reads through.
            "set" | "list" | "tuple" | "sorted" | "frozenset" | "len" => {
                self.constant_from(&AstExpr::Call(call.clone()), scope)
            }
            _ => {
                let captured = scope.lookup_value(name).cloned();
                if self.handler.should_preserve_as_helper(name) {
                    let helper_args = self.helper_args(args, scope)?;
                    return Some(RuleNode::Helper {
                        name: name.to_owned(),
                        args: helper_args,
                    });
                }
                match captured {
                    Some(Value::Function(func)) => self.inline_function(&func, None, args, kwargs, scope),
                    Some(other) => {
                        self.warn(
                            DiagnosticKind::UnknownPredicateShape,
                            format!("{name:?} is not callable: {}", other.repr()),
                        );
                        None
                    }
                    None => {
                        self.warn(
                            DiagnosticKind::ResolutionFailure,
                            format!("function {name:?} is not in scope and not preserved as a helper"),
                        );
                        None
                    }
                }
            }
        }
    }

    /// Analyzes helper-call arguments. The state and player arguments are
    /// implicit in the runtime calling convention and are dropped.
    fn helper_args(&mut self, args: &[&AstExpr], scope: &Scope) -> Option<Vec<RuleNode>> {
        let mut out = Vec::new();
        for arg in strip_player_arg(args, self.world.player) {
            if let AstExpr::Name(name) = arg
                && scope.is_state(name.id.as_str())
            {
                continue;
            }
            out.push(self.analyze_expr(arg, scope)?);
        }
        Some(out)
    }

    /// Inlines a captured helper function: the body is analyzed in the
    /// helper's own captured environment, with parameters bound to the
    /// caller's analyzed arguments. State parameters propagate so the inner
    /// body's state-method calls still specialize.
    fn inline_function(
        &mut self,
        func: &FunctionSource,
        receiver: Option<&Value>,
        args: &[&AstExpr],
        kwargs: &IndexMap<&str, &AstExpr>,
        outer: &Scope,
    ) -> Option<RuleNode> {
        if self.depth >= MAX_INLINE_DEPTH {
            self.warn(
                DiagnosticKind::UnknownPredicateShape,
                format!("helper {:?} exceeded the inlining depth limit", func.name),
            );
            return None;
        }
        let (body, params, env) = match extract::extract(&crate::world::Predicate::Lambda(func.clone())) {
            Extraction::Ast { body, params, env } => (body, params, env),
            Extraction::Serialized(node) => return Some(node),
            Extraction::Failed(reason) => {
                self.warn(DiagnosticKind::ExtractionFailure, reason);
                return None;
            }
        };
        let mut inner = Scope::new(env, Vec::new());
        let mut params = params.as_slice();
        if let (Some(first), Some(receiver)) = (params.first(), receiver)
            && first == "self"
        {
            inner.locals.insert("self".to_owned(), Binding::Value(receiver.clone()));
            params = &params[1..];
        }
        for (i, param) in params.iter().enumerate() {
            let arg = args.get(i).copied().or_else(|| kwargs.get(param.as_str()).copied());
            match arg {
                Some(AstExpr::Name(name)) if outer.is_state(name.id.as_str()) => {
                    inner.state_params.push(param.clone());
                }
                Some(arg) => {
                    let rule = self.analyze_expr(arg, outer)?;
                    inner.locals.insert(param.clone(), Binding::Rule(rule));
                }
                // No argument: the default (already folded into the
                // environment) applies. A state-typed parameter with no
                // argument still resolves state-method calls.
                None if param == "state" => inner.state_params.push(param.clone()),
                None => {}
            }
        }
        self.depth += 1;
        let result = self.analyze_expr(&body, &inner);
        self.depth -= 1;
        result
    }

    /// Expands `any`/`all` over a generator. A resolvable iterator expands
    /// to an n-ary connective with the target substituted per element;
    /// otherwise the quantifier survives with its iterator info so a
    /// postprocess pass can try again.
    fn expand_quantifier(
        &mut self,
        conjunctive: bool,
        elt: &AstExpr,
        generators: &[ast::Comprehension],
        scope: &Scope,
    ) -> Option<RuleNode> {
        let Some((first, rest)) = generators.split_first() else {
            return self.analyze_expr(elt, scope);
        };
        match eval_const(&first.iter, scope).and_then(|v| iterable_elements(&v)) {
            Some(elements) => {
                let mut conditions = Vec::with_capacity(elements.len());
                for element in elements {
                    let mut child = scope.clone();
                    if !bind_target(&mut child, &first.target, &element) {
                        self.warn(
                            DiagnosticKind::UnknownPredicateShape,
                            format!("cannot destructure comprehension target from {}", element.repr()),
                        );
                        return None;
                    }
                    let mut keep = true;
                    let mut guards = Vec::new();
                    for condition in &first.ifs {
                        match eval_const(condition, &child).and_then(|v| v.truthiness()) {
                            Some(true) => {}
                            Some(false) => {
                                keep = false;
                                break;
                            }
                            // Unresolvable guard: carry it into the rule.
                            None => guards.push(self.analyze_expr(condition, &child)?),
                        }
                    }
                    if !keep {
                        continue;
                    }
                    let element_rule = if rest.is_empty() {
                        self.analyze_expr(elt, &child)?
                    } else {
                        self.expand_quantifier(conjunctive, elt, rest, &child)?
                    };
                    conditions.push(combine_guards(conjunctive, guards, element_rule));
                }
                Some(if conjunctive {
                    RuleNode::and(conditions)
                } else {
                    RuleNode::or(conditions)
                })
            }
            None => {
                let target_name = comprehension_target_name(&first.target)?;
                let mut child = scope.clone();
                child.locals.insert(
                    target_name.clone(),
                    Binding::Rule(RuleNode::Name {
                        name: target_name.clone(),
                    }),
                );
                let element_rule = self.analyze_expr(elt, &child)?;
                let iterable = self.analyze_expr(&first.iter, scope)?;
                let info = IteratorInfo {
                    target: target_name,
                    iterable: Box::new(iterable),
                };
                Some(if conjunctive {
                    RuleNode::AllOf {
                        element_rule: Box::new(element_rule),
                        iterator_info: info,
                    }
                } else {
                    RuleNode::AnyOf {
                        element_rule: Box::new(element_rule),
                        iterator_info: info,
                    }
                })
            }
        }
    }

    fn const_string(&mut self, expr: &AstExpr, scope: &Scope) -> Option<String> {
        match eval_const(expr, scope) {
            Some(Value::Str(s)) => Some(s),
            Some(other) => {
                self.warn(
                    DiagnosticKind::ResolutionFailure,
                    format!("expected a string, found {}", other.repr()),
                );
                None
            }
            None => {
                self.warn(
                    DiagnosticKind::ResolutionFailure,
                    format!("argument did not resolve to a string: {expr:?}"),
                );
                None
            }
        }
    }

    /// Resolves an iterable argument to item names. Region-like objects
    /// contribute their documented `code`/`name` identity.
    fn const_string_list(&mut self, expr: &AstExpr, scope: &Scope) -> Option<Vec<String>> {
        let value = eval_const(expr, scope);
        let Some(elements) = value.as_ref().and_then(iterable_elements) else {
            self.warn(
                DiagnosticKind::ResolutionFailure,
                format!("iterable did not resolve at export time: {expr:?}"),
            );
            return None;
        };
        let mut names = Vec::with_capacity(elements.len());
        for element in elements {
            match element.to_json() {
                Some(serde_json::Value::String(s)) => names.push(s),
                _ => {
                    self.warn(
                        DiagnosticKind::ResolutionFailure,
                        format!("iterable element has no item-name identity: {}", element.repr()),
                    );
                    return None;
                }
            }
        }
        Some(names)
    }

    /// A count argument: omitted or 1 means the default and is elided.
    fn optional_count(&mut self, expr: Option<&AstExpr>, scope: &Scope) -> Option<Option<u64>> {
        let Some(expr) = expr else { return Some(None) };
        match eval_const(expr, scope) {
            Some(Value::Int(n)) if n >= 1 => Some(u64::try_from(n).ok().filter(|n| *n > 1)),
            Some(other) => {
                self.warn(
                    DiagnosticKind::ResolutionFailure,
                    format!("count argument is not a positive integer: {}", other.repr()),
                );
                None
            }
            None => {
                self.warn(
                    DiagnosticKind::ResolutionFailure,
                    format!("count argument did not resolve: {expr:?}"),
                );
                None
            }
        }
    }
}

/// The collection-state method names the schema recognizes. Calls to these
/// specialize whether they go through the state object or a module-level
/// wrapper.
fn is_state_method(name: &str) -> bool {
    matches!(
        name,
        "has"
            | "has_all"
            | "has_any"
            | "has_group"
            | "has_group_unique"
            | "has_all_counts"
            | "has_any_count"
            | "has_from_list"
            | "has_from_list_unique"
            | "can_reach"
            | "can_reach_region"
            | "can_reach_location"
            | "can_reach_entrance"
    )
}

/// Wraps unresolvable comprehension guards around an element rule:
/// disjunctions get `guard and element`, conjunctions get the implication
/// `not guard or element`.
fn combine_guards(conjunctive: bool, mut guards: Vec<RuleNode>, element: RuleNode) -> RuleNode {
    if guards.is_empty() {
        return element;
    }
    if conjunctive {
        let negated = guards
            .drain(..)
            .map(|guard| RuleNode::Not {
                condition: Box::new(guard),
            })
            .collect::<Vec<_>>();
        let mut conditions = negated;
        conditions.push(element);
        RuleNode::Or { conditions }
    } else {
        guards.push(element);
        RuleNode::And { conditions: guards }
    }
}

/// Drops a trailing player-id argument (`player` by name or the numeric id).
fn strip_player_arg<'e>(args: &[&'e AstExpr], player: u32) -> Vec<&'e AstExpr> {
    let mut out: Vec<&AstExpr> = args.to_vec();
    if let Some(last) = out.last() {
        let is_player = match last {
            AstExpr::Name(name) => name.id.as_str() == "player",
            AstExpr::Attribute(ast::ExprAttribute { attr, .. }) => attr.id().as_str() == "player",
            AstExpr::NumberLiteral(n) => matches!(&n.value, ast::Number::Int(i) if i.as_i64() == Some(i64::from(player))),
            _ => false,
        };
        if is_player {
            out.pop();
        }
    }
    out
}

fn convert_compare_op(op: CmpOp) -> CompareOp {
    match op {
        CmpOp::Eq => CompareOp::Eq,
        CmpOp::NotEq => CompareOp::NotEq,
        CmpOp::Lt => CompareOp::Lt,
        CmpOp::LtE => CompareOp::LtE,
        CmpOp::Gt => CompareOp::Gt,
        CmpOp::GtE => CompareOp::GtE,
        CmpOp::Is => CompareOp::Is,
        CmpOp::IsNot => CompareOp::IsNot,
        CmpOp::In => CompareOp::In,
        CmpOp::NotIn => CompareOp::NotIn,
    }
}

fn as_comprehension(expr: &AstExpr) -> Option<(&AstExpr, &[ast::Comprehension])> {
    match expr {
        AstExpr::Generator(ast::ExprGenerator { elt, generators, .. })
        | AstExpr::ListComp(ast::ExprListComp { elt, generators, .. })
        | AstExpr::SetComp(ast::ExprSetComp { elt, generators, .. }) => Some((elt, generators)),
        _ => None,
    }
}

fn comprehension_target_name(target: &AstExpr) -> Option<String> {
    match target {
        AstExpr::Name(name) => Some(name.id.as_str().to_owned()),
        _ => None,
    }
}

/// Binds a comprehension target (name or tuple pattern) to an element.
fn bind_target(scope: &mut Scope, target: &AstExpr, element: &Value) -> bool {
    match target {
        AstExpr::Name(name) => {
            scope
                .locals
                .insert(name.id.as_str().to_owned(), Binding::Value(element.clone()));
            true
        }
        AstExpr::Tuple(ast::ExprTuple { elts, .. }) => {
            let parts = match element {
                Value::Tuple(parts) | Value::List(parts) => parts.clone(),
                Value::NamedTuple { fields, .. } => fields.iter().map(|(_, v)| v.clone()).collect(),
                _ => return false,
            };
            if parts.len() != elts.len() {
                return false;
            }
            elts.iter()
                .zip(parts.iter())
                .all(|(sub, part)| bind_target(scope, sub, part))
        }
        _ => false,
    }
}

/// The elements an export-time iterable yields: sequences yield their
/// items, dicts yield their keys (matching host iteration semantics).
fn iterable_elements(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::List(items) | Value::Tuple(items) | Value::Set(items) => Some(items.clone()),
        Value::Dict(pairs) => Some(pairs.iter().map(|(k, _)| k.clone()).collect()),
        _ => None,
    }
}

/// Folds `any`/`all` over a fully constant sequence.
fn fold_quantifier(value: &Value, conjunctive: bool) -> Option<bool> {
    let elements = iterable_elements(value)?;
    let mut truths = Vec::with_capacity(elements.len());
    for element in &elements {
        truths.push(element.truthiness()?);
    }
    Some(if conjunctive {
        truths.iter().all(|t| *t)
    } else {
        truths.iter().any(|t| *t)
    })
}

/// Export-time constant evaluation over the captured environment.
///
/// This is the analyzer-side cousin of the post-analysis resolver: it folds
/// the expression forms whose operands are available as captured values.
/// Anything touching the collection state is never constant.
fn eval_const(expr: &AstExpr, scope: &Scope) -> Option<Value> {
    match expr {
        AstExpr::NoneLiteral(_) => Some(Value::None),
        AstExpr::BooleanLiteral(b) => Some(Value::Bool(b.value)),
        AstExpr::NumberLiteral(n) => match &n.value {
            ast::Number::Int(i) => i.as_i64().map(Value::Int),
            ast::Number::Float(f) => Some(Value::Float(*f)),
            ast::Number::Complex { .. } => None,
        },
        AstExpr::StringLiteral(s) => Some(Value::Str(s.value.to_string())),
        AstExpr::Name(name) => {
            let id = name.id.as_str();
            if scope.is_state(id) {
                return None;
            }
            scope.lookup_value(id).cloned()
        }
        AstExpr::Attribute(ast::ExprAttribute { value, attr, .. }) => {
            eval_const(value, scope)?.attr(attr.id().as_str())
        }
        AstExpr::Subscript(ast::ExprSubscript { value, slice, .. }) => {
            let base = eval_const(value, scope)?;
            let index = eval_const(slice, scope)?;
            base.index(&index)
        }
        AstExpr::Tuple(ast::ExprTuple { elts, .. }) => eval_elements(elts, scope).map(Value::Tuple),
        AstExpr::List(ast::ExprList { elts, .. }) => eval_elements(elts, scope).map(Value::List),
        AstExpr::Set(ast::ExprSet { elts, .. }) => eval_elements(elts, scope).map(Value::Set),
        AstExpr::Dict(ast::ExprDict { items, .. }) => {
            let mut pairs = Vec::with_capacity(items.len());
            for item in items {
                let key = eval_const(item.key.as_ref()?, scope)?;
                let value = eval_const(&item.value, scope)?;
                pairs.push((key, value));
            }
            Some(Value::Dict(pairs))
        }
        AstExpr::BinOp(ast::ExprBinOp { left, op, right, .. }) => {
            eval_binary(&eval_const(left, scope)?, *op, &eval_const(right, scope)?)
        }
        AstExpr::UnaryOp(ast::ExprUnaryOp { op, operand, .. }) => {
            let value = eval_const(operand, scope)?;
            match op {
                UnaryOp::Not => value.truthiness().map(|t| Value::Bool(!t)),
                UnaryOp::USub => match value {
                    Value::Int(i) => Some(Value::Int(-i)),
                    Value::Float(f) => Some(Value::Float(-f)),
                    _ => None,
                },
                UnaryOp::UAdd => match value {
                    Value::Int(_) | Value::Float(_) => Some(value),
                    _ => None,
                },
                UnaryOp::Invert => None,
            }
        }
        AstExpr::Compare(compare) => eval_comparison(compare, scope),
        AstExpr::If(ast::ExprIf { test, body, orelse, .. }) => {
            let truthy = eval_const(test, scope)?.truthiness()?;
            eval_const(if truthy { body } else { orelse }, scope)
        }
        AstExpr::FString(fstring) => eval_fstring(fstring, scope),
        AstExpr::ListComp(ast::ExprListComp { elt, generators, .. })
        | AstExpr::SetComp(ast::ExprSetComp { elt, generators, .. })
        | AstExpr::Generator(ast::ExprGenerator { elt, generators, .. }) => {
            eval_comprehension(elt, generators, scope).map(Value::List)
        }
        AstExpr::Call(ast::ExprCall { func, arguments, .. }) => {
            let AstExpr::Name(name) = &**func else { return None };
            if !arguments.keywords.is_empty() {
                return None;
            }
            let args: Vec<&AstExpr> = arguments.args.iter().collect();
            match (name.id.as_str(), args.as_slice()) {
                ("set" | "frozenset", [arg]) => {
                    iterable_elements(&eval_const(arg, scope)?).map(Value::Set)
                }
                ("list" | "tuple" | "sorted", [arg]) => {
                    let mut elements = iterable_elements(&eval_const(arg, scope)?)?;
                    if name.id.as_str() == "sorted" {
                        if !elements.iter().all(|e| matches!(e, Value::Str(_) | Value::Int(_))) {
                            return None;
                        }
                        elements.sort_by(|a, b| match (a, b) {
                            (Value::Str(x), Value::Str(y)) => x.cmp(y),
                            (Value::Int(x), Value::Int(y)) => x.cmp(y),
                            _ => std::cmp::Ordering::Equal,
                        });
                    }
                    Some(Value::List(elements))
                }
                ("len", [arg]) => {
                    let value = eval_const(arg, scope)?;
                    match &value {
                        Value::Str(s) => Some(Value::Int(i64::try_from(s.chars().count()).ok()?)),
                        _ => iterable_elements(&value).map(|e| Value::Int(e.len() as i64)),
                    }
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn eval_elements(elts: &[AstExpr], scope: &Scope) -> Option<Vec<Value>> {
    elts.iter().map(|e| eval_const(e, scope)).collect()
}

fn eval_binary(left: &Value, op: AstOperator, right: &Value) -> Option<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => match op {
            AstOperator::Add => Some(Value::Int(a.checked_add(*b)?)),
            AstOperator::Sub => Some(Value::Int(a.checked_sub(*b)?)),
            AstOperator::Mult => Some(Value::Int(a.checked_mul(*b)?)),
            AstOperator::Div => (*b != 0).then(|| Value::Float(*a as f64 / *b as f64)),
            AstOperator::FloorDiv => a.checked_div_euclid(*b).map(Value::Int),
            AstOperator::Mod => a.checked_rem_euclid(*b).map(Value::Int),
            _ => None,
        },
        (Value::Float(a), Value::Float(b)) => eval_float(*a, op, *b),
        (Value::Int(a), Value::Float(b)) => eval_float(*a as f64, op, *b),
        (Value::Float(a), Value::Int(b)) => eval_float(*a, op, *b as f64),
        (Value::Str(a), Value::Str(b)) if matches!(op, AstOperator::Add) => Some(Value::Str(format!("{a}{b}"))),
        (Value::List(a), Value::List(b)) if matches!(op, AstOperator::Add) => {
            let mut joined = a.clone();
            joined.extend(b.iter().cloned());
            Some(Value::List(joined))
        }
        _ => None,
    }
}

fn eval_float(a: f64, op: AstOperator, b: f64) -> Option<Value> {
    match op {
        AstOperator::Add => Some(Value::Float(a + b)),
        AstOperator::Sub => Some(Value::Float(a - b)),
        AstOperator::Mult => Some(Value::Float(a * b)),
        AstOperator::Div => (b != 0.0).then(|| Value::Float(a / b)),
        AstOperator::FloorDiv => (b != 0.0).then(|| Value::Float((a / b).floor())),
        AstOperator::Mod => (b != 0.0).then(|| Value::Float(a.rem_euclid(b))),
        _ => None,
    }
}

fn eval_comparison(compare: &ast::ExprCompare, scope: &Scope) -> Option<Value> {
    let mut left = eval_const(&compare.left, scope)?;
    for (op, comparator) in compare.ops.iter().zip(compare.comparators.iter()) {
        let right = eval_const(comparator, scope)?;
        let holds = match op {
            CmpOp::Eq => left == right,
            CmpOp::NotEq => left != right,
            CmpOp::Lt | CmpOp::LtE | CmpOp::Gt | CmpOp::GtE => {
                let ordering = compare_values(&left, &right)?;
                match op {
                    CmpOp::Lt => ordering.is_lt(),
                    CmpOp::LtE => ordering.is_le(),
                    CmpOp::Gt => ordering.is_gt(),
                    CmpOp::GtE => ordering.is_ge(),
                    _ => unreachable!(),
                }
            }
            CmpOp::In | CmpOp::NotIn => {
                let contains = match &right {
                    Value::Str(haystack) => match &left {
                        Value::Str(needle) => haystack.contains(needle.as_str()),
                        _ => return None,
                    },
                    other => iterable_elements(other)?.iter().any(|e| e.key_matches(&left)),
                };
                if matches!(op, CmpOp::In) { contains } else { !contains }
            }
            CmpOp::Is => left == right,
            CmpOp::IsNot => left != right,
        };
        if !holds {
            return Some(Value::Bool(false));
        }
        left = right;
    }
    Some(Value::Bool(true))
}

fn compare_values(left: &Value, right: &Value) -> Option<std::cmp::Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Evaluates an f-string whose interpolations all resolve, including
/// nested subscripts inside interpolations.
fn eval_fstring(fstring: &ast::ExprFString, scope: &Scope) -> Option<Value> {
    let mut out = String::new();
    for part in &fstring.value {
        match part {
            ast::FStringPart::Literal(lit) => out.push_str(&lit.value),
            ast::FStringPart::FString(inner) => {
                for element in &inner.elements {
                    match element {
                        ast::InterpolatedStringElement::Literal(lit) => out.push_str(&lit.value),
                        ast::InterpolatedStringElement::Interpolation(interp) => {
                            if interp.format_spec.is_some() {
                                return None;
                            }
                            let value = eval_const(&interp.expression, scope)?;
                            out.push_str(&format_value(&value)?);
                        }
                    }
                }
            }
        }
    }
    Some(Value::Str(out))
}

/// Host-language `str()` for interpolation results.
fn format_value(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Bool(b) => Some(if *b { "True" } else { "False" }.to_owned()),
        Value::None => Some("None".to_owned()),
        Value::Enum { value, .. } => format_value(value),
        _ => None,
    }
}

fn eval_comprehension(elt: &AstExpr, generators: &[ast::Comprehension], scope: &Scope) -> Option<Vec<Value>> {
    let Some((first, rest)) = generators.split_first() else {
        return eval_const(elt, scope).map(|v| vec![v]);
    };
    let elements = iterable_elements(&eval_const(&first.iter, scope)?)?;
    let mut out = Vec::new();
    for element in elements {
        let mut child = scope.clone();
        if !bind_target(&mut child, &first.target, &element) {
            return None;
        }
        let mut keep = true;
        for condition in &first.ifs {
            match eval_const(condition, &child).and_then(|v| v.truthiness()) {
                Some(true) => {}
                _ => {
                    keep = false;
                    break;
                }
            }
        }
        if !keep {
            continue;
        }
        if rest.is_empty() {
            out.push(eval_const(elt, &child)?);
        } else {
            out.extend(eval_comprehension(elt, rest, &child)?);
        }
    }
    Some(out)
}
