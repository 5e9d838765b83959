use ruff_python_ast::{self as ast, Expr as AstExpr, Stmt};
use ruff_python_parser::parse_module;

use crate::world::World;

/// Resolves the output directory slug for a world.
///
/// The hosting directory's short name wins when the dump carries it: world
/// modules routinely declare a long display name ("Castlevania 64") while
/// living in a short directory (`cv64`), and the directory is what output
/// paths are keyed by. Otherwise the declared `game` attribute is read out
/// of the module source, falling back to the runtime game name.
pub fn resolve_game_slug(world: &World) -> String {
    if let Some(dir) = &world.module_dir {
        return dir.clone();
    }
    let declared = world
        .module_source
        .as_deref()
        .and_then(declared_game_name)
        .unwrap_or_else(|| world.game.clone());
    slugify(&declared)
}

/// Finds the `game` attribute declaration in a world module.
///
/// Accepts every declaration form world modules use: `game = "X"`,
/// `game: str = "X"`, `game: ClassVar[str] = "X"`, and
/// `game: Optional[str] = "X"`, at module level or inside a class body.
fn declared_game_name(source: &str) -> Option<String> {
    let module = parse_module(source).ok()?.into_syntax();
    find_game_assignment(&module.body)
}

fn find_game_assignment(body: &[Stmt]) -> Option<String> {
    for stmt in body {
        match stmt {
            Stmt::Assign(ast::StmtAssign { targets, value, .. }) => {
                if targets.iter().any(|t| is_name(t, "game"))
                    && let Some(name) = string_value(value)
                {
                    return Some(name);
                }
            }
            Stmt::AnnAssign(ast::StmtAnnAssign { target, value, .. }) => {
                if is_name(target, "game")
                    && let Some(name) = value.as_deref().and_then(string_value)
                {
                    return Some(name);
                }
            }
            Stmt::ClassDef(ast::StmtClassDef { body, .. }) => {
                if let Some(name) = find_game_assignment(body) {
                    return Some(name);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_name(expr: &AstExpr, name: &str) -> bool {
    matches!(expr, AstExpr::Name(n) if n.id.as_str() == name)
}

fn string_value(expr: &AstExpr) -> Option<String> {
    match expr {
        AstExpr::StringLiteral(s) => Some(s.value.to_string()),
        _ => None,
    }
}

/// Lowercases and collapses non-alphanumeric runs to `_`.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn world_with_source(source: Option<&str>, dir: Option<&str>) -> World {
        World {
            game: "Fallback Name".to_owned(),
            player: 1,
            options: IndexMap::new(),
            origin_region: None,
            regions: Vec::new(),
            items: IndexMap::new(),
            precollected: Vec::new(),
            module_source: source.map(str::to_owned),
            module_dir: dir.map(str::to_owned),
            logic: None,
        }
    }

    #[test]
    fn directory_short_name_takes_precedence() {
        let world = world_with_source(Some("class CV64World:\n    game = \"Castlevania 64\"\n"), Some("cv64"));
        assert_eq!(resolve_game_slug(&world), "cv64");
    }

    #[test]
    fn plain_assignment_is_found_in_class_body() {
        let world = world_with_source(Some("class W:\n    game = \"Ocarina of Time\"\n"), None);
        assert_eq!(resolve_game_slug(&world), "ocarina_of_time");
    }

    #[test]
    fn annotated_forms_are_accepted() {
        for declaration in [
            "game: str = \"Risk of Rain 2\"",
            "game: ClassVar[str] = \"Risk of Rain 2\"",
            "game: Optional[str] = \"Risk of Rain 2\"",
        ] {
            let source = format!("class W:\n    {declaration}\n");
            let world = world_with_source(Some(&source), None);
            assert_eq!(resolve_game_slug(&world), "risk_of_rain_2", "failed for {declaration}");
        }
    }

    #[test]
    fn runtime_game_name_is_the_fallback() {
        let world = world_with_source(None, None);
        assert_eq!(resolve_game_slug(&world), "fallback_name");
    }
}
