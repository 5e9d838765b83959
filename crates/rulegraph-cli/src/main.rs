use std::{env, fs, path::PathBuf, process::ExitCode};

use rulegraph::{ExportOptions, HandlerRegistry, World, export_to_dir};

/// A generator-side dump of one seed: the seed identifier plus every
/// world's regions, items, and captured predicates.
#[derive(serde::Deserialize)]
struct SeedDump {
    seed: String,
    worlds: Vec<World>,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let (dump_path, output_root) = match args.as_slice() {
        [_, dump, root] => (dump.clone(), PathBuf::from(root)),
        [_, dump] => (dump.clone(), PathBuf::from("output")),
        _ => {
            eprintln!("usage: rulegraph <world-dump.json> [output-root]");
            return ExitCode::FAILURE;
        }
    };

    let raw = match fs::read_to_string(&dump_path) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("error: failed to read {dump_path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut dump: SeedDump = match serde_json::from_str(&raw) {
        Ok(dump) => dump,
        Err(err) => {
            eprintln!("error: failed to parse {dump_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let registry = HandlerRegistry::new();
    match export_to_dir(
        &mut dump.worlds,
        &registry,
        ExportOptions::default(),
        &output_root,
        &dump.seed,
    ) {
        Ok((path, output)) => {
            for diagnostic in &output.diagnostics {
                eprintln!("warning: {diagnostic}");
            }
            println!("wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
