//! Template override listing.

use setup_core::UserConfig;
use setup_seed::{PY_HELPERS, TemplateResolver, Tool, builtin};
use std::collections::BTreeSet;
use std::process::ExitCode;

pub fn run() -> ExitCode {
    let templates = TemplateResolver::from_config(&UserConfig::load());
    let Some(dir) = templates.user_dir() else {
        println!("no template override directory (config directory unknown)");
        return ExitCode::SUCCESS;
    };
    println!("Template overrides in {}:", dir.display());

    let names = match templates.overrides() {
        Ok(names) => names,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if names.is_empty() {
        println!("  (none)");
        return ExitCode::SUCCESS;
    }

    let known = known_templates();
    for name in &names {
        if known.contains(name.as_str()) {
            println!("  {name}");
        } else {
            println!("  {name}  (unused: no built-in template has this name)");
        }
    }
    ExitCode::SUCCESS
}

/// File names that an override can replace.
fn known_templates() -> BTreeSet<String> {
    let mut names: BTreeSet<String> = Tool::ALL
        .into_iter()
        .flat_map(|tool| builtin(tool).files)
        .filter_map(|file| Some(file.path.file_name()?.to_str()?.to_string()))
        .collect();
    names.extend(PY_HELPERS.iter().map(|h| h.file.to_string()));
    names
}
