//! Python helper scripts.

use super::Options;
use inquire::MultiSelect;
use setup_core::{UserConfig, write_config};
use setup_seed::{Helper, PY_HELPERS, TemplateResolver};
use std::process::ExitCode;

pub fn run(args: &[String], opts: &Options) -> ExitCode {
    println!("Python project initializing...");

    let helpers: Vec<&Helper> = if args.is_empty() {
        let names: Vec<&str> = PY_HELPERS.iter().map(|h| h.name).collect();
        match MultiSelect::new("Setup scripts", names).prompt() {
            Ok(chosen) => PY_HELPERS
                .iter()
                .filter(|h| chosen.contains(&h.name))
                .collect(),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        let mut found = Vec::new();
        for arg in args {
            match PY_HELPERS.iter().find(|h| h.name.eq_ignore_ascii_case(arg)) {
                Some(helper) => found.push(helper),
                None => {
                    eprintln!("error: unknown script: {arg}");
                    let names: Vec<&str> = PY_HELPERS.iter().map(|h| h.name).collect();
                    eprintln!("hint: available scripts: {}", names.join(", "));
                    return ExitCode::FAILURE;
                }
            }
        }
        found
    };

    if helpers.is_empty() {
        println!("nothing selected");
        return ExitCode::SUCCESS;
    }

    let templates = TemplateResolver::from_config(&UserConfig::load());
    let mut status = ExitCode::SUCCESS;
    for helper in helpers {
        let file = match templates.helper(helper) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("error: {e}");
                status = ExitCode::FAILURE;
                continue;
            }
        };

        if opts.dry_run {
            println!("dry run: would write {}", file.path.display());
            continue;
        }

        match write_config(&opts.dir.join(&file.path), &file.contents) {
            Ok(()) => {
                println!("wrote: {}", file.path.display());
                println!("docs: {}", helper.docs);
            }
            Err(e) => {
                eprintln!("error: {e}");
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}
