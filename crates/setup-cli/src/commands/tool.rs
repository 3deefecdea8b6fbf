//! Single-tool setup commands.

use super::Options;
use setup_core::{
    Context, MANAGERS, PathProbe, Report, StepKind, StepOutcome, SystemRunner, UserConfig, apply,
};
use setup_seed::{TemplateResolver, Tool};
use std::process::ExitCode;

pub fn run(tool: Tool, opts: &Options) -> ExitCode {
    run_all(&[tool], opts, false)
}

/// Apply the recipes for `tools` in order.
///
/// A failing tool does not stop the ones after it; the exit code reports
/// whether everything succeeded.
pub fn run_all(tools: &[Tool], opts: &Options, banners: bool) -> ExitCode {
    let config = UserConfig::load();
    let resolver = match config.resolver(opts.pm) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("hint: check [package-manager] in your config file");
            return ExitCode::FAILURE;
        }
    };
    let templates = TemplateResolver::from_config(&config);

    let probe = PathProbe::new();
    let runner = SystemRunner;
    let ctx = Context::new(&opts.dir, &probe, &runner)
        .with_resolver(resolver)
        .with_dry_run(opts.dry_run);

    let mut failed = Vec::new();
    for &tool in tools {
        if banners {
            banner(tool, "BEGIN");
        }

        match templates.recipe(tool) {
            Ok(recipe) => {
                let report = apply(&recipe, &ctx);
                print_report(&report);
                if !report.is_success() {
                    failed.push(tool);
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                failed.push(tool);
            }
        }

        if banners {
            banner(tool, "END");
        }
    }

    if failed.is_empty() {
        ExitCode::SUCCESS
    } else {
        if tools.len() > 1 {
            let names: Vec<&str> = failed.iter().map(|t| t.id()).collect();
            eprintln!("error: setup incomplete for {}", names.join(", "));
        }
        ExitCode::FAILURE
    }
}

fn banner(tool: Tool, edge: &str) {
    let line = format!("=============== Setup {} {edge} ===============", tool.title());
    if edge == "BEGIN" {
        println!("\n{line}");
    } else {
        println!("{line}\n");
    }
}

/// Print one line per step.
pub fn print_report(report: &Report) {
    for step in &report.steps {
        match &step.outcome {
            StepOutcome::Done(msg) => println!("{}: {msg}", step.kind),
            StepOutcome::Skipped(msg) => println!("skipped: {msg}"),
            StepOutcome::Failed(msg) => eprintln!("error: {}: {msg}", step.kind),
        }
    }

    if report
        .of_kind(StepKind::ResolveManager)
        .any(|s| s.outcome.is_failed())
    {
        let names: Vec<&str> = MANAGERS.iter().map(|spec| spec.binary).collect();
        eprintln!("hint: install one of {} and try again", names.join(", "));
    } else if report.is_success() {
        println!("{} setup complete", report.tool);
    }
}
