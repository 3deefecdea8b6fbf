//! Shebang insertion command.

use super::Options;
use setup_core::shebang::insert_shebangs;
use std::process::ExitCode;

pub fn run(opts: &Options) -> ExitCode {
    let report = insert_shebangs(&opts.dir, opts.dry_run);

    for path in &report.changed {
        if opts.dry_run {
            println!("dry run: would add shebang to {}", path.display());
        } else {
            println!("added shebang: {}", path.display());
        }
    }
    for e in &report.errors {
        eprintln!("error: {e}");
    }

    if report.changed.is_empty() && report.errors.is_empty() {
        println!("nothing to do");
    }

    if report.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
