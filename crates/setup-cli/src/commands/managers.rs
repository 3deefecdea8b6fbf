//! Package manager detection report.

use super::Options;
use setup_core::{PathProbe, UserConfig};
use std::process::ExitCode;

pub fn run(opts: &Options) -> ExitCode {
    let resolver = match UserConfig::load().resolver(opts.pm) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let probe = PathProbe::new();
    let detected = resolver.detect_all(&probe);

    if detected.is_empty() {
        println!("no supported package managers detected");
        let names: Vec<&str> = resolver.order().iter().map(|pm| pm.id()).collect();
        println!("hint: install one of {}", names.join(", "));
        return ExitCode::SUCCESS;
    }

    println!("Detected package managers:");
    for (i, pm) in detected.iter().enumerate() {
        let marker = if i == 0 { "  (selected)" } else { "" };
        match probe.locate(pm.spec().binary) {
            Some(path) => println!("  {:<6} {}{marker}", pm.id(), path.display()),
            None => println!("  {:<6}{marker}", pm.id()),
        }
    }

    ExitCode::SUCCESS
}
