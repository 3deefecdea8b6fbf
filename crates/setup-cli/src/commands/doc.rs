//! Documentation opener.

use inquire::MultiSelect;
use setup_core::docs::{self, OpenError};
use std::fmt;
use std::process::ExitCode;

/// Picker entry showing the tool and where it leads.
struct DocChoice {
    tool: &'static str,
    url: &'static str,
}

impl fmt::Display for DocChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12} {}", self.tool, self.url)
    }
}

pub fn run(tool: Option<&str>, print: bool) -> ExitCode {
    let urls: Vec<&'static str> = match tool {
        Some(name) => match docs::lookup(name) {
            Some(url) => vec![url],
            None => {
                eprintln!("error: unknown tool: {name}");
                let names: Vec<&str> = docs::links().iter().map(|(n, _)| *n).collect();
                eprintln!("hint: available tools: {}", names.join(", "));
                return ExitCode::FAILURE;
            }
        },
        None => {
            let choices: Vec<DocChoice> = docs::links()
                .iter()
                .map(|&(tool, url)| DocChoice { tool, url })
                .collect();
            match MultiSelect::new("Docs for tool chain", choices)
                .with_help_message("open the docs for the chosen tools")
                .with_page_size(10)
                .prompt()
            {
                Ok(chosen) => chosen.into_iter().map(|c| c.url).collect(),
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    let mut status = ExitCode::SUCCESS;
    for url in urls {
        if print {
            println!("{url}");
            continue;
        }

        match docs::open_url(url) {
            Ok(()) => println!("opened: {url}"),
            Err(e @ OpenError::UnsupportedPlatform(_)) => {
                eprintln!("warning: {e}");
            }
            Err(e) => {
                eprintln!("error: {e}");
                eprintln!("hint: open {url} manually");
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}
