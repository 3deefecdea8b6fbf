//! `node` and `es`: pick several tools and set them up in order.

use super::Options;
use super::tool::run_all;
use inquire::MultiSelect;
use setup_seed::{ES_TOOLS, NODE_TOOLS, Tool, parse_tools, select};
use std::process::ExitCode;

pub fn node(args: &[String], opts: &Options) -> ExitCode {
    println!("Node.js project initializing...");
    run(NODE_TOOLS, args, opts)
}

pub fn es(args: &[String], opts: &Options) -> ExitCode {
    println!("ECMAScript project initializing...");
    run(ES_TOOLS, args, opts)
}

fn run(offered: &[Tool], args: &[String], opts: &Options) -> ExitCode {
    let chosen = if args.is_empty() {
        match prompt(offered) {
            Ok(tools) => tools,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        match parse_tools(args) {
            Ok(tools) => tools,
            Err(e) => {
                eprintln!("error: {e}");
                let names: Vec<&str> = offered.iter().map(|t| t.id()).collect();
                eprintln!("hint: choose from {}", names.join(", "));
                return ExitCode::FAILURE;
            }
        }
    };

    if let Some(tool) = chosen.iter().find(|t| !offered.contains(*t)) {
        eprintln!("error: {tool} is not offered here");
        return ExitCode::FAILURE;
    }

    let tools = select(&chosen);
    if tools.is_empty() {
        println!("nothing selected");
        return ExitCode::SUCCESS;
    }

    let names: Vec<&str> = chosen.iter().map(|t| t.id()).collect();
    println!("chosen tools: {}", names.join(", "));
    run_all(&tools, opts, true)
}

fn prompt(offered: &[Tool]) -> Result<Vec<Tool>, inquire::InquireError> {
    MultiSelect::new("Tool chains", offered.to_vec())
        .with_help_message("space to toggle, enter to confirm")
        .with_page_size(offered.len())
        .prompt()
}
