mod commands;

use clap::{ArgAction, Parser, Subcommand};
use commands::Options;
use setup_core::PackageManager;
use setup_seed::Tool;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "setup", version)]
#[command(about = "Set up JavaScript/TypeScript tool chains in a project")]
struct Cli {
    /// Package manager to try first (pnpm, npm, yarn, bun)
    #[arg(long, global = true, value_name = "NAME", value_parser = parse_manager)]
    pm: Option<PackageManager>,

    /// Project directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Show what would be done without installing or writing anything
    #[arg(long, global = true)]
    dry_run: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Set up ESLint with a flat config and a lint script
    Eslint,

    /// Set up Prettier with config, ignore file and a format script
    Prettier,

    /// Set up ESLint and Prettier together
    Linter,

    /// Set up Vitest with config, setup file and a test script
    Vitest,

    /// Install Husky and initialize its hooks
    Husky,

    /// Set up commitlint for conventional commit messages
    Commitlint,

    /// Set up lint-staged as the pre-commit check
    #[command(alias = "lintStaged")]
    LintStaged,

    /// Set up release-it with a conventional changelog
    #[command(alias = "releaseIt")]
    ReleaseIt,

    /// Pick Node.js tools to set up
    Node {
        /// Tools to set up instead of prompting
        #[arg(value_name = "TOOL")]
        tools: Vec<String>,
    },

    /// Pick ECMAScript tools to set up (subset of node)
    Es {
        /// Tools to set up instead of prompting
        #[arg(value_name = "TOOL")]
        tools: Vec<String>,
    },

    /// Open documentation for a tool
    Doc {
        /// Tool name (prompts if omitted)
        tool: Option<String>,

        /// Print the URL instead of opening a browser
        #[arg(long)]
        print: bool,
    },

    /// Fetch a .gitignore template from github/gitignore
    Ignore {
        /// Template name, e.g. Node or Global/macOS
        lang: Option<String>,

        /// List every available template
        #[arg(short, long)]
        all: bool,

        /// List templates starting with a letter
        #[arg(short = 'c', long = "char", value_name = "C")]
        letter: Option<char>,

        /// Refetch the template list instead of using the cache
        #[arg(long)]
        refresh: bool,
    },

    /// Add missing shebang lines to .sh and .ps1 files
    Shell,

    /// Scaffold Python helper scripts
    Py {
        /// Helpers to write instead of prompting
        #[arg(value_name = "SCRIPT")]
        scripts: Vec<String>,
    },

    /// Show detected package managers
    Managers,

    /// Show the template override directory and its files
    Templates,
}

fn parse_manager(s: &str) -> Result<PackageManager, String> {
    PackageManager::from_id(s)
        .ok_or_else(|| format!("unknown package manager '{s}' (expected pnpm, npm, yarn or bun)"))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let opts = Options {
        dir: cli.dir,
        pm: cli.pm,
        dry_run: cli.dry_run,
    };
    log::debug!("project directory: {}", opts.dir.display());

    match cli.command {
        Command::Eslint => commands::tool::run(Tool::Eslint, &opts),
        Command::Prettier => commands::tool::run(Tool::Prettier, &opts),
        Command::Linter => commands::tool::run(Tool::Linter, &opts),
        Command::Vitest => commands::tool::run(Tool::Vitest, &opts),
        Command::Husky => commands::tool::run(Tool::Husky, &opts),
        Command::Commitlint => commands::tool::run(Tool::Commitlint, &opts),
        Command::LintStaged => commands::tool::run(Tool::LintStaged, &opts),
        Command::ReleaseIt => commands::tool::run(Tool::ReleaseIt, &opts),
        Command::Node { tools } => commands::select::node(&tools, &opts),
        Command::Es { tools } => commands::select::es(&tools, &opts),
        Command::Doc { tool, print } => commands::doc::run(tool.as_deref(), print),
        Command::Ignore {
            lang,
            all,
            letter,
            refresh,
        } => commands::ignore::run(lang.as_deref(), all, letter, refresh, &opts),
        Command::Shell => commands::shell::run(&opts),
        Command::Py { scripts } => commands::py::run(&scripts, &opts),
        Command::Managers => commands::managers::run(&opts),
        Command::Templates => commands::templates::run(),
    }
}
