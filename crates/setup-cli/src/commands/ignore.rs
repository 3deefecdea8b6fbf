//! `.gitignore` template fetcher.

use super::Options;
use inquire::validator::Validation;
use inquire::{CustomUserError, Select, Text};
use setup_core::UserConfig;
use setup_core::gitignore::{GitignoreClient, GitignoreIndex};
use std::process::ExitCode;

const RULE: &str = "=====================================================>";

pub fn run(
    lang: Option<&str>,
    all: bool,
    letter: Option<char>,
    refresh: bool,
    opts: &Options,
) -> ExitCode {
    let config = UserConfig::load();
    let client = GitignoreClient::new()
        .with_urls(&config.gitignore.base_url, &config.gitignore.index_url);
    if refresh && let Err(e) = client.clear_cache() {
        eprintln!("warning: could not clear the template index cache: {e}");
    }
    let index = client.index();

    if all {
        println!("Available templates:");
        println!("{RULE}");
        for key in index.keys() {
            println!("{key}");
        }
        return ExitCode::SUCCESS;
    }

    if let Some(c) = letter {
        println!("Available templates starting with '{c}':");
        println!("{RULE}");
        for key in index.starting_with(&c.to_string()) {
            println!("{key}");
        }
        return ExitCode::SUCCESS;
    }

    let path = match lang {
        Some(name) => match index.find(name) {
            Some((_, path)) => path.to_string(),
            None => {
                eprintln!("error: no template named '{name}'");
                eprintln!("hint: run 'setup ignore --all' to list templates");
                return ExitCode::FAILURE;
            }
        },
        None => {
            let letter = match prompt_letter() {
                Ok(letter) => letter,
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let keys = match choices(&index, &letter) {
                Ok(keys) => keys,
                Err(msg) => {
                    eprintln!("error: {msg}");
                    eprintln!("hint: run 'setup ignore --all' to list templates");
                    return ExitCode::FAILURE;
                }
            };
            match Select::new("Choose the template:", keys).prompt() {
                Ok(key) => resolve_path(&index, key),
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    if opts.dry_run {
        println!("dry run: would download {}", client.template_url(&path));
        return ExitCode::SUCCESS;
    }

    match client.download(&path, &opts.dir) {
        Ok(dest) => {
            println!("wrote: {}", dest.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn prompt_letter() -> Result<String, inquire::InquireError> {
    Text::new("First letter of the template [A-Za-z]:")
        .with_placeholder("A")
        .with_help_message("templates starting with it are listed next")
        .with_validator(|s: &str| -> Result<Validation, CustomUserError> {
            let mut chars = s.chars();
            Ok(match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => Validation::Valid,
                _ => Validation::Invalid("enter a single letter".into()),
            })
        })
        .prompt()
}

/// Template keys offered for `letter`.
fn choices(index: &GitignoreIndex, letter: &str) -> Result<Vec<String>, String> {
    let keys: Vec<String> = index
        .starting_with(letter)
        .into_iter()
        .map(String::from)
        .collect();
    if keys.is_empty() {
        return Err(format!("no templates start with '{letter}'"));
    }
    Ok(keys)
}

fn resolve_path(index: &GitignoreIndex, key: String) -> String {
    index
        .find(&key)
        .map(|(_, path)| path.to_string())
        .unwrap_or(key)
}
