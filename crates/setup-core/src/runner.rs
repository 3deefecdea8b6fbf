//! Subprocess execution.

use std::process::Command;

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("empty command")]
    Empty,
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' exited with {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "a signal".to_string()))]
    Exit { program: String, code: Option<i32> },
}

/// Runs commands to completion.
pub trait Runner {
    fn run(&self, argv: &[String]) -> Result<(), RunError>;
}

/// Spawns real processes with inherited stdio, blocking until they exit.
#[derive(Debug, Default, Clone)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, argv: &[String]) -> Result<(), RunError> {
        let (program, args) = argv.split_first().ok_or(RunError::Empty)?;

        // Resolve through PATHEXT so `npm` finds `npm.cmd` on Windows
        let resolved = which::which(program).unwrap_or_else(|_| program.into());
        log::info!("running: {}", argv.join(" "));

        let status = Command::new(&resolved)
            .args(args)
            .status()
            .map_err(|source| RunError::Spawn {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RunError::Exit {
                program: program.clone(),
                code: status.code(),
            })
        }
    }
}
