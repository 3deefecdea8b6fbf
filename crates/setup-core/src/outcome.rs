//! Per-step results of a setup run.

use std::fmt;

/// What happened to one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step ran and succeeded.
    Done(String),
    /// The step was not attempted, with the reason.
    Skipped(String),
    /// The step ran and failed, with the reason.
    Failed(String),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// Which part of a recipe a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    ResolveManager,
    Install,
    PostInstall,
    WriteConfig,
    PatchManifest,
    AppendHook,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::ResolveManager => "resolve",
            StepKind::Install => "install",
            StepKind::PostInstall => "post-install",
            StepKind::WriteConfig => "write",
            StepKind::PatchManifest => "package.json",
            StepKind::AppendHook => "hook",
        };
        f.write_str(name)
    }
}

/// One recorded step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub kind: StepKind,
    pub outcome: StepOutcome,
}

/// Results of applying one recipe.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Tool id the recipe belongs to.
    pub tool: String,
    pub steps: Vec<Step>,
}

impl Report {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: StepKind, outcome: StepOutcome) {
        // Callers print steps themselves; keep the log at debug.
        log::debug!("{}: {kind}: {:?}", self.tool, outcome);
        self.steps.push(Step { kind, outcome });
    }

    /// True when no step failed.
    pub fn is_success(&self) -> bool {
        !self.steps.iter().any(|s| s.outcome.is_failed())
    }

    pub fn failures(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|s| s.outcome.is_failed())
    }

    /// All steps of one kind.
    pub fn of_kind(&self, kind: StepKind) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(move |s| s.kind == kind)
    }
}
