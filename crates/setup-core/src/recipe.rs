//! Tool recipes and the step-by-step dispatcher that applies them.

use crate::hook::{HookOutcome, append_hook};
use crate::manifest::{MANIFEST_FILE, ScriptChange, set_scripts};
use crate::outcome::{Report, StepKind, StepOutcome};
use crate::pm::{PackageManager, Probe, Resolver};
use crate::runner::Runner;
use crate::write::write_config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A set of packages added with one install command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Install {
    pub packages: Vec<String>,
    /// Pin exact versions.
    pub exact: bool,
}

/// A config file to write, relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTemplate {
    pub path: PathBuf,
    pub contents: String,
}

/// A `package.json` script to set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub name: String,
    pub command: String,
}

/// A line to add to an existing hook file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEntry {
    pub path: PathBuf,
    pub command: String,
}

/// Everything needed to set one tool up in a project.
///
/// String fields may contain `{{run}}`, `{{exec}}` and `{{manager}}`
/// placeholders, expanded once the package manager is known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipe {
    /// Tool identifier (e.g. "eslint").
    pub tool: String,
    /// Human readable name.
    pub title: String,
    pub installs: Vec<Install>,
    /// Package binary invocation run after installing, e.g. `husky init`.
    pub post_install: Option<Vec<String>>,
    pub files: Vec<FileTemplate>,
    pub scripts: Vec<ScriptEntry>,
    pub hooks: Vec<HookEntry>,
}

/// Where and how a recipe is applied.
pub struct Context<'a> {
    /// Project directory containing `package.json`.
    pub dir: PathBuf,
    pub resolver: Resolver,
    pub probe: &'a dyn Probe,
    pub runner: &'a dyn Runner,
    /// Report what would happen without running or writing anything.
    pub dry_run: bool,
}

impl<'a> Context<'a> {
    /// Context for `dir` with the default resolver.
    pub fn new(dir: impl AsRef<Path>, probe: &'a dyn Probe, runner: &'a dyn Runner) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            resolver: Resolver::default(),
            probe,
            runner,
            dry_run: false,
        }
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Simple variable substitution: replaces `{{key}}` with value.
pub fn substitute(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{key}}}}}"), value);
    }
    result
}

/// Template variables for a resolved package manager.
pub fn manager_variables(pm: PackageManager) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    vars.insert("manager".to_string(), pm.id().to_string());
    vars.insert("run".to_string(), pm.run_prefix().to_string());
    if let Some(exec) = pm.exec_prefix_display() {
        vars.insert("exec".to_string(), exec);
    }
    vars
}

/// Apply a recipe, recording the outcome of every step.
///
/// Only a failure to find a package manager stops the run early; every
/// other failure is recorded and the remaining steps still run.
pub fn apply(recipe: &Recipe, ctx: &Context<'_>) -> Report {
    let mut report = Report::new(&recipe.tool);

    let pm = match ctx.resolver.resolve(ctx.probe) {
        Ok(pm) => {
            report.push(
                StepKind::ResolveManager,
                StepOutcome::Done(format!("found package manager: {pm}")),
            );
            pm
        }
        Err(e) => {
            report.push(StepKind::ResolveManager, StepOutcome::Failed(e.to_string()));
            return report;
        }
    };
    let vars = manager_variables(pm);

    let installed = install(recipe, pm, ctx, &mut report);
    post_install(recipe, pm, installed, ctx, &mut report);
    write_files(recipe, &vars, ctx, &mut report);
    patch_manifest(recipe, &vars, ctx, &mut report);
    append_hooks(recipe, &vars, ctx, &mut report);

    report
}

/// Run every install group. Returns whether all of them succeeded.
fn install(recipe: &Recipe, pm: PackageManager, ctx: &Context<'_>, report: &mut Report) -> bool {
    let mut all_ok = true;
    for group in &recipe.installs {
        let packages: Vec<&str> = group.packages.iter().map(String::as_str).collect();
        let cmd = pm.dev_install_cmd(&packages, group.exact);
        let display = cmd.join(" ");

        if ctx.dry_run {
            report.push(StepKind::Install, StepOutcome::Skipped(format!("dry run: {display}")));
            continue;
        }

        match ctx.runner.run(&cmd) {
            Ok(()) => report.push(StepKind::Install, StepOutcome::Done(display)),
            Err(e) => {
                all_ok = false;
                report.push(
                    StepKind::Install,
                    StepOutcome::Failed(format!("{display}: {e}")),
                );
            }
        }
    }
    all_ok
}

fn post_install(
    recipe: &Recipe,
    pm: PackageManager,
    installed: bool,
    ctx: &Context<'_>,
    report: &mut Report,
) {
    let Some(args) = &recipe.post_install else {
        return;
    };
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let Some(cmd) = pm.exec_cmd(&args) else {
        report.push(
            StepKind::PostInstall,
            StepOutcome::Skipped(format!(
                "{pm} cannot run '{}' automatically, see the {} docs",
                args.join(" "),
                recipe.title
            )),
        );
        return;
    };
    let display = cmd.join(" ");

    if ctx.dry_run {
        report.push(StepKind::PostInstall, StepOutcome::Skipped(format!("dry run: {display}")));
        return;
    }
    if !installed {
        report.push(
            StepKind::PostInstall,
            StepOutcome::Skipped(format!("{display}: install failed")),
        );
        return;
    }

    match ctx.runner.run(&cmd) {
        Ok(()) => report.push(StepKind::PostInstall, StepOutcome::Done(display)),
        Err(e) => report.push(
            StepKind::PostInstall,
            StepOutcome::Failed(format!("{display}: {e}")),
        ),
    }
}

fn write_files(
    recipe: &Recipe,
    vars: &HashMap<String, String>,
    ctx: &Context<'_>,
    report: &mut Report,
) {
    for file in &recipe.files {
        let path = ctx.dir.join(&file.path);
        let shown = file.path.display();

        if ctx.dry_run {
            report.push(
                StepKind::WriteConfig,
                StepOutcome::Skipped(format!("dry run: would write {shown}")),
            );
            continue;
        }

        let contents = substitute(&file.contents, vars);
        match write_config(&path, &contents) {
            Ok(()) => report.push(StepKind::WriteConfig, StepOutcome::Done(format!("wrote {shown}"))),
            Err(e) => report.push(StepKind::WriteConfig, StepOutcome::Failed(e.to_string())),
        }
    }
}

fn patch_manifest(
    recipe: &Recipe,
    vars: &HashMap<String, String>,
    ctx: &Context<'_>,
    report: &mut Report,
) {
    if recipe.scripts.is_empty() {
        return;
    }

    let expanded: Vec<(String, String)> = recipe
        .scripts
        .iter()
        .map(|s| (s.name.clone(), substitute(&s.command, vars)))
        .collect();
    let names: Vec<&str> = expanded.iter().map(|(n, _)| n.as_str()).collect();

    if ctx.dry_run {
        report.push(
            StepKind::PatchManifest,
            StepOutcome::Skipped(format!("dry run: would set {}", names.join(", "))),
        );
        return;
    }

    let entries: Vec<(&str, &str)> = expanded
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    match set_scripts(&ctx.dir.join(MANIFEST_FILE), &entries) {
        Ok(changes) => {
            let summary: Vec<String> = changes.iter().map(describe_change).collect();
            report.push(StepKind::PatchManifest, StepOutcome::Done(summary.join(", ")));
        }
        Err(e) => report.push(StepKind::PatchManifest, StepOutcome::Failed(e.to_string())),
    }
}

fn describe_change((name, change): &(String, ScriptChange)) -> String {
    match change {
        ScriptChange::Added => format!("added '{name}' script"),
        ScriptChange::Replaced { previous } => format!("replaced '{name}' script (was '{previous}')"),
        ScriptChange::Unchanged => format!("'{name}' script already set"),
    }
}

fn append_hooks(
    recipe: &Recipe,
    vars: &HashMap<String, String>,
    ctx: &Context<'_>,
    report: &mut Report,
) {
    for hook in &recipe.hooks {
        let path = ctx.dir.join(&hook.path);
        let shown = hook.path.display();
        let command = substitute(&hook.command, vars);

        if ctx.dry_run {
            report.push(
                StepKind::AppendHook,
                StepOutcome::Skipped(format!("dry run: would append '{command}' to {shown}")),
            );
            continue;
        }

        let outcome = match append_hook(&path, &command) {
            Ok(HookOutcome::Appended) => StepOutcome::Done(format!("appended '{command}' to {shown}")),
            Ok(HookOutcome::AlreadyPresent) => {
                StepOutcome::Skipped(format!("{shown} already runs '{command}'"))
            }
            Ok(HookOutcome::Missing) => {
                StepOutcome::Skipped(format!("{shown} not found, skipping Husky integration"))
            }
            Err(e) => StepOutcome::Failed(e.to_string()),
        };
        report.push(StepKind::AppendHook, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunError;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::fs;

    struct FakeProbe(HashSet<&'static str>);

    impl Probe for FakeProbe {
        fn has(&self, binary: &str) -> bool {
            self.0.contains(binary)
        }
    }

    fn probe(binaries: &[&'static str]) -> FakeProbe {
        FakeProbe(binaries.iter().copied().collect())
    }

    #[derive(Default)]
    struct RecordingRunner {
        calls: RefCell<Vec<Vec<String>>>,
        fail: bool,
    }

    impl Runner for RecordingRunner {
        fn run(&self, argv: &[String]) -> Result<(), RunError> {
            self.calls.borrow_mut().push(argv.to_vec());
            if self.fail {
                Err(RunError::Exit {
                    program: argv[0].clone(),
                    code: Some(1),
                })
            } else {
                Ok(())
            }
        }
    }

    fn commitlint_like() -> Recipe {
        Recipe {
            tool: "commitlint".into(),
            title: "commitlint".into(),
            installs: vec![Install {
                packages: vec!["@commitlint/cli".into()],
                exact: false,
            }],
            post_install: None,
            files: vec![FileTemplate {
                path: "commitlint.config.cjs".into(),
                contents: "module.exports = {}\n".into(),
            }],
            scripts: vec![ScriptEntry {
                name: "commitlint".into(),
                command: "commitlint -e".into(),
            }],
            hooks: vec![HookEntry {
                path: ".husky/commit-msg".into(),
                command: "{{run}} commitlint".into(),
            }],
        }
    }

    #[test]
    fn substitute_vars() {
        let vars = manager_variables(PackageManager::Pnpm);
        assert_eq!(
            substitute("'{{run}} lint' via {{manager}} / {{exec}}", &vars),
            "'pnpm run lint' via pnpm / pnpm exec"
        );
    }

    #[test]
    fn applies_every_step() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"scripts":{"build":"tsc"}}"#).unwrap();
        fs::create_dir(dir.path().join(".husky")).unwrap();
        fs::write(dir.path().join(".husky/commit-msg"), "#!/bin/sh").unwrap();

        let probe = probe(&["npm", "bun"]);
        let runner = RecordingRunner::default();
        let ctx = Context::new(dir.path(), &probe, &runner);
        let report = apply(&commitlint_like(), &ctx);

        assert!(report.is_success(), "{report:?}");
        assert_eq!(
            runner.calls.borrow().as_slice(),
            &[vec!["npm", "install", "--save-dev", "@commitlint/cli"]]
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("commitlint.config.cjs")).unwrap(),
            "module.exports = {}\n"
        );
        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("package.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["scripts"]["build"], "tsc");
        assert_eq!(manifest["scripts"]["commitlint"], "commitlint -e");
        assert_eq!(
            fs::read_to_string(dir.path().join(".husky/commit-msg")).unwrap(),
            "#!/bin/sh\nnpm run commitlint\n"
        );
    }

    #[test]
    fn install_failure_does_not_block_config() {
        let dir = tempfile::tempdir().unwrap();
        let probe = probe(&["pnpm"]);
        let runner = RecordingRunner {
            fail: true,
            ..Default::default()
        };
        let ctx = Context::new(dir.path(), &probe, &runner);
        let report = apply(&commitlint_like(), &ctx);

        assert!(!report.is_success());
        let failed: Vec<StepKind> = report.failures().map(|s| s.kind).collect();
        // Install failed and package.json is missing; hook is only skipped
        assert_eq!(failed, vec![StepKind::Install, StepKind::PatchManifest]);
        assert!(dir.path().join("commitlint.config.cjs").exists());
        assert!(matches!(
            report.of_kind(StepKind::AppendHook).next().unwrap().outcome,
            StepOutcome::Skipped(_)
        ));
    }

    #[test]
    fn no_manager_stops_early() {
        let dir = tempfile::tempdir().unwrap();
        let probe = probe(&[]);
        let runner = RecordingRunner::default();
        let ctx = Context::new(dir.path(), &probe, &runner);
        let report = apply(&commitlint_like(), &ctx);

        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].kind, StepKind::ResolveManager);
        assert!(report.steps[0].outcome.is_failed());
        assert!(runner.calls.borrow().is_empty());
        assert!(!dir.path().join("commitlint.config.cjs").exists());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = r#"{"name":"demo"}"#;
        fs::write(dir.path().join("package.json"), manifest).unwrap();

        let probe = probe(&["yarn"]);
        let runner = RecordingRunner::default();
        let ctx = Context::new(dir.path(), &probe, &runner).with_dry_run(true);
        let report = apply(&commitlint_like(), &ctx);

        assert!(report.is_success());
        assert!(runner.calls.borrow().is_empty());
        assert!(!dir.path().join("commitlint.config.cjs").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("package.json")).unwrap(),
            manifest
        );
        assert!(report.of_kind(StepKind::Install).all(|s| matches!(
            &s.outcome,
            StepOutcome::Skipped(m) if m.contains("yarn add --dev @commitlint/cli")
        )));
    }

    #[test]
    fn post_install_runs_through_exec_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let recipe = Recipe {
            tool: "husky".into(),
            title: "Husky".into(),
            installs: vec![Install {
                packages: vec!["husky".into()],
                exact: false,
            }],
            post_install: Some(vec!["husky".into(), "init".into()]),
            ..Default::default()
        };

        let bun_only = probe(&["bun"]);
        let runner = RecordingRunner::default();
        let report = apply(&recipe, &Context::new(dir.path(), &bun_only, &runner));
        assert!(report.is_success());
        assert_eq!(
            runner.calls.borrow().last().unwrap(),
            &vec!["bunx".to_string(), "husky".to_string(), "init".to_string()]
        );

        let yarn_only = probe(&["yarn"]);
        let runner = RecordingRunner::default();
        let report = apply(&recipe, &Context::new(dir.path(), &yarn_only, &runner));
        assert_eq!(runner.calls.borrow().len(), 1);
        assert!(matches!(
            report.of_kind(StepKind::PostInstall).next().unwrap().outcome,
            StepOutcome::Skipped(_)
        ));
    }

    #[test]
    fn preferred_manager_from_resolver() {
        let dir = tempfile::tempdir().unwrap();
        let probe = probe(&["pnpm", "npm", "yarn", "bun"]);
        let runner = RecordingRunner::default();
        let ctx = Context::new(dir.path(), &probe, &runner)
            .with_resolver(Resolver::new().prefer(PackageManager::Yarn));
        apply(&commitlint_like(), &ctx);
        assert_eq!(runner.calls.borrow()[0][0], "yarn");
    }
}
