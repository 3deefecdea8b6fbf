//! Setup core: package-manager resolution and project file edits.
//!
//! Setup installs JavaScript/TypeScript tooling into a project. Each tool is
//! described by a [`Recipe`] that [`apply`] turns into install commands,
//! config files, `package.json` scripts and Husky hook lines.

mod config;
mod hook;
mod manifest;
mod outcome;
mod pm;
mod recipe;
mod runner;
mod write;

pub mod docs;
pub mod gitignore;
pub mod shebang;

pub use config::{GitignoreConfig, PackageManagerConfig, TemplatesConfig, UserConfig};
pub use hook::{HUSKY_DIR, HookError, HookOutcome, append_hook};
pub use manifest::{
    MANIFEST_FILE, ManifestError, PackageManifest, ScriptChange, set_script, set_scripts,
};
pub use outcome::{Report, Step, StepKind, StepOutcome};
pub use pm::{
    MANAGERS, PackageManager, PackageManagerSpec, PathProbe, Probe, ResolveError, Resolver,
    parse_order,
};
pub use recipe::{
    Context, FileTemplate, HookEntry, Install, Recipe, ScriptEntry, apply, manager_variables,
    substitute,
};
pub use runner::{RunError, Runner, SystemRunner};
pub use write::{WriteError, write_config};
