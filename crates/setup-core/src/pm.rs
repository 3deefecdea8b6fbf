//! Package manager detection and command construction.

use std::ffi::OsString;
use std::path::PathBuf;

/// Supported JavaScript package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PackageManager {
    /// pnpm
    Pnpm,
    /// npm
    Npm,
    /// Yarn
    Yarn,
    /// Bun
    Bun,
}

/// Static command templates for one package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageManagerSpec {
    pub manager: PackageManager,
    /// Executable looked up on the search path.
    pub binary: &'static str,
    /// Argv prefix for adding dev dependencies.
    pub install_args: &'static [&'static str],
    /// Flag that pins exact versions.
    pub exact_flag: &'static str,
    /// Prefix for running a `package.json` script.
    pub run_prefix: &'static str,
    /// Prefix for running a binary from `node_modules/.bin`.
    pub exec_prefix: Option<&'static [&'static str]>,
}

/// All known managers, in default priority order.
pub const MANAGERS: [PackageManagerSpec; 4] = [
    PackageManagerSpec {
        manager: PackageManager::Pnpm,
        binary: "pnpm",
        install_args: &["pnpm", "add", "-D"],
        exact_flag: "--save-exact",
        run_prefix: "pnpm run",
        exec_prefix: Some(&["pnpm", "exec"]),
    },
    PackageManagerSpec {
        manager: PackageManager::Npm,
        binary: "npm",
        install_args: &["npm", "install", "--save-dev"],
        exact_flag: "--save-exact",
        run_prefix: "npm run",
        exec_prefix: Some(&["npx"]),
    },
    PackageManagerSpec {
        manager: PackageManager::Yarn,
        binary: "yarn",
        install_args: &["yarn", "add", "--dev"],
        exact_flag: "--exact",
        run_prefix: "yarn run",
        // `yarn husky init` and friends need per-version manual steps
        exec_prefix: None,
    },
    PackageManagerSpec {
        manager: PackageManager::Bun,
        binary: "bun",
        install_args: &["bun", "add", "--dev"],
        exact_flag: "--exact",
        run_prefix: "bun run",
        exec_prefix: Some(&["bunx"]),
    },
];

impl PackageManager {
    /// Get the string identifier for this manager.
    pub fn id(&self) -> &'static str {
        self.spec().binary
    }

    /// Parse from string identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        MANAGERS
            .iter()
            .find(|spec| spec.binary.eq_ignore_ascii_case(id))
            .map(|spec| spec.manager)
    }

    /// Get the command templates for this manager.
    pub fn spec(&self) -> &'static PackageManagerSpec {
        match self {
            PackageManager::Pnpm => &MANAGERS[0],
            PackageManager::Npm => &MANAGERS[1],
            PackageManager::Yarn => &MANAGERS[2],
            PackageManager::Bun => &MANAGERS[3],
        }
    }

    /// Get the command to add dev dependencies.
    pub fn dev_install_cmd(&self, packages: &[&str], exact: bool) -> Vec<String> {
        let spec = self.spec();
        let mut cmd: Vec<String> = spec.install_args.iter().map(|s| s.to_string()).collect();
        if exact {
            cmd.push(spec.exact_flag.to_string());
        }
        cmd.extend(packages.iter().map(|s| s.to_string()));
        cmd
    }

    /// Get the command to run a package binary, if this manager has one.
    pub fn exec_cmd(&self, args: &[&str]) -> Option<Vec<String>> {
        let prefix = self.spec().exec_prefix?;
        let mut cmd: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
        cmd.extend(args.iter().map(|s| s.to_string()));
        Some(cmd)
    }

    /// Prefix used to run a `package.json` script, e.g. `pnpm run`.
    pub fn run_prefix(&self) -> &'static str {
        self.spec().run_prefix
    }

    /// Prefix used to run a package binary, joined with spaces.
    pub fn exec_prefix_display(&self) -> Option<String> {
        self.spec().exec_prefix.map(|p| p.join(" "))
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Errors from package manager resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no supported package manager found (searched: {})", .searched.join(", "))]
    NoPackageManagerFound { searched: Vec<String> },
    #[error("unknown package manager: {0}")]
    UnknownManager(String),
}

/// Answers whether an executable is available.
pub trait Probe {
    fn has(&self, binary: &str) -> bool;
}

/// Probes the executable search path.
#[derive(Debug, Clone, Default)]
pub struct PathProbe {
    /// Search path to use instead of `$PATH`.
    paths: Option<OsString>,
}

impl PathProbe {
    /// Probe the process `$PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe an explicit search path (same syntax as `$PATH`).
    pub fn with_paths(paths: impl Into<OsString>) -> Self {
        Self {
            paths: Some(paths.into()),
        }
    }

    /// Locate a binary, returning its full path.
    pub fn locate(&self, binary: &str) -> Option<PathBuf> {
        let found = match &self.paths {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(binary, Some(paths), cwd)
            }
            None => which::which(binary),
        };
        found.ok()
    }
}

impl Probe for PathProbe {
    fn has(&self, binary: &str) -> bool {
        let found = self.locate(binary);
        log::debug!("probe {binary}: {:?}", found);
        found.is_some()
    }
}

/// Picks a package manager from an ordered preference list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    order: Vec<PackageManager>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            order: MANAGERS.iter().map(|spec| spec.manager).collect(),
        }
    }
}

impl Resolver {
    /// Create a resolver using the default priority order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the priority order. Managers left out are never picked.
    pub fn with_order(mut self, order: Vec<PackageManager>) -> Self {
        let mut seen = Vec::with_capacity(order.len());
        for pm in order {
            if !seen.contains(&pm) {
                seen.push(pm);
            }
        }
        self.order = seen;
        self
    }

    /// Move a manager to the front of the order.
    pub fn prefer(mut self, pm: PackageManager) -> Self {
        self.order.retain(|m| *m != pm);
        self.order.insert(0, pm);
        self
    }

    /// Current priority order.
    pub fn order(&self) -> &[PackageManager] {
        &self.order
    }

    /// Return the first manager in order whose binary is present.
    pub fn resolve(&self, probe: &dyn Probe) -> Result<PackageManager, ResolveError> {
        self.order
            .iter()
            .copied()
            .find(|pm| probe.has(pm.spec().binary))
            .ok_or_else(|| ResolveError::NoPackageManagerFound {
                searched: self.order.iter().map(|pm| pm.id().to_string()).collect(),
            })
    }

    /// Return every present manager, in order.
    pub fn detect_all(&self, probe: &dyn Probe) -> Vec<PackageManager> {
        self.order
            .iter()
            .copied()
            .filter(|pm| probe.has(pm.spec().binary))
            .collect()
    }
}

/// Parse a list of manager identifiers.
pub fn parse_order(ids: &[String]) -> Result<Vec<PackageManager>, ResolveError> {
    ids.iter()
        .map(|id| PackageManager::from_id(id).ok_or_else(|| ResolveError::UnknownManager(id.clone())))
        .collect()
}
