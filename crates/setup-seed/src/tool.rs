//! Tool identifiers and selection rules.

use std::fmt;

/// A tool setup can configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    Eslint,
    Prettier,
    /// ESLint and Prettier configured to work together.
    Linter,
    Vitest,
    Husky,
    Commitlint,
    LintStaged,
    ReleaseIt,
}

/// Tools offered by `node`, in run order.
pub const NODE_TOOLS: &[Tool] = &[
    Tool::Eslint,
    Tool::Prettier,
    Tool::Vitest,
    Tool::Husky,
    Tool::Commitlint,
    Tool::LintStaged,
    Tool::ReleaseIt,
];

/// Tools offered by `es`, in run order.
pub const ES_TOOLS: &[Tool] = &[Tool::Eslint, Tool::Prettier, Tool::Vitest, Tool::Husky];

impl Tool {
    pub const ALL: [Tool; 8] = [
        Tool::Eslint,
        Tool::Prettier,
        Tool::Linter,
        Tool::Vitest,
        Tool::Husky,
        Tool::Commitlint,
        Tool::LintStaged,
        Tool::ReleaseIt,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Tool::Eslint => "eslint",
            Tool::Prettier => "prettier",
            Tool::Linter => "linter",
            Tool::Vitest => "vitest",
            Tool::Husky => "husky",
            Tool::Commitlint => "commitlint",
            Tool::LintStaged => "lint-staged",
            Tool::ReleaseIt => "release-it",
        }
    }

    /// Parse a tool name, ignoring case and separators (`lintStaged`,
    /// `lint_staged` and `lint-staged` are the same tool).
    pub fn from_id(id: &str) -> Option<Self> {
        let wanted = normalize(id);
        Self::ALL.into_iter().find(|t| normalize(t.id()) == wanted)
    }

    /// Heading used in progress banners.
    pub fn title(&self) -> &'static str {
        match self {
            Tool::Eslint => "Eslint",
            Tool::Prettier => "Prettier",
            Tool::Linter => "Eslint with Prettier",
            Tool::Vitest => "Vitest",
            Tool::Husky => "Husky",
            Tool::Commitlint => "Commitlint",
            Tool::LintStaged => "Lint-Staged",
            Tool::ReleaseIt => "Release-It",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

fn normalize(id: &str) -> String {
    id.chars()
        .filter(|c| !matches!(c, '-' | '_'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Turn a user's choice into the recipes to run, in run order.
///
/// Choosing exactly ESLint and Prettier selects the combined linter setup
/// instead of the two separate ones. Duplicates are dropped.
pub fn select(chosen: &[Tool]) -> Vec<Tool> {
    let mut tools: Vec<Tool> = Vec::new();
    for tool in chosen {
        if !tools.contains(tool) {
            tools.push(*tool);
        }
    }

    if tools.len() == 2 && tools.contains(&Tool::Eslint) && tools.contains(&Tool::Prettier) {
        return vec![Tool::Linter];
    }

    // Declaration order is run order
    tools.sort();
    tools
}
