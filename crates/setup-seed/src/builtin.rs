//! Built-in recipes and their config templates.

use crate::Tool;
use setup_core::{FileTemplate, HUSKY_DIR, HookEntry, Install, Recipe, ScriptEntry};

/// Get the built-in recipe for a tool.
pub fn builtin(tool: Tool) -> Recipe {
    match tool {
        Tool::Eslint => Recipe {
            installs: vec![install(ESLINT_PACKAGES, false)],
            files: files(&[("eslint.config.mjs", ESLINT_CONFIG)]),
            scripts: scripts(&[LINT_SCRIPT]),
            ..recipe(tool, "ESLint")
        },
        Tool::Prettier => Recipe {
            installs: vec![install(&["prettier"], true)],
            files: files(&[(".prettierrc", PRETTIER_CONFIG), (".prettierignore", PRETTIER_IGNORE)]),
            scripts: scripts(&[PRETTIER_SCRIPT]),
            ..recipe(tool, "Prettier")
        },
        Tool::Linter => Recipe {
            installs: vec![
                install(ESLINT_PACKAGES, false),
                install(
                    &["prettier", "eslint-config-prettier", "eslint-plugin-prettier"],
                    true,
                ),
            ],
            files: files(&[
                ("eslint.config.mjs", LINTER_ESLINT_CONFIG),
                (".prettierrc", PRETTIER_CONFIG),
                (".prettierignore", PRETTIER_IGNORE),
            ]),
            scripts: scripts(&[LINT_SCRIPT, PRETTIER_SCRIPT]),
            ..recipe(tool, "ESLint with Prettier")
        },
        Tool::Vitest => Recipe {
            installs: vec![install(&["vitest"], false)],
            files: files(&[
                ("vitest.config.ts", VITEST_CONFIG),
                ("vitest.setup.ts", VITEST_SETUP),
            ]),
            scripts: scripts(&[("test", "vitest .")]),
            ..recipe(tool, "Vitest")
        },
        Tool::Husky => Recipe {
            installs: vec![install(&["husky"], false)],
            post_install: Some(vec!["husky".to_string(), "init".to_string()]),
            ..recipe(tool, "Husky")
        },
        Tool::Commitlint => Recipe {
            installs: vec![install(
                &["@commitlint/cli", "@commitlint/config-conventional"],
                false,
            )],
            files: files(&[("commitlint.config.cjs", COMMITLINT_CONFIG)]),
            scripts: scripts(&[(
                "commitlint",
                "commitlint --config commitlint.config.cjs -e -V",
            )]),
            hooks: vec![hook("commit-msg", "{{run}} commitlint")],
            ..recipe(tool, "commitlint")
        },
        Tool::LintStaged => Recipe {
            installs: vec![install(&["lint-staged"], false)],
            files: files(&[("lint-staged.config.js", LINT_STAGED_CONFIG)]),
            scripts: scripts(&[("pre-commit", "lint-staged")]),
            hooks: vec![hook("pre-commit", "{{run}} pre-commit")],
            ..recipe(tool, "lint-staged")
        },
        Tool::ReleaseIt => Recipe {
            installs: vec![install(
                &["release-it", "@release-it/conventional-changelog"],
                false,
            )],
            files: files(&[(".release-it.json", RELEASE_IT_CONFIG)]),
            scripts: scripts(&[("release", "release-it")]),
            ..recipe(tool, "release-it")
        },
    }
}

fn recipe(tool: Tool, title: &str) -> Recipe {
    Recipe {
        tool: tool.id().to_string(),
        title: title.to_string(),
        ..Default::default()
    }
}

fn install(packages: &[&str], exact: bool) -> Install {
    Install {
        packages: packages.iter().map(|p| p.to_string()).collect(),
        exact,
    }
}

fn files(entries: &[(&str, &str)]) -> Vec<FileTemplate> {
    entries
        .iter()
        .map(|(path, contents)| FileTemplate {
            path: path.into(),
            contents: contents.to_string(),
        })
        .collect()
}

fn scripts(entries: &[(&str, &str)]) -> Vec<ScriptEntry> {
    entries
        .iter()
        .map(|(name, command)| ScriptEntry {
            name: name.to_string(),
            command: command.to_string(),
        })
        .collect()
}

fn hook(name: &str, command: &str) -> HookEntry {
    HookEntry {
        path: [HUSKY_DIR, name].iter().collect(),
        command: command.to_string(),
    }
}

const ESLINT_PACKAGES: &[&str] = &["eslint", "globals", "@eslint/js", "typescript-eslint"];
const LINT_SCRIPT: (&str, &str) = ("lint", "eslint . --fix");
const PRETTIER_SCRIPT: (&str, &str) = ("prettier", "prettier . --write");

const ESLINT_CONFIG: &str = r#"import pluginJs from "@eslint/js";
import globals from "globals";
import tseslint from "typescript-eslint";

export default [
  {
    files: ["**/*.{js,mjs,cjs,ts}"], rules: {
      'no-unused-vars': 'error',
      'no-undef': 'error',
      '@typescript-eslint/no-unused-vars': [
        'error',
        {
          args: 'all',
          argsIgnorePattern: '^_',
          caughtErrors: 'all',
          caughtErrorsIgnorePattern: '^_',
          destructuredArrayIgnorePattern: '^_',
          varsIgnorePattern: '^_',
          ignoreRestSiblings: true,
        },
      ]
    },
  },
  { languageOptions: { globals: globals.node } },
  pluginJs.configs.recommended,
  ...tseslint.configs.recommended,
];
"#;

const LINTER_ESLINT_CONFIG: &str = r#"import globals from 'globals'
import pluginJs from '@eslint/js'
import tseslint from 'typescript-eslint'
import prettierConfig from 'eslint-config-prettier'
import prettierPlugin from 'eslint-plugin-prettier'

export default [
    {
        files: ['**/*.{js,mjs,cjs,ts}'],
        languageOptions: {
            globals: {
                ...globals.browser,
            },
        },
        plugins: {
            prettier: prettierPlugin,
        },
        rules: {
            'no-unused-vars': 'warn',
            'no-undef': 'warn',
            '@typescript-eslint/no-unused-vars': [
                'error',
                {
                    args: 'all',
                    argsIgnorePattern: '^_',
                    caughtErrors: 'all',
                    caughtErrorsIgnorePattern: '^_',
                    destructuredArrayIgnorePattern: '^_',
                    varsIgnorePattern: '^_',
                    ignoreRestSiblings: true,
                },
            ],
            'prettier/prettier': [
                'error',
                {
                    singleQuote: true,
                    semi: false,
                    tabWidth: 4,
                },
            ],
        },
    },
    pluginJs.configs.recommended,
    ...tseslint.configs.recommended,
    prettierConfig,
]
"#;

const PRETTIER_CONFIG: &str = r#"{
    "singleQuote": true,
    "semi": false,
    "tabWidth": 4,
    "plugins": []
}
"#;

const PRETTIER_IGNORE: &str = "# Ignore artifacts:
build
coverage
.next
node_modules
";

const VITEST_CONFIG: &str = r#"import path from 'path'
import { defineConfig } from 'vitest/config'

export default defineConfig({
    resolve: {
        alias: {
            '@': path.join(__dirname, 'src'),
        },
    },
    test: {
        environment: 'node',
        setupFiles: ['./vitest.setup.ts'],
    },
})
"#;

const VITEST_SETUP: &str = "import { afterEach } from 'vitest'

afterEach(() => {})
";

const COMMITLINT_CONFIG: &str = r#"module.exports = {
  extends: ['@commitlint/config-conventional'],
  rules: {
    'type-enum': [
      2,
      'always',
      [
        'build', // build system, releases, dependencies
        'feat', // new feature
        'fix', // bug fix
        'docs', // documentation
        'style', // formatting, not CSS
        'refactor', // restructuring without behaviour change
        'perf', // performance and UX improvements
        'test', // tests
        'revert', // revert a commit
        'ci', // continuous integration
        'config', // configuration
        'chore', // anything else
      ],
    ],
    'type-empty': [2, 'never'],
    'type-case': [0, 'always', 'lower-case'],
    'scope-empty': [0],
    'scope-case': [0],
    'subject-empty': [2, 'never'],
    'subject-case': [0],
    'subject-full-stop': [0, 'never', '.'],
    'header-max-length': [2, 'always', 72],
    'body-leading-blank': [0],
    'footer-leading-blank': [0, 'always'],
  },
};
"#;

const LINT_STAGED_CONFIG: &str = r#"/** @type {import('lint-staged').Configuration} */
export default {
  'src/**/*.{js,jsx,ts,tsx,json}': [
    '{{run}} lint',
    '{{run}} prettier'
  ]
}
"#;

const RELEASE_IT_CONFIG: &str = r#"{
  "plugins": {
    "@release-it/conventional-changelog": {
      "preset": {
        "name": "conventionalcommits",
        "types": [
          { "type": "feat", "section": "✨ Features" },
          { "type": "fix", "section": "🐛 Bug Fixes" },
          { "type": "chore", "section": "🎫 Chores" },
          { "type": "docs", "section": "📝 Documentation" },
          { "type": "style", "section": "💄 Styles" },
          { "type": "refactor", "section": "♻ Code Refactoring" },
          { "type": "perf", "section": "⚡ Performance Improvements" },
          { "type": "test", "section": "✅ Tests" },
          { "type": "revert", "section": "⏪ Reverts" },
          { "type": "build", "section": "👷 Build System" },
          { "type": "ci", "section": "🔧 Continuous Integration" },
          { "type": "config", "section": "🔨 Config" }
        ]
      },
      "infile": "CHANGELOG.md",
      "ignoreRecommendedBump": true,
      "strictSemVer": true
    }
  },
  "git": {
    "commitMessage": "chore: Release v${version}"
  },
  "github": {
    "release": true,
    "draft": false
  }
}
"#;

/// A standalone helper script scaffolded by `py`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Helper {
    /// Name shown in the picker.
    pub name: &'static str,
    pub file: &'static str,
    pub contents: &'static str,
    /// Upstream documentation of the wrapped tool.
    pub docs: &'static str,
}

/// Python helpers offered by `py`.
pub static PY_HELPERS: &[Helper] = &[Helper {
    name: "AutoType",
    file: "auto_type.py",
    contents: AUTO_TYPE_PY,
    docs: "https://github.com/JelleZijlstra/autotyping",
}];

const AUTO_TYPE_PY: &str = r#"import argparse
import subprocess


def run_autotyping(filename):
    """Run autotyping on `filename` and return its output."""
    command = [
        "python", "-m", "autotyping",
        filename,
        "--none-return",
        "--scalar-return",
        "--bool-param",
        "--int-param",
        "--float-param",
        "--str-param",
        "--bytes-param",
        "--annotate-optional",
        "foo:bar.Baz",
        "--annotate-named-param",
        "foo:bar.Baz",
        "--guess-common-names",
        "--annotate-magics",
        "--annotate-imprecise-magics",
    ]

    try:
        result = subprocess.run(command, capture_output=True, text=True, check=True)
        return result.stdout
    except subprocess.CalledProcessError as e:
        print(f"Error running autotyping command: {e}")
        return e.stderr


if __name__ == "__main__":
    parser = argparse.ArgumentParser(description="Run autotyping on a Python file")
    parser.add_argument("filename", help="Path to the Python file to analyze")
    args = parser.parse_args()
    print(run_autotyping(args.filename))
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn script<'a>(recipe: &'a Recipe, name: &str) -> Option<&'a str> {
        recipe
            .scripts
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.command.as_str())
    }

    #[test]
    fn every_tool_has_a_recipe() {
        for tool in Tool::ALL {
            let recipe = builtin(tool);
            assert_eq!(recipe.tool, tool.id());
            assert!(!recipe.installs.is_empty(), "{tool} installs nothing");
        }
    }

    #[test]
    fn eslint_recipe() {
        let recipe = builtin(Tool::Eslint);
        assert_eq!(
            recipe.installs,
            vec![install(&["eslint", "globals", "@eslint/js", "typescript-eslint"], false)]
        );
        assert_eq!(recipe.files[0].path, Path::new("eslint.config.mjs"));
        assert_eq!(script(&recipe, "lint"), Some("eslint . --fix"));
        assert!(recipe.hooks.is_empty());
    }

    #[test]
    fn prettier_is_pinned() {
        let recipe = builtin(Tool::Prettier);
        assert!(recipe.installs[0].exact);
        assert_eq!(script(&recipe, "prettier"), Some("prettier . --write"));
        let names: Vec<&Path> = recipe.files.iter().map(|f| f.path.as_path()).collect();
        assert_eq!(names, [Path::new(".prettierrc"), Path::new(".prettierignore")]);
    }

    #[test]
    fn linter_installs_in_two_groups() {
        let recipe = builtin(Tool::Linter);
        assert_eq!(recipe.installs.len(), 2);
        assert!(!recipe.installs[0].exact);
        assert!(recipe.installs[1].exact);
        assert!(recipe.files[0].contents.contains("eslint-plugin-prettier"));
        assert!(script(&recipe, "lint").is_some());
        assert!(script(&recipe, "prettier").is_some());
    }

    #[test]
    fn husky_runs_init() {
        let recipe = builtin(Tool::Husky);
        assert_eq!(recipe.post_install, Some(vec!["husky".into(), "init".into()]));
        assert!(recipe.files.is_empty());
    }

    #[test]
    fn hook_recipes() {
        let commitlint = builtin(Tool::Commitlint);
        assert_eq!(commitlint.hooks[0].path, PathBuf::from(".husky").join("commit-msg"));
        assert_eq!(commitlint.hooks[0].command, "{{run}} commitlint");

        let lint_staged = builtin(Tool::LintStaged);
        assert_eq!(lint_staged.hooks[0].path, PathBuf::from(".husky").join("pre-commit"));
        assert_eq!(script(&lint_staged, "pre-commit"), Some("lint-staged"));
        assert!(lint_staged.files[0].contents.contains("'{{run}} prettier'"));
    }

    #[test]
    fn json_templates_parse() {
        // Guard against typos in the embedded JSON
        for contents in [PRETTIER_CONFIG, RELEASE_IT_CONFIG] {
            let value: Result<serde_json::Value, _> = serde_json::from_str(contents);
            assert!(value.is_ok(), "{contents}");
        }
    }
}
