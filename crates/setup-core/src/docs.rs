//! Documentation links for supported tools.

use std::process::Command;

/// Tool name to documentation URL, sorted by name.
static DOC_LINKS: &[(&str, &str)] = &[
    ("bun", "https://bun.sh/docs"),
    ("commitlint", "https://commitlint.js.org/"),
    ("eslint", "https://eslint.org/docs/latest/"),
    ("husky", "https://typicode.github.io/husky/"),
    ("jest", "https://jestjs.io/docs/getting-started"),
    ("lint-staged", "https://github.com/lint-staged/lint-staged"),
    ("node", "https://nodejs.org/docs/latest/api/"),
    ("npm", "https://docs.npmjs.com/"),
    ("pnpm", "https://pnpm.io/motivation"),
    ("prettier", "https://prettier.io/docs/en/"),
    ("release-it", "https://github.com/release-it/release-it"),
    ("tslint", "https://palantir.github.io/tslint/"),
    ("typescript", "https://www.typescriptlang.org/docs/"),
    ("vite", "https://vite.dev/guide/"),
    ("vitest", "https://vitest.dev/guide/"),
    ("yarn", "https://yarnpkg.com/getting-started"),
];

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("don't know how to open a browser on this platform, visit {0}")]
    UnsupportedPlatform(String),
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// All `(tool, url)` pairs.
pub fn links() -> &'static [(&'static str, &'static str)] {
    DOC_LINKS
}

/// Look up a tool's documentation URL, ignoring case.
pub fn lookup(tool: &str) -> Option<&'static str> {
    DOC_LINKS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(tool))
        .map(|(_, url)| *url)
}

/// The platform's URL opener invocation.
pub fn open_command(url: &str) -> Result<Vec<String>, OpenError> {
    let argv: &[&str] = if cfg!(target_os = "linux") {
        &["xdg-open"]
    } else if cfg!(target_os = "macos") {
        &["open"]
    } else if cfg!(target_os = "windows") {
        &["rundll32", "url.dll,FileProtocolHandler"]
    } else {
        return Err(OpenError::UnsupportedPlatform(url.to_string()));
    };

    let mut cmd: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
    cmd.push(url.to_string());
    Ok(cmd)
}

/// Open `url` in the default browser without waiting for it.
pub fn open_url(url: &str) -> Result<(), OpenError> {
    let cmd = open_command(url)?;
    log::info!("opening: {}", cmd.join(" "));

    Command::new(&cmd[0])
        .args(&cmd[1..])
        .spawn()
        .map_err(|source| OpenError::Spawn {
            program: cmd[0].clone(),
            source,
        })?;
    Ok(())
}
