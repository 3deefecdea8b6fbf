//! Built-in tool recipes and config templates.

mod builtin;
mod resolve;
mod tool;

use std::path::PathBuf;

pub use builtin::{Helper, PY_HELPERS, builtin};
pub use resolve::TemplateResolver;
pub use tool::{ES_TOOLS, NODE_TOOLS, Tool, select};

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse tool names, failing on the first unknown one.
pub fn parse_tools<S: AsRef<str>>(names: &[S]) -> Result<Vec<Tool>, TemplateError> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            Tool::from_id(name).ok_or_else(|| TemplateError::UnknownTool(name.to_string()))
        })
        .collect()
}
