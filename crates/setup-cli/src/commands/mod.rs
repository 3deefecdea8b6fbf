pub mod doc;
pub mod ignore;
pub mod managers;
pub mod py;
pub mod select;
pub mod shell;
pub mod templates;
pub mod tool;

use setup_core::PackageManager;
use std::path::PathBuf;

/// Global flags shared by every command.
pub struct Options {
    /// Project directory.
    pub dir: PathBuf,
    /// Preferred package manager from `--pm`.
    pub pm: Option<PackageManager>,
    pub dry_run: bool,
}
