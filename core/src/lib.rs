pub mod action;
pub mod problem;
pub mod style;
pub mod testing;

pub use crate::problem::{PlanNormalizer, TestPlan};

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

static CURRENT_DIR: Lazy<Option<PathBuf>> = Lazy::new(|| fsutil::current_dir().ok());

/// Path relative to the process working dir, for log labels only.
pub fn short_path(path: &Path) -> &Path {
    match CURRENT_DIR.as_deref() {
        Some(cwd) => fsutil::shorten_path(path, cwd),
        None => path,
    }
}
