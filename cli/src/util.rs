use std::path::{Path, PathBuf};

pub fn replace_homedir_to_tilde(path: impl Into<PathBuf>) -> PathBuf {
    let path = path.into();
    let Some(home_dir) = ::dirs::home_dir() else {
        return path;
    };
    path.strip_prefix(home_dir)
        .map(|path| Path::new("~").join(path))
        .unwrap_or(path)
}

/// Explicit paths first, then every file matched by `pattern`. Duplicates are dropped.
pub fn collect_targets(paths: &[PathBuf], pattern: Option<&str>) -> fsutil::Result<Vec<PathBuf>> {
    let mut targets = paths.to_vec();
    if let Some(pattern) = pattern {
        targets.extend(fsutil::glob_files(pattern)?);
    }
    let mut seen = std::collections::HashSet::new();
    targets.retain(|p| seen.insert(fsutil::normalize_path(p)));
    Ok(targets)
}
