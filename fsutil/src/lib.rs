use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("Cannot get current dir: {0}")]
        CurrentDir(#[source] io::Error),

        #[error("Invalid glob pattern '{0}': {1}")]
        InvalidGlob(String, #[source] ::glob::PatternError),

        #[error("Cannot access entry while globbing '{0}': {1}")]
        GlobEntry(String, #[source] ::glob::GlobError),

        #[error("No entry matched glob '{0}'")]
        NoEntryMatchedGlob(String),

        #[error("Cannot serialize to JSON (dest='{0}'): {1}")]
        SerializeToJson(PathBuf, #[source] serde_json::Error),
    }
}
pub use error::{Error, Result};

#[must_use]
pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

#[must_use]
pub fn write<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    fs::write(&filepath, contents)
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn write_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    if let Some(dir) = filepath.as_ref().parent() {
        if !dir.as_os_str().is_empty() {
            self::mkdir_all(dir)?;
        }
    }
    self::write(filepath, contents)
}

#[must_use]
pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

/// Read a file as text, replacing invalid UTF-8 sequences with U+FFFD.
#[must_use]
pub fn read_to_string_lossy(filepath: impl AsRef<Path>) -> Result<String> {
    let bytes = fs::read(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[must_use]
pub fn write_json_pretty_with_mkdir<P, T>(filepath: P, data: &T) -> Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let s = serde_json::to_string_pretty(data)
        .map_err(|e| Error::SerializeToJson(filepath.as_ref().to_owned(), e))?;
    write_with_mkdir(filepath, &s)
}

pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(Error::CurrentDir)
}

/// Normalize the path lexically (without touching the file system).
/// ```
/// use fsutil::normalize_path;
/// use std::path::Path;
///
/// assert_eq!(normalize_path("./hoge/.config/././foo"), Path::new("hoge/.config/foo"));
/// assert_eq!(normalize_path("hoge/.config/../../bar/."), Path::new("bar"));
/// assert_eq!(normalize_path("../foo/../hello"), Path::new("../hello"));
/// assert_eq!(normalize_path("/"), Path::new("/"));
/// assert_eq!(normalize_path("/foo/"), Path::new("/foo"));
/// assert_eq!(normalize_path("."), Path::new("."));
/// ```
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    use ::std::path::Component;
    let components = path.as_ref().components();
    let mut stack = Vec::with_capacity(components.size_hint().1.unwrap_or(4));
    for c in components {
        match c {
            Component::CurDir => (),
            Component::ParentDir
                if matches!(stack.last(), Some(Component::Normal(_))) =>
            {
                stack.pop();
            }
            Component::ParentDir if matches!(stack.last(), Some(Component::RootDir)) => (),
            _ => {
                stack.push(c);
            }
        }
    }
    if stack.is_empty() {
        stack.push(Component::CurDir);
    }
    stack.iter().collect()
}

/// Make `path` absolute against `base` and normalize it. The file does not need to exist.
/// ```
/// use fsutil::absolute_path_from;
/// use std::path::Path;
///
/// assert_eq!(absolute_path_from("a/../b.in", "/work"), Path::new("/work/b.in"));
/// assert_eq!(absolute_path_from("/tmp/./x", "/work"), Path::new("/tmp/x"));
/// ```
pub fn absolute_path_from(path: impl AsRef<Path>, base: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(base.as_ref().join(path))
    }
}

/// Make `path` absolute against the current dir.
pub fn absolute_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    let cwd = self::current_dir()?;
    Ok(absolute_path_from(path, cwd))
}

/// Strip `base` from `path` for display. Returns `path` itself when it is not under `base`.
/// ```
/// use fsutil::shorten_path;
/// use std::path::Path;
///
/// assert_eq!(shorten_path(Path::new("/repo/p/a.yml"), "/repo"), Path::new("p/a.yml"));
/// assert_eq!(shorten_path(Path::new("/etc/a.yml"), "/repo"), Path::new("/etc/a.yml"));
/// assert_eq!(shorten_path(Path::new("p/a.yml"), "/repo"), Path::new("p/a.yml"));
/// ```
pub fn shorten_path<'p>(path: &'p Path, base: impl AsRef<Path>) -> &'p Path {
    path.strip_prefix(base).unwrap_or(path)
}

/// Expand a glob pattern into the matched files, sorted by path.
pub fn glob_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = ::glob::glob(pattern).map_err(|e| Error::InvalidGlob(pattern.to_owned(), e))?;
    let mut res = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| Error::GlobEntry(pattern.to_owned(), e))?;
        if path.is_file() {
            res.push(path);
        }
    }
    if res.is_empty() {
        return Err(Error::NoEntryMatchedGlob(pattern.to_owned()));
    }
    res.sort();
    Ok(res)
}
