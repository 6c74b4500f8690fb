use std::{
    io,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Cannot resolve solution path: {0}")]
    ResolvePath(#[source] fsutil::Error),

    #[error("Solution file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Cannot allocate executable path: {0}")]
    TempFile(#[source] io::Error),

    #[error("Failed to spawn '{}': {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Compile error ({status}):\n{diagnostic}")]
    Failed { status: String, diagnostic: String },
}

#[async_trait]
pub trait Compiler: Send + Sync {
    /// Compile `source` into the executable `output`.
    async fn compile(
        &self,
        source: &Path,
        extra_args: &[String],
        output: &Path,
    ) -> Result<(), CompileError>;
}

/// `g++`-compatible compiler driver: `<program> <args..> <extra_args..> -o <output> <source>`.
#[derive(Debug, Clone)]
pub struct Gxx {
    program: PathBuf,
    args: Vec<String>,
}

impl Default for Gxx {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

impl Gxx {
    pub const DEFAULT_PROGRAM: &'static str = "g++";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments passed before every plan's own compile args.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn get_program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl Compiler for Gxx {
    async fn compile(
        &self,
        source: &Path,
        extra_args: &[String],
        output: &Path,
    ) -> Result<(), CompileError> {
        let out = Command::new(&self.program)
            .args(&self.args)
            .args(extra_args)
            .arg("-o")
            .arg(output)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CompileError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        let stdout = String::from_utf8_lossy(&out.stdout);
        if !stdout.trim().is_empty() {
            log::debug!("{}", stdout.trim_end());
        }

        if out.status.success() {
            return Ok(());
        }
        let status = match out.status.code() {
            Some(code) => format!("exitcode={}", code),
            None => "terminated by signal".to_owned(),
        };
        Err(CompileError::Failed {
            status,
            diagnostic: String::from_utf8_lossy(&out.stderr).trim_end().to_owned(),
        })
    }
}
