use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
};

use anyhow::{bail, Context as _};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::result::JudgeCode;
use crate::problem::TestPlan;

/// Cap on captured stdout+stderr of one run.
pub const MAX_OUTPUT_SIZE: u64 = 134_217_728;
pub const BYTES_PER_MB: u64 = 1_048_576;

/// One invocation of the resource-limited execution engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxRequest {
    pub exe_path: PathBuf,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub error_path: PathBuf,
    pub max_output_size: u64,
    pub max_real_time_ms: u64,
    pub max_memory_bytes: u64,
}

impl SandboxRequest {
    /// Request with stdout and stderr multiplexed into `output_path`.
    pub fn new(
        exe_path: impl Into<PathBuf>,
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        plan: &TestPlan,
    ) -> Self {
        let output_path = output_path.into();
        Self {
            exe_path: exe_path.into(),
            input_path: input_path.into(),
            error_path: output_path.clone(),
            output_path,
            max_output_size: MAX_OUTPUT_SIZE,
            max_real_time_ms: plan.time_limit_ms,
            max_memory_bytes: plan.space_limit_bytes(),
        }
    }

    pub fn to_args(&self) -> Vec<OsString> {
        fn path_arg(name: &str, path: &Path) -> OsString {
            let mut arg = OsString::from(format!("--{}=", name));
            arg.push(path);
            arg
        }
        vec![
            path_arg("exe_path", &self.exe_path),
            path_arg("input_path", &self.input_path),
            path_arg("output_path", &self.output_path),
            path_arg("error_path", &self.error_path),
            format!("--max_output_size={}", self.max_output_size).into(),
            format!("--max_real_time={}", self.max_real_time_ms).into(),
            format!("--max_memory={}", self.max_memory_bytes).into(),
        ]
    }
}

/// Outcome reported by the execution engine for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub judge: JudgeCode,
    pub used_time_ms: u64,
    pub used_space_bytes: u64,
    /// The whole response document, kept for diagnostics.
    pub payload: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ResponseFields {
    result: i32,
    real_time: u64,
    memory: u64,
}

impl ExecutionResult {
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let payload: serde_json::Value =
            serde_json::from_str(s).context("Sandbox response is not JSON")?;
        let fields = ResponseFields::deserialize(&payload)
            .with_context(|| format!("Malformed sandbox response: {}", payload))?;
        let judge = JudgeCode::try_from(fields.result)
            .with_context(|| format!("Malformed sandbox response: {}", payload))?;
        Ok(Self {
            judge,
            used_time_ms: fields.real_time,
            used_space_bytes: fields.memory,
            payload,
        })
    }
}

#[async_trait]
pub trait Sandbox: Send + Sync {
    async fn run(&self, req: &SandboxRequest) -> anyhow::Result<ExecutionResult>;
}

/// Runs the `libjudger` binary with an argument vector and parses its JSON report.
#[derive(Debug, Clone)]
pub struct LibJudger {
    program: PathBuf,
    sudo: bool,
}

impl LibJudger {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            sudo: false,
        }
    }

    /// Prefix the invocation with `sudo` (the engine needs root to set limits).
    pub fn sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    pub fn get_program(&self) -> &Path {
        &self.program
    }

    fn command(&self, req: &SandboxRequest) -> Command {
        let mut cmd = if self.sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg(&self.program);
            cmd
        } else {
            Command::new(&self.program)
        };
        cmd.args(req.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[async_trait]
impl Sandbox for LibJudger {
    async fn run(&self, req: &SandboxRequest) -> anyhow::Result<ExecutionResult> {
        let output = self
            .command(req)
            .output()
            .await
            .with_context(|| format!("Failed to spawn '{}'", self.program.display()))?;

        if !output.status.success() {
            bail!(
                "'{}' exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        ExecutionResult::from_json(String::from_utf8_lossy(&output.stdout).trim())
    }
}
