use std::path::{Path, PathBuf};

use anyhow::Context as _;

use super::{
    diff::{diff, Mismatch},
    result::{JudgeCode, TestReport},
    sandbox::{Sandbox, SandboxRequest},
    testcase::Testcase,
};
use crate::problem::TestPlan;

/// Runs one testcase through the sandbox and checks the produced output.
pub struct CaseRunner<'a> {
    sandbox: &'a dyn Sandbox,
    scratch_dir: PathBuf,
    base_dir: Option<PathBuf>,
}

impl<'a> CaseRunner<'a> {
    /// `scratch_dir` receives the captured output files (one per case, removed afterwards).
    pub fn new(sandbox: &'a dyn Sandbox, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            sandbox,
            scratch_dir: scratch_dir.into(),
            base_dir: None,
        }
    }

    /// Resolve relative testcase paths against `dir` instead of the current dir.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Never fails: any internal failure becomes a `SYSTEM_ERROR` report.
    pub async fn run_case(
        &self,
        executable: &Path,
        plan: &TestPlan,
        testcase: &Testcase,
    ) -> TestReport {
        self.try_run_case(executable, plan, testcase)
            .await
            .unwrap_or_else(|e| {
                TestReport::new(JudgeCode::SystemError).with_message(format!("{:#}", e))
            })
    }

    async fn try_run_case(
        &self,
        executable: &Path,
        plan: &TestPlan,
        testcase: &Testcase,
    ) -> anyhow::Result<TestReport> {
        let input = self.resolve(&testcase.input)?;
        let answer = self.resolve(&testcase.answer)?;
        let output = tempfile::Builder::new()
            .prefix("output-")
            .suffix(".txt")
            .tempfile_in(&self.scratch_dir)
            .with_context(|| {
                format!(
                    "Failed to allocate output file in {}",
                    self.scratch_dir.display()
                )
            })?
            .into_temp_path();

        let req = SandboxRequest::new(executable, input, &*output, plan);
        let exec = self
            .sandbox
            .run(&req)
            .await
            .context("Failed to run sandbox")?;

        let report = TestReport::leaf(exec.judge, exec.used_time_ms, exec.used_space_bytes);
        if exec.judge != JudgeCode::Accepted {
            return Ok(report.with_message(exec.payload.to_string()));
        }

        let report = match check_output(&output, &answer).await {
            Ok(Ok(())) => report,
            Ok(Err(mismatch)) => TestReport {
                result: JudgeCode::WrongAnswer,
                ..report
            }
            .with_message(mismatch.to_string()),
            Err(e) => TestReport {
                result: JudgeCode::SystemError,
                ..report
            }
            .with_message(format!("{:#}", e)),
        };
        Ok(report)
    }

    fn resolve(&self, path: &Path) -> fsutil::Result<PathBuf> {
        match &self.base_dir {
            Some(dir) => Ok(fsutil::absolute_path_from(path, dir)),
            None => fsutil::absolute_path(path),
        }
    }
}

async fn check_output(output: &Path, answer: &Path) -> anyhow::Result<Result<(), Mismatch>> {
    let (produced, expected) = tokio::try_join!(read_lossy(output), read_lossy(answer))?;
    Ok(diff(&produced, &expected))
}

async fn read_lossy(path: &Path) -> anyhow::Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Cannot read file {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
