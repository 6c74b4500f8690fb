use std::{
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use tempfile::TempPath;

use super::{
    compiler::{CompileError, Compiler},
    observer::{JudgeObserver, NullObserver},
    result::{JudgeCode, TestReport},
    runner::CaseRunner,
    sandbox::Sandbox,
};
use crate::problem::TestPlan;

/// Compiled solution; the file is removed on drop.
#[derive(Debug)]
pub struct Executable(TempPath);

impl Deref for Executable {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Which directory relative testcase/solution paths are resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PathBase {
    /// The process working dir.
    #[default]
    CurrentDir,
    /// The dir containing the problem config.
    ConfigDir,
}

/// Judges whole test plans: compile once, then run every case in order.
pub struct Judge {
    compiler: Box<dyn Compiler>,
    sandbox: Box<dyn Sandbox>,
    observer: Box<dyn JudgeObserver>,
    path_base: PathBase,
    scratch_root: Option<PathBuf>,
}

impl Judge {
    pub fn new(compiler: impl Compiler + 'static, sandbox: impl Sandbox + 'static) -> Self {
        Self {
            compiler: Box::new(compiler),
            sandbox: Box::new(sandbox),
            observer: Box::new(NullObserver),
            path_base: PathBase::default(),
            scratch_root: None,
        }
    }

    pub fn observer(mut self, observer: impl JudgeObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn path_base(mut self, base: PathBase) -> Self {
        self.path_base = base;
        self
    }

    /// Parent dir of the per-run scratch dirs (default: the system temp dir).
    pub fn scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(dir.into());
        self
    }

    /// Never fails: every terminal state is a report.
    pub async fn judge(&self, plan: &TestPlan) -> TestReport {
        self.observer.plan_loaded(plan);

        self.observer.compile_started(plan);
        let executable = match self.compile(plan).await {
            Ok(exe) => exe,
            Err(e) => {
                self.observer.compile_failed(plan, &e);
                let report =
                    TestReport::new(JudgeCode::CompilationError).with_message(e.to_string());
                self.observer.finished(plan, &report);
                return report;
            }
        };
        self.observer.compiled(plan, &executable);

        let report = match self.run_all_cases(&executable, plan).await {
            Ok(children) => TestReport::aggregate(children),
            Err(e) => {
                log::error!("{}: {:#}", plan.short_origin().display(), e);
                TestReport::new(JudgeCode::SystemError).with_message(format!("{:#}", e))
            }
        };
        self.observer.finished(plan, &report);
        report
    }

    fn base_dir(&self, plan: &TestPlan) -> Option<PathBuf> {
        match self.path_base {
            PathBase::CurrentDir => None,
            PathBase::ConfigDir => {
                let dir = plan.origin.parent().unwrap_or(Path::new("."));
                fsutil::absolute_path(dir).ok()
            }
        }
    }

    async fn compile(&self, plan: &TestPlan) -> Result<Executable, CompileError> {
        let source = match self.base_dir(plan) {
            Some(dir) => fsutil::absolute_path_from(&plan.solution, dir),
            None => fsutil::absolute_path(&plan.solution).map_err(CompileError::ResolvePath)?,
        };
        if !source.is_file() {
            return Err(CompileError::SourceNotFound(source));
        }

        let executable = tempfile::Builder::new()
            .prefix("judger-exe-")
            .tempfile()
            .map_err(CompileError::TempFile)?
            .into_temp_path();

        self.compiler
            .compile(&source, &plan.compile_args, &executable)
            .await?;
        Ok(Executable(executable))
    }

    async fn run_all_cases(
        &self,
        executable: &Path,
        plan: &TestPlan,
    ) -> anyhow::Result<Vec<TestReport>> {
        if plan.testcases.is_empty() {
            log::info!("{}: no test cases provided.", plan.short_origin().display());
            return Ok(Vec::new());
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("judger-run-");
        let scratch = match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .context("Failed to create scratch dir")?;

        let mut runner = CaseRunner::new(self.sandbox.as_ref(), scratch.path());
        if let Some(dir) = self.base_dir(plan) {
            runner = runner.base_dir(dir);
        }

        let mut reports = Vec::with_capacity(plan.testcases.len());
        for (i, t) in plan.testcases.iter().enumerate() {
            self.observer.case_started(plan, i, t);
            let report = runner.run_case(executable, plan, t).await;
            self.observer.case_finished(plan, i, &report);
            reports.push(report);
        }
        Ok(reports)
    }
}
