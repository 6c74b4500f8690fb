use std::path::Path;

use super::{compiler::CompileError, result::TestReport, testcase::Testcase};
use crate::problem::TestPlan;

/// Checkpoints of a judging run. All methods default to no-op.
#[allow(unused_variables)]
pub trait JudgeObserver: Send + Sync {
    fn plan_loaded(&self, plan: &TestPlan) {}
    fn compile_started(&self, plan: &TestPlan) {}
    fn compiled(&self, plan: &TestPlan, executable: &Path) {}
    fn compile_failed(&self, plan: &TestPlan, error: &CompileError) {}
    fn case_started(&self, plan: &TestPlan, index: usize, testcase: &Testcase) {}
    fn case_finished(&self, plan: &TestPlan, index: usize, report: &TestReport) {}
    fn finished(&self, plan: &TestPlan, report: &TestReport) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl JudgeObserver for NullObserver {}

/// Writes every checkpoint to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl JudgeObserver for LogObserver {
    fn plan_loaded(&self, plan: &TestPlan) {
        log::info!(
            "{}: {} testcase(s), timeLimit={}ms, spaceLimit={}MB",
            plan.short_origin().display(),
            plan.testcases.len(),
            plan.time_limit_ms,
            plan.space_limit_mb,
        );
    }

    fn compile_started(&self, plan: &TestPlan) {
        log::info!("Compiling {}", crate::short_path(&plan.solution).display());
    }

    fn compiled(&self, _plan: &TestPlan, executable: &Path) {
        log::debug!("Compiled into {}", executable.display());
    }

    fn compile_failed(&self, plan: &TestPlan, error: &CompileError) {
        log::error!("{}: {}", plan.short_origin().display(), error);
    }

    fn case_started(&self, _plan: &TestPlan, index: usize, testcase: &Testcase) {
        log::debug!("Run test #{} ({})", index, testcase.input.display());
    }

    fn case_finished(&self, plan: &TestPlan, index: usize, report: &TestReport) {
        if report.is_accepted() {
            log::info!("test #{}: {}", index, report);
        } else {
            log::error!(
                "{}: test #{}: {}",
                plan.short_origin().display(),
                index,
                report
            );
        }
    }

    fn finished(&self, plan: &TestPlan, report: &TestReport) {
        if report.children.is_none() {
            log::error!("{}: {}", plan.short_origin().display(), report.result);
            return;
        }
        let total = report.children().len();
        let passed = report.num_accepted_children();
        if report.is_accepted() {
            log::info!(
                "{}: {} of {} tests passed.",
                plan.short_origin().display(),
                passed,
                total
            );
        } else {
            log::error!(
                "{}: {} of {} tests passed.",
                plan.short_origin().display(),
                passed,
                total
            );
        }
    }
}
