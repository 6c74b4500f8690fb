use std::{path::Path, sync::Mutex, time::Duration};

use colored::Colorize as _;
use indicatif::{ProgressBar, ProgressStyle};
use judger_core::{
    style,
    testing::{CompileError, JudgeObserver, TestReport, Testcase},
    TestPlan,
};

/// Terminal progress: a spinner while compiling or running, a badge per finished case.
#[derive(Default)]
pub struct ConsoleObserver {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn start_spinner(&self, msg: String) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg);
        pb.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(old) = slot.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl JudgeObserver for ConsoleObserver {
    fn plan_loaded(&self, plan: &TestPlan) {
        let title = plan.name.as_deref().or(plan.id.as_deref()).unwrap_or("");
        println!(
            "{} {} {}",
            "▶".cyan().bold(),
            plan.short_origin().display().to_string().bold(),
            title.dimmed()
        );
    }

    fn compile_started(&self, plan: &TestPlan) {
        self.start_spinner(format!(
            "Compiling {}",
            judger_core::short_path(&plan.solution).display()
        ));
    }

    fn compiled(&self, _plan: &TestPlan, executable: &Path) {
        self.stop_spinner();
        log::debug!("Compiled into {}", executable.display());
    }

    fn compile_failed(&self, _plan: &TestPlan, _error: &CompileError) {
        self.stop_spinner();
    }

    fn case_started(&self, plan: &TestPlan, index: usize, testcase: &Testcase) {
        self.start_spinner(format!(
            "Running test #{} of {} ({})",
            index,
            plan.testcases.len(),
            judger_core::short_path(&testcase.input).display()
        ));
    }

    fn case_finished(&self, _plan: &TestPlan, index: usize, report: &TestReport) {
        self.stop_spinner();
        let time = report
            .used_time
            .map(|t| format!(" [{}ms]", t))
            .unwrap_or_default();
        println!(
            "  {} test #{}{}",
            style::judge_icon(report.result),
            index,
            time.dimmed()
        );
    }

    fn finished(&self, plan: &TestPlan, report: &TestReport) {
        self.stop_spinner();
        style::print_report_summary(&plan.origin, report);
        if !report.is_accepted() {
            style::print_report_detail(report);
        }
    }
}
