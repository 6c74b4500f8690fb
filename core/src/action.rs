pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}
use std::fmt;
use std::path::{Path, PathBuf};

use error::*;
use serde::Serialize;

use crate::problem::{ConfigError, PlanNormalizer, TestPlan};
use crate::testing::{diff, Judge, Mismatch, TestReport};

/// Report of one judged problem config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemOutcome {
    pub problem: PathBuf,
    pub report: TestReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub passed: usize,
    pub total: usize,
}

impl Summary {
    pub fn of(outcomes: &[ProblemOutcome]) -> Self {
        Self {
            passed: outcomes.iter().filter(|o| o.report.is_accepted()).count(),
            total: outcomes.len(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "All tests completed with {} of {} tests passed.",
            self.passed, self.total
        )
    }
}

/// Normalize every config first (a broken config aborts before anything is compiled),
/// then judge them one by one.
pub async fn judge_problem_files(
    problems: &[PathBuf],
    normalizer: &PlanNormalizer,
    judge: &Judge,
    fail_fast: bool,
) -> Result<Vec<ProblemOutcome>> {
    let plans = problems
        .iter()
        .map(|path| normalizer.load(path))
        .collect::<std::result::Result<Vec<_>, ConfigError>>()
        .context("Failed to load problem config")?;

    let mut outcomes = Vec::with_capacity(plans.len());
    for plan in plans {
        let report = judge.judge(&plan).await;
        let accepted = report.is_accepted();
        outcomes.push(ProblemOutcome {
            problem: plan.origin,
            report,
        });
        if fail_fast && !accepted {
            log::warn!("Stopped at the first failed problem (--fail-fast)");
            break;
        }
    }
    Ok(outcomes)
}

/// Normalize each config independently, keeping every error.
pub fn check_problem_files(
    problems: &[PathBuf],
    normalizer: &PlanNormalizer,
) -> Vec<(PathBuf, std::result::Result<TestPlan, ConfigError>)> {
    problems
        .iter()
        .map(|path| (path.clone(), normalizer.load(path)))
        .collect()
}

pub fn diff_files(
    output: impl AsRef<Path>,
    answer: impl AsRef<Path>,
) -> Result<std::result::Result<(), Mismatch>> {
    let produced = fsutil::read_to_string_lossy(output)?;
    let expected = fsutil::read_to_string_lossy(answer)?;
    Ok(diff(&produced, &expected))
}
