use std::{
    io::IsTerminal as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chrono::{DateTime, Local};
use judger_core::{
    action::{self, ProblemOutcome, Summary},
    print_success,
    testing::{Judge, LogObserver, PathBase},
    PlanNormalizer,
};
use serde::Serialize;

use super::{GlobalArgs, SubcmdResult};
use crate::{observer::ConsoleObserver, util};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Problem config files (YAML or JSON)
    #[arg()]
    pub problems: Vec<PathBuf>,

    /// Also judge every file matching this glob pattern
    #[arg(short, long, value_name = "GLOB")]
    pub target: Option<String>,

    /// Write all reports as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Stop at the first problem that is not accepted
    #[arg(long)]
    pub fail_fast: bool,

    /// Resolve relative paths in a config against the config's own dir
    #[arg(long)]
    pub relative_to_config: bool,
}

#[derive(Debug, Serialize)]
struct ReportFile<'a> {
    timestamp: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_pattern: Option<&'a str>,
    reports: &'a [ProblemOutcome],
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let problems = util::collect_targets(&args.problems, args.target.as_deref())?;
    anyhow::ensure!(
        !problems.is_empty(),
        "No problem config given: pass files or --target <GLOB>"
    );

    let cfg = global_args.tool_config()?;
    log::debug!("{:?}", cfg);

    let normalizer = PlanNormalizer::new().solution_lang(&cfg.solution_lang);
    let path_base = if args.relative_to_config {
        PathBase::ConfigDir
    } else {
        PathBase::CurrentDir
    };
    let judge = Judge::new(cfg.compiler(), cfg.sandbox()).path_base(path_base);
    // Spinners are noise in CI logs.
    let judge = if std::io::stdout().is_terminal() {
        judge.observer(ConsoleObserver::new())
    } else {
        judge.observer(LogObserver)
    };

    let outcomes =
        action::judge_problem_files(&problems, &normalizer, &judge, args.fail_fast).await?;

    if let Some(path) = &args.report {
        write_report(path, args.target.as_deref(), &outcomes)?;
        log::info!("Saved reports to {}", path.display());
    }

    let summary = Summary::of(&outcomes);
    if !summary.all_passed() {
        anyhow::bail!("✘ {}", summary);
    }
    print_success!("✓ {}", summary);
    Ok(())
}

fn write_report(
    path: &Path,
    target_pattern: Option<&str>,
    outcomes: &[ProblemOutcome],
) -> anyhow::Result<()> {
    let file = ReportFile {
        timestamp: Local::now(),
        target_pattern,
        reports: outcomes,
    };
    fsutil::write_json_pretty_with_mkdir(path, &file)
        .with_context(|| format!("Failed to save reports to {}", path.display()))
}

#[cfg(test)]
mod test {
    use judger_core::testing::{JudgeCode, TestReport};

    use super::*;

    #[test]
    fn report_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/reports.json");
        let outcomes = vec![ProblemOutcome {
            problem: "p/a.yml".into(),
            report: TestReport::aggregate(vec![TestReport::leaf(JudgeCode::WrongAnswer, 3, 4)
                .with_message("Unexpected end of produced data")]),
        }];
        write_report(&path, Some("p/*.yml"), &outcomes).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fsutil::read_to_string(&path).unwrap()).unwrap();
        assert!(json["timestamp"].is_string());
        assert_eq!(json["target_pattern"], "p/*.yml");
        let entry = &json["reports"][0];
        assert_eq!(entry["problem"], "p/a.yml");
        assert_eq!(entry["report"]["result"], -1);
        assert_eq!(entry["report"]["children"][0]["result"], 6);
        assert_eq!(entry["report"]["children"][0]["used_time"], 3);
    }
}
