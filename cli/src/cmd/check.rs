use std::path::PathBuf;

use colored::Colorize as _;
use judger_core::{action, PlanNormalizer};

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Problem config files to validate
    #[arg(required = true)]
    pub problems: Vec<PathBuf>,

    /// Only report errors, do not print the normalized plans
    #[arg(long)]
    pub no_print: bool,
}

pub fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = global_args.tool_config()?;
    let normalizer = PlanNormalizer::new().solution_lang(&cfg.solution_lang);

    let mut num_invalid = 0;
    for (path, res) in action::check_problem_files(&args.problems, &normalizer) {
        match res {
            Ok(plan) => {
                println!("{} {}", "✓".green().bold(), path.display());
                if !args.no_print {
                    print!("{}", serde_yaml::to_string(&plan)?);
                }
            }
            Err(e) => {
                num_invalid += 1;
                println!("{} {}", "✘".bright_red().bold(), path.display());
                log::error!("{}", e);
            }
        }
    }

    anyhow::ensure!(
        num_invalid == 0,
        "{} of {} problem configs are invalid",
        num_invalid,
        args.problems.len()
    );
    Ok(())
}
