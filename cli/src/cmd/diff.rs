use std::path::PathBuf;

use judger_core::{action, print_success};

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Produced output
    pub output: PathBuf,

    /// Expected answer
    pub answer: PathBuf,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    match action::diff_files(&args.output, &args.answer)? {
        Ok(()) => {
            print_success!("Output matches {}", args.answer.display());
            Ok(())
        }
        Err(mismatch) => anyhow::bail!("{}", mismatch),
    }
}
