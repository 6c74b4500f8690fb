use std::path::PathBuf;

use judger_core::print_success;

use super::{GlobalArgs, SubcmdResult};
use crate::config::ToolConfig;

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(default_value = "./")]
    dir: PathBuf,

    /// Overwrite an existing judger.toml
    #[arg(long)]
    force: bool,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    let path = args.dir.join(ToolConfig::FILENAME);
    anyhow::ensure!(
        args.force || !path.exists(),
        "{} already exists (use --force to overwrite)",
        path.display()
    );
    fsutil::write_with_mkdir(&path, ToolConfig::example_toml())?;
    print_success!("Wrote example config. (path: {})", path.display());
    Ok(())
}
