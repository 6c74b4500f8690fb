pub mod check;
pub mod diff;
pub mod init;
pub mod test;

use std::path::PathBuf;

use crate::config::ToolConfig;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,

    /// Tool config file (default: ./judger.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    /// Compile and judge every given problem config
    #[command(alias("t"))]
    Test(test::Args),

    /// Validate problem configs and print the normalized plans
    Check(check::Args),

    /// Compare an output file with an answer file
    Diff(diff::Args),

    /// Write an example judger.toml
    Init(init::Args),
}

pub type SubcmdResult = anyhow::Result<()>;

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Test(args) => test::exec(args, self).await,
            Check(args) => check::exec(args, self),
            Diff(args) => diff::exec(args, self),
            Init(args) => init::exec(args, self),
        }
    }

    pub fn tool_config(&self) -> anyhow::Result<ToolConfig> {
        ToolConfig::load(self.config.as_deref())
    }
}
