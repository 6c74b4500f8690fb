use std::path::{Path, PathBuf};

use anyhow::Context as _;
use judger_core::problem::DEFAULT_SOLUTION_LANG;
use judger_core::testing::{Gxx, LibJudger};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};

use crate::util;

pub const APP_NAME: &str = "judger";
pub const ENV_PREFIX: &str = "JUDGER_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub solution_lang: String,
    pub sandbox: SandboxConfig,
    pub compiler: CompilerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SandboxConfig {
    pub program: PathBuf,
    pub sudo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            solution_lang: DEFAULT_SOLUTION_LANG.to_owned(),
            sandbox: SandboxConfig::default(),
            compiler: CompilerConfig::default(),
        }
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("/usr/lib/judger/libjudger.so"),
            sudo: true,
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(Gxx::DEFAULT_PROGRAM),
            args: Vec::new(),
        }
    }
}

/// Flat `JUDGER_*` env vars. Lists are comma separated.
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    solution_lang: Option<String>,
    sandbox_program: Option<PathBuf>,
    sandbox_sudo: Option<bool>,
    compiler_program: Option<PathBuf>,
    compiler_args: Option<Vec<String>>,
}

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

impl ToolConfig {
    pub const FILENAME: &'static str = "judger.toml";

    pub fn example_toml() -> String {
        Asset::get(Self::FILENAME)
            .map(|file| String::from_utf8_lossy(file.data.as_ref()).into_owned())
            .unwrap_or_default()
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: &Path) -> anyhow::Result<Self> {
        let toml = fsutil::read_to_string(filepath).context("Cannot read a file")?;
        Self::from_toml(&toml).with_context(|| {
            format!(
                "Invalid config TOML: {:?}",
                util::replace_homedir_to_tilde(filepath)
            )
        })
    }

    pub fn user_filepath() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(Self::FILENAME))
    }

    /// `explicit` must exist; otherwise the first existing candidate wins, else defaults.
    pub fn find_file(explicit: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            anyhow::ensure!(path.is_file(), "Config file not found: {:?}", path);
            return Ok(Some(path.to_owned()));
        }
        let candidates = [Some(PathBuf::from(Self::FILENAME)), Self::user_filepath()];
        Ok(candidates.into_iter().flatten().find(|path| path.is_file()))
    }

    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let cfg = match Self::find_file(explicit)? {
            Some(path) => {
                log::debug!("Tool config: {}", path.display());
                Self::from_toml_file(&path)?
            }
            None => {
                log::debug!("Tool config: built-in defaults");
                Self::default()
            }
        };
        let env = envy::prefixed(ENV_PREFIX)
            .from_env::<EnvOverrides>()
            .with_context(|| format!("Invalid {}* environment variable", ENV_PREFIX))?;
        Ok(cfg.with_env(env))
    }

    fn with_env(mut self, env: EnvOverrides) -> Self {
        let EnvOverrides {
            solution_lang,
            sandbox_program,
            sandbox_sudo,
            compiler_program,
            compiler_args,
        } = env;

        if let Some(v) = solution_lang {
            self.solution_lang = v;
        }
        if let Some(v) = sandbox_program {
            self.sandbox.program = v;
        }
        if let Some(v) = sandbox_sudo {
            self.sandbox.sudo = v;
        }
        if let Some(v) = compiler_program {
            self.compiler.program = v;
        }
        if let Some(v) = compiler_args {
            self.compiler.args = v;
        }
        self
    }

    pub fn sandbox(&self) -> LibJudger {
        LibJudger::new(&self.sandbox.program).sudo(self.sandbox.sudo)
    }

    pub fn compiler(&self) -> Gxx {
        Gxx::new(&self.compiler.program).args(self.compiler.args.iter().cloned())
    }
}
