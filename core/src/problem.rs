use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{de::IgnoredAny, Deserialize, Serialize};

use crate::testing::{Testcase, BYTES_PER_MB};

/// Schema version understood by this implementation.
/// A difference of 1000 or more marks a breaking change.
pub const CONFIG_VERSION: i64 = 1000;
pub const BREAKING_CHANGE_STEP: i64 = 1000;

pub const DEFAULT_TIME_LIMIT_MS: u64 = 2048;
pub const DEFAULT_SPACE_LIMIT_MB: u64 = 128;
pub const DEFAULT_SOLUTION_LANG: &str = "cpp";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Read(#[from] fsutil::Error),

    #[error("Invalid problem config '{}': {source}", .origin.display())]
    Parse {
        origin: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Missing `version` in problem config '{}'", .0.display())]
    MissingVersion(PathBuf),

    #[error("Incompatible config version {found} in '{}' (supported: {}..{})", .origin.display(), supported_versions().start, supported_versions().end)]
    IncompatibleVersion { found: i64, origin: PathBuf },

    #[error("Deprecated config version {found} in '{}' (supported: {}..{})", .origin.display(), supported_versions().start, supported_versions().end)]
    DeprecatedVersion { found: i64, origin: PathBuf },

    #[error("`{field}` must be a positive integer in '{}'", .origin.display())]
    InvalidLimit { field: &'static str, origin: PathBuf },

    #[error("No solution for language '{lang}' in '{}'", .origin.display())]
    NoSolution { lang: String, origin: PathBuf },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// `CONFIG_VERSION` and every additive revision after it, up to the next breaking change.
pub fn supported_versions() -> std::ops::Range<i64> {
    let base = CONFIG_VERSION - CONFIG_VERSION % BREAKING_CHANGE_STEP;
    base..base + BREAKING_CHANGE_STEP
}

/// Executable test plan normalized from a problem config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestPlan {
    /// Config document this plan was read from.
    pub origin: PathBuf,
    pub id: Option<String>,
    pub name: Option<String>,
    pub source: Option<String>,
    pub time_limit_ms: u64,
    pub space_limit_mb: u64,
    pub solution: PathBuf,
    pub compile_args: Vec<String>,
    pub testcases: Vec<Testcase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<serde_yaml::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_yaml::Value>,
}

impl TestPlan {
    pub fn space_limit_bytes(&self) -> u64 {
        self.space_limit_mb.saturating_mul(BYTES_PER_MB)
    }

    pub fn short_origin(&self) -> &Path {
        crate::short_path(&self.origin)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ProblemDocument {
    version: Option<i64>,
    id: Option<String>,
    name: Option<String>,
    source: Option<String>,
    #[allow(dead_code)]
    description: Option<IgnoredAny>,
    time_limit: Option<u64>,
    space_limit: Option<u64>,
    solution: Option<SolutionDocument>,
    compile_args: Option<CompileArgsDocument>,
    testcases: Option<Vec<Testcase>>,
    target: Option<serde_yaml::Value>,
    #[serde(alias = "config")]
    meta: Option<serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SolutionDocument {
    Path(PathBuf),
    ByLang(BTreeMap<String, PathBuf>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CompileArgsDocument {
    Line(String),
    List(Vec<String>),
}

impl CompileArgsDocument {
    fn into_args(self) -> Vec<String> {
        match self {
            Self::Line(line) => line.split_whitespace().map(str::to_owned).collect(),
            Self::List(args) => args,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanNormalizer {
    solution_lang: String,
}

impl Default for PlanNormalizer {
    fn default() -> Self {
        Self {
            solution_lang: DEFAULT_SOLUTION_LANG.to_owned(),
        }
    }
}

impl PlanNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key used to pick the solution when `solution` is a per-language mapping.
    pub fn solution_lang(mut self, lang: impl Into<String>) -> Self {
        self.solution_lang = lang.into();
        self
    }

    pub fn load(&self, filepath: impl AsRef<Path>) -> Result<TestPlan> {
        let filepath = filepath.as_ref();
        let text = fsutil::read_to_string(filepath)?;
        self.normalize(&text, filepath)
    }

    pub fn normalize(&self, text: &str, origin: impl Into<PathBuf>) -> Result<TestPlan> {
        let origin = origin.into();
        let doc: ProblemDocument = match serde_yaml::from_str(text) {
            Ok(doc) => doc,
            Err(source) => return Err(ConfigError::Parse { origin, source }),
        };

        let Some(version) = doc.version else {
            return Err(ConfigError::MissingVersion(origin));
        };
        let supported = supported_versions();
        if version >= supported.end {
            return Err(ConfigError::IncompatibleVersion {
                found: version,
                origin,
            });
        }
        if version < supported.start {
            return Err(ConfigError::DeprecatedVersion {
                found: version,
                origin,
            });
        }

        let time_limit_ms = match doc.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_MS) {
            0 => {
                return Err(ConfigError::InvalidLimit {
                    field: "timeLimit",
                    origin,
                })
            }
            ms => ms,
        };
        let space_limit_mb = match doc.space_limit.unwrap_or(DEFAULT_SPACE_LIMIT_MB) {
            0 => {
                return Err(ConfigError::InvalidLimit {
                    field: "spaceLimit",
                    origin,
                })
            }
            mb => mb,
        };

        let solution = match doc.solution {
            Some(SolutionDocument::Path(path)) => Some(path),
            Some(SolutionDocument::ByLang(mut by_lang)) => by_lang.remove(&self.solution_lang),
            None => None,
        };
        let Some(solution) = solution else {
            return Err(ConfigError::NoSolution {
                lang: self.solution_lang.clone(),
                origin,
            });
        };

        Ok(TestPlan {
            origin,
            id: doc.id,
            name: doc.name,
            source: doc.source,
            time_limit_ms,
            space_limit_mb,
            solution,
            compile_args: doc
                .compile_args
                .map(CompileArgsDocument::into_args)
                .unwrap_or_default(),
            testcases: doc.testcases.unwrap_or_default(),
            target: doc.target,
            meta: doc.meta,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const FULL_DOC: &str = r#"
version: 1000
id: "etheroj:example/a-plus-b"
name: A + B
source: example
description: |
  Long statement text which must not reach the plan.
timeLimit: 1000
spaceLimit: 256
solution:
  cpp: sol/a.cpp
  python: sol/a.py
compileArgs: "-O2  -std=c++17"
testcases:
  - input: data/1.in
    answer: data/1.ans
  - input: data/2.in
    answer: data/2.ans
    specialJudge: checker.cpp
target: ["!test", "playground"]
"#;

    fn normalize(doc: &str) -> Result<TestPlan> {
        PlanNormalizer::new().normalize(doc, "problems/a/problem.yml")
    }

    #[test]
    fn normalize_full_document() {
        let plan = dbg!(normalize(FULL_DOC)).unwrap();

        assert_eq!(plan.origin, Path::new("problems/a/problem.yml"));
        assert_eq!(plan.id.as_deref(), Some("etheroj:example/a-plus-b"));
        assert_eq!(plan.name.as_deref(), Some("A + B"));
        assert_eq!(plan.time_limit_ms, 1000);
        assert_eq!(plan.space_limit_mb, 256);
        assert_eq!(plan.space_limit_bytes(), 256 * 1_048_576);
        assert_eq!(plan.solution, Path::new("sol/a.cpp"));
        assert_eq!(plan.compile_args, vec!["-O2", "-std=c++17"]);
        assert_eq!(plan.testcases.len(), 2);
        assert_eq!(plan.testcases[0].input, Path::new("data/1.in"));
        assert_eq!(plan.testcases[1].answer, Path::new("data/2.ans"));
        assert_eq!(
            plan.testcases[1].special_judge.as_deref(),
            Some(Path::new("checker.cpp"))
        );
        assert!(plan.target.is_some());
    }

    #[test]
    fn description_is_stripped() {
        let plan = normalize(FULL_DOC).unwrap();
        let dumped = format!("{:?}", plan);
        assert!(!dumped.contains("Long statement"), "{}", dumped);
    }

    #[test]
    fn defaults_are_applied() {
        let plan = normalize("version: 1000\nsolution: main.cpp\n").unwrap();
        assert_eq!(plan.time_limit_ms, DEFAULT_TIME_LIMIT_MS);
        assert_eq!(plan.space_limit_mb, DEFAULT_SPACE_LIMIT_MB);
        assert_eq!(plan.solution, Path::new("main.cpp"));
        assert!(plan.compile_args.is_empty());
        assert!(plan.testcases.is_empty());
        assert_eq!(plan.target, None);
    }

    #[test]
    fn json_document_is_accepted() {
        let plan = normalize(r#"{"version": 1000, "solution": "a.cpp", "testcases": []}"#).unwrap();
        assert_eq!(plan.solution, Path::new("a.cpp"));
    }

    #[test]
    fn compile_args_as_list() {
        let plan =
            normalize("version: 1000\nsolution: a.cpp\ncompileArgs: [\"-O2\", \"-DLOCAL\"]\n")
                .unwrap();
        assert_eq!(plan.compile_args, vec!["-O2", "-DLOCAL"]);
    }

    #[test]
    fn additive_versions_are_accepted() {
        assert!(normalize("version: 1000\nsolution: a.cpp\n").is_ok());
        assert!(normalize("version: 1999\nsolution: a.cpp\n").is_ok());
    }

    #[test]
    fn breaking_versions_are_rejected() {
        let err = normalize("version: 2000\nsolution: a.cpp\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::IncompatibleVersion { found: 2000, .. }
        ));

        let err = normalize("version: 999\nsolution: a.cpp\n").unwrap_err();
        assert!(matches!(err, ConfigError::DeprecatedVersion { found: 999, .. }));

        let err = normalize("version: 1\nsolution: a.cpp\n").unwrap_err();
        assert!(matches!(err, ConfigError::DeprecatedVersion { found: 1, .. }));
    }

    #[test]
    fn missing_version_is_rejected() {
        let err = normalize("solution: a.cpp\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVersion(_)));
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = normalize("version: 1000\nsolution: a.cpp\ntimeLimit: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidLimit {
                field: "timeLimit",
                ..
            }
        ));
        let err = normalize("version: 1000\nsolution: a.cpp\nspaceLimit: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidLimit {
                field: "spaceLimit",
                ..
            }
        ));
    }

    #[test]
    fn negative_limit_is_a_parse_error() {
        let err = normalize("version: 1000\nsolution: a.cpp\ntimeLimit: -5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = normalize("version: 1000\nsolution: a.cpp\ntimelimit: 10\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn solution_is_picked_by_lang() {
        let doc = "version: 1000\nsolution:\n  cpp: a.cpp\n  python: a.py\n";
        let plan = PlanNormalizer::new()
            .solution_lang("python")
            .normalize(doc, "p.yml")
            .unwrap();
        assert_eq!(plan.solution, Path::new("a.py"));

        let err = PlanNormalizer::new()
            .solution_lang("rust")
            .normalize(doc, "p.yml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoSolution { lang, .. } if lang == "rust"));
    }

    #[test]
    fn missing_solution_is_rejected() {
        let err = normalize("version: 1000\n").unwrap_err();
        assert!(matches!(err, ConfigError::NoSolution { .. }));
    }

    #[test]
    fn testcase_without_answer_is_rejected() {
        let err = normalize("version: 1000\nsolution: a.cpp\ntestcases:\n  - input: 1.in\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_missing_file() {
        let err = PlanNormalizer::new()
            .load("/no/such/problem.yml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }
}
