use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One (input, expected answer) pair of a test plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Testcase {
    pub input: PathBuf,
    pub answer: PathBuf,

    /// Reserved for special judges; the diff checker ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_judge: Option<PathBuf>,
}

impl Testcase {
    pub fn new(input: impl Into<PathBuf>, answer: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            answer: answer.into(),
            special_judge: None,
        }
    }
}
