use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Verdict taxonomy. The ordinals are part of the report format and must not change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum JudgeCode {
    // fail-fast results
    Accepted = 0,
    Unaccepted = -1,
    CompilationError = -2,

    // detailed results
    CpuTimeLimitExceeded = 1,
    TimeLimitExceeded = 2,
    SpaceLimitExceeded = 3,
    RuntimeError = 4,
    SystemError = 5,
    WrongAnswer = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown result code {0}")]
pub struct UnknownJudgeCode(pub i32);

impl JudgeCode {
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn is_accepted(self) -> bool {
        self == JudgeCode::Accepted
    }

    pub fn abbr(self) -> &'static str {
        use JudgeCode::*;
        match self {
            Accepted => "AC",
            Unaccepted => "UA",
            CompilationError => "CE",
            CpuTimeLimitExceeded => "CLE",
            TimeLimitExceeded => "TLE",
            SpaceLimitExceeded => "MLE",
            RuntimeError => "RE",
            SystemError => "SE",
            WrongAnswer => "WA",
        }
    }
}

impl TryFrom<i32> for JudgeCode {
    type Error = UnknownJudgeCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        use JudgeCode::*;
        let judge = match code {
            0 => Accepted,
            -1 => Unaccepted,
            -2 => CompilationError,
            1 => CpuTimeLimitExceeded,
            2 => TimeLimitExceeded,
            3 => SpaceLimitExceeded,
            4 => RuntimeError,
            5 => SystemError,
            6 => WrongAnswer,
            _ => return Err(UnknownJudgeCode(code)),
        };
        Ok(judge)
    }
}

impl Serialize for JudgeCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.ordinal())
    }
}

impl<'de> Deserialize<'de> for JudgeCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = i32::deserialize(deserializer)?;
        JudgeCode::try_from(code).map_err(de::Error::custom)
    }
}

/// Verdict of one testcase (leaf) or of a whole plan (with `children`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub result: JudgeCode,

    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_time: Option<u64>,

    /// Bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_space: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TestReport>>,
}

impl TestReport {
    pub fn new(result: JudgeCode) -> Self {
        Self {
            result,
            used_time: None,
            used_space: None,
            message: None,
            children: None,
        }
    }

    pub fn leaf(result: JudgeCode, used_time: u64, used_space: u64) -> Self {
        Self {
            used_time: Some(used_time),
            used_space: Some(used_space),
            ..Self::new(result)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Fold per-case reports: accepted iff every child is accepted,
    /// time is summed and space is the maximum.
    pub fn aggregate(children: Vec<TestReport>) -> Self {
        let all_accepted = children.iter().all(TestReport::is_accepted);
        let used_time = children
            .iter()
            .filter_map(|r| r.used_time)
            .fold(0, u64::saturating_add);
        let used_space = children
            .iter()
            .filter_map(|r| r.used_space)
            .max()
            .unwrap_or(0);
        Self {
            result: if all_accepted {
                JudgeCode::Accepted
            } else {
                JudgeCode::Unaccepted
            },
            used_time: Some(used_time),
            used_space: Some(used_space),
            message: None,
            children: Some(children),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.result.is_accepted()
    }

    pub fn children(&self) -> &[TestReport] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn num_accepted_children(&self) -> usize {
        self.children().iter().filter(|r| r.is_accepted()).count()
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.result)?;
        if let Some(ms) = self.used_time {
            write!(f, " [{}ms", ms)?;
            if let Some(bytes) = self.used_space {
                write!(f, ", {}KiB", bytes / 1024)?;
            }
            write!(f, "]")?;
        }
        if let Some(msg) = &self.message {
            write!(f, ": {}", msg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn ordinals_are_fixed() {
        use JudgeCode::*;
        let want = [
            (Accepted, 0),
            (Unaccepted, -1),
            (CompilationError, -2),
            (CpuTimeLimitExceeded, 1),
            (TimeLimitExceeded, 2),
            (SpaceLimitExceeded, 3),
            (RuntimeError, 4),
            (SystemError, 5),
            (WrongAnswer, 6),
        ];
        for (judge, ord) in want {
            assert_eq!(judge.ordinal(), ord);
            assert_eq!(JudgeCode::try_from(ord), Ok(judge));
        }
        assert_eq!(JudgeCode::try_from(7), Err(UnknownJudgeCode(7)));
    }

    #[test]
    fn names_round_trip() {
        assert_eq!(
            JudgeCode::CpuTimeLimitExceeded.to_string(),
            "CPU_TIME_LIMIT_EXCEEDED"
        );
        assert_eq!(JudgeCode::WrongAnswer.to_string(), "WRONG_ANSWER");
        for judge in JudgeCode::iter() {
            assert_eq!(JudgeCode::from_str(&judge.to_string()), Ok(judge));
        }
    }

    #[test]
    fn aggregate_sums_time_and_takes_max_space() {
        let report = TestReport::aggregate(vec![
            TestReport::leaf(JudgeCode::Accepted, 10, 5),
            TestReport::leaf(JudgeCode::Accepted, 20, 30),
        ]);
        assert_eq!(report.result, JudgeCode::Accepted);
        assert_eq!(report.used_time, Some(30));
        assert_eq!(report.used_space, Some(30));
        assert_eq!(report.children().len(), 2);
    }

    #[test]
    fn aggregate_time_saturates() {
        let report = TestReport::aggregate(vec![
            TestReport::leaf(JudgeCode::Accepted, u64::MAX, 1),
            TestReport::leaf(JudgeCode::Accepted, 1, 2),
        ]);
        assert_eq!(report.used_time, Some(u64::MAX));
        assert_eq!(report.used_space, Some(2));
    }

    #[test]
    fn aggregate_keeps_children_untouched() {
        let children = vec![
            TestReport::leaf(JudgeCode::Accepted, 1, 1),
            TestReport::leaf(JudgeCode::TimeLimitExceeded, 2048, 3).with_message("{}"),
            TestReport::new(JudgeCode::SystemError).with_message("boom"),
        ];
        let report = TestReport::aggregate(children.clone());
        assert_eq!(report.result, JudgeCode::Unaccepted);
        assert_eq!(report.used_time, Some(2049));
        assert_eq!(report.used_space, Some(3));
        assert_eq!(report.children, Some(children));
        assert_eq!(report.num_accepted_children(), 1);
    }

    #[test]
    fn aggregate_of_nothing_is_accepted() {
        let report = TestReport::aggregate(vec![]);
        assert_eq!(report.result, JudgeCode::Accepted);
        assert_eq!(report.used_time, Some(0));
        assert_eq!(report.used_space, Some(0));
        assert_eq!(report.children, Some(vec![]));
    }

    #[test]
    fn serialize_omits_absent_fields() {
        let json = serde_json::to_string(&TestReport::new(JudgeCode::CompilationError)).unwrap();
        assert_eq!(json, r#"{"result":-2}"#);

        let report = TestReport::aggregate(vec![TestReport::leaf(JudgeCode::WrongAnswer, 3, 4)
            .with_message("Expected 'e' but found 'd' at 2:2")]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "result": -1,
                "used_time": 3,
                "used_space": 4,
                "children": [{
                    "result": 6,
                    "used_time": 3,
                    "used_space": 4,
                    "message": "Expected 'e' but found 'd' at 2:2",
                }],
            })
        );
        let back: TestReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn deserialize_unknown_code_ng() {
        let res: Result<TestReport, _> = serde_json::from_str(r#"{"result":42}"#);
        assert!(res.is_err());
        dbg!(res.unwrap_err());
    }
}
