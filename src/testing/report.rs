use std::fmt::{self, Display};

use serde::Serialize;

/// Terminal state of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed {
        reason: String,
        /// Body of the last response the case received, for diagnosis.
        response_body: Option<String>,
    },
    /// Not executed because a prerequisite did not pass.
    Skipped { blocked_by: String },
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASS",
            Outcome::Failed { .. } => "FAIL",
            Outcome::Skipped { .. } => "SKIP",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub id: String,
    pub title: String,
    pub outcome: Outcome,
    pub duration_ms: u128,
}

/// Summary of one suite run, cases listed in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub suite: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u128,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            ..Self::default()
        }
    }

    /// Report for a suite whose run ended abnormally, as one failed entry.
    pub fn aborted(suite: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut report = Self::new(suite);
        report.record(CaseReport {
            id: "suite_aborted".to_string(),
            title: "Suite aborted".to_string(),
            outcome: Outcome::Failed {
                reason: reason.into(),
                response_body: None,
            },
            duration_ms: 0,
        });
        report
    }

    pub fn record(&mut self, case: CaseReport) {
        self.total += 1;
        match case.outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed { .. } => self.failed += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
        }
        self.cases.push(case);
    }

    pub fn case(&self, id: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|case| case.id == id)
    }

    pub fn outcome(&self, id: &str) -> Option<&Outcome> {
        self.case(id).map(|case| &case.outcome)
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "suite {} ({} ms)", self.suite, self.duration_ms)?;
        for case in &self.cases {
            writeln!(
                f,
                "  [{}] {} ({} ms)",
                case.outcome.label(),
                case.title,
                case.duration_ms
            )?;
            match &case.outcome {
                Outcome::Passed => {}
                Outcome::Failed {
                    reason,
                    response_body,
                } => {
                    writeln!(f, "         {reason}")?;
                    if let Some(body) = response_body {
                        for line in body.lines() {
                            writeln!(f, "         | {line}")?;
                        }
                    }
                }
                Outcome::Skipped { blocked_by } => {
                    writeln!(f, "         blocked by `{blocked_by}`")?;
                }
            }
        }
        write!(
            f,
            "  total {}, passed {}, failed {}, skipped {}",
            self.total, self.passed, self.failed, self.skipped
        )
    }
}
