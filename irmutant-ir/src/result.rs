use serde::Serialize;

use crate::discovery::{Test, Testee};
use crate::mutation::MutationPoint;

/// The outcome of running one test binary once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// The test passed.
    Passed,
    /// The test ran to completion and failed, or the process crashed/trapped.
    Failed,
    /// The run could not be attributed to the test at all: link failure, missing symbol, or
    /// the run was aborted before the test's result could be observed.
    Invalid,
}

/// One invocation of the Test Runner against a fixed set of objects.
#[derive(Clone, Debug, Serialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub running_time_nanos: u128,
}

impl ExecutionResult {
    pub fn invalid() -> Self {
        Self { status: ExecutionStatus::Invalid, running_time_nanos: 0 }
    }
}

/// The baseline-vs-mutant comparison for one (test, testee, mutation point) triple.
/// A mutant is "killed" when the mutated run disagrees with the baseline
/// (baseline passed, mutant failed or invalid); otherwise it "survives".
#[derive(Clone, Debug, Serialize)]
pub struct MutationResult {
    pub test_name: String,
    pub testee_name: String,
    pub operator_kind: String,
    pub location: Option<(String, u32, u32)>,
    pub baseline: ExecutionResult,
    pub mutant: ExecutionResult,
    pub killed: bool,
}

impl MutationResult {
    pub fn new(test: &Test<'_>, testee: &Testee<'_>, point: &MutationPoint<'_>, baseline: ExecutionResult, mutant: ExecutionResult) -> Self {
        let killed = baseline.status == ExecutionStatus::Passed && mutant.status != ExecutionStatus::Passed;
        let location = point.location.as_ref().map(|loc| (loc.path.to_string(), loc.line, loc.column));

        Self {
            test_name: test.display_name.clone(),
            testee_name: testee.function.name.clone(),
            operator_kind: point.operator_kind.to_string(),
            location,
            baseline,
            mutant,
            killed,
        }
    }
}

/// The full set of [`MutationResult`]s produced for one test's run of the pipeline
///, plus the test's own baseline run.
#[derive(Clone, Debug, Serialize)]
pub struct TestResult {
    pub test_name: String,
    pub baseline: ExecutionResult,
    pub mutations: Vec<MutationResult>,
}

impl TestResult {
    pub fn survivors(&self) -> impl Iterator<Item = &MutationResult> {
        self.mutations.iter().filter(|m| !m.killed)
    }

    pub fn mutation_score(&self) -> f64 {
        if self.mutations.is_empty() {
            return 1.0;
        }
        let killed = self.mutations.iter().filter(|m| m.killed).count();
        killed as f64 / self.mutations.len() as f64
    }
}
