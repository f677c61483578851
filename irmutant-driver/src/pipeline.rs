use irmutant_ir::{
    find_mutation_points, find_testees, find_tests, Compiler, ExecutionResult, ModuleStore,
    MutationPoint, MutationResult, Object, Operator, Test, TestResult, Testee,
};
use irmutant_junk::JunkDetector;
use irmutant_runtime::TestRunner;

use crate::cancel::CancellationToken;

/// Orchestrates the Module Store, Compiler, Test Finder, operator catalogue, Junk Detector, and
/// Test Runner: for each test × testee × mutation point, apply the mutation, recompile only the
/// affected module, run the test against the mutant, revert, and
/// record results. Holds only borrowed references to its collaborators — it owns none of the
/// Module Store, Compiler, operator catalogue, Junk Detector, or Test Runner.
pub struct Pipeline<'a, 'ctx> {
    store: &'a ModuleStore<'ctx>,
    compiler: &'a Compiler,
    operators: Vec<&'a dyn Operator>,
    junk_detector: &'a JunkDetector,
    runner: &'a TestRunner,
}

impl<'a, 'ctx> Pipeline<'a, 'ctx> {
    pub fn new(
        store: &'a ModuleStore<'ctx>,
        compiler: &'a Compiler,
        operators: Vec<&'a dyn Operator>,
        junk_detector: &'a JunkDetector,
        runner: &'a TestRunner,
    ) -> Self {
        Self { store, compiler, operators, junk_detector, runner }
    }

    /// Runs every [`Test`] the Test Finder discovers, in discovery order. `cancel` is checked
    /// between tests and between mutation points; a test whose iteration was interrupted by
    /// cancellation is dropped entirely rather than reported with a truncated mutation list, so a
    /// cancelled run returns every [`TestResult`] whose iteration had already completed.
    pub fn run(&self, cancel: &CancellationToken) -> Vec<TestResult> {
        let tests = find_tests(self.store);
        tests.iter()
            .take_while(|_| !cancel.is_cancelled())
            .filter_map(|test| self.run_test(test, cancel))
            .collect()
    }

    /// Returns `None` if `cancel` fires before this test's iteration over its testees and
    /// mutation points finishes — a partial [`TestResult`] is not a valid `TestResult`.
    fn run_test(&self, test: &Test<'ctx>, cancel: &CancellationToken) -> Option<TestResult> {
        let baseline_objects: Vec<&Object> = self.store.iter_all()
            .filter_map(|handle| self.store.baseline_object(handle))
            .collect();
        let baseline = self.runner.run(test, &baseline_objects);

        let mut mutations = Vec::new();

        for testee in &find_testees(self.store, test) {
            if cancel.is_cancelled() {
                return None;
            }

            let others = self.store.baseline_objects_excluding(testee.function.parent);

            for point in &find_mutation_points(&self.operators, testee) {
                if cancel.is_cancelled() {
                    return None;
                }
                if self.junk_detector.is_junk(point) {
                    continue;
                }

                let mutant = self.run_mutation_point(test, testee, point, &others);
                mutations.push(MutationResult::new(test, testee, point, baseline.clone(), mutant));
            }
        }

        Some(TestResult { test_name: test.display_name.clone(), baseline, mutations })
    }

    /// One (test, testee, mutation point) iteration: apply, recompile, run, revert — in that
    /// order, with revert always executing even if recompilation failed,
    /// so every module is back in its baseline IR state before the next point is considered.
    fn run_mutation_point(&self, test: &Test<'ctx>, testee: &Testee<'ctx>, point: &MutationPoint<'ctx>, others: &[&Object]) -> ExecutionResult {
        let builder = self.store.context().create_builder();
        point.apply(&builder);

        let compiled = {
            let module = self.store.get(point.module);
            self.compiler.compile(module.llvm())
        };

        let result = match compiled {
            Ok(object) => {
                let mut objects = others.to_vec();
                objects.push(&object);
                self.runner.run(test, &objects)
            }
            Err(err) => {
                tracing::warn!(
                    error = %err, test = %test.display_name, testee = %testee.function.name,
                    "mutant recompile failed; recording Invalid",
                );
                ExecutionResult::invalid()
            }
        };

        point.revert(&builder);
        result
    }
}
