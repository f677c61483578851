//! Test Runner: links a native object set, resolves a test entry symbol, invokes it once,
//! and interprets the return value per the test's adapter.

mod error;
mod link;

pub use error::RunnerError;

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use irmutant_ir::{ExecutionResult, ExecutionStatus, Object, Test, TestAdapter};

/// Links the object set handed to it for each `run` call, resolves the test's entry symbol, and
/// invokes it. Holds no state across invocations beyond the located system linker
/// ([`link::Linker`]) — caching native objects across runs is the Module Store's job, not this
/// crate's.
pub struct TestRunner {
    linker: link::Linker,
}

impl TestRunner {
    pub fn new() -> Result<Self, RunnerError> {
        Ok(Self { linker: link::Linker::discover()? })
    }

    /// `objects` is the complete native-code set to link for this invocation —
    /// the Driver's "all baseline objects except the testee's parent, plus the testee's parent's
    /// transient mutant object" assembly. Timing is measured around the
    /// invocation only, excluding link and load.
    pub fn run(&self, test: &Test<'_>, objects: &[&Object]) -> ExecutionResult {
        match self.try_run(test, objects) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, test = %test.display_name, "test runner error; recording Invalid");
                ExecutionResult::invalid()
            }
        }
    }

    fn try_run(&self, test: &Test<'_>, objects: &[&Object]) -> Result<ExecutionResult, RunnerError> {
        let (_scratch_dir, library_path) = self.linker.link(objects)?;

        // SAFETY: `library_path` names a shared library this call just produced; nothing else
        // touches the scratch directory concurrently, since each `run` gets its own.
        let library = unsafe { libloading::Library::new(&library_path) }
            .map_err(|err| RunnerError::Load { message: err.to_string() })?;

        let symbol = format!("{}\0", test.function.name);
        // SAFETY: the symbol, if resolvable, was compiled from IR this pipeline controls; its
        // signature is fixed by the test's `adapter` — a 0-argument function returning a 32-bit status.
        let invoke = unsafe { library.get::<unsafe extern "C" fn() -> i32>(symbol.as_bytes()) }
            .map_err(|_| RunnerError::MissingSymbol { symbol: test.function.name.clone() })?;

        let start = Instant::now();
        // Rust-level panics from a mis-signatured symbol are caught here and recorded as
        // `Invalid`. A genuine native trap (segfault, abort) takes the whole process down with
        // it; full containment against that requires running this invocation in its own
        // process via fork-per-test isolation at the outer loop.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| unsafe { invoke() }));
        let running_time_nanos = start.elapsed().as_nanos();

        let status = match outcome {
            Ok(return_code) => interpret(test.adapter, return_code),
            Err(_) => ExecutionStatus::Invalid,
        };

        Ok(ExecutionResult { status, running_time_nanos })
    }
}

fn interpret(adapter: TestAdapter, return_code: i32) -> ExecutionStatus {
    match adapter {
        TestAdapter::ReturnCode => if return_code == 0 { ExecutionStatus::Passed } else { ExecutionStatus::Failed },
        TestAdapter::Boolean => if return_code != 0 { ExecutionStatus::Passed } else { ExecutionStatus::Failed },
    }
}
