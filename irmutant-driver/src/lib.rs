//! Pipeline Driver: configuration, CLI plumbing, orchestration, and result reporting — the
//! ambient stack that turns `irmutant-ir`/`irmutant-operators`/`irmutant-junk`/`irmutant-runtime`
//! into a runnable mutation testing engine.

pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub use cancel::CancellationToken;
pub use config::{Config, OperatorSelection, Options};
pub use error::{ConfigError, DriverError};

use std::time::Instant;

use irmutant_ir::{Compiler, Context, ModuleLoader, ModuleStore, Operator, TestResult};
use irmutant_junk::JunkDetector;
use irmutant_operators::default_catalogue;
use irmutant_runtime::TestRunner;

/// Runs the full mutation pipeline for `config`, loading IR through `loader` into modules
/// borrowing `context`, and returning one [`TestResult`] per [`irmutant_ir::Test`] the Test
/// Finder discovers, in discovery order. `context` is created by the caller so embedding callers
/// can reuse it across multiple runs if they wish.
///
/// Times each phase, optionally reports them, and propagates anything fatal — config validation,
/// module loading, baseline compilation, test runner setup — as an error rather than a partial
/// result. Everything past baseline construction is non-fatal and surfaces inside the returned
/// [`TestResult`]s instead.
pub fn run<'ctx>(
    context: &'ctx Context,
    config: &Config,
    loader: &dyn ModuleLoader<'ctx>,
    cancel: &CancellationToken,
) -> Result<Vec<TestResult>, DriverError> {
    config.validate()?;

    let t_start = Instant::now();
    let mut store = ModuleStore::new(context);
    for path in &config.bitcode_paths {
        store.load(loader, path)?;
    }
    let t_loaded = t_start.elapsed();

    let compiler = Compiler::for_host().map_err(DriverError::BaselineCompile)?;
    for handle in store.iter_all().collect::<Vec<_>>() {
        let object = {
            let module = store.get(handle);
            compiler.compile(module.llvm())
        }.map_err(DriverError::BaselineCompile)?;
        store.set_baseline_object(handle, object);
    }
    let t_baseline = t_start.elapsed();

    let catalogue = default_catalogue();
    let operators = select_operators(&catalogue, &config.opts.operators);

    let junk_detector = JunkDetector::new(config.cxx_ast_config());
    let runner = TestRunner::new().map_err(DriverError::Runner)?;

    let pipeline = pipeline::Pipeline::new(&store, &compiler, operators, &junk_detector, &runner);
    let results = pipeline.run(cancel);
    let t_done = t_start.elapsed();

    if config.opts.report_timings {
        tracing::info!(
            load_ms = t_loaded.as_millis(),
            baseline_compile_ms = (t_baseline - t_loaded).as_millis(),
            pipeline_ms = (t_done - t_baseline).as_millis(),
            total_ms = t_done.as_millis(),
            "irmutant run finished",
        );
    }

    Ok(results)
}

fn select_operators<'a>(catalogue: &'a [Box<dyn Operator>], selection: &OperatorSelection) -> Vec<&'a dyn Operator> {
    match selection {
        OperatorSelection::All => catalogue.iter().map(Box::as_ref).collect(),
        OperatorSelection::Only(names) => catalogue.iter()
            .map(Box::as_ref)
            .filter(|op: &&dyn Operator| names.iter().any(|name| name == op.kind().0))
            .collect(),
    }
}
