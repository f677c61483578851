use camino::Utf8PathBuf;

/// Malformed input configuration. Fatal before the run starts.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("duplicate bitcode path in configuration: `{path}`")]
    DuplicateBitcodePath { path: Utf8PathBuf },

    #[error("no bitcode paths configured; nothing to load")]
    NoBitcodePaths,

    #[error("failed to read configuration file `{path}`: {message}")]
    Read { path: Utf8PathBuf, message: String },

    #[error("failed to parse configuration file `{path}`: {message}")]
    Parse { path: Utf8PathBuf, message: String },
}

/// The top-level error a run can fail with, composing every fatal kind a setup phase can raise
/// (`ConfigError`, `LoadError`, `BaselineCompileError`) plus runner setup failure. Anything going
/// wrong past this boundary (a single mutant's compile, a single test's execution, a junk-detector
/// parse) is recorded per-mutation instead and shows up inside a [`irmutant_ir::TestResult`].
#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] irmutant_ir::LoadError),

    #[error("baseline compilation failed: {0}")]
    BaselineCompile(irmutant_ir::CompileError),

    #[error("failed to initialize the test runner: {0}")]
    Runner(irmutant_runtime::RunnerError),
}
