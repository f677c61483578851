/// Link/invoke failure. Always local: the Driver records an
/// `Invalid` [`irmutant_ir::ExecutionResult`] for the affected point and continues.
#[derive(thiserror::Error, Debug)]
pub enum RunnerError {
    #[error("no system linker found on PATH: {message}")]
    LinkerNotFound { message: String },

    #[error("failed to set up a scratch build directory: {message}")]
    Scratch { message: String },

    #[error("linking failed: {message}")]
    Link { message: String },

    #[error("failed to load the linked library: {message}")]
    Load { message: String },

    #[error("test entry symbol `{symbol}` not found in the linked library")]
    MissingSymbol { symbol: String },
}
