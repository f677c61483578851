use std::path::PathBuf;

/// Failure to parse a bitcode/IR file into a [`crate::module::Module`].
///
/// This is the only error the core raises while crossing the [`crate::loader::ModuleLoader`]
/// boundary; it is fatal for the whole run.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to parse `{path}` as LLVM IR: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("duplicate bitcode path in configuration: `{path}`")]
    Duplicate { path: PathBuf },
}

/// Failure to compile a [`crate::module::Module`]'s current IR to a native [`crate::object::Object`].
#[derive(thiserror::Error, Debug)]
pub enum CompileError {
    #[error("no native target could be initialized: {0}")]
    TargetInit(String),

    #[error("failed to select a target machine for `{triple}`: {message}")]
    TargetMachine { triple: String, message: String },

    #[error("LLVM rejected the module: {0}")]
    Emit(String),
}
