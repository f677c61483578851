//! Module Store, Compiler, Test Finder, and the mutation data model shared by every other
//! irmutant crate. This crate owns the only representation of LLVM IR in the workspace; nothing
//! outside it touches `inkwell`/`llvm-sys` directly.

pub mod discovery;
pub mod error;
pub mod function;
pub mod location;
pub mod loader;
pub mod module;
pub mod mutation;
pub mod object;
pub mod result;

pub use discovery::{find_mutation_points, find_testees, find_tests, Test, TestAdapter, TestKind, Testee};
pub use error::{CompileError, LoadError};
pub use function::Function;
pub use loader::{FileModuleLoader, InMemoryModuleLoader, ModuleLoader};
pub use location::SourceLocation;
pub use module::{Module, ModuleHandle, ModuleStore};
pub use mutation::{FloatArithOp, IntArithOp, MutationPoint, Operator, OperatorKind, Rewrite};
pub use object::{Compiler, Object};
pub use result::{ExecutionResult, ExecutionStatus, MutationResult, TestResult};

pub use inkwell::context::Context;
