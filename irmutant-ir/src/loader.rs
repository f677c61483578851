use std::cell::RefCell;
use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use inkwell::context::Context;
use inkwell::module::Module as LlvmModule;

use crate::error::LoadError;

/// The only I/O boundary for IR the core crosses. The core never opens files
/// itself; everything it needs arrives through this interface, which is injectable so the
/// pipeline can be driven against in-memory IR in tests.
///
/// Parameterized over the lifetime of the `Context` modules are parsed into, so an in-memory
/// loader can hand back modules it built ahead of time without reparsing them.
pub trait ModuleLoader<'ctx> {
    fn load_module_at_path(&self, context: &'ctx Context, path: &Utf8Path) -> Result<LlvmModule<'ctx>, LoadError>;
}

/// Loads bitcode files from disk, the production [`ModuleLoader`].
pub struct FileModuleLoader;

impl<'ctx> ModuleLoader<'ctx> for FileModuleLoader {
    fn load_module_at_path(&self, context: &'ctx Context, path: &Utf8Path) -> Result<LlvmModule<'ctx>, LoadError> {
        LlvmModule::parse_bitcode_from_path(path.as_std_path(), context)
            .map_err(|err| LoadError::Parse { path: path.as_std_path().to_owned(), message: err.to_string() })
    }
}

/// Hands out pre-built, in-memory [`LlvmModule`]s keyed by a nominal path, so tests can exercise
/// the pipeline against IR built directly with `inkwell`'s builder API instead of bitcode
/// fixtures on disk.
#[derive(Default)]
pub struct InMemoryModuleLoader<'ctx> {
    modules: RefCell<HashMap<Utf8PathBuf, LlvmModule<'ctx>>>,
}

impl<'ctx> InMemoryModuleLoader<'ctx> {
    pub fn new() -> Self {
        Self { modules: RefCell::new(HashMap::new()) }
    }

    pub fn insert(&self, path: impl Into<Utf8PathBuf>, module: LlvmModule<'ctx>) {
        self.modules.borrow_mut().insert(path.into(), module);
    }
}

impl<'ctx> ModuleLoader<'ctx> for InMemoryModuleLoader<'ctx> {
    fn load_module_at_path(&self, _context: &'ctx Context, path: &Utf8Path) -> Result<LlvmModule<'ctx>, LoadError> {
        self.modules.borrow_mut().remove(path)
            .ok_or_else(|| LoadError::Parse { path: path.as_std_path().to_owned(), message: "no in-memory module registered at this path".to_owned() })
    }
}
