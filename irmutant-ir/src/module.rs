use camino::{Utf8Path, Utf8PathBuf};
use inkwell::context::Context;
use inkwell::module::Module as LlvmModule;
use rustc_hash::FxHashMap;

use crate::error::LoadError;
use crate::function::Function;
use crate::loader::ModuleLoader;
use crate::object::Object;

/// A stable identity for a loaded [`Module`]: an index into the store's append-only vector,
/// chosen over a raw pointer so it stays valid independent of the IR container's own lifetime
/// games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleHandle(u32);

impl ModuleHandle {
    /// Builds a handle without going through a `ModuleStore`, for operator unit tests that
    /// exercise `Operator::scan` against hand-built IR.
    pub fn for_testing(id: u32) -> Self {
        Self(id)
    }
}

/// An immutable identity wrapping a mutable IR graph. The handle and optional
/// source file name never change; the LLVM module they wrap is mutated in place by
/// [`crate::mutation::MutationPoint::apply`]/`revert`.
pub struct Module<'ctx> {
    handle: ModuleHandle,
    source_file: Option<Utf8PathBuf>,
    llvm: LlvmModule<'ctx>,
}

impl<'ctx> Module<'ctx> {
    pub fn handle(&self) -> ModuleHandle {
        self.handle
    }

    pub fn source_file(&self) -> Option<&Utf8Path> {
        self.source_file.as_deref()
    }

    pub fn llvm(&self) -> &LlvmModule<'ctx> {
        &self.llvm
    }

    pub fn functions(&self) -> impl Iterator<Item = Function<'ctx>> + '_ {
        let handle = self.handle;
        self.llvm.get_functions().map(move |f| Function::new(handle, f))
    }

    pub fn get_function(&self, name: &str) -> Option<Function<'ctx>> {
        self.llvm.get_function(name).map(|f| Function::new(self.handle, f))
    }
}

/// Owns every parsed [`Module`] and the baseline [`Object`] cache. Other components hold
/// [`ModuleHandle`]s and look modules up through here rather than owning them directly.
/// Append-only within a run — removal is not supported.
pub struct ModuleStore<'ctx> {
    context: &'ctx Context,
    modules: Vec<Module<'ctx>>,
    baseline_objects: FxHashMap<ModuleHandle, Object>,
}

impl<'ctx> ModuleStore<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context, modules: Vec::new(), baseline_objects: FxHashMap::default() }
    }

    pub fn context(&self) -> &'ctx Context {
        self.context
    }

    /// Loads one module via `loader` and appends it to the store, returning its new handle.
    pub fn load(&mut self, loader: &dyn ModuleLoader<'ctx>, path: &Utf8Path) -> Result<ModuleHandle, LoadError> {
        let llvm = loader.load_module_at_path(self.context, path)?;
        let handle = ModuleHandle(self.modules.len() as u32);
        self.modules.push(Module { handle, source_file: Some(path.to_owned()), llvm });
        Ok(handle)
    }

    pub fn get(&self, handle: ModuleHandle) -> &Module<'ctx> {
        &self.modules[handle.0 as usize]
    }

    pub fn iter_all(&self) -> impl Iterator<Item = ModuleHandle> + '_ {
        self.modules.iter().map(|m| m.handle)
    }

    /// Resolves a callee by exact symbol name across every loaded module, used by the Test
    /// Finder's call-graph traversal. Multiple modules defining the same symbol
    /// is undefined behaviour at link time, not something this store arbitrates; the first
    /// defining module found wins.
    pub fn find_function(&self, name: &str) -> Option<Function<'ctx>> {
        self.modules.iter()
            .find_map(|m| m.get_function(name).filter(|f| !f.is_declaration_only()))
    }

    pub fn baseline_object(&self, handle: ModuleHandle) -> Option<&Object> {
        self.baseline_objects.get(&handle)
    }

    pub fn set_baseline_object(&mut self, handle: ModuleHandle, object: Object) {
        self.baseline_objects.insert(handle, object);
    }

    /// The baseline objects of every module except `excluded` — the "others" set assembled
    /// before running a mutant, so every module the mutant doesn't touch still links in its
    /// unmutated form.
    pub fn baseline_objects_excluding(&self, excluded: ModuleHandle) -> Vec<&Object> {
        self.modules.iter()
            .filter(|m| m.handle != excluded)
            .filter_map(|m| self.baseline_object(m.handle))
            .collect()
    }
}
