use inkwell::values::FunctionValue;

use crate::module::ModuleHandle;

/// A function belonging to exactly one [`crate::module::Module`].
#[derive(Clone)]
pub struct Function<'ctx> {
    pub name: String,
    pub parent: ModuleHandle,
    pub(crate) value: FunctionValue<'ctx>,
}

impl<'ctx> Function<'ctx> {
    pub(crate) fn new(parent: ModuleHandle, value: FunctionValue<'ctx>) -> Self {
        Self { name: value.get_name().to_string_lossy().into_owned(), parent, value }
    }

    /// Builds a `Function` directly from an `inkwell` value, bypassing the `ModuleStore`.
    /// Exists so operator crates can unit-test `Operator::scan` against hand-built IR without
    /// constructing a full `ModuleStore`.
    pub fn from_value(parent: ModuleHandle, value: FunctionValue<'ctx>) -> Self {
        Self::new(parent, value)
    }

    pub fn value(&self) -> FunctionValue<'ctx> {
        self.value
    }

    pub fn is_declaration_only(&self) -> bool {
        self.value.get_first_basic_block().is_none()
    }
}

impl std::fmt::Debug for Function<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function").field("name", &self.name).field("parent", &self.parent).finish()
    }
}
