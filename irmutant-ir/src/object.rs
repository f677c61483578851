use inkwell::module::Module as LlvmModule;
use inkwell::targets::{CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine};
use inkwell::OptimizationLevel;

use crate::error::CompileError;

/// The native-code compilation of one [`crate::module::Module`] at one point in time.
/// Cheap to move around; transient objects (post-mutation) are never cached,
/// only the baseline compilation the [`crate::module::ModuleStore`] keeps per handle.
#[derive(Clone)]
pub struct Object {
    pub module_name: String,
    pub bytes: Vec<u8>,
}

/// Compiles an IR module to an in-memory native object. Holds no state between calls beyond
/// what the underlying code generator requires; caching baselines is the Module Store's job,
/// caching (or not caching) transients is the Driver's job.
pub struct Compiler {
    target_machine: TargetMachine,
}

impl Compiler {
    /// Initializes the native target and selects a [`TargetMachine`] for the host triple.
    pub fn for_host() -> Result<Self, CompileError> {
        Target::initialize_native(&InitializationConfig::default())
            .map_err(CompileError::TargetInit)?;

        let triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&triple)
            .map_err(|e| CompileError::TargetMachine { triple: triple.as_str().to_string_lossy().into_owned(), message: e.to_string() })?;

        let cpu = TargetMachine::get_host_cpu_name();
        let features = TargetMachine::get_host_cpu_features();

        let target_machine = target.create_target_machine(
            &triple,
            cpu.to_str().unwrap_or("generic"),
            features.to_str().unwrap_or(""),
            OptimizationLevel::None,
            RelocMode::PIC,
            CodeModel::Default,
        ).ok_or_else(|| CompileError::TargetMachine { triple: triple.as_str().to_string_lossy().into_owned(), message: "target machine creation returned None".to_owned() })?;

        Ok(Self { target_machine })
    }

    /// Produces a freshly owned native object representing exactly the current IR of `module`.
    /// Mutation points must have already been applied/reverted as desired by the caller before
    /// this is called; the compiler itself never inspects or changes mutation state.
    pub fn compile(&self, module: &LlvmModule<'_>) -> Result<Object, CompileError> {
        let module_name = module.get_name().to_string_lossy().into_owned();

        let buffer = self.target_machine
            .write_to_memory_buffer(module, FileType::Object)
            .map_err(|e| CompileError::Emit(e.to_string()))?;

        Ok(Object { module_name, bytes: buffer.as_slice().to_vec() })
    }
}
