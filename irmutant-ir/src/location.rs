use camino::Utf8PathBuf;
use inkwell::values::{AsValueRef, InstructionValue};
use llvm_sys::debuginfo::{LLVMDILocationGetColumn, LLVMDILocationGetLine, LLVMDIScopeGetFile};
use llvm_sys::debuginfo::LLVMDIFileGetFilename;
use llvm_sys::core::LLVMGetMetadata;

/// Either null (IR lacks debug metadata for the instruction) or a (path, line, column)
/// triple derived from the instruction's `!dbg` attachment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub path: Utf8PathBuf,
    pub line: u32,
    pub column: u32,
}

/// LLVM's metadata "kind ID" for the `!dbg` instruction attachment is the fixed constant `0`,
/// reserved by LLVM itself (see `LLVMContext::MD_dbg`). `inkwell` does not expose a structured
/// accessor for it, so we read the raw metadata node through `llvm-sys` instead.
const DBG_METADATA_KIND_ID: u32 = 0;

impl SourceLocation {
    /// Reads the `!dbg` debug-location metadata off an instruction, if present.
    ///
    /// Instructions produced by `-g`-compiled frontends carry this; instructions that are
    /// purely compiler-synthesised (exception-handling landing pads, implicit conversions,
    /// vtable thunks) typically do not, which is exactly the signal the junk detector's first
    /// rule relies on.
    pub fn of_instruction(instr: &InstructionValue<'_>) -> Option<Self> {
        // SAFETY: `instr` is a valid, live instruction owned by a module the store still holds;
        // `LLVMGetMetadata` returns null (mapped to `None` below) when no `!dbg` is attached.
        let dbg_loc = unsafe { LLVMGetMetadata(instr.as_value_ref(), DBG_METADATA_KIND_ID) };
        if dbg_loc.is_null() {
            return None;
        }

        // SAFETY: a non-null metadata node under the `!dbg` kind is always a `DILocation`.
        let (line, column, file) = unsafe {
            let scope = llvm_sys::debuginfo::LLVMDILocationGetScope(dbg_loc);
            (
                LLVMDILocationGetLine(dbg_loc),
                LLVMDILocationGetColumn(dbg_loc),
                LLVMDIScopeGetFile(scope),
            )
        };

        let path = unsafe {
            let mut len: std::os::raw::c_uint = 0;
            let ptr = LLVMDIFileGetFilename(file, &mut len);
            if ptr.is_null() {
                return None;
            }
            let bytes = std::slice::from_raw_parts(ptr as *const u8, len as usize);
            Utf8PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
        };

        Some(Self { path, line, column })
    }
}
