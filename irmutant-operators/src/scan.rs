use inkwell::values::{BasicValueEnum, FunctionValue, InstructionOpcode, InstructionValue};

use irmutant_ir::SourceLocation;

/// Every instruction in `function`, in the deterministic block/instruction order the Test
/// Finder relies on for ordering mutation points.
pub fn instructions(function: FunctionValue<'_>) -> Vec<InstructionValue<'_>> {
    let mut out = Vec::new();
    let mut block = function.get_first_basic_block();
    while let Some(current) = block {
        let mut instr = current.get_first_instruction();
        while let Some(i) = instr {
            instr = i.get_next_instruction();
            out.push(i);
        }
        block = current.get_next_basic_block();
    }
    out
}

pub fn binary_operands<'ctx>(instr: &InstructionValue<'ctx>) -> Option<(BasicValueEnum<'ctx>, BasicValueEnum<'ctx>)> {
    if instr.get_num_operands() != 2 {
        return None;
    }
    let lhs = instr.get_operand(0)?.left()?;
    let rhs = instr.get_operand(1)?.left()?;
    Some((lhs, rhs))
}

pub fn opcode_is(instr: &InstructionValue<'_>, opcode: InstructionOpcode) -> bool {
    instr.get_opcode() == opcode
}

pub fn source_location(instr: &InstructionValue<'_>) -> Option<SourceLocation> {
    SourceLocation::of_instruction(instr)
}
