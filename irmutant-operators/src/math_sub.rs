use inkwell::values::InstructionOpcode;

use irmutant_ir::{Function, FloatArithOp, IntArithOp, MutationPoint, Operator, OperatorKind, Rewrite};

use crate::scan;

/// Replaces subtraction with addition, for both integer and floating-point arithmetic.
/// The mirror image of [`crate::math_add::MathAdd`]: kept
/// as a separate operator rather than one bidirectional swap so the catalogue can enable/disable
/// each direction independently.
pub struct MathSub;

impl Operator for MathSub {
    fn kind(&self) -> OperatorKind {
        OperatorKind::MATH_SUB
    }

    fn scan<'ctx>(&self, function: &Function<'ctx>) -> Vec<MutationPoint<'ctx>> {
        scan::instructions(function.value()).into_iter()
            .filter_map(|instr| {
                let location = scan::source_location(&instr);
                let (lhs, rhs) = scan::binary_operands(&instr)?;

                let rewrite = if scan::opcode_is(&instr, InstructionOpcode::Sub) {
                    Rewrite::IntArith { original: IntArithOp::Sub, mutated: IntArithOp::Add, lhs: lhs.into_int_value(), rhs: rhs.into_int_value() }
                } else if scan::opcode_is(&instr, InstructionOpcode::FSub) {
                    Rewrite::FloatArith { original: FloatArithOp::Sub, mutated: FloatArithOp::Add, lhs: lhs.into_float_value(), rhs: rhs.into_float_value() }
                } else {
                    return None;
                };

                Some(MutationPoint::new(self.kind(), function.parent, instr, location, rewrite))
            })
            .collect()
    }
}
