use inkwell::values::InstructionOpcode;
use inkwell::IntPredicate;

use irmutant_ir::{Function, MutationPoint, Operator, OperatorKind, Rewrite};

use crate::scan;

/// Shifts the boundary of a relational comparison by one: `<` becomes `<=`, `>` becomes `>=`,
/// and vice versa, for both signed and unsigned integer comparisons. Equality/inequality
/// (`EQ`/`NE`) are left alone, matching the classic PIT-style `ConditionalsBoundary` mutator.
pub struct ConditionalsBoundary;

fn boundary_shift(predicate: IntPredicate) -> Option<IntPredicate> {
    use IntPredicate::*;
    Some(match predicate {
        SLT => SLE,
        SLE => SLT,
        SGT => SGE,
        SGE => SGT,
        ULT => ULE,
        ULE => ULT,
        UGT => UGE,
        UGE => UGT,
        EQ | NE => return None,
    })
}

impl Operator for ConditionalsBoundary {
    fn kind(&self) -> OperatorKind {
        OperatorKind::CONDITIONALS_BOUNDARY
    }

    fn scan<'ctx>(&self, function: &Function<'ctx>) -> Vec<MutationPoint<'ctx>> {
        scan::instructions(function.value()).into_iter()
            .filter(|instr| scan::opcode_is(instr, InstructionOpcode::ICmp))
            .filter_map(|instr| {
                let original = instr.get_icmp_predicate()?;
                let mutated = boundary_shift(original)?;
                let (lhs, rhs) = scan::binary_operands(&instr)?;

                let rewrite = Rewrite::IntPredicate { original, mutated, lhs: lhs.into_int_value(), rhs: rhs.into_int_value() };
                let location = scan::source_location(&instr);
                Some(MutationPoint::new(self.kind(), function.parent, instr, location, rewrite))
            })
            .collect()
    }
}
