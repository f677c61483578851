use inkwell::values::InstructionOpcode;

use irmutant_ir::{Function, FloatArithOp, IntArithOp, MutationPoint, Operator, OperatorKind, Rewrite};

use crate::scan;

/// Replaces addition with subtraction, for both integer and floating-point arithmetic.
pub struct MathAdd;

impl Operator for MathAdd {
    fn kind(&self) -> OperatorKind {
        OperatorKind::MATH_ADD
    }

    fn scan<'ctx>(&self, function: &Function<'ctx>) -> Vec<MutationPoint<'ctx>> {
        scan::instructions(function.value()).into_iter()
            .filter_map(|instr| {
                let location = scan::source_location(&instr);
                let (lhs, rhs) = scan::binary_operands(&instr)?;

                let rewrite = if scan::opcode_is(&instr, InstructionOpcode::Add) {
                    Rewrite::IntArith { original: IntArithOp::Add, mutated: IntArithOp::Sub, lhs: lhs.into_int_value(), rhs: rhs.into_int_value() }
                } else if scan::opcode_is(&instr, InstructionOpcode::FAdd) {
                    Rewrite::FloatArith { original: FloatArithOp::Add, mutated: FloatArithOp::Sub, lhs: lhs.into_float_value(), rhs: rhs.into_float_value() }
                } else {
                    return None;
                };

                Some(MutationPoint::new(self.kind(), function.parent, instr, location, rewrite))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use inkwell::context::Context;
    use irmutant_ir::{Function, ModuleHandle};

    use super::*;

    #[test]
    fn scans_an_integer_add_into_a_single_point() {
        let context = Context::create();
        let module = context.create_module("m");
        let builder = context.create_builder();

        let i32_ty = context.i32_type();
        let fn_value = module.add_function("sum", i32_ty.fn_type(&[i32_ty.into(), i32_ty.into()], false), None);
        let block = context.append_basic_block(fn_value, "entry");
        builder.position_at_end(block);
        let a = fn_value.get_nth_param(0).unwrap().into_int_value();
        let b = fn_value.get_nth_param(1).unwrap().into_int_value();
        let sum = builder.build_int_add(a, b, "sum").unwrap();
        builder.build_return(Some(&sum)).unwrap();

        let function = Function::from_value(ModuleHandle::for_testing(0), fn_value);
        let points = MathAdd.scan(&function);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].operator_kind, OperatorKind::MATH_ADD);
    }

    /// `++` lowers to `add i32 %x, 1`, the same instruction shape as any other add; no special
    /// casing is needed to catch it, per spec.md's "`++` is add-by-one" note.
    #[test]
    fn scans_an_increment_by_one_the_same_as_any_other_add() {
        let context = Context::create();
        let module = context.create_module("m");
        let builder = context.create_builder();

        let i32_ty = context.i32_type();
        let fn_value = module.add_function("increment", i32_ty.fn_type(&[i32_ty.into()], false), None);
        let block = context.append_basic_block(fn_value, "entry");
        builder.position_at_end(block);
        let a = fn_value.get_nth_param(0).unwrap().into_int_value();
        let one = i32_ty.const_int(1, false);
        let incremented = builder.build_int_add(a, one, "incremented").unwrap();
        builder.build_return(Some(&incremented)).unwrap();

        let function = Function::from_value(ModuleHandle::for_testing(0), fn_value);
        assert_eq!(MathAdd.scan(&function).len(), 1);
    }

    #[test]
    fn leaves_subtraction_untouched() {
        let context = Context::create();
        let module = context.create_module("m");
        let builder = context.create_builder();

        let i32_ty = context.i32_type();
        let fn_value = module.add_function("diff", i32_ty.fn_type(&[i32_ty.into(), i32_ty.into()], false), None);
        let block = context.append_basic_block(fn_value, "entry");
        builder.position_at_end(block);
        let a = fn_value.get_nth_param(0).unwrap().into_int_value();
        let b = fn_value.get_nth_param(1).unwrap().into_int_value();
        let diff = builder.build_int_sub(a, b, "diff").unwrap();
        builder.build_return(Some(&diff)).unwrap();

        let function = Function::from_value(ModuleHandle::for_testing(0), fn_value);
        assert!(MathAdd.scan(&function).is_empty());
    }
}
