use std::cell::Cell;

use inkwell::values::{FloatValue, InstructionValue, IntValue};
use inkwell::{FloatPredicate, IntPredicate};

use crate::function::Function;
use crate::location::SourceLocation;
use crate::module::ModuleHandle;

/// The identifier of a [`Operator`], used by the Junk Detector to pick a source-level visitor.
/// Represented as an interned name rather than a closed enum so the catalogue
/// stays extensible: operators the Junk Detector doesn't recognise by name simply
/// default to "not junk".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OperatorKind(pub &'static str);

impl OperatorKind {
    pub const CONDITIONALS_BOUNDARY: Self = Self("ConditionalsBoundary");
    pub const MATH_ADD: Self = Self("MathAdd");
    pub const MATH_SUB: Self = Self("MathSub");
}

impl std::fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Integer arithmetic opcodes `MathAdd`/`MathSub` swap between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntArithOp {
    Add,
    Sub,
}

/// Floating-point arithmetic opcodes `MathAdd`/`MathSub` swap between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatArithOp {
    Add,
    Sub,
}

/// The minimum state needed to rebuild either side of a mutation: the operand values survive
/// unchanged (they're referenced, not owned, by the instruction being replaced), only the
/// opcode/predicate differs between `original` and `mutated`. Rebuilding from this is cheaper
/// than cloning a whole instruction.
#[derive(Clone, Copy)]
pub enum Rewrite<'ctx> {
    IntPredicate { original: IntPredicate, mutated: IntPredicate, lhs: IntValue<'ctx>, rhs: IntValue<'ctx> },
    IntArith { original: IntArithOp, mutated: IntArithOp, lhs: IntValue<'ctx>, rhs: IntValue<'ctx> },
    FloatArith { original: FloatArithOp, mutated: FloatArithOp, lhs: FloatValue<'ctx>, rhs: FloatValue<'ctx> },
}

impl<'ctx> Rewrite<'ctx> {
    /// `name` is the target instruction's original register name, so a rebuild — forward or
    /// reverted — never leaves the IR with a freshly renumbered anonymous name where the
    /// original one (e.g. `%result`) used to be.
    fn build(&self, builder: &inkwell::builder::Builder<'ctx>, forward: bool, name: &str) -> InstructionValue<'ctx> {
        let value = match *self {
            Rewrite::IntPredicate { original, mutated, lhs, rhs } => {
                let predicate = if forward { mutated } else { original };
                builder.build_int_compare(predicate, lhs, rhs, name).expect("icmp rebuild should not fail")
            }
            Rewrite::IntArith { original, mutated, lhs, rhs } => {
                let op = if forward { mutated } else { original };
                match op {
                    IntArithOp::Add => builder.build_int_add(lhs, rhs, name).expect("iadd rebuild should not fail"),
                    IntArithOp::Sub => builder.build_int_sub(lhs, rhs, name).expect("isub rebuild should not fail"),
                }
            }
            Rewrite::FloatArith { original, mutated, lhs, rhs } => {
                let op = if forward { mutated } else { original };
                match op {
                    FloatArithOp::Add => builder.build_float_add(lhs, rhs, name).expect("fadd rebuild should not fail"),
                    FloatArithOp::Sub => builder.build_float_sub(lhs, rhs, name).expect("fsub rebuild should not fail"),
                }
            }
        };
        value.as_instruction_value().expect("rebuilt binary instruction always has an instruction value")
    }
}

/// A fully specified, reversible pending edit. `apply`/`revert` compose to the
/// identity on the IR; their lifetime spans one pipeline iteration (one test × testee ×
/// mutation point), never longer. No two `MutationPoint`s on the same instruction may be
/// "applied" simultaneously — enforced here by tracking `applied` and panicking on misuse
/// rather than silently double-mutating the module.
pub struct MutationPoint<'ctx> {
    pub operator_kind: OperatorKind,
    pub module: ModuleHandle,
    pub location: Option<SourceLocation>,
    instruction: Cell<InstructionValue<'ctx>>,
    /// The target instruction's original register name, preserved so `apply`/`revert` rebuild
    /// under the same name rather than an anonymous, freshly renumbered one.
    original_name: String,
    rewrite: Rewrite<'ctx>,
    applied: Cell<bool>,
}

impl<'ctx> MutationPoint<'ctx> {
    pub fn new(operator_kind: OperatorKind, module: ModuleHandle, instruction: InstructionValue<'ctx>, location: Option<SourceLocation>, rewrite: Rewrite<'ctx>) -> Self {
        let original_name = instruction.get_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
        Self { operator_kind, module, location, instruction: Cell::new(instruction), original_name, rewrite, applied: Cell::new(false) }
    }

    pub fn is_applied(&self) -> bool {
        self.applied.get()
    }

    /// Replaces the target instruction with its mutated form. The previous instruction is
    /// unlinked from its basic block; the new one takes over its uses.
    pub fn apply(&self, builder: &inkwell::builder::Builder<'ctx>) {
        assert!(!self.applied.get(), "mutation point applied twice without an intervening revert");
        self.rewire(builder, /* forward */ true);
        self.applied.set(true);
    }

    /// Restores the pre-`apply` form. Composing `apply` then `revert` leaves the IR bitwise
    /// equal to before `apply` was called.
    pub fn revert(&self, builder: &inkwell::builder::Builder<'ctx>) {
        assert!(self.applied.get(), "mutation point reverted without having been applied");
        self.rewire(builder, /* forward */ false);
        self.applied.set(false);
    }

    fn rewire(&self, builder: &inkwell::builder::Builder<'ctx>, forward: bool) {
        let current = self.instruction.get();
        builder.position_before(&current);
        let replacement = self.rewrite.build(builder, forward, &self.original_name);
        current.replace_all_uses_with(&replacement);
        current.erase_from_basic_block();
        self.instruction.set(replacement);
    }
}

/// Polymorphic over `{ scan, kind }`. Scanning must not mutate IR: a conforming
/// `Operator` only reads instructions to decide whether they're a candidate, and returns
/// [`Rewrite`] descriptions whose operands are borrowed straight from the existing instruction.
pub trait Operator {
    fn kind(&self) -> OperatorKind;

    fn scan<'ctx>(&self, function: &Function<'ctx>) -> Vec<MutationPoint<'ctx>>;
}

#[cfg(test)]
mod tests {
    use inkwell::context::Context;

    use crate::module::ModuleHandle;

    use super::*;

    /// The round-trip law spec.md §8 requires of every operator: `revert() ∘ apply()` leaves
    /// the IR bitwise equal to the pre-apply IR. `IntArith` stands in for any `Rewrite` variant
    /// since they all share the same `rewire` machinery.
    #[test]
    fn apply_then_revert_restores_the_original_opcode() {
        let context = Context::create();
        let module = context.create_module("m");
        let builder = context.create_builder();

        let i32_ty = context.i32_type();
        let fn_value = module.add_function("sum", i32_ty.fn_type(&[i32_ty.into(), i32_ty.into()], false), None);
        let block = context.append_basic_block(fn_value, "entry");
        builder.position_at_end(block);
        let a = fn_value.get_nth_param(0).unwrap().into_int_value();
        let b = fn_value.get_nth_param(1).unwrap().into_int_value();
        let add = builder.build_int_add(a, b, "result").unwrap();
        builder.build_return(Some(&add)).unwrap();

        let instr = add.as_instruction_value().unwrap();
        assert_eq!(instr.get_opcode(), inkwell::values::InstructionOpcode::Add);

        let rewrite = Rewrite::IntArith { original: IntArithOp::Add, mutated: IntArithOp::Sub, lhs: a, rhs: b };
        let point = MutationPoint::new(OperatorKind::MATH_ADD, ModuleHandle::for_testing(0), instr, None, rewrite);

        assert!(!point.is_applied());
        point.apply(&builder);
        assert!(point.is_applied());
        assert_eq!(arithmetic_opcode(fn_value), inkwell::values::InstructionOpcode::Sub);

        point.revert(&builder);
        assert!(!point.is_applied());
        assert_eq!(arithmetic_opcode(fn_value), inkwell::values::InstructionOpcode::Add);
    }

    /// The entry block's sole non-terminator instruction — the add/sub under test.
    fn arithmetic_opcode(fn_value: inkwell::values::FunctionValue<'_>) -> inkwell::values::InstructionOpcode {
        let mut instr = fn_value.get_first_basic_block().unwrap().get_first_instruction();
        loop {
            let current = instr.expect("function body has no non-terminator instruction");
            if current.get_opcode() != inkwell::values::InstructionOpcode::Return {
                return current.get_opcode();
            }
            instr = current.get_next_instruction();
        }
    }

    #[test]
    #[should_panic(expected = "applied twice")]
    fn applying_twice_without_revert_panics() {
        let context = Context::create();
        let module = context.create_module("m");
        let builder = context.create_builder();

        let i32_ty = context.i32_type();
        let fn_value = module.add_function("sum", i32_ty.fn_type(&[i32_ty.into(), i32_ty.into()], false), None);
        let block = context.append_basic_block(fn_value, "entry");
        builder.position_at_end(block);
        let a = fn_value.get_nth_param(0).unwrap().into_int_value();
        let b = fn_value.get_nth_param(1).unwrap().into_int_value();
        let add = builder.build_int_add(a, b, "result").unwrap();
        builder.build_return(Some(&add)).unwrap();

        let instr = add.as_instruction_value().unwrap();
        let rewrite = Rewrite::IntArith { original: IntArithOp::Add, mutated: IntArithOp::Sub, lhs: a, rhs: b };
        let point = MutationPoint::new(OperatorKind::MATH_ADD, ModuleHandle::for_testing(0), instr, None, rewrite);

        point.apply(&builder);
        point.apply(&builder);
    }
}
