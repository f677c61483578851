//! End-to-end scenarios covering a passing test with no mutants, a boundary mutation that gets
//! killed, and an arithmetic mutation that survives. Each builds tiny IR directly with `inkwell`'s
//! builder API and hands it to the pipeline through an in-memory `ModuleLoader`, instead of
//! depending on bitcode fixtures on disk.
//!
//! These exercise the real host LLVM target and system linker end to end, so they're excluded
//! from the default test run on machines without a native toolchain available.

use inkwell::context::Context;
use inkwell::IntPredicate;

use irmutant_driver::config::{Config, Options};
use irmutant_driver::CancellationToken;
use irmutant_ir::{ExecutionStatus, InMemoryModuleLoader};

fn run_one(context: &Context, path: &str, module: inkwell::module::Module<'_>) -> Vec<irmutant_ir::TestResult> {
    let loader = InMemoryModuleLoader::new();
    loader.insert(path, module);

    let config = Config {
        bitcode_paths: vec![path.into()],
        cxx_compilation_database_dir: None,
        cxx_compilation_flags: None,
        opts: Options::default(),
    };

    irmutant_driver::run(context, &config, &loader, &CancellationToken::new()).unwrap()
}

#[test]
#[ignore = "requires a real LLVM target and system `cc`"]
fn trivial_passing_test_with_an_unmutable_testee_produces_no_mutants() {
    let context = Context::create();
    let module = context.create_module("trivial");
    let builder = context.create_builder();
    let i32_ty = context.i32_type();

    let noop_fn = module.add_function("noop", i32_ty.fn_type(&[], false), None);
    builder.position_at_end(context.append_basic_block(noop_fn, "entry"));
    builder.build_return(Some(&i32_ty.const_int(0, false))).unwrap();

    let test_fn = module.add_function("test_trivial", i32_ty.fn_type(&[], false), None);
    builder.position_at_end(context.append_basic_block(test_fn, "entry"));
    builder.build_call(noop_fn, &[], "call").unwrap();
    builder.build_return(Some(&i32_ty.const_int(0, false))).unwrap();

    let results = run_one(&context, "trivial.bc", module);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].test_name, "trivial");
    assert_eq!(results[0].baseline.status, ExecutionStatus::Passed);
    assert!(results[0].mutations.is_empty());
}

#[test]
#[ignore = "requires a real LLVM target and system `cc`"]
fn conditionals_boundary_kills_a_test_that_distinguishes_the_boundary() {
    let context = Context::create();
    let module = context.create_module("boundary");
    let builder = context.create_builder();
    let i32_ty = context.i32_type();

    // at_least(a, b) = (a >= b) as i32
    let at_least_fn = module.add_function("at_least", i32_ty.fn_type(&[i32_ty.into(), i32_ty.into()], false), None);
    builder.position_at_end(context.append_basic_block(at_least_fn, "entry"));
    let a = at_least_fn.get_nth_param(0).unwrap().into_int_value();
    let b = at_least_fn.get_nth_param(1).unwrap().into_int_value();
    let cmp = builder.build_int_compare(IntPredicate::SGE, a, b, "cmp").unwrap();
    let as_i32 = builder.build_int_z_extend(cmp, i32_ty, "as_i32").unwrap();
    builder.build_return(Some(&as_i32)).unwrap();

    // test_at_least_boundary asserts at_least(2, 2) == 1 — true only for a non-strict `>=`,
    // so the `ConditionalsBoundary` mutant (`>=` -> `>`) flips the result and fails the test.
    let test_fn = module.add_function("test_at_least_boundary", i32_ty.fn_type(&[], false), None);
    let entry = context.append_basic_block(test_fn, "entry");
    let pass_block = context.append_basic_block(test_fn, "pass");
    let fail_block = context.append_basic_block(test_fn, "fail");
    builder.position_at_end(entry);
    let two = i32_ty.const_int(2, false);
    let call = builder.build_call(at_least_fn, &[two.into(), two.into()], "call").unwrap();
    let call_result = call.try_as_basic_value().left().unwrap().into_int_value();
    let matches = builder.build_int_compare(IntPredicate::EQ, call_result, i32_ty.const_int(1, false), "matches").unwrap();
    builder.build_conditional_branch(matches, pass_block, fail_block).unwrap();
    builder.position_at_end(pass_block);
    builder.build_return(Some(&i32_ty.const_int(0, false))).unwrap();
    builder.position_at_end(fail_block);
    builder.build_return(Some(&i32_ty.const_int(1, false))).unwrap();

    let results = run_one(&context, "boundary.bc", module);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].baseline.status, ExecutionStatus::Passed);
    let boundary_mutants: Vec<_> = results[0].mutations.iter()
        .filter(|m| m.operator_kind == "ConditionalsBoundary")
        .collect();
    assert_eq!(boundary_mutants.len(), 1);
    assert!(boundary_mutants[0].killed);
}

#[test]
#[ignore = "requires a real LLVM target and system `cc`"]
fn math_add_survives_a_test_that_does_not_pin_the_exact_sum() {
    let context = Context::create();
    let module = context.create_module("sum");
    let builder = context.create_builder();
    let i32_ty = context.i32_type();

    let sum_fn = module.add_function("sum", i32_ty.fn_type(&[i32_ty.into(), i32_ty.into()], false), None);
    builder.position_at_end(context.append_basic_block(sum_fn, "entry"));
    let a = sum_fn.get_nth_param(0).unwrap().into_int_value();
    let b = sum_fn.get_nth_param(1).unwrap().into_int_value();
    let result = builder.build_int_add(a, b, "result").unwrap();
    builder.build_return(Some(&result)).unwrap();

    // test_sum_not_five asserts sum(2, 2) != 5 — both the baseline (4) and the `MathAdd`
    // mutant's subtraction (0) satisfy that, so the mutant survives.
    let test_fn = module.add_function("test_sum_not_five", i32_ty.fn_type(&[], false), None);
    let entry = context.append_basic_block(test_fn, "entry");
    let pass_block = context.append_basic_block(test_fn, "pass");
    let fail_block = context.append_basic_block(test_fn, "fail");
    builder.position_at_end(entry);
    let two = i32_ty.const_int(2, false);
    let call = builder.build_call(sum_fn, &[two.into(), two.into()], "call").unwrap();
    let call_result = call.try_as_basic_value().left().unwrap().into_int_value();
    let is_five = builder.build_int_compare(IntPredicate::EQ, call_result, i32_ty.const_int(5, false), "is_five").unwrap();
    builder.build_conditional_branch(is_five, fail_block, pass_block).unwrap();
    builder.position_at_end(pass_block);
    builder.build_return(Some(&i32_ty.const_int(0, false))).unwrap();
    builder.position_at_end(fail_block);
    builder.build_return(Some(&i32_ty.const_int(1, false))).unwrap();

    let results = run_one(&context, "sum.bc", module);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].baseline.status, ExecutionStatus::Passed);
    let add_mutants: Vec<_> = results[0].mutations.iter()
        .filter(|m| m.operator_kind == "MathAdd")
        .collect();
    assert_eq!(add_mutants.len(), 1);
    assert!(!add_mutants[0].killed);
}
