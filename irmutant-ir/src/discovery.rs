use rustc_hash::FxHashSet;

use crate::function::Function;
use crate::module::ModuleStore;
use crate::mutation::{MutationPoint, Operator};

/// How the Test Runner should interpret a test function's return value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestAdapter {
    /// `() -> i32`, C `main`-like convention: `0` is pass, anything else is fail.
    ReturnCode,
    /// `() -> i1`/`() -> i8`, xUnit-style convention: nonzero/true is pass.
    Boolean,
}

/// The test-framework convention a [`Test`] was discovered under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestKind {
    SimpleMain,
    Registered,
}

/// A polymorphic record identifying a test entry point.
pub struct Test<'ctx> {
    pub display_name: String,
    pub function: Function<'ctx>,
    pub kind: TestKind,
    pub adapter: TestAdapter,
}

/// A function reachable from a [`Test`] that is a candidate for mutation.
pub struct Testee<'ctx> {
    pub function: Function<'ctx>,
}

const SIMPLE_TEST_PREFIX: &str = "test_";

/// Named metadata convention used to surface xUnit-style statically registered tests to IR:
/// each operand is an `MDNode` of `[function, !"display name"]`. Real xUnit-for-C++ frameworks
/// register tests via static initializers, which disappear by the time bitcode is emitted
/// unless the frontend also threads the registration through named metadata like this; we take
/// that as the IR-level contract.
const REGISTERED_TESTS_METADATA: &str = "irmutant.tests";

/// Scans all modules in the Store for test entry points.
pub fn find_tests<'ctx>(store: &ModuleStore<'ctx>) -> Vec<Test<'ctx>> {
    let mut tests = Vec::new();

    for handle in store.iter_all() {
        let module = store.get(handle);

        for function in module.functions() {
            if function.is_declaration_only() {
                continue;
            }
            if let Some(name) = function.name.strip_prefix(SIMPLE_TEST_PREFIX) {
                tests.push(Test {
                    display_name: name.to_owned(),
                    function,
                    kind: TestKind::SimpleMain,
                    adapter: TestAdapter::ReturnCode,
                });
            }
        }

        for (display_name, function_name) in registered_tests(module.llvm()) {
            let Some(function) = module.get_function(&function_name) else { continue };
            tests.push(Test { display_name, function, kind: TestKind::Registered, adapter: TestAdapter::Boolean });
        }
    }

    tests
}

fn registered_tests(llvm_module: &inkwell::module::Module<'_>) -> Vec<(String, String)> {
    llvm_module.get_global_metadata(REGISTERED_TESTS_METADATA).iter()
        .filter_map(|node| {
            let values = node.get_node_values();
            let [func, name] = <[_; 2]>::try_from(values).ok()?;
            let function = func.into_function_value();
            let display_name = name.into_metadata_value().get_string_value()?.to_str().ok()?.to_owned();
            Some((display_name, function.get_name().to_string_lossy().into_owned()))
        })
        .collect()
}

/// Deterministic preorder traversal of the call graph rooted at `test.function`, yielding each
/// distinct function at most once and excluding the test function itself. Calls
/// to functions not resolvable within the Store (external/unresolved callees, or indirect
/// calls) are skipped silently.
pub fn find_testees<'ctx>(store: &ModuleStore<'ctx>, test: &Test<'ctx>) -> Vec<Testee<'ctx>> {
    let mut visited = FxHashSet::default();
    visited.insert(test.function.name.clone());

    let mut testees = Vec::new();
    visit_callees(store, &test.function, &mut visited, &mut testees);
    testees
}

fn visit_callees<'ctx>(store: &ModuleStore<'ctx>, function: &Function<'ctx>, visited: &mut FxHashSet<String>, out: &mut Vec<Testee<'ctx>>) {
    for callee_name in direct_callees(function) {
        if !visited.insert(callee_name.clone()) {
            continue;
        }
        let Some(callee) = store.find_function(&callee_name) else { continue };

        out.push(Testee { function: callee.clone() });
        visit_callees(store, &callee, visited, out);
    }
}

/// The names of every directly-called function in `function`'s body, in instruction order.
/// Indirect calls (no callee `FunctionValue`, e.g. calls through a function pointer) are
/// skipped.
fn direct_callees(function: &Function<'_>) -> Vec<String> {
    let mut names = Vec::new();

    let Some(mut block) = function.value().get_first_basic_block() else { return names };
    loop {
        let mut instr = block.get_first_instruction();
        while let Some(current) = instr {
            if current.get_opcode() == inkwell::values::InstructionOpcode::Call {
                if let Some(callee) = called_function_name(&current) {
                    names.push(callee);
                }
            }
            instr = current.get_next_instruction();
        }

        match block.get_next_basic_block() {
            Some(next) => block = next,
            None => break,
        }
    }

    names
}

fn called_function_name(call_instr: &inkwell::values::InstructionValue<'_>) -> Option<String> {
    let operand_count = call_instr.get_num_operands();
    if operand_count == 0 {
        return None;
    }
    // The callee is always the last operand of a `call` instruction.
    let callee_operand = call_instr.get_operand(operand_count - 1)?.left()?;
    let function = callee_operand.into_function_value_opt()?;
    Some(function.get_name().to_string_lossy().into_owned())
}

/// For each operator, scans `testee`'s function body and concatenates produced points.
/// Ordering is stable by (operator registration order, instruction index) — the concatenation
/// order already satisfies this, since each [`Operator::scan`] itself visits instructions in
/// index order.
pub fn find_mutation_points<'ctx>(operators: &[&dyn Operator], testee: &Testee<'ctx>) -> Vec<MutationPoint<'ctx>> {
    operators.iter().flat_map(|op| op.scan(&testee.function)).collect()
}
