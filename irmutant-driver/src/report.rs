use irmutant_ir::{ExecutionResult, ExecutionStatus, TestResult};

/// Renders a full run as a line-oriented, human-readable structure:
///
/// ```text
/// test: <name>
///   baseline: {status, time_ns}
///   mutants:
///     - operator: <kind>
///       location: {path, line, column} | null
///       result: {status, time_ns}
/// ```
///
/// See [`to_json`] for a machine-readable alternative.
pub fn render_text(results: &[TestResult]) -> String {
    let mut out = String::new();

    for result in results {
        out.push_str(&format!("test: {}\n", result.test_name));
        out.push_str(&format!("  baseline: {}\n", render_execution(&result.baseline)));
        out.push_str("  mutants:\n");
        for mutation in &result.mutations {
            out.push_str(&format!("    - operator: {}\n", mutation.operator_kind));
            out.push_str(&format!("      location: {}\n", render_location(&mutation.location)));
            out.push_str(&format!("      result: {}\n", render_execution(&mutation.mutant)));
        }
    }

    out
}

fn render_execution(result: &ExecutionResult) -> String {
    format!("{{status: {}, time_ns: {}}}", render_status(result.status), result.running_time_nanos)
}

fn render_status(status: ExecutionStatus) -> &'static str {
    match status {
        ExecutionStatus::Passed => "Passed",
        ExecutionStatus::Failed => "Failed",
        ExecutionStatus::Invalid => "Invalid",
    }
}

fn render_location(location: &Option<(String, u32, u32)>) -> String {
    match location {
        Some((path, line, column)) => format!("{{path: {path}, line: {line}, column: {column}}}"),
        None => "null".to_owned(),
    }
}

pub fn to_json(results: &[TestResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

#[cfg(test)]
mod tests {
    use irmutant_ir::MutationResult;

    use super::*;

    fn passed(nanos: u128) -> ExecutionResult {
        ExecutionResult { status: ExecutionStatus::Passed, running_time_nanos: nanos }
    }

    #[test]
    fn renders_a_test_with_no_mutants() {
        let result = TestResult { test_name: "trivial".to_owned(), baseline: passed(100), mutations: Vec::new() };
        let text = render_text(&[result]);
        assert_eq!(text, "test: trivial\n  baseline: {status: Passed, time_ns: 100}\n  mutants:\n");
    }

    #[test]
    fn renders_a_null_location() {
        let result = TestResult {
            test_name: "t".to_owned(),
            baseline: passed(1),
            mutations: vec![MutationResult {
                test_name: "t".to_owned(),
                testee_name: "f".to_owned(),
                operator_kind: "MathAdd".to_owned(),
                location: None,
                baseline: passed(1),
                mutant: passed(2),
                killed: false,
            }],
        };
        assert!(render_text(&[result]).contains("      location: null\n"));
    }
}
