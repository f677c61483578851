//! Junk Detector: consults C/C++ source ASTs to filter out mutation points that are valid
//! IR but correspond to no real source-level construct — compiler-synthesised exception
//! handling, implicit conversions, template/macro boilerplate.

mod error;

pub use error::JunkDetectorError;

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clang::{BinaryOperator, Clang, EntityKind, EntityVisitResult, Index, UnaryOperator};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use irmutant_ir::{MutationPoint, OperatorKind};

/// Where the Junk Detector finds compiler flags for a source file it has not parsed yet.
#[derive(Clone, Debug, Default)]
pub struct CxxAstConfig {
    pub compilation_database_dir: Option<Utf8PathBuf>,
    pub compilation_flags: Option<String>,
}

/// A source range recovered from the AST that one of the three operator visitors recognizes as
/// a real occurrence of its operator.
#[derive(Clone, Copy, Debug)]
struct ScannedRange {
    operator_kind: OperatorKind,
    start_line: u32,
    start_column: u32,
    end_line: u32,
    end_column: u32,
}

impl ScannedRange {
    fn contains(&self, line: u32, column: u32) -> bool {
        (line, column) >= (self.start_line, self.start_column) && (line, column) <= (self.end_line, self.end_column)
    }

    /// A tightness metric for picking the smallest enclosing range: the
    /// AST doesn't expose a byte-accurate span, so (line span, column span) is an adequate
    /// proxy — everything that matters for a single mutation point lives on one or two lines.
    fn tightness(&self) -> (u32, u32) {
        (self.end_line - self.start_line, self.end_column.saturating_sub(self.start_column))
    }
}

/// One file's worth of pre-extracted operator occurrences, built once on first use and cached
/// by source path.
struct FileAst {
    ranges: Vec<ScannedRange>,
}

/// Consults C/C++ source ASTs to decide whether a [`MutationPoint`] corresponds to a real
/// source-level construct. Parsing is lazy and cached per source path; the
/// cache is safe to share across worker threads via a staged check/parse/commit
/// insert that never holds the lock across the (slow) parse itself.
pub struct JunkDetector {
    config: CxxAstConfig,
    clang: OnceCell<Clang>,
    cache: Mutex<FxHashMap<Utf8PathBuf, Arc<FileAst>>>,
}

impl JunkDetector {
    pub fn new(config: CxxAstConfig) -> Self {
        Self { config, clang: OnceCell::new(), cache: Mutex::new(FxHashMap::default()) }
    }

    /// `true` means discard. Implements the decision procedure:
    /// 1. null location → junk.
    /// 2./3. load (or reuse) the file's AST; a [`JunkDetectorError`] here is recovered by
    ///    treating the point as not-junk rather than aborting the whole run.
    /// 4./5. run the operator-specific visitor and check for an enclosing matching range;
    ///    operators the visitor doesn't recognize default to not-junk.
    pub fn is_junk(&self, point: &MutationPoint<'_>) -> bool {
        let Some(location) = &point.location else { return true };

        let file_ast = match self.file_ast(&location.path) {
            Ok(ast) => ast,
            Err(err) => {
                tracing::warn!(error = %err, path = %location.path, "junk detector failed; treating point as not-junk");
                return false;
            }
        };

        if !is_recognized_kind(point.operator_kind) {
            return false;
        }

        !file_ast.ranges.iter()
            .filter(|r| r.operator_kind == point.operator_kind)
            .any(|r| r.contains(location.line, location.column))
    }

    fn file_ast(&self, path: &Utf8Path) -> Result<Arc<FileAst>, JunkDetectorError> {
        if let Some(hit) = self.cache.lock().get(path) {
            return Ok(hit.clone());
        }

        // Parse outside the lock; only the map mutation itself is serialized.
        let parsed = Arc::new(self.parse(path)?);

        let mut cache = self.cache.lock();
        Ok(cache.entry(path.to_owned()).or_insert(parsed).clone())
    }

    fn parse(&self, path: &Utf8Path) -> Result<FileAst, JunkDetectorError> {
        let clang = self.clang.get_or_try_init(|| Clang::new().map_err(|message| JunkDetectorError::ClangInit { message }))?;
        let index = Index::new(clang, false, false);

        let args = self.arguments_for(path)?;
        let translation_unit = index.parser(path.as_std_path())
            .arguments(&args)
            .parse()
            .map_err(|err| JunkDetectorError::Parse { path: path.to_owned(), message: err.to_string() })?;

        let root = translation_unit.get_entity();
        let mut ranges = Vec::new();
        let mut saw_file_entry = false;

        root.visit_children(|entity, _parent| {
            let Some(range) = entity.get_range() else { return EntityVisitResult::Recurse };
            let start = range.get_start().get_file_location();
            let Some(file) = start.file.as_ref() else { return EntityVisitResult::Recurse };

            if file.get_path().as_path() != path.as_std_path() {
                return EntityVisitResult::Recurse;
            }
            saw_file_entry = true;

            if let Some(operator_kind) = classify(&entity) {
                let end = range.get_end().get_file_location();
                ranges.push(ScannedRange {
                    operator_kind,
                    start_line: start.line,
                    start_column: start.column,
                    end_line: end.line,
                    end_column: end.column,
                });
            }

            EntityVisitResult::Recurse
        });

        if !saw_file_entry {
            return Err(JunkDetectorError::MissingFileEntry { path: path.to_owned() });
        }

        Ok(FileAst { ranges })
    }

    fn arguments_for(&self, path: &Utf8Path) -> Result<Vec<String>, JunkDetectorError> {
        if let Some(db_dir) = &self.config.compilation_database_dir {
            let database = clang::CompilationDatabase::from_directory(db_dir.as_std_path())
                .map_err(|()| JunkDetectorError::CompilationDatabase { dir: db_dir.clone() })?;

            if let Ok(commands) = database.get_compile_commands(path.as_std_path()) {
                if let Some(command) = commands.get_commands().into_iter().next() {
                    return Ok(command.get_arguments());
                }
            }
        }

        Ok(self.config.compilation_flags.as_deref()
            .map(|flags| flags.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default())
    }
}

fn is_recognized_kind(kind: OperatorKind) -> bool {
    matches!(kind, OperatorKind::CONDITIONALS_BOUNDARY | OperatorKind::MATH_ADD | OperatorKind::MATH_SUB)
}

/// Maps an AST entity to the operator kind whose visitor it satisfies.
fn classify(entity: &clang::Entity<'_>) -> Option<OperatorKind> {
    match entity.get_kind() {
        EntityKind::BinaryOperator | EntityKind::CompoundAssignOperator => {
            match entity.get_binary_operator()? {
                BinaryOperator::Less | BinaryOperator::LessEqual | BinaryOperator::Greater | BinaryOperator::GreaterEqual
                | BinaryOperator::Equal | BinaryOperator::NotEqual => Some(OperatorKind::CONDITIONALS_BOUNDARY),
                BinaryOperator::Add | BinaryOperator::AddAssign => Some(OperatorKind::MATH_ADD),
                BinaryOperator::Subtract | BinaryOperator::SubtractAssign => Some(OperatorKind::MATH_SUB),
                _ => None,
            }
        }
        EntityKind::UnaryOperator => {
            match entity.get_unary_operator()? {
                UnaryOperator::PostIncrement | UnaryOperator::PreIncrement => Some(OperatorKind::MATH_ADD),
                UnaryOperator::PostDecrement | UnaryOperator::PreDecrement => Some(OperatorKind::MATH_SUB),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(kind: OperatorKind, start: (u32, u32), end: (u32, u32)) -> ScannedRange {
        ScannedRange { operator_kind: kind, start_line: start.0, start_column: start.1, end_line: end.0, end_column: end.1 }
    }

    #[test]
    fn contains_is_inclusive_of_both_endpoints() {
        let r = range(OperatorKind::MATH_ADD, (4, 8), (4, 12));
        assert!(r.contains(4, 8));
        assert!(r.contains(4, 12));
        assert!(r.contains(4, 10));
        assert!(!r.contains(4, 13));
        assert!(!r.contains(3, 10));
    }

    #[test]
    fn tightness_orders_nested_ranges_correctly() {
        let inner = range(OperatorKind::MATH_ADD, (4, 8), (4, 12));
        let outer = range(OperatorKind::MATH_ADD, (2, 0), (6, 20));
        assert!(inner.tightness() < outer.tightness());
    }

    #[test]
    fn unrecognized_operator_kinds_default_to_not_junk() {
        assert!(!is_recognized_kind(OperatorKind("SomeCustomOperator")));
    }

    #[test]
    fn recognized_operator_kinds_are_exactly_the_built_in_three() {
        assert!(is_recognized_kind(OperatorKind::CONDITIONALS_BOUNDARY));
        assert!(is_recognized_kind(OperatorKind::MATH_ADD));
        assert!(is_recognized_kind(OperatorKind::MATH_SUB));
    }

    // Exercises the full parse path against a real temp file. Requires a working libclang on
    // the machine running the test suite, so it's excluded from the default run.
    #[test]
    #[ignore = "requires a system libclang"]
    fn junk_filters_a_plus_with_no_source_footprint() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.c");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "int sum(int a, int b) {{ return a + b; }}").unwrap();
        drop(file);

        let detector = JunkDetector::new(CxxAstConfig::default());
        let utf8_path = Utf8PathBuf::try_from(path).unwrap();

        let real_point_location = irmutant_ir::SourceLocation { path: utf8_path.clone(), line: 1, column: 34 };
        let no_match_location = irmutant_ir::SourceLocation { path: utf8_path, line: 1, column: 1 };

        let ast = detector.file_ast(&real_point_location.path).unwrap();
        let matches = |loc: &irmutant_ir::SourceLocation| {
            ast.ranges.iter().any(|r| r.operator_kind == OperatorKind::MATH_ADD && r.contains(loc.line, loc.column))
        };

        assert!(matches(&real_point_location));
        assert!(!matches(&no_match_location));
    }
}
