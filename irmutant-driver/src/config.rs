use std::collections::HashSet;

use camino::Utf8PathBuf;
use serde::Deserialize;

use irmutant_junk::CxxAstConfig;

use crate::error::ConfigError;

/// Which operators from [`irmutant_operators::default_catalogue`] run this invocation.
#[derive(Clone, Debug, Default)]
pub enum OperatorSelection {
    #[default]
    All,
    Only(Vec<String>),
}

/// Behavioural knobs for a run, kept separate from the paths/IO half in [`Config`].
#[derive(Clone, Debug)]
pub struct Options {
    pub operators: OperatorSelection,
    pub report_timings: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { operators: OperatorSelection::All, report_timings: false }
    }
}

/// The core's configuration input. `bitcode_paths` are loaded in order; duplicates
/// are rejected by [`Config::validate`]. The C/C++ AST fields feed the Junk Detector directly.
#[derive(Clone, Debug)]
pub struct Config {
    pub bitcode_paths: Vec<Utf8PathBuf>,
    pub cxx_compilation_database_dir: Option<Utf8PathBuf>,
    pub cxx_compilation_flags: Option<String>,
    pub opts: Options,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bitcode_paths.is_empty() {
            return Err(ConfigError::NoBitcodePaths);
        }

        let mut seen = HashSet::new();
        for path in &self.bitcode_paths {
            if !seen.insert(path) {
                return Err(ConfigError::DuplicateBitcodePath { path: path.clone() });
            }
        }

        Ok(())
    }

    pub fn cxx_ast_config(&self) -> CxxAstConfig {
        CxxAstConfig {
            compilation_database_dir: self.cxx_compilation_database_dir.clone(),
            compilation_flags: self.cxx_compilation_flags.clone(),
        }
    }

    /// Loads a [`Config`] from a TOML file on disk; the CLI's alternative to building one
    /// directly.
    pub fn from_toml_file(path: &camino::Utf8Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_std_path())
            .map_err(|err| ConfigError::Read { path: path.to_owned(), message: err.to_string() })?;
        let file: FileConfig = toml::from_str(&contents)
            .map_err(|err| ConfigError::Parse { path: path.to_owned(), message: err.to_string() })?;
        Ok(file.into_config())
    }
}

/// The serde-deserializable shape of a TOML configuration file; kept separate from [`Config`]
/// so the in-memory type never needs `#[derive(Deserialize)]` baggage when constructed directly
/// by an embedding caller.
#[derive(Deserialize)]
struct FileConfig {
    bitcode_paths: Vec<Utf8PathBuf>,
    #[serde(default)]
    cxx_compilation_database_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    cxx_compilation_flags: Option<String>,
    #[serde(default)]
    operators: Option<Vec<String>>,
    #[serde(default)]
    report_timings: bool,
}

impl FileConfig {
    fn into_config(self) -> Config {
        let operators = match self.operators {
            Some(names) => OperatorSelection::Only(names),
            None => OperatorSelection::All,
        };

        Config {
            bitcode_paths: self.bitcode_paths,
            cxx_compilation_database_dir: self.cxx_compilation_database_dir,
            cxx_compilation_flags: self.cxx_compilation_flags,
            opts: Options { operators, report_timings: self.report_timings },
        }
    }
}
