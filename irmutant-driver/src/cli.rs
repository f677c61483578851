use camino::Utf8PathBuf;
use clap::Parser;

use crate::config::{Config, OperatorSelection, Options};
use crate::error::ConfigError;

/// `irmutant --bitcode <PATH>... [OPTIONS]` — the CLI entry point feeding a [`Config`] to
/// [`crate::run`]. A flat, derive-based argument struct, following the shape of the retrieval
/// pack's other CLI binaries (`quicksilver`, `raya-cli`) rather than a hand-rolled parser.
#[derive(Parser)]
#[command(name = "irmutant", author, version, about = "LLVM IR mutation testing engine", long_about = None)]
pub struct Cli {
    /// Precompiled LLVM bitcode files to load, in order. Required unless `--config` supplies them.
    #[arg(long = "bitcode", value_name = "PATH")]
    pub bitcode_paths: Vec<Utf8PathBuf>,

    /// Load the run configuration from a TOML file; flags below override its fields when given.
    #[arg(long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Directory containing a JSON compilation database for the Junk Detector's AST frontend.
    #[arg(long = "cxx-compilation-database", value_name = "DIR")]
    pub cxx_compilation_database_dir: Option<Utf8PathBuf>,

    /// Whitespace-separated compiler flags used when no compilation database entry is found.
    #[arg(long = "cxx-flags", value_name = "FLAGS")]
    pub cxx_compilation_flags: Option<String>,

    /// Restrict the mutation catalogue to these operator kinds (default: every built-in).
    #[arg(long = "operator", value_name = "KIND")]
    pub operators: Vec<String>,

    /// Print phase timings after the run completes.
    #[arg(long)]
    pub report_timings: bool,

    /// Emit the report as JSON instead of the default text rendering.
    #[arg(long)]
    pub json: bool,

    /// Verbose output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Builds a [`Config`], starting from `--config`'s file (if given) and letting every other
    /// flag override the corresponding field.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = match self.config {
            Some(path) => Config::from_toml_file(&path)?,
            None => Config {
                bitcode_paths: Vec::new(),
                cxx_compilation_database_dir: None,
                cxx_compilation_flags: None,
                opts: Options::default(),
            },
        };

        if !self.bitcode_paths.is_empty() {
            config.bitcode_paths = self.bitcode_paths;
        }
        if self.cxx_compilation_database_dir.is_some() {
            config.cxx_compilation_database_dir = self.cxx_compilation_database_dir;
        }
        if self.cxx_compilation_flags.is_some() {
            config.cxx_compilation_flags = self.cxx_compilation_flags;
        }
        if !self.operators.is_empty() {
            config.opts.operators = OperatorSelection::Only(self.operators);
        }
        config.opts.report_timings = config.opts.report_timings || self.report_timings;

        Ok(config)
    }
}
