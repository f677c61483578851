use std::process::Command;

use camino::Utf8PathBuf;
use tempfile::TempDir;

use irmutant_ir::Object;

use crate::error::RunnerError;

/// Locates and drives the system linker to turn a set of native objects into a loadable shared
/// library. Holds no state between `link` calls
/// beyond the located linker path — each invocation gets its own scratch directory so concurrent
/// workers never collide on object file names.
pub struct Linker {
    cc: Utf8PathBuf,
}

impl Linker {
    pub fn discover() -> Result<Self, RunnerError> {
        let cc = which::which("cc").map_err(|err| RunnerError::LinkerNotFound { message: err.to_string() })?;
        let cc = Utf8PathBuf::try_from(cc).map_err(|err| RunnerError::LinkerNotFound { message: err.source_lossy() })?;
        Ok(Self { cc })
    }

    /// Writes each object's bytes to a fresh scratch directory and links them into one shared
    /// library. The returned [`TempDir`] must outlive the loaded library; it deletes the
    /// scratch directory (objects and library alike) on drop.
    pub fn link(&self, objects: &[&Object]) -> Result<(TempDir, Utf8PathBuf), RunnerError> {
        let dir = tempfile::tempdir().map_err(|err| RunnerError::Scratch { message: err.to_string() })?;
        let dir_path = Utf8PathBuf::try_from(dir.path().to_owned())
            .map_err(|err| RunnerError::Scratch { message: err.source_lossy() })?;

        let mut object_paths = Vec::with_capacity(objects.len());
        for (index, object) in objects.iter().enumerate() {
            let path = dir_path.join(format!("{index}-{}.o", sanitize(&object.module_name)));
            std::fs::write(&path, &object.bytes).map_err(|err| RunnerError::Scratch { message: err.to_string() })?;
            object_paths.push(path);
        }

        let library_path = dir_path.join("mutant.so");
        let status = Command::new(&self.cc)
            .arg("-shared")
            .arg("-o").arg(&library_path)
            .args(&object_paths)
            .status()
            .map_err(|err| RunnerError::Link { message: err.to_string() })?;

        if !status.success() {
            return Err(RunnerError::Link { message: format!("linker exited with {status}") });
        }

        Ok((dir, library_path))
    }
}

fn sanitize(module_name: &str) -> String {
    module_name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' }).collect()
}

trait PathErrorExt {
    fn source_lossy(&self) -> String;
}

impl PathErrorExt for camino::FromPathBufError {
    fn source_lossy(&self) -> String {
        format!("path is not valid UTF-8: {}", self.as_path().display())
    }
}
