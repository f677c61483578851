use camino::Utf8PathBuf;

/// AST load or source lookup failure. Per the taxonomy, these are local: the
/// caller treats the point as not-junk and proceeds rather than aborting the run.
#[derive(thiserror::Error, Debug)]
pub enum JunkDetectorError {
    #[error("failed to load libclang: {message}")]
    ClangInit { message: String },

    #[error("no compilation database found in `{dir}`")]
    CompilationDatabase { dir: Utf8PathBuf },

    #[error("failed to parse `{path}` for junk detection: {message}")]
    Parse { path: Utf8PathBuf, message: String },

    #[error("`{path}` has no `FileEntry` in its own parsed AST")]
    MissingFileEntry { path: Utf8PathBuf },
}
