use std::path::PathBuf;

/// One conversion run: where to read, where to write, and the home paths to swap.
///
/// Built once by the caller and passed down; nothing in the library reads the
/// process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub homes: HomePaths,
}

impl ConversionJob {
    pub fn new(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        old_home: impl Into<String>,
        new_home: impl Into<String>,
    ) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            homes: HomePaths {
                old: old_home.into(),
                new: new_home.into(),
            },
        }
    }
}

/// Platform home prefixes (`IR4_HOME` / `IR5_HOME` on the installed systems).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HomePaths {
    pub old: String,
    pub new: String,
}

impl HomePaths {
    /// Replace every occurrence of the old home in `value`.
    ///
    /// Returns `None` when the old home is empty or absent from `value`.
    pub fn rewrite(&self, value: &str) -> Option<String> {
        if self.old.is_empty() || !value.contains(&self.old) {
            return None;
        }
        Some(value.replace(&self.old, &self.new))
    }
}

/// Behaviour switches for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertOptions {
    /// Abort on the first per-file failure instead of continuing.
    pub strict: bool,
    /// Upper-case lower-case `element/@id` values in dbwatcher `list.xml`
    /// instead of copying it verbatim.
    pub uppercase_list_ids: bool,
    /// Plan only; nothing is written.
    pub dry_run: bool,
}
