use std::path::Path;

use walkdir::WalkDir;

use crate::classify::CandidateFile;
use crate::error::ConvertError;

/// File names starting with this prefix are backups and never converted.
pub const RESERVED_PREFIX: &str = "old_";
pub const XML_SUFFIX: &str = ".xml";

/// Everything found under an input root.
#[derive(Debug, Default)]
pub struct Discovery {
    pub candidates: Vec<CandidateFile>,
    /// Entries the walk could not read; the rest of the tree is still listed.
    pub errors: Vec<ConvertError>,
}

/// List every `.xml` file under `root` not named with the reserved prefix.
///
/// Entries are sorted by file name within each directory so repeated runs
/// see the same order.
pub fn discover(root: &Path) -> Discovery {
    let mut found = Discovery::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let path = source
                    .path()
                    .unwrap_or(root)
                    .display()
                    .to_string();
                found.errors.push(ConvertError::Walk { path, source });
                continue;
            }
        };

        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_candidate_name(&name) {
            continue;
        }

        let relative_path = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        found.candidates.push(CandidateFile {
            absolute_path: entry.path().to_path_buf(),
            name,
            relative_path,
        });
    }

    found
}

pub fn is_candidate_name(name: &str) -> bool {
    name.ends_with(XML_SUFFIX) && !name.starts_with(RESERVED_PREFIX)
}
