use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

pub const COLLECTION_LIST: &str = "collectionList.xml";
pub const PROFILE_SETTING: &str = "profileSetting.xml";
pub const COLLECTION_SETTING: &str = "collectionSetting.xml";
pub const DBWATCHER_LIST: &str = "list.xml";
pub const DBWATCHER_MARKER: &str = "dbwatcher";

/// A settings file found under the input root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub absolute_path: PathBuf,
    /// Final path component.
    pub name: String,
    /// Path relative to the input root.
    pub relative_path: PathBuf,
}

/// Which conversion rule applies to a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    CollectionList,
    ProfileSetting,
    CollectionSetting,
    DbwatcherList,
    DbwatcherSource,
    Unclassified,
}

impl FileKind {
    pub const ALL: [FileKind; 6] = [
        FileKind::CollectionList,
        FileKind::ProfileSetting,
        FileKind::CollectionSetting,
        FileKind::DbwatcherList,
        FileKind::DbwatcherSource,
        FileKind::Unclassified,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::CollectionList => "collection_list",
            FileKind::ProfileSetting => "profile_setting",
            FileKind::CollectionSetting => "collection_setting",
            FileKind::DbwatcherList => "dbwatcher_list",
            FileKind::DbwatcherSource => "dbwatcher_source",
            FileKind::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a candidate by its name and relative path.
///
/// Rules are checked in order and the first match wins, so a `list.xml`
/// under a dbwatcher folder is never treated as a per-source file.
pub fn classify(candidate: &CandidateFile) -> FileKind {
    classify_parts(&candidate.name, &candidate.relative_path.to_string_lossy())
}

pub fn classify_parts(name: &str, relative_path: &str) -> FileKind {
    let in_dbwatcher = relative_path.contains(DBWATCHER_MARKER);

    if name == COLLECTION_LIST {
        FileKind::CollectionList
    } else if name == PROFILE_SETTING {
        FileKind::ProfileSetting
    } else if in_dbwatcher && name == DBWATCHER_LIST {
        FileKind::DbwatcherList
    } else if name == COLLECTION_SETTING {
        FileKind::CollectionSetting
    } else if in_dbwatcher {
        FileKind::DbwatcherSource
    } else {
        FileKind::Unclassified
    }
}
