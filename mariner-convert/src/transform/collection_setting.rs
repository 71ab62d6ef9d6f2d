use std::fmt;

use serde::Serialize;
use xml_settings_core::XmlNode;

use crate::job::HomePaths;

pub const ELEMENT: &str = "collectionSetting";
pub const BASE_DIRECTORY: &str = "baseDirectory";
pub const UNION: &str = "union";
pub const JOIN: &str = "join";
pub const TYPE: &str = "type";

/// Collection type enum that replaces the `union`/`join` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionType {
    General,
    Union,
    Join,
}

impl CollectionType {
    /// `union` wins over `join`; anything but a case-insensitive `true` is false.
    pub fn from_flags(union: Option<&str>, join: Option<&str>) -> Self {
        if is_true(union) {
            CollectionType::Union
        } else if is_true(join) {
            CollectionType::Join
        } else {
            CollectionType::General
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionType::General => "GENERAL",
            CollectionType::Union => "UNION",
            CollectionType::Join => "JOIN",
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_true(flag: Option<&str>) -> bool {
    flag.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// What [`apply`] changed on the `collectionSetting` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSettingChange {
    /// New `baseDirectory`, when the old home was found in it.
    pub base_directory: Option<String>,
    pub collection_type: CollectionType,
}

/// Rewrite the first `collectionSetting` element for the new schema.
///
/// `baseDirectory` is rewritten only when it contains the old home; the
/// `union`/`join` flags are always replaced by `type`. Returns `None` when the
/// document has no `collectionSetting` element.
pub fn apply(root: &mut XmlNode, homes: &HomePaths) -> Option<CollectionSettingChange> {
    let setting = root.find_first_mut(ELEMENT)?;

    let base_directory = homes.rewrite(setting.attribute(BASE_DIRECTORY).unwrap_or_default());
    if let Some(rewritten) = &base_directory {
        setting.set_attribute(BASE_DIRECTORY, rewritten.as_str());
    }

    let collection_type =
        CollectionType::from_flags(setting.attribute(UNION), setting.attribute(JOIN));
    setting.remove_attribute(UNION);
    setting.remove_attribute(JOIN);
    setting.set_attribute(TYPE, collection_type.as_str());

    Some(CollectionSettingChange {
        base_directory,
        collection_type,
    })
}
