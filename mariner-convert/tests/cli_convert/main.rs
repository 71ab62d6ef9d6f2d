use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};
use xml_settings_core::parse_file;

const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, contents).expect("write fixture");
}

/// A small Mariner 4 settings folder with one collection `FOO`.
fn settings_tree() -> TempDir {
    let dir = tempdir().expect("tempdir");
    let root = dir.path().join("setting");
    write(
        &root,
        "collectionList.xml",
        &format!("{DECL}\n<collectionList>\n  <collection id=\"FOO\"/>\n</collectionList>\n"),
    );
    write(
        &root,
        "FOO/profileSetting.xml",
        &format!("{DECL}\n<profileSetting>\n  <profile name=\"default\"/>\n</profileSetting>\n"),
    );
    write(
        &root,
        "FOO/collectionSetting.xml",
        &format!(
            "{DECL}\n<settings>\n  <collectionSetting name=\"FOO\" \
             baseDirectory=\"/old/home/foo\" union=\"true\" join=\"false\"/>\n</settings>\n"
        ),
    );
    write(
        &root,
        "FOO/dbwatcher/list.xml",
        &format!("{DECL}\n<list>\n  <element id=\"news\"/>\n</list>\n"),
    );
    write(
        &root,
        "FOO/dbwatcher/news.xml",
        &format!(
            "{DECL}\n<dbwatcher>\n  <id>news</id>\n  \
             <fullCollectSql>SELECT * FROM news</fullCollectSql>\n  \
             <manualUpdateCheckPost>x</manualUpdateCheckPost>\n</dbwatcher>\n"
        ),
    );
    write(&root, "FOO/dictionary.xml", "<dictionary/>");
    write(&root, "FOO/old_collectionSetting.xml", "<settings/>");
    dir
}

fn command(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mariner-convert"));
    cmd.arg("/old/home")
        .arg("/new/home")
        .arg(path_as_str(&dir.join("setting")))
        .arg(path_as_str(&dir.join("converted")));
    cmd
}

mod basics;
mod options;
