use super::*;

#[test]
fn strict_mode_aborts_on_first_failure() {
    let dir = settings_tree();
    write(&dir.path().join("setting"), "AAA/dbwatcher/broken.xml", "<dbwatcher><id>");

    command(dir.path())
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("conversion of"))
        .stderr(predicate::str::contains("broken.xml"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = settings_tree();
    command(dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("PLANNED"))
        .stdout(predicate::str::contains("planned=5"));

    assert!(!dir.path().join("converted").exists());
}

#[test]
fn uppercase_list_ids_rewrites_list() {
    let dir = settings_tree();
    command(dir.path())
        .arg("--uppercase-list-ids")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("copied=2 converted=3"));

    let list = parse_file(&dir.path().join("converted/FOO/dbwatcher/list.xml")).expect("parse");
    assert_eq!(
        list.get_child("element").and_then(|e| e.attribute("id")),
        Some("NEWS")
    );
}

#[test]
fn json_report_lists_every_file() {
    let dir = settings_tree();
    let assert = command(dir.path()).arg("--format").arg("json").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("json report");

    let files = report["files"].as_array().expect("files array");
    assert_eq!(files.len(), 6);
    assert!(files.iter().any(|f| f["kind"] == "dbwatcher_source"
        && f["status"] == "converted"
        && f["destination"]
            .as_str()
            .is_some_and(|d| d.ends_with("NEWS.xml"))));
    assert!(files
        .iter()
        .any(|f| f["kind"] == "unclassified" && f["status"] == "ignored"));
}

#[test]
fn custom_mappings_file_changes_query_ids() {
    let dir = settings_tree();
    let mappings = dir.path().join("mappings.toml");
    fs::write(
        &mappings,
        r#"
appended = []

[[group]]
wrapper = "sqlFull"
query = "fullQuery"
id = "CUSTOM_FULL"
field = [{ source = "fullCollectSql", target = "main" }]
"#,
    )
    .expect("write mappings");

    command(dir.path())
        .arg("--mappings-file")
        .arg(path_as_str(&mappings))
        .assert()
        .success();

    let watcher =
        parse_file(&dir.path().join("converted/FOO/dbwatcher/NEWS.xml")).expect("parse");
    let query = watcher
        .get_child("sqlFull")
        .and_then(|n| n.get_child("fullQuery"))
        .expect("fullQuery");
    assert_eq!(query.attribute("id"), Some("CUSTOM_FULL"));
    assert!(watcher.get_child("sqlDocAdd").is_none());
    assert!(watcher.get_child("manualUpdateCheckPost").is_some());
}

#[test]
fn unreadable_mappings_file_is_fatal() {
    let dir = settings_tree();
    command(dir.path())
        .arg("--mappings-file")
        .arg(path_as_str(&dir.path().join("missing.toml")))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load query mappings"));
    assert!(!dir.path().join("converted").exists());
}
