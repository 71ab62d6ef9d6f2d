use super::*;

#[test]
fn converts_settings_tree() {
    let dir = settings_tree();
    command(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("convert_summary copied=3 converted=2"))
        .stdout(predicate::str::contains("ignored=1 failed=0"));

    let input = dir.path().join("setting");
    let output = dir.path().join("converted");

    for copied in ["collectionList.xml", "FOO/profileSetting.xml", "FOO/dbwatcher/list.xml"] {
        assert_eq!(
            fs::read(input.join(copied)).expect("input"),
            fs::read(output.join(copied)).expect("output"),
            "{copied} should be copied byte for byte"
        );
    }

    let setting = parse_file(&output.join("FOO/collectionSetting.xml")).expect("parse setting");
    let element = setting.get_child("collectionSetting").expect("collectionSetting");
    assert_eq!(element.attribute("baseDirectory"), Some("/new/home/foo"));
    assert_eq!(element.attribute("type"), Some("UNION"));
    assert_eq!(element.attribute("union"), None);
    assert_eq!(element.attribute("join"), None);

    let source = output.join("FOO/dbwatcher/NEWS.xml");
    let watcher = parse_file(&source).expect("parse dbwatcher");
    assert_eq!(watcher.get_text(&["id"]), Some("NEWS"));
    assert_eq!(
        watcher.get_text(&["sqlFull", "fullQuery", "main"]),
        Some("SELECT * FROM news")
    );
    assert!(watcher.get_child("manualUpdateCheckPost").is_none());
    assert!(watcher.get_child("sqlFieldUpdate").is_some());
    assert!(watcher.get_child("sqlDocAdd").is_some());

    let written = fs::read_to_string(&source).expect("read source");
    assert!(written.starts_with(&format!("{DECL}\n<dbwatcher>\n    <id>NEWS</id>")));

    assert!(!output.join("FOO/dictionary.xml").exists());
    assert!(!output.join("FOO/old_collectionSetting.xml").exists());
}

#[test]
fn missing_parameters_print_usage_and_fail() {
    let dir = tempdir().expect("tempdir");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mariner-convert"));
    cmd.arg("/old/home")
        .arg("/new/home")
        .arg(path_as_str(dir.path()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));

    assert_eq!(fs::read_dir(dir.path()).expect("read_dir").count(), 0);
}

#[test]
fn rejects_missing_input_folder() {
    let dir = tempdir().expect("tempdir");
    command(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn rejects_output_equal_to_input() {
    let dir = settings_tree();
    let input = dir.path().join("setting");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mariner-convert"));
    cmd.arg("/old/home")
        .arg("/new/home")
        .arg(path_as_str(&input))
        .arg(path_as_str(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite source settings"));
}

#[test]
fn rejects_output_nested_in_input() {
    let dir = settings_tree();
    let input = dir.path().join("setting");
    let nested = input.join("converted");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mariner-convert"));
    cmd.arg("/old/home")
        .arg("/new/home")
        .arg(path_as_str(&input))
        .arg(path_as_str(&nested))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is inside input"));
    assert!(!nested.exists());
}

#[test]
fn malformed_file_does_not_stop_the_run() {
    let dir = settings_tree();
    write(
        &dir.path().join("setting"),
        "BAR/collectionSetting.xml",
        "<settings><collectionSetting union=\"true\"></settings>",
    );

    command(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("failed=1"));

    let output = dir.path().join("converted");
    assert!(output.join("FOO/collectionSetting.xml").exists());
    assert!(!output.join("BAR/collectionSetting.xml").exists());
}
