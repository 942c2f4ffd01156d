use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::prelude::*;
use tempfile::TempDir;

fn jotter(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("jotter").unwrap();
    cmd.env("JOTTER_HOME", home.path());
    cmd
}

fn script(home: &TempDir, source: &str) -> assert_cmd::assert::Assert {
    jotter(home)
        .args(["script", "--no-color"])
        .write_stdin(source)
        .assert()
}

#[test]
fn test_empty_script_prints_welcome_screen() {
    let home = tempfile::tempdir().unwrap();
    script(&home, "")
        .success()
        .stdout(predicate::str::contains("PAGES"))
        .stdout(predicate::str::contains("1. Getting Started"))
        .stdout(predicate::str::contains("# Welcome to your workspace"))
        .stdout(predicate::str::contains("[ ] Build your knowledge base"))
        .stdout(predicate::str::contains("+ Add a block"));
}

#[test]
fn test_script_edits_show_in_final_screen() {
    let home = tempfile::tempdir().unwrap();
    let source = "\
# plan the week
new Plans
add todo
type 2 Buy milk
toggle 2
add quote after 1
set 2 Small steps\\nevery day
";
    script(&home, source)
        .success()
        .stdout(predicate::str::contains("2. Plans"))
        .stdout(predicate::str::contains("[x] Buy milk"))
        .stdout(predicate::str::contains("│ Small steps"))
        .stdout(predicate::str::contains("│ every day"))
        .stdout(predicate::str::contains("Page created: Plans"));
}

#[test]
fn test_print_emits_intermediate_screens() {
    let home = tempfile::tempdir().unwrap();
    script(&home, "title First\nprint\ntitle Second\n")
        .success()
        .stdout(predicate::str::contains("1. First"))
        .stdout(predicate::str::contains("1. Second"));
}

#[test]
fn test_markdown_and_json_formats() {
    let home = tempfile::tempdir().unwrap();
    let source = "new Plans\nadd todo\ntype 2 Buy milk\ntoggle 2\n";

    jotter(&home)
        .args(["script", "--format", "markdown"])
        .write_stdin(source)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Getting Started"))
        .stdout(predicate::str::contains("# Plans"))
        .stdout(predicate::str::contains("[x] Buy milk"))
        .stdout(predicate::str::contains("PAGES").not());

    jotter(&home)
        .args(["script", "--format", "json"])
        .write_stdin(source)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""title": "Plans""#))
        .stdout(predicate::str::contains(r#""completed": true"#));
}

#[test]
fn test_script_from_file() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("week.jot");
    std::fs::write(&file, "new From File\n").unwrap();

    jotter(&home)
        .arg("script")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("From File"));
}

#[test]
fn test_script_errors_name_the_line() {
    let home = tempfile::tempdir().unwrap();
    script(&home, "new Plans\n\nselect 9\n")
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("line 3"));

    script(&home, "frobnicate\n")
        .failure()
        .stderr(predicate::str::contains("unknown command `frobnicate`"));
}

#[test]
fn test_refused_operations_are_messages_not_errors() {
    let home = tempfile::tempdir().unwrap();
    script(&home, "delete-page 1\n")
        .success()
        .stdout(predicate::str::contains("Cannot delete the last page"));
}

#[test]
fn test_export_defaults_to_markdown() {
    let home = tempfile::tempdir().unwrap();
    jotter(&home)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Welcome to your workspace"))
        .stdout(predicate::str::contains("## What you can do here"))
        .stdout(predicate::str::contains("[ ] Create pages and organize your thoughts"));
}

#[test]
fn test_config_set_and_get() {
    let home = tempfile::tempdir().unwrap();

    jotter(&home)
        .args(["config", "sidebar_open", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set sidebar_open = false"));

    jotter(&home)
        .args(["config", "sidebar-open"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sidebar-open = false"));

    jotter(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("sidebar_open = false"))
        .stdout(predicate::str::contains("id_source = sequential"))
        .stdout(predicate::str::contains("log_level = warn"));

    script(&home, "")
        .success()
        .stdout(predicate::str::contains("PAGES").not())
        .stdout(predicate::str::contains("Getting Started"));
}

#[test]
fn test_config_rejects_bad_values() {
    let home = tempfile::tempdir().unwrap();

    jotter(&home)
        .args(["config", "colour", "red"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown config key: colour"));

    jotter(&home)
        .args(["config", "sidebar_width", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at least 12"));

    assert!(!home.path().join("config.json").exists());
}

#[test]
fn test_blank_start_without_welcome_page() {
    let home = tempfile::tempdir().unwrap();
    jotter(&home)
        .args(["config", "welcome_page", "false"])
        .assert()
        .success();

    jotter(&home)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Untitled"))
        .stdout(predicate::str::contains("Getting Started").not());
}

#[test]
fn test_interactive_mode_needs_a_terminal() {
    let home = tempfile::tempdir().unwrap();
    jotter(&home)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs a terminal"));
}

#[test]
fn test_logs_go_under_home() {
    let home = tempfile::tempdir().unwrap();
    jotter(&home).args(["-v", "export"]).assert().success();
    assert!(home.path().join("logs").is_dir());
}
