#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn end_to_end_generate_and_list() {
    let dir = tempdir().unwrap();
    let schedule = dir.path().join("schedule.json");
    let schedule = schedule.to_str().unwrap();

    cli()
        .args(["--schedule", schedule, "add-teacher", "--name", "T1"])
        .assert()
        .success();

    cli()
        .args([
            "--schedule",
            schedule,
            "add-assignment",
            "--school",
            "s1",
            "--group",
            "c1",
            "--teacher",
            "T1",
            "--weekday",
            "1",
            "--start",
            "09:00",
            "--end",
            "10:00",
        ])
        .assert()
        .success();

    cli()
        .args([
            "--schedule",
            schedule,
            "generate",
            "--start",
            "2024-02-05",
            "--weeks",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 occurrence(s) created"));

    // rejouer la même fenêtre : rien de neuf, code 2 (avertissement)
    cli()
        .args([
            "--schedule",
            schedule,
            "generate",
            "--start",
            "2024-02-05",
            "--weeks",
            "2",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("0 occurrence(s) created"));

    cli()
        .args(["--schedule", schedule, "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-02-05"))
        .stdout(predicate::str::contains("2024-02-12"));
}

#[test]
fn unknown_teacher_is_a_hard_error() {
    let dir = tempdir().unwrap();
    let schedule = dir.path().join("schedule.json");

    cli()
        .args([
            "--schedule",
            schedule.to_str().unwrap(),
            "add-assignment",
            "--school",
            "s1",
            "--group",
            "c1",
            "--teacher",
            "nobody",
            "--weekday",
            "1",
            "--start",
            "09:00",
            "--end",
            "10:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown teacher"));
}

fn cli() -> Command {
    Command::cargo_bin("horaire-cli").unwrap()
}
