use crate::common::command::{repository_dir, run_gitdump_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn dump_fails_outside_repository(repository_dir: TempDir) {
    run_gitdump_command(repository_dir.path(), &[])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a git repository"));
}

#[rstest]
fn dump_fails_for_missing_path(repository_dir: TempDir) {
    let missing = repository_dir.path().join("missing");

    run_gitdump_command(
        repository_dir.path(),
        &["-C", missing.to_str().expect("temp path is not UTF-8")],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not exist"));
}
