use crate::common::command::{git_repository, run_gitdump_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
#[case("yesterday")]
#[case("2024-02-30")]
#[case("01/02/2024")]
fn dump_rejects_invalid_since(git_repository: TempDir, #[case] since: &str) {
    run_gitdump_command(git_repository.path(), &[since])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid since timestamp"));
}
