use crate::common::command::{git_commit_with_timestamp, git_repository, run_gitdump_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn dump_fails_on_binary_blob(git_repository: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = git_repository.path();
    std::fs::write(dir.join("image.bin"), [0xff_u8, 0xd8, 0xff, 0x00])?;
    git_commit_with_timestamp(dir, "Add binary", "2024-01-01 10:00:00 +0000");

    run_gitdump_command(dir, &[])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not valid UTF-8 text"));

    Ok(())
}
