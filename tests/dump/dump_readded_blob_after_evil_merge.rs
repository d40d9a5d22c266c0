use crate::common::command::{
    dump_lines, git_commit_with_timestamp, git_repository, git_rev_parse, run_git_command,
};
use crate::common::file::{FileSpec, remove_file, write_file};
use crate::common::lines_with_prefix;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn dump_readded_blob_after_evil_merge(git_repository: TempDir) {
    let dir = git_repository.path();
    write_file(FileSpec::new(dir.join("base.txt"), "base\n".to_string()));
    git_commit_with_timestamp(dir, "Base", "2024-01-01 10:00:00 +0000");

    run_git_command(dir, &["checkout", "-q", "-b", "side"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("side.txt"), "side\n".to_string()));
    git_commit_with_timestamp(dir, "Side", "2024-01-01 11:00:00 +0000");
    run_git_command(dir, &["checkout", "-q", "master"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("main.txt"), "main\n".to_string()));
    git_commit_with_timestamp(dir, "Main", "2024-01-01 12:00:00 +0000");

    // the merge itself adds e.txt
    run_git_command(dir, &["merge", "-q", "--no-ff", "--no-commit", "side"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("e.txt"), "evil\n".to_string()));
    git_commit_with_timestamp(dir, "Merge side", "2024-01-01 13:00:00 +0000");
    let evil = git_rev_parse(dir, "HEAD:e.txt");

    remove_file(&dir.join("e.txt"));
    git_commit_with_timestamp(dir, "Remove e", "2024-01-01 14:00:00 +0000");
    write_file(FileSpec::new(dir.join("e.txt"), "evil\n".to_string()));
    let readded = git_commit_with_timestamp(dir, "Add e again", "2024-01-01 15:00:00 +0000");

    let lines = dump_lines(dir, &["--no-refs"]);

    let blob_lines = lines_with_prefix(&lines, &format!("blob {evil} "));
    assert_eq!(blob_lines, vec![&format!(r#"blob {evil} "evil\n""#)]);

    let position = |line: &str| {
        lines
            .iter()
            .position(|candidate| candidate == line)
            .unwrap_or_else(|| panic!("missing line {line}"))
    };
    let created = position(&format!("commit {readded} filecreate e.txt {evil}"));
    assert!(position(blob_lines[0]) > created);
}
