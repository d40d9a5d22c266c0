use crate::common::command::{
    dump_lines, git_commit_with_timestamp, git_repository, run_git_command,
};
use crate::common::file::{FileSpec, write_file};
use crate::common::lines_with_prefix;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn dump_rename_without_content_change(git_repository: TempDir) {
    let dir = git_repository.path();
    let blob = "ce013625030ba8dba906f756967f9e9ca394464a";
    write_file(FileSpec::new(dir.join("a.txt"), "hello\n".to_string()));
    git_commit_with_timestamp(dir, "Add a", "2024-01-01 10:00:00 +0000");
    run_git_command(dir, &["mv", "a.txt", "b.txt"])
        .assert()
        .success();
    let rename = git_commit_with_timestamp(dir, "Rename a to b", "2024-01-01 11:00:00 +0000");

    let lines = dump_lines(dir, &["--no-refs"]);

    let changes = lines
        .iter()
        .filter(|line| line.starts_with(&format!("commit {rename} file")))
        .collect::<Vec<_>>();
    assert_eq!(changes, vec![&format!("commit {rename} filerename a.txt b.txt {blob}")]);
    assert_eq!(lines_with_prefix(&lines, "blob ").len(), 1);
}

#[rstest]
fn dump_rename_with_small_edit_emits_new_content(git_repository: TempDir) {
    let dir = git_repository.path();
    let content = (1..=20).map(|n| format!("line {n}\n")).collect::<String>();
    write_file(FileSpec::new(dir.join("notes.txt"), content.clone()));
    git_commit_with_timestamp(dir, "Add notes", "2024-01-01 10:00:00 +0000");

    run_git_command(dir, &["mv", "notes.txt", "docs.txt"])
        .assert()
        .success();
    write_file(FileSpec::new(
        dir.join("docs.txt"),
        content.replace("line 20\n", "line twenty\n"),
    ));
    let rename = git_commit_with_timestamp(dir, "Move notes", "2024-01-01 11:00:00 +0000");
    let new_blob = crate::common::command::git_rev_parse(dir, "HEAD:docs.txt");

    let lines = dump_lines(dir, &["--no-refs"]);

    assert!(lines.contains(&format!(
        "commit {rename} filerename notes.txt docs.txt {new_blob}"
    )));
    assert_eq!(lines_with_prefix(&lines, &format!("blob {new_blob} ")).len(), 1);
}
