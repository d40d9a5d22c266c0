use crate::common::command::{
    dump_lines, git_commit_with_timestamp, git_repository, git_rev_parse,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn dump_single_root_commit(git_repository: TempDir) {
    let dir = git_repository.path();
    write_file(FileSpec::new(dir.join("a.txt"), "hello\n".to_string()));
    let commit = git_commit_with_timestamp(dir, "Initial commit", "2024-01-01 10:00:00 +0000");
    let tree = git_rev_parse(dir, "HEAD^{tree}");
    let blob = "ce013625030ba8dba906f756967f9e9ca394464a";

    let lines = dump_lines(dir, &[]);

    assert_eq!(
        lines,
        vec![
            format!("ref {commit} branch master <repo id/nwo> <push-date>"),
            format!(r#"commit {commit} author "Test User <test@example.com>" 2024-01-01T10:00:00Z"#),
            format!(r#"commit {commit} committer "Test User <test@example.com>" 2024-01-01T10:00:00Z"#),
            format!(r#"commit {commit} message "Initial commit""#),
            format!("commit {commit} parents"),
            format!("commit {commit} tree {tree}"),
            format!("commit {commit} filecreate a.txt {blob}"),
            format!(r#"blob {blob} "hello\n""#),
            format!("tree {tree} 1"),
            format!("tree {tree} blob {blob} a.txt 100644"),
        ]
    );
}

#[rstest]
fn dump_keeps_the_recorded_timezone(git_repository: TempDir) {
    let dir = git_repository.path();
    write_file(FileSpec::new(dir.join("a.txt"), "hello\n".to_string()));
    let commit = git_commit_with_timestamp(dir, "Initial commit", "2024-01-01 12:00:00 +0200");

    let lines = dump_lines(dir, &["--no-refs"]);

    assert_eq!(
        lines[0],
        format!(r#"commit {commit} author "Test User <test@example.com>" 2024-01-01T12:00:00+02:00"#)
    );
}

#[rstest]
fn dump_of_repository_without_commits_is_empty(git_repository: TempDir) {
    let lines = dump_lines(git_repository.path(), &[]);

    assert!(lines.is_empty());
}
