use crate::common::command::{
    dump_lines, git_commit_with_timestamp, git_repository, run_git_command,
};
use crate::common::file::{FileSpec, write_file};
use crate::common::lines_with_prefix;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn dump_branches_and_tags(git_repository: TempDir) {
    let dir = git_repository.path();
    write_file(FileSpec::new(dir.join("a.txt"), "a\n".to_string()));
    let first = git_commit_with_timestamp(dir, "First", "2024-01-01 10:00:00 +0000");
    write_file(FileSpec::new(dir.join("b.txt"), "b\n".to_string()));
    let second = git_commit_with_timestamp(dir, "Second", "2024-01-01 11:00:00 +0000");

    for args in [
        vec!["branch", "dev", first.as_str()],
        vec!["branch", "feature/nested"],
        vec!["branch", "Upper"],
        vec!["tag", "v1.0", first.as_str()],
    ] {
        run_git_command(dir, &args).assert().success();
    }

    let lines = dump_lines(dir, &[]);

    assert_eq!(
        lines_with_prefix(&lines, "ref "),
        vec![
            &format!("ref {first} branch dev <repo id/nwo> <push-date>"),
            &format!("ref {second} branch master <repo id/nwo> <push-date>"),
            &format!("ref {first} tag v1.0 <repo id/nwo> <push-date>"),
        ]
    );
    // every ref line precedes the first commit line
    let first_commit_line = lines
        .iter()
        .position(|line| line.starts_with("commit "))
        .expect("no commit lines");
    assert_eq!(first_commit_line, 3);
}

#[rstest]
fn dump_reads_packed_refs(git_repository: TempDir) {
    let dir = git_repository.path();
    write_file(FileSpec::new(dir.join("a.txt"), "a\n".to_string()));
    let commit = git_commit_with_timestamp(dir, "First", "2024-01-01 10:00:00 +0000");
    run_git_command(dir, &["tag", "release"]).assert().success();
    run_git_command(dir, &["pack-refs", "--all"])
        .assert()
        .success();

    let lines = dump_lines(dir, &[]);

    assert_eq!(
        lines_with_prefix(&lines, "ref "),
        vec![
            &format!("ref {commit} branch master <repo id/nwo> <push-date>"),
            &format!("ref {commit} tag release <repo id/nwo> <push-date>"),
        ]
    );
}

#[rstest]
fn dump_follows_detached_head(git_repository: TempDir) {
    let dir = git_repository.path();
    write_file(FileSpec::new(dir.join("a.txt"), "a\n".to_string()));
    let first = git_commit_with_timestamp(dir, "First", "2024-01-01 10:00:00 +0000");
    write_file(FileSpec::new(dir.join("b.txt"), "b\n".to_string()));
    git_commit_with_timestamp(dir, "Second", "2024-01-01 11:00:00 +0000");
    run_git_command(dir, &["checkout", "-q", "--detach", &first])
        .assert()
        .success();

    let lines = dump_lines(dir, &["--no-refs"]);

    assert_eq!(crate::common::commit_order(&lines), vec![first]);
}
