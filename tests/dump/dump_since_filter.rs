use crate::common::command::{dump_lines, git_commit_with_timestamp, git_repository};
use crate::common::file::{FileSpec, write_file};
use crate::common::{commit_order, lines_with_prefix};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("2024-01-02", 1)]
#[case("2024-01-02T00:00:00Z", 1)]
#[case("2024-01-02 12:00:00 +0000", 2)]
#[case("2024-01-02T10:00:00+02:00", 1)]
#[case("2024-01-04", 3)]
fn dump_since_filter(git_repository: TempDir, #[case] since: &str, #[case] skipped: usize) {
    let dir = git_repository.path();
    let mut commits = Vec::new();
    for day in 1..=3 {
        write_file(FileSpec::new(
            dir.join(format!("day{day}.txt")),
            format!("day {day}\n"),
        ));
        commits.push(git_commit_with_timestamp(
            dir,
            &format!("Day {day}"),
            &format!("2024-01-0{day} 10:00:00 +0000"),
        ));
    }

    let lines = dump_lines(dir, &[since]);

    assert_eq!(commit_order(&lines), commits[skipped..].to_vec());
    // refs are listed regardless of the bound
    assert_eq!(lines_with_prefix(&lines, "ref ").len(), 1);
}
