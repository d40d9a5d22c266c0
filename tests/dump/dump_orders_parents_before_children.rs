use crate::common::command::{
    dump_lines, git_commit_with_timestamp, git_merge_with_timestamp, git_repository,
    run_git_command,
};
use crate::common::commit_order;
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn dump_orders_parents_before_children(git_repository: TempDir) {
    let dir = git_repository.path();
    write_file(FileSpec::new(dir.join("base.txt"), "base\n".to_string()));
    let base = git_commit_with_timestamp(dir, "Base", "2024-01-01 10:00:00 +0000");

    run_git_command(dir, &["checkout", "-q", "-b", "side"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("side.txt"), "side\n".to_string()));
    // older than the main line commit on purpose
    let side = git_commit_with_timestamp(dir, "Side", "2024-01-01 11:00:00 +0000");

    run_git_command(dir, &["checkout", "-q", "master"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("main.txt"), "main\n".to_string()));
    let main = git_commit_with_timestamp(dir, "Main", "2024-01-01 12:00:00 +0000");
    let merge = git_merge_with_timestamp(dir, "side", "Merge side", "2024-01-01 13:00:00 +0000");

    let topological = commit_order(&dump_lines(dir, &["--no-refs"]));
    let chronological = commit_order(&dump_lines(dir, &["--no-refs", "--order", "chronological"]));

    assert_eq!(
        topological,
        vec![base.clone(), main.clone(), side.clone(), merge.clone()]
    );
    assert_eq!(chronological, vec![merge, main, side, base]);
}
