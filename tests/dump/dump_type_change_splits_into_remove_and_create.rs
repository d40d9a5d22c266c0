use crate::common::command::{
    dump_lines, git_commit_with_timestamp, git_repository, git_rev_parse,
};
use crate::common::file::{FileSpec, remove_file, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[cfg(unix)]
#[rstest]
fn dump_type_change_splits_into_remove_and_create(git_repository: TempDir) {
    let dir = git_repository.path();
    write_file(FileSpec::new(dir.join("a"), "t\n".to_string()));
    git_commit_with_timestamp(dir, "Add a", "2024-01-01 10:00:00 +0000");

    remove_file(&dir.join("a"));
    std::os::unix::fs::symlink("target", dir.join("a")).expect("Failed to create symlink");
    let retype = git_commit_with_timestamp(dir, "Make a a symlink", "2024-01-01 11:00:00 +0000");
    let link = git_rev_parse(dir, "HEAD:a");

    let lines = dump_lines(dir, &["--no-refs"]);

    let changes = lines
        .iter()
        .filter(|line| line.starts_with(&format!("commit {retype} file")))
        .collect::<Vec<_>>();
    assert_eq!(
        changes,
        vec![
            &format!("commit {retype} fileremove a"),
            &format!("commit {retype} filecreate a {link}"),
        ]
    );
    assert!(lines.contains(&format!(r#"blob {link} "target""#)));
}

#[cfg(unix)]
#[rstest]
fn dump_executable_bit_change_is_a_modify(git_repository: TempDir) {
    use std::os::unix::fs::PermissionsExt;

    let dir = git_repository.path();
    write_file(FileSpec::new(dir.join("run.sh"), "echo hi\n".to_string()));
    git_commit_with_timestamp(dir, "Add script", "2024-01-01 10:00:00 +0000");

    std::fs::set_permissions(dir.join("run.sh"), std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make run.sh executable");
    let chmod = git_commit_with_timestamp(dir, "Make it executable", "2024-01-01 11:00:00 +0000");
    let blob = git_rev_parse(dir, "HEAD:run.sh");

    let lines = dump_lines(dir, &["--no-refs"]);

    assert!(lines.contains(&format!("commit {chmod} filemodify run.sh {blob}")));
}
