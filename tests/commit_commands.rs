use assert_fs::TempDir;
use assert_fs::prelude::PathChild;
use common::command::{
    RandomAuthor, committed_repository_dir, generate_random_author, plumb_commit, plumb_commit_as,
    plumb_stdout, run_git_command, run_plumb_command, staged_repository_dir,
};
use common::file::{FileSpec, write_file};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

fn head_commit(dir: &std::path::Path) -> String {
    std::fs::read_to_string(dir.join(".git/refs/heads/master"))
        .expect("master has no commit")
        .trim()
        .to_string()
}

#[rstest]
fn write_tree_matches_git(staged_repository_dir: TempDir) {
    if !common::git_available() {
        return;
    }
    let dir = staged_repository_dir.path();

    let plumb_tree = plumb_stdout(dir, &["write-tree"]);

    std::fs::remove_dir_all(dir.join(".git")).unwrap();
    run_git_command(dir, &["init"]).assert().success();
    run_git_command(dir, &["add", "."]).assert().success();
    run_git_command(dir, &["write-tree"])
        .assert()
        .success()
        .stdout(plumb_tree);
}

#[rstest]
fn write_tree_stores_nested_trees(staged_repository_dir: TempDir) {
    let dir = staged_repository_dir.path();
    let root = plumb_stdout(dir, &["write-tree"]);

    let listing = plumb_stdout(dir, &["cat-file", "-p", root.trim()]);
    let lines = listing.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("100644 blob 43dd47ea691c90a5fa7827892c70241913351963\t1.txt"));
    assert!(lines[1].starts_with("040000 tree "));
    assert!(lines[1].ends_with("\ta"));

    let subtree = lines[1].split_whitespace().nth(2).unwrap();
    run_plumb_command(dir, &["cat-file", "-p", subtree])
        .assert()
        .success()
        .stdout(predicate::str::contains("\t2.txt\n"))
        .stdout(predicate::str::contains("040000 tree "));
}

#[rstest]
fn first_commit_is_a_root_commit(staged_repository_dir: TempDir) {
    let dir = staged_repository_dir.path();

    plumb_commit(dir, "Initial commit\n\nWith a body")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[master \(root-commit\) [0-9a-f]{7}\] Initial commit\n$").unwrap());

    let commit = plumb_stdout(dir, &["cat-file", "-p", &head_commit(dir)]);
    let tree = plumb_stdout(dir, &["write-tree"]);
    assert_eq!(
        commit,
        format!(
            "tree {}\n\
             author fake_user <fake_email@email.com> 1672574400 +0000\n\
             committer fake_user <fake_email@email.com> 1672574400 +0000\n\
             \n\
             Initial commit\n\nWith a body\n",
            tree.trim()
        )
    );
}

#[rstest]
fn later_commits_point_at_their_parent(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    let first = head_commit(dir);

    write_file(FileSpec::new(dir.join("4.txt"), "four".to_string()));
    run_plumb_command(dir, &["add", "4.txt"]).assert().success();

    let author = generate_random_author();
    plumb_commit_as(dir, "Add 4.txt", &author)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[master [0-9a-f]{7}\] Add 4.txt\n$").unwrap());

    let second = head_commit(dir);
    assert_ne!(first, second);
    run_plumb_command(dir, &["cat-file", "-p", &second[..7]])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("parent {first}\n")))
        .stdout(predicate::str::contains(format!("author {} <{}>", author.name, author.email)));
}

#[rstest]
fn commits_match_git_commit_tree(committed_repository_dir: TempDir) {
    if !common::git_available() {
        return;
    }
    let dir = committed_repository_dir.path();
    let commit = head_commit(dir);
    let tree = plumb_stdout(dir, &["write-tree"]);

    let author = RandomAuthor::new("fake_user".to_string(), "fake_email@email.com".to_string());
    let mut git = run_git_command(dir, &["commit-tree", tree.trim(), "-m", "Initial commit"]);
    git.envs(vec![
        ("GIT_AUTHOR_NAME", author.name.as_str()),
        ("GIT_AUTHOR_EMAIL", author.email.as_str()),
        ("GIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"),
        ("GIT_COMMITTER_NAME", author.name.as_str()),
        ("GIT_COMMITTER_EMAIL", author.email.as_str()),
        ("GIT_COMMITTER_DATE", "2023-01-01 12:00:00 +0000"),
    ]);

    git.assert().success().stdout(format!("{commit}\n"));
}

#[rstest]
fn commit_requires_an_author(staged_repository_dir: TempDir) {
    run_plumb_command(staged_repository_dir.path(), &["commit", "-m", "anonymous"])
        .env_remove("GIT_AUTHOR_NAME")
        .env_remove("GIT_AUTHOR_EMAIL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GIT_AUTHOR_NAME is not set"));

    assert!(!staged_repository_dir.child(".git/refs/heads/master").path().exists());
}

#[rstest]
fn commit_rejects_an_empty_message(staged_repository_dir: TempDir) {
    plumb_commit(staged_repository_dir.path(), "   ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty commit message"));
}

#[rstest]
fn commit_refuses_a_branch_tip_that_is_not_a_commit(staged_repository_dir: TempDir) {
    let dir = staged_repository_dir.path();
    // the blob of 1.txt
    let blob = "43dd47ea691c90a5fa7827892c70241913351963";
    std::fs::write(dir.join(".git/refs/heads/master"), format!("{blob}\n")).unwrap();

    plumb_commit(dir, "Second commit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is a blob, not a commit"));

    assert_eq!(head_commit(dir), blob);
}
