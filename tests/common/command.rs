use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use derive_new::new;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with three staged files spread over nested directories
#[fixture]
pub fn staged_repository_dir(repository_dir: TempDir) -> TempDir {
    run_plumb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_plumb_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    repository_dir
}

/// A repository whose `master` branch holds one commit of the staged files
#[fixture]
pub fn committed_repository_dir(staged_repository_dir: TempDir) -> TempDir {
    plumb_commit(staged_repository_dir.path(), "Initial commit")
        .assert()
        .success();

    staged_repository_dir
}

pub fn run_plumb_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("plumb").expect("Failed to find plumb binary");
    cmd.current_dir(dir);
    cmd.env_remove("RUST_LOG");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    cmd.envs(vec![
        ("GIT_CONFIG_NOSYSTEM", "1"),
        ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ]);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

#[derive(Debug, Clone, new)]
pub struct RandomAuthor {
    pub name: String,
    pub email: String,
}

pub fn generate_random_author() -> RandomAuthor {
    use fake::Fake;
    use fake::faker::internet::en::FreeEmail;
    use fake::faker::name::en::Name;

    let name = Name().fake::<String>();
    let email = FreeEmail().fake::<String>();
    RandomAuthor::new(name, email)
}

pub fn plumb_commit(dir: &Path, message: &str) -> Command {
    let author = RandomAuthor::new("fake_user".to_string(), "fake_email@email.com".to_string());
    plumb_commit_as(dir, message, &author)
}

pub fn plumb_commit_as(dir: &Path, message: &str, author: &RandomAuthor) -> Command {
    let mut cmd = run_plumb_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", author.name.as_str()),
        ("GIT_AUTHOR_EMAIL", author.email.as_str()),
        ("GIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

/// Stdout of a successful plumb invocation
pub fn plumb_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_plumb_command(dir, args).assert().success();
    String::from_utf8(output.get_output().stdout.clone()).expect("stdout is not UTF-8")
}
