use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathChild};
use common::command::{plumb_stdout, repository_dir, run_git_command, run_plumb_command};
use common::file::write_generated_files;
use predicates::prelude::predicate;
use rstest::{fixture, rstest};

mod common;

#[fixture]
fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_plumb_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir
}

#[rstest]
fn hash_object_prints_the_blob_id_without_storing(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    dir.child("hello.txt").write_str("hello\n").unwrap();

    run_plumb_command(dir.path(), &["hash-object", "hello.txt"])
        .assert()
        .success()
        .stdout("ce013625030ba8dba906f756967f9e9ca394464a\n");

    assert!(!dir.child(".git/objects/ce").path().exists());
}

#[rstest]
fn write_blob_object_successfully(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let files = write_generated_files(dir.path(), 1);
    let file_name = files[0].path.file_name().unwrap().to_string_lossy().to_string();

    let oid = plumb_stdout(dir.path(), &["hash-object", "-w", &file_name]);
    let oid = oid.trim();

    assert!(dir.child(".git/objects").child(&oid[..2]).child(&oid[2..]).path().is_file());

    run_plumb_command(dir.path(), &["cat-file", "-p", &oid[..3]])
        .assert()
        .success()
        .stdout(files[0].content.clone());
    run_plumb_command(dir.path(), &["cat-file", "-t", oid])
        .assert()
        .success()
        .stdout("blob\n");
    run_plumb_command(dir.path(), &["cat-file", "-s", &oid[..8]])
        .assert()
        .success()
        .stdout(format!("{}\n", files[0].content.len()));

    Ok(())
}

#[rstest]
fn stored_blobs_are_readable_by_git(init_repository_dir: TempDir) {
    if !common::git_available() {
        return;
    }
    let dir = init_repository_dir;
    let files = write_generated_files(dir.path(), 3);

    for file in files {
        let file_name = file.path.file_name().unwrap().to_string_lossy().to_string();
        let oid = plumb_stdout(dir.path(), &["hash-object", "-w", &file_name]);

        run_git_command(dir.path(), &["hash-object", &file_name])
            .assert()
            .success()
            .stdout(oid.clone());
        run_git_command(dir.path(), &["cat-file", "-p", oid.trim()])
            .assert()
            .success()
            .stdout(file.content);
    }
}

#[rstest]
fn hash_object_accepts_an_explicit_type(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    dir.child("payload").write_str("not really a commit").unwrap();

    let oid = plumb_stdout(dir.path(), &["hash-object", "-w", "-t", "commit", "payload"]);

    run_plumb_command(dir.path(), &["cat-file", "-t", oid.trim()])
        .assert()
        .success()
        .stdout("commit\n");
    run_plumb_command(dir.path(), &["hash-object", "-t", "tag", "payload"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown object type"));
}

#[rstest]
fn unknown_prefix_is_not_found(init_repository_dir: TempDir) {
    run_plumb_command(init_repository_dir.path(), &["cat-file", "-p", "abcdef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[rstest]
#[case("ab")]
#[case("xyz")]
fn short_or_non_hex_prefix_is_rejected(init_repository_dir: TempDir, #[case] prefix: &str) {
    run_plumb_command(init_repository_dir.path(), &["cat-file", "-p", prefix])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 3 hexadecimal characters"));
}

#[rstest]
fn shared_prefix_is_ambiguous(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    // blob IDs 890d752a... and 890881f8...
    dir.child("first").write_str("payload-4").unwrap();
    dir.child("second").write_str("payload-58").unwrap();

    let first = plumb_stdout(dir.path(), &["hash-object", "-w", "first"]);
    let second = plumb_stdout(dir.path(), &["hash-object", "-w", "second"]);
    assert_eq!(&first[..3], &second[..3]);

    run_plumb_command(dir.path(), &["cat-file", "-p", &first[..3]])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ambiguous"));
    run_plumb_command(dir.path(), &["cat-file", "-p", &second[..4]])
        .assert()
        .success()
        .stdout("payload-58");
}

#[rstest]
fn cat_file_requires_exactly_one_mode(init_repository_dir: TempDir) {
    run_plumb_command(init_repository_dir.path(), &["cat-file", "abc"])
        .assert()
        .failure();
    run_plumb_command(init_repository_dir.path(), &["cat-file", "-t", "-s", "abc"])
        .assert()
        .failure();
}
