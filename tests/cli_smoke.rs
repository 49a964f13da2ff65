use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const ALICE: (&str, &str) = ("Alice", "alice@example.com");
const BOB: (&str, &str) = ("Bob", "bob@example.com");

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn init_git_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "core.safecrlf", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

fn commit_file(dir: &Path, author: (&str, &str), name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    git(dir, &["add", "."]);
    assert!(Command::new("git")
        .args(["commit", "-m", &format!("edit {name}")])
        .env("GIT_AUTHOR_NAME", author.0)
        .env("GIT_AUTHOR_EMAIL", author.1)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn tally_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let mut cmd = Command::cargo_bin("gchurn").unwrap();
    cmd.current_dir(dir)
        .arg("--repo")
        .arg(dir)
        .args(["tally", "--json"])
        .args(extra);
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

fn entry<'a>(v: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
    v["entries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["name"] == name)
        .unwrap_or_else(|| panic!("no entry for {name}"))
}

fn split(e: &serde_json::Value) -> (u64, u64, i64) {
    (
        e["contribution"].as_u64().unwrap(),
        e["churn"].as_u64().unwrap(),
        e["net"].as_i64().unwrap(),
    )
}

#[test]
fn tally_json_separates_contribution_and_churn() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    // -0,0 +1    -> new positions 0 and 1
    commit_file(dir.path(), ALICE, "a.txt", "one\n");
    // -1 +1,2    -> position 1 again
    commit_file(dir.path(), ALICE, "a.txt", "two\nthree\n");
    // -0,0 +1,3  -> someone else's ledger
    commit_file(dir.path(), BOB, "b.txt", "x\ny\nz\n");

    let v = tally_json(dir.path(), &[]);
    assert_eq!(v["version"], 1);
    assert_eq!(split(entry(&v, "Alice")), (1, 1, 0));
    assert_eq!(split(entry(&v, "Bob")), (3, 0, 3));
    assert_eq!(entry(&v, "Alice")["commit_count"], 2);
    assert!(entry(&v, "Alice").get("files").is_none());
}

#[test]
fn detail_and_author_filter() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), ALICE, "src/lib.rs", "fn a() {}\n");
    commit_file(dir.path(), BOB, "src/main.rs", "fn main() {}\n");

    let v = tally_json(dir.path(), &["--author", "ALICE@", "--detail"]);
    let entries = v["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    let files = &entries[0]["files"];
    assert_eq!(files["src/lib.rs"]["0"], 0);
    assert_eq!(files["src/lib.rs"]["1"], 1);
}

#[test]
fn merge_commits_are_not_replayed() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), ALICE, "file.txt", "a\n");

    git(dir.path(), &["checkout", "-b", "feat"]);
    commit_file(dir.path(), BOB, "feat.txt", "f1\nf2\n");
    git(dir.path(), &["checkout", "-"]);
    commit_file(dir.path(), ALICE, "file.txt", "a\nc\n");

    assert!(Command::new("git")
        .args(["merge", "--no-ff", "feat", "-m", "merge feat"])
        .env("GIT_AUTHOR_NAME", ALICE.0)
        .env("GIT_AUTHOR_EMAIL", ALICE.1)
        .env("GIT_COMMITTER_NAME", ALICE.0)
        .env("GIT_COMMITTER_EMAIL", ALICE.1)
        .current_dir(dir.path())
        .status()
        .unwrap()
        .success());

    let v = tally_json(dir.path(), &[]);
    // -0,0 +1 then -1,0 +2: two first touches worth one line each
    assert_eq!(split(entry(&v, "Alice")), (2, 0, 2));
    assert_eq!(entry(&v, "Alice")["commit_count"], 2);
    assert_eq!(split(entry(&v, "Bob")), (2, 0, 2));
}

#[test]
fn path_prefix_and_ndjson() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), ALICE, "src/lib.rs", "a\nb\n");
    commit_file(dir.path(), ALICE, "docs/guide.md", "1\n2\n3\n4\n");

    let mut cmd = Command::cargo_bin("gchurn").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["tally", "--ndjson", "src/"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let lines: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(split(&lines[0]), (2, 0, 2));
}

#[test]
fn authors_lists_identities() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), BOB, "b.txt", "b\n");
    commit_file(dir.path(), ALICE, "a.txt", "a\n");

    let mut cmd = Command::cargo_bin("gchurn").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .arg("authors");
    let out = cmd.assert().success().get_output().stdout.clone();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Alice <alice@example.com>\nBob <bob@example.com>\n"
    );
}

#[test]
fn table_output_and_chart_render() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), ALICE, "a.txt", "one\n");

    let mut cmd = Command::cargo_bin("gchurn").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["tally", "--chart"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Alice"));
    assert!(text.contains("Contribution vs. Churn"));
}

#[test]
fn bad_repository_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("gchurn").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .arg("tally");
    cmd.assert().failure();
}

#[test]
fn missing_blob_fails_the_tally() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), ALICE, "a.txt", "one\ntwo\n");

    let out = Command::new("git")
        .args(["rev-parse", "HEAD:a.txt"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    let blob = String::from_utf8(out.stdout).unwrap().trim().to_string();
    let loose = dir
        .path()
        .join(".git/objects")
        .join(&blob[..2])
        .join(&blob[2..]);
    fs::remove_file(loose).unwrap();

    let mut cmd = Command::cargo_bin("gchurn").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["tally", "--json"]);
    cmd.assert().failure();
}
