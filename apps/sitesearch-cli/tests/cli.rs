use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let seo = tmp.path().join("content/services/seo.md");
    fs::create_dir_all(seo.parent().unwrap()).unwrap();
    fs::write(&seo, "---\ntitle: Local SEO\n---\nWe provide local SEO optimisation for small business websites.").unwrap();
    tmp
}

fn build(dir: &TempDir) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_sitesearch-build")).current_dir(dir.path()).env("RUST_LOG", "off").output().unwrap()
}

#[test]
fn build_then_query_prints_top_hit() {
    let dir = site();
    let out = build(&dir);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(dir.path().join("data/search-index.json").is_file());

    let out = Command::new(env!("CARGO_BIN_EXE_sitesearch-query"))
        .arg("local seo small business")
        .current_dir(dir.path())
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Query: local seo small business"));
    assert!(stdout.contains("path=content/services/seo.md"));
    assert!(stdout.contains("title=Local SEO"));
}

#[test]
fn empty_corpus_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let out = build(&dir);
    assert!(out.status.success());
    assert!(dir.path().join("data/search-index.json").is_file());
}

#[test]
fn unwritable_output_fails_the_build() {
    let dir = site();
    fs::write(dir.path().join("data"), "not a directory").unwrap();
    assert!(!build(&dir).status.success());
}

#[test]
fn query_without_argument_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_sitesearch-query")).current_dir(dir.path()).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

#[test]
fn query_against_missing_index_finds_nothing() {
    let dir = TempDir::new().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_sitesearch-query"))
        .arg("anything")
        .current_dir(dir.path())
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Found 0 results"));
}
