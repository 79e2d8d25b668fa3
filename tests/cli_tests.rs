//! Binary-level tests for the CLI boundary.
//!
//! These only exercise paths that never shell out to git (config errors,
//! catalog listing, search), so they run anywhere.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const CATALOG_JSON: &str = r#"[
  {
    "id": "pdf-tools",
    "title": "PDF Tools",
    "description": "Work with PDF files",
    "tags": ["pdf", "doc"],
    "path": "skills/pdf-tools"
  },
  {
    "id": "markdown-helper",
    "title": "Markdown Helper",
    "description": "Edit markdown",
    "tags": ["md"],
    "path": "skills/markdown-helper"
  }
]
"#;

fn write_catalog(project_root: &Path) {
    let path = project_root.join(".claude/skills/catalog/skills.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, CATALOG_JSON).unwrap();
}

fn skillsctl(project_root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("skillsctl").unwrap();
    cmd.arg("-C")
        .arg(project_root)
        .env_remove("SKILLS_REPO_URL")
        .env_remove("SKILLS_REPO_BRANCH");
    cmd
}

#[test]
fn install_without_config_fails_fast() {
    let dir = tempfile::tempdir().unwrap();

    skillsctl(dir.path())
        .args(["install", "pdf-tools", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn suggest_ranks_catalog_entries() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());

    skillsctl(dir.path())
        .env("SKILLS_REPO_URL", "https://example.com/skills.git")
        .args(["suggest", "pdf", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pdf-tools"));
}

#[test]
fn suggest_with_no_match_is_empty_success() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());

    skillsctl(dir.path())
        .env("SKILLS_REPO_URL", "https://example.com/skills.git")
        .args(["suggest", "nonexistent-query-zzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No skills found"));
}

#[test]
fn catalog_lists_all_entries() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());

    skillsctl(dir.path())
        .env("SKILLS_REPO_URL", "https://example.com/skills.git")
        .arg("catalog")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("pdf-tools")
                .and(predicate::str::contains("markdown-helper")),
        );
}

#[test]
fn missing_catalog_is_a_distinct_error() {
    let dir = tempfile::tempdir().unwrap(); // config, but no checkout yet

    skillsctl(dir.path())
        .env("SKILLS_REPO_URL", "https://example.com/skills.git")
        .arg("catalog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("catalog unavailable"));
}

#[test]
fn json_errors_carry_a_stable_code() {
    let dir = tempfile::tempdir().unwrap();

    skillsctl(dir.path())
        .args(["--json", "install", "pdf-tools", "--yes"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("configuration_error"));
}
