//! Reconciler behavior over a fake git collaborator.
//!
//! These exercise the transition order (validate -> check-dirty ->
//! compute-diff -> apply -> persist) and the drift-detection properties
//! without touching a real repository.

mod common;

use std::collections::BTreeSet;

use skillsctl::error::SkillsError;
use skillsctl::manifest::Manifest;
use skillsctl::reconciler::{ApplyOptions, Reconciler};

use common::{test_config, write_catalog, FakeVcs};

fn ids(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn pattern_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn install_on_empty_manifest_bootstraps_and_applies() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::new(); // submodule not yet registered

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let outcome = reconciler
        .install(&ids(&["pdf-tools"]), ApplyOptions::default())
        .unwrap();

    assert_eq!(outcome.added, ids(&["pdf-tools"]));
    assert!(outcome.changed);
    assert_eq!(
        outcome.patterns,
        pattern_set(&["catalog", "skills/pdf-tools"])
    );

    let state = vcs.state.borrow();
    assert!(state.registered, "install must bootstrap the submodule");
    assert!(state.sparse);
    assert_eq!(state.patterns, pattern_set(&["catalog", "skills/pdf-tools"]));
    drop(state);

    let manifest = Manifest::load(&dir.path().join(".claude/skills.manifest")).unwrap();
    assert_eq!(manifest.ids(), ["pdf-tools"]);
}

#[test]
fn install_unknown_skill_aborts_before_any_mutation() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let err = reconciler
        .install(&ids(&["pdf-tools", "ghost-skill"]), ApplyOptions::default())
        .unwrap_err();

    match err {
        SkillsError::UnknownSkill(unknown) => assert_eq!(unknown, ids(&["ghost-skill"])),
        other => panic!("expected UnknownSkill, got {other}"),
    }
    // partial application is forbidden
    assert_eq!(vcs.state.borrow().set_pattern_calls, 0);
    assert!(!dir.path().join(".claude/skills.manifest").exists());
}

#[test]
fn dirty_working_tree_aborts_unless_overridden() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();
    vcs.state.borrow_mut().dirty = true;

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);

    let err = reconciler
        .install(&ids(&["pdf-tools"]), ApplyOptions::default())
        .unwrap_err();
    assert!(matches!(err, SkillsError::DirtyWorkingTree(_)));
    assert!(!dir.path().join(".claude/skills.manifest").exists());

    let outcome = reconciler
        .install(
            &ids(&["pdf-tools"]),
            ApplyOptions {
                allow_dirty: true,
                stage: false,
            },
        )
        .unwrap();
    assert_eq!(outcome.added, ids(&["pdf-tools"]));
}

#[test]
fn install_already_present_is_reported_noop() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    reconciler
        .install(&ids(&["pdf-tools"]), ApplyOptions::default())
        .unwrap();
    let calls_after_first = vcs.state.borrow().set_pattern_calls;

    let outcome = reconciler
        .install(&ids(&["pdf-tools"]), ApplyOptions::default())
        .unwrap();
    assert!(outcome.added.is_empty());
    assert!(!outcome.changed);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(vcs.state.borrow().set_pattern_calls, calls_after_first);
}

#[test]
fn remove_not_installed_is_noop_not_error() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let outcome = reconciler
        .remove(&ids(&["nonexistent"]), ApplyOptions::default())
        .unwrap();

    assert!(outcome.removed.is_empty());
    assert!(!outcome.changed);
    assert_eq!(outcome.warnings, vec!["'nonexistent' is not installed"]);
}

#[test]
fn install_then_remove_restores_original_manifest() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();
    let manifest_path = dir.path().join(".claude/skills.manifest");

    Manifest::new(ids(&["markdown-helper"]))
        .save(&manifest_path)
        .unwrap();
    let before = Manifest::load(&manifest_path).unwrap();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    reconciler
        .install(&ids(&["pdf-tools"]), ApplyOptions::default())
        .unwrap();
    reconciler
        .remove(&ids(&["pdf-tools"]), ApplyOptions::default())
        .unwrap();

    let after = Manifest::load(&manifest_path).unwrap();
    assert_eq!(before, after);
    assert_eq!(
        vcs.state.borrow().patterns,
        pattern_set(&["catalog", "skills/markdown-helper"])
    );
}

#[test]
fn set_then_status_reports_zero_drift() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let outcome = reconciler
        .set(
            &ids(&["pdf-tools", "markdown-helper"]),
            ApplyOptions::default(),
        )
        .unwrap();
    assert_eq!(outcome.added, ids(&["pdf-tools", "markdown-helper"]));

    let report = reconciler.status().unwrap();
    assert!(!report.has_drift(), "freshly set state must show no drift");
    assert_eq!(report.installed, ids(&["pdf-tools", "markdown-helper"]));
}

#[test]
fn set_replaces_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    reconciler
        .install(&ids(&["markdown-helper"]), ApplyOptions::default())
        .unwrap();

    let outcome = reconciler
        .set(&ids(&["pdf-tools"]), ApplyOptions::default())
        .unwrap();
    assert_eq!(outcome.added, ids(&["pdf-tools"]));
    assert_eq!(outcome.removed, ids(&["markdown-helper"]));

    let manifest = Manifest::load(&dir.path().join(".claude/skills.manifest")).unwrap();
    assert_eq!(manifest.ids(), ["pdf-tools"]);
}

#[test]
fn sync_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();
    Manifest::new(ids(&["pdf-tools"]))
        .save(&dir.path().join(".claude/skills.manifest"))
        .unwrap();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);

    let first = reconciler.sync(ApplyOptions::default()).unwrap();
    assert!(first.changed);
    let calls_after_first = vcs.state.borrow().set_pattern_calls;
    let patterns_after_first = vcs.state.borrow().patterns.clone();

    let second = reconciler.sync(ApplyOptions::default()).unwrap();
    assert!(!second.changed, "second sync must not mutate");
    assert_eq!(vcs.state.borrow().set_pattern_calls, calls_after_first);
    assert_eq!(vcs.state.borrow().patterns, patterns_after_first);
}

#[test]
fn sync_bootstraps_a_missing_submodule() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::new();
    Manifest::new(ids(&["pdf-tools"]))
        .save(&dir.path().join(".claude/skills.manifest"))
        .unwrap();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let outcome = reconciler.sync(ApplyOptions::default()).unwrap();

    let state = vcs.state.borrow();
    assert!(state.registered);
    assert!(state.sparse);
    assert_eq!(state.patterns, pattern_set(&["catalog", "skills/pdf-tools"]));
    assert!(outcome.changed);
}

#[test]
fn sync_reports_dangling_manifest_ids_as_warnings() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();
    Manifest::new(ids(&["pdf-tools", "ghost-skill"]))
        .save(&dir.path().join(".claude/skills.manifest"))
        .unwrap();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let outcome = reconciler.sync(ApplyOptions::default()).unwrap();

    assert_eq!(outcome.unresolved, ids(&["ghost-skill"]));
    assert!(!outcome.warnings.is_empty());
    // the resolvable skill still gets materialized
    assert!(vcs
        .state
        .borrow()
        .patterns
        .contains("skills/pdf-tools"));
}

#[test]
fn pattern_failure_leaves_manifest_unpersisted() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();
    vcs.state.borrow_mut().fail_set_patterns = true;

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let err = reconciler
        .install(&ids(&["pdf-tools"]), ApplyOptions::default())
        .unwrap_err();
    assert!(matches!(err, SkillsError::VcsCommand { .. }));

    // declared state must never run ahead of materialized state
    assert!(!dir.path().join(".claude/skills.manifest").exists());
}

#[test]
fn status_reports_orphaned_and_missing_patterns() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();
    vcs.state.borrow_mut().patterns = pattern_set(&["catalog", "skills/stale-thing"]);
    Manifest::new(ids(&["pdf-tools"]))
        .save(&dir.path().join(".claude/skills.manifest"))
        .unwrap();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let report = reconciler.status().unwrap();

    assert!(report.has_drift());
    assert_eq!(report.missing_patterns, ids(&["skills/pdf-tools"]));
    assert_eq!(report.orphaned_patterns, ids(&["skills/stale-thing"]));
    assert!(report.dangling_ids.is_empty());
}

#[test]
fn status_survives_missing_catalog() {
    let dir = tempfile::tempdir().unwrap(); // no catalog written
    let config = test_config();
    let vcs = FakeVcs::initialized();
    Manifest::new(ids(&["pdf-tools"]))
        .save(&dir.path().join(".claude/skills.manifest"))
        .unwrap();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let report = reconciler.status().unwrap();

    assert_eq!(report.installed, ids(&["pdf-tools"]));
    assert!(!report.warnings.is_empty());
}

#[test]
fn remove_on_missing_submodule_is_submodule_missing() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::new();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let err = reconciler
        .remove(&ids(&["pdf-tools"]), ApplyOptions::default())
        .unwrap_err();
    assert!(matches!(err, SkillsError::SubmoduleMissing(_)));
}

#[test]
fn old_git_is_vcs_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let mut vcs = FakeVcs::initialized();
    vcs.version = (2, 20);

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let err = reconciler
        .install(&ids(&["pdf-tools"]), ApplyOptions::default())
        .unwrap_err();
    assert!(matches!(err, SkillsError::VcsUnavailable(_)));
}

#[test]
fn stage_option_stages_expected_paths() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let config = test_config();
    let vcs = FakeVcs::initialized();

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    reconciler
        .install(
            &ids(&["pdf-tools"]),
            ApplyOptions {
                allow_dirty: false,
                stage: true,
            },
        )
        .unwrap();

    let staged = vcs.state.borrow().staged.clone();
    assert!(staged.iter().any(|p| p.ends_with(".gitmodules")));
    assert!(staged.iter().any(|p| p.ends_with(".claude/skills")));
    assert!(staged.iter().any(|p| p.ends_with("skills.manifest")));
}

#[test]
fn doctor_flags_old_git_and_missing_submodule() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config();
    let mut vcs = FakeVcs::new();
    vcs.version = (2, 20);

    let reconciler = Reconciler::new(dir.path(), &config, &vcs);
    let report = reconciler.doctor();

    assert!(!report.ok());
    let version_check = report
        .checks
        .iter()
        .find(|c| c.name == "git version")
        .unwrap();
    assert!(!version_check.passed);
    let submodule_check = report
        .checks
        .iter()
        .find(|c| c.name == "skills submodule")
        .unwrap();
    assert!(!submodule_check.passed);
}
