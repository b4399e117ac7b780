// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use super::catalog::{ModCatalog, ModKind, ModSource, scan_local, scan_workshop};
use super::descriptor::{extract_id, extract_meta_name, is_descriptor_name, resolve_mod_id};
use super::paths::{
    Workspace, absolutize, drive_root, is_under_root, link_name, mod_folder_name,
    resolve_output_layout, resolve_output_path, resolve_scan_root, sanitize, strip_parenthetical,
};
use super::scanner::{ModScanner, ModStatus};
use crate::config::Config;
use crate::config::provider::StaticConfig;

fn scanner(config: Config) -> ModScanner {
    ModScanner::new(Arc::new(StaticConfig::new(config)), Workspace::default())
}

fn write_mod(dir: &Path, class: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(
        dir.join("config.cpp"),
        format!("class CfgPatches\n{{\n    class {class}\n    {{\n    }};\n}};\n"),
    )
    .unwrap();
}

// =============================================================================
// Names and paths
// =============================================================================

#[test]
fn test_sanitize_replaces_reserved_and_is_idempotent() {
    let once = sanitize(r#"a<b>c:d"e/f\g|h?i*j"#);
    assert_eq!(once, "a_b_c_d_e_f_g_h_i_j");
    assert_eq!(sanitize(&once), once);
}

#[test]
fn test_strip_parenthetical() {
    assert_eq!(strip_parenthetical("Foo (Workspace)"), "Foo");
    assert_eq!(strip_parenthetical("  Plain  "), "Plain");
    assert_eq!(strip_parenthetical("(Only)"), "(Only)");
}

#[test]
fn test_link_name() {
    assert_eq!(link_name("CF"), "@CF");
    assert_eq!(link_name("@CF"), "@CF");
    assert_eq!(link_name("A:B"), "@A_B");
}

#[test]
fn test_absolutize_folds_dots() {
    let base = std::env::temp_dir();
    let messy = base.join("a").join(".").join("b").join("..").join("c");
    assert_eq!(absolutize(&messy), base.join("a").join("c"));
    assert_eq!(absolutize(Path::new("P:/Mods/./X")), PathBuf::from("P:/Mods/X"));
    assert!(absolutize(Path::new("relative/x")).is_absolute());
    assert!(absolutize(Path::new(".")).file_name().is_some());
}

#[test]
fn test_drive_root() {
    assert_eq!(drive_root(Path::new("P:/Mods/X")), PathBuf::from("P:/"));
    assert_eq!(drive_root(Path::new("relative/x")), PathBuf::new());
    #[cfg(unix)]
    assert_eq!(drive_root(Path::new("/home/me/x")), PathBuf::from("/"));
}

#[test]
fn test_folder_name_without_output_root_uses_source_basename() {
    let config = Config::default();
    let name = mod_folder_name(&config, Path::new("P:/Mods/MyMod"), &Workspace::default());
    assert_eq!(name, "@MyMod");
}

#[test]
fn test_folder_name_with_output_root_uses_workspace() {
    let mut config = Config::default();
    config.paths.output = Some(PathBuf::from("D:/Out"));

    let workspace = Workspace::new(Some("Pack (Workspace)".to_string()), None, Vec::new());
    assert_eq!(
        mod_folder_name(&config, Path::new("P:/A"), &workspace),
        "@Pack"
    );
    assert_eq!(
        mod_folder_name(&config, Path::new("P:/A"), &Workspace::default()),
        "@DayZMod"
    );

    config.build.mod_folder_name = Some("@My:Pack".to_string());
    assert_eq!(
        mod_folder_name(&config, Path::new("P:/A"), &workspace),
        "@My_Pack"
    );
}

#[test]
fn test_workspace_display_name_from_file() {
    let workspace = Workspace::new(
        None,
        Some(PathBuf::from("P:/mods.code-workspace")),
        vec![PathBuf::from("P:/ModA")],
    );
    assert_eq!(workspace.display_name().as_deref(), Some("mods (Workspace)"));
    assert_eq!(workspace.scan_root(), Some(PathBuf::from("P:/")));
}

#[test]
fn test_resolve_scan_root_precedence() {
    let config = Config::default();
    let folders = Workspace::new(None, None, vec![PathBuf::from("P:/First")]);

    assert_eq!(
        resolve_scan_root(Some(Path::new("P:/Explicit")), &folders, &config),
        PathBuf::from("P:/Explicit")
    );
    assert_eq!(
        resolve_scan_root(None, &folders, &config),
        PathBuf::from("P:/First")
    );
    assert_eq!(
        resolve_scan_root(None, &Workspace::default(), &config),
        PathBuf::from("P:/")
    );
}

#[test]
fn test_output_path_on_source_drive() {
    let config = Config::default();
    let path = resolve_output_path(
        &config,
        Path::new("P:/Mods/MyMod"),
        "My|Id",
        &Workspace::default(),
    );
    assert_eq!(path, PathBuf::from("P:/@MyMod/addons/My_Id.pbo"));
}

#[test]
fn test_output_layout_with_output_root() {
    let mut config = Config::default();
    config.paths.output = Some(PathBuf::from("D:/Out"));
    config.build.mod_folder_name = Some("Pack".to_string());

    let layout = resolve_output_layout(&config, Path::new("P:/A"), "A", &Workspace::default());
    assert!(layout.explicit_root());
    assert_eq!(layout.folder_name(), "@Pack");
    assert_eq!(layout.folder_dir(), Path::new("D:/Out/@Pack"));
    assert_eq!(layout.artifact(), Path::new("D:/Out/@Pack/addons/A.pbo"));
}

#[test]
fn test_is_under_root() {
    assert!(is_under_root(Path::new(r"p:\mods\x"), Path::new("P:/")));
    assert!(is_under_root(Path::new("P:/Mods/X"), Path::new("P:/mods")));
    assert!(!is_under_root(Path::new("P:/ModsX"), Path::new("P:/Mods")));
    assert!(!is_under_root(Path::new("C:/Mods"), Path::new("P:/")));
}

// =============================================================================
// Descriptors
// =============================================================================

#[test]
fn test_extract_id_first_class_in_cfg_patches() {
    let text = r"
class CfgMods { class Other {}; };
class CfgPatches
{
    // comment
    class MyMod_Scripts
    {
        units[] = {};
    };
    class Second {};
};";
    assert_eq!(extract_id(text).as_deref(), Some("MyMod_Scripts"));
    assert_eq!(extract_id("class CfgMods { class X {}; };"), None);
}

#[test]
fn test_extract_meta_name() {
    let text = "protocol = 1;\npublishedid = 1559212036;\nname = \"Community Framework\";\n";
    assert_eq!(extract_meta_name(text).as_deref(), Some("Community Framework"));
    assert_eq!(extract_meta_name("protocol = 1;"), None);
}

#[test]
fn test_is_descriptor_name_case_insensitive() {
    assert!(is_descriptor_name("Config.CPP"));
    assert!(is_descriptor_name("CONFIG.BIN"));
    assert!(!is_descriptor_name("meta.cpp"));
}

#[tokio::test]
async fn test_resolve_mod_id_falls_back_to_folder() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("Fallback");
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(dir.join("config.cpp"), "class CfgVehicles {};").unwrap();
    assert_eq!(resolve_mod_id(&dir).await, "Fallback");

    write_mod(&temp.path().join("Named"), "RealId");
    assert_eq!(resolve_mod_id(&temp.path().join("Named")).await, "RealId");
}

// =============================================================================
// Status
// =============================================================================

#[test]
fn test_status_classify() {
    let t = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
    let later = t + Duration::from_secs(1);

    assert_eq!(ModStatus::classify(t, None), ModStatus::Pending);
    assert_eq!(ModStatus::classify(later, Some(t)), ModStatus::Modified);
    assert_eq!(ModStatus::classify(t, Some(t)), ModStatus::Ok);
    assert_eq!(ModStatus::classify(t, Some(later)), ModStatus::Ok);

    assert!(ModStatus::Pending.needs_build());
    assert!(ModStatus::Modified.needs_build());
    assert!(!ModStatus::Ok.needs_build());
}

#[test]
fn test_status_display() {
    insta::assert_snapshot!(
        format!("{} {} {}", ModStatus::Pending, ModStatus::Modified, ModStatus::Ok),
        @"pending modified ok"
    );
}

// =============================================================================
// Scanner
// =============================================================================

#[tokio::test]
async fn test_scan_orders_and_skips() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    write_mod(&root.join("b/ModB"), "B");
    write_mod(&root.join("a/ModA"), "A");
    write_mod(&root.join("node_modules/Hidden"), "Hidden");
    write_mod(&root.join(".git/Dot"), "Dot");
    std::fs::create_dir_all(root.join("c/ModC")).unwrap();
    std::fs::write(root.join("c/ModC/CONFIG.BIN"), [0u8, 1, 2]).unwrap();

    let found = scanner(Config::default()).scan(root).await;
    let names: Vec<&str> = found.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["A", "B", "ModC"]);
    assert!(found.iter().all(|c| c.has_descriptor()));
}

#[tokio::test]
async fn test_scan_root_that_is_a_mod() {
    let temp = tempfile::tempdir().unwrap();
    write_mod(temp.path(), "Self");
    write_mod(&temp.path().join("inner"), "Inner");

    let found = scanner(Config::default()).scan(temp.path()).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "Self");
}

#[tokio::test]
async fn test_scan_missing_root_is_empty() {
    let temp = tempfile::tempdir().unwrap();
    let found = scanner(Config::default())
        .scan(&temp.path().join("missing"))
        .await;
    assert!(found.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_scan_follows_linked_descriptor() {
    let temp = tempfile::tempdir().unwrap();
    let shared = temp.path().join("shared");
    write_mod(&shared, "Linked");
    let dir = temp.path().join("src").join("Linked");
    std::fs::create_dir_all(&dir).unwrap();
    std::os::unix::fs::symlink(shared.join("config.cpp"), dir.join("config.cpp")).unwrap();

    let found = scanner(Config::default()).scan(&temp.path().join("src")).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "Linked");
    assert!(found[0].has_descriptor());
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_scan_local_only_at_folders() {
    let temp = tempfile::tempdir().unwrap();
    for dir in ["@B", "@A", "Plain"] {
        std::fs::create_dir(temp.path().join(dir)).unwrap();
    }
    std::fs::write(temp.path().join("@file"), "").unwrap();

    let local = scan_local(temp.path()).await;
    let names: Vec<String> = local.iter().map(ModSource::link_name).collect();
    assert_eq!(names, ["@A", "@B"]);
    assert!(local.iter().all(|m| m.kind() == ModKind::Local && !m.kind().can_build()));
}

#[tokio::test]
async fn test_scan_workshop_reads_meta() {
    let temp = tempfile::tempdir().unwrap();
    let named = temp.path().join("1559212036");
    let unnamed = temp.path().join("1564026768");
    let stray = temp.path().join("downloading");
    for dir in [&named, &unnamed, &stray] {
        std::fs::create_dir(dir).unwrap();
    }
    std::fs::write(named.join("meta.cpp"), "name = \"Community Framework\";").unwrap();
    std::fs::write(unnamed.join("meta.cpp"), "protocol = 1;").unwrap();

    let workshop = scan_workshop(temp.path()).await;
    let shown: Vec<String> = workshop.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(shown.join("\n"), @r"
    Community Framework [1559212036]
    Unknown Mod (1564026768) [1564026768]
    ");
    assert_eq!(workshop[0].link_name(), "@Community Framework");
}

#[tokio::test]
async fn test_catalog_enabled_flags_and_find() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("out");
    let server = temp.path().join("server");
    std::fs::create_dir_all(output.join("@Built")).unwrap();
    std::fs::create_dir_all(server.join("@Built")).unwrap();

    let mut config = Config::default();
    config.paths.output = Some(output);
    config.paths.server = Some(server);

    let catalog = ModCatalog::collect(&config, &[]).await;
    assert_eq!(catalog.entries().len(), 1);
    assert!(catalog.entries()[0].enabled);
    assert_eq!(catalog.of_kind(ModKind::Local).count(), 1);
    assert_eq!(catalog.of_kind(ModKind::Dev).count(), 0);
    assert!(catalog.find("built").is_some());
    assert!(catalog.find("@Missing").is_none());
}
