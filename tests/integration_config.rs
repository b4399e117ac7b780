// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests layered TOML files and overrides the way `main` assembles them.

use std::path::Path;

use dzmod::config::Config;
use dzmod::config::loader::ConfigLoader;

const WORKSTATION: &str = r#"
[global]
output_log_level = 4

[paths]
source = "P:/"
output = "D:/DayZ/Mods"
key = "D:/Keys/me.biprivatekey"
server = "D:/Steam/steamapps/common/DayZServer/DayZServer_x64.exe"
client = "D:/Steam/steamapps/common/DayZ"
workshop = "D:/Steam/steamapps/workshop/content/221100"

[build]
mod_folder_name = "MyPack"

[server]
port = 2402
config_file = "serverDZ_dev.cfg"
client_delay_secs = 30

[tools]
pbo_project = "C:/Program Files/Mikero/DePboTools/bin/pboProject.exe"
"#;

// =============================================================================
// Full files
// =============================================================================

#[test]
fn config_parse_workstation_file() {
    let config = Config::parse(WORKSTATION).unwrap();

    assert_eq!(config.global.output_log_level.as_u8(), 4);
    assert_eq!(config.paths.output_root(), Some(Path::new("D:/DayZ/Mods")));
    assert_eq!(
        config.paths.server_dir(),
        Some(Path::new("D:/Steam/steamapps/common/DayZServer"))
    );
    assert_eq!(config.build.folder_name_override(), Some("MyPack"));
    assert_eq!(config.server.port, 2402);
    assert_eq!(config.server.client_delay_secs, 30);
    assert!(config.source_root_mismatch().is_none());
}

#[test]
fn config_options_listing() {
    let config = Config::parse(WORKSTATION).unwrap();
    let listed: Vec<String> = config
        .format_options()
        .into_iter()
        .filter(|line| !line.ends_with("= "))
        .collect();
    insta::assert_snapshot!(listed.join("\n"), @r"
    build.mod_folder_name    = MyPack
    global.file_log_level    = 5
    global.output_log_level  = 4
    paths.client             = D:/Steam/steamapps/common/DayZ
    paths.key                = [hidden]
    paths.output             = D:/DayZ/Mods
    paths.server             = D:/Steam/steamapps/common/DayZServer/DayZServer_x64.exe
    paths.source             = P:/
    paths.workshop           = D:/Steam/steamapps/workshop/content/221100
    server.client_delay_secs = 30
    server.config_file       = serverDZ_dev.cfg
    server.ip                = 127.0.0.1
    server.port              = 2402
    tools.ds_sign_file       = auto
    tools.pbo_project        = C:/Program Files/Mikero/DePboTools/bin/pboProject.exe
    ");
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_later_files_and_overrides_win() {
    let temp = tempfile::tempdir().unwrap();
    let base = temp.path().join("dzmod.toml");
    let local = temp.path().join("local.toml");
    std::fs::write(&base, WORKSTATION).unwrap();
    std::fs::write(&local, "[server]\nport = 2502\nip = \"192.168.1.10\"\n").unwrap();

    let loader = ConfigLoader::new()
        .add_toml_file_optional(&base)
        .add_toml_file(&local)
        .with_overrides(&["server/port=2602".to_string()])
        .unwrap();
    let config = loader.build().unwrap();

    assert_eq!(config.server.ip, "192.168.1.10");
    assert_eq!(config.server.port, 2602);
    assert_eq!(config.server.config_file, "serverDZ_dev.cfg");
    assert_eq!(loader.loaded_files().len(), 2);
}

#[test]
fn config_missing_optional_file_uses_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let config = ConfigLoader::new()
        .add_toml_file_optional(temp.path().join("dzmod.toml"))
        .build()
        .unwrap();

    assert_eq!(config.server.port, 2302);
    assert_eq!(config.paths.source, Path::new("P:/"));
    assert!(config.paths.server_dir().is_none());
}

#[test]
fn config_missing_required_file_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let result = ConfigLoader::new()
        .add_toml_file(temp.path().join("missing.toml"))
        .build();
    assert!(result.is_err());
}

#[test]
fn config_rejects_unknown_section() {
    assert!(Config::parse("[task]\nmo_org = \"x\"\n").is_err());
}
