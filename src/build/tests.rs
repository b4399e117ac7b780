// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use super::orchestrator::{pbo_project_command, sign_command};
use super::state::{BuildMachine, BuildState};
use super::tools::{SystemTools, Tool, ToolResolver, parse_reg_query};
use crate::config::Config;
use crate::mods::paths::{Workspace, resolve_output_layout};

// =============================================================================
// State machine
// =============================================================================

#[test]
fn test_happy_path_trail() {
    let mut machine = BuildMachine::new();
    for next in [
        BuildState::ToolResolved,
        BuildState::Built,
        BuildState::SignSkipped,
        BuildState::Done,
    ] {
        machine.advance(next).unwrap();
    }
    assert!(machine.state().is_terminal());
    let trail: Vec<String> = machine.trail().iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(trail.join(" -> "), @"init -> tool-resolved -> built -> sign-skipped -> done");
}

#[test]
fn test_failed_build_cannot_sign() {
    let mut machine = BuildMachine::new();
    machine.advance(BuildState::ToolResolved).unwrap();
    machine.advance(BuildState::Failed).unwrap();

    let err = machine.advance(BuildState::Signed).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid build transition failed -> signed");
    assert_eq!(machine.state(), BuildState::Failed);
}

#[test]
fn test_transition_table() {
    use BuildState::{Built, Done, Failed, Init, SignFailed, SignSkipped, Signed, ToolResolved};

    assert!(Init.can_transition_to(Failed));
    assert!(!Init.can_transition_to(Built));
    assert!(!Built.can_transition_to(Failed));
    assert!(!Built.can_transition_to(Done));
    for sign in [Signed, SignSkipped, SignFailed] {
        assert!(Built.can_transition_to(sign));
        assert!(sign.can_transition_to(Done));
        assert!(!ToolResolved.can_transition_to(sign));
    }
    assert!(!Done.can_transition_to(Init));
}

// =============================================================================
// Tool lookup
// =============================================================================

#[test]
fn test_parse_reg_query() {
    let output = "\r\nHKEY_CURRENT_USER\\SOFTWARE\\Mikero\\pboProject\r\n    exe    REG_SZ    C:\\Program Files\\Mikero\\DePboTools\\bin\\pboProject.exe\r\n\r\n";
    assert_eq!(
        parse_reg_query(output, "exe").as_deref(),
        Some(r"C:\Program Files\Mikero\DePboTools\bin\pboProject.exe")
    );
    assert_eq!(parse_reg_query(output, "path"), None);

    let tools = "    path    REG_SZ    D:\\Steam\\steamapps\\common\\DayZ Tools\n";
    assert_eq!(
        parse_reg_query(tools, "PATH").as_deref(),
        Some(r"D:\Steam\steamapps\common\DayZ Tools")
    );
}

#[tokio::test]
async fn test_system_tools_prefers_config_override() {
    let temp = tempfile::tempdir().unwrap();
    let exe = temp.path().join("pboProject.exe");
    std::fs::write(&exe, "").unwrap();

    let mut config = Config::default();
    config.tools.pbo_project = Some(exe.clone());

    let tools = SystemTools::new().with_common_locations(Vec::new());
    assert_eq!(tools.resolve(Tool::PboProject, &config).await, Some(exe));
}

#[tokio::test]
async fn test_system_tools_common_location_fallback() {
    let temp = tempfile::tempdir().unwrap();
    let signer = temp.path().join("DSSignFile.exe");
    std::fs::write(&signer, "").unwrap();

    let mut config = Config::default();
    config.tools.ds_sign_file = Some(temp.path().join("missing.exe"));

    let tools = SystemTools::new().with_common_locations(vec![
        temp.path().join("nope.exe"),
        signer.clone(),
    ]);
    assert_eq!(tools.resolve(Tool::DsSignFile, &config).await, Some(signer));
}

#[cfg(unix)]
#[tokio::test]
async fn test_system_tools_not_found() {
    let tools = SystemTools::new().with_common_locations(Vec::new());
    assert_eq!(tools.resolve(Tool::PboProject, &Config::default()).await, None);
}

// =============================================================================
// Command lines
// =============================================================================

#[cfg(unix)]
#[test]
fn test_pbo_project_command_with_output_root() {
    let mut config = Config::default();
    config.paths.output = Some(PathBuf::from("D:/Out"));
    config.build.mod_folder_name = Some("Pack".to_string());
    let source = Path::new("P:/MyMod");
    let layout = resolve_output_layout(&config, source, "MyMod", &Workspace::default());

    let process = pbo_project_command(Path::new("pboProject.exe"), source, "MyMod", &layout);
    insta::assert_snapshot!(
        process.command_line(),
        @"pboProject.exe -E=dayz +H -P -L=MyMod -M=D:/Out/@Pack P:/MyMod"
    );
}

#[test]
fn test_pbo_project_command_without_output_root() {
    let config = Config::default();
    let source = Path::new("P:/MyMod");
    let layout = resolve_output_layout(&config, source, "MyMod", &Workspace::default());

    let process = pbo_project_command(Path::new("pboProject.exe"), source, "MyMod", &layout);
    assert!(!process.arguments().iter().any(|a| a.starts_with("-M=")));
    assert_eq!(process.arguments().last().map(String::as_str), Some("P:/MyMod"));
}

#[test]
fn test_sign_command_positionals() {
    let process = sign_command(
        Path::new("DSSignFile.exe"),
        Path::new("P:/keys/me.biprivatekey"),
        Path::new("P:/@Mod/addons/Mod.pbo"),
    );
    assert_eq!(
        process.arguments(),
        ["P:/keys/me.biprivatekey", "P:/@Mod/addons/Mod.pbo"]
    );
}
