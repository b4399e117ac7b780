// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use std::path::PathBuf;

use clap::Parser;
use dzmod::cli::{Cli, Command};

// =============================================================================
// Version and config listing
// =============================================================================

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["dzmod", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_no_command() {
    let cli = Cli::try_parse_from(["dzmod"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn cli_no_default_inis_with_explicit_ini() {
    let cli = Cli::try_parse_from(["dzmod", "--no-default-inis", "-i", "ci.toml", "inis"]).unwrap();
    assert!(cli.global.no_default_inis);
    assert_eq!(cli.global.inis, [PathBuf::from("ci.toml")]);
    assert!(matches!(cli.command, Some(Command::Inis)));
}

#[test]
fn cli_log_file_override() {
    let cli = Cli::try_parse_from([
        "dzmod",
        "--file-log-level",
        "6",
        "--log-file",
        "dzmod.log",
        "options",
    ])
    .unwrap();
    insta::assert_snapshot!(cli.global.to_config_overrides().join("\n"), @r"
    global/file_log_level=6
    global/log_file=dzmod.log
    ");
}

// =============================================================================
// Mod commands
// =============================================================================

#[test]
fn cli_status_defaults() {
    let cli = Cli::try_parse_from(["dzmod", "status"]).unwrap();
    let Some(Command::Status(args)) = cli.command else {
        panic!("expected status");
    };
    assert!(args.root.is_none());
    assert!(!args.json);
}

#[test]
fn cli_build_all_with_root() {
    let cli = Cli::try_parse_from(["dzmod", "build", "-a", "-r", "P:/Mods"]).unwrap();
    let Some(Command::Build(args)) = cli.command else {
        panic!("expected build");
    };
    assert!(args.all);
    assert!(args.paths.is_empty());
    assert_eq!(args.root, Some(PathBuf::from("P:/Mods")));
}

#[test]
fn cli_link_requires_name() {
    assert!(Cli::try_parse_from(["dzmod", "link"]).is_err());
}

// =============================================================================
// Server commands
// =============================================================================

#[test]
fn cli_server_commands() {
    let server = Cli::try_parse_from(["dzmod", "server"]).unwrap();
    assert!(matches!(server.command, Some(Command::Server)));

    let kill = Cli::try_parse_from(["dzmod", "client", "-k"]).unwrap();
    assert!(matches!(kill.command, Some(Command::Client(ref args)) if args.kill));

    let auto = Cli::try_parse_from(["dzmod", "auto"]).unwrap();
    assert!(matches!(auto.command, Some(Command::Auto(ref args)) if args.delay.is_none()));

    let configs = Cli::try_parse_from(["dzmod", "configs"]).unwrap();
    assert!(matches!(configs.command, Some(Command::Configs)));
}
