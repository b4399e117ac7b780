// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the build pipeline with stand-in tools.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;

use dzmod::build::launcher::Launcher;
use dzmod::build::report::Reporter;
use dzmod::build::tools::{Tool, ToolResolver};
use dzmod::build::{BuildOrchestrator, BuildState};
use dzmod::config::Config;
use dzmod::config::provider::StaticConfig;
use dzmod::core::process::builder::{ProcessBuilder, ProcessOutput};
use dzmod::error::ErrorKind;
use dzmod::mods::paths::Workspace;

/// Resolves only the tools it was given.
struct FakeTools {
    pbo_project: Option<PathBuf>,
    ds_sign_file: Option<PathBuf>,
}

impl ToolResolver for FakeTools {
    fn resolve<'a>(&'a self, tool: Tool, _config: &'a Config) -> BoxFuture<'a, Option<PathBuf>> {
        let found = match tool {
            Tool::PboProject => self.pbo_project.clone(),
            Tool::DsSignFile => self.ds_sign_file.clone(),
        };
        Box::pin(async move { found })
    }
}

/// Records every launch; "packs" by writing `artifact` and answers each run
/// with the next queued exit code (0 once the queue is empty).
struct FakeLauncher {
    artifact: Option<PathBuf>,
    exit_codes: Mutex<VecDeque<i32>>,
    launched: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeLauncher {
    fn new(artifact: Option<PathBuf>, exit_codes: &[i32]) -> Self {
        Self {
            artifact,
            exit_codes: Mutex::new(exit_codes.iter().copied().collect()),
            launched: Mutex::new(Vec::new()),
        }
    }

    fn launched(&self) -> Vec<String> {
        self.launched
            .lock()
            .unwrap()
            .iter()
            .map(|(program, _)| program.clone())
            .collect()
    }

    fn arguments(&self, index: usize) -> Vec<String> {
        self.launched.lock().unwrap()[index].1.clone()
    }
}

impl Launcher for FakeLauncher {
    fn run<'a>(
        &'a self,
        process: ProcessBuilder,
    ) -> BoxFuture<'a, dzmod::error::Result<ProcessOutput>> {
        Box::pin(async move {
            let program = process
                .program()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.launched
                .lock()
                .unwrap()
                .push((program, process.arguments().to_vec()));
            if let Some(artifact) = &self.artifact {
                std::fs::create_dir_all(artifact.parent().unwrap()).unwrap();
                std::fs::write(artifact, b"pbo").unwrap();
            }
            let code = self.exit_codes.lock().unwrap().pop_front().unwrap_or(0);
            Ok(ProcessOutput::new(code, "packed".to_string(), String::new()))
        })
    }
}

#[derive(Default)]
struct RecordingReporter {
    messages: Mutex<Vec<String>>,
    refreshes: Mutex<usize>,
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push(format!("info: {message}"));
    }

    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(format!("warn: {message}"));
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(format!("error: {message}"));
    }

    fn refresh(&self) {
        *self.refreshes.lock().unwrap() += 1;
    }
}

struct Fixture {
    _temp: tempfile::TempDir,
    mod_dir: PathBuf,
    artifact: PathBuf,
    config: Config,
}

fn fixture() -> Fixture {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("src");
    let mod_dir = source.join("MyMod");
    std::fs::create_dir_all(&mod_dir).unwrap();
    std::fs::write(
        mod_dir.join("config.cpp"),
        "class CfgPatches { class MyMod_Core { }; };",
    )
    .unwrap();

    let mut config = Config::default();
    config.paths.source = source;
    config.paths.output = Some(temp.path().join("out"));
    config.build.mod_folder_name = Some("Pack".to_string());

    let artifact = temp
        .path()
        .join("out")
        .join("@Pack")
        .join("addons")
        .join("MyMod_Core.pbo");
    Fixture {
        _temp: temp,
        mod_dir,
        artifact,
        config,
    }
}

fn orchestrator(
    config: Config,
    tools: FakeTools,
    launcher: &Arc<FakeLauncher>,
    reporter: &Arc<RecordingReporter>,
) -> BuildOrchestrator {
    BuildOrchestrator::new(Arc::new(StaticConfig::new(config)), Workspace::default())
        .with_tools(Arc::new(tools))
        .with_launcher(Arc::clone(launcher) as Arc<dyn Launcher>)
        .with_reporter(Arc::clone(reporter) as Arc<dyn Reporter>)
}

fn pbo_project_only(fx: &Fixture) -> FakeTools {
    FakeTools {
        pbo_project: Some(fx.mod_dir.join("pboProject.exe")),
        ds_sign_file: None,
    }
}

fn both_tools() -> FakeTools {
    FakeTools {
        pbo_project: Some(PathBuf::from("pboProject.exe")),
        ds_sign_file: Some(PathBuf::from("DSSignFile.exe")),
    }
}

// =============================================================================
// Packaging
// =============================================================================

#[tokio::test]
async fn build_without_packaging_tool_fails_and_spawns_nothing() {
    let fx = fixture();
    let launcher = Arc::new(FakeLauncher::new(None, &[]));
    let reporter = Arc::new(RecordingReporter::default());
    let tools = FakeTools {
        pbo_project: None,
        ds_sign_file: Some(PathBuf::from("DSSignFile.exe")),
    };

    let result = orchestrator(fx.config.clone(), tools, &launcher, &reporter)
        .build(&fx.mod_dir)
        .await;

    assert!(!result.succeeded());
    assert!(!result.signed());
    assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
    assert_eq!(result.trail(), [BuildState::Init, BuildState::Failed]);
    assert!(launcher.launched().is_empty());
    assert_eq!(*reporter.refreshes.lock().unwrap(), 1);
}

#[tokio::test]
async fn build_with_nonzero_exit_fails() {
    let fx = fixture();
    let launcher = Arc::new(FakeLauncher::new(None, &[3]));
    let reporter = Arc::new(RecordingReporter::default());

    let result = orchestrator(fx.config.clone(), pbo_project_only(&fx), &launcher, &reporter)
        .build(&fx.mod_dir)
        .await;

    assert!(!result.succeeded());
    assert_eq!(result.error_kind(), Some(ErrorKind::ExternalToolFailure));
    assert_eq!(result.log(), "packed");
    assert_eq!(launcher.launched(), ["pboProject.exe"]);
}

#[tokio::test]
async fn build_with_unwritable_output_fails_before_packing() {
    let fx = fixture();
    let output = fx.config.paths.output.clone().unwrap();
    std::fs::write(&output, b"not a directory").unwrap();
    let launcher = Arc::new(FakeLauncher::new(None, &[]));
    let reporter = Arc::new(RecordingReporter::default());

    let result = orchestrator(fx.config.clone(), pbo_project_only(&fx), &launcher, &reporter)
        .build(&fx.mod_dir)
        .await;

    assert!(!result.succeeded());
    assert_eq!(result.error_kind(), Some(ErrorKind::IoFailure));
    assert_eq!(
        result.trail(),
        [BuildState::Init, BuildState::ToolResolved, BuildState::Failed]
    );
    assert!(launcher.launched().is_empty());
}

#[tokio::test]
async fn build_relative_source_is_made_absolute() {
    let fx = fixture();
    let launcher = Arc::new(FakeLauncher::new(Some(fx.artifact.clone()), &[]));
    let reporter = Arc::new(RecordingReporter::default());

    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(&fx.mod_dir).unwrap();
    let expected = std::env::current_dir().unwrap();
    let result = orchestrator(fx.config.clone(), pbo_project_only(&fx), &launcher, &reporter)
        .build(Path::new("."))
        .await;
    std::env::set_current_dir(original).unwrap();

    assert!(result.succeeded());
    assert_eq!(result.mod_name(), "MyMod_Core");
    assert_eq!(result.source_path(), expected);
    let source_arg = launcher.arguments(0).last().cloned().unwrap();
    assert_eq!(PathBuf::from(source_arg), expected);
}

// =============================================================================
// Signing
// =============================================================================

#[tokio::test]
async fn build_with_missing_signer_succeeds_unsigned_with_warning() {
    let mut fx = fixture();
    fx.config.paths.key = Some(PathBuf::from("keys/me.biprivatekey"));
    let launcher = Arc::new(FakeLauncher::new(Some(fx.artifact.clone()), &[]));
    let reporter = Arc::new(RecordingReporter::default());

    let result = orchestrator(fx.config.clone(), pbo_project_only(&fx), &launcher, &reporter)
        .build(&fx.mod_dir)
        .await;

    assert!(result.succeeded());
    assert!(!result.signed());
    assert_eq!(result.mod_name(), "MyMod_Core");
    assert_eq!(result.output_artifact_path(), Some(fx.artifact.as_path()));
    insta::assert_snapshot!(result.warnings().join("\n"), @"DSSignFile not found, MyMod_Core was not signed");
    assert_eq!(
        result.trail(),
        [
            BuildState::Init,
            BuildState::ToolResolved,
            BuildState::Built,
            BuildState::SignSkipped,
            BuildState::Done,
        ]
    );
    assert_eq!(launcher.launched(), ["pboProject.exe"]);
}

#[tokio::test]
async fn build_with_signer_signs_artifact() {
    let mut fx = fixture();
    fx.config.paths.key = Some(PathBuf::from("keys/me.biprivatekey"));
    let launcher = Arc::new(FakeLauncher::new(Some(fx.artifact.clone()), &[]));
    let reporter = Arc::new(RecordingReporter::default());
    let tools = FakeTools {
        pbo_project: Some(PathBuf::from("pboProject.exe")),
        ds_sign_file: Some(PathBuf::from("DSSignFile.exe")),
    };

    let result = orchestrator(fx.config.clone(), tools, &launcher, &reporter)
        .build(&fx.mod_dir)
        .await;

    assert!(result.succeeded());
    assert!(result.signed());
    assert!(result.warnings().is_empty());
    assert_eq!(launcher.launched(), ["pboProject.exe", "DSSignFile.exe"]);
    insta::assert_snapshot!(reporter.messages.lock().unwrap().join("\n"), @"info: built and signed MyMod_Core");
}

#[tokio::test]
async fn build_with_failing_signer_stays_successful() {
    let mut fx = fixture();
    fx.config.paths.key = Some(PathBuf::from("keys/me.biprivatekey"));
    let launcher = Arc::new(FakeLauncher::new(Some(fx.artifact.clone()), &[0, 1]));
    let reporter = Arc::new(RecordingReporter::default());

    let result = orchestrator(fx.config.clone(), both_tools(), &launcher, &reporter)
        .build(&fx.mod_dir)
        .await;

    assert!(result.succeeded());
    assert!(!result.signed());
    assert_eq!(result.output_artifact_path(), Some(fx.artifact.as_path()));
    insta::assert_snapshot!(result.warnings().join("\n"), @"DSSignFile exited with code 1");
    assert_eq!(
        result.trail(),
        [
            BuildState::Init,
            BuildState::ToolResolved,
            BuildState::Built,
            BuildState::SignFailed,
            BuildState::Done,
        ]
    );
    assert_eq!(launcher.launched(), ["pboProject.exe", "DSSignFile.exe"]);
}

#[tokio::test]
async fn build_without_artifact_skips_signing() {
    let mut fx = fixture();
    fx.config.paths.key = Some(PathBuf::from("keys/me.biprivatekey"));
    let launcher = Arc::new(FakeLauncher::new(None, &[]));
    let reporter = Arc::new(RecordingReporter::default());

    let result = orchestrator(fx.config.clone(), both_tools(), &launcher, &reporter)
        .build(&fx.mod_dir)
        .await;

    assert!(result.succeeded());
    assert!(!result.signed());
    assert!(result.output_artifact_path().is_none());
    assert_eq!(result.warnings().len(), 1);
    assert!(result.warnings()[0].starts_with("artifact not found at"));
    assert!(result.warnings()[0].ends_with("signing skipped"));
    assert_eq!(
        result.trail(),
        [
            BuildState::Init,
            BuildState::ToolResolved,
            BuildState::Built,
            BuildState::SignSkipped,
            BuildState::Done,
        ]
    );
    assert_eq!(launcher.launched(), ["pboProject.exe"]);
}

// =============================================================================
// Batches
// =============================================================================

#[tokio::test]
async fn build_pending_skips_up_to_date_mods() {
    let fx = fixture();
    std::fs::create_dir_all(fx.artifact.parent().unwrap()).unwrap();
    std::fs::write(&fx.artifact, b"pbo").unwrap();
    std::fs::File::options()
        .write(true)
        .open(&fx.artifact)
        .unwrap()
        .set_modified(std::time::SystemTime::now() + std::time::Duration::from_secs(3600))
        .unwrap();

    let launcher = Arc::new(FakeLauncher::new(None, &[]));
    let reporter = Arc::new(RecordingReporter::default());
    let root = fx.mod_dir.parent().map(Path::to_path_buf).unwrap();

    let results = orchestrator(fx.config.clone(), pbo_project_only(&fx), &launcher, &reporter)
        .build_pending(&root)
        .await;

    assert!(results.is_empty());
    assert!(launcher.launched().is_empty());
    insta::assert_snapshot!(reporter.messages.lock().unwrap().join("\n"), @"info: all mods are up to date");
}

#[tokio::test]
async fn build_all_keeps_going_after_a_failure() {
    let fx = fixture();
    let other = fx.mod_dir.parent().unwrap().join("Other");
    std::fs::create_dir_all(&other).unwrap();
    std::fs::write(
        other.join("config.cpp"),
        "class CfgPatches { class Other_Core { }; };",
    )
    .unwrap();
    let launcher = Arc::new(FakeLauncher::new(None, &[3, 0]));
    let reporter = Arc::new(RecordingReporter::default());

    let results = orchestrator(fx.config.clone(), pbo_project_only(&fx), &launcher, &reporter)
        .build_all(&[fx.mod_dir.clone(), other])
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].mod_name(), "MyMod_Core");
    assert_eq!(results[0].error_kind(), Some(ErrorKind::ExternalToolFailure));
    assert_eq!(results[1].mod_name(), "Other_Core");
    assert!(results[1].succeeded());
    assert_eq!(launcher.launched(), ["pboProject.exe", "pboProject.exe"]);
    assert_eq!(*reporter.refreshes.lock().unwrap(), 2);
}
