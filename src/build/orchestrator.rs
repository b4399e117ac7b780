// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build → sign → refresh for one or many mods.
//!
//! ```text
//! build(source)
//!   resolve pboProject ............ none --> Failed
//!   id = descriptor id | folder, sanitized
//!   layout = PathPolicy(config, source, id)
//!   mkdir <output>/@Folder ........ error --> Failed
//!   pboProject -E=dayz +H -P -L=<id> [-M=<output>/@Folder] <source>
//!                                   spawn error / exit != 0 --> Failed
//!   key set? DSSignFile <key> <artifact>
//!     no signer / no artifact --> SignSkipped (warning)
//!     signer failed           --> SignFailed  (warning, build still succeeded)
//!   reporter.refresh()
//! ```
//!
//! Batches run strictly one after another and never stop early.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::config::provider::ConfigProvider;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{BuildError, ErrorKind};
use crate::mods::descriptor::resolve_mod_id;
use crate::mods::paths::{
    OutputLayout, Workspace, absolutize, is_under_root, resolve_output_layout, sanitize,
};
use crate::mods::scanner::ModScanner;

use super::launcher::{Launcher, SystemLauncher};
use super::report::{Reporter, TracingReporter};
use super::state::{BuildMachine, BuildState, InvalidTransition};
use super::tools::{SystemTools, Tool, ToolResolver};

/// Outcome of one build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    mod_name: String,
    source_path: PathBuf,
    succeeded: bool,
    output_artifact_path: Option<PathBuf>,
    signed: bool,
    error_message: Option<String>,
    #[serde(skip)]
    error_kind: Option<ErrorKind>,
    warnings: Vec<String>,
    trail: Vec<BuildState>,
    #[serde(skip)]
    log: String,
}

impl BuildResult {
    #[must_use]
    pub fn mod_name(&self) -> &str {
        &self.mod_name
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Artifact path, set when the build succeeded and the file exists.
    #[must_use]
    pub fn output_artifact_path(&self) -> Option<&Path> {
        self.output_artifact_path.as_deref()
    }

    #[must_use]
    pub const fn signed(&self) -> bool {
        self.signed
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// States visited, starting with `Init`.
    #[must_use]
    pub fn trail(&self) -> &[BuildState] {
        &self.trail
    }

    /// Captured output of every tool run.
    #[must_use]
    pub fn log(&self) -> &str {
        &self.log
    }
}

/// Terminal failure of a build step.
struct StepFailure {
    kind: ErrorKind,
    message: String,
}

impl From<BuildError> for StepFailure {
    fn from(err: BuildError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<InvalidTransition> for StepFailure {
    fn from(err: InvalidTransition) -> Self {
        Self {
            kind: ErrorKind::IoFailure,
            message: err.to_string(),
        }
    }
}

/// In-flight state of one build.
struct BuildRun {
    machine: BuildMachine,
    mod_name: String,
    source_path: PathBuf,
    artifact: Option<PathBuf>,
    signed: bool,
    warnings: Vec<String>,
    log: String,
}

impl BuildRun {
    fn new(source_path: &Path) -> Self {
        Self {
            machine: BuildMachine::new(),
            mod_name: String::new(),
            source_path: source_path.to_path_buf(),
            artifact: None,
            signed: false,
            warnings: Vec::new(),
            log: String::new(),
        }
    }

    fn warn(&mut self, message: String) {
        warn!(mod_name = %self.mod_name, "{message}");
        self.warnings.push(message);
    }

    fn append_log(&mut self, output: &str) {
        if output.is_empty() {
            return;
        }
        if !self.log.is_empty() {
            self.log.push('\n');
        }
        self.log.push_str(output);
    }

    fn finish(mut self, failure: Option<StepFailure>) -> BuildResult {
        let (error_message, error_kind) = match failure {
            Some(failure) => {
                if let Err(e) = self.machine.advance(BuildState::Failed) {
                    debug!(error = %e, "failure after build step");
                }
                (Some(failure.message), Some(failure.kind))
            }
            None => (None, None),
        };
        BuildResult {
            mod_name: self.mod_name,
            source_path: self.source_path,
            succeeded: error_message.is_none(),
            output_artifact_path: self.artifact,
            signed: self.signed,
            error_message,
            error_kind,
            warnings: self.warnings,
            trail: self.machine.into_trail(),
            log: self.log,
        }
    }
}

/// Packaging invocation for a mod.
#[must_use]
pub fn pbo_project_command(
    exe: &Path,
    source_path: &Path,
    mod_id: &str,
    layout: &OutputLayout,
) -> ProcessBuilder {
    let mut process = ProcessBuilder::new(exe)
        .name(Tool::PboProject.display_name())
        .args(["-E=dayz", "+H", "-P"])
        .arg(format!("-L={mod_id}"));
    if layout.explicit_root() {
        process = process.arg(format!("-M={}", layout.folder_dir().display()));
    }
    process.arg(source_path)
}

/// Signing invocation for an artifact.
#[must_use]
pub fn sign_command(exe: &Path, key: &Path, artifact: &Path) -> ProcessBuilder {
    ProcessBuilder::new(exe)
        .name(Tool::DsSignFile.display_name())
        .arg(key)
        .arg(artifact)
}

/// Runs builds against a configuration provider.
pub struct BuildOrchestrator {
    config: Arc<dyn ConfigProvider>,
    workspace: Workspace,
    tools: Arc<dyn ToolResolver>,
    launcher: Arc<dyn Launcher>,
    reporter: Arc<dyn Reporter>,
}

impl BuildOrchestrator {
    /// Orchestrator using the real tool lookup, real processes and log output.
    #[must_use]
    pub fn new(config: Arc<dyn ConfigProvider>, workspace: Workspace) -> Self {
        Self {
            config,
            workspace,
            tools: Arc::new(SystemTools::new()),
            launcher: Arc::new(SystemLauncher),
            reporter: Arc::new(TracingReporter),
        }
    }

    #[must_use]
    pub fn with_tools(mut self, tools: Arc<dyn ToolResolver>) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Builds one mod. Never returns an error: failures are in the result.
    ///
    /// A relative path is taken against the working directory.
    pub async fn build(&self, mod_source_path: &Path) -> BuildResult {
        let config = self.config.snapshot();
        let source = absolutize(mod_source_path);
        let mut run = BuildRun::new(&source);
        run.mod_name = sanitize(&resolve_mod_id(&source).await);

        info!(mod_name = %run.mod_name, source = %source.display(), "building mod");
        let failure = self.run_pipeline(&config, &mut run).await.err();
        let result = run.finish(failure);

        match result.error_message() {
            Some(message) => self
                .reporter
                .error(&format!("build of {} failed: {message}", result.mod_name())),
            None if result.signed() => self
                .reporter
                .info(&format!("built and signed {}", result.mod_name())),
            None => self.reporter.info(&format!("built {}", result.mod_name())),
        }
        self.reporter.refresh();
        result
    }

    async fn run_pipeline(&self, config: &Config, run: &mut BuildRun) -> Result<(), StepFailure> {
        let Some(pbo_project) = self.tools.resolve(Tool::PboProject, config).await else {
            return Err(BuildError::ToolNotFound {
                tool: Tool::PboProject.display_name().to_string(),
            }
            .into());
        };
        run.machine.advance(BuildState::ToolResolved)?;

        let source = run.source_path.clone();
        let layout = resolve_output_layout(config, &source, &run.mod_name, &self.workspace);

        if !is_under_root(&source, &config.paths.source) {
            run.warn(format!(
                "{}: '{}' is outside the source root '{}'",
                ErrorKind::ConfigurationMismatch,
                source.display(),
                config.paths.source.display()
            ));
        }

        if layout.explicit_root() {
            tokio::fs::create_dir_all(layout.folder_dir())
                .await
                .map_err(|source| BuildError::OutputDir {
                    path: layout.folder_dir().display().to_string(),
                    source,
                })?;
        }

        let process = pbo_project_command(&pbo_project, &source, &run.mod_name, &layout);
        debug!(command = %process.command_line(), "running packaging tool");
        let output = self.launcher.run(process).await.map_err(|e| StepFailure {
            kind: ErrorKind::IoFailure,
            message: format!("{e:#}"),
        })?;
        run.append_log(&output.combined());
        if !output.success() {
            return Err(BuildError::ToolFailed {
                tool: Tool::PboProject.display_name().to_string(),
                code: output.exit_code(),
            }
            .into());
        }
        run.machine.advance(BuildState::Built)?;

        let artifact = layout.artifact().to_path_buf();
        let artifact_exists = tokio::fs::metadata(&artifact).await.is_ok_and(|m| m.is_file());
        if artifact_exists {
            run.artifact = Some(artifact.clone());
        }

        let sign_state = self.sign(config, run, &artifact, artifact_exists).await;
        run.machine.advance(sign_state)?;
        run.machine.advance(BuildState::Done)?;
        Ok(())
    }

    async fn sign(
        &self,
        config: &Config,
        run: &mut BuildRun,
        artifact: &Path,
        artifact_exists: bool,
    ) -> BuildState {
        let Some(key) = config.paths.signing_key() else {
            debug!(mod_name = %run.mod_name, "no signing key configured");
            return BuildState::SignSkipped;
        };

        let Some(signer) = self.tools.resolve(Tool::DsSignFile, config).await else {
            run.warn(format!(
                "{} not found, {} was not signed",
                Tool::DsSignFile.display_name(),
                run.mod_name
            ));
            return BuildState::SignSkipped;
        };

        if !artifact_exists {
            let missing = BuildError::ArtifactMissing {
                path: artifact.display().to_string(),
            };
            run.warn(format!("{missing}, signing skipped"));
            return BuildState::SignSkipped;
        }

        match self.launcher.run(sign_command(&signer, key, artifact)).await {
            Ok(output) => {
                run.append_log(&output.combined());
                if output.success() {
                    run.signed = true;
                    BuildState::Signed
                } else {
                    run.warn(
                        BuildError::ToolFailed {
                            tool: Tool::DsSignFile.display_name().to_string(),
                            code: output.exit_code(),
                        }
                        .to_string(),
                    );
                    BuildState::SignFailed
                }
            }
            Err(e) => {
                run.warn(format!("{} failed to run: {e:#}", Tool::DsSignFile.display_name()));
                BuildState::SignFailed
            }
        }
    }

    /// Builds every path in order, one at a time.
    pub async fn build_all(&self, mod_source_paths: &[PathBuf]) -> Vec<BuildResult> {
        let mut results = Vec::with_capacity(mod_source_paths.len());
        for path in mod_source_paths {
            results.push(self.build(path).await);
        }
        let failed = results.iter().filter(|r| !r.succeeded()).count();
        info!(total = results.len(), failed, "batch build finished");
        results
    }

    /// Scans `root` and builds every mod that is pending or modified.
    pub async fn build_pending(&self, root: &Path) -> Vec<BuildResult> {
        let scanner = ModScanner::new(Arc::clone(&self.config), self.workspace.clone());
        let pending: Vec<PathBuf> = scanner
            .scan(root)
            .await
            .into_iter()
            .filter(|c| c.needs_build())
            .map(|c| c.source_path().to_path_buf())
            .collect();

        if pending.is_empty() {
            self.reporter.info("all mods are up to date");
            return Vec::new();
        }
        self.build_all(&pending).await
    }
}
