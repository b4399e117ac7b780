// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scan, status, build and link commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::warn;

use crate::build::{BuildOrchestrator, BuildResult};
use crate::cli::mods::{BuildArgs, LinkArgs, ScanArgs};
use crate::config::provider::ConfigProvider;
use crate::error::{ConfigError, Result};
use crate::links::{self, LinkReport};
use crate::mods::paths::{absolutize, resolve_scan_root};
use crate::mods::{CatalogEntry, ModCandidate, ModCatalog, ModKind, ModScanner};

fn scan_root(scanner: &ModScanner, provider: &dyn ConfigProvider, explicit: Option<&PathBuf>) -> PathBuf {
    let config = provider.snapshot();
    if let Some(warning) = config.source_root_mismatch() {
        warn!("{warning}");
    }
    absolutize(&resolve_scan_root(
        explicit.map(PathBuf::as_path),
        scanner.workspace(),
        &config,
    ))
}

/// `status  name  source` table lines for a scan.
#[must_use]
pub fn format_scan(candidates: &[ModCandidate]) -> Vec<String> {
    let width = candidates.iter().map(|c| c.name().len()).max().unwrap_or(0);
    candidates
        .iter()
        .map(|c| {
            format!(
                "{:<8} {:<width$}  {}",
                c.status().to_string(),
                c.name(),
                c.source_path().display()
            )
        })
        .collect()
}

/// Sectioned status view: dev, local and workshop mods with `[x]` when enabled.
#[must_use]
pub fn format_catalog(catalog: &ModCatalog) -> Vec<String> {
    let mut lines = Vec::new();
    for kind in ModKind::ALL {
        let title = match kind {
            ModKind::Dev => "Dev mods",
            ModKind::Local => "Local builds",
            ModKind::Workshop => "Workshop",
        };
        let entries: Vec<_> = catalog.of_kind(kind).collect();
        lines.push(format!("{title} ({})", entries.len()));
        for entry in entries {
            let mark = if entry.enabled { "x" } else { " " };
            lines.push(format!("  [{mark}] {}", entry.source));
        }
    }
    lines
}

/// One line per build plus its warnings.
#[must_use]
pub fn format_build_results(results: &[BuildResult]) -> Vec<String> {
    let mut lines = Vec::new();
    for result in results {
        let verdict = match (result.succeeded(), result.signed()) {
            (false, _) => "FAILED",
            (true, true) => "ok+signed",
            (true, false) => "ok",
        };
        let detail = result
            .error_message()
            .map(|m| format!(": {m}"))
            .or_else(|| result.output_artifact_path().map(|p| format!(" -> {}", p.display())))
            .unwrap_or_default();
        lines.push(format!("{verdict:<9} {}{detail}", result.mod_name()));
        for warning in result.warnings() {
            lines.push(format!("          warning: {warning}"));
        }
    }
    lines
}

/// Main handler for the scan command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub async fn run_scan_command(args: &ScanArgs, provider: Arc<dyn ConfigProvider>) -> Result<()> {
    let scanner = ModScanner::from_provider(Arc::clone(&provider));
    let root = scan_root(&scanner, provider.as_ref(), args.root.as_ref());
    let candidates = scanner.scan(&root).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
    } else if candidates.is_empty() {
        println!("No mods found under {}", root.display());
    } else {
        for line in format_scan(&candidates) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Main handler for the status command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub async fn run_status_command(args: &ScanArgs, provider: Arc<dyn ConfigProvider>) -> Result<()> {
    let scanner = ModScanner::from_provider(Arc::clone(&provider));
    let root = scan_root(&scanner, provider.as_ref(), args.root.as_ref());
    let candidates = scanner.scan(&root).await;
    let catalog = ModCatalog::collect(&provider.snapshot(), &candidates).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    } else {
        for line in format_catalog(&catalog) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Source directory to build for a catalog entry.
///
/// # Errors
///
/// Returns an error for local builds and workshop items.
pub fn build_source(entry: &CatalogEntry) -> Result<PathBuf> {
    let kind = entry.source.kind();
    if !kind.can_build() {
        bail!(
            "'{}' is a {kind} mod and cannot be built",
            entry.source.link_name()
        );
    }
    Ok(entry.source.path().to_path_buf())
}

/// Resolves each build argument: a directory as given, otherwise a mod name
/// looked up in the catalog.
async fn build_targets(
    args: &BuildArgs,
    scanner: &ModScanner,
    provider: &Arc<dyn ConfigProvider>,
) -> Result<Vec<PathBuf>> {
    let mut is_dir = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        is_dir.push(tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir()));
    }

    let catalog = if is_dir.iter().all(|dir| *dir) {
        ModCatalog::default()
    } else {
        let root = scan_root(scanner, provider.as_ref(), args.root.as_ref());
        let candidates = scanner.scan(&root).await;
        ModCatalog::collect(&provider.snapshot(), &candidates).await
    };

    args.paths
        .iter()
        .zip(is_dir)
        .map(|(path, dir)| {
            if dir {
                return Ok(absolutize(path));
            }
            let name = path.to_string_lossy();
            let entry = catalog.find(&name).with_context(|| {
                format!("'{name}' is neither a directory nor a known mod (see `dzmod status`)")
            })?;
            build_source(entry)
        })
        .collect()
}

/// Main handler for the build command.
///
/// # Errors
///
/// Returns an error if a named mod cannot be built or any build failed.
pub async fn run_build_command(args: &BuildArgs, provider: Arc<dyn ConfigProvider>) -> Result<()> {
    let scanner = ModScanner::from_provider(Arc::clone(&provider));
    let orchestrator = BuildOrchestrator::new(Arc::clone(&provider), scanner.workspace().clone());

    let results = if !args.paths.is_empty() {
        let targets = build_targets(args, &scanner, &provider).await?;
        orchestrator.build_all(&targets).await
    } else {
        let root = scan_root(&scanner, provider.as_ref(), args.root.as_ref());
        if args.all {
            let paths: Vec<PathBuf> = scanner
                .scan(&root)
                .await
                .iter()
                .map(|c| c.source_path().to_path_buf())
                .collect();
            orchestrator.build_all(&paths).await
        } else {
            orchestrator.build_pending(&root).await
        }
    };

    for line in format_build_results(&results) {
        println!("{line}");
    }

    let failed = results.iter().filter(|r| !r.succeeded()).count();
    if failed > 0 {
        bail!("{failed} of {} builds failed", results.len());
    }
    Ok(())
}

fn print_link_reports(reports: &[LinkReport]) {
    for report in reports {
        println!("{}: {}", report.link.display(), report.outcome);
    }
}

/// Main handler for the link command.
///
/// # Errors
///
/// Returns an error if the server directory is not configured, the mod is
/// unknown or a directory could not be updated.
pub async fn run_link_command(args: &LinkArgs, provider: Arc<dyn ConfigProvider>) -> Result<()> {
    let config = provider.snapshot();
    let server_dir = config
        .paths
        .server_dir()
        .ok_or_else(|| ConfigError::MissingKey {
            section: "paths".to_string(),
            key: "server".to_string(),
        })?
        .to_path_buf();

    let scanner = ModScanner::from_provider(Arc::clone(&provider));
    let root = scan_root(&scanner, provider.as_ref(), args.root.as_ref());
    let candidates = scanner.scan(&root).await;
    let catalog = ModCatalog::collect(&config, &candidates).await;

    let entry = catalog
        .find(&args.name)
        .with_context(|| format!("no mod named '{}' (see `dzmod status`)", args.name))?;

    let mut targets = vec![server_dir];
    if let Some(client) = config.paths.client_dir()
        && tokio::fs::metadata(client).await.is_ok_and(|m| m.is_dir())
    {
        targets.push(client.to_path_buf());
    }

    let reports = links::set_enabled(
        &targets,
        entry.source.path(),
        &entry.source.link_name(),
        !args.disable,
    )
    .await;
    print_link_reports(&reports);

    let failed = reports.iter().filter(|r| r.outcome.is_failure()).count();
    if failed > 0 {
        bail!("{failed} of {} directories could not be updated", reports.len());
    }
    Ok(())
}
