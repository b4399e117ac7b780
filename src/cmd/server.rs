// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Server, client and auto-mode commands.
//!
//! ```text
//! server: start --> wait (exit | Ctrl+C --> stop)
//! auto:   start --> delay (Ctrl+C --> stop) --> client --> wait
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::server::{AutoArgs, ClientArgs};
use crate::config::provider::ConfigProvider;
use crate::error::Result;
use crate::server::ServerController;

/// Token cancelled on the first Ctrl+C.
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, stopping server...");
            cancel.cancel();
        }
    });
    token
}

async fn wait_or_stop(server: &mut ServerController, cancel: &CancellationToken) -> Result<()> {
    let exited = tokio::select! {
        code = server.wait() => Some(code?),
        () = cancel.cancelled() => None,
    };
    match exited {
        Some(code) => info!(exit_code = code, "server exited"),
        None => {
            server.stop().await?;
        }
    }
    Ok(())
}

/// Main handler for the server command.
///
/// # Errors
///
/// Returns an error if the server cannot be started or stopped.
pub async fn run_server_command(provider: Arc<dyn ConfigProvider>) -> Result<()> {
    let cancel = interrupt_token();
    let mut server = ServerController::new(provider);
    server.start().await?;
    wait_or_stop(&mut server, &cancel).await
}

/// Main handler for the client command.
///
/// # Errors
///
/// Returns an error if the client cannot be launched or killed.
pub async fn run_client_command(args: &ClientArgs, provider: Arc<dyn ConfigProvider>) -> Result<()> {
    let server = ServerController::new(provider);
    if args.kill {
        if server.kill_client().await? {
            println!("Client killed");
        } else {
            println!("Client was not running");
        }
        return Ok(());
    }

    let mods = server.launch_client().await?;
    if mods.is_empty() {
        println!("Client launched without mods");
    } else {
        println!("Client launched with {}", mods.join(";"));
    }
    Ok(())
}

/// Main handler for the auto command.
///
/// # Errors
///
/// Returns an error if the server cannot be started or the client launched.
pub async fn run_auto_command(args: &AutoArgs, provider: Arc<dyn ConfigProvider>) -> Result<()> {
    let cancel = interrupt_token();
    let delay = args
        .delay
        .unwrap_or_else(|| provider.snapshot().server.client_delay_secs);

    let mut server = ServerController::new(provider);
    server.start().await?;

    info!(delay_secs = delay, "waiting before launching client");
    tokio::select! {
        () = tokio::time::sleep(Duration::from_secs(delay)) => {}
        () = cancel.cancelled() => {
            server.stop().await?;
            return Ok(());
        }
    }

    if server.is_running() {
        if let Err(e) = server.launch_client().await {
            warn!(error = %format!("{e:#}"), "client launch failed, server keeps running");
        }
    } else {
        warn!("server exited before the client could be launched");
        return Ok(());
    }

    wait_or_stop(&mut server, &cancel).await
}
