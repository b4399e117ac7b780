// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks
//!   mpsc channels buffer lines
//!   wait (or timeout)
//!   --> ProcessOutput { stdout, stderr, exit_code, interrupted }
//!
//! read_stream()
//!   read_until('\n') --> lossy UTF-8 --> trim CR/LF
//! ```
//!
//! Windows tools print in the console code page; invalid UTF-8 is replaced
//! rather than dropping the line.

use crate::error::Result;
use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};

/// Spawns a reader task for a child stream if its flags need one.
pub(super) fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
    tx: mpsc::UnboundedSender<String>,
) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    if !flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    stream.map(|stream| {
        let name = process_name.to_string();
        tokio::spawn(async move {
            read_stream(stream, flags, &name, stream_name, tx).await;
        })
    })
}

/// Collects output from a channel into a string.
fn collect_output(rx: &mut mpsc::UnboundedReceiver<String>, flags: StreamFlags) -> String {
    if !flags.contains(StreamFlags::KEEP_IN_STRING) {
        return String::new();
    }
    let mut output = String::new();
    while let Ok(line) = rx.try_recv() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&line);
    }
    output
}

/// Waits for reader tasks to complete.
pub(super) async fn await_readers(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        let _ = handle.await;
    }
}

/// Terminates a child process (Windows: `CTRL_BREAK` first when graceful, then kill).
pub(super) async fn terminate_process(child: &mut Child, graceful: bool) {
    #[cfg(windows)]
    if graceful && let Some(pid) = child.id() {
        if let Err(e) = super::windows::send_ctrl_break(pid) {
            tracing::debug!(pid = pid, error = %e, "CTRL_BREAK failed, will force kill");
        } else {
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        }
    }
    #[cfg(not(windows))]
    let _ = graceful;

    child.kill().await.ok();
}

impl ProcessBuilder {
    /// Runs the child process, handling I/O streaming and waiting for completion.
    ///
    /// A timed out process is killed and reported as interrupted.
    pub(super) async fn run_child(&self, name: &str, child: &mut Child) -> Result<ProcessOutput> {
        // Captured output is drained only after exit, so the channels must not block.
        let (stdout_tx, mut stdout_rx) = mpsc::unbounded_channel::<String>();
        let (stderr_tx, mut stderr_rx) = mpsc::unbounded_channel::<String>();

        let readers: Vec<JoinHandle<()>> = [
            spawn_reader(child.stdout.take(), self.stdout_config(), name, "stdout", stdout_tx),
            spawn_reader(child.stderr.take(), self.stderr_config(), name, "stderr", stderr_tx),
        ]
        .into_iter()
        .flatten()
        .collect();

        let (exit_status, timed_out) = if let Some(timeout_duration) = self.timeout_duration() {
            tokio::select! {
                status = child.wait() => (status?, false),
                () = tokio::time::sleep(timeout_duration) => {
                    warn!(process = %name, timeout = ?timeout_duration, "Process timed out");
                    child.kill().await.with_context(|| format!("failed to kill process {name}"))?;
                    (child.wait().await?, true)
                }
            }
        } else {
            (child.wait().await?, false)
        };

        await_readers(readers).await;

        let exit_code = exit_status.code().unwrap_or(-1);
        let stdout = collect_output(&mut stdout_rx, self.stdout_config());
        let stderr = collect_output(&mut stderr_rx, self.stderr_config());

        Ok(if timed_out {
            ProcessOutput::interrupted(exit_code, stdout, stderr)
        } else {
            ProcessOutput::new(exit_code, stdout, stderr)
        })
    }
}

/// Reads from a stream line by line, forwarding and/or keeping each line.
async fn read_stream<R>(
    reader: R,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &str,
    tx: mpsc::UnboundedSender<String>,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                    trace!(process = %process_name, stream = %stream_name, line = %line, "output");
                }
                if flags.contains(StreamFlags::KEEP_IN_STRING) {
                    let _ = tx.send(line.to_string());
                }
            }
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = %stream_name,
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }
}
