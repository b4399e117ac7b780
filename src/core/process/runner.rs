// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run()                         spawn()
//!   |                             |
//!   v                             v
//! build_command()           build_command()
//! args, cwd, stdio          DETACHED: null stdio,
//!   |                       own group, no kill-on-drop
//!   v                             |
//! run_child()                     v
//! stream + wait/timeout     RunningProcess
//!   |                       wait / try_wait / terminate
//!   v
//! validate exit_code
//! (skip if ALLOW_FAILURE)
//!   |
//!   v
//! ProcessOutput { exit_code, stdout, stderr }
//! ```

use crate::error::{ProcessError, Result};
use anyhow::Context;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
use super::io::{await_readers, spawn_reader, terminate_process};

impl ProcessBuilder {
    /// Returns the display name for this process.
    pub(crate) fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    #[must_use]
    pub fn command_line(&self) -> String {
        use std::fmt::Write as _;
        let mut cmd = format!("{}", self.program().display());
        for arg in self.arguments() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Spawning the child process fails.
    /// - The process exceeds its timeout.
    /// - The process exits with a non-zero status (and `ALLOW_FAILURE` flag is not set).
    pub async fn run(self) -> Result<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();
        let mut child = command.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: cmd_line.clone(),
            source,
        })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = self.run_child(&name, &mut child).await?;

        if output.is_interrupted() {
            return Err(ProcessError::Timeout {
                command: name,
                timeout_secs: self.timeout_duration().map_or(0, |t| t.as_secs()),
            }
            .into());
        }

        if !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE)
            && !self.success_code_set().contains(&output.exit_code())
        {
            if !output.stderr().is_empty() {
                error!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: name,
                code: output.exit_code(),
            }
            .into());
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Spawns the process and returns immediately.
    ///
    /// Output is forwarded per the stream flags while the process runs.
    /// With [`ProcessFlags::DETACHED`] the child keeps running after the
    /// returned handle is dropped and its output is discarded.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::SpawnFailed` if the OS refuses to start it.
    pub fn spawn(self) -> Result<RunningProcess> {
        let name = self.display_name();
        let cmd_line = self.command_line();
        let detached = self.process_flags().contains(ProcessFlags::DETACHED);

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, detached, "spawn");

        let mut command = self.build_command();
        let mut child = command.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: cmd_line,
            source,
        })?;
        trace!(process = %name, pid = ?child.id(), "spawned");

        let readers = if detached {
            Vec::new()
        } else {
            let (stdout_tx, _) = tokio::sync::mpsc::unbounded_channel::<String>();
            let (stderr_tx, _) = tokio::sync::mpsc::unbounded_channel::<String>();
            let stdout_flags = self.stdout_config() & !StreamFlags::KEEP_IN_STRING;
            let stderr_flags = self.stderr_config() & !StreamFlags::KEEP_IN_STRING;
            [
                spawn_reader(child.stdout.take(), stdout_flags, &name, "stdout", stdout_tx),
                spawn_reader(child.stderr.take(), stderr_flags, &name, "stderr", stderr_tx),
            ]
            .into_iter()
            .flatten()
            .collect()
        };

        Ok(RunningProcess {
            child,
            name,
            readers,
            graceful: !self
                .process_flags()
                .contains(ProcessFlags::TERMINATE_ON_INTERRUPT),
        })
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.arguments());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        command.stdin(Stdio::null());

        if self.process_flags().contains(ProcessFlags::DETACHED) {
            command.stdout(Stdio::null());
            command.stderr(Stdio::null());
            command.kill_on_drop(false);

            #[cfg(windows)]
            {
                use windows::Win32::System::Threading::{
                    CREATE_NEW_PROCESS_GROUP, DETACHED_PROCESS,
                };
                command.creation_flags(DETACHED_PROCESS.0 | CREATE_NEW_PROCESS_GROUP.0);
            }
            #[cfg(unix)]
            {
                command.process_group(0);
            }
        } else {
            command.stdout(Self::stdio_from_flags(self.stdout_config()));
            command.stderr(Self::stdio_from_flags(self.stderr_config()));
            command.kill_on_drop(true);

            // Own process group so CTRL_BREAK reaches only this child
            #[cfg(windows)]
            {
                command.creation_flags(
                    windows::Win32::System::Threading::CREATE_NEW_PROCESS_GROUP.0,
                );
            }
        }

        command
    }

    /// Converts `StreamFlags` to Stdio configuration.
    fn stdio_from_flags(flags: StreamFlags) -> Stdio {
        if flags.contains(StreamFlags::INHERIT) {
            Stdio::inherit()
        } else if flags.contains(StreamFlags::BIT_BUCKET) {
            Stdio::null()
        } else {
            Stdio::piped()
        }
    }
}

/// Handle to a spawned child process.
///
/// Dropping the handle kills the child unless it was spawned
/// [`ProcessFlags::DETACHED`].
#[derive(Debug)]
pub struct RunningProcess {
    child: Child,
    name: String,
    readers: Vec<JoinHandle<()>>,
    graceful: bool,
}

impl RunningProcess {
    /// OS process id, `None` once the process has been reaped.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the exit code if the process has already exited.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS cannot report the child status.
    pub fn try_wait(&mut self) -> Result<Option<i32>> {
        let status = self
            .child
            .try_wait()
            .with_context(|| format!("failed to query status of {}", self.name))?;
        Ok(status.map(|s| s.code().unwrap_or(-1)))
    }

    /// Waits for the process to exit and for its output to drain.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting on the child fails.
    pub async fn wait(&mut self) -> Result<i32> {
        let status = self
            .child
            .wait()
            .await
            .with_context(|| format!("failed waiting for {}", self.name))?;
        await_readers(std::mem::take(&mut self.readers)).await;
        let code = status.code().unwrap_or(-1);
        trace!(process = %self.name, exit_code = code, "exited");
        Ok(code)
    }

    /// Stops the process and waits for it to exit.
    ///
    /// On Windows a `CTRL_BREAK` is sent first unless the process was built
    /// with `TERMINATE_ON_INTERRUPT`; everywhere else it is killed.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting on the child fails.
    pub async fn terminate(&mut self) -> Result<i32> {
        terminate_process(&mut self.child, self.graceful).await;
        self.wait().await
    }
}
