//! Child-process execution for conversion tools.
//!
//! Runs a [`ResolvedCommand`] directly (no shell) with captured output
//! and a hard wall-clock timeout. On unix the tool leads its own process
//! group; a timed-out run kills the whole group (wrappers such as `soffice`
//! fork the real worker) and reaps the child before the error is returned.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::error::{ConversionError, truncate};
use crate::template::ResolvedCommand;

/// How long stdout/stderr may stay open after the tool has exited.
const OUTPUT_GRACE: Duration = Duration::from_secs(2);

/// Captured result of a successful process run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOutput {
    /// Standard output from the process.
    pub stdout: String,
    /// Standard error from the process.
    pub stderr: String,
    /// Exit code.
    pub exit_code: Option<i32>,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
}

/// Executor for running external conversion commands.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    timeout: Duration,
}

impl ProcessExecutor {
    /// Create an executor with the given per-run timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The per-run timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `command` inside `working_dir`.
    ///
    /// A non-zero exit or a failure to start is `ExecutionFailed`; running
    /// past the timeout is `Timeout`.
    pub async fn run(
        &self,
        command: &ResolvedCommand,
        working_dir: &Path,
    ) -> Result<ProcessOutput, ConversionError> {
        let start = Instant::now();
        let deadline = start + self.timeout;

        debug!(command = %command, dir = %working_dir.display(), "Spawning conversion tool");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd
            .spawn()
            .map_err(|e| {
                error!(program = %command.program, error = %e, "Failed to start conversion tool");
                ConversionError::execution_failed(
                    &command.program,
                    None,
                    &format!("failed to start: {e}"),
                )
            })?;

        let mut group = ProcessGroup::new(child.id());
        let stdout_task = tokio::spawn(drain(child.stdout.take()));
        let stderr_task = tokio::spawn(drain(child.stderr.take()));

        let status = match tokio::time::timeout_at(deadline, child.wait()).await {
            Ok(status) => {
                group.disarm();
                status?
            }
            Err(_) => {
                group.kill();
                if let Err(e) = child.kill().await {
                    warn!(program = %command.program, error = %e, "Failed to kill timed-out process");
                }
                stdout_task.abort();
                stderr_task.abort();
                error!(
                    program = %command.program,
                    timeout_seconds = self.timeout.as_secs(),
                    "Conversion timed out"
                );
                return Err(ConversionError::Timeout {
                    timeout_seconds: self.timeout.as_secs(),
                });
            }
        };

        let output_deadline = Instant::now() + OUTPUT_GRACE;
        let stdout = collect(stdout_task, output_deadline).await;
        let stderr = collect(stderr_task, output_deadline).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        let exit_code = status.code();

        if !status.success() {
            error!(
                program = %command.program,
                exit_code = ?exit_code,
                stderr = %truncate(&stderr, 500),
                "Conversion tool failed"
            );
            return Err(ConversionError::execution_failed(
                &command.program,
                exit_code,
                &stderr,
            ));
        }

        debug!(program = %command.program, duration_ms, "Conversion tool finished");

        Ok(ProcessOutput {
            stdout,
            stderr,
            exit_code,
            duration_ms,
        })
    }
}

/// The tool's process group, killed on timeout or when the run is dropped.
struct ProcessGroup {
    pgid: Option<u32>,
}

impl ProcessGroup {
    fn new(pid: Option<u32>) -> Self {
        Self { pgid: pid }
    }

    /// The tool exited on its own; leave the group alone.
    fn disarm(&mut self) {
        self.pgid = None;
    }

    /// SIGKILL every process in the group.
    fn kill(&mut self) {
        let Some(pgid) = self.pgid.take() else {
            return;
        };
        kill_group(pgid);
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn kill_group(pgid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        return;
    };
    // SAFETY: killpg only sends a signal; it touches no memory we own.
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            warn!(pgid, error = %err, "Failed to kill process group");
        }
    }
}

#[cfg(not(unix))]
fn kill_group(_pgid: u32) {}

async fn drain<R>(reader: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Join a drain task, giving up at `deadline`.
///
/// A grandchild that inherited the pipe can keep it open after the tool
/// itself exited; past the grace period its output is abandoned.
async fn collect(mut task: JoinHandle<std::io::Result<Vec<u8>>>, deadline: Instant) -> String {
    match tokio::time::timeout_at(deadline, &mut task).await {
        Ok(Ok(Ok(bytes))) => String::from_utf8_lossy(&bytes).into_owned(),
        Ok(Ok(Err(e))) => {
            warn!(error = %e, "Failed to read process output");
            String::new()
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Output reader task failed");
            String::new()
        }
        Err(_) => {
            task.abort();
            warn!("Process output still open at deadline, discarding");
            String::new()
        }
    }
}
