//! Running child processes with optional timeouts and bounded output.

use std::io::{ErrorKind, Read, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use thiserror::Error;
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use crate::core::types::{CommandOutcome, CommandSpec};

pub const DEFAULT_OUTPUT_LIMIT_BYTES: usize = 1_000_000;

/// Why a command could not produce a [`CommandOutcome`].
///
/// A command that ran and exited non-zero is *not* an error.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("'{program}' is not installed or not on PATH")]
    ExecutableNotFound { program: String },
    #[error("run {command}")]
    Io {
        command: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Abstraction over process execution so workflows can be driven by scripted
/// outcomes in tests.
pub trait ProcessRunner {
    fn run(
        &self,
        spec: &CommandSpec,
        timeout: Option<Duration>,
    ) -> std::result::Result<CommandOutcome, RunError>;
}

/// Runs real child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    output_limit_bytes: usize,
}

impl SystemRunner {
    pub fn new(output_limit_bytes: usize) -> Self {
        Self { output_limit_bytes }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_LIMIT_BYTES)
    }
}

impl ProcessRunner for SystemRunner {
    #[instrument(skip_all, fields(command = %spec.display()))]
    fn run(
        &self,
        spec: &CommandSpec,
        timeout: Option<Duration>,
    ) -> std::result::Result<CommandOutcome, RunError> {
        let io_err = |source: anyhow::Error| RunError::Io {
            command: spec.display(),
            source,
        };

        // chdir into a missing directory fails with NotFound as well; rule it
        // out first so NotFound below can only mean the program.
        if let Some(dir) = spec.workdir()
            && !dir.is_dir()
        {
            return Err(io_err(anyhow!(
                "working directory {} does not exist",
                dir.display()
            )));
        }

        let mut cmd = Command::new(spec.program());
        cmd.args(spec.args());
        if let Some(dir) = spec.workdir() {
            cmd.current_dir(dir);
        }
        if spec.stdin().is_some() {
            cmd.stdin(Stdio::piped());
        } else {
            cmd.stdin(Stdio::null());
        }
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        debug!("spawning child process");
        let child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(program = spec.program(), "executable not found");
                return Err(RunError::ExecutableNotFound {
                    program: spec.program().to_string(),
                });
            }
            Err(e) => {
                error!(err = %e, "failed to spawn command");
                return Err(io_err(anyhow!(e).context("spawn command")));
            }
        };

        collect(child, spec.stdin(), timeout, self.output_limit_bytes).map_err(io_err)
    }
}

/// Once the direct child is gone, how long to keep draining pipes that a
/// surviving grandchild may still hold open.
const READER_GRACE: Duration = Duration::from_millis(500);

/// Drain stdout/stderr concurrently, feed stdin and wait (bounded by `timeout`).
///
/// Output is read while the child runs so a chatty child cannot deadlock on a
/// full pipe. Bytes beyond `output_limit_bytes` are counted and discarded.
fn collect(
    mut child: std::process::Child,
    stdin: Option<&[u8]>,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
) -> Result<CommandOutcome> {
    let started = Instant::now();
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;
    let stdout_reader = StreamReader::spawn(stdout, output_limit_bytes);
    let stderr_reader = StreamReader::spawn(stderr, output_limit_bytes);

    if let Some(input) = stdin {
        let mut child_stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("stdin was not piped"))?;
        let input = input.to_vec();
        // Detached: a child that never reads stdin must not block the wait.
        thread::spawn(move || {
            if let Err(e) = child_stdin.write_all(&input) {
                debug!(err = %e, "stdin not fully consumed");
            }
        });
    }

    let mut timed_out = false;
    let status = match timeout {
        Some(limit) => match child.wait_timeout(limit).context("wait for command")? {
            Some(status) => status,
            None => {
                warn!(timeout_secs = limit.as_secs(), "command timed out, killing");
                timed_out = true;
                child.kill().context("kill command")?;
                child.wait().context("wait command after kill")?
            }
        },
        None => child.wait().context("wait for command")?,
    };

    let deadline = timeout.map(|limit| {
        let grace = Instant::now() + READER_GRACE;
        if timed_out {
            grace
        } else {
            (started + limit).max(grace)
        }
    });
    let (stdout, stdout_truncated) = stdout_reader.finish(deadline).context("read stdout")?;
    let (stderr, stderr_truncated) = stderr_reader.finish(deadline).context("read stderr")?;

    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "output truncated");
    }

    let exit_code = if timed_out { None } else { status.code() };
    debug!(exit_code = ?exit_code, timed_out, "command finished");
    Ok(CommandOutcome {
        exit_code,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        stdout_truncated,
        stderr_truncated,
        timed_out,
    })
}

#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    truncated: usize,
}

/// A background thread draining one output pipe into a shared buffer.
struct StreamReader {
    captured: Arc<Mutex<Captured>>,
    done: mpsc::Receiver<Result<()>>,
}

impl StreamReader {
    fn spawn<R: Read + Send + 'static>(reader: R, limit: usize) -> Self {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let sink = Arc::clone(&captured);
        let (tx, done) = mpsc::channel();
        thread::spawn(move || {
            // The receiver is gone only if we stopped waiting; nothing to report.
            let _ = tx.send(read_stream_limited(reader, limit, &sink));
        });
        Self { captured, done }
    }

    /// Wait for EOF (no later than `deadline`) and take what was read.
    ///
    /// Past the deadline the thread is left behind and the output read so far
    /// is returned.
    fn finish(self, deadline: Option<Instant>) -> Result<(Vec<u8>, usize)> {
        let finished = match deadline {
            Some(deadline) => self
                .done
                .recv_timeout(deadline.saturating_duration_since(Instant::now())),
            None => self.done.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match finished {
            Ok(result) => result?,
            Err(RecvTimeoutError::Timeout) => {
                warn!("output pipe still open after the child exited, detaching reader");
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(anyhow!("output reader thread panicked"));
            }
        }
        let mut captured = self
            .captured
            .lock()
            .map_err(|_| anyhow!("output buffer poisoned"))?;
        let bytes = std::mem::take(&mut captured.bytes);
        Ok((bytes, captured.truncated))
    }
}

fn read_stream_limited<R: Read>(
    mut reader: R,
    limit: usize,
    sink: &Mutex<Captured>,
) -> Result<()> {
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let mut captured = sink.lock().map_err(|_| anyhow!("output buffer poisoned"))?;
        let remaining = limit.saturating_sub(captured.bytes.len());
        let keep = n.min(remaining);
        captured.bytes.extend_from_slice(&chunk[..keep]);
        captured.truncated += n - keep;
    }

    Ok(())
}
