//! External process supervision
//!
//! Runs one external command at a time and blocks until it exits. The
//! child's stdout and stderr are drained by two independent reader tasks so
//! a child writing heavily to both pipes can never stall on a full buffer.
//! Each line is echoed to the log as it arrives and collected into the
//! combined output returned to the caller.
//!
//! A nonzero exit is returned as data in [`ProcessResult`]; deciding
//! whether that aborts anything is the caller's business.

use futures::StreamExt;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};

use crate::core::command::CommandLine;

/// Log target for echoed child output
pub const PROCESS_LOG_TARGET: &str = "nativedep::process";

/// Process supervision errors
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The async runtime backing the supervisor could not be created
    #[error("Failed to start process runtime: {error}")]
    Runtime { error: String },

    /// The program could not be launched
    #[error("Failed to launch '{program}': {error}")]
    Spawn { program: String, error: String },

    /// Waiting for the program failed
    #[error("Failed to wait for '{program}': {error}")]
    Wait { program: String, error: String },
}

/// Outcome of one external process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Exit code; `-1` when the process ended without one (killed by a signal)
    pub exit_code: i32,
    /// stdout and stderr lines in arrival order
    pub output: String,
}

impl ProcessResult {
    /// Create a result
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    /// Whether the process exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes commands synchronously
pub trait ProcessSupervisor {
    /// Run `command` to completion
    fn run(&self, command: &CommandLine) -> Result<ProcessResult, ProcessError>;
}

/// Which pipe a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Spawns real child processes with the working directory pinned at the module root
#[derive(Debug)]
pub struct SystemSupervisor {
    working_dir: PathBuf,
    runtime: tokio::runtime::Runtime,
}

impl SystemSupervisor {
    /// Create a supervisor whose children run in `working_dir`.
    ///
    /// Must not be called from inside an async context; the supervisor owns
    /// its own runtime and blocks on it.
    pub fn new(working_dir: &Path) -> Result<Self, ProcessError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
            .map_err(|e| ProcessError::Runtime {
                error: e.to_string(),
            })?;

        Ok(Self {
            working_dir: working_dir.to_path_buf(),
            runtime,
        })
    }
}

impl ProcessSupervisor for SystemSupervisor {
    fn run(&self, command: &CommandLine) -> Result<ProcessResult, ProcessError> {
        tracing::info!(target: PROCESS_LOG_TARGET, "Running: {command}");
        let result = self.runtime.block_on(supervise(&self.working_dir, command))?;

        if result.success() {
            tracing::debug!("'{}' exited with code 0", command.program());
        } else {
            tracing::warn!(
                "'{}' exited with code {}. Output:\n{}",
                command.program(),
                result.exit_code,
                result.output
            );
        }
        Ok(result)
    }
}

async fn supervise(working_dir: &Path, command: &CommandLine) -> Result<ProcessResult, ProcessError> {
    let mut child = tokio::process::Command::new(command.program())
        .args(command.to_argv())
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ProcessError::Spawn {
            program: command.program().to_string(),
            error: e.to_string(),
        })?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(tokio::spawn(drain(stdout, Stream::Stdout, tx.clone())));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(tokio::spawn(drain(stderr, Stream::Stderr, tx.clone())));
    }
    drop(tx);

    let status = child.wait().await.map_err(|e| ProcessError::Wait {
        program: command.program().to_string(),
        error: e.to_string(),
    })?;

    for reader in readers {
        if let Err(e) = reader.await {
            tracing::warn!("Output reader for '{}' failed: {e}", command.program());
        }
    }

    let mut output = String::new();
    while let Some(line) = rx.recv().await {
        output.push_str(&line);
        output.push('\n');
    }

    Ok(ProcessResult {
        exit_code: status.code().unwrap_or(-1),
        output,
    })
}

/// Forward every line of `reader` to the log and to `tx` until EOF
async fn drain<R>(reader: R, stream: Stream, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    // Lines are split on raw bytes so non-UTF-8 compiler output never stops the drain.
    let mut lines = FramedRead::new(reader, AnyDelimiterCodec::new(b"\n".to_vec(), b"\n".to_vec()));

    while let Some(chunk) = lines.next().await {
        match chunk {
            Ok(bytes) => {
                let line = String::from_utf8_lossy(&bytes);
                let line = line.trim_end_matches('\r').to_string();
                match stream {
                    Stream::Stdout => tracing::info!(target: PROCESS_LOG_TARGET, "{line}"),
                    Stream::Stderr => tracing::info!(target: PROCESS_LOG_TARGET, "[stderr] {line}"),
                }
                // Receiver outlives both readers; a send error only means it was dropped early.
                let _ = tx.send(line);
            }
            Err(e) => {
                tracing::warn!("Stopped reading child {stream:?}: {e}");
                break;
            }
        }
    }
}

/// Supervisor that never launches anything.
///
/// Replays canned results in order and records every command it was
/// asked to run. Once the script is exhausted it answers with exit code 0.
#[derive(Debug, Default)]
pub struct ScriptedSupervisor {
    results: RefCell<VecDeque<ProcessResult>>,
    calls: RefCell<Vec<CommandLine>>,
}

impl ScriptedSupervisor {
    /// Create a supervisor answering with `exit_codes` in order
    pub fn with_exit_codes(exit_codes: &[i32]) -> Self {
        Self {
            results: RefCell::new(
                exit_codes
                    .iter()
                    .map(|code| ProcessResult::new(*code, format!("exit {code}\n")))
                    .collect(),
            ),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Number of commands run so far
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Commands run so far, in order
    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.borrow().clone()
    }
}

impl ProcessSupervisor for ScriptedSupervisor {
    fn run(&self, command: &CommandLine) -> Result<ProcessResult, ProcessError> {
        self.calls.borrow_mut().push(command.clone());
        Ok(self
            .results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| ProcessResult::new(0, "")))
    }
}
