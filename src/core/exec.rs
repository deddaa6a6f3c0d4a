//! Process execution for probes and action scripts.
//!
//! Every subprocess the wrappers start goes through a [`ProcessRunner`]. The
//! system implementation runs with an explicit [`ExecEnv`]: the caller's
//! `PATH` plus the snap directory, so helper binaries shipped inside the snap
//! resolve without touching the parent process environment.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {}", render_code(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn render_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Completion status of a script run with inherited stdio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code to hand back to the shell. Signals map to 1.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            Some(c) => c,
            None => 1,
        }
    }
}

/// Search path handed to every spawned process.
#[derive(Debug, Clone, Default)]
pub struct ExecEnv {
    base_path: Option<OsString>,
    extra_dirs: Vec<PathBuf>,
}

impl ExecEnv {
    /// Captures the current `PATH` once; later changes to the parent
    /// environment do not leak into spawned processes.
    pub fn from_current() -> Self {
        Self {
            base_path: std::env::var_os("PATH"),
            extra_dirs: Vec::new(),
        }
    }

    pub fn with_base_path(base_path: impl Into<OsString>) -> Self {
        Self {
            base_path: Some(base_path.into()),
            extra_dirs: Vec::new(),
        }
    }

    /// Appends a directory searched after the base path.
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_dirs.push(dir.into());
        self
    }

    pub fn search_path(&self) -> OsString {
        let mut dirs: Vec<PathBuf> = self
            .base_path
            .as_ref()
            .map(|p| std::env::split_paths(p).collect())
            .unwrap_or_default();
        dirs.extend(self.extra_dirs.iter().cloned());
        // join_paths only fails on entries containing the separator; fall back
        // to the raw base path rather than dropping PATH entirely.
        std::env::join_paths(&dirs)
            .unwrap_or_else(|_| self.base_path.clone().unwrap_or_default())
    }
}

pub trait ProcessRunner {
    /// Runs `program` to completion and returns its stdout.
    /// A non-zero exit is reported as [`ExecError::Failed`] carrying stderr.
    fn capture(&self, program: &Path, args: &[String]) -> Result<String, ExecError>;

    /// Runs `program` with inherited stdio and reports how it finished.
    fn status(&self, program: &Path, args: &[String]) -> Result<ExitOutcome, ExecError>;
}

#[derive(Debug, Clone)]
pub struct SystemRunner {
    env: ExecEnv,
}

impl SystemRunner {
    pub fn new(env: ExecEnv) -> Self {
        Self { env }
    }

    fn command(&self, program: &Path, args: &[String]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args).env("PATH", self.env.search_path());
        cmd
    }
}

impl ProcessRunner for SystemRunner {
    fn capture(&self, program: &Path, args: &[String]) -> Result<String, ExecError> {
        debug!(program = %program.display(), ?args, "capturing process output");
        let output = self
            .command(program, args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ExecError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExecError::Failed {
                program: program.display().to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn status(&self, program: &Path, args: &[String]) -> Result<ExitOutcome, ExecError> {
        debug!(program = %program.display(), ?args, "running process");
        let status = self
            .command(program, args)
            .status()
            .map_err(|source| ExecError::Spawn {
                program: program.display().to_string(),
                source,
            })?;
        Ok(ExitOutcome {
            code: status.code(),
        })
    }
}
