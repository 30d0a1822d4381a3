//! xrandr process backend
//!
//! Runs the external tool, feeds its output to the parser and executes
//! synthesized commands. Process spawning sits behind [`CommandRunner`] so the
//! query/apply flow can be exercised without an X server.

use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use crate::command::XrandrCommand;
use crate::constants::{locale, xrandr};
use crate::parser::parse_monitors;
use crate::types::{MonitorInfo, MonitorSettings};

/// Captured result of one external process run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    /// None when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a program to completion and captures its standard output
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput>;
}

/// Runner spawning real processes with a pinned locale
#[derive(Debug, Clone)]
pub struct SystemRunner {
    locale: String,
}

impl SystemRunner {
    pub fn new(locale: impl Into<String>) -> Self {
        Self { locale: locale.into() }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(locale::DEFAULT)
    }
}

impl CommandRunner for SystemRunner {
    /// Blocks until the child exits; no timeout is applied
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        debug!(program, ?args, locale = %self.locale, "spawning process");
        let output = Command::new(program)
            .args(args)
            .env(locale::ENV_VAR, &self.locale)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute {program}"))?;

        if !output.stderr.is_empty() {
            debug!(program, stderr = %String::from_utf8_lossy(&output.stderr).trim_end(), "process wrote to stderr");
        }

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

/// Query and apply monitor configuration through xrandr
pub struct XRandR<R: CommandRunner> {
    runner: R,
    program: String,
}

impl XRandR<SystemRunner> {
    /// Backend spawning `program` with `LC_ALL` set to `locale`
    pub fn system(program: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::with_runner(SystemRunner::new(locale), program)
    }
}

impl<R: CommandRunner> XRandR<R> {
    pub fn with_runner(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Current state of all connected outputs
    ///
    /// A non-zero exit status yields an empty list without parsing the output.
    pub fn monitors_info(&self) -> Result<Vec<MonitorInfo>> {
        let output = self.runner.run(&self.program, &[])?;
        if !output.success() {
            warn!(program = %self.program, exit_code = ?output.exit_code, "xrandr query failed, reporting no monitors");
            return Ok(Vec::new());
        }

        let monitors = parse_monitors(&output.stdout);
        info!(count = monitors.len(), "queried connected outputs");
        Ok(monitors)
    }

    /// Command that would apply `settings`
    pub fn command_for(&self, settings: &[MonitorSettings]) -> XrandrCommand {
        XrandrCommand::with_program(self.program.clone(), settings)
    }

    /// Apply `settings` in a single xrandr call
    ///
    /// Returns whether xrandr exited successfully; the tool is the only judge
    /// of whether the configuration is valid.
    pub fn apply(&self, settings: &[MonitorSettings]) -> Result<bool> {
        let command = self.command_for(settings);
        info!(command = %command, "applying monitor settings");

        let output = self.runner.run(&command.program, &command.args)?;
        if !output.success() {
            warn!(exit_code = ?output.exit_code, "xrandr rejected the configuration");
        }
        Ok(output.success())
    }
}

impl Default for XRandR<SystemRunner> {
    fn default() -> Self {
        Self::with_runner(SystemRunner::default(), xrandr::PROGRAM)
    }
}
