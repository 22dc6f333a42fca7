//! External process execution
//!
//! Every external tool goes through a [`CommandRunner`] so the build driver
//! can be exercised without the RPM toolchain installed.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::DriverError;

/// A program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path
    pub program: String,
    /// Arguments, passed verbatim
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Create an invocation with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    fn spawn_error(&self, e: &std::io::Error) -> DriverError {
        if e.kind() == ErrorKind::NotFound {
            DriverError::ToolNotFound {
                tool: self.program.clone(),
            }
        } else {
            DriverError::Io {
                path: PathBuf::from(&self.program),
                error: e.to_string(),
            }
        }
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Runs external programs
pub trait CommandRunner: Send + Sync {
    /// Run with inherited stdio, failing on a non-zero exit status
    fn run(&self, invocation: &Invocation) -> Result<(), DriverError>;

    /// Run and capture stdout; stderr stays attached to the terminal
    fn output(&self, invocation: &Invocation) -> Result<String, DriverError>;
}

/// Runs programs on the host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), DriverError> {
        tracing::debug!("{invocation}");

        let status = invocation
            .to_command()
            .status()
            .map_err(|e| invocation.spawn_error(&e))?;

        if !status.success() {
            return Err(DriverError::CommandFailed {
                command: invocation.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    fn output(&self, invocation: &Invocation) -> Result<String, DriverError> {
        tracing::debug!("{invocation}");

        let output = invocation
            .to_command()
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| invocation.spawn_error(&e))?;

        if !output.status.success() {
            return Err(DriverError::CommandFailed {
                command: invocation.to_string(),
                status: output.status.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
